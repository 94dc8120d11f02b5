use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "timecamp-rofi")]
#[command(about = "A rofi based client for TimeCamp with i3blocks support")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Refresh the cached task list
    Tasks,
    /// Refresh this week's time entries and totals
    Entries,
    /// Pick a task to start, or stop the running one
    Menu,
    /// Print long and short status lines for i3blocks
    #[command(name = "i3block")]
    I3Block,
    /// Keep tasks and entries refreshed in the background
    Auto,
}
