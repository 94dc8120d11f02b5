mod active;
mod aggregate;
mod catalog;
mod cli;
mod clock;
mod config;
mod error;
mod menu;
mod notify;
mod picker;
mod remote;
mod scheduler;
mod status_bar;
mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use timecamp::TimecampClient;
use tracing_subscriber::EnvFilter;

use crate::{
    active::{ActiveTimerState, Outcome},
    aggregate::Aggregator,
    catalog::CatalogCache,
    cli::{Cli, Commands},
    config::Settings,
    error::CampError,
    menu::{Menu, MenuOutcome},
    notify::NotifySend,
    picker::CommandPicker,
    scheduler::Scheduler,
    store::StateDir,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Must happen while the process is still single-threaded.
    clock::local_offset();

    init_tracing();

    let dir = config::state_dir()?;
    let settings = config::read_config(&dir)?;
    let store = StateDir::new(dir);

    // One thread: the two scheduler loops interleave cooperatively.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(command, settings, store))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn client(settings: &Settings) -> Result<Arc<TimecampClient>> {
    let client = TimecampClient::new(
        settings.timecamp_key.clone(),
        settings.timecamp_url.clone(),
        settings.request_timeout(),
    )
    .map_err(|e| CampError::Configuration(e.to_string()))?;
    Ok(Arc::new(client))
}

fn refresh_failed(e: CampError) -> anyhow::Error {
    let keep_cache = e.is_network();
    let err = anyhow::Error::new(e);
    if keep_cache {
        err.context("TimeCamp request failed, cached data left unchanged")
    } else {
        err
    }
}

async fn run(command: Commands, settings: Settings, store: StateDir) -> Result<()> {
    match command {
        Commands::Tasks => {
            CatalogCache::new(client(&settings)?, store)
                .refresh()
                .await
                .map_err(refresh_failed)?;
        }
        Commands::Entries => {
            Aggregator::new(client(&settings)?, store)
                .refresh()
                .await
                .map_err(refresh_failed)?;
        }
        Commands::Menu => run_menu(&settings, store).await?,
        Commands::I3Block => {
            let (long, short) = status_bar::read(&store);
            println!("{}", long);
            println!("{}", short);
        }
        Commands::Auto => {
            let client = client(&settings)?;
            tracing::info!(dir = %store.root().display(), "Starting scheduler");
            let scheduler = Scheduler::new(
                CatalogCache::new(client.clone(), store.clone()),
                Aggregator::new(client, store),
                settings.intervals(),
            );
            scheduler.run().await;
        }
    }
    Ok(())
}

async fn run_menu(settings: &Settings, store: StateDir) -> Result<()> {
    let notifier = Arc::new(NotifySend::new(settings.notify_icon.clone()));
    let picker = Arc::new(CommandPicker::from_command_line(&settings.picker)?);
    let timers = ActiveTimerState::new(client(settings)?, notifier, store.clone());

    let outcome = match Menu::new(timers, picker, store).run().await {
        Ok(outcome) => outcome,
        Err(e @ CampError::CacheMiss { .. }) => {
            return Err(anyhow::Error::new(e)
                .context("Cannot build the menu, run `timecamp-rofi tasks` first"));
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        MenuOutcome::Cancelled => tracing::debug!("Menu cancelled"),
        MenuOutcome::Changed(transition) => {
            if let Outcome::Stopped {
                stopped,
                remote_confirmed: false,
            } = transition.outcome
            {
                eprintln!(
                    "Stopped {} locally, but TimeCamp did not confirm; check the web timer.",
                    stopped.name
                );
            }
        }
    }
    Ok(())
}
