//! The external "choose one line" program (rofi by default).

use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::error::{CampError, Result};

#[async_trait]
pub trait Picker: Send + Sync + 'static {
    /// Offer `lines` and return the chosen one, or `None` when the user cancelled.
    async fn pick(&self, lines: &[String], message: &str) -> Result<Option<String>>;
}

/// Runs a picker command, feeding the menu on stdin and reading the choice from stdout.
#[derive(Debug, Clone)]
pub struct CommandPicker {
    program: String,
    args: Vec<String>,
}

impl CommandPicker {
    /// Parse a whitespace separated command line such as `rofi -dmenu -i -p Task`.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| CampError::Configuration("picker command is empty".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    fn is_rofi(&self) -> bool {
        Path::new(&self.program)
            .file_name()
            .is_some_and(|name| name == "rofi")
    }
}

#[async_trait]
impl Picker for CommandPicker {
    async fn pick(&self, lines: &[String], message: &str) -> Result<Option<String>> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if self.is_rofi() && !message.is_empty() {
            command.arg("-mesg").arg(message);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| CampError::Picker(format!("Failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CampError::Picker("picker stdin unavailable".to_string()))?;
        match stdin.write_all(lines.join("\n").as_bytes()).await {
            Ok(()) => {}
            // The picker may exit before reading everything.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(CampError::Picker(format!("Failed to write menu: {}", e))),
        }
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CampError::Picker(format!("Failed to read choice: {}", e)))?;

        // rofi exits non-zero on Escape; that is a cancellation, not a failure.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let choice = stdout.lines().next().unwrap_or("").trim_end_matches('\r');
        if choice.is_empty() {
            tracing::debug!(status = %output.status, "Picker returned no choice");
            return Ok(None);
        }

        Ok(Some(choice.to_string()))
    }
}

#[cfg(test)]
pub use scripted::ScriptedPicker;
