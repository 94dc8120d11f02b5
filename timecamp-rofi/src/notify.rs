//! Desktop notifications on timer start/stop.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Fire-and-forget. Failures are swallowed.
    async fn notify(&self, title: &str, body: &str);
}

/// Sends notifications through `notify-send`.
pub struct NotifySend {
    icon: Option<PathBuf>,
}

impl NotifySend {
    pub fn new(icon: Option<PathBuf>) -> Self {
        Self { icon }
    }
}

#[async_trait]
impl Notifier for NotifySend {
    async fn notify(&self, title: &str, body: &str) {
        let mut command = Command::new("notify-send");
        if let Some(icon) = &self.icon {
            command.arg("-i").arg(icon);
        }
        command.arg(title).arg(body);

        if let Err(e) = command.spawn() {
            tracing::debug!(error = %e, "notify-send unavailable");
        }
    }
}

#[cfg(test)]
pub use recording::RecordingNotifier;

#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::Notifier;

    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, title: &str, body: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
        }
    }
}
