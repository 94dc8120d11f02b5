//! Two-line output for an i3blocks status block.
//!
//! Reads persisted state only, so it is cheap enough to run every few seconds.

use crate::{
    active::{ActiveTimer, TimerState},
    aggregate::StatusSummary,
    store::StateDir,
};

const UNKNOWN_TOTAL: &str = "--:--";

/// `(long, short)` lines for the block.
pub fn render(status: Option<&StatusSummary>, active: Option<&ActiveTimer>) -> (String, String) {
    let logged = match status {
        Some(status) => format!("Today {}, Week {}", status.today, status.week),
        None => format!("Today {}, Week {}", UNKNOWN_TOTAL, UNKNOWN_TOTAL),
    };

    match active {
        Some(timer) => (
            format!("Task: {} {}", timer.name, logged),
            format!("{} {}", timer.name, logged),
        ),
        None => (format!("No Active Task {}", logged), logged),
    }
}

pub fn read(store: &StateDir) -> (String, String) {
    let status = match StatusSummary::load(store) {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!(error = %e, "No status summary yet");
            None
        }
    };
    let state = TimerState::load(store);
    render(status.as_ref(), state.active())
}
