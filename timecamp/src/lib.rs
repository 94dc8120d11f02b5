//! Client for the TimeCamp third-party API.
//!
//! Covers the four calls the timer companion needs: the task list, time entries for a date
//! range, and starting/stopping the remote timer.

mod client;
pub mod domain;
mod timecamp_url;

pub(crate) use timecamp_url::*;

pub use client::*;
pub use timecamp_url::DEFAULT_BASE_URL;
pub use domain::{Task, TasksResponse, TimeEntry, TimerHandle};
