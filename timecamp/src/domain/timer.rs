use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::{formats::timestamp_format, lenient};

/// Reply to a timer start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimerHandle {
    #[serde(deserialize_with = "lenient::u64_from_any")]
    pub new_timer_id: u64,
    #[serde(default, deserialize_with = "lenient::opt_u64_from_any")]
    pub entry_id: Option<u64>,
}

/// Body of `POST timer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TimerRequest {
    Start {
        task_id: u64,
        #[serde(with = "timestamp_format")]
        started_at: PrimitiveDateTime,
    },
    Stop {
        timer_id: u64,
        #[serde(with = "timestamp_format")]
        stopped_at: PrimitiveDateTime,
    },
}
