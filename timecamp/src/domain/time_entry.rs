use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use super::{
    formats::{date_format, timestamp_format},
    lenient,
};

/// A logged block of time, as returned by `GET entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(with = "date_format")]
    pub date: Date,
    /// Seconds.
    #[serde(deserialize_with = "lenient::u64_from_any")]
    pub duration: u64,
    #[serde(deserialize_with = "lenient::u64_from_any")]
    pub task_id: u64,
    #[serde(with = "timestamp_format")]
    pub last_modify: PrimitiveDateTime,
}
