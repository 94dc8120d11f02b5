//! Date and timestamp formats used on the wire and in persisted state.

use time::{format_description::BorrowedFormatItem, macros::format_description};

/// `YYYY-MM-DD`
pub const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// `YYYY-MM-DD HH:MM:SS`
pub const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Serde adapter for [`time::Date`] as `YYYY-MM-DD`.
pub mod date_format {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date.format(super::DATE).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(text.trim(), super::DATE).map_err(de::Error::custom)
    }
}

/// Serde adapter for [`time::PrimitiveDateTime`] as `YYYY-MM-DD HH:MM:SS`.
pub mod timestamp_format {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(
        timestamp: &PrimitiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = timestamp.format(super::TIMESTAMP).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PrimitiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(text.trim(), super::TIMESTAMP).map_err(de::Error::custom)
    }
}
