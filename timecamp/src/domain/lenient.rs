//! TimeCamp encodes most numbers as strings (`"task_id": "42"`) and flags as `"0"`/`"1"`.
//! These helpers accept either encoding so the record types can stay strongly typed.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

fn parse_number<E: de::Error>(value: NumberOrText) -> Result<u64, E> {
    match value {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected a non-negative integer, got {:?}", s))),
    }
}

pub(crate) fn u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_number(NumberOrText::deserialize(deserializer)?)
}

pub(crate) fn opt_u64_from_any<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(parse_number)
        .transpose()
}

pub(crate) fn flag_from_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FlagValue::deserialize(deserializer)? {
        FlagValue::Bool(b) => b,
        FlagValue::Number(n) => n != 0,
        FlagValue::Text(s) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
    })
}
