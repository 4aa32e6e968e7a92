use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Parsed body of a successful `/solve` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub solution: Vec<String>,
    #[serde(deserialize_with = "deserialize_count")]
    pub articles_checked: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub path_length: u64,
    pub time_taken: TimeTaken,
}

/// Accepts `42` as well as `42.0`; negative and fractional values are errors.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_u64() {
        return Ok(value);
    }
    match number.as_f64() {
        Some(value) if value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 => {
            Ok(value as u64)
        }
        _ => Err(de::Error::custom(format!(
            "expected a non-negative whole number, got {}",
            number
        ))),
    }
}

/// Elapsed time as reported by the backend. Numbers keep the exact textual
/// form they arrived in (`1e3` stays `1e3`).
#[derive(Debug, Clone, PartialEq)]
pub enum TimeTaken {
    Number(String),
    Text(String),
}

impl<'de> Deserialize<'de> for TimeTaken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get().trim();
        if text.starts_with('"') {
            return serde_json::from_str(text)
                .map(TimeTaken::Text)
                .map_err(de::Error::custom);
        }
        match serde_json::from_str::<serde_json::Number>(text) {
            Ok(_) => Ok(TimeTaken::Number(text.to_string())),
            Err(_) => Err(de::Error::custom(format!(
                "expected a number or a string, got {}",
                text
            ))),
        }
    }
}

impl Serialize for TimeTaken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TimeTaken::Number(n) => RawValue::from_string(n.clone())
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            TimeTaken::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for TimeTaken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeTaken::Number(n) => f.write_str(n),
            TimeTaken::Text(s) => f.write_str(s),
        }
    }
}

impl SearchResponse {
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Path rendered as a comma-separated list.
    pub fn solution_display(&self) -> String {
        self.solution.join(",")
    }

    pub fn node_count(&self) -> usize {
        self.solution.len()
    }
}
