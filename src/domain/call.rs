//! Call outcome records posted by the voice agent at the end of a call.
//!
//! The agent fills fields from extracted conversation variables, so values
//! arrive loosely typed: `"3"` for counts, `"true"` for flags, `"null"` or
//! `"n/a"` for missing data. Parsing coerces those forms and rejects
//! anything else.

use crate::domain::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_CALL_OUTCOME_LEN: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallLog {
    pub call_outcome: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mc_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub carrier_verified: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub verification_failure_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub loads_returned_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub loads_presented_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub carrier_interest_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub load_id_discussed: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub initial_rate: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub carrier_counter_rate: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub final_rate: Option<Money>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub negotiation_rounds: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub deal_margin_pressure: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub equipment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub origin_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub availability_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub driver_contact_collected: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub was_transferred: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub transfer_reason: Option<String>,
}

impl CallLog {
    /// Field-level checks serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let outcome = self.call_outcome.trim();
        if outcome.is_empty() {
            return Err("call_outcome must not be empty".to_string());
        }
        if outcome.chars().count() > MAX_CALL_OUTCOME_LEN {
            return Err(format!(
                "call_outcome must be at most {} characters",
                MAX_CALL_OUTCOME_LEN
            ));
        }
        Ok(())
    }
}

/// Caller sentiment labels and their numeric score for dashboard averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Neutral => 0.0,
            Sentiment::Negative => -1.0,
        }
    }
}

mod lenient {
    use crate::domain::time::parse_timestamp;
    use crate::domain::Money;
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    const NULL_WORDS: &[&str] = &["null", "none", "n/a"];

    /// Trimmed text, or `None` for blanks and null-ish words.
    fn text(value: Option<Value>) -> Option<Value> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || NULL_WORDS.contains(&trimmed.to_ascii_lowercase().as_str())
                {
                    None
                } else {
                    Some(Value::String(trimmed.to_string()))
                }
            }
            Some(other) => Some(other),
        }
    }

    pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match text(Option::<Value>::deserialize(d)?) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(D::Error::custom(format!("expected a string, got {}", other))),
        }
    }

    pub fn opt_bool<'de, D>(d: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match text(Option::<Value>::deserialize(d)?) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::Number(n)) => Ok(Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false))),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" => Ok(Some(true)),
                "false" | "0" | "no" | "n" => Ok(Some(false)),
                _ => Err(D::Error::custom(format!("invalid boolean value: {}", s))),
            },
            Some(other) => Err(D::Error::custom(format!("invalid boolean value: {}", other))),
        }
    }

    pub fn opt_i64<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let as_float = match text(Option::<Value>::deserialize(d)?) {
            None => return Ok(None),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Some(i));
                }
                n.as_f64()
            }
            Some(Value::String(s)) => s.parse::<f64>().ok(),
            Some(_) => None,
        };

        as_float
            .filter(|f| f.is_finite())
            .map(|f| Some(f.trunc() as i64))
            .ok_or_else(|| D::Error::custom("invalid integer value"))
    }

    pub fn opt_money<'de, D>(d: D) -> Result<Option<Money>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match text(Option::<Value>::deserialize(d)?) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s,
            Some(other) => return Err(D::Error::custom(format!("invalid amount: {}", other))),
        };
        Money::parse(&raw)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid amount: {}", raw)))
    }

    pub fn opt_timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match text(Option::<Value>::deserialize(d)?) {
            None => Ok(None),
            Some(Value::String(s)) => parse_timestamp(&s).map(Some).map_err(D::Error::custom),
            Some(other) => Err(D::Error::custom(format!("invalid timestamp: {}", other))),
        }
    }
}
