//! Negotiation decisions and the records kept for each round.

use crate::domain::{LoadId, Money, TimeMs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of evaluating one carrier offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Counter,
    Reject,
    NeedsMoreInfo,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Counter => "counter",
            Decision::Reject => "reject",
            Decision::NeedsMoreInfo => "needs_more_info",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Decision::Accept),
            "counter" => Ok(Decision::Counter),
            "reject" => Ok(Decision::Reject),
            "needs_more_info" => Ok(Decision::NeedsMoreInfo),
            other => Err(format!("unknown decision: {}", other)),
        }
    }
}

/// What the engine says about an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferEvaluation {
    pub decision: Decision,
    /// Present only when `decision` is `Counter`.
    pub counter_rate: Option<Money>,
    pub reasoning: String,
}

impl OfferEvaluation {
    pub fn new(decision: Decision, reasoning: &str) -> Self {
        Self {
            decision,
            counter_rate: None,
            reasoning: reasoning.to_string(),
        }
    }

    pub fn counter(rate: Money, reasoning: &str) -> Self {
        Self {
            decision: Decision::Counter,
            counter_rate: Some(rate),
            reasoning: reasoning.to_string(),
        }
    }
}

/// One evaluated round as written to negotiation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationRecord {
    pub call_sid: Option<String>,
    pub load_id: LoadId,
    pub carrier_offer: Money,
    pub round_number: u32,
    pub decision: Decision,
    pub counter_rate: Option<Money>,
    pub reasoning: String,
    pub created_at: TimeMs,
}

impl NegotiationRecord {
    pub fn from_evaluation(
        call_sid: Option<String>,
        load_id: LoadId,
        carrier_offer: Money,
        round_number: u32,
        evaluation: &OfferEvaluation,
    ) -> Self {
        Self {
            call_sid,
            load_id,
            carrier_offer,
            round_number,
            decision: evaluation.decision,
            counter_rate: evaluation.counter_rate,
            reasoning: evaluation.reasoning.clone(),
            created_at: TimeMs::now(),
        }
    }
}
