//! Repository layer for database operations.
//!
//! Methods are organized across submodules by table:
//! - `loads.rs` - Load inventory lookup, listing and upserts
//! - `negotiations.rs` - Negotiation rounds and their aggregates
//! - `calls.rs` - Call logs and dashboard counters

mod calls;
mod loads;
mod negotiations;

use crate::domain::{Decision, LoadId, Money};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::str::FromStr;
use tracing::warn;

/// Headline call counters for the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallStats {
    pub total_calls: i64,
    pub verified_carriers: i64,
    pub booked_loads: i64,
    pub avg_sentiment: f64,
}

/// One bar of the verified -> matched -> booked funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStage {
    pub stage: &'static str,
    pub value: i64,
}

/// Average sentiment for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentPoint {
    pub date: String,
    pub avg_sentiment: f64,
}

/// Count and mean round per negotiation decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionBreakdown {
    pub decision: String,
    pub count: i64,
    pub avg_round: f64,
}

/// Minimal negotiation row for per-load performance aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationOutcome {
    pub load_id: LoadId,
    pub decision: Decision,
    pub carrier_offer: Money,
}

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Round-trip a trivial query; used by the readiness probe.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Parse a stored currency column, falling back to zero on corrupt data.
fn parse_money(raw: &str, column: &str) -> Money {
    Money::from_str(raw).unwrap_or_else(|e| {
        warn!(value = %raw, column = %column, error = %e, "Failed to parse stored amount, using 0");
        Money::zero()
    })
}

fn parse_optional_money(raw: Option<String>, column: &str) -> Option<Money> {
    raw.map(|s| parse_money(&s, column))
}

/// Decode failures for columns that must round-trip exactly.
fn decode_error(column: &str, message: impl Into<String>) -> sqlx::Error {
    let message: String = message.into();
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: message.into(),
    }
}
