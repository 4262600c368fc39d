//! Negotiation round operations for the repository.

use crate::domain::{Decision, LoadId, Money, NegotiationRecord, TimeMs};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

use super::{
    decode_error, parse_money, parse_optional_money, DecisionBreakdown, NegotiationOutcome,
    Repository,
};

impl Repository {
    /// Persist one evaluated round. Returns the row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails, including when `load_id` does
    /// not reference a stored load.
    pub async fn insert_negotiation(&self, record: &NegotiationRecord) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO negotiations (
                call_sid, load_id, carrier_offer, round_number, decision,
                counter_rate, reasoning, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.call_sid.as_deref())
        .bind(record.load_id.as_str())
        .bind(record.carrier_offer.to_storage_string())
        .bind(record.round_number as i64)
        .bind(record.decision.as_str())
        .bind(record.counter_rate.map(|m| m.to_storage_string()))
        .bind(&record.reasoning)
        .bind(record.created_at.as_ms())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent counter issued for `load_id` in an earlier round.
    ///
    /// Latest round wins, then latest write.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn latest_counter_before_round(
        &self,
        load_id: &str,
        round_number: u32,
    ) -> Result<Option<Money>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT counter_rate
            FROM negotiations
            WHERE load_id = ?
              AND round_number < ?
              AND counter_rate IS NOT NULL
            ORDER BY round_number DESC, created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(load_id)
        .bind(round_number as i64)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("counter_rate")?;
                Money::from_str(&raw)
                    .map(Some)
                    .map_err(|e| decode_error("counter_rate", format!("{}: {}", raw, e)))
            }
            None => Ok(None),
        }
    }

    /// Rounds recorded for one call, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn negotiations_for_call(
        &self,
        call_sid: &str,
    ) -> Result<Vec<NegotiationRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT call_sid, load_id, carrier_offer, round_number, decision,
                   counter_rate, reasoning, created_at
            FROM negotiations
            WHERE call_sid = ?
            ORDER BY round_number ASC, created_at ASC, id ASC
            "#,
        )
        .bind(call_sid)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let decision_str: String = row.try_get("decision")?;
            let decision =
                Decision::from_str(&decision_str).map_err(|e| decode_error("decision", e))?;
            let offer_str: String = row.try_get("carrier_offer")?;
            let round: i64 = row.try_get("round_number")?;

            records.push(NegotiationRecord {
                call_sid: row.try_get("call_sid")?,
                load_id: LoadId::new(row.try_get::<String, _>("load_id")?),
                carrier_offer: parse_money(&offer_str, "carrier_offer"),
                round_number: u32::try_from(round)
                    .map_err(|e| decode_error("round_number", e.to_string()))?,
                decision,
                counter_rate: parse_optional_money(row.try_get("counter_rate")?, "counter_rate"),
                reasoning: row.try_get("reasoning")?,
                created_at: TimeMs::new(row.try_get("created_at")?),
            });
        }

        Ok(records)
    }

    /// Count and mean round per decision, most frequent first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn decision_breakdown(&self) -> Result<Vec<DecisionBreakdown>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT decision,
                   COUNT(*) AS count,
                   ROUND(AVG(round_number), 2) AS avg_round
            FROM negotiations
            GROUP BY decision
            ORDER BY count DESC, decision ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(DecisionBreakdown {
                    decision: row.try_get("decision")?,
                    count: row.try_get("count")?,
                    avg_round: row.try_get::<Option<f64>, _>("avg_round")?.unwrap_or(0.0),
                })
            })
            .collect()
    }

    /// Offers on every accepted round, for exact revenue totals.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn accepted_offers(&self) -> Result<Vec<Money>, sqlx::Error> {
        let rows = sqlx::query("SELECT carrier_offer FROM negotiations WHERE decision = ?")
            .bind(Decision::Accept.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("carrier_offer")?;
                Ok(parse_money(&raw, "carrier_offer"))
            })
            .collect()
    }

    /// Load, decision and offer for every recorded round.
    ///
    /// Rows with an unrecognized decision are skipped with a warning.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn negotiation_outcomes(&self) -> Result<Vec<NegotiationOutcome>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT load_id, decision, carrier_offer FROM negotiations ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            let decision_str: String = row.try_get("decision")?;
            let decision = match Decision::from_str(&decision_str) {
                Ok(d) => d,
                Err(e) => {
                    warn!(error = %e, "Skipping negotiation row");
                    continue;
                }
            };
            let offer_str: String = row.try_get("carrier_offer")?;
            outcomes.push(NegotiationOutcome {
                load_id: LoadId::new(row.try_get::<String, _>("load_id")?),
                decision,
                carrier_offer: parse_money(&offer_str, "carrier_offer"),
            });
        }

        Ok(outcomes)
    }
}
