//! Call log operations and dashboard counters for the repository.

use crate::domain::{CallLog, Sentiment, TimeMs};
use sqlx::Row;

use super::{CallStats, FunnelStage, Repository, SentimentPoint};

impl Repository {
    /// Store a call log together with the raw payload it was parsed from.
    /// Returns the new call id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_call(
        &self,
        call: &CallLog,
        payload: &serde_json::Value,
    ) -> Result<i64, sqlx::Error> {
        let sentiment_score = call
            .sentiment
            .as_deref()
            .and_then(Sentiment::parse)
            .map(|s| s.score());
        let now = TimeMs::now().as_ms();

        let result = sqlx::query(
            r#"
            INSERT INTO calls (
                call_outcome, sentiment, sentiment_score, mc_number, carrier_verified,
                verification_failure_reason, loads_returned_count, loads_presented_count,
                carrier_interest_level, load_id_discussed, initial_rate,
                carrier_counter_rate, final_rate, negotiation_rounds,
                deal_margin_pressure, equipment_type, origin_location,
                availability_time_ms, driver_contact_collected, was_transferred,
                transfer_reason, analytics_payload, server_timestamp, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(call.call_outcome.trim())
        .bind(call.sentiment.as_deref())
        .bind(sentiment_score)
        .bind(call.mc_number.as_deref())
        .bind(call.carrier_verified)
        .bind(call.verification_failure_reason.as_deref())
        .bind(call.loads_returned_count)
        .bind(call.loads_presented_count)
        .bind(call.carrier_interest_level.as_deref())
        .bind(call.load_id_discussed.as_deref())
        .bind(call.initial_rate.map(|m| m.to_storage_string()))
        .bind(call.carrier_counter_rate.map(|m| m.to_storage_string()))
        .bind(call.final_rate.map(|m| m.to_storage_string()))
        .bind(call.negotiation_rounds)
        .bind(call.deal_margin_pressure.as_deref())
        .bind(call.equipment_type.as_deref())
        .bind(call.origin_location.as_deref())
        .bind(call.availability_time.map(|t| t.timestamp_millis()))
        .bind(call.driver_contact_collected)
        .bind(call.was_transferred)
        .bind(call.transfer_reason.as_deref())
        .bind(payload.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Total, verified and booked call counts plus the mean sentiment score.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn call_stats(&self) -> Result<CallStats, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total_calls,
                   COALESCE(SUM(CASE WHEN carrier_verified = 1 THEN 1 ELSE 0 END), 0) AS verified,
                   COALESCE(SUM(CASE WHEN call_outcome = 'booked' THEN 1 ELSE 0 END), 0) AS booked,
                   ROUND(COALESCE(AVG(sentiment_score), 0.0), 2) AS avg_sentiment
            FROM calls
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CallStats {
            total_calls: row.try_get("total_calls")?,
            verified_carriers: row.try_get("verified")?,
            booked_loads: row.try_get("booked")?,
            avg_sentiment: row.try_get("avg_sentiment")?,
        })
    }

    /// Verified, Load Matched and Booked stage counts, in that order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn call_funnel(&self) -> Result<Vec<FunnelStage>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(CASE WHEN carrier_verified = 1 THEN 1 ELSE 0 END), 0) AS verified,
                   COALESCE(SUM(CASE WHEN load_id_discussed IS NOT NULL THEN 1 ELSE 0 END), 0) AS matched,
                   COALESCE(SUM(CASE WHEN call_outcome = 'booked' THEN 1 ELSE 0 END), 0) AS booked
            FROM calls
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(vec![
            FunnelStage {
                stage: "Verified",
                value: row.try_get("verified")?,
            },
            FunnelStage {
                stage: "Load Matched",
                value: row.try_get("matched")?,
            },
            FunnelStage {
                stage: "Booked",
                value: row.try_get("booked")?,
            },
        ])
    }

    /// Mean sentiment per UTC calendar day, oldest first.
    ///
    /// Days whose calls carry no recognized sentiment report 0.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn sentiment_by_day(&self) -> Result<Vec<SentimentPoint>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT date(created_at / 1000, 'unixepoch') AS day,
                   ROUND(COALESCE(AVG(sentiment_score), 0.0), 2) AS avg_sentiment
            FROM calls
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(SentimentPoint {
                    date: row.try_get("day")?,
                    avg_sentiment: row.try_get("avg_sentiment")?,
                })
            })
            .collect()
    }
}
