//! Load inventory operations for the repository.

use crate::domain::{Load, LoadId, Money, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use super::{decode_error, Repository};

const LOAD_COLUMNS: &str = r#"
    load_id, origin, destination, pickup_time_ms, delivery_time_ms,
    equipment_type, loadboard_rate, notes, weight, commodity_type,
    miles, dimensions, num_of_pieces, is_active
"#;

impl Repository {
    /// Insert a load unless one with the same `load_id` already exists.
    ///
    /// Returns `true` if a row was inserted.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_load_if_absent(&self, load: &Load) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO loads (
                load_id, origin, destination, pickup_time_ms, delivery_time_ms,
                equipment_type, loadboard_rate, notes, weight, commodity_type,
                miles, dimensions, num_of_pieces, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(load_id) DO NOTHING
            "#,
        )
        .bind(load.load_id.as_str())
        .bind(&load.origin)
        .bind(&load.destination)
        .bind(load.pickup_datetime.timestamp_millis())
        .bind(load.delivery_datetime.timestamp_millis())
        .bind(&load.equipment_type)
        .bind(load.loadboard_rate.to_storage_string())
        .bind(&load.notes)
        .bind(load.weight)
        .bind(&load.commodity_type)
        .bind(load.miles)
        .bind(&load.dimensions)
        .bind(load.num_of_pieces)
        .bind(load.is_active)
        .bind(TimeMs::now().as_ms())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert or replace loads keyed by `load_id` in a single transaction.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn upsert_loads(&self, loads: &[Load]) -> Result<usize, sqlx::Error> {
        if loads.is_empty() {
            return Ok(0);
        }

        let created_at = TimeMs::now().as_ms();
        let mut written = 0usize;
        let mut tx = self.pool.begin().await?;

        for load in loads {
            let result = sqlx::query(
                r#"
                INSERT INTO loads (
                    load_id, origin, destination, pickup_time_ms, delivery_time_ms,
                    equipment_type, loadboard_rate, notes, weight, commodity_type,
                    miles, dimensions, num_of_pieces, is_active, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(load_id) DO UPDATE SET
                    origin = excluded.origin,
                    destination = excluded.destination,
                    pickup_time_ms = excluded.pickup_time_ms,
                    delivery_time_ms = excluded.delivery_time_ms,
                    equipment_type = excluded.equipment_type,
                    loadboard_rate = excluded.loadboard_rate,
                    notes = excluded.notes,
                    weight = excluded.weight,
                    commodity_type = excluded.commodity_type,
                    miles = excluded.miles,
                    dimensions = excluded.dimensions,
                    num_of_pieces = excluded.num_of_pieces,
                    is_active = excluded.is_active
                "#,
            )
            .bind(load.load_id.as_str())
            .bind(&load.origin)
            .bind(&load.destination)
            .bind(load.pickup_datetime.timestamp_millis())
            .bind(load.delivery_datetime.timestamp_millis())
            .bind(&load.equipment_type)
            .bind(load.loadboard_rate.to_storage_string())
            .bind(&load.notes)
            .bind(load.weight)
            .bind(&load.commodity_type)
            .bind(load.miles)
            .bind(&load.dimensions)
            .bind(load.num_of_pieces)
            .bind(load.is_active)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected() as usize;
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Fetch a single load by id, active or not.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn get_load(&self, load_id: &str) -> Result<Option<Load>, sqlx::Error> {
        let sql = format!("SELECT {} FROM loads WHERE load_id = ?", LOAD_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(load_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(load_from_row).transpose()
    }

    /// All active loads, earliest pickup first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_active_loads(&self) -> Result<Vec<Load>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM loads WHERE is_active = 1 ORDER BY pickup_time_ms ASC, load_id ASC",
            LOAD_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(load_from_row).collect()
    }

    /// Every load regardless of status, ordered by `load_id`.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn all_loads(&self) -> Result<Vec<Load>, sqlx::Error> {
        let sql = format!("SELECT {} FROM loads ORDER BY load_id ASC", LOAD_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(load_from_row).collect()
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_loads(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM loads")
            .fetch_one(&self.pool)
            .await?;
        row.try_get("n")
    }

    /// Every stored `load_id`, active or not.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn existing_load_ids(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query("SELECT load_id FROM loads")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|row| row.try_get("load_id")).collect()
    }
}

fn load_from_row(row: &SqliteRow) -> Result<Load, sqlx::Error> {
    let rate_str: String = row.try_get("loadboard_rate")?;
    let loadboard_rate = Money::from_str(&rate_str)
        .map_err(|e| decode_error("loadboard_rate", format!("{}: {}", rate_str, e)))?;

    let pickup_ms: i64 = row.try_get("pickup_time_ms")?;
    let delivery_ms: i64 = row.try_get("delivery_time_ms")?;

    Ok(Load {
        load_id: LoadId::new(row.try_get::<String, _>("load_id")?),
        origin: row.try_get("origin")?,
        destination: row.try_get("destination")?,
        pickup_datetime: TimeMs::new(pickup_ms).to_datetime(),
        delivery_datetime: TimeMs::new(delivery_ms).to_datetime(),
        equipment_type: row.try_get("equipment_type")?,
        loadboard_rate,
        notes: row.try_get("notes")?,
        weight: row.try_get("weight")?,
        commodity_type: row.try_get("commodity_type")?,
        miles: row.try_get("miles")?,
        dimensions: row.try_get("dimensions")?,
        num_of_pieces: row.try_get("num_of_pieces")?,
        is_active: row.try_get("is_active")?,
    })
}
