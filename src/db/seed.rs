//! Demo load inventory and CSV import.

use super::Repository;
use crate::domain::time::parse_timestamp;
use crate::domain::{Load, LoadId, Money};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

struct SeedLoad {
    load_id: &'static str,
    origin: &'static str,
    destination: &'static str,
    equipment_type: &'static str,
    rate_cents: i64,
    notes: &'static str,
    weight: i64,
    commodity_type: &'static str,
    miles: i64,
    dimensions: &'static str,
    num_of_pieces: i64,
}

const SEED_LOADS: &[SeedLoad] = &[
    SeedLoad {
        load_id: "HR-CHI-ATL-001",
        origin: "Chicago, IL",
        destination: "Atlanta, GA",
        equipment_type: "Dry Van",
        rate_cents: 245_000,
        notes: "Drop and hook at shipper, FCFS receiver.",
        weight: 40120,
        commodity_type: "Retail Goods",
        miles: 716,
        dimensions: "53ft trailer",
        num_of_pieces: 24,
    },
    SeedLoad {
        load_id: "HR-DAL-PHX-002",
        origin: "Dallas, TX",
        destination: "Phoenix, AZ",
        equipment_type: "Reefer",
        rate_cents: 312_500,
        notes: "Produce, temp set to 36F.",
        weight: 38400,
        commodity_type: "Fresh Produce",
        miles: 1065,
        dimensions: "53ft reefer",
        num_of_pieces: 20,
    },
    SeedLoad {
        load_id: "HR-LAX-SEA-003",
        origin: "Los Angeles, CA",
        destination: "Seattle, WA",
        equipment_type: "Flatbed",
        rate_cents: 365_000,
        notes: "Tarp required. Appointment delivery.",
        weight: 42000,
        commodity_type: "Building Materials",
        miles: 1135,
        dimensions: "48ft flatbed",
        num_of_pieces: 12,
    },
    SeedLoad {
        load_id: "HR-KCM-MEM-004",
        origin: "Kansas City, MO",
        destination: "Memphis, TN",
        equipment_type: "Dry Van",
        rate_cents: 182_000,
        notes: "Live load, same-day delivery window.",
        weight: 29500,
        commodity_type: "Packaged Foods",
        miles: 486,
        dimensions: "53ft trailer",
        num_of_pieces: 16,
    },
    SeedLoad {
        load_id: "HR-NWK-MIA-005",
        origin: "Newark, NJ",
        destination: "Miami, FL",
        equipment_type: "Dry Van",
        rate_cents: 427_500,
        notes: "High value load, team service preferred.",
        weight: 33700,
        commodity_type: "Consumer Electronics",
        miles: 1276,
        dimensions: "53ft trailer",
        num_of_pieces: 28,
    },
    SeedLoad {
        load_id: "HR-DEN-SLC-006",
        origin: "Denver, CO",
        destination: "Salt Lake City, UT",
        equipment_type: "Reefer",
        rate_cents: 154_000,
        notes: "Frozen freight, no mixed loads.",
        weight: 36000,
        commodity_type: "Frozen Foods",
        miles: 520,
        dimensions: "53ft reefer",
        num_of_pieces: 18,
    },
    SeedLoad {
        load_id: "HR-CLT-JAX-007",
        origin: "Charlotte, NC",
        destination: "Jacksonville, FL",
        equipment_type: "Dry Van",
        rate_cents: 171_500,
        notes: "Auto-load at shipper. Strict delivery appointment.",
        weight: 31000,
        commodity_type: "Paper Products",
        miles: 390,
        dimensions: "53ft trailer",
        num_of_pieces: 22,
    },
    SeedLoad {
        load_id: "HR-CLE-DET-008",
        origin: "Cleveland, OH",
        destination: "Detroit, MI",
        equipment_type: "Flatbed",
        rate_cents: 98_000,
        notes: "Steel coils, securement inspection required.",
        weight: 43200,
        commodity_type: "Steel Coils",
        miles: 170,
        dimensions: "48ft flatbed",
        num_of_pieces: 6,
    },
];

/// The demo inventory with pickups staggered from `now`.
///
/// Load `i` picks up `8 + 6i` hours out and delivers `10 + 2i` hours later.
pub fn seed_loads(now: DateTime<Utc>) -> Vec<Load> {
    SEED_LOADS
        .iter()
        .enumerate()
        .map(|(idx, seed)| {
            let i = idx as i64;
            let pickup = now + Duration::hours(8 + i * 6);
            Load {
                load_id: LoadId::new(seed.load_id),
                origin: seed.origin.to_string(),
                destination: seed.destination.to_string(),
                pickup_datetime: pickup,
                delivery_datetime: pickup + Duration::hours(10 + i * 2),
                equipment_type: seed.equipment_type.to_string(),
                loadboard_rate: Money::from_cents(seed.rate_cents),
                notes: seed.notes.to_string(),
                weight: seed.weight,
                commodity_type: seed.commodity_type.to_string(),
                miles: seed.miles,
                dimensions: seed.dimensions.to_string(),
                num_of_pieces: seed.num_of_pieces,
                is_active: true,
            }
        })
        .collect()
}

/// Insert the demo inventory only when the loads table is empty.
///
/// Returns the number of loads inserted.
///
/// # Errors
/// Returns an error if the count or any insert fails.
pub async fn seed_loads_if_empty(repo: &Repository, now: DateTime<Utc>) -> Result<usize, SeedError> {
    if repo.count_loads().await? > 0 {
        return Ok(0);
    }

    let loads = seed_loads(now);
    let inserted = repo.upsert_loads(&loads).await?;
    info!(inserted, "Seeded load inventory");
    Ok(inserted)
}

/// Insert demo loads whose `load_id` is not stored yet. Existing rows are
/// left untouched, so running this twice inserts nothing the second time.
///
/// # Errors
/// Returns an error if the lookup or any insert fails.
pub async fn seed_loads_append_missing(
    repo: &Repository,
    now: DateTime<Utc>,
) -> Result<usize, SeedError> {
    let existing: HashSet<String> = repo.existing_load_ids().await?.into_iter().collect();

    let mut inserted = 0usize;
    for load in seed_loads(now) {
        if existing.contains(load.load_id.as_str()) {
            continue;
        }
        if repo.insert_load_if_absent(&load).await? {
            inserted += 1;
        }
    }

    info!(inserted, "Appended missing seed loads");
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct CsvLoadRow {
    load_id: String,
    origin: String,
    destination: String,
    pickup_datetime: String,
    delivery_datetime: String,
    equipment_type: String,
    loadboard_rate: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    weight: i64,
    #[serde(default)]
    commodity_type: String,
    #[serde(default)]
    miles: i64,
    #[serde(default)]
    dimensions: String,
    #[serde(default)]
    num_of_pieces: i64,
    #[serde(default)]
    is_active: Option<bool>,
}

impl CsvLoadRow {
    fn into_load(self, row: usize) -> Result<Load, SeedError> {
        let invalid = |message: String| SeedError::InvalidRow { row, message };

        let load_id = self.load_id.trim();
        if load_id.is_empty() {
            return Err(invalid("load_id is empty".to_string()));
        }
        let pickup = parse_timestamp(&self.pickup_datetime)
            .map_err(|e| invalid(format!("pickup_datetime: {}", e)))?;
        let delivery = parse_timestamp(&self.delivery_datetime)
            .map_err(|e| invalid(format!("delivery_datetime: {}", e)))?;
        if delivery < pickup {
            return Err(invalid("delivery_datetime is before pickup_datetime".to_string()));
        }
        let rate = Money::parse(&self.loadboard_rate)
            .map_err(|e| invalid(format!("loadboard_rate: {}", e)))?;
        if !rate.is_positive() {
            return Err(invalid("loadboard_rate must be positive".to_string()));
        }

        Ok(Load {
            load_id: LoadId::new(load_id),
            origin: self.origin,
            destination: self.destination,
            pickup_datetime: pickup,
            delivery_datetime: delivery,
            equipment_type: self.equipment_type,
            loadboard_rate: rate.round_cents(),
            notes: self.notes,
            weight: self.weight,
            commodity_type: self.commodity_type,
            miles: self.miles,
            dimensions: self.dimensions,
            num_of_pieces: self.num_of_pieces,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

/// Parse loads from CSV with a header row.
///
/// Required columns: `load_id`, `origin`, `destination`, `pickup_datetime`,
/// `delivery_datetime`, `equipment_type`, `loadboard_rate`. The remaining
/// load fields are optional; `is_active` defaults to true.
///
/// # Errors
/// Returns an error on malformed CSV or the first invalid row (1-based,
/// header excluded).
pub fn read_loads_csv<R: Read>(reader: R) -> Result<Vec<Load>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut loads = Vec::new();
    for (idx, record) in csv_reader.deserialize::<CsvLoadRow>().enumerate() {
        loads.push(record?.into_load(idx + 1)?);
    }
    Ok(loads)
}
