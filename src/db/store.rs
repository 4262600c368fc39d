//! Persistence seams the negotiation and search flows depend on.
//!
//! The HTTP layer and the orchestration services only see these traits, so
//! tests can swap the SQLite repository for an in-memory fake.

use super::Repository;
use crate::domain::{Load, Money, NegotiationRecord};
use async_trait::async_trait;

/// Read access to the load inventory.
#[async_trait]
pub trait LoadCatalog: Send + Sync {
    /// Look up a load by id, active or not.
    async fn get_by_id(&self, load_id: &str) -> Result<Option<Load>, sqlx::Error>;

    /// Every load currently eligible for matching.
    async fn list_active(&self) -> Result<Vec<Load>, sqlx::Error>;
}

/// Prior counters and the record of each evaluated round.
#[async_trait]
pub trait NegotiationHistory: Send + Sync {
    /// Most recent counter for `load_id` strictly before `round_number`.
    async fn latest_counter_before_round(
        &self,
        load_id: &str,
        round_number: u32,
    ) -> Result<Option<Money>, sqlx::Error>;

    async fn record(&self, record: &NegotiationRecord) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl LoadCatalog for Repository {
    async fn get_by_id(&self, load_id: &str) -> Result<Option<Load>, sqlx::Error> {
        self.get_load(load_id).await
    }

    async fn list_active(&self) -> Result<Vec<Load>, sqlx::Error> {
        self.list_active_loads().await
    }
}

#[async_trait]
impl NegotiationHistory for Repository {
    async fn latest_counter_before_round(
        &self,
        load_id: &str,
        round_number: u32,
    ) -> Result<Option<Money>, sqlx::Error> {
        Repository::latest_counter_before_round(self, load_id, round_number).await
    }

    async fn record(&self, record: &NegotiationRecord) -> Result<(), sqlx::Error> {
        self.insert_negotiation(record).await.map(|_| ())
    }
}
