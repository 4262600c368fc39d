use crate::db::LoadCatalog;
use crate::domain::Load;
use crate::engine::{LoadMatcher, DEFAULT_SEARCH_LIMIT};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Materializes the active inventory and ranks it for a carrier.
#[derive(Clone)]
pub struct LoadFinder {
    catalog: Arc<dyn LoadCatalog>,
    matcher: LoadMatcher,
}

impl LoadFinder {
    pub fn new(catalog: Arc<dyn LoadCatalog>, matcher: LoadMatcher) -> Self {
        Self { catalog, matcher }
    }

    /// # Errors
    /// Returns an error if the inventory cannot be read.
    pub async fn search(
        &self,
        equipment_type: &str,
        origin_location: &str,
        availability_time: DateTime<Utc>,
    ) -> Result<Vec<Load>, sqlx::Error> {
        let candidates = self.catalog.list_active().await?;
        let loads = self.matcher.search(
            equipment_type,
            origin_location,
            &availability_time,
            &candidates,
            DEFAULT_SEARCH_LIMIT,
        );

        info!(
            equipment_type = %equipment_type,
            origin_location = %origin_location,
            candidates = candidates.len(),
            returned = loads.len(),
            "Load search"
        );
        Ok(loads)
    }
}
