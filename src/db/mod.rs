//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - Repository layer for database operations
//! - Catalog/history traits consumed by the offer and search flows
//! - Demo inventory seeding and CSV import

pub mod migrations;
pub mod repo;
pub mod seed;
pub mod store;

pub use migrations::init_db;
pub use repo::{
    CallStats, DecisionBreakdown, FunnelStage, NegotiationOutcome, Repository, SentimentPoint,
};
pub use seed::{read_loads_csv, seed_loads_append_missing, seed_loads_if_empty, SeedError};
pub use store::{LoadCatalog, NegotiationHistory};
