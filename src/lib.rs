pub mod api;
pub mod carrier;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use carrier::{CarrierVerifier, FmcsaClient, MockCarrierVerifier, VerificationError};
pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Decision, Load, LoadId, McNumber, Money, OfferEvaluation, TimeMs};
pub use engine::{LoadMatcher, NegotiationEngine, NegotiationPolicy};
pub use error::AppError;
