//! Domain types for the carrier sales backend.
//!
//! This module provides:
//! - Exact currency via the Money wrapper
//! - Domain primitives: TimeMs, LoadId, McNumber
//! - Load inventory, negotiation decisions and call records
//! - Timestamp parsing with explicit UTC normalization

pub mod call;
pub mod load;
pub mod money;
pub mod negotiation;
pub mod primitives;
pub mod time;

pub use call::{CallLog, Sentiment};
pub use load::{Load, LoadOut};
pub use money::Money;
pub use negotiation::{Decision, NegotiationRecord, OfferEvaluation};
pub use primitives::{LoadId, McNumber, TimeMs};
