//! Pure decision logic: rate negotiation and load matching.
//!
//! Nothing in here touches the database or the network; callers fetch
//! candidates and prior counters and hand them in.

pub mod matcher;
pub mod negotiation;
pub mod text;

pub use matcher::{LoadMatcher, MatchWeights, ScoredLoad, DEFAULT_SEARCH_LIMIT};
pub use negotiation::{NegotiationEngine, NegotiationPolicy};
