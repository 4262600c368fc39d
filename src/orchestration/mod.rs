//! Services that wire storage and verification around the pure engines.

pub mod dashboard;
pub mod offers;
pub mod search;

pub use dashboard::{Dashboard, LoadPerformance, Overview};
pub use offers::{OfferDesk, OfferRequest};
pub use search::LoadFinder;
