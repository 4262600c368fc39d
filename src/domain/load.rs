//! Load inventory entity.

use crate::domain::{LoadId, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freight load on the board.
///
/// Location and equipment strings are stored as entered; the matcher
/// normalizes them at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Load {
    pub load_id: LoadId,
    pub origin: String,
    pub destination: String,
    pub pickup_datetime: DateTime<Utc>,
    pub delivery_datetime: DateTime<Utc>,
    pub equipment_type: String,
    /// Target rate the negotiation engine anchors on.
    pub loadboard_rate: Money,
    pub notes: String,
    pub weight: i64,
    pub commodity_type: String,
    pub miles: i64,
    pub dimensions: String,
    pub num_of_pieces: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Public view of a load as returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOut {
    pub load_id: LoadId,
    pub origin: String,
    pub destination: String,
    pub pickup_datetime: DateTime<Utc>,
    pub delivery_datetime: DateTime<Utc>,
    pub equipment_type: String,
    pub loadboard_rate: Money,
    pub notes: String,
    pub weight: i64,
    pub commodity_type: String,
    pub miles: i64,
    pub dimensions: String,
    pub num_of_pieces: i64,
}

impl From<Load> for LoadOut {
    fn from(load: Load) -> Self {
        LoadOut {
            load_id: load.load_id,
            origin: load.origin,
            destination: load.destination,
            pickup_datetime: load.pickup_datetime,
            delivery_datetime: load.delivery_datetime,
            equipment_type: load.equipment_type,
            loadboard_rate: load.loadboard_rate,
            notes: load.notes,
            weight: load.weight,
            commodity_type: load.commodity_type,
            miles: load.miles,
            dimensions: load.dimensions,
            num_of_pieces: load.num_of_pieces,
        }
    }
}
