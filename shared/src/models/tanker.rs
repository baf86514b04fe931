//! Tanker fleet models

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Snapshot of a water tanker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tanker {
    pub id: String,
    pub registration_no: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    /// Capacity in liters
    pub capacity_liters: u32,
    /// Depot name
    #[serde(default)]
    pub depot_location: String,
    pub depot: GpsCoordinates,
    pub status: TankerStatus,
}

impl Tanker {
    pub fn is_available(&self) -> bool {
        self.status == TankerStatus::Available
    }
}

/// Operational status of a tanker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TankerStatus {
    Available,
    Dispatched,
    #[serde(alias = "in-transit")]
    InTransit,
    Delivering,
    Maintenance,
    Offline,
}

impl TankerStatus {
    /// Out on a delivery run
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TankerStatus::Dispatched | TankerStatus::InTransit | TankerStatus::Delivering
        )
    }

    /// Not withdrawn from service
    pub fn is_operational(&self) -> bool {
        !matches!(self, TankerStatus::Maintenance | TankerStatus::Offline)
    }
}

impl std::fmt::Display for TankerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TankerStatus::Available => write!(f, "available"),
            TankerStatus::Dispatched => write!(f, "dispatched"),
            TankerStatus::InTransit => write!(f, "in_transit"),
            TankerStatus::Delivering => write!(f, "delivering"),
            TankerStatus::Maintenance => write!(f, "maintenance"),
            TankerStatus::Offline => write!(f, "offline"),
        }
    }
}
