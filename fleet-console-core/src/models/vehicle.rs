use serde::{Deserialize, Serialize};

use crate::query::FilterState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Truck,
    Van,
    Bus,
    Motorcycle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
    Unavailable,
}

impl VehicleStatus {
    pub fn label(self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in use",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Unavailable => "unavailable",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub license_plate: String,
    #[serde(rename = "type")]
    pub kind: VehicleType,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
    pub current_mileage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Search constraints on the vehicle list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    pub license_plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

impl From<VehicleFilter> for FilterState {
    fn from(f: VehicleFilter) -> Self {
        FilterState::new()
            .with("licensePlate", f.license_plate)
            .with("brand", f.brand)
            .with("model", f.model)
            .with("yearFrom", f.year_from)
            .with("yearTo", f.year_to)
    }
}
