use serde::{Deserialize, Serialize};
use time::Date;

use crate::query::FilterState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub vehicle_id: String,
    pub driver_id: String,
    pub origin: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<String>,
    pub start_mileage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_traveled: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Trip {
    pub fn is_in_progress(&self) -> bool {
        self.end_date_time.is_none()
    }

    /// Distance reported by the server, or derived from the odometer
    /// readings once the trip is closed.
    pub fn distance(&self) -> Option<f64> {
        self.distance_traveled
            .or_else(|| self.end_mileage.map(|end| end - self.start_mileage))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFilter {
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub in_progress: Option<bool>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl From<TripFilter> for FilterState {
    fn from(f: TripFilter) -> Self {
        FilterState::new()
            .with("vehicleId", f.vehicle_id)
            .with("driverId", f.driver_id)
            .with("inProgress", f.in_progress)
            .with("startDate", f.start_date)
            .with("endDate", f.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_trip() {
        let trip: Trip = serde_json::from_value(json!({
            "vehicleId": "v-1",
            "driverId": "d-1",
            "origin": "Campinas",
            "destination": "Santos",
            "startDateTime": "2025-02-01T08:00:00",
            "startMileage": 1000.0
        }))
        .unwrap();
        assert!(trip.is_in_progress());
        assert_eq!(trip.distance(), None);
    }

    #[test]
    fn test_closed_trip_distance_from_odometer() {
        let trip: Trip = serde_json::from_value(json!({
            "vehicleId": "v-1",
            "driverId": "d-1",
            "origin": "Campinas",
            "destination": "Santos",
            "startDateTime": "2025-02-01T08:00:00",
            "endDateTime": "2025-02-01T11:30:00",
            "startMileage": 1000.0,
            "endMileage": 1185.5
        }))
        .unwrap();
        assert!(!trip.is_in_progress());
        assert_eq!(trip.distance(), Some(185.5));
    }

    #[test]
    fn test_filter_in_progress_flag() {
        let filter: FilterState = TripFilter {
            in_progress: Some(true),
            ..Default::default()
        }
        .into();
        assert_eq!(
            filter.to_query_pairs(),
            vec![("inProgress".to_string(), "true".to_string())]
        );
    }
}
