use serde::{Deserialize, Serialize};
use time::Date;

use crate::query::FilterState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    Inspection,
    Repair,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 4] = [
        MaintenanceType::Preventive,
        MaintenanceType::Corrective,
        MaintenanceType::Inspection,
        MaintenanceType::Repair,
    ];

    pub fn from_param(value: &str) -> Option<MaintenanceType> {
        let value = value.trim().replace('-', "_");
        MaintenanceType::ALL
            .into_iter()
            .find(|v| v.as_param().eq_ignore_ascii_case(&value))
    }

    pub fn as_param(self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "PREVENTIVE",
            MaintenanceType::Corrective => "CORRECTIVE",
            MaintenanceType::Inspection => "INSPECTION",
            MaintenanceType::Repair => "REPAIR",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub const ALL: [MaintenanceStatus; 4] = [
        MaintenanceStatus::Scheduled,
        MaintenanceStatus::InProgress,
        MaintenanceStatus::Completed,
        MaintenanceStatus::Cancelled,
    ];

    pub fn from_param(value: &str) -> Option<MaintenanceStatus> {
        let value = value.trim().replace('-', "_");
        MaintenanceStatus::ALL
            .into_iter()
            .find(|v| v.as_param().eq_ignore_ascii_case(&value))
    }

    pub fn as_param(self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "SCHEDULED",
            MaintenanceStatus::InProgress => "IN_PROGRESS",
            MaintenanceStatus::Completed => "COMPLETED",
            MaintenanceStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_start(self) -> bool {
        self == MaintenanceStatus::Scheduled
    }

    pub fn can_complete(self) -> bool {
        self == MaintenanceStatus::InProgress
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, MaintenanceStatus::Scheduled | MaintenanceStatus::InProgress)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub scheduled_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MaintenanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceFilter {
    pub vehicle_id: Option<String>,
    pub status: Option<MaintenanceStatus>,
    pub kind: Option<MaintenanceType>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl From<MaintenanceFilter> for FilterState {
    fn from(f: MaintenanceFilter) -> Self {
        FilterState::new()
            .with("vehicleId", f.vehicle_id)
            .with("status", f.status.map(MaintenanceStatus::as_param))
            .with("type", f.kind.map(MaintenanceType::as_param))
            .with("startDate", f.start_date)
            .with("endDate", f.end_date)
    }
}
