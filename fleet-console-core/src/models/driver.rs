use serde::{Deserialize, Serialize};
use time::Date;

use crate::clock::parse_iso_date;
use crate::query::FilterState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    Active,
    Inactive,
    OnLeave,
    Suspended,
}

impl DriverStatus {
    pub const ALL: [DriverStatus; 4] = [
        DriverStatus::Active,
        DriverStatus::Inactive,
        DriverStatus::OnLeave,
        DriverStatus::Suspended,
    ];

    /// Case-insensitive inverse of [`as_param`](Self::as_param).
    pub fn from_param(value: &str) -> Option<DriverStatus> {
        let value = value.trim().replace('-', "_");
        DriverStatus::ALL
            .into_iter()
            .find(|v| v.as_param().eq_ignore_ascii_case(&value))
    }

    pub fn as_param(self) -> &'static str {
        match self {
            DriverStatus::Active => "ACTIVE",
            DriverStatus::Inactive => "INACTIVE",
            DriverStatus::OnLeave => "ON_LEAVE",
            DriverStatus::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub cpf: String,
    pub cnh: String,
    pub cnh_category: String,
    pub cnh_expiration_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DriverStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Driver {
    /// Whether the licence expired strictly before `today`. Unparseable
    /// dates are reported as not expired.
    pub fn is_cnh_expired(&self, today: Date) -> bool {
        let date_part = self.cnh_expiration_date.get(..10).unwrap_or(&self.cnh_expiration_date);
        parse_iso_date(date_part)
            .map(|expires| expires < today)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverFilter {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub status: Option<DriverStatus>,
}

impl From<DriverFilter> for FilterState {
    fn from(f: DriverFilter) -> Self {
        FilterState::new()
            .with("name", f.name)
            .with("cpf", f.cpf)
            .with("status", f.status.map(DriverStatus::as_param))
    }
}
