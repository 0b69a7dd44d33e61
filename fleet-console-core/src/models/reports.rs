//! Report payloads. All aggregation happens server-side; these are
//! rendered as received.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::slice::SubTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Costs,
    FleetUtilization,
    Maintenance,
    CorrectiveMaintenance,
    DriverPerformance,
    Trips,
    Depreciation,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::Costs,
        ReportKind::FleetUtilization,
        ReportKind::Maintenance,
        ReportKind::CorrectiveMaintenance,
        ReportKind::DriverPerformance,
        ReportKind::Trips,
        ReportKind::Depreciation,
    ];

    /// Path segment under `/api/reports`.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Costs => "costs",
            ReportKind::FleetUtilization => "fleet-utilization",
            ReportKind::Maintenance => "maintenance",
            ReportKind::CorrectiveMaintenance => "corrective-maintenance",
            ReportKind::DriverPerformance => "driver-performance",
            ReportKind::Trips => "trips",
            ReportKind::Depreciation => "depreciation",
        }
    }

    pub fn from_slug(slug: &str) -> Option<ReportKind> {
        ReportKind::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// Depreciation is computed over the whole fleet history.
    pub fn takes_period(self) -> bool {
        self != ReportKind::Depreciation
    }

    pub fn sub_tables(self) -> &'static [SubTable] {
        match self {
            ReportKind::Costs => &[SubTable::VehicleCosts, SubTable::MonthlyCosts],
            ReportKind::FleetUtilization => {
                &[SubTable::VehicleUtilization, SubTable::IdleVehicles]
            }
            ReportKind::Maintenance => &[SubTable::Overdue, SubTable::Upcoming, SubTable::History],
            ReportKind::CorrectiveMaintenance => &[
                SubTable::Overdue,
                SubTable::Upcoming,
                SubTable::History,
                SubTable::TopVehicles,
            ],
            ReportKind::DriverPerformance => &[SubTable::DriverStats, SubTable::CnhExpiring],
            ReportKind::Trips => &[SubTable::TopRoutes],
            ReportKind::Depreciation => &[SubTable::VehicleDepreciation],
        }
    }

    pub fn default_page_size(self) -> usize {
        match self {
            ReportKind::Maintenance
            | ReportKind::CorrectiveMaintenance
            | ReportKind::DriverPerformance => 10,
            ReportKind::Costs
            | ReportKind::FleetUtilization
            | ReportKind::Trips
            | ReportKind::Depreciation => 5,
        }
    }

    pub fn error_message(self) -> &'static str {
        match self {
            ReportKind::Costs => "Failed to load cost report",
            ReportKind::FleetUtilization => "Failed to load fleet utilization report",
            ReportKind::Maintenance => "Failed to load maintenance report",
            ReportKind::CorrectiveMaintenance => "Failed to load corrective maintenance report",
            ReportKind::DriverPerformance => "Failed to load driver performance report",
            ReportKind::Trips => "Failed to load trip report",
            ReportKind::Depreciation => "Failed to load depreciation report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A report payload with one or more paginated sub-tables.
pub trait Report: DeserializeOwned + Send + 'static {
    const KIND: ReportKind;

    /// Row count of `table`, `0` for tables this report does not carry.
    fn row_count(&self, table: SubTable) -> usize;
}

// ---- costs ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    pub start_date: String,
    pub end_date: String,
    pub total_cost: f64,
    pub total_maintenance: f64,
    pub average_cost_per_vehicle: f64,
    pub average_cost_per_km: f64,
    #[serde(default)]
    pub vehicle_costs: Vec<VehicleCost>,
    #[serde(default)]
    pub monthly_costs: Vec<MonthlyCost>,
    #[serde(default)]
    pub projections: Vec<CostProjection>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCost {
    pub vehicle_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub total_cost: f64,
    pub maintenance_cost: f64,
    pub total_km: f64,
    pub cost_per_km: f64,
    pub ranking: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    pub month: String,
    pub total_cost: f64,
    pub maintenance_cost: f64,
    pub total_km: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostProjection {
    pub month: String,
    pub projected_cost: f64,
    pub trend: f64,
}

impl Report for CostReport {
    const KIND: ReportKind = ReportKind::Costs;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::VehicleCosts => self.vehicle_costs.len(),
            SubTable::MonthlyCosts => self.monthly_costs.len(),
            _ => 0,
        }
    }
}

// ---- fleet utilization ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetUtilizationReport {
    pub start_date: String,
    pub end_date: String,
    pub average_utilization_rate: f64,
    pub total_vehicles: u32,
    pub active_vehicles: u32,
    pub idle_vehicles: u32,
    #[serde(default)]
    pub vehicle_utilization: Vec<VehicleUtilization>,
    #[serde(default)]
    pub idle_vehicles_list: Vec<IdleVehicle>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUtilization {
    pub vehicle_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub total_trips: u32,
    pub total_km: f64,
    pub days_in_use: u32,
    pub days_in_maintenance: u32,
    pub days_idle: u32,
    pub utilization_rate: f64,
    pub utilization_status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdleVehicle {
    pub vehicle_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub days_idle: u32,
    pub last_trip_date: Option<String>,
    pub suggestion: String,
}

impl Report for FleetUtilizationReport {
    const KIND: ReportKind = ReportKind::FleetUtilization;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::VehicleUtilization => self.vehicle_utilization.len(),
            SubTable::IdleVehicles => self.idle_vehicles_list.len(),
            _ => 0,
        }
    }
}

// ---- maintenance ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceHistory {
    pub vehicle_id: String,
    pub license_plate: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub scheduled_date: String,
    pub completion_date: Option<String>,
    pub cost: f64,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMaintenance {
    pub vehicle_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scheduled_date: String,
    pub days_until: i64,
    pub priority: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverdueMaintenance {
    pub vehicle_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scheduled_date: String,
    pub days_overdue: i64,
    pub severity: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceReport {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub history: Vec<MaintenanceHistory>,
    #[serde(default)]
    pub upcoming: Vec<UpcomingMaintenance>,
    #[serde(default)]
    pub overdue: Vec<OverdueMaintenance>,
    pub total_maintenances: u32,
    pub preventive_count: u32,
    pub corrective_count: u32,
    pub total_cost: f64,
    pub average_days_in_maintenance: f64,
}

impl Report for MaintenanceReport {
    const KIND: ReportKind = ReportKind::Maintenance;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::Overdue => self.overdue.len(),
            SubTable::Upcoming => self.upcoming.len(),
            SubTable::History => self.history.len(),
            _ => 0,
        }
    }
}

// ---- corrective maintenance ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMaintenanceStats {
    pub license_plate: String,
    pub maintenance_count: u32,
    pub total_cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveMaintenanceReport {
    pub start_date: String,
    pub end_date: String,
    pub total_corrective_maintenances: u32,
    pub total_cost: f64,
    pub average_cost: f64,
    #[serde(default)]
    pub corrective_history: Vec<MaintenanceHistory>,
    #[serde(default)]
    pub upcoming_corrective: Vec<UpcomingMaintenance>,
    #[serde(default)]
    pub overdue_corrective: Vec<OverdueMaintenance>,
    #[serde(default)]
    pub top_vehicles: Vec<VehicleMaintenanceStats>,
}

impl Report for CorrectiveMaintenanceReport {
    const KIND: ReportKind = ReportKind::CorrectiveMaintenance;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::Overdue => self.overdue_corrective.len(),
            SubTable::Upcoming => self.upcoming_corrective.len(),
            SubTable::History => self.corrective_history.len(),
            SubTable::TopVehicles => self.top_vehicles.len(),
            _ => 0,
        }
    }
}

// ---- driver performance ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverStats {
    pub driver_id: String,
    pub name: String,
    pub cnh: String,
    pub total_trips: u32,
    pub total_km: f64,
    pub utilization_rate: f64,
    pub ranking: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverCnhExpiring {
    pub driver_id: String,
    pub name: String,
    pub cnh: String,
    pub cnh_expiration: String,
    pub days_until_expiration: i64,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverPerformanceReport {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub driver_stats: Vec<DriverStats>,
    #[serde(default)]
    pub cnh_expiring: Vec<DriverCnhExpiring>,
    pub total_drivers: u32,
    pub active_drivers: u32,
}

impl Report for DriverPerformanceReport {
    const KIND: ReportKind = ReportKind::DriverPerformance;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::DriverStats => self.driver_stats.len(),
            SubTable::CnhExpiring => self.cnh_expiring.len(),
            _ => 0,
        }
    }
}

// ---- trips ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteFrequency {
    pub origin: String,
    pub destination: String,
    pub trip_count: u32,
    pub total_km: f64,
    pub average_km: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripReport {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub top_routes: Vec<RouteFrequency>,
    #[serde(default)]
    pub trips_by_status: BTreeMap<String, u64>,
    pub total_trips: u32,
    pub total_km: f64,
    pub average_distance: f64,
}

impl Report for TripReport {
    const KIND: ReportKind = ReportKind::Trips;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::TopRoutes => self.top_routes.len(),
            _ => 0,
        }
    }
}

// ---- depreciation ----

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDepreciation {
    pub vehicle_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub purchase_value: f64,
    pub current_value: f64,
    pub total_depreciation: f64,
    pub depreciation_rate: f64,
    pub age_in_years: f64,
    pub purchase_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationReport {
    pub total_fleet_value: f64,
    pub total_depreciation: f64,
    pub average_fleet_age: f64,
    #[serde(default)]
    pub vehicle_depreciation: Vec<VehicleDepreciation>,
}

impl Report for DepreciationReport {
    const KIND: ReportKind = ReportKind::Depreciation;

    fn row_count(&self, table: SubTable) -> usize {
        match table {
            SubTable::VehicleDepreciation => self.vehicle_depreciation.len(),
            _ => 0,
        }
    }
}

// ---- dashboard ----

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_vehicles: u32,
    pub available_vehicles: u32,
    pub in_use_vehicles: u32,
    pub in_maintenance_vehicles: u32,
    pub total_drivers: u32,
    pub active_drivers: u32,
    pub inactive_drivers: u32,
    pub total_trips: u32,
    pub scheduled_trips: u32,
    pub in_progress_trips: u32,
    pub completed_trips: u32,
    pub total_maintenances: u32,
    pub scheduled_maintenances: u32,
    pub in_progress_maintenances: u32,
    pub completed_maintenances: u32,
}
