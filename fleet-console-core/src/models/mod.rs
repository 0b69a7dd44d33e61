pub mod driver;
pub mod maintenance;
pub mod reports;
pub mod trip;
pub mod vehicle;

pub use driver::{Driver, DriverFilter, DriverStatus};
pub use maintenance::{Maintenance, MaintenanceFilter, MaintenanceStatus, MaintenanceType};
pub use reports::{
    CorrectiveMaintenanceReport, CostReport, DashboardStats, DepreciationReport,
    DriverPerformanceReport, FleetUtilizationReport, MaintenanceReport, Report, ReportKind,
    TripReport,
};
pub use trip::{Trip, TripFilter};
pub use vehicle::{Vehicle, VehicleFilter, VehicleStatus, VehicleType};
