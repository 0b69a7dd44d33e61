use itertools::Itertools;

use fleet_console_core::{Clock, SubTable};
use fleet_console_core::models::reports::{
    MaintenanceHistory, OverdueMaintenance, UpcomingMaintenance,
};
use fleet_console_core::models::{
    CorrectiveMaintenanceReport, CostReport, DashboardStats, DepreciationReport, Driver,
    DriverPerformanceReport, FleetUtilizationReport, Maintenance, MaintenanceReport, Report,
    Trip, TripReport, Vehicle,
};

pub type Rows = Vec<Vec<String>>;

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("{}", format_row(headers.iter().copied(), &widths));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).join("  "));
    for row in rows {
        println!("{}", format_row(row.iter().map(String::as_str), &widths));
    }
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .join("  ")
        .trim_end()
        .to_string()
}

/// `1 [2] 3 4 5` from 1-based page numbers.
pub fn page_links(pages: impl Iterator<Item = usize>, current: usize) -> String {
    pages
        .map(|p| {
            if p == current {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .join(" ")
}

pub fn print_pairs(pairs: &[(&str, String)]) {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in pairs {
        println!("{:<width$}  {}", key, value, width = width);
    }
}

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

fn pct(v: f64) -> String {
    format!("{:.1}%", v)
}

fn opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| "-".to_string())
}

/// An entity list row.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn cells(&self, clock: &dyn Clock) -> Vec<String>;
}

impl Tabular for Vehicle {
    const HEADERS: &'static [&'static str] =
        &["ID", "PLATE", "TYPE", "BRAND", "MODEL", "YEAR", "STATUS", "KM"];

    fn cells(&self, _clock: &dyn Clock) -> Vec<String> {
        vec![
            opt(&self.id),
            self.license_plate.clone(),
            format!("{:?}", self.kind).to_uppercase(),
            self.brand.clone(),
            self.model.clone(),
            self.year.to_string(),
            self.status.map_or("-", |s| s.label()).to_string(),
            format!("{:.0}", self.current_mileage),
        ]
    }
}

impl Tabular for Driver {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "CPF", "CNH", "CATEGORY", "EXPIRES", "STATUS"];

    fn cells(&self, clock: &dyn Clock) -> Vec<String> {
        let expires = if self.is_cnh_expired(clock.today()) {
            format!("{} (expired)", self.cnh_expiration_date)
        } else {
            self.cnh_expiration_date.clone()
        };
        vec![
            opt(&self.id),
            self.name.clone(),
            self.cpf.clone(),
            self.cnh.clone(),
            self.cnh_category.clone(),
            expires,
            self.status.map_or("-", |s| s.as_param()).to_string(),
        ]
    }
}

impl Tabular for Trip {
    const HEADERS: &'static [&'static str] =
        &["ID", "VEHICLE", "DRIVER", "FROM", "TO", "STARTED", "ENDED", "KM"];

    fn cells(&self, _clock: &dyn Clock) -> Vec<String> {
        vec![
            opt(&self.id),
            self.vehicle_id.clone(),
            self.driver_id.clone(),
            self.origin.clone(),
            self.destination.clone(),
            opt(&self.start_date_time),
            if self.is_in_progress() {
                "in progress".to_string()
            } else {
                opt(&self.end_date_time)
            },
            self.distance().map_or("-".to_string(), |d| format!("{:.1}", d)),
        ]
    }
}

impl Tabular for Maintenance {
    const HEADERS: &'static [&'static str] =
        &["ID", "VEHICLE", "TYPE", "DESCRIPTION", "SCHEDULED", "STATUS", "COST"];

    fn cells(&self, _clock: &dyn Clock) -> Vec<String> {
        vec![
            opt(&self.id),
            self.vehicle_id.clone(),
            self.kind.as_param().to_string(),
            self.description.clone(),
            self.scheduled_date.clone(),
            self.status.map_or("-", |s| s.as_param()).to_string(),
            self.cost.map_or("-".to_string(), money),
        ]
    }
}

/// Summary figures and sub-table rows of a report.
pub trait RenderReport: Report {
    fn summary(&self) -> Vec<(&'static str, String)>;

    fn table(&self, table: SubTable) -> (&'static [&'static str], Rows);
}

const HISTORY_HEADERS: &[&str] = &[
    "PLATE",
    "TYPE",
    "DESCRIPTION",
    "SCHEDULED",
    "DONE",
    "COST",
    "STATUS",
];
const UPCOMING_HEADERS: &[&str] = &["PLATE", "TYPE", "SCHEDULED", "IN DAYS", "PRIORITY"];
const OVERDUE_HEADERS: &[&str] = &["PLATE", "TYPE", "SCHEDULED", "DAYS LATE", "SEVERITY"];

fn history_rows(rows: &[MaintenanceHistory]) -> Rows {
    rows.iter()
        .map(|h| {
            vec![
                h.license_plate.clone(),
                h.kind.clone(),
                h.description.clone(),
                h.scheduled_date.clone(),
                opt(&h.completion_date),
                money(h.cost),
                h.status.clone(),
            ]
        })
        .collect()
}

fn upcoming_rows(rows: &[UpcomingMaintenance]) -> Rows {
    rows.iter()
        .map(|u| {
            vec![
                u.license_plate.clone(),
                u.kind.clone(),
                u.scheduled_date.clone(),
                u.days_until.to_string(),
                u.priority.clone(),
            ]
        })
        .collect()
}

fn overdue_rows(rows: &[OverdueMaintenance]) -> Rows {
    rows.iter()
        .map(|o| {
            vec![
                o.license_plate.clone(),
                o.kind.clone(),
                o.scheduled_date.clone(),
                o.days_overdue.to_string(),
                o.severity.clone(),
            ]
        })
        .collect()
}

impl RenderReport for CostReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Period", format!("{} to {}", self.start_date, self.end_date)),
            ("Total cost", money(self.total_cost)),
            ("Maintenance", money(self.total_maintenance)),
            ("Avg per vehicle", money(self.average_cost_per_vehicle)),
            ("Avg per km", money(self.average_cost_per_km)),
        ]
    }

    fn table(&self, table: SubTable) -> (&'static [&'static str], Rows) {
        match table {
            SubTable::MonthlyCosts => (
                &["MONTH", "TOTAL", "MAINTENANCE", "KM"],
                self.monthly_costs
                    .iter()
                    .map(|m| {
                        vec![
                            m.month.clone(),
                            money(m.total_cost),
                            money(m.maintenance_cost),
                            format!("{:.0}", m.total_km),
                        ]
                    })
                    .collect(),
            ),
            _ => (
                &["#", "PLATE", "VEHICLE", "TOTAL", "MAINTENANCE", "KM", "PER KM"],
                self.vehicle_costs
                    .iter()
                    .map(|v| {
                        vec![
                            v.ranking.to_string(),
                            v.license_plate.clone(),
                            format!("{} {}", v.brand, v.model),
                            money(v.total_cost),
                            money(v.maintenance_cost),
                            format!("{:.0}", v.total_km),
                            money(v.cost_per_km),
                        ]
                    })
                    .collect(),
            ),
        }
    }
}

impl RenderReport for FleetUtilizationReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Period", format!("{} to {}", self.start_date, self.end_date)),
            ("Average utilization", pct(self.average_utilization_rate)),
            ("Vehicles", self.total_vehicles.to_string()),
            ("Active", self.active_vehicles.to_string()),
            ("Idle", self.idle_vehicles.to_string()),
        ]
    }

    fn table(&self, table: SubTable) -> (&'static [&'static str], Rows) {
        match table {
            SubTable::IdleVehicles => (
                &["PLATE", "VEHICLE", "DAYS IDLE", "LAST TRIP", "SUGGESTION"],
                self.idle_vehicles_list
                    .iter()
                    .map(|v| {
                        vec![
                            v.license_plate.clone(),
                            format!("{} {}", v.brand, v.model),
                            v.days_idle.to_string(),
                            opt(&v.last_trip_date),
                            v.suggestion.clone(),
                        ]
                    })
                    .collect(),
            ),
            _ => (
                &["PLATE", "TRIPS", "KM", "IN USE", "MAINT.", "IDLE", "RATE", "STATUS"],
                self.vehicle_utilization
                    .iter()
                    .map(|v| {
                        vec![
                            v.license_plate.clone(),
                            v.total_trips.to_string(),
                            format!("{:.0}", v.total_km),
                            v.days_in_use.to_string(),
                            v.days_in_maintenance.to_string(),
                            v.days_idle.to_string(),
                            pct(v.utilization_rate),
                            v.utilization_status.clone(),
                        ]
                    })
                    .collect(),
            ),
        }
    }
}

impl RenderReport for MaintenanceReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Period", format!("{} to {}", self.start_date, self.end_date)),
            ("Maintenances", self.total_maintenances.to_string()),
            ("Preventive", self.preventive_count.to_string()),
            ("Corrective", self.corrective_count.to_string()),
            ("Total cost", money(self.total_cost)),
            ("Avg days in shop", format!("{:.1}", self.average_days_in_maintenance)),
        ]
    }

    fn table(&self, table: SubTable) -> (&'static [&'static str], Rows) {
        match table {
            SubTable::Upcoming => (UPCOMING_HEADERS, upcoming_rows(&self.upcoming)),
            SubTable::History => (HISTORY_HEADERS, history_rows(&self.history)),
            _ => (OVERDUE_HEADERS, overdue_rows(&self.overdue)),
        }
    }
}

impl RenderReport for CorrectiveMaintenanceReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Period", format!("{} to {}", self.start_date, self.end_date)),
            ("Corrective", self.total_corrective_maintenances.to_string()),
            ("Total cost", money(self.total_cost)),
            ("Average cost", money(self.average_cost)),
        ]
    }

    fn table(&self, table: SubTable) -> (&'static [&'static str], Rows) {
        match table {
            SubTable::Upcoming => (UPCOMING_HEADERS, upcoming_rows(&self.upcoming_corrective)),
            SubTable::History => (HISTORY_HEADERS, history_rows(&self.corrective_history)),
            SubTable::TopVehicles => (
                &["PLATE", "COUNT", "COST"],
                self.top_vehicles
                    .iter()
                    .map(|v| {
                        vec![
                            v.license_plate.clone(),
                            v.maintenance_count.to_string(),
                            money(v.total_cost),
                        ]
                    })
                    .collect(),
            ),
            _ => (OVERDUE_HEADERS, overdue_rows(&self.overdue_corrective)),
        }
    }
}

impl RenderReport for DriverPerformanceReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Period", format!("{} to {}", self.start_date, self.end_date)),
            ("Drivers", self.total_drivers.to_string()),
            ("Active", self.active_drivers.to_string()),
            ("CNH expiring", self.cnh_expiring.len().to_string()),
        ]
    }

    fn table(&self, table: SubTable) -> (&'static [&'static str], Rows) {
        match table {
            SubTable::CnhExpiring => (
                &["NAME", "CNH", "EXPIRES", "IN DAYS", "STATUS"],
                self.cnh_expiring
                    .iter()
                    .map(|d| {
                        vec![
                            d.name.clone(),
                            d.cnh.clone(),
                            d.cnh_expiration.clone(),
                            d.days_until_expiration.to_string(),
                            d.status.clone(),
                        ]
                    })
                    .collect(),
            ),
            _ => (
                &["#", "NAME", "CNH", "TRIPS", "KM", "RATE"],
                self.driver_stats
                    .iter()
                    .map(|d| {
                        vec![
                            d.ranking.to_string(),
                            d.name.clone(),
                            d.cnh.clone(),
                            d.total_trips.to_string(),
                            format!("{:.0}", d.total_km),
                            pct(d.utilization_rate),
                        ]
                    })
                    .collect(),
            ),
        }
    }
}

impl RenderReport for TripReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("Period", format!("{} to {}", self.start_date, self.end_date)),
            ("Trips", self.total_trips.to_string()),
            ("Total km", format!("{:.0}", self.total_km)),
            ("Avg distance", format!("{:.1}", self.average_distance)),
        ];
        if !self.trips_by_status.is_empty() {
            let by_status = self
                .trips_by_status
                .iter()
                .map(|(status, count)| format!("{}={}", status, count))
                .join(", ");
            pairs.push(("By status", by_status));
        }
        pairs
    }

    fn table(&self, _table: SubTable) -> (&'static [&'static str], Rows) {
        (
            &["FROM", "TO", "TRIPS", "KM", "AVG KM"],
            self.top_routes
                .iter()
                .map(|r| {
                    vec![
                        r.origin.clone(),
                        r.destination.clone(),
                        r.trip_count.to_string(),
                        format!("{:.0}", r.total_km),
                        format!("{:.1}", r.average_km),
                    ]
                })
                .collect(),
        )
    }
}

impl RenderReport for DepreciationReport {
    fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Fleet value", money(self.total_fleet_value)),
            ("Depreciation", money(self.total_depreciation)),
            ("Average age", format!("{:.1} years", self.average_fleet_age)),
        ]
    }

    fn table(&self, _table: SubTable) -> (&'static [&'static str], Rows) {
        (
            &["PLATE", "VEHICLE", "YEAR", "PURCHASE", "CURRENT", "LOST", "RATE", "AGE"],
            self.vehicle_depreciation
                .iter()
                .map(|v| {
                    vec![
                        v.license_plate.clone(),
                        format!("{} {}", v.brand, v.model),
                        v.year.to_string(),
                        money(v.purchase_value),
                        money(v.current_value),
                        money(v.total_depreciation),
                        pct(v.depreciation_rate),
                        format!("{:.1}", v.age_in_years),
                    ]
                })
                .collect(),
        )
    }
}

pub fn dashboard_pairs(stats: &DashboardStats) -> Vec<(&'static str, String)> {
    vec![
        (
            "Vehicles",
            format!(
                "{} ({} available, {} in use, {} in maintenance)",
                stats.total_vehicles,
                stats.available_vehicles,
                stats.in_use_vehicles,
                stats.in_maintenance_vehicles
            ),
        ),
        (
            "Drivers",
            format!(
                "{} ({} active, {} inactive)",
                stats.total_drivers, stats.active_drivers, stats.inactive_drivers
            ),
        ),
        (
            "Trips",
            format!(
                "{} ({} scheduled, {} in progress, {} completed)",
                stats.total_trips,
                stats.scheduled_trips,
                stats.in_progress_trips,
                stats.completed_trips
            ),
        ),
        (
            "Maintenances",
            format!(
                "{} ({} scheduled, {} in progress, {} completed)",
                stats.total_maintenances,
                stats.scheduled_maintenances,
                stats.in_progress_maintenances,
                stats.completed_maintenances
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_console_core::FixedClock;
    use fleet_console_core::clock::parse_iso_date;

    fn driver(expires: &str) -> Driver {
        Driver {
            id: Some("d-1".to_string()),
            name: "Ana Souza".to_string(),
            cpf: "12345678901".to_string(),
            cnh: "98765432100".to_string(),
            cnh_category: "D".to_string(),
            cnh_expiration_date: expires.to_string(),
            status: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_driver_row_flags_expired_cnh() {
        let clock = FixedClock(parse_iso_date("2025-06-15").unwrap());
        assert_eq!(driver("2025-06-14").cells(&clock)[5], "2025-06-14 (expired)");
        assert_eq!(driver("2025-06-15").cells(&clock)[5], "2025-06-15");
        assert_eq!(driver("2025-06-14").cells(&clock)[6], "-");
    }

    #[test]
    fn test_page_links_mark_current() {
        assert_eq!(page_links(3..=7, 5), "3 4 [5] 6 7");
        assert_eq!(page_links(1..=0, 1), "");
    }

    #[test]
    fn test_trip_summary_lists_statuses() {
        let report: TripReport = serde_json::from_value(serde_json::json!({
            "startDate": "2025-01-01",
            "endDate": "2025-01-31",
            "tripsByStatus": { "COMPLETED": 7, "IN_PROGRESS": 1 },
            "totalTrips": 8,
            "totalKm": 812.0,
            "averageDistance": 101.5
        }))
        .unwrap();
        let summary = report.summary();
        assert_eq!(
            summary.last().map(|(_, v)| v.as_str()),
            Some("COMPLETED=7, IN_PROGRESS=1")
        );
        assert!(report.table(SubTable::TopRoutes).1.is_empty());
    }
}
