use crate::api::client::FleetClient;
use crate::error::ConsoleError;
use crate::export::ExportFormat;
use crate::models::{DashboardStats, Report, ReportKind};
use crate::report::{ReportPeriod, ReportTicket};

pub const DASHBOARD_PATH: &str = "api/dashboard/stats";

pub fn report_path(kind: ReportKind) -> String {
    format!("api/reports/{}", kind.slug())
}

pub fn export_path(kind: ReportKind, format: ExportFormat) -> String {
    format!("api/reports/{}/export/{}", kind.slug(), format.path_segment())
}

fn period_query(kind: ReportKind, period: Option<&ReportPeriod>) -> Vec<(String, String)> {
    match period {
        Some(p) if kind.takes_period() => p.query_pairs(),
        _ => Vec::new(),
    }
}

impl FleetClient {
    pub async fn fetch_report<R: Report>(
        &self,
        period: Option<&ReportPeriod>,
    ) -> Result<R, ConsoleError> {
        self.get_json(&report_path(R::KIND), &period_query(R::KIND, period))
            .await
    }

    pub async fn fetch_report_for<R: Report>(
        &self,
        ticket: &ReportTicket,
    ) -> Result<R, ConsoleError> {
        self.fetch_report(ticket.period.as_ref()).await
    }

    pub async fn fetch_dashboard(&self) -> Result<DashboardStats, ConsoleError> {
        self.get_json(DASHBOARD_PATH, &[]).await
    }

    /// Raw spreadsheet or PDF bytes of a rendered report.
    pub async fn export_bytes(
        &self,
        kind: ReportKind,
        period: Option<&ReportPeriod>,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ConsoleError> {
        self.get_bytes(&export_path(kind, format), &period_query(kind, period))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month};

    #[test]
    fn test_paths() {
        assert_eq!(report_path(ReportKind::FleetUtilization), "api/reports/fleet-utilization");
        assert_eq!(
            export_path(ReportKind::Costs, ExportFormat::Excel),
            "api/reports/costs/export/excel"
        );
        assert_eq!(
            export_path(ReportKind::Trips, ExportFormat::Pdf),
            "api/reports/trips/export/pdf"
        );
    }

    #[test]
    fn test_depreciation_drops_period() {
        let period = ReportPeriod::new(
            Date::from_calendar_date(2025, Month::January, 1).unwrap(),
            Date::from_calendar_date(2025, Month::January, 31).unwrap(),
        )
        .unwrap();
        assert!(period_query(ReportKind::Depreciation, Some(&period)).is_empty());
        assert_eq!(period_query(ReportKind::Costs, Some(&period)).len(), 2);
        assert!(period_query(ReportKind::Costs, None).is_empty());
    }
}
