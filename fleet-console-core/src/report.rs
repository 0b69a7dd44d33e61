//! Report screens: a date period, one fetch at a time, and an independent
//! [`SlicePager`] for every sub-table the report carries.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use time::Date;

use crate::clock::{Clock, days_before, first_of_month, format_iso_date};
use crate::controller::CompletionOutcome;
use crate::error::ConsoleError;
use crate::models::{Report, ReportKind};
use crate::slice::{REPORT_PAGE_SIZES, SlicePager, SubTable};
use crate::view_state::ViewState;

pub const MISSING_PERIOD_MESSAGE: &str = "Select start and end dates";
pub const INVERTED_PERIOD_MESSAGE: &str = "Start date must not be after end date";

/// Inclusive reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    start: Date,
    end: Date,
}

impl ReportPeriod {
    pub fn new(start: Date, end: Date) -> Result<Self, ConsoleError> {
        if start > end {
            return Err(ConsoleError::InvalidInput(format!(
                "period starts {} after it ends {}",
                format_iso_date(start),
                format_iso_date(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("startDate".to_string(), format_iso_date(self.start)),
            ("endDate".to_string(), format_iso_date(self.end)),
        ]
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            format_iso_date(self.start),
            format_iso_date(self.end)
        )
    }
}

/// Period a report screen opens with, `None` for reports without one.
pub fn default_period(kind: ReportKind, clock: &dyn Clock) -> Option<ReportPeriod> {
    let today = clock.today();
    let start = match kind {
        ReportKind::Maintenance | ReportKind::CorrectiveMaintenance | ReportKind::Trips => {
            days_before(today, 30)
        }
        ReportKind::DriverPerformance => days_before(today, 90),
        ReportKind::Costs | ReportKind::FleetUtilization => first_of_month(today),
        ReportKind::Depreciation => return None,
    };
    Some(ReportPeriod { start, end: today })
}

/// Tab selectable on a report screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTab {
    Table(SubTable),
    /// Trip counts grouped by status; not paginated.
    ByStatus,
}

/// One outbound report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTicket {
    pub seq: u64,
    pub kind: ReportKind,
    pub period: Option<ReportPeriod>,
}

#[derive(Debug)]
pub struct ReportScreen<R> {
    view: ViewState<R>,
    start: Option<Date>,
    end: Option<Date>,
    pagers: BTreeMap<SubTable, SlicePager>,
    active_tab: ReportTab,
    latest_seq: u64,
    disposed: bool,
}

impl<R: Report> ReportScreen<R> {
    pub fn new(clock: &dyn Clock) -> Self {
        Self::with_page_sizes(clock, REPORT_PAGE_SIZES.to_vec())
    }

    pub fn with_page_sizes(clock: &dyn Clock, allowed_sizes: Vec<usize>) -> Self {
        let period = default_period(R::KIND, clock);
        let pagers = R::KIND
            .sub_tables()
            .iter()
            .map(|&table| {
                (
                    table,
                    SlicePager::with_sizes(R::KIND.default_page_size(), allowed_sizes.clone()),
                )
            })
            .collect();
        let active_tab = R::KIND
            .sub_tables()
            .first()
            .map_or(ReportTab::ByStatus, |&t| ReportTab::Table(t));

        Self {
            view: ViewState::new(),
            start: period.map(|p| p.start),
            end: period.map(|p| p.end),
            pagers,
            active_tab,
            latest_seq: 0,
            disposed: false,
        }
    }

    pub fn kind(&self) -> ReportKind {
        R::KIND
    }

    /// Replaces the period bounds; checked on the next [`generate`](Self::generate).
    pub fn set_period(&mut self, start: Option<Date>, end: Option<Date>) {
        self.start = start;
        self.end = end;
    }

    pub fn period(&self) -> Option<ReportPeriod> {
        ReportPeriod::new(self.start?, self.end?).ok()
    }

    /// Issues a report request, or sets the screen error and issues nothing
    /// when the period is incomplete or inverted.
    pub fn generate(&mut self) -> Option<ReportTicket> {
        if self.disposed {
            return None;
        }

        let period = if R::KIND.takes_period() {
            let (Some(start), Some(end)) = (self.start, self.end) else {
                self.reject(MISSING_PERIOD_MESSAGE);
                return None;
            };
            match ReportPeriod::new(start, end) {
                Ok(p) => Some(p),
                Err(_) => {
                    self.reject(INVERTED_PERIOD_MESSAGE);
                    return None;
                }
            }
        } else {
            None
        };

        self.latest_seq += 1;
        self.view.begin();
        debug!("issuing {} report request #{}", R::KIND, self.latest_seq);
        Some(ReportTicket {
            seq: self.latest_seq,
            kind: R::KIND,
            period,
        })
    }

    /// A rejected period also retires any request still in flight, so its
    /// late answer cannot replace the message.
    fn reject(&mut self, message: &str) {
        self.latest_seq += 1;
        self.view.fail(message);
    }

    pub fn complete(&mut self, seq: u64, result: Result<R, ConsoleError>) -> CompletionOutcome {
        if self.disposed {
            return CompletionOutcome::Disposed;
        }
        if seq != self.latest_seq {
            debug!("dropping stale {} report #{}", R::KIND, seq);
            return CompletionOutcome::Stale;
        }

        match result {
            Ok(report) => {
                for (&table, pager) in self.pagers.iter_mut() {
                    pager.clamp_to(report.row_count(table));
                }
                if R::KIND == ReportKind::Trips {
                    self.active_tab = if report.row_count(SubTable::TopRoutes) > 0 {
                        ReportTab::Table(SubTable::TopRoutes)
                    } else {
                        ReportTab::ByStatus
                    };
                }
                self.view.succeed(report);
                CompletionOutcome::Applied
            }
            Err(e) => {
                warn!("{} report #{} failed: {}", R::KIND, seq, e);
                self.view.fail(R::KIND.error_message());
                CompletionOutcome::Failed
            }
        }
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn view(&self) -> &ViewState<R> {
        &self.view
    }

    pub fn report(&self) -> Option<&R> {
        self.view.data()
    }

    /// Tabs offered by this report, in display order.
    pub fn tabs(&self) -> Vec<ReportTab> {
        let mut tabs: Vec<ReportTab> = R::KIND
            .sub_tables()
            .iter()
            .map(|&t| ReportTab::Table(t))
            .collect();
        if R::KIND == ReportKind::Trips {
            tabs.push(ReportTab::ByStatus);
        }
        tabs
    }

    pub fn active_tab(&self) -> ReportTab {
        self.active_tab
    }

    /// Switches tabs. Pager state of every table is left as is.
    pub fn set_active_tab(&mut self, tab: ReportTab) -> bool {
        if self.tabs().contains(&tab) {
            self.active_tab = tab;
            true
        } else {
            false
        }
    }

    pub fn pager(&self, table: SubTable) -> Option<&SlicePager> {
        self.pagers.get(&table)
    }

    fn rows_in(&self, table: SubTable) -> usize {
        self.report().map_or(0, |r| r.row_count(table))
    }

    pub fn change_page(&mut self, table: SubTable, n: usize) -> bool {
        let len = self.rows_in(table);
        self.pagers
            .get_mut(&table)
            .is_some_and(|pager| pager.change_page(n, len))
    }

    pub fn set_page_size(&mut self, table: SubTable, size: usize) -> bool {
        self.pagers
            .get_mut(&table)
            .is_some_and(|pager| pager.on_page_size_change(size))
    }

    pub fn range_label(&self, table: SubTable) -> Option<String> {
        let len = self.rows_in(table);
        self.pager(table).map(|p| p.range_label(len))
    }
}
