//! In-memory pagination for report sub-tables.
//!
//! Report endpoints return each table as one complete array, so paging here
//! is plain slicing. Pages are 1-based at this boundary.

use std::fmt;
use std::ops::RangeInclusive;

use crate::window::page_window_one_based;

pub const REPORT_PAGE_SIZES: [usize; 5] = [5, 10, 25, 50, 100];

/// Number of pages needed for `len` rows; `0` when there are no rows.
pub fn total_pages(len: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        0
    } else {
        len.div_ceil(items_per_page)
    }
}

/// Rows visible on the 1-based `current_page`. Absent or empty input,
/// page `0` and pages past the end all yield an empty slice.
pub fn paginated_slice<T>(rows: Option<&[T]>, current_page: usize, items_per_page: usize) -> &[T] {
    let Some(rows) = rows else {
        return &[];
    };
    if current_page == 0 || items_per_page == 0 {
        return &[];
    }

    let start = (current_page - 1).saturating_mul(items_per_page).min(rows.len());
    let end = start.saturating_add(items_per_page).min(rows.len());
    &rows[start..end]
}

/// Pagination state for one sub-table.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicePager {
    current_page: usize,
    items_per_page: usize,
    allowed_sizes: Vec<usize>,
}

impl SlicePager {
    pub fn new(items_per_page: usize) -> Self {
        Self::with_sizes(items_per_page, REPORT_PAGE_SIZES.to_vec())
    }

    pub fn with_sizes(items_per_page: usize, allowed_sizes: Vec<usize>) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            allowed_sizes,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn allowed_sizes(&self) -> &[usize] {
        &self.allowed_sizes
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.items_per_page)
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        paginated_slice(Some(rows), self.current_page, self.items_per_page)
    }

    /// Moves to page `n` when `1 <= n <= total_pages`.
    pub fn change_page(&mut self, n: usize, len: usize) -> bool {
        if n >= 1 && n <= self.total_pages(len) {
            self.current_page = n;
            true
        } else {
            false
        }
    }

    /// Switches page size and returns to page 1. Sizes outside the allowed
    /// set are ignored.
    pub fn on_page_size_change(&mut self, new_size: usize) -> bool {
        if !self.allowed_sizes.contains(&new_size) {
            return false;
        }
        self.items_per_page = new_size;
        self.current_page = 1;
        true
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self, len: usize) -> bool {
        self.current_page < self.total_pages(len)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.can_go_prev() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self, len: usize) -> bool {
        if self.can_go_next(len) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Returns to page 1 if the current page no longer exists for `len` rows.
    pub fn clamp_to(&mut self, len: usize) {
        if self.current_page > self.total_pages(len).max(1) {
            self.current_page = 1;
        }
    }

    pub fn page_links(&self, len: usize, width: usize) -> RangeInclusive<usize> {
        page_window_one_based(self.current_page, self.total_pages(len), width)
    }

    /// Zero-based half-open row range of the current page.
    pub fn current_range(&self, len: usize) -> (usize, usize) {
        let start = ((self.current_page - 1) * self.items_per_page).min(len);
        let end = (start + self.items_per_page).min(len);
        (start, end)
    }

    /// "Showing 6-10 of 23" style label; "Showing 0 of 0" when empty.
    pub fn range_label(&self, len: usize) -> String {
        let (start, end) = self.current_range(len);
        if start == end {
            format!("Showing 0 of {}", len)
        } else {
            format!("Showing {}-{} of {}", start + 1, end, len)
        }
    }
}

/// Every paginated sub-table embedded in a report screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubTable {
    Overdue,
    Upcoming,
    History,
    TopVehicles,
    CnhExpiring,
    DriverStats,
    TopRoutes,
    VehicleCosts,
    MonthlyCosts,
    VehicleUtilization,
    IdleVehicles,
    VehicleDepreciation,
}

impl SubTable {
    pub const ALL: [SubTable; 12] = [
        SubTable::Overdue,
        SubTable::Upcoming,
        SubTable::History,
        SubTable::TopVehicles,
        SubTable::CnhExpiring,
        SubTable::DriverStats,
        SubTable::TopRoutes,
        SubTable::VehicleCosts,
        SubTable::MonthlyCosts,
        SubTable::VehicleUtilization,
        SubTable::IdleVehicles,
        SubTable::VehicleDepreciation,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            SubTable::Overdue => "overdue",
            SubTable::Upcoming => "upcoming",
            SubTable::History => "history",
            SubTable::TopVehicles => "top-vehicles",
            SubTable::CnhExpiring => "cnh-expiring",
            SubTable::DriverStats => "driver-stats",
            SubTable::TopRoutes => "top-routes",
            SubTable::VehicleCosts => "vehicle-costs",
            SubTable::MonthlyCosts => "monthly-costs",
            SubTable::VehicleUtilization => "vehicle-utilization",
            SubTable::IdleVehicles => "idle-vehicles",
            SubTable::VehicleDepreciation => "vehicle-depreciation",
        }
    }

    pub fn from_slug(slug: &str) -> Option<SubTable> {
        SubTable::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

impl fmt::Display for SubTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(23, 5), 5);
        assert_eq!(total_pages(20, 5), 4);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn test_last_page_slice() {
        let rows: Vec<u32> = (1..=23).collect();
        assert_eq!(paginated_slice(Some(rows.as_slice()), 5, 5), &[21, 22, 23]);
        assert_eq!(paginated_slice(Some(rows.as_slice()), 1, 5), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_slice_absent_or_empty() {
        let empty: Vec<u32> = Vec::new();
        assert!(paginated_slice(Some(empty.as_slice()), 1, 10).is_empty());
        assert!(paginated_slice::<u32>(None, 1, 10).is_empty());
    }

    #[test]
    fn test_slice_out_of_range_pages() {
        let rows = vec![1, 2, 3];
        assert!(paginated_slice(Some(rows.as_slice()), 0, 10).is_empty());
        assert!(paginated_slice(Some(rows.as_slice()), 4, 10).is_empty());
        assert!(paginated_slice(Some(rows.as_slice()), 1, 0).is_empty());
    }

    #[test]
    fn test_change_page_bounds() {
        let mut pager = SlicePager::new(5);
        assert!(!pager.change_page(0, 23));
        assert!(!pager.change_page(6, 23));
        assert!(pager.change_page(5, 23));
        assert_eq!(pager.current_page(), 5);
        assert!(!pager.change_page(1, 0));
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut pager = SlicePager::new(5);
        pager.change_page(3, 23);
        assert!(pager.on_page_size_change(10));
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.items_per_page(), 10);
        assert_eq!(pager.total_pages(23), 3);
    }

    #[test]
    fn test_page_size_change_rejects_unknown_size() {
        let mut pager = SlicePager::new(5);
        pager.change_page(2, 23);
        assert!(!pager.on_page_size_change(7));
        assert_eq!(pager.items_per_page(), 5);
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_prev_next() {
        let mut pager = SlicePager::new(10);
        assert!(!pager.prev_page());
        assert!(pager.next_page(25));
        assert!(pager.next_page(25));
        assert!(!pager.next_page(25));
        assert_eq!(pager.current_page(), 3);
        assert!(pager.prev_page());
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_clamp_after_rows_shrink() {
        let mut pager = SlicePager::new(5);
        pager.change_page(4, 20);
        pager.clamp_to(12);
        assert_eq!(pager.current_page(), 1);

        pager.change_page(2, 12);
        pager.clamp_to(7);
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_range_label() {
        let mut pager = SlicePager::new(5);
        pager.change_page(2, 23);
        assert_eq!(pager.range_label(23), "Showing 6-10 of 23");
        assert_eq!(SlicePager::new(5).range_label(0), "Showing 0 of 0");
    }

    #[test]
    fn test_page_links_are_one_based() {
        let mut pager = SlicePager::new(5);
        assert_eq!(pager.page_links(60, 5), 1..=5);
        pager.change_page(12, 60);
        assert_eq!(pager.page_links(60, 5), 8..=12);
    }

    #[test]
    fn test_sub_table_slugs_round_trip() {
        for table in SubTable::ALL {
            assert_eq!(SubTable::from_slug(table.slug()), Some(table));
        }
        assert_eq!(SubTable::from_slug("unknown"), None);
    }
}
