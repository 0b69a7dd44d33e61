//! Bounded page-number windows for pagination links.
//!
//! The window is centered on the current page where possible and slides to
//! stay inside `[0, total)` at either end, so it never runs past the bounds.

use std::ops::{Range, RangeInclusive};

pub const DEFAULT_WINDOW_WIDTH: usize = 5;

/// Zero-based window of at most `width` pages around `current`.
pub fn page_window(current: usize, total: usize, width: usize) -> Range<usize> {
    if total == 0 || width == 0 {
        return 0..0;
    }

    let mut start = current.saturating_sub(width / 2);
    let end = (start + width).min(total);

    if end.saturating_sub(start) < width {
        start = end.saturating_sub(width);
    }

    start..end
}

/// One-based variant for callers whose pages start at 1.
///
/// Converts to zero-based at the boundary (`current - 1`), computes the
/// window, and shifts the result back up by one. Returns an empty range
/// (`1..=0`) when there are no pages.
pub fn page_window_one_based(current: usize, total: usize, width: usize) -> RangeInclusive<usize> {
    let window = page_window(current.saturating_sub(1), total, width);
    if window.is_empty() {
        #[allow(clippy::reversed_empty_ranges)]
        return 1..=0;
    }
    (window.start + 1)..=window.end
}
