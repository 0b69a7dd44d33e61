//! Server-paged list controller.
//!
//! Each list screen owns one controller. User actions mutate the request
//! parameters and hand back a [`FetchTicket`] describing the single request
//! to issue; the caller performs it and feeds the outcome to
//! [`PagedListController::complete`]. Only the completion for the most
//! recently issued ticket is applied.

use std::ops::Range;

use log::{debug, warn};

use crate::envelope::PageEnvelope;
use crate::error::ConsoleError;
use crate::query::{FilterState, ListQuery, SortDirection, SortParamStyle, SortState};
use crate::view_state::ViewState;
use crate::window::{DEFAULT_WINDOW_WIDTH, page_window};

pub const LIST_PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Per-screen configuration of a list controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSettings {
    pub allowed_sizes: Vec<usize>,
    pub page_size: usize,
    pub default_sort: SortState,
    pub sort_style: SortParamStyle,
    /// Message shown when a reload fails.
    pub error_message: String,
    pub window_width: usize,
}

impl ListSettings {
    pub fn new(default_sort: &str, error_message: &str) -> Self {
        Self {
            allowed_sizes: LIST_PAGE_SIZES.to_vec(),
            page_size: 10,
            default_sort: SortState::ascending(default_sort),
            sort_style: SortParamStyle::Combined,
            error_message: error_message.to_string(),
            window_width: DEFAULT_WINDOW_WIDTH,
        }
    }

    pub fn with_page_sizes(mut self, allowed_sizes: Vec<usize>, page_size: usize) -> Self {
        self.allowed_sizes = allowed_sizes;
        self.page_size = page_size;
        self
    }

    pub fn with_sort_style(mut self, style: SortParamStyle) -> Self {
        self.sort_style = style;
        self
    }

    pub fn with_window_width(mut self, width: usize) -> Self {
        self.window_width = width;
        self
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if self.allowed_sizes.is_empty() || self.allowed_sizes.contains(&0) {
            return Err(ConsoleError::InvalidInput(
                "allowed page sizes must be non-empty and positive".to_string(),
            ));
        }
        if !self.allowed_sizes.contains(&self.page_size) {
            return Err(ConsoleError::InvalidInput(format!(
                "page size {} is not one of {:?}",
                self.page_size, self.allowed_sizes
            )));
        }
        if self.window_width == 0 {
            return Err(ConsoleError::InvalidInput(
                "page window width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One outbound request issued by a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ListQuery,
    pub sort_style: SortParamStyle,
}

impl FetchTicket {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.to_query_pairs(self.sort_style)
    }
}

/// What happened to a completion handed to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    Failed,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
    /// The owning screen is gone.
    Disposed,
}

#[derive(Debug)]
pub struct PagedListController<T> {
    settings: ListSettings,
    filter: FilterState,
    sort: SortState,
    page: usize,
    page_size: usize,
    view: ViewState<PageEnvelope<T>>,
    latest_seq: u64,
    disposed: bool,
}

impl<T> PagedListController<T> {
    pub fn new(settings: ListSettings) -> Result<Self, ConsoleError> {
        settings.validate()?;
        Ok(Self {
            filter: FilterState::new(),
            sort: settings.default_sort.clone(),
            page: 0,
            page_size: settings.page_size,
            view: ViewState::new(),
            latest_seq: 0,
            disposed: false,
            settings,
        })
    }

    /// Initial load when the screen opens.
    pub fn load(&mut self) -> Option<FetchTicket> {
        self.reload()
    }

    /// Replaces the filter and starts again from the first page.
    pub fn set_filter(&mut self, filter: FilterState) -> Option<FetchTicket> {
        if self.disposed {
            return None;
        }
        self.filter = filter;
        self.page = 0;
        self.reload()
    }

    pub fn clear_filter(&mut self) -> Option<FetchTicket> {
        self.set_filter(FilterState::new())
    }

    /// Sorts by `field`, flipping the direction if it is already active.
    pub fn set_sort(&mut self, field: &str) -> Option<FetchTicket> {
        if self.disposed {
            return None;
        }
        self.sort.toggle(field);
        self.page = 0;
        self.reload()
    }

    /// Ignored unless `n` is a page of the last received result.
    pub fn go_to_page(&mut self, n: usize) -> Option<FetchTicket> {
        if n >= self.total_pages() {
            debug!("ignoring page {} (total pages {})", n, self.total_pages());
            return None;
        }
        self.page = n;
        self.reload()
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        let prev = self.page.checked_sub(1)?;
        self.go_to_page(prev)
    }

    /// Ignored unless `size` is one of the screen's allowed sizes.
    pub fn set_page_size(&mut self, size: usize) -> Option<FetchTicket> {
        if !self.settings.allowed_sizes.contains(&size) {
            debug!("ignoring page size {} (allowed {:?})", size, self.settings.allowed_sizes);
            return None;
        }
        self.page_size = size;
        self.page = 0;
        self.reload()
    }

    /// Re-issues the current query, e.g. after a row was deleted.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.reload()
    }

    fn reload(&mut self) -> Option<FetchTicket> {
        if self.disposed {
            return None;
        }
        self.latest_seq += 1;
        self.view.begin();

        let ticket = FetchTicket {
            seq: self.latest_seq,
            query: self.current_query(),
            sort_style: self.settings.sort_style,
        };
        debug!("issuing list request #{}: {:?}", ticket.seq, ticket.query_pairs());
        Some(ticket)
    }

    /// Applies the outcome of the request identified by `seq`.
    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<PageEnvelope<T>, ConsoleError>,
    ) -> CompletionOutcome {
        if self.disposed {
            debug!("dropping completion #{} for a disposed controller", seq);
            return CompletionOutcome::Disposed;
        }
        if seq != self.latest_seq {
            debug!("dropping stale completion #{} (latest #{})", seq, self.latest_seq);
            return CompletionOutcome::Stale;
        }

        match result {
            Ok(envelope) => {
                self.page = envelope.number;
                self.view.succeed(envelope);
                CompletionOutcome::Applied
            }
            Err(e) => {
                warn!("list request #{} failed: {}", seq, e);
                // Back to the page of the rows still on screen.
                self.page = self.view.data().map_or(0, |env| env.number);
                self.view.fail(self.settings.error_message.clone());
                CompletionOutcome::Failed
            }
        }
    }

    /// Tears the controller down; later completions are ignored.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn current_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            size: self.page_size,
            sort: self.sort.clone(),
            filter: self.filter.clone(),
        }
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn settings(&self) -> &ListSettings {
        &self.settings
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn view(&self) -> &ViewState<PageEnvelope<T>> {
        &self.view
    }

    pub fn rows(&self) -> &[T] {
        self.view.data().map(|e| e.content.as_slice()).unwrap_or(&[])
    }

    pub fn total_pages(&self) -> usize {
        self.view.data().map(|e| e.total_pages).unwrap_or(0)
    }

    pub fn total_elements(&self) -> u64 {
        self.view.data().map(|e| e.total_elements).unwrap_or(0)
    }

    pub fn page_window(&self) -> Range<usize> {
        page_window(self.page, self.total_pages(), self.settings.window_width)
    }

    /// Direction shown next to a column header, `None` if not sorted by it.
    pub fn sort_indicator(&self, field: &str) -> Option<SortDirection> {
        (self.sort.field == field).then_some(self.sort.direction)
    }
}
