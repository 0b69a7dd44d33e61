pub mod api;
pub mod clock;
pub mod config;
pub mod console;
pub mod controller;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod report;
pub mod session;
pub mod slice;
pub mod view_state;
pub mod window;

pub use api::{FleetClient, Resource};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ConsoleConfig;
pub use console::{EntityKind, FleetConsole, generate_report};
pub use controller::{CompletionOutcome, FetchTicket, ListSettings, PagedListController};
pub use endpoint::{ExportEndpoint, ListEndpoint, ReportEndpoint};
pub use envelope::PageEnvelope;
pub use error::ConsoleError;
pub use export::{DirectorySink, ExportFormat, FileSink, MemorySink, export_report};
pub use query::{FilterState, FilterValue, ListQuery, SortDirection, SortParamStyle, SortState};
pub use report::{ReportPeriod, ReportScreen, ReportTab, ReportTicket, default_period};
pub use session::ListSession;
pub use slice::{SlicePager, SubTable, paginated_slice};
pub use view_state::ViewState;
pub use window::{page_window, page_window_one_based};
