use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fleet_console_core::models::{Driver, DriverFilter, DriverStatus};
use fleet_console_core::{
    CompletionOutcome, ConsoleError, FetchTicket, FilterState, ListEndpoint, ListSession,
    ListSettings, PageEnvelope, PagedListController, SlicePager, paginated_slice,
};

const ANAS: [&str; 3] = ["Ana Souza", "Ana Lima", "Ana Costa"];

fn driver(i: usize) -> Driver {
    let name = if i < ANAS.len() {
        ANAS[i].to_string()
    } else {
        format!("Driver {:02}", i)
    };
    Driver {
        id: Some(format!("d-{}", i)),
        name,
        cpf: format!("{:011}", i),
        cnh: format!("{:011}", 90_000 + i),
        cnh_category: "B".to_string(),
        cnh_expiration_date: "2030-01-01".to_string(),
        status: Some(DriverStatus::Active),
        created_at: None,
        updated_at: None,
    }
}

fn roster() -> Vec<Driver> {
    (0..47).map(driver).collect()
}

/// Answers `ticket` the way the back office does: filter by name, then page.
fn serve(rows: &[Driver], ticket: &FetchTicket) -> PageEnvelope<Driver> {
    let needle = ticket
        .query
        .filter
        .get("name")
        .map(|v| v.to_query_value())
        .unwrap_or_default();
    let matching: Vec<Driver> = rows
        .iter()
        .filter(|d| d.name.contains(needle.as_str()))
        .cloned()
        .collect();
    PageEnvelope::from_full(matching, ticket.query.page, ticket.query.size)
}

fn controller() -> PagedListController<Driver> {
    PagedListController::new(ListSettings::new("name", "Failed to load drivers")).unwrap()
}

fn name_filter(name: &str) -> FilterState {
    DriverFilter {
        name: Some(name.to_string()),
        ..Default::default()
    }
    .into()
}

#[test]
fn filtering_47_drivers_down_to_3_resets_to_a_single_page() {
    let rows = roster();
    let mut list = controller();

    let t = list.load().unwrap();
    list.complete(t.seq, Ok(serve(&rows, &t)));
    assert_eq!(list.total_pages(), 5);
    assert_eq!(list.total_elements(), 47);

    let t = list.go_to_page(3).unwrap();
    list.complete(t.seq, Ok(serve(&rows, &t)));
    assert_eq!(list.page(), 3);

    let t = list.set_filter(name_filter("Ana")).unwrap();
    assert_eq!(t.query.page, 0);
    // Old rows stay visible until the new envelope lands.
    assert_eq!(list.rows().len(), 10);

    assert_eq!(list.complete(t.seq, Ok(serve(&rows, &t))), CompletionOutcome::Applied);
    assert_eq!(list.total_pages(), 1);
    assert_eq!(list.page(), 0);
    assert_eq!(list.rows().len(), 3);
    assert_eq!(list.page_window(), 0..1);
}

#[test]
fn only_pages_below_total_are_reachable() {
    let rows = roster();
    let mut list = controller();
    let t = list.load().unwrap();
    list.complete(t.seq, Ok(serve(&rows, &t)));

    let seq = list.latest_seq();
    assert!(list.go_to_page(list.total_pages()).is_none());
    assert!(list.go_to_page(list.total_pages() + 4).is_none());
    assert_eq!(list.latest_seq(), seq);
    assert_eq!(list.page(), 0);

    assert!(list.go_to_page(list.total_pages() - 1).is_some());
}

#[test]
fn first_filter_answered_last_is_discarded() {
    let rows = roster();
    let mut list = controller();

    let first = list.set_filter(name_filter("Driver 1")).unwrap();
    let second = list.set_filter(name_filter("Ana")).unwrap();

    assert_eq!(
        list.complete(second.seq, Ok(serve(&rows, &second))),
        CompletionOutcome::Applied
    );
    assert_eq!(
        list.complete(first.seq, Ok(serve(&rows, &first))),
        CompletionOutcome::Stale
    );
    assert_eq!(list.total_elements(), 3);
    assert!(list.rows().iter().all(|d| d.name.contains("Ana")));
}

#[test]
fn failed_reload_keeps_rows_and_reports_screen_message() {
    let rows = roster();
    let mut list = controller();
    let t = list.load().unwrap();
    list.complete(t.seq, Ok(serve(&rows, &t)));

    let t = list.next_page().unwrap();
    let outcome = list.complete(
        t.seq,
        Err(ConsoleError::MalformedEnvelope("missing `content`".to_string())),
    );
    assert_eq!(outcome, CompletionOutcome::Failed);
    assert_eq!(list.view().error(), Some("Failed to load drivers"));
    assert_eq!(list.rows()[0].name, "Ana Souza");
    assert!(!list.view().is_loading());
}

#[test]
fn client_slice_of_23_rows_at_5_per_page() {
    let rows: Vec<usize> = (1..=23).collect();
    let mut pager = SlicePager::new(5);

    assert_eq!(pager.total_pages(rows.len()), 5);
    assert_eq!(paginated_slice(Some(rows.as_slice()), 5, 5), &[21, 22, 23]);
    assert!(pager.change_page(5, rows.len()));
    assert_eq!(pager.slice(&rows), &[21, 22, 23]);
    assert!(!pager.change_page(6, rows.len()));
}

/// Holds the first request back so it answers after the second.
struct LaggingDrivers {
    rows: Vec<Driver>,
}

impl ListEndpoint<Driver> for LaggingDrivers {
    fn fetch_page(
        &self,
        ticket: &FetchTicket,
    ) -> impl Future<Output = Result<PageEnvelope<Driver>, ConsoleError>> + Send {
        let delay = if ticket.seq == 1 { 300 } else { 100 };
        let envelope = serve(&self.rows, ticket);
        async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(envelope)
        }
    }
}

#[tokio::test(start_paused = true)]
async fn session_discards_late_response_fired_50ms_earlier() {
    let endpoint = Arc::new(LaggingDrivers { rows: roster() });
    let mut session = ListSession::new(controller(), endpoint);

    session.act(|c| c.set_filter(name_filter("Driver")));
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.act(|c| c.set_filter(name_filter("Ana")));

    let outcomes = session.settle().await;
    assert_eq!(
        outcomes,
        vec![CompletionOutcome::Applied, CompletionOutcome::Stale]
    );
    assert_eq!(session.controller().total_elements(), 3);
}
