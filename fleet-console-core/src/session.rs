//! Async driver for a [`PagedListController`].
//!
//! Every issued ticket runs on its own task; results come back over a
//! channel and are applied on the owner's task, so controller state is only
//! ever mutated from one place.

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::{CompletionOutcome, FetchTicket, PagedListController};
use crate::endpoint::ListEndpoint;
use crate::envelope::PageEnvelope;
use crate::error::ConsoleError;

type Completion<T> = (u64, Result<PageEnvelope<T>, ConsoleError>);

/// Reports a request back exactly once. Dropped unanswered (the endpoint
/// panicked), it reports a failure so `in_flight` still drains.
struct CompletionGuard<T> {
    seq: u64,
    tx: Option<UnboundedSender<Completion<T>>>,
}

impl<T> CompletionGuard<T> {
    fn finish(mut self, result: Result<PageEnvelope<T>, ConsoleError>) {
        if let Some(tx) = self.tx.take() {
            // The receiver is gone only when the session was dropped.
            let _ = tx.send((self.seq, result));
        }
    }

    fn abandon(mut self) {
        self.tx = None;
    }
}

impl<T> Drop for CompletionGuard<T> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            warn!(seq = self.seq, "list request ended without a response");
            let _ = tx.send((
                self.seq,
                Err(ConsoleError::TaskFailed(format!(
                    "list request #{} ended without a response",
                    self.seq
                ))),
            ));
        }
    }
}

pub struct ListSession<T, E> {
    controller: PagedListController<T>,
    endpoint: Arc<E>,
    completion_tx: UnboundedSender<Completion<T>>,
    completion_rx: UnboundedReceiver<Completion<T>>,
    cancel_token: CancellationToken,
    in_flight: usize,
}

impl<T, E> ListSession<T, E>
where
    T: Send + 'static,
    E: ListEndpoint<T>,
{
    pub fn new(controller: PagedListController<T>, endpoint: Arc<E>) -> Self {
        let (completion_tx, completion_rx) = unbounded_channel();
        Self {
            controller,
            endpoint,
            completion_tx,
            completion_rx,
            cancel_token: CancellationToken::new(),
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &PagedListController<T> {
        &self.controller
    }

    /// Runs one controller action and submits the ticket it issues, if any.
    pub fn act<F>(&mut self, action: F) -> bool
    where
        F: FnOnce(&mut PagedListController<T>) -> Option<FetchTicket>,
    {
        match action(&mut self.controller) {
            Some(ticket) => {
                self.submit(ticket);
                true
            }
            None => false,
        }
    }

    /// Starts the request described by `ticket` in the background.
    pub fn submit(&mut self, ticket: FetchTicket) {
        if self.cancel_token.is_cancelled() {
            debug!(seq = ticket.seq, "session closed, not submitting");
            return;
        }

        let endpoint = Arc::clone(&self.endpoint);
        let guard = CompletionGuard {
            seq: ticket.seq,
            tx: Some(self.completion_tx.clone()),
        };
        let token = self.cancel_token.clone();
        self.in_flight += 1;
        debug!(seq = ticket.seq, in_flight = self.in_flight, "submitting list request");

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(seq = ticket.seq, "list request abandoned");
                    guard.abandon();
                }
                result = endpoint.fetch_page(&ticket) => guard.finish(result),
            }
        });
    }

    /// Waits for the next response and applies it. `None` when nothing is
    /// outstanding or the session is closed.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        if self.in_flight == 0 || self.cancel_token.is_cancelled() {
            return None;
        }
        let (seq, result) = self.completion_rx.recv().await?;
        Some(self.apply(seq, result))
    }

    /// Applies every response that has already arrived, without waiting.
    pub fn pump(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok((seq, result)) = self.completion_rx.try_recv() {
            outcomes.push(self.apply(seq, result));
        }
        outcomes
    }

    /// Waits until every submitted request has answered.
    pub async fn settle(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next_completion().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    fn apply(
        &mut self,
        seq: u64,
        result: Result<PageEnvelope<T>, ConsoleError>,
    ) -> CompletionOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let outcome = self.controller.complete(seq, result);
        debug!(seq, ?outcome, "applied list response");
        outcome
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Abandons outstanding requests and disposes the controller.
    pub fn close(&mut self) {
        info!(in_flight = self.in_flight, "closing list session");
        self.cancel_token.cancel();
        self.controller.dispose();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl<T, E> Drop for ListSession<T, E> {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::controller::ListSettings;
    use crate::query::FilterState;

    /// Serves names matching the `name` filter; a `slow` filter value delays
    /// the response.
    struct NameEndpoint {
        names: Vec<String>,
        calls: AtomicUsize,
    }

    impl NameEndpoint {
        fn new(count: usize) -> Self {
            Self {
                names: (0..count).map(|i| format!("Driver {}", i)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ListEndpoint<String> for NameEndpoint {
        fn fetch_page(
            &self,
            ticket: &FetchTicket,
        ) -> impl Future<Output = Result<PageEnvelope<String>, ConsoleError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let needle = ticket
                .query
                .filter
                .get("name")
                .map(|v| v.to_query_value())
                .unwrap_or_default();
            let delay = if needle == "slow" { 500 } else { 20 };
            let panics = needle == "panic";
            let rows: Vec<String> = self
                .names
                .iter()
                .filter(|n| needle == "slow" || n.contains(needle.as_str()))
                .cloned()
                .collect();
            let (page, size) = (ticket.query.page, ticket.query.size);
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if panics {
                    panic!("endpoint blew up");
                }
                Ok(PageEnvelope::from_full(rows, page, size))
            }
        }
    }

    fn session(count: usize) -> ListSession<String, NameEndpoint> {
        let controller =
            PagedListController::new(ListSettings::new("name", "Failed to load drivers")).unwrap();
        ListSession::new(controller, Arc::new(NameEndpoint::new(count)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_applies_first_page() {
        let mut s = session(23);
        assert!(s.act(|c| c.load()));
        assert_eq!(s.next_completion().await, Some(CompletionOutcome::Applied));
        assert_eq!(s.controller().rows().len(), 10);
        assert_eq!(s.controller().total_pages(), 3);
        assert_eq!(s.next_completion().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_of_earlier_filter_is_discarded() {
        let mut s = session(30);
        s.act(|c| c.set_filter(FilterState::new().with("name", Some("slow"))));
        s.act(|c| c.set_filter(FilterState::new().with("name", Some("Driver 2"))));

        let outcomes = s.settle().await;
        assert_eq!(
            outcomes,
            vec![CompletionOutcome::Applied, CompletionOutcome::Stale]
        );
        // "Driver 2" and "Driver 20".."Driver 29"
        assert_eq!(s.controller().total_elements(), 11);
        assert!(!s.controller().view().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_action_submits_nothing() {
        let mut s = session(5);
        s.act(|c| c.load());
        s.settle().await;
        assert!(!s.act(|c| c.next_page()));
        assert_eq!(s.in_flight(), 0);
        assert_eq!(s.endpoint.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_abandons_pending_requests() {
        let mut s = session(10);
        s.act(|c| c.load());
        s.close();

        assert_eq!(s.next_completion().await, None);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(s.pump().is_empty());
        assert!(s.controller().is_disposed());
        assert!(s.controller().rows().is_empty());
        assert!(!s.act(|c| c.refresh()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_endpoint_still_settles() {
        let mut s = session(12);
        s.act(|c| c.load());
        s.settle().await;

        s.act(|c| c.set_filter(FilterState::new().with("name", Some("panic"))));
        let outcomes = s.settle().await;
        assert_eq!(outcomes, vec![CompletionOutcome::Failed]);
        assert_eq!(s.in_flight(), 0);
        assert_eq!(s.controller().view().error(), Some("Failed to load drivers"));
        assert_eq!(s.controller().rows().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pump_applies_arrived_responses() {
        let mut s = session(12);
        s.act(|c| c.load());
        assert!(s.pump().is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(s.pump(), vec![CompletionOutcome::Applied]);
        assert_eq!(s.controller().rows().len(), 10);
    }
}
