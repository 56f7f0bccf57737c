use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::debounce::debounce;
use crate::models::ViewMode;
use crate::query::criteria::FilterCriteria;
use crate::query::engine::{Batch, QueryEngine, ResultCount, SearchTicket};
use crate::query::sort::SortKey;

/// Presentation side of a search page
pub trait RenderSink: Send {
    /// A search was dispatched; results are pending
    fn loading(&mut self);

    /// Show a batch of listings (possibly empty)
    fn render(&mut self, batch: &Batch<'_>);

    fn result_count(&mut self, count: ResultCount);

    fn load_more_visible(&mut self, visible: bool);

    /// The shareable URL query changed
    fn query_changed(&mut self, query: &str);
}

/// User input reaching the search page
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Criteria(FilterCriteria),
    Sort(SortKey),
    View(ViewMode),
    LoadMore,
    Reset,
}

/// Drives a `QueryEngine` and its renderer with simulated result latency
pub struct SearchSession<S> {
    engine: QueryEngine,
    sink: S,
    latency: Duration,
}

impl<S: RenderSink> SearchSession<S> {
    pub fn new(engine: QueryEngine, sink: S, latency: Duration) -> Self {
        Self {
            engine,
            sink,
            latency,
        }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (QueryEngine, S) {
        (self.engine, self.sink)
    }

    /// Search on the current criteria
    pub async fn search(&mut self) {
        let ticket = self.dispatch();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.finish(ticket);
    }

    pub async fn handle(&mut self, event: SearchEvent) {
        debug!(?event, "search event");
        match event {
            SearchEvent::Criteria(criteria) => {
                self.engine.set_criteria(criteria);
                self.search().await;
            }
            SearchEvent::Sort(sort) => {
                self.engine.set_sort(sort);
                self.search().await;
            }
            SearchEvent::View(view) => {
                if let Some(batch) = self.engine.set_view(view) {
                    self.sink.render(&batch);
                }
                self.refresh_controls();
            }
            SearchEvent::LoadMore => {
                let batch = self.engine.load_more();
                if !batch.listings.is_empty() {
                    self.sink.render(&batch);
                }
                self.refresh_controls();
            }
            SearchEvent::Reset => {
                self.engine.set_criteria(FilterCriteria::default());
                self.engine.set_sort(SortKey::default());
                self.search().await;
            }
        }
    }

    /// Process events until the sender side closes
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<SearchEvent>) -> Self {
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
        self
    }

    /// Like `run`, but criteria edits only trigger a search once `quiet` has
    /// passed without a newer edit. Other events are handled immediately.
    pub async fn run_debounced(
        mut self,
        mut events: mpsc::UnboundedReceiver<SearchEvent>,
        quiet: Duration,
    ) -> Self {
        let (edits_tx, edits_rx) = mpsc::unbounded_channel();
        let mut settled = debounce(edits_rx, quiet);
        let mut edits_tx = Some(edits_tx);

        loop {
            tokio::select! {
                event = events.recv(), if edits_tx.is_some() => match event {
                    Some(SearchEvent::Criteria(criteria)) => {
                        if let Some(tx) = &edits_tx {
                            let _ = tx.send(criteria);
                        }
                    }
                    Some(event) => self.handle(event).await,
                    // closing the edit channel flushes any pending edit
                    None => edits_tx = None,
                },
                criteria = settled.recv() => match criteria {
                    Some(criteria) => self.handle(SearchEvent::Criteria(criteria)).await,
                    None => break,
                },
            }
        }
        self
    }

    fn dispatch(&mut self) -> SearchTicket {
        let ticket = self.engine.begin_search();
        self.sink.loading();
        self.sink.load_more_visible(false);
        ticket
    }

    fn finish(&mut self, ticket: SearchTicket) {
        if let Some(batch) = self.engine.complete_search(ticket) {
            self.sink.render(&batch);
            self.refresh_controls();
            self.sink.query_changed(&self.engine.query_string());
        }
    }

    fn refresh_controls(&mut self) {
        self.sink.result_count(self.engine.result_count());
        self.sink.load_more_visible(self.engine.load_more_visible());
    }
}
