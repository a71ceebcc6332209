use shared_types::{ListingData, SearchError, SearchQuery, SearchResult, SearchState};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::debounce::DebouncedInput;
use super::pagination::PaginationTrigger;
use super::{BookmarkLookup, SearchExecutor};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

type SearchOutcome = Result<SearchResult, SearchError>;

/// Receiving ends of the two input streams of a search run.
pub struct SearchInput {
    pub keywords: mpsc::UnboundedReceiver<String>,
    pub pages: mpsc::UnboundedReceiver<u64>,
}

/// Sending ends of the input streams, held by whatever collects user input.
pub struct InputSender {
    keywords: mpsc::UnboundedSender<String>,
    pagination: PaginationTrigger,
}

impl InputSender {
    /// Report the current text of the keyword field.
    pub fn set_keywords(&self, text: impl Into<String>) {
        let _ = self.keywords.send(text.into());
    }

    /// Ask for the next page of results. Returns the requested page index.
    pub fn load_more(&mut self) -> u64 {
        self.pagination.load_more()
    }

    pub fn current_page(&self) -> u64 {
        self.pagination.current()
    }
}

/// Create a connected input pair. Page 0 is already queued.
pub fn input_channels() -> (InputSender, SearchInput) {
    let (keywords_tx, keywords_rx) = mpsc::unbounded_channel();
    let (pages_tx, pages_rx) = mpsc::unbounded_channel();

    let sender = InputSender {
        keywords: keywords_tx,
        pagination: PaginationTrigger::new(pages_tx),
    };
    let input = SearchInput {
        keywords: keywords_rx,
        pages: pages_rx,
    };

    (sender, input)
}

/// Turns keyword and page input into a stream of search states.
///
/// Each call to [`process`](Self::process) starts a run on its own driver
/// task. The driver owns the debounce timers and is the only place states are
/// emitted from; searches run on separate tasks and report back to it.
pub struct SearchOrchestrator {
    executor: Arc<dyn SearchExecutor>,
    bookmarks: Arc<dyn BookmarkLookup>,
    base_query: SearchQuery,
    debounce: Duration,
    driver: Option<JoinHandle<()>>,
}

impl SearchOrchestrator {
    pub fn new(
        executor: Arc<dyn SearchExecutor>,
        bookmarks: Arc<dyn BookmarkLookup>,
        base_query: SearchQuery,
    ) -> Self {
        Self {
            executor,
            bookmarks,
            base_query,
            debounce: DEFAULT_DEBOUNCE,
            driver: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start a run over `input`, tearing down any previous run first.
    ///
    /// The returned receiver yields `Idle` straight away, then one state per
    /// settled input or completed search. Must be called from within a Tokio
    /// runtime.
    pub fn process(&mut self, input: SearchInput) -> mpsc::UnboundedReceiver<SearchState> {
        self.cancel();

        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        let mut driver = Driver {
            executor: Arc::clone(&self.executor),
            bookmarks: Arc::clone(&self.bookmarks),
            base_query: self.base_query.clone(),
            keywords: DebouncedInput::new(self.debounce),
            pages: DebouncedInput::new(self.debounce),
            latest_keywords: None,
            latest_page: None,
            outcomes_tx,
            in_flight: 0,
            last_emitted: None,
            output: output_tx,
        };
        driver.emit(SearchState::Idle);

        info!(debounce_ms = self.debounce.as_millis() as u64, "Starting search run");
        self.driver = Some(tokio::spawn(driver.run(input, outcomes_rx)));

        output_rx
    }

    /// Stop the current run, if any. Searches already dispatched are left to
    /// finish but their results are dropped.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.driver.take() {
            if !handle.is_finished() {
                debug!("Cancelling previous search run");
            }
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.driver
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Driver {
    executor: Arc<dyn SearchExecutor>,
    bookmarks: Arc<dyn BookmarkLookup>,
    base_query: SearchQuery,
    keywords: DebouncedInput<String>,
    pages: DebouncedInput<u64>,
    latest_keywords: Option<String>,
    latest_page: Option<u64>,
    outcomes_tx: mpsc::UnboundedSender<SearchOutcome>,
    in_flight: usize,
    last_emitted: Option<SearchState>,
    output: mpsc::UnboundedSender<SearchState>,
}

impl Driver {
    async fn run(
        mut self,
        mut input: SearchInput,
        mut outcomes: mpsc::UnboundedReceiver<SearchOutcome>,
    ) {
        let mut keywords_open = true;
        let mut pages_open = true;

        loop {
            let drained = !keywords_open
                && !pages_open
                && !self.keywords.is_pending()
                && !self.pages.is_pending()
                && self.in_flight == 0;
            if drained {
                debug!("Search inputs closed and nothing in flight");
                break;
            }

            let keep_going = tokio::select! {
                text = input.keywords.recv(), if keywords_open => {
                    match text {
                        Some(text) => self.keywords.push(text),
                        None => keywords_open = false,
                    }
                    true
                }
                page = input.pages.recv(), if pages_open => {
                    match page {
                        Some(page) => self.pages.push(page),
                        None => pages_open = false,
                    }
                    true
                }
                settled = self.keywords.settled() => match settled {
                    Some(text) => self.on_keywords(text),
                    None => true,
                },
                settled = self.pages.settled() => match settled {
                    Some(page) => self.on_page(page),
                    None => true,
                },
                Some(outcome) = outcomes.recv() => {
                    self.in_flight -= 1;
                    self.on_outcome(outcome)
                }
                _ = self.output.closed() => false,
            };

            if !keep_going {
                break;
            }
        }

        info!("Search run finished");
    }

    fn on_keywords(&mut self, text: String) -> bool {
        if text.trim().is_empty() {
            debug!("Keywords cleared");
            return self.emit(SearchState::Idle);
        }

        debug!(keywords = %text, "Keywords settled");
        self.latest_keywords = Some(text);
        self.dispatch_latest();
        true
    }

    fn on_page(&mut self, page: u64) -> bool {
        debug!(page, "Page settled");
        self.latest_page = Some(page);
        self.dispatch_latest();
        true
    }

    /// Start a search for the latest keyword/page pair once both are known.
    fn dispatch_latest(&mut self) {
        let (Some(keywords), Some(page)) = (self.latest_keywords.as_deref(), self.latest_page)
        else {
            return;
        };

        let query = self.base_query.for_page(keywords, page);
        debug!(
            keywords,
            page,
            skip = query.results_to_skip.unwrap_or(0),
            "Dispatching search"
        );

        let executor = Arc::clone(&self.executor);
        let outcomes = self.outcomes_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            // a panicking search still has to report back or the run never drains
            let search = tokio::spawn(async move { executor.execute(query).await });
            let outcome = search
                .await
                .unwrap_or_else(|e| Err(SearchError::Task(e.to_string())));
            let _ = outcomes.send(outcome);
        });
    }

    fn on_outcome(&mut self, outcome: SearchOutcome) -> bool {
        let state = match outcome {
            Ok(result) => {
                let bookmarked = self.bookmarked_ids();
                SearchState::loaded(ListingData::new(&result, &bookmarked))
            }
            Err(error) => {
                warn!("Search failed: {}", error);
                SearchState::error(error)
            }
        };
        self.emit(state)
    }

    fn bookmarked_ids(&self) -> HashSet<i64> {
        self.bookmarks.bookmarked_ids().unwrap_or_else(|e| {
            warn!("Failed to read bookmarks, showing results unsectioned: {}", e);
            HashSet::new()
        })
    }

    /// Send `state` unless it repeats the previous emission. Returns `false`
    /// once nobody is listening.
    fn emit(&mut self, state: SearchState) -> bool {
        if let Some(previous) = &self.last_emitted {
            if previous.same_emission(&state) {
                return true;
            }
        }

        debug!(state = state.name(), "Emitting search state");
        self.last_emitted = Some(state.clone());
        self.output.send(state).is_ok()
    }
}
