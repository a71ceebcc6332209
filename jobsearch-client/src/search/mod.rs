//! Keyword search pipeline.
//!
//! Keyword edits and "load more" signals go in, a stream of [`SearchState`]s
//! comes out. The network call and the bookmark lookup are injected through
//! [`SearchExecutor`] and [`BookmarkLookup`].
//!
//! [`SearchState`]: shared_types::SearchState

pub mod debounce;
pub mod orchestrator;
pub mod pagination;

pub use orchestrator::{input_channels, InputSender, SearchInput, SearchOrchestrator};
pub use pagination::PaginationTrigger;

use async_trait::async_trait;
use shared_types::{SearchError, SearchQuery, SearchResult};
use std::collections::HashSet;

/// Runs one search against the listing service.
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    async fn execute(&self, query: SearchQuery) -> Result<SearchResult, SearchError>;
}

/// Read access to the ids of bookmarked listings.
pub trait BookmarkLookup: Send + Sync {
    fn bookmarked_ids(&self) -> anyhow::Result<HashSet<i64>>;
}

impl BookmarkLookup for HashSet<i64> {
    fn bookmarked_ids(&self) -> anyhow::Result<HashSet<i64>> {
        Ok(self.clone())
    }
}
