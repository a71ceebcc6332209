use std::collections::HashSet;
use std::sync::Arc;

use crate::{partition_listings, SearchError, SearchResult, SectionedListings};

/// Page size the server applies when a query does not ask for one.
pub const SERVER_DEFAULT_PAGE_SIZE: i64 = 100;

/// Sectioned listings of one search response plus its paging details.
#[derive(Debug)]
pub struct ListingData {
    pub page_size: i64,
    pub current_page: i64,
    pub listings_total: i64,
    pub sections: SectionedListings,
}

impl ListingData {
    /// Build the state payload for `result`, surfacing `bookmarked_ids` first.
    ///
    /// Paging is derived from the query that produced the response.
    pub fn new(result: &SearchResult, bookmarked_ids: &HashSet<i64>) -> Self {
        let page_size = result
            .query
            .results_to_take
            .unwrap_or(SERVER_DEFAULT_PAGE_SIZE);
        let skip = result.query.results_to_skip.unwrap_or(0);
        let current_page = if page_size > 0 { skip / page_size } else { 0 };

        Self {
            page_size,
            current_page,
            listings_total: result.response.total_results,
            sections: partition_listings(&result.response.results, bookmarked_ids),
        }
    }
}

/// State of a keyword search as seen by whoever renders it.
#[derive(Debug, Clone)]
pub enum SearchState {
    /// Nothing searched yet, or the keywords were cleared.
    Idle,
    /// A request is in flight. Not emitted by the search pipeline today.
    Loading,
    /// The most recent request failed.
    Error(Arc<SearchError>),
    /// The most recent request succeeded.
    Loaded(Arc<ListingData>),
}

impl SearchState {
    pub fn loaded(data: ListingData) -> Self {
        SearchState::Loaded(Arc::new(data))
    }

    pub fn error(error: SearchError) -> Self {
        SearchState::Error(Arc::new(error))
    }

    /// Whether `other` would be a repeat of `self` on the state stream.
    ///
    /// Variants match by case, except `Loaded` which matches only when both
    /// hold the very same `ListingData` instance. Independently built results
    /// with identical content are different emissions.
    pub fn same_emission(&self, other: &SearchState) -> bool {
        match (self, other) {
            (SearchState::Idle, SearchState::Idle) => true,
            (SearchState::Loading, SearchState::Loading) => true,
            (SearchState::Error(_), SearchState::Error(_)) => true,
            (SearchState::Loaded(lhs), SearchState::Loaded(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading => "loading",
            SearchState::Error(_) => "error",
            SearchState::Loaded(_) => "loaded",
        }
    }
}
