pub mod error;
pub mod listing;
pub mod search_query;
pub mod search_state;
pub mod sections;

pub use error::SearchError;
pub use listing::{Listing, SearchResponse, SearchResult, LISTING_DATE_FORMAT};
pub use search_query::{JobType, ListingSource, SearchQuery, ToQueryPairs, DEFAULT_PAGE_SIZE};
pub use search_state::{ListingData, SearchState, SERVER_DEFAULT_PAGE_SIZE};
pub use sections::{partition_listings, DataSection, SectionedListings};
