/// Ways a single search can fail.
///
/// Every variant ends up in a `SearchState::Error`; none of them stop the
/// search pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Search task failed: {0}")]
    Task(String),
}
