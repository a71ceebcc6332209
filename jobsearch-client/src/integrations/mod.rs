pub mod reed;

pub use reed::ReedClient;
