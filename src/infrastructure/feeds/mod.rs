pub mod anchor;
pub mod file;
pub mod pinned;

use crate::domain::entities::listing::Listing;
use async_trait::async_trait;

/// A source of raw deal listings.
#[async_trait]
pub trait Feed: Send + Sync {
    /// Human-readable name of this feed.
    fn name(&self) -> &str;

    /// Fetch listings, already filtered to plausibly relevant titles.
    async fn fetch(&self) -> Result<Vec<Listing>, FeedError>;
}

#[derive(Debug)]
pub enum FeedError {
    /// HTTP or network error
    Network(String),
    /// Response parsing error
    Parse(String),
    /// Configuration error (bad selector, unreadable input file, etc.)
    Config(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Network(msg) => write!(f, "Network error: {msg}"),
            FeedError::Parse(msg) => write!(f, "Parse error: {msg}"),
            FeedError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Outcome of running one feed during ingestion.
#[derive(Debug, serde::Serialize)]
pub struct FeedResult {
    pub feed_name: String,
    pub listings_fetched: usize,
    pub errors: Vec<String>,
}
