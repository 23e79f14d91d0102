//! Ingestion use case — runs every feed in order and concatenates their
//! listings. A failing feed contributes zero listings; the others still run.

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::entities::listing::Listing;
use crate::infrastructure::feeds::{Feed, FeedResult};

/// Listings from all feeds plus a per-feed account of what happened.
#[derive(Debug, Serialize)]
pub struct Ingestion {
    pub listings: Vec<Listing>,
    pub feeds_run: usize,
    pub feeds_failed: usize,
    pub results: Vec<FeedResult>,
}

pub struct IngestUseCase {
    feeds: Vec<Box<dyn Feed>>,
}

impl IngestUseCase {
    pub fn new(feeds: Vec<Box<dyn Feed>>) -> Self {
        Self { feeds }
    }

    /// Feed names in run order.
    pub fn feed_names(&self) -> Vec<&str> {
        self.feeds.iter().map(|f| f.name()).collect()
    }

    /// Fetch from each feed sequentially so arrival order matches feed order.
    pub async fn execute(&self) -> Ingestion {
        let mut listings = Vec::new();
        let mut results = Vec::with_capacity(self.feeds.len());
        let mut feeds_failed = 0usize;

        for feed in &self.feeds {
            match feed.fetch().await {
                Ok(mut fetched) => {
                    info!(feed = feed.name(), count = fetched.len(), "feed fetched");
                    results.push(FeedResult {
                        feed_name: feed.name().to_string(),
                        listings_fetched: fetched.len(),
                        errors: Vec::new(),
                    });
                    listings.append(&mut fetched);
                }
                Err(e) => {
                    warn!(feed = feed.name(), error = %e, "feed failed; treating as empty");
                    feeds_failed += 1;
                    results.push(FeedResult {
                        feed_name: feed.name().to_string(),
                        listings_fetched: 0,
                        errors: vec![e.to_string()],
                    });
                }
            }
        }

        Ingestion {
            listings,
            feeds_run: self.feeds.len(),
            feeds_failed,
            results,
        }
    }
}
