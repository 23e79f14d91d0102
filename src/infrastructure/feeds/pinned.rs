use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Feed, FeedError};
use crate::domain::entities::listing::Listing;
use crate::domain::values::source::Source;

/// A static listing injected into every run, e.g. a manual-check reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedListing {
    pub source: Source,
    pub title: String,
    pub link: String,
}

/// Costco Hot Buys cannot be scraped; this reminds the reader to look by hand.
pub fn costco_hot_buys_reminder() -> PinnedListing {
    PinnedListing {
        source: Source::Costco,
        title: "🔍 Costco Hot Buys - Manual Check Required (Apple Products Only)".into(),
        link: "https://www.costco.com.au/c/hot-buys".into(),
    }
}

/// Feed that always yields the same configured listings.
pub struct PinnedFeed {
    items: Vec<PinnedListing>,
}

impl PinnedFeed {
    pub fn new(items: Vec<PinnedListing>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl Feed for PinnedFeed {
    fn name(&self) -> &str {
        "pinned"
    }

    async fn fetch(&self) -> Result<Vec<Listing>, FeedError> {
        Ok(self
            .items
            .iter()
            .map(|p| Listing::new(p.source, p.title.clone(), p.link.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_feed_yields_items_in_order() {
        let feed = PinnedFeed::new(vec![
            costco_hot_buys_reminder(),
            PinnedListing {
                source: Source::Gcdb,
                title: "Check GCDB weekly".into(),
                link: "https://gcdb.com.au/".into(),
            },
        ]);
        let rt = tokio::runtime::Runtime::new().unwrap();
        let listings = rt.block_on(feed.fetch()).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].source(), Source::Costco);
        assert_eq!(listings[0].link(), "https://www.costco.com.au/c/hot-buys");
    }
}
