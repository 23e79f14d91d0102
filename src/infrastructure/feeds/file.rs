use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Feed, FeedError};
use crate::domain::entities::listing::Listing;
use crate::domain::values::source::Source;

#[derive(Debug, Deserialize)]
struct RawListing {
    source: Source,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

/// Reads listings from a JSON array of `{source, title, link}` records.
///
/// Used for offline runs. Records are taken as already filtered, so no
/// keyword check is applied.
pub struct JsonFileFeed {
    name: String,
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("file:{}", path.display()),
            path,
        }
    }

    pub fn parse(json: &str) -> Result<Vec<Listing>, FeedError> {
        let raw: Vec<RawListing> =
            serde_json::from_str(json).map_err(|e| FeedError::Parse(e.to_string()))?;
        Ok(raw
            .into_iter()
            .map(|r| Listing::new(r.source, r.title, r.link))
            .collect())
    }
}

#[async_trait]
impl Feed for JsonFileFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Listing>, FeedError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FeedError::Config(format!("{}: {e}", self.path.display())))?;
        Self::parse(&json)
    }
}
