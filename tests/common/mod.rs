//! Shared test helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use stackradar::domain::entities::annotated_listing::AnnotatedListing;
use stackradar::domain::entities::listing::Listing;
use stackradar::domain::values::signal_config::SignalConfig;
use stackradar::domain::values::source::Source;
use stackradar::infrastructure::config::RadarConfig;
use stackradar::infrastructure::feeds::{Feed, FeedError};
use stackradar::StackRadar;

/// A feed that always returns the same listings.
pub struct FixtureFeed {
    pub name: String,
    pub listings: Vec<Listing>,
}

#[async_trait]
impl Feed for FixtureFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Listing>, FeedError> {
        Ok(self.listings.clone())
    }
}

/// A feed that always fails, standing in for an unreachable site.
pub struct DownFeed;

#[async_trait]
impl Feed for DownFeed {
    fn name(&self) -> &str {
        "down"
    }

    async fn fetch(&self) -> Result<Vec<Listing>, FeedError> {
        Err(FeedError::Network("503 Service Unavailable".into()))
    }
}

pub fn fixture(name: &str, source: Source, items: &[(&str, &str)]) -> Box<dyn Feed> {
    Box::new(FixtureFeed {
        name: name.to_string(),
        listings: items
            .iter()
            .map(|(title, link)| Listing::new(source, *title, *link))
            .collect(),
    })
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

pub fn enrich(title: &str) -> AnnotatedListing {
    stackradar::application::enrich::enrich(
        Listing::new(Source::OzBargain, title, format!("https://example.com/{title}")),
        &SignalConfig::default(),
    )
}

/// A radar wired to a realistic mix of sources, one of them down.
pub fn setup() -> StackRadar {
    let feeds = vec![
        fixture(
            "freepoints",
            Source::FreePoints,
            &[
                ("Ultimate Gift Cards 20x Points at Woolworths", "https://freepoints.com.au/ultimate-20x"),
                ("Apple Gift Cards at Coles - 10x Everyday Rewards Points", "https://freepoints.com.au/apple-10x"),
            ],
        ),
        Box::new(DownFeed),
        fixture(
            "ozbargain",
            Source::OzBargain,
            &[
                ("MacBook Pro M4 at Officeworks - Click & Collect", "https://www.ozbargain.com.au/node/1"),
                ("M4 Mac Mini at JB Hi-Fi - Online Only", "https://www.ozbargain.com.au/node/2"),
                ("ultimate gift cards 20x points at woolworths", "https://www.ozbargain.com.au/node/3"),
                ("ShopBack 5% at Coles", "https://www.ozbargain.com.au/node/4"),
            ],
        ),
    ];
    let trending = fixture(
        "trending",
        Source::OzBargain,
        &[("Hot: cheap flights to Bali this week", "https://www.ozbargain.com.au/node/9")],
    );
    StackRadar::with_feeds(RadarConfig::default(), feeds, Some(trending))
}
