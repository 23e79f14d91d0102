//! Report views assembled from enriched, deduplicated listings.
//!
//! Builders are pure: they take the listings and the report date, so the
//! same inputs always give the same views.

use chrono::NaiveDate;
use serde::Serialize;

use crate::application::dedup::{self, rank_order};
use crate::application::enrich;
use crate::domain::entities::annotated_listing::AnnotatedListing;
use crate::domain::entities::listing::Listing;
use crate::domain::values::signal_config::SignalConfig;
use crate::domain::values::source::Source;

/// Enrich every listing then collapse duplicates, preserving arrival order.
pub fn prepare(listings: Vec<Listing>, config: &SignalConfig) -> Vec<AnnotatedListing> {
    dedup::deduplicate(enrich::enrich_all(listings, config))
}

/// Top-N stacks plus the excluded side channel.
#[derive(Debug, Clone, Serialize)]
pub struct StackReport {
    pub date: NaiveDate,
    pub top_n: usize,
    pub top: Vec<AnnotatedListing>,
    pub excluded: Vec<AnnotatedListing>,
}

pub fn build_stack_report(date: NaiveDate, listings: &[AnnotatedListing], top_n: usize) -> StackReport {
    StackReport {
        date,
        top_n,
        top: dedup::select_top(listings, top_n),
        excluded: listings.iter().filter(|l| l.is_excluded()).cloned().collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceGroup {
    pub source: Source,
    pub listings: Vec<AnnotatedListing>,
}

/// Every non-excluded listing grouped by source, plus trending deals.
#[derive(Debug, Clone, Serialize)]
pub struct DailyFeed {
    pub date: NaiveDate,
    pub keywords: Vec<String>,
    /// One group per source in [`Source::ALL`] order, possibly empty.
    pub groups: Vec<SourceGroup>,
    pub excluded: Vec<AnnotatedListing>,
    pub trending: Vec<Listing>,
}

impl DailyFeed {
    pub fn main_count(&self) -> usize {
        self.groups.iter().map(|g| g.listings.len()).sum()
    }
}

pub fn build_daily_feed(
    date: NaiveDate,
    listings: &[AnnotatedListing],
    mut trending: Vec<Listing>,
    trending_limit: usize,
    config: &SignalConfig,
) -> DailyFeed {
    let parts = dedup::partition(listings.to_vec());

    let groups = Source::ALL
        .iter()
        .map(|&source| {
            let mut group: Vec<AnnotatedListing> = parts
                .main
                .iter()
                .filter(|l| l.listing.source() == source)
                .cloned()
                .collect();
            group.sort_by(rank_order);
            SourceGroup {
                source,
                listings: group,
            }
        })
        .collect();

    trending.truncate(trending_limit);

    DailyFeed {
        date,
        keywords: config.keywords.clone(),
        groups,
        excluded: parts.excluded,
        trending,
    }
}

/// Both views. A view that could not be built carries its error message.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub date: NaiveDate,
    pub stack: Result<StackReport, String>,
    pub daily: Result<DailyFeed, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(source: Source, title: &str, link: &str) -> Listing {
        Listing::new(source, title, link)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_stack_report_partitions_excluded() {
        let cfg = SignalConfig::default();
        let listings = prepare(
            vec![
                listing(Source::OzBargain, "M4 Mac Mini at JB Hi-Fi - Online Only", "https://o/1"),
                listing(Source::FreePoints, "Ultimate Gift Cards 20x Points at Woolworths", "https://f/1"),
            ],
            &cfg,
        );
        let report = build_stack_report(date(), &listings, 5);
        assert_eq!(report.top.len(), 1);
        assert_eq!(report.excluded.len(), 1);
        assert!(report.excluded[0].title().contains("M4"));
    }

    #[test]
    fn test_daily_groups_follow_source_order_and_rank() {
        let cfg = SignalConfig::default();
        let listings = prepare(
            vec![
                listing(Source::OzBargain, "Coles gift card deal", "https://o/1"),
                listing(Source::Gcdb, "10x points on TCN gift cards", "https://g/1"),
                listing(Source::OzBargain, "30x points on Ultimate gift cards", "https://o/2"),
            ],
            &cfg,
        );
        let feed = build_daily_feed(date(), &listings, Vec::new(), 10, &cfg);
        let order: Vec<Source> = feed.groups.iter().map(|g| g.source).collect();
        assert_eq!(order, Source::ALL.to_vec());
        let ozb = &feed.groups[2].listings;
        assert_eq!(ozb[0].title(), "30x points on Ultimate gift cards");
        assert_eq!(feed.groups[1].listings.len(), 1);
        assert_eq!(feed.main_count(), 3);
    }

    #[test]
    fn test_trending_truncated() {
        let cfg = SignalConfig::default();
        let trending = (0..15)
            .map(|i| listing(Source::OzBargain, &format!("Hot deal number {i}"), &format!("https://o/{i}")))
            .collect();
        let feed = build_daily_feed(date(), &[], trending, 10, &cfg);
        assert_eq!(feed.trending.len(), 10);
        assert!(feed.groups.iter().all(|g| g.listings.is_empty()));
    }
}
