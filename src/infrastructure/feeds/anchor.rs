//! Generic anchor-scraping feed.
//!
//! Each site is described by an [`AnchorFeedSpec`]: which pages to fetch,
//! which anchors to select, and which titles to keep. Parsing is a plain
//! function over the fetched HTML so it can be exercised without a network.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Feed, FeedError};
use crate::application::signals;
use crate::domain::entities::listing::Listing;
use crate::domain::values::signal_config::SignalConfig;
use crate::domain::values::source::Source;

const USER_AGENT: &str = "Mozilla/5.0 DealAgent/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const OZBARGAIN: &str = "https://www.ozbargain.com.au";
const NODE_ANCHORS: &str = "a[href^='/node/']";

fn default_selector() -> String {
    "a".to_string()
}

fn default_limit() -> usize {
    10
}

/// How to scrape one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorFeedSpec {
    pub name: String,
    pub source: Source,
    /// Tried in order; the first page that loads is used.
    pub urls: Vec<String>,
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Prepended to links starting with `/`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Resolved links must start with this.
    #[serde(default)]
    pub link_prefix: Option<String>,
    /// Lowercase title must contain at least one of these (when non-empty).
    #[serde(default)]
    pub any_of: Vec<String>,
    /// Lowercase title must contain all of these.
    #[serde(default)]
    pub all_of: Vec<String>,
    /// Lowercase title must contain none of these.
    #[serde(default)]
    pub none_of: Vec<String>,
    /// Keep only titles matching a configured relevance keyword.
    #[serde(default)]
    pub keyword_filter: bool,
    #[serde(default)]
    pub min_title_len: usize,
    /// Only the first `scan_limit` selected anchors are considered.
    #[serde(default)]
    pub scan_limit: Option<usize>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl AnchorFeedSpec {
    fn keeps(&self, title: &str, config: &SignalConfig) -> bool {
        if title.is_empty() || title.chars().count() < self.min_title_len {
            return false;
        }
        let lower = title.to_lowercase();
        if !self.any_of.is_empty() && !self.any_of.iter().any(|w| lower.contains(w.as_str())) {
            return false;
        }
        if !self.all_of.iter().all(|w| lower.contains(w.as_str())) {
            return false;
        }
        if self.none_of.iter().any(|w| lower.contains(w.as_str())) {
            return false;
        }
        !self.keyword_filter || signals::matches_keywords(title, config)
    }

    fn resolve_link(&self, href: &str) -> Option<String> {
        let link = match &self.base_url {
            Some(base) if href.starts_with('/') => {
                format!("{}{href}", base.trim_end_matches('/'))
            }
            _ => href.to_string(),
        };
        match &self.link_prefix {
            Some(prefix) if !link.starts_with(prefix.as_str()) => None,
            _ => Some(link),
        }
    }
}

/// Pulls listings out of a fetched page according to `spec`.
///
/// Links are deduplicated within the page, first occurrence wins, and at
/// most `spec.limit` listings are returned.
pub fn extract_anchors(
    html: &str,
    spec: &AnchorFeedSpec,
    config: &SignalConfig,
) -> Result<Vec<Listing>, FeedError> {
    let selector = Selector::parse(&spec.selector)
        .map_err(|e| FeedError::Config(format!("Invalid selector {:?}: {e:?}", spec.selector)))?;
    let document = Html::parse_document(html);

    let scan_limit = spec.scan_limit.unwrap_or(usize::MAX);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for element in document.select(&selector).take(scan_limit) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let title = signals::normalize(&element.text().collect::<Vec<_>>().join(" "));
        if !spec.keeps(&title, config) {
            continue;
        }
        let Some(link) = spec.resolve_link(href) else {
            continue;
        };
        if !seen.insert(link.clone()) {
            continue;
        }
        out.push(Listing::new(spec.source, title, link));
        if out.len() >= spec.limit {
            break;
        }
    }

    Ok(out)
}

/// A feed that scrapes anchors from a deal site.
pub struct AnchorFeed {
    spec: AnchorFeedSpec,
    config: Arc<SignalConfig>,
    client: reqwest::Client,
}

impl AnchorFeed {
    pub fn new(spec: AnchorFeedSpec, config: Arc<SignalConfig>) -> Self {
        Self {
            spec,
            config,
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn spec(&self) -> &AnchorFeedSpec {
        &self.spec
    }

    async fn fetch_page(&self, url: &str) -> Result<String, FeedError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!(
                "{url} returned {}",
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Feed for AnchorFeed {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn fetch(&self) -> Result<Vec<Listing>, FeedError> {
        let mut last_error = FeedError::Config(format!("{}: no URLs configured", self.spec.name));

        for url in &self.spec.urls {
            match self.fetch_page(url).await {
                Ok(html) => {
                    let listings = extract_anchors(&html, &self.spec, &self.config)?;
                    debug!(feed = %self.spec.name, url = %url, count = listings.len(), "page scraped");
                    return Ok(listings);
                }
                Err(e) => {
                    warn!(feed = %self.spec.name, url = %url, error = %e, "page fetch failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in specs for the stack and daily views, in ingestion order.
pub fn default_feeds() -> Vec<AnchorFeedSpec> {
    vec![
        AnchorFeedSpec {
            name: "freepoints".into(),
            source: Source::FreePoints,
            urls: strings(&["https://freepoints.com.au/"]),
            selector: default_selector(),
            base_url: None,
            link_prefix: Some("https://freepoints.com.au/".into()),
            any_of: strings(&["points", "gift card"]),
            all_of: Vec::new(),
            none_of: Vec::new(),
            keyword_filter: true,
            min_title_len: 0,
            scan_limit: None,
            limit: 15,
        },
        AnchorFeedSpec {
            name: "gcdb".into(),
            source: Source::Gcdb,
            urls: strings(&["https://gcdb.com.au/"]),
            selector: default_selector(),
            base_url: None,
            link_prefix: Some("https://gcdb.com.au/".into()),
            any_of: strings(&["gift card", "points", "off"]),
            all_of: Vec::new(),
            none_of: Vec::new(),
            keyword_filter: true,
            min_title_len: 0,
            scan_limit: None,
            limit: 15,
        },
        AnchorFeedSpec {
            name: "ozbargain".into(),
            source: Source::OzBargain,
            urls: vec![format!("{OZBARGAIN}/")],
            selector: NODE_ANCHORS.into(),
            base_url: Some(OZBARGAIN.into()),
            link_prefix: None,
            any_of: Vec::new(),
            all_of: Vec::new(),
            none_of: Vec::new(),
            keyword_filter: true,
            min_title_len: 0,
            scan_limit: None,
            limit: 20,
        },
        AnchorFeedSpec {
            name: "costco-via-ozbargain".into(),
            source: Source::CostcoViaOzBargain,
            urls: vec![format!("{OZBARGAIN}/?q=costco+apple")],
            selector: NODE_ANCHORS.into(),
            base_url: Some(OZBARGAIN.into()),
            link_prefix: None,
            any_of: Vec::new(),
            all_of: strings(&["costco", "apple"]),
            none_of: strings(&["gift"]),
            keyword_filter: false,
            min_title_len: 0,
            scan_limit: Some(5),
            limit: 5,
        },
    ]
}

/// OzBargain hot deals, falling back to the front page.
pub fn default_trending() -> AnchorFeedSpec {
    AnchorFeedSpec {
        name: "ozbargain-trending".into(),
        source: Source::OzBargain,
        urls: vec![format!("{OZBARGAIN}/hot"), format!("{OZBARGAIN}/")],
        selector: NODE_ANCHORS.into(),
        base_url: Some(OZBARGAIN.into()),
        link_prefix: None,
        any_of: Vec::new(),
        all_of: Vec::new(),
        none_of: Vec::new(),
        keyword_filter: false,
        min_title_len: 10,
        scan_limit: None,
        limit: 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OZB_PAGE: &str = r#"
        <html><body>
          <a href="/node/1">Ultimate Gift Cards 20x   Points at Woolworths</a>
          <a href="/node/1">Ultimate Gift Cards 20x Points at Woolworths (dup)</a>
          <a href="/node/2">Cheap socks</a>
          <a href="/wiki/faq">Gift card FAQ</a>
          <a href="/node/3"><span>Apple</span> <b>gift card</b> bonus</a>
          <a>no href gift card</a>
        </body></html>
    "#;

    fn spec_named(name: &str) -> AnchorFeedSpec {
        default_feeds()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn test_resolves_relative_links_and_dedups() {
        let cfg = SignalConfig::default();
        let listings = extract_anchors(OZB_PAGE, &spec_named("ozbargain"), &cfg).unwrap();
        let titles: Vec<&str> = listings.iter().map(|l| l.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Ultimate Gift Cards 20x Points at Woolworths",
                "Apple gift card bonus"
            ]
        );
        assert_eq!(listings[0].link(), "https://www.ozbargain.com.au/node/1");
        assert_eq!(listings[0].source(), Source::OzBargain);
    }

    #[test]
    fn test_link_prefix_and_any_of() {
        let html = r#"
            <a href="https://freepoints.com.au/a">20x points on Coles gift cards</a>
            <a href="https://elsewhere.com/b">20x points on Coles gift cards elsewhere</a>
            <a href="https://freepoints.com.au/c">Coles opening hours</a>
        "#;
        let cfg = SignalConfig::default();
        let listings = extract_anchors(html, &spec_named("freepoints"), &cfg).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].link(), "https://freepoints.com.au/a");
    }

    #[test]
    fn test_costco_filters_and_scan_limit() {
        let html = r#"
            <a href="/node/1">Costco Apple MacBook Air M3</a>
            <a href="/node/2">Costco Apple gift card deal</a>
            <a href="/node/3">Costco TV sale</a>
            <a href="/node/4">Apple iPad at JB</a>
            <a href="/node/5">Costco Apple Watch</a>
            <a href="/node/6">Costco Apple AirPods</a>
        "#;
        let cfg = SignalConfig::default();
        let listings = extract_anchors(html, &spec_named("costco-via-ozbargain"), &cfg).unwrap();
        let titles: Vec<&str> = listings.iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["Costco Apple MacBook Air M3", "Costco Apple Watch"]);
    }

    #[test]
    fn test_trending_min_title_len_and_limit() {
        let mut spec = default_trending();
        spec.limit = 1;
        let html = r#"
            <a href="/node/1">Short</a>
            <a href="/node/2">Long enough trending title</a>
            <a href="/node/3">Another long trending title</a>
        "#;
        let cfg = SignalConfig::default();
        let listings = extract_anchors(html, &spec, &cfg).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title(), "Long enough trending title");
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let mut spec = default_trending();
        spec.selector = "a[".into();
        let err = extract_anchors("<a href='/x'>x</a>", &spec, &SignalConfig::default());
        assert!(matches!(err, Err(FeedError::Config(_))));
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: AnchorFeedSpec = serde_json::from_str(
            r#"{"name":"custom","source":"oz-bargain","urls":["https://example.com/"]}"#,
        )
        .unwrap();
        assert_eq!(spec.selector, "a");
        assert_eq!(spec.limit, 10);
        assert!(!spec.keyword_filter);
    }
}
