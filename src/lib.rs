pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::enrich;
use crate::application::ingest::{Ingestion, IngestUseCase};
use crate::application::report::{
    self, build_daily_feed, build_stack_report, CombinedReport, DailyFeed, StackReport,
};
use crate::domain::entities::annotated_listing::AnnotatedListing;
use crate::domain::entities::listing::Listing;
use crate::domain::error::DomainError;
use crate::domain::ports::transport::{OutgoingReport, ReportTransport};
use crate::domain::values::signal_config::SignalConfig;
use crate::domain::values::source::Source;
use crate::infrastructure::config::RadarConfig;
use crate::infrastructure::feeds::anchor::{AnchorFeed, AnchorFeedSpec};
use crate::infrastructure::feeds::pinned::PinnedFeed;
use crate::infrastructure::feeds::Feed;
use chrono::NaiveDate;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct StackRadar {
    config: RadarConfig,
    ingest_uc: IngestUseCase,
    trending: Option<Box<dyn Feed>>,
}

impl StackRadar {
    /// Loads configuration from `config_path`, `STACKRADAR_CONFIG`, or the
    /// built-in defaults, and wires the configured web feeds.
    pub fn new(config_path: Option<&Path>) -> Result<Self, DomainError> {
        Ok(Self::from_config(RadarConfig::load(config_path)?))
    }

    pub fn from_config(config: RadarConfig) -> Self {
        let signals = Arc::new(config.signals.clone());

        let mut feeds: Vec<Box<dyn Feed>> = config
            .feeds
            .iter()
            .map(|spec| Box::new(AnchorFeed::new(spec.clone(), signals.clone())) as Box<dyn Feed>)
            .collect();
        if !config.pinned.is_empty() {
            let at = pinned_position(&config.feeds);
            feeds.insert(at, Box::new(PinnedFeed::new(config.pinned.clone())));
        }

        let trending = config
            .trending
            .clone()
            .map(|spec| Box::new(AnchorFeed::new(spec, signals)) as Box<dyn Feed>);

        Self::with_feeds(config, feeds, trending)
    }

    /// Wires explicit feeds, e.g. a file feed for offline runs or fixtures in tests.
    pub fn with_feeds(
        config: RadarConfig,
        feeds: Vec<Box<dyn Feed>>,
        trending: Option<Box<dyn Feed>>,
    ) -> Self {
        Self {
            config,
            ingest_uc: IngestUseCase::new(feeds),
            trending,
        }
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn signals(&self) -> &SignalConfig {
        &self.config.signals
    }

    /// Ingestion feed names in run order.
    pub fn feed_names(&self) -> Vec<&str> {
        self.ingest_uc.feed_names()
    }

    pub async fn ingest(&self) -> Ingestion {
        let ingestion = self.ingest_uc.execute().await;
        info!(
            listings = ingestion.listings.len(),
            feeds_run = ingestion.feeds_run,
            feeds_failed = ingestion.feeds_failed,
            "ingestion finished"
        );
        ingestion
    }

    /// Ingested listings, enriched and deduplicated.
    pub async fn collect(&self) -> Vec<AnnotatedListing> {
        let listings = self.ingest().await.listings;
        let prepared = report::prepare(listings, self.signals());
        info!(kept = prepared.len(), "listings enriched and deduplicated");
        prepared
    }

    /// Trending deals; a failed fetch yields an empty list.
    pub async fn trending(&self) -> Vec<Listing> {
        let Some(feed) = &self.trending else {
            return Vec::new();
        };
        match feed.fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(feed = feed.name(), error = %e, "trending fetch failed");
                Vec::new()
            }
        }
    }

    pub async fn stack_report(&self, date: NaiveDate) -> StackReport {
        let listings = self.collect().await;
        build_stack_report(date, &listings, self.config.top_n)
    }

    pub async fn daily_feed(&self, date: NaiveDate) -> DailyFeed {
        let listings = self.collect().await;
        let trending = self.trending().await;
        build_daily_feed(
            date,
            &listings,
            trending,
            self.config.trending_limit,
            self.signals(),
        )
    }

    /// Both views from a single ingestion. A view whose assembly fails is
    /// replaced by its error message so the other still renders.
    pub async fn combined_report(&self, date: NaiveDate) -> CombinedReport {
        let listings = self.collect().await;
        let trending = self.trending().await;

        let stack = guarded("stack", || {
            build_stack_report(date, &listings, self.config.top_n)
        });
        let daily = guarded("daily", || {
            build_daily_feed(
                date,
                &listings,
                trending,
                self.config.trending_limit,
                self.signals(),
            )
        });

        CombinedReport { date, stack, daily }
    }

    /// Runs the full annotation pipeline over a single title.
    pub fn classify(&self, source: Source, title: &str, link: &str) -> AnnotatedListing {
        enrich::enrich(Listing::new(source, title, link), self.signals())
    }
}

/// Pinned reminders run just ahead of the first Costco feed, or last when
/// no Costco feed is configured.
fn pinned_position(specs: &[AnchorFeedSpec]) -> usize {
    specs
        .iter()
        .position(|spec| matches!(spec.source, Source::Costco | Source::CostcoViaOzBargain))
        .unwrap_or(specs.len())
}

/// Hands a report to a blocking transport on tokio's blocking pool.
pub async fn send_report<T>(transport: T, report: OutgoingReport) -> Result<(), DomainError>
where
    T: ReportTransport + 'static,
{
    let name = transport.name().to_string();
    tokio::task::spawn_blocking(move || transport.deliver(&report))
        .await
        .map_err(|e| DomainError::Transport(format!("{name} delivery task failed: {e}")))?
}

fn guarded<T>(view: &str, build: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(build)).map_err(|payload| {
        let message = payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown error".to_string());
        error!(view, error = %message, "report view failed");
        message
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_guarded_captures_panic_message() {
        let ok = guarded("ok", || 1);
        assert_eq!(ok, Ok(1));
        let failed: Result<(), String> = guarded("boom", || panic!("view exploded"));
        assert_eq!(failed, Err("view exploded".to_string()));
    }

    #[test]
    fn test_pinned_reminder_runs_before_costco_feed() {
        let radar = StackRadar::from_config(RadarConfig::default());
        assert_eq!(
            radar.feed_names(),
            vec!["freepoints", "gcdb", "ozbargain", "pinned", "costco-via-ozbargain"]
        );

        let mut config = RadarConfig::default();
        config.feeds.retain(|spec| spec.source == Source::OzBargain);
        let radar = StackRadar::from_config(config);
        assert_eq!(radar.feed_names(), vec!["ozbargain", "pinned"]);
    }

    struct RecordingTransport {
        delivered_on: Arc<Mutex<Vec<(std::thread::ThreadId, String)>>>,
        fail: bool,
    }

    impl ReportTransport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        fn deliver(&self, report: &OutgoingReport) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::Transport("relay refused".into()));
            }
            self.delivered_on
                .lock()
                .unwrap()
                .push((std::thread::current().id(), report.subject.clone()));
            Ok(())
        }
    }

    fn report() -> OutgoingReport {
        OutgoingReport {
            subject: "Daily Deal Feed".into(),
            plain: "body".into(),
            html: "<p>body</p>".into(),
        }
    }

    #[tokio::test]
    async fn test_send_report_delivers_off_the_async_thread() {
        let delivered_on = Arc::new(Mutex::new(Vec::new()));
        let transport = RecordingTransport {
            delivered_on: delivered_on.clone(),
            fail: false,
        };
        send_report(transport, report()).await.unwrap();

        let delivered = delivered_on.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].1, "Daily Deal Feed");
        assert_ne!(delivered[0].0, std::thread::current().id());
    }

    #[tokio::test]
    async fn test_send_report_propagates_transport_error() {
        let transport = RecordingTransport {
            delivered_on: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        };
        let result = send_report(transport, report()).await;
        assert!(matches!(result, Err(DomainError::Transport(msg)) if msg == "relay refused"));
    }
}
