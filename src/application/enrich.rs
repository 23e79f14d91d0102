//! Runs the annotation stages over raw listings in their fixed order:
//! signals, arbitrage, score, narrative, exclusion.

use tracing::debug;

use crate::application::{arbitrage, narrative, scoring, signals};
use crate::domain::entities::annotated_listing::{AnnotatedListing, Signals};
use crate::domain::entities::listing::Listing;
use crate::domain::values::signal_config::SignalConfig;

pub const CHIP_EXCLUSION_REASON: &str = "Apple chip detected but no physical retailer/stock signal";

/// Chip listings are only trusted with both a physical retailer and a stock signal.
pub fn exclusion_reason(signals: &Signals) -> Option<String> {
    let unverified = signals.physical_retailers.is_empty() || !signals.has_stock_signal;
    (signals.chip.is_some() && unverified).then(|| CHIP_EXCLUSION_REASON.to_string())
}

pub fn enrich(listing: Listing, config: &SignalConfig) -> AnnotatedListing {
    let signals = signals::extract(listing.title(), config);
    let judgement = arbitrage::evaluate(&signals, config);
    let score = scoring::score(&signals, &judgement, config);
    let narrative = narrative::generate(&signals, &judgement, config);
    let exclusion = exclusion_reason(&signals);

    debug!(
        id = listing.id(),
        score,
        excluded = exclusion.is_some(),
        "enriched listing"
    );

    AnnotatedListing::new(listing)
        .with_signals(signals)
        .with_arbitrage(judgement)
        .with_score(score)
        .with_narrative(narrative)
        .with_exclusion(exclusion)
}

/// Enriches listings independently, preserving input order.
pub fn enrich_all(listings: Vec<Listing>, config: &SignalConfig) -> Vec<AnnotatedListing> {
    listings
        .into_iter()
        .map(|listing| enrich(listing, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::source::Source;

    #[test]
    fn test_chip_without_stock_is_excluded() {
        let cfg = SignalConfig::default();
        let listing = Listing::new(Source::OzBargain, "M4 Mac Mini at JB Hi-Fi - Online Only", "l");
        let annotated = enrich(listing, &cfg);
        assert_eq!(annotated.exclusion_reason(), Some(CHIP_EXCLUSION_REASON));
    }

    #[test]
    fn test_chip_without_retailer_is_excluded() {
        let cfg = SignalConfig::default();
        let listing = Listing::new(Source::OzBargain, "MacBook Air M3 in stock", "l");
        assert!(enrich(listing, &cfg).is_excluded());
    }

    #[test]
    fn test_verified_chip_listing_kept() {
        let cfg = SignalConfig::default();
        let listing = Listing::new(
            Source::OzBargain,
            "MacBook Pro M4 at Officeworks - Click & Collect",
            "l",
        );
        let annotated = enrich(listing, &cfg);
        assert!(!annotated.is_excluded());
        assert_eq!(annotated.signals().chip.as_ref().unwrap().name, "M4");
    }

    #[test]
    fn test_non_chip_listing_never_excluded() {
        let cfg = SignalConfig::default();
        let listing = Listing::new(Source::Gcdb, "Amazon exclusive deal on laptops", "l");
        assert!(!enrich(listing, &cfg).is_excluded());
    }
}
