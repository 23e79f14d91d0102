use serde::Serialize;

use crate::domain::entities::listing::Listing;
use crate::domain::values::arbitrage::{ArbitrageConfidence, ArbitrageJudgement};
use crate::domain::values::chip::Chip;
use crate::domain::values::gift_card::GiftCardType;

/// Everything the text extractors find in a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Signals {
    /// Matched merchants, in configured order.
    pub merchants: Vec<String>,
    /// Matched cashback portals, in configured priority order.
    pub cashback_portals: Vec<String>,
    pub points_multiplier: Option<u32>,
    pub gift_card_type: Option<GiftCardType>,
    /// "gift card" or "giftcard" appears in the title.
    pub gift_card_phrase: bool,
    /// "gift" appears anywhere in the title.
    pub gift_mention: bool,
    /// "ultimate" or "tcn" appears in the title.
    pub multi_retailer_card: bool,
    pub chip: Option<Chip>,
    /// Matched physical retailers, in configured order.
    pub physical_retailers: Vec<String>,
    pub has_stock_signal: bool,
    /// The title reads like a competition or giveaway.
    pub penalty_phrase: bool,
    /// Officeworks or JB Hi-Fi is named, including the "jbhifi" spelling.
    pub portal_terms_retailer: bool,
}

/// Human-readable text generated from a listing's signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Narrative {
    /// "Why this stack works" sentences joined into one string.
    pub why: String,
    /// At most five imperative steps.
    pub recipe: Vec<String>,
    pub hint: String,
    pub cashback_note: Option<String>,
    /// Confidence label shown next to chip listings in the daily feed.
    pub display_confidence: ArbitrageConfidence,
    /// Confidence and tier notes for chip listings.
    pub chip_notes: Vec<String>,
}

/// A listing plus the annotations each pipeline stage attaches.
///
/// Every annotation starts absent. Reading one that was never attached is a
/// skipped pipeline stage and panics.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedListing {
    pub listing: Listing,
    signals: Option<Signals>,
    arbitrage: Option<ArbitrageJudgement>,
    score: Option<f64>,
    narrative: Option<Narrative>,
    exclusion: Option<Option<String>>,
}

impl AnnotatedListing {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            signals: None,
            arbitrage: None,
            score: None,
            narrative: None,
            exclusion: None,
        }
    }

    pub fn id(&self) -> &str {
        self.listing.id()
    }

    pub fn title(&self) -> &str {
        self.listing.title()
    }

    pub fn link(&self) -> &str {
        self.listing.link()
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_arbitrage(mut self, arbitrage: ArbitrageJudgement) -> Self {
        self.arbitrage = Some(arbitrage);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_narrative(mut self, narrative: Narrative) -> Self {
        self.narrative = Some(narrative);
        self
    }

    /// Records whether the listing is held out of the main ranking, and why.
    pub fn with_exclusion(mut self, reason: Option<String>) -> Self {
        self.exclusion = Some(reason);
        self
    }

    pub fn has_score(&self) -> bool {
        self.score.is_some()
    }

    pub fn signals(&self) -> &Signals {
        match &self.signals {
            Some(signals) => signals,
            None => self.missing("signals"),
        }
    }

    pub fn arbitrage(&self) -> &ArbitrageJudgement {
        match &self.arbitrage {
            Some(arbitrage) => arbitrage,
            None => self.missing("arbitrage"),
        }
    }

    pub fn score(&self) -> f64 {
        match self.score {
            Some(score) => score,
            None => self.missing("score"),
        }
    }

    pub fn narrative(&self) -> &Narrative {
        match &self.narrative {
            Some(narrative) => narrative,
            None => self.missing("narrative"),
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.exclusion_reason().is_some()
    }

    pub fn exclusion_reason(&self) -> Option<&str> {
        match &self.exclusion {
            Some(reason) => reason.as_deref(),
            None => self.missing("exclusion"),
        }
    }

    fn missing(&self, annotation: &str) -> ! {
        panic!(
            "listing {} ({:?}) has no {annotation} annotation; a pipeline stage was skipped",
            self.listing.id(),
            self.listing.title()
        )
    }
}
