//! Composite stack score.
//!
//! Points multipliers and gift cards carry the dependable value of a stack
//! and dominate the score. Cashback is a capped bonus (at most
//! [`MAX_CASHBACK_CONTRIBUTION`]) because portals frequently exclude
//! gift-card payments.

use crate::domain::entities::annotated_listing::Signals;
use crate::domain::values::arbitrage::{ArbitrageConfidence, ArbitrageJudgement};
use crate::domain::values::signal_config::SignalConfig;

pub const POINTS_30X_PLUS: f64 = 10.0;
pub const POINTS_20X_PLUS: f64 = 8.0;
pub const POINTS_ANY: f64 = 4.0;
pub const GIFT_CARD_PHRASE: f64 = 3.0;
pub const MULTI_RETAILER_CARD: f64 = 3.0;
pub const PRIORITY_MERCHANT: f64 = 2.0;
pub const CASHBACK_DETECTED: f64 = 1.0;
pub const PREMIUM_PORTAL_BONUS: f64 = 0.5;
pub const MAX_CASHBACK_CONTRIBUTION: f64 = CASHBACK_DETECTED + PREMIUM_PORTAL_BONUS;
pub const ARBITRAGE_HIGH: f64 = 4.0;
pub const ARBITRAGE_MEDIUM: f64 = 2.0;
pub const ARBITRAGE_LOW: f64 = 1.0;
pub const COMPETITION_PENALTY: f64 = -3.0;

/// Individual contributions, kept separate so callers and tests can inspect them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub points: f64,
    pub gift_card: f64,
    pub merchant: f64,
    pub cashback: f64,
    pub arbitrage: f64,
    pub penalty: f64,
}

impl ScoreBreakdown {
    /// Sum of all contributions, rounded to one decimal place.
    pub fn total(&self) -> f64 {
        let raw = self.points
            + self.gift_card
            + self.merchant
            + self.cashback
            + self.arbitrage
            + self.penalty;
        (raw * 10.0).round() / 10.0
    }
}

pub fn points_contribution(multiplier: Option<u32>) -> f64 {
    match multiplier {
        Some(x) if x >= 30 => POINTS_30X_PLUS,
        Some(x) if x >= 20 => POINTS_20X_PLUS,
        Some(_) => POINTS_ANY,
        None => 0.0,
    }
}

pub fn cashback_contribution(portals: &[String], config: &SignalConfig) -> f64 {
    if portals.is_empty() {
        return 0.0;
    }
    let bonus = if portals.iter().any(|p| config.is_premium_portal(p)) {
        PREMIUM_PORTAL_BONUS
    } else {
        0.0
    };
    CASHBACK_DETECTED + bonus
}

pub fn arbitrage_contribution(judgement: &ArbitrageJudgement) -> f64 {
    if !judgement.eligible {
        return 0.0;
    }
    match judgement.confidence {
        ArbitrageConfidence::High => ARBITRAGE_HIGH,
        ArbitrageConfidence::Medium => ARBITRAGE_MEDIUM,
        ArbitrageConfidence::Low => ARBITRAGE_LOW,
        ArbitrageConfidence::None => 0.0,
    }
}

pub fn breakdown(
    signals: &Signals,
    arbitrage: &ArbitrageJudgement,
    config: &SignalConfig,
) -> ScoreBreakdown {
    let mut gift_card = 0.0;
    if signals.gift_card_phrase {
        gift_card += GIFT_CARD_PHRASE;
    }
    if signals.multi_retailer_card {
        gift_card += MULTI_RETAILER_CARD;
    }

    let merchant = if signals
        .merchants
        .iter()
        .any(|m| config.is_priority_merchant(m))
    {
        PRIORITY_MERCHANT
    } else {
        0.0
    };

    ScoreBreakdown {
        points: points_contribution(signals.points_multiplier),
        gift_card,
        merchant,
        cashback: cashback_contribution(&signals.cashback_portals, config),
        arbitrage: arbitrage_contribution(arbitrage),
        penalty: if signals.penalty_phrase {
            COMPETITION_PENALTY
        } else {
            0.0
        },
    }
}

pub fn score(signals: &Signals, arbitrage: &ArbitrageJudgement, config: &SignalConfig) -> f64 {
    breakdown(signals, arbitrage, config).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::arbitrage::evaluate;
    use crate::application::signals::extract;

    fn score_title(title: &str) -> f64 {
        let cfg = SignalConfig::default();
        let signals = extract(title, &cfg);
        let arbitrage = evaluate(&signals, &cfg);
        score(&signals, &arbitrage, &cfg)
    }

    #[test]
    fn test_ultimate_gift_cards_20x() {
        // 8 (20x) + 3 (gift card) + 3 (ultimate); Woolworths is not a priority merchant
        assert_eq!(score_title("Ultimate Gift Cards 20x Points at Woolworths"), 14.0);
    }

    #[test]
    fn test_points_tiers() {
        assert_eq!(points_contribution(Some(30)), 10.0);
        assert_eq!(points_contribution(Some(29)), 8.0);
        assert_eq!(points_contribution(Some(20)), 8.0);
        assert_eq!(points_contribution(Some(19)), 4.0);
        assert_eq!(points_contribution(None), 0.0);
    }

    #[test]
    fn test_cashback_is_capped() {
        let cfg = SignalConfig::default();
        let all: Vec<String> = ["ShopBack", "TopCashback", "Cashrewards"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(cashback_contribution(&all, &cfg), MAX_CASHBACK_CONTRIBUTION);
        assert_eq!(cashback_contribution(&["Cashrewards".into()], &cfg), 1.0);
        assert_eq!(cashback_contribution(&[], &cfg), 0.0);
    }

    #[test]
    fn test_cashback_never_beats_points() {
        let cashback_only = score_title("ShopBack TopCashback Cashrewards deal");
        let points_only = score_title("10x points deal");
        assert!(points_only > cashback_only);
    }

    #[test]
    fn test_competition_penalty_can_go_negative() {
        assert_eq!(score_title("Competition: win a trip"), -3.0);
    }

    #[test]
    fn test_arbitrage_high_adds_four() {
        // priority merchant (+2) + high arbitrage (+4)
        assert_eq!(score_title("MacBook Pro M4 at Officeworks - Click & Collect"), 6.0);
    }

    #[test]
    fn test_premium_portal_half_point() {
        assert_eq!(score_title("ShopBack 5% at Coles"), 1.5);
    }
}
