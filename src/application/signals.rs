//! Text signal extractors.
//!
//! Every extractor is a pure function over a title. Empty input is never an
//! error: it yields the "nothing found" value (empty list, `None`, `false`).
//! Matching is case-insensitive substring containment unless noted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::annotated_listing::Signals;
use crate::domain::values::chip::{Chip, ChipTier};
use crate::domain::values::gift_card::GiftCardType;
use crate::domain::values::signal_config::SignalConfig;

static POINTS_MULTIPLIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,3})x\b").unwrap());

static APPLE_CHIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bM(\d+)\s*(Pro|Max|Ultra)?\b").unwrap());

/// Gift card classification rules, checked in order; the first hit wins.
/// Apple cards come first so they are never reported as generic.
const GIFT_CARD_RULES: &[(GiftCardType, &[&str])] = &[
    (GiftCardType::Apple, &["apple gift", "apple giftcard"]),
    (GiftCardType::Ultimate, &["ultimate"]),
    (GiftCardType::Tcn, &["tcn"]),
    (GiftCardType::Generic, &["gift card", "giftcard"]),
];

const GIFT_CARD_PHRASES: &[&str] = &["gift card", "giftcard"];
const MULTI_RETAILER_CARDS: &[&str] = &["ultimate", "tcn"];
/// Retailers whose cashback portal terms often exclude gift card payments.
const PORTAL_TERMS_RETAILERS: &[&str] = &["officeworks", "jb hi-fi", "jbhifi"];

/// Collapses whitespace runs to single spaces and trims both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn lowered(text: &str) -> String {
    normalize(text).to_lowercase()
}

fn contains_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    needles
        .iter()
        .any(|n| !n.as_ref().is_empty() && haystack.contains(&n.as_ref().to_lowercase()))
}

/// Configured names found in the text, in configured order.
fn matched_names(text: &str, names: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    let t = lowered(text);
    names
        .into_iter()
        .filter(|name| {
            let needle = name.as_ref().to_lowercase();
            !needle.is_empty() && t.contains(&needle)
        })
        .map(|name| name.as_ref().to_string())
        .collect()
}

/// True when any relevance keyword appears in the text.
pub fn matches_keywords(text: &str, config: &SignalConfig) -> bool {
    contains_any(&lowered(text), &config.keywords)
}

pub fn detect_merchants(text: &str, config: &SignalConfig) -> Vec<String> {
    matched_names(text, &config.merchants)
}

/// Named portals in priority order; the generic label only when no named
/// portal matched but the word itself appears.
pub fn detect_cashback(text: &str, config: &SignalConfig) -> Vec<String> {
    let mut found = matched_names(text, &config.cashback_portals);
    if found.is_empty()
        && !config.generic_cashback_label.is_empty()
        && lowered(text).contains(&config.generic_cashback_label.to_lowercase())
    {
        found.push(config.generic_cashback_label.clone());
    }
    found
}

/// The first "Nx" multiplier in the text. A zero multiplier counts as absent.
pub fn extract_points_multiplier(text: &str) -> Option<u32> {
    POINTS_MULTIPLIER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|x| *x > 0)
}

pub fn detect_gift_card_type(text: &str) -> Option<GiftCardType> {
    let t = lowered(text);
    GIFT_CARD_RULES
        .iter()
        .find(|(_, phrases)| contains_any(&t, phrases))
        .map(|(kind, _)| *kind)
}

pub fn has_gift_card_phrase(text: &str) -> bool {
    contains_any(&lowered(text), GIFT_CARD_PHRASES)
}

/// Any mention of "gift", including vouchers and e-gifts.
pub fn mentions_gift(text: &str) -> bool {
    lowered(text).contains("gift")
}

pub fn mentions_portal_terms_retailer(text: &str) -> bool {
    contains_any(&lowered(text), PORTAL_TERMS_RETAILERS)
}

pub fn mentions_multi_retailer_card(text: &str) -> bool {
    contains_any(&lowered(text), MULTI_RETAILER_CARDS)
}

/// The first Apple-silicon chip mentioned, e.g. "M4" or "m5 pro".
pub fn detect_apple_chip(text: &str) -> Option<Chip> {
    let caps = APPLE_CHIP.captures(text)?;
    let generation = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let tier = match caps.get(2) {
        Some(word) => word.as_str().parse().unwrap_or(ChipTier::Unknown),
        None => ChipTier::Base,
    };
    Some(Chip::new(generation, tier))
}

/// Configured physical retailers named in the text.
pub fn detect_physical_retailers(text: &str, config: &SignalConfig) -> Vec<String> {
    matched_names(text, config.physical_retailers.keys())
}

pub fn detect_stock_signal(text: &str, config: &SignalConfig) -> bool {
    contains_any(&lowered(text), &config.stock_phrases)
}

pub fn has_penalty_phrase(text: &str, config: &SignalConfig) -> bool {
    let t = lowered(text);
    config
        .penalty_phrases
        .iter()
        .any(|p| !p.is_empty() && t.contains(&p.to_lowercase()))
}

/// Runs every extractor over one title.
pub fn extract(title: &str, config: &SignalConfig) -> Signals {
    let title = normalize(title);
    Signals {
        merchants: detect_merchants(&title, config),
        cashback_portals: detect_cashback(&title, config),
        points_multiplier: extract_points_multiplier(&title),
        gift_card_type: detect_gift_card_type(&title),
        gift_card_phrase: has_gift_card_phrase(&title),
        gift_mention: mentions_gift(&title),
        multi_retailer_card: mentions_multi_retailer_card(&title),
        chip: detect_apple_chip(&title),
        physical_retailers: detect_physical_retailers(&title, config),
        has_stock_signal: detect_stock_signal(&title, config),
        penalty_phrase: has_penalty_phrase(&title, config),
        portal_terms_retailer: mentions_portal_terms_retailer(&title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SignalConfig {
        SignalConfig::default()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_empty_title_yields_nothing() {
        let signals = extract("", &cfg());
        assert_eq!(signals, Signals::default());
    }

    #[test]
    fn test_merchants_case_insensitive() {
        let merchants = detect_merchants("jb hi-fi and OFFICEWORKS sale", &cfg());
        assert_eq!(merchants, vec!["Officeworks", "JB Hi-Fi"]);
    }

    #[test]
    fn test_cashback_named_portals_in_priority_order() {
        let portals = detect_cashback("Cashrewards 5% or ShopBack 7%", &cfg());
        assert_eq!(portals, vec!["ShopBack", "Cashrewards"]);
    }

    #[test]
    fn test_cashback_generic_only_without_named_portal() {
        assert_eq!(detect_cashback("10% cashback at Coles", &cfg()), vec!["Cashback"]);
        // "topcashback" contains "cashback" but the named portal wins
        assert_eq!(detect_cashback("TopCashback 8%", &cfg()), vec!["TopCashback"]);
        assert!(detect_cashback("no portal here", &cfg()).is_empty());
    }

    #[test]
    fn test_points_multiplier_first_match_only() {
        assert_eq!(extract_points_multiplier("20x points then 30x"), Some(20));
        assert_eq!(extract_points_multiplier("Bonus 15X Flybuys"), Some(15));
        assert_eq!(extract_points_multiplier("no multiplier"), None);
        assert_eq!(extract_points_multiplier("20xpoints"), None);
    }

    #[test]
    fn test_zero_multiplier_is_absent() {
        assert_eq!(extract_points_multiplier("0x fees"), None);
    }

    #[test]
    fn test_gift_card_type_precedence() {
        assert_eq!(
            detect_gift_card_type("Apple Gift Card Ultimate bundle"),
            Some(GiftCardType::Apple)
        );
        assert_eq!(
            detect_gift_card_type("Ultimate TCN gift card"),
            Some(GiftCardType::Ultimate)
        );
        assert_eq!(detect_gift_card_type("TCN gift card"), Some(GiftCardType::Tcn));
        assert_eq!(detect_gift_card_type("Giftcard sale"), Some(GiftCardType::Generic));
        assert_eq!(detect_gift_card_type("Laptop sale"), None);
    }

    #[test]
    fn test_chip_base_tier() {
        let chip = detect_apple_chip("MacBook Pro M4 at Officeworks").unwrap();
        assert_eq!(chip.name, "M4");
        assert_eq!(chip.generation, 4);
        assert_eq!(chip.tier, ChipTier::Base);
    }

    #[test]
    fn test_chip_tier_and_casing() {
        let chip = detect_apple_chip("new m5 pro laptop").unwrap();
        assert_eq!(chip.name, "M5 Pro");
        assert_eq!(chip.tier, ChipTier::Pro);

        let chip = detect_apple_chip("Mac Studio M3Ultra").unwrap();
        assert_eq!(chip.name, "M3 Ultra");
    }

    #[test]
    fn test_chip_ignores_words_starting_with_tier() {
        let chip = detect_apple_chip("M4 Mac Mini").unwrap();
        assert_eq!(chip.tier, ChipTier::Base);
        let chip = detect_apple_chip("M2 Promo pricing").unwrap();
        assert_eq!(chip.tier, ChipTier::Base);
    }

    #[test]
    fn test_chip_requires_word_boundary() {
        assert!(detect_apple_chip("MacBook Air").is_none());
        assert!(detect_apple_chip("HM4 thing").is_none());
    }

    #[test]
    fn test_physical_retailers_and_stock() {
        let title = "MacBook Pro M4 at Officeworks - Click & Collect";
        assert_eq!(detect_physical_retailers(title, &cfg()), vec!["Officeworks"]);
        assert!(detect_stock_signal(title, &cfg()));
        assert!(!detect_stock_signal("Officeworks deal on office supplies", &cfg()));
    }

    #[test]
    fn test_keywords() {
        assert!(matches_keywords("20x Everyday Rewards points", &cfg()));
        assert!(!matches_keywords("Cheap socks", &cfg()));
    }

    #[test]
    fn test_gift_and_portal_terms_mentions() {
        assert!(mentions_gift("20x points on gift vouchers"));
        assert!(!has_gift_card_phrase("20x points on gift vouchers"));
        assert!(mentions_portal_terms_retailer("JBHiFi gift card 20x points"));
        assert!(mentions_portal_terms_retailer("officeworks sale"));
        assert!(!mentions_portal_terms_retailer("Harvey Norman sale"));
    }

    #[test]
    fn test_penalty_phrases() {
        assert!(has_penalty_phrase("Win a $500 gift card", &cfg()));
        assert!(has_penalty_phrase("Photo Competition", &cfg()));
        assert!(!has_penalty_phrase("Windows laptop", &cfg()));
    }
}
