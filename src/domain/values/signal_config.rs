//! Classification lists the signal extractors, arbitrage evaluator, scorer
//! and narrative generators read.
//!
//! A [`SignalConfig`] is built once per run and passed by reference into
//! every stage, so tests can swap in their own lists. `Default` holds the
//! built-in Australian retail lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Relevance keywords used by feeds to pre-filter scraped anchors.
    pub keywords: Vec<String>,
    /// Known merchant names, matched as case-insensitive substrings.
    pub merchants: Vec<String>,
    /// Merchants considered especially likely to yield stacking value.
    pub priority_merchants: Vec<String>,
    /// Named cashback portals in priority order.
    pub cashback_portals: Vec<String>,
    /// Label reported when "cashback" appears but no named portal matched.
    pub generic_cashback_label: String,
    /// Portals that earn the premium cashback bonus.
    pub premium_portals: Vec<String>,
    /// Physical retailers that price match, mapped to the competitors they match against.
    pub physical_retailers: BTreeMap<String, Vec<String>>,
    /// Phrases indicating in-store stock or click-and-collect availability.
    pub stock_phrases: Vec<String>,
    /// Newest Apple-silicon generation known to be on shelves.
    pub latest_known_generation: u32,
    /// Merchants that accept gift cards as payment.
    pub gift_card_friendly_merchants: Vec<String>,
    /// Redemption merchants with restrictive online gift card limits.
    pub gift_card_limit_watchlist: Vec<String>,
    /// Retailers named in the chip + stock price-match suggestion.
    pub chip_price_match_retailers: Vec<String>,
    /// Lowercase phrases that mark a listing as a competition rather than a deal.
    pub penalty_phrases: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SignalConfig {
    fn default() -> Self {
        let physical_retailers = [
            ("Officeworks", &["JB Hi-Fi", "The Good Guys", "Harvey Norman"][..]),
            ("JB Hi-Fi", &["Officeworks", "The Good Guys", "Harvey Norman"][..]),
            ("The Good Guys", &["Officeworks", "JB Hi-Fi", "Harvey Norman"][..]),
            (
                "Apple",
                &["Officeworks", "JB Hi-Fi", "The Good Guys", "Harvey Norman"][..],
            ),
            ("Harvey Norman", &["Officeworks", "JB Hi-Fi", "The Good Guys"][..]),
            (
                "Costco",
                &["Officeworks", "JB Hi-Fi", "The Good Guys", "Harvey Norman"][..],
            ),
        ]
        .into_iter()
        .map(|(retailer, competitors)| (retailer.to_string(), strings(competitors)))
        .collect();

        Self {
            keywords: strings(&[
                "gift card",
                "giftcard",
                "ultimate",
                "tcn",
                "shopback",
                "topcashback",
                "cashback",
                "flybuys",
                "everyday rewards",
                "20x",
                "10x",
                "30x",
                "bonus points",
                "qantas",
                "velocity",
                "officeworks",
                "jb hi-fi",
                "jbhifi",
                "the good guys",
                "apple",
            ]),
            merchants: strings(&[
                "Officeworks",
                "JB Hi-Fi",
                "The Good Guys",
                "Apple",
                "Harvey Norman",
                "Amazon",
                "Woolworths",
                "Coles",
                "IKEA",
                "Costco",
            ]),
            priority_merchants: strings(&[
                "Officeworks",
                "JB Hi-Fi",
                "The Good Guys",
                "Apple",
                "Harvey Norman",
                "IKEA",
                "Costco",
            ]),
            cashback_portals: strings(&["ShopBack", "TopCashback", "Cashrewards"]),
            generic_cashback_label: "Cashback".to_string(),
            premium_portals: strings(&["ShopBack", "TopCashback"]),
            physical_retailers,
            stock_phrases: strings(&[
                "in stock",
                "click and collect",
                "c&c",
                "click & collect",
                "pick up",
                "pickup",
                "in-store",
                "in store",
                "store stock",
            ]),
            latest_known_generation: 4,
            gift_card_friendly_merchants: strings(&[
                "JB Hi-Fi",
                "Officeworks",
                "The Good Guys",
                "IKEA",
            ]),
            gift_card_limit_watchlist: strings(&["JB Hi-Fi", "Officeworks", "Apple"]),
            chip_price_match_retailers: strings(&["Harvey Norman", "JB Hi-Fi", "Officeworks"]),
            penalty_phrases: strings(&["win ", "competition"]),
        }
    }
}

impl SignalConfig {
    pub fn is_priority_merchant(&self, name: &str) -> bool {
        self.priority_merchants.iter().any(|m| m == name)
    }

    pub fn is_premium_portal(&self, name: &str) -> bool {
        self.premium_portals.iter().any(|p| p == name)
    }

    /// Competitors configured for `retailer`; empty when the retailer has no entry.
    pub fn competitors_of(&self, retailer: &str) -> &[String] {
        self.physical_retailers
            .get(retailer)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
