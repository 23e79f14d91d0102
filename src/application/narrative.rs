//! Explanations and step-by-step recipes generated from a listing's signals.
//!
//! Nothing here affects the score. The "why this stack works" text is an
//! ordered rule table: each rule either contributes one sentence or nothing,
//! and the table order is the sentence order.

use crate::domain::entities::annotated_listing::{Narrative, Signals};
use crate::domain::values::arbitrage::{ArbitrageConfidence, ArbitrageJudgement};
use crate::domain::values::gift_card::GiftCardType;
use crate::domain::values::signal_config::SignalConfig;

const MAX_RECIPE_STEPS: usize = 5;
const LIMITS_PHRASE: &str = "check online gift card limits";

/// Inputs shared by every narrative rule.
pub struct NarrativeContext<'a> {
    pub signals: &'a Signals,
    pub arbitrage: &'a ArbitrageJudgement,
    pub config: &'a SignalConfig,
}

/// One entry of the explanation table.
pub struct WhyRule {
    pub name: &'static str,
    pub reason: fn(&NarrativeContext<'_>) -> Option<String>,
}

pub const WHY_RULES: &[WhyRule] = &[
    WhyRule {
        name: "points_multiplier",
        reason: points_reason,
    },
    WhyRule {
        name: "gift_card_front_loading",
        reason: front_loading_reason,
    },
    WhyRule {
        name: "gift_card_type",
        reason: gift_card_type_reason,
    },
    WhyRule {
        name: "merchant_accepts_gift_cards",
        reason: merchant_accepts_reason,
    },
    WhyRule {
        name: "cashback_caveat",
        reason: cashback_caveat_reason,
    },
    WhyRule {
        name: "chip_forward_compatible",
        reason: chip_forward_reason,
    },
    WhyRule {
        name: "chip_stock_price_match",
        reason: chip_stock_reason,
    },
    WhyRule {
        name: "arbitrage_targets",
        reason: arbitrage_reason,
    },
];

fn points_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    let x = ctx.signals.points_multiplier?;
    Some(if x >= 20 {
        format!("{x}x points promo → ~{}% base return.", x / 2)
    } else {
        format!("{x}x points promo → meaningful base return.")
    })
}

fn front_loading_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    ctx.signals
        .gift_card_phrase
        .then(|| "Buying gift cards front-loads rewards before purchase.".to_string())
}

fn gift_card_type_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    let text = match ctx.signals.gift_card_type? {
        GiftCardType::Apple => {
            "Apple gift cards can pay Apple directly (and often stack with price match)."
        }
        GiftCardType::Ultimate => "Ultimate gift cards can be converted to JB Hi-Fi / Officeworks.",
        GiftCardType::Tcn => "TCN cards work across multiple merchants (category-based).",
        GiftCardType::Generic => return None,
    };
    Some(text.to_string())
}

fn merchant_accepts_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    let accepts = ctx
        .signals
        .merchants
        .iter()
        .any(|m| ctx.config.gift_card_friendly_merchants.contains(m));
    accepts.then(|| "Target merchant accepts gift cards (online limits may apply).".to_string())
}

fn cashback_caveat_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    (!ctx.signals.cashback_portals.is_empty()).then(|| {
        "Cashback portals often exclude gift card purchases; verify T&Cs before relying on cashback."
            .to_string()
    })
}

fn chip_forward_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    let chip = ctx.signals.chip.as_ref()?;
    (chip.generation >= ctx.config.latest_known_generation).then(|| {
        "Apple silicon generations are forward-compatible for price matching when model/SKU aligns."
            .to_string()
    })
}

fn chip_stock_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    if ctx.signals.chip.is_none() || !ctx.signals.has_stock_signal {
        return None;
    }
    if ctx.config.chip_price_match_retailers.is_empty() {
        return Some("Consider a price match/beat where policy allows.".to_string());
    }
    Some(format!(
        "Consider {} price match/beat where policy allows.",
        ctx.config.chip_price_match_retailers.join(" / ")
    ))
}

fn arbitrage_reason(ctx: &NarrativeContext<'_>) -> Option<String> {
    if !ctx.arbitrage.eligible || ctx.arbitrage.targets.is_empty() {
        return None;
    }
    let targets = ctx.arbitrage.display_targets().join(", ");
    match ctx.arbitrage.confidence {
        ArbitrageConfidence::High => Some(format!(
            "Physical stock signals suggest possible price match arbitrage at {targets} (verify current policies)."
        )),
        ArbitrageConfidence::Medium => Some(format!(
            "Physical retailer deal may enable price comparison with {targets} (check stock and policies)."
        )),
        ArbitrageConfidence::Low | ArbitrageConfidence::None => None,
    }
}

/// Sentences from every matching rule, in table order.
pub fn why_reasons(ctx: &NarrativeContext<'_>) -> Vec<String> {
    WHY_RULES
        .iter()
        .filter_map(|rule| (rule.reason)(ctx))
        .collect()
}

pub fn why_stack_works(ctx: &NarrativeContext<'_>) -> String {
    why_reasons(ctx).join(" ")
}

/// Up to five steps for executing the stack.
pub fn stack_recipe(ctx: &NarrativeContext<'_>) -> Vec<String> {
    let signals = ctx.signals;
    let mut steps = Vec::new();

    if let Some(x) = signals.points_multiplier {
        if x >= 20 {
            steps.push(format!(
                "Activate {x}x points in your loyalty account before purchase."
            ));
        } else {
            steps.push(format!("Ensure {x}x points promo is active in your account."));
        }
    }

    match signals.gift_card_type {
        Some(GiftCardType::Ultimate) => {
            steps.push(
                "Buy Ultimate gift cards at promoted merchant (front-load points return)."
                    .to_string(),
            );
            steps.push(
                "Convert Ultimate cards online to JB Hi-Fi/Officeworks denominations (check 1-card-online.com.au limits)."
                    .to_string(),
            );
        }
        Some(GiftCardType::Tcn) => steps.push(
            "Buy TCN gift cards to use at category merchants (check specific merchant list)."
                .to_string(),
        ),
        Some(GiftCardType::Apple) => {
            steps.push(
                "Buy Apple gift cards at promoted merchant (front-load points return)."
                    .to_string(),
            );
            steps.push(format!(
                "Use Apple gift cards for Apple Store purchases (online or in-store, {LIMITS_PHRASE})."
            ));
        }
        Some(GiftCardType::Generic) => {
            steps.push(
                "Buy gift cards at promoted merchant (front-load points return).".to_string(),
            );
            if let Some(merchant) = signals.merchants.first() {
                steps.push(format!("Use gift cards at {merchant} ({LIMITS_PHRASE})."));
            }
        }
        None => {}
    }

    let arbitrage = ctx.arbitrage;
    if arbitrage.eligible && arbitrage.confidence.is_actionable() && !arbitrage.targets.is_empty()
    {
        let targets = arbitrage.display_targets().join(", ");
        if signals.chip.is_some() {
            steps.push(format!(
                "Compare prices at {targets} for price match/beat opportunities (verify current policies)."
            ));
        } else {
            steps.push(format!(
                "Check {targets} for competitive pricing (price match may be available)."
            ));
        }
    }

    if !signals.cashback_portals.is_empty() {
        let portals = signals
            .cashback_portals
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        steps.push(format!(
            "Optional: Use {portals} if portal allows gift-card/account-balance payments (check T&Cs)."
        ));
    }

    let limit_risk = match signals.gift_card_type {
        Some(kind) if kind.needs_redemption_step() => true,
        Some(_) => signals
            .merchants
            .iter()
            .any(|m| ctx.config.gift_card_limit_watchlist.contains(m)),
        None => false,
    };
    if limit_risk && !steps.iter().any(|s| s.contains(LIMITS_PHRASE)) {
        steps.push("Check online gift card limits at redemption merchant.".to_string());
    }

    steps.truncate(MAX_RECIPE_STEPS);
    steps
}

/// Short hints shown under a listing.
pub fn stack_hint(signals: &Signals) -> String {
    let mut hints = Vec::new();
    if signals.points_multiplier.is_some() && signals.gift_mention {
        hints.push("Points promo on gift cards → strong base return.");
    }
    if signals.multi_retailer_card {
        hints.push("Multi-retailer gift card → JB / OW / TGG stackable.");
    }
    if signals.portal_terms_retailer {
        hints.push("Check cashback portal T&Cs for gift card payments.");
    }
    hints.join(" ")
}

/// Conservative warning that portals rarely pay cashback on gift cards.
pub fn cashback_note(portals: &[String]) -> Option<String> {
    if portals.is_empty() {
        return None;
    }
    Some(format!(
        "⚠️ {} typically excludes gift card purchases. Verify portal T&Cs before assuming cashback applies.",
        portals.join(", ")
    ))
}

/// Confidence label shown in the daily feed.
///
/// Chip listings are high only with both a physical retailer and a stock
/// signal; other listings are medium when they name a merchant.
pub fn display_confidence(signals: &Signals) -> ArbitrageConfidence {
    if signals.chip.is_some() {
        if !signals.physical_retailers.is_empty() && signals.has_stock_signal {
            return ArbitrageConfidence::High;
        }
        return ArbitrageConfidence::Low;
    }
    if !signals.merchants.is_empty() {
        return ArbitrageConfidence::Medium;
    }
    ArbitrageConfidence::Low
}

/// Extra notes for listings that name an Apple-silicon chip.
pub fn chip_notes(signals: &Signals) -> Vec<String> {
    let Some(chip) = &signals.chip else {
        return Vec::new();
    };
    let mut notes = Vec::new();
    if !signals.physical_retailers.is_empty() && signals.has_stock_signal {
        notes.push(format!(
            "💎 HIGH CONFIDENCE: {chip} deal at physical retailer ({}) with stock/C&C. Consider price match/beat at competing stores.",
            signals.physical_retailers.join(", ")
        ));
    } else {
        notes.push(format!(
            "⚠️ LOW CONFIDENCE: {chip} deal lacks physical retailer or stock/C&C signals. Arbitrage risk high; verify availability before stacking."
        ));
    }
    if chip.tier.is_premium() {
        notes.push(format!(
            "Higher-tier chip ({}) detected; premiums typically 20-40% over base. Price match becomes more valuable.",
            chip.tier.to_string().to_uppercase()
        ));
    }
    notes
}

pub fn generate(
    signals: &Signals,
    arbitrage: &ArbitrageJudgement,
    config: &SignalConfig,
) -> Narrative {
    let ctx = NarrativeContext {
        signals,
        arbitrage,
        config,
    };
    Narrative {
        why: why_stack_works(&ctx),
        recipe: stack_recipe(&ctx),
        hint: stack_hint(signals),
        cashback_note: cashback_note(&signals.cashback_portals),
        display_confidence: display_confidence(signals),
        chip_notes: chip_notes(signals),
    }
}
