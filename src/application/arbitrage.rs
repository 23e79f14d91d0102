//! Price-match arbitrage evaluation.
//!
//! A listing is a price-match candidate when it names a physical retailer
//! whose configured competitors could be asked to match or beat the price.
//! Confidence is judged fresh from the listing's signals:
//!
//! | physical | targets | stock | chip or priority retailer | result        |
//! |----------|---------|-------|---------------------------|---------------|
//! | no       | -       | -     | -                         | none          |
//! | yes      | empty   | -     | -                         | none          |
//! | yes      | some    | no    | -                         | low           |
//! | yes      | some    | yes   | no                        | medium        |
//! | yes      | some    | yes   | yes                       | high          |

use std::collections::BTreeSet;

use crate::domain::entities::annotated_listing::Signals;
use crate::domain::values::arbitrage::{ArbitrageConfidence, ArbitrageJudgement};
use crate::domain::values::signal_config::SignalConfig;

pub fn evaluate(signals: &Signals, config: &SignalConfig) -> ArbitrageJudgement {
    if signals.physical_retailers.is_empty() {
        return ArbitrageJudgement::ineligible();
    }

    let targets: BTreeSet<&String> = signals
        .physical_retailers
        .iter()
        .flat_map(|retailer| config.competitors_of(retailer))
        .collect();

    if targets.is_empty() {
        return ArbitrageJudgement::ineligible();
    }

    let priority_retailer = signals
        .physical_retailers
        .iter()
        .any(|r| config.is_priority_merchant(r));

    let confidence = if !signals.has_stock_signal {
        ArbitrageConfidence::Low
    } else if signals.chip.is_some() || priority_retailer {
        ArbitrageConfidence::High
    } else {
        ArbitrageConfidence::Medium
    };

    ArbitrageJudgement {
        eligible: true,
        targets: targets.into_iter().cloned().collect(),
        confidence,
    }
}
