use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How actionable a cross-retailer price-match opportunity is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArbitrageConfidence {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl ArbitrageConfidence {
    /// Medium and high confidence are strong enough to suggest a comparison.
    pub fn is_actionable(&self) -> bool {
        matches!(self, ArbitrageConfidence::Medium | ArbitrageConfidence::High)
    }
}

impl fmt::Display for ArbitrageConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbitrageConfidence::None => write!(f, "NONE"),
            ArbitrageConfidence::Low => write!(f, "LOW"),
            ArbitrageConfidence::Medium => write!(f, "MEDIUM"),
            ArbitrageConfidence::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for ArbitrageConfidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ArbitrageConfidence::None),
            "low" => Ok(ArbitrageConfidence::Low),
            "medium" => Ok(ArbitrageConfidence::Medium),
            "high" => Ok(ArbitrageConfidence::High),
            _ => Err(format!("Unknown confidence: {s}")),
        }
    }
}

/// Price-match eligibility for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageJudgement {
    pub eligible: bool,
    /// Competitor retailers, deduplicated and in lexical order.
    pub targets: Vec<String>,
    pub confidence: ArbitrageConfidence,
}

impl ArbitrageJudgement {
    pub fn ineligible() -> Self {
        Self::default()
    }

    /// The first two targets, used wherever a short list is displayed.
    pub fn display_targets(&self) -> Vec<&str> {
        self.targets.iter().take(2).map(String::as_str).collect()
    }
}
