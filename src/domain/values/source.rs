use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a listing was scraped from.
///
/// Declaration order is the display order of per-source groups in the daily feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    FreePoints,
    Gcdb,
    OzBargain,
    Costco,
    CostcoViaOzBargain,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::FreePoints,
        Source::Gcdb,
        Source::OzBargain,
        Source::Costco,
        Source::CostcoViaOzBargain,
    ];
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::FreePoints => write!(f, "FreePoints"),
            Source::Gcdb => write!(f, "GCDB"),
            Source::OzBargain => write!(f, "OzBargain"),
            Source::Costco => write!(f, "Costco"),
            Source::CostcoViaOzBargain => write!(f, "Costco (via OzBargain)"),
        }
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "freepoints" | "free-points" => Ok(Source::FreePoints),
            "gcdb" => Ok(Source::Gcdb),
            "ozbargain" | "oz-bargain" => Ok(Source::OzBargain),
            "costco" => Ok(Source::Costco),
            "costco-via-ozbargain" | "costco-via-oz-bargain" | "costco (via ozbargain)" => {
                Ok(Source::CostcoViaOzBargain)
            }
            _ => Err(format!("Unknown source: {s}")),
        }
    }
}
