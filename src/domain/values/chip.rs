use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipTier {
    Base,
    Pro,
    Max,
    Ultra,
    #[serde(other)]
    Unknown,
}

impl ChipTier {
    /// Pro, Max and Ultra parts carry a price premium over the base chip.
    pub fn is_premium(&self) -> bool {
        matches!(self, ChipTier::Pro | ChipTier::Max | ChipTier::Ultra)
    }

    fn label(&self) -> Option<&'static str> {
        match self {
            ChipTier::Pro => Some("Pro"),
            ChipTier::Max => Some("Max"),
            ChipTier::Ultra => Some("Ultra"),
            ChipTier::Base | ChipTier::Unknown => None,
        }
    }
}

impl fmt::Display for ChipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipTier::Base => write!(f, "base"),
            ChipTier::Pro => write!(f, "pro"),
            ChipTier::Max => write!(f, "max"),
            ChipTier::Ultra => write!(f, "ultra"),
            ChipTier::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ChipTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "base" => Ok(ChipTier::Base),
            "pro" => Ok(ChipTier::Pro),
            "max" => Ok(ChipTier::Max),
            "ultra" => Ok(ChipTier::Ultra),
            "unknown" => Ok(ChipTier::Unknown),
            _ => Err(format!("Unknown chip tier: {s}")),
        }
    }
}

/// An Apple-silicon chip mentioned in a listing title, e.g. `M4` or `M5 Pro`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub name: String,
    pub generation: u32,
    pub tier: ChipTier,
}

impl Chip {
    /// Builds a chip with a normalized label ("m5 pro" becomes "M5 Pro").
    pub fn new(generation: u32, tier: ChipTier) -> Self {
        let name = match tier.label() {
            Some(label) => format!("M{generation} {label}"),
            None => format!("M{generation}"),
        };
        Self {
            name,
            generation,
            tier,
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
