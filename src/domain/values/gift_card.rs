use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardType {
    /// Apple-only cards.
    Apple,
    /// Ultimate multi-retailer cards (convertible to JB Hi-Fi / Officeworks).
    Ultimate,
    /// TCN category cards.
    Tcn,
    Generic,
}

impl GiftCardType {
    /// Cards that are bought at one merchant and redeemed or converted at another.
    pub fn needs_redemption_step(&self) -> bool {
        matches!(self, GiftCardType::Apple | GiftCardType::Ultimate)
    }
}

impl fmt::Display for GiftCardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiftCardType::Apple => write!(f, "apple"),
            GiftCardType::Ultimate => write!(f, "ultimate"),
            GiftCardType::Tcn => write!(f, "tcn"),
            GiftCardType::Generic => write!(f, "generic"),
        }
    }
}
