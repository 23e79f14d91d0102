pub mod arbitrage;
pub mod chip;
pub mod gift_card;
pub mod signal_config;
pub mod source;
