pub mod annotated_listing;
pub mod listing;
