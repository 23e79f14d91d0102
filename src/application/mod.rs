pub mod arbitrage;
pub mod dedup;
pub mod enrich;
pub mod ingest;
pub mod narrative;
pub mod render;
pub mod report;
pub mod scoring;
pub mod signals;
