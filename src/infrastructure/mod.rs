pub mod config;
pub mod feeds;
pub mod mail;
