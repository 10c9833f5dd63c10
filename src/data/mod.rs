pub mod cache;
pub mod decoder;
pub mod normalizer;
pub mod odds_api;
pub mod types;
