pub mod aggregator;
pub mod conversion;
pub mod message;
pub mod types;
