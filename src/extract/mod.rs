//! Text mining over free-form clan fields.

pub mod fame_threshold;

pub use fame_threshold::{extract_clan_fame_threshold, FameThresholdCandidate};
