//! # Wincon
//!
//! Clan war analytics: per-member statistics, MVP ranking, award podiums,
//! war progression and fame requirements mined from clan descriptions.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (tags, battles, war log, derived stats, report)
//! - **calculate**: Member statistics, competition ranking, awards and war series
//! - **extract**: Fame threshold extraction from free-text descriptions
//! - **analysis**: Composes everything into a single clan report
//! - **fetch**: Upstream API client behind the `ClanDataSource` trait
//! - **sync**: Snapshot loader with bounded fan-out and cancellation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod analysis;
pub mod api;
pub mod calculate;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod sync;

pub use models::*;
