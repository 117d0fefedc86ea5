//! Upstream clan data access.
//!
//! [`ClanDataSource`] is the seam between the snapshot loader and the
//! network: [`ClanApiClient`] talks to the real API, tests plug in the
//! in-memory [`mock::MockSource`].

mod client;

#[cfg(test)]
pub mod mock;

pub use client::ClanApiClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    BattleRecord, ClanMember, ClanProfile, CurrentRiverRace, PlayerProfile, Tag, WarLogPage,
};

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status: 404, .. })
    }
}

/// Read-only access to everything one clan analysis needs.
///
/// Optional resources return `Ok(None)` (or an empty list) when the upstream
/// answers 404; every other failure is an error.
#[async_trait]
pub trait ClanDataSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    async fn clan(&self, tag: &Tag) -> Result<ClanProfile, FetchError>;

    async fn members(&self, tag: &Tag) -> Result<Vec<ClanMember>, FetchError>;

    /// One page of the war log, newest first. `after` is the paging cursor.
    async fn river_race_log(
        &self,
        tag: &Tag,
        after: Option<&str>,
    ) -> Result<Option<WarLogPage>, FetchError>;

    async fn current_river_race(&self, tag: &Tag) -> Result<Option<CurrentRiverRace>, FetchError>;

    async fn player(&self, tag: &Tag) -> Result<PlayerProfile, FetchError>;

    /// Recent battles, newest first. A 404 reads as no battles.
    async fn battle_log(&self, tag: &Tag) -> Result<Vec<BattleRecord>, FetchError>;
}

/// The battle log arrives either as a bare array or wrapped in `{ items }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BattleLogPayload {
    List(Vec<BattleRecord>),
    Wrapped {
        #[serde(default)]
        items: Vec<BattleRecord>,
    },
}

impl BattleLogPayload {
    fn into_records(self) -> Vec<BattleRecord> {
        match self {
            BattleLogPayload::List(items) | BattleLogPayload::Wrapped { items } => items,
        }
    }
}

/// Decode a battle log body in either shape.
pub fn decode_battle_log(body: &str) -> Result<Vec<BattleRecord>, FetchError> {
    let payload: BattleLogPayload = serde_json::from_str(body)?;
    Ok(payload.into_records())
}
