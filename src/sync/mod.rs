//! Snapshot loader.
//!
//! Gathers everything one clan analysis needs from a [`ClanDataSource`]:
//! 1. Clan profile and member roster, concurrently (both required)
//! 2. War log and current river race, concurrently (404 falls back)
//! 3. Per-member profile and battle log with bounded fan-out
//!
//! A member whose detail fetch fails is degraded rather than failing the
//! run. Cancellation aborts every in-flight fetch and never yields a
//! partial snapshot.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::fetch::{ClanDataSource, FetchError};
use crate::models::{
    ClanMember, ClanProfile, ClanSnapshot, CurrentRiverRace, MemberBattleData, Tag, WarLogEntry,
};

/// Errors that can occur while loading a snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to fetch {resource}: {source}")]
    Required {
        resource: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Load cancelled")]
    Cancelled,
}

impl LoadError {
    fn required(resource: &'static str) -> impl FnOnce(FetchError) -> LoadError {
        move |source| LoadError::Required { resource, source }
    }
}

/// Cancellation flag shared between a loader and whoever may abort it.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Loader tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Member detail fetches in flight at once
    pub max_concurrent_fetches: usize,

    /// War log pages to follow
    pub war_log_pages: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            war_log_pages: 1,
        }
    }
}

impl From<&UpstreamConfig> for LoaderConfig {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            max_concurrent_fetches: config.max_concurrent_fetches,
            war_log_pages: config.war_log_pages,
        }
    }
}

/// Loads a [`ClanSnapshot`] for one clan.
pub struct SnapshotLoader {
    source: Arc<dyn ClanDataSource>,
    config: LoaderConfig,
    cancel: CancelSignal,
}

impl SnapshotLoader {
    pub fn new(source: Arc<dyn ClanDataSource>, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancelSignal::new(),
        }
    }

    /// Share an existing cancellation signal instead of a private one.
    pub fn with_cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Load everything needed to analyse `tag`.
    pub async fn load(&self, tag: &Tag) -> Result<ClanSnapshot, LoadError> {
        if self.cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(LoadError::Cancelled),
            result = self.load_snapshot(tag) => result,
        };

        if self.cancel.is_cancelled() {
            warn!("Load of {} cancelled", tag);
            return Err(LoadError::Cancelled);
        }
        result
    }

    async fn load_snapshot(&self, tag: &Tag) -> Result<ClanSnapshot, LoadError> {
        let start = std::time::Instant::now();
        info!("Loading clan {} from {} source", tag, self.source.name());

        let (clan, roster) = tokio::try_join!(
            async {
                self.source
                    .clan(tag)
                    .await
                    .map_err(LoadError::required("clan profile"))
            },
            async {
                self.source
                    .members(tag)
                    .await
                    .map_err(LoadError::required("member roster"))
            },
        )?;
        debug!("Clan {} has {} members on the roster", clan.name, roster.len());

        let (war_log, current_war) =
            tokio::try_join!(self.load_war_log(tag), self.load_current_war(tag, &clan))?;

        let members = self.load_members(roster).await;
        let degraded = members.iter().filter(|m| m.is_degraded()).count();

        info!(
            "Loaded {}: {} members ({} degraded), {} war periods in {:?}",
            tag,
            members.len(),
            degraded,
            war_log.len(),
            start.elapsed()
        );

        Ok(ClanSnapshot {
            clan,
            members,
            war_log,
            current_war,
        })
    }

    /// Follow the war log cursor for up to `war_log_pages` pages.
    async fn load_war_log(&self, tag: &Tag) -> Result<Vec<WarLogEntry>, LoadError> {
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;

        for page_number in 0..self.config.war_log_pages.max(1) {
            let page = self
                .source
                .river_race_log(tag, cursor.as_deref())
                .await
                .map_err(LoadError::required("war log"))?;

            let Some(page) = page else {
                if page_number == 0 {
                    debug!("No war log for {}", tag);
                }
                break;
            };

            let next = page.next_cursor().filter(|c| !c.is_empty()).map(str::to_string);
            entries.extend(page.items);
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn load_current_war(
        &self,
        tag: &Tag,
        clan: &ClanProfile,
    ) -> Result<CurrentRiverRace, LoadError> {
        let race = self
            .source
            .current_river_race(tag)
            .await
            .map_err(LoadError::required("current river race"))?;

        Ok(race.unwrap_or_else(|| {
            debug!("{} is not in a river race", tag);
            CurrentRiverRace::not_in_war(clan)
        }))
    }

    /// Fetch member details with bounded parallelism, keeping roster order.
    async fn load_members(&self, roster: Vec<ClanMember>) -> Vec<MemberBattleData> {
        let limit = self.config.max_concurrent_fetches.max(1);
        debug!("Fetching {} members, {} at a time", roster.len(), limit);

        stream::iter(roster)
            .map(|member| self.load_member(member))
            .buffered(limit)
            .collect()
            .await
    }

    async fn load_member(&self, member: ClanMember) -> MemberBattleData {
        let tag = member.canonical_tag();

        match tokio::try_join!(self.source.player(&tag), self.source.battle_log(&tag)) {
            Ok((player, battle_log)) => MemberBattleData {
                member,
                player: Some(player),
                battle_log,
            },
            Err(e) => {
                warn!("Failed to load member {} ({}): {}", member.name, tag, e);
                MemberBattleData::degraded(member)
            }
        }
    }
}
