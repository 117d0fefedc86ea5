//! In-memory [`ClanDataSource`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{ClanDataSource, FetchError};
use crate::models::{
    BattleRecord, ClanMember, ClanProfile, CurrentRiverRace, PlayerProfile, Tag, WarLogPage,
};

fn status(code: u16) -> FetchError {
    FetchError::HttpStatus {
        status: code,
        message: "mock".to_string(),
    }
}

/// Canned upstream data. Anything left unset behaves like a 404.
#[derive(Default)]
pub struct MockSource {
    pub clan: Option<ClanProfile>,
    pub members: Option<Vec<ClanMember>>,
    /// War log pages keyed by the cursor that requests them (`None` = first page)
    pub war_log: HashMap<Option<String>, WarLogPage>,
    /// Status returned for the war log instead of a page
    pub war_log_status: Option<u16>,
    pub current_war: Option<CurrentRiverRace>,
    pub players: HashMap<Tag, PlayerProfile>,
    pub battle_logs: HashMap<Tag, Vec<BattleRecord>>,
    /// Players whose profile fetch fails with a 500
    pub failing_players: HashSet<Tag>,
    /// Delay applied to every player fetch
    pub player_delay: Option<Duration>,
    /// Player fetches never complete
    pub hang_players: bool,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    player_calls: Arc<AtomicUsize>,
}

impl MockSource {
    pub fn new(clan: ClanProfile, members: Vec<ClanMember>) -> Self {
        Self {
            clan: Some(clan),
            members: Some(members),
            ..Default::default()
        }
    }

    /// Highest number of player fetches that were running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn player_calls(&self) -> usize {
        self.player_calls.load(Ordering::SeqCst)
    }
}

/// Tracks concurrent player fetches for the lifetime of one call.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl InFlightGuard {
    fn enter(source: &MockSource) -> Self {
        let now = source.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        source.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self {
            in_flight: source.in_flight.clone(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ClanDataSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn clan(&self, _tag: &Tag) -> Result<ClanProfile, FetchError> {
        self.clan.clone().ok_or_else(|| status(404))
    }

    async fn members(&self, _tag: &Tag) -> Result<Vec<ClanMember>, FetchError> {
        self.members.clone().ok_or_else(|| status(500))
    }

    async fn river_race_log(
        &self,
        _tag: &Tag,
        after: Option<&str>,
    ) -> Result<Option<WarLogPage>, FetchError> {
        if let Some(code) = self.war_log_status {
            return Err(status(code));
        }
        Ok(self.war_log.get(&after.map(str::to_string)).cloned())
    }

    async fn current_river_race(&self, _tag: &Tag) -> Result<Option<CurrentRiverRace>, FetchError> {
        Ok(self.current_war.clone())
    }

    async fn player(&self, tag: &Tag) -> Result<PlayerProfile, FetchError> {
        self.player_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard::enter(self);

        if self.hang_players {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.player_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_players.contains(tag) {
            return Err(status(500));
        }

        self.players.get(tag).cloned().ok_or_else(|| status(404))
    }

    async fn battle_log(&self, tag: &Tag) -> Result<Vec<BattleRecord>, FetchError> {
        Ok(self.battle_logs.get(tag).cloned().unwrap_or_default())
    }
}
