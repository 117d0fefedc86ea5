//! The fully fetched input of one analysis run.

use serde::Serialize;

use super::{BattleRecord, ClanMember, ClanProfile, CurrentRiverRace, PlayerProfile, WarLogEntry};

/// A roster entry plus whatever per-member detail could be fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberBattleData {
    pub member: ClanMember,
    pub player: Option<PlayerProfile>,
    pub battle_log: Vec<BattleRecord>,
}

impl MemberBattleData {
    /// A member whose detail fetch failed: no profile, empty battle log.
    pub fn degraded(member: ClanMember) -> Self {
        Self {
            member,
            player: None,
            battle_log: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.player.is_none() && self.battle_log.is_empty()
    }
}

/// Everything one analysis run reads. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClanSnapshot {
    pub clan: ClanProfile,
    pub members: Vec<MemberBattleData>,
    /// Newest-first, as served upstream
    pub war_log: Vec<WarLogEntry>,
    pub current_war: CurrentRiverRace,
}
