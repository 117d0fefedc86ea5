//! Presentation-facing output of an analysis run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClanProfile, MemberAward, MemberStats, MvpSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCurrentWarMember {
    pub rank: u32,
    pub name: String,
    pub tag: String,
    pub fame: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAverageFameMember {
    pub rank: u32,
    pub name: String,
    pub tag: String,
    pub average_fame: f64,
}

/// Clan fame and placement in one finished period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamePoint {
    pub label: String,
    pub fame: i64,
    /// `None` when the clan has no standing in that period
    pub placement: Option<u32>,
}

/// Reconstructed clan war trophies after one finished period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrophyPoint {
    pub label: String,
    pub clan_war_trophies: i64,
    pub trophy_change: i64,
}

/// Everything the presentation layer renders for one clan.
#[derive(Debug, Clone, Serialize)]
pub struct ClanReport {
    pub clan: ClanProfile,

    /// Minimum war fame parsed from the clan description
    pub fame_threshold: Option<u32>,

    pub has_active_war: bool,

    pub current_war_rankings: Vec<RankedCurrentWarMember>,

    pub average_fame_rankings: Vec<RankedAverageFameMember>,

    pub mvp: Option<MvpSummary>,

    pub awards: Vec<MemberAward>,

    /// Chronological (oldest first)
    pub fame_progression: Vec<FamePoint>,

    /// Chronological; the last point equals the clan's current war trophies
    pub trophy_progression: Vec<TrophyPoint>,

    pub average_placement: Option<f64>,

    pub members: Vec<MemberStats>,

    pub generated_at: DateTime<Utc>,
}
