//! Statistics calculation engine.
//!
//! Computes derived metrics from a loaded clan snapshot:
//! - Per-member win rate, recency, trophy movement and war fame
//! - Competition rankings, award podiums and the MVP score
//! - Chronological war fame, placement and trophy series

pub mod awards;
pub mod progression;
pub mod ranking;

use chrono::{DateTime, Utc};

use crate::models::{
    BattleRecord, ClanMember, MemberBattleData, MemberStats, PlayerProfile, Tag, WarLogEntry,
    WarParticipant,
};

/// Inputs shared by every member of one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct ClanContext<'a> {
    pub clan_tag: &'a Tag,
    pub war_log: &'a [WarLogEntry],
    pub live_participants: &'a [WarParticipant],
    pub now: DateTime<Utc>,
}

/// Fold wins (draws count half) over counted battles.
///
/// Returns `(win_rate, counted_battles)`; the rate is `None` when nothing counted.
pub fn calculate_win_rate(battles: &[&BattleRecord]) -> (Option<f64>, u32) {
    let mut wins = 0.0;
    let mut counted = 0u32;

    for credit in battles.iter().filter_map(|b| b.result().win_credit()) {
        wins += credit;
        counted += 1;
    }

    let win_rate = if counted > 0 {
        Some(wins / counted as f64)
    } else {
        None
    };
    (win_rate, counted)
}

/// Hours between `now` and the latest timestamped battle; infinite when none.
pub fn hours_since_last_battle(battles: &[&BattleRecord], now: DateTime<Utc>) -> f64 {
    battles
        .iter()
        .filter_map(|b| b.timestamp())
        .max()
        .map(|latest| (now - latest).num_milliseconds() as f64 / 3_600_000.0)
        .unwrap_or(f64::INFINITY)
}

/// Starting trophies from the oldest battle that records them.
///
/// `battles` is newest-first, so this walks it backwards.
pub fn oldest_starting_trophies(battles: &[&BattleRecord], member: &Tag) -> Option<i64> {
    battles
        .iter()
        .rev()
        .find_map(|b| b.team_entry_for(member).and_then(|p| p.starting_trophies))
}

/// Total war-log fame for `member` divided by the number of periods.
///
/// Periods the member missed count as zero, as do periods before they joined.
pub fn calculate_average_war_fame(war_log: &[WarLogEntry], clan: &Tag, member: &Tag) -> f64 {
    if war_log.is_empty() {
        return 0.0;
    }

    let total: i64 = war_log
        .iter()
        .filter_map(|entry| entry.standing_for(clan))
        .filter_map(|standing| standing.clan.fame_of(member))
        .sum();

    total as f64 / war_log.len() as f64
}

/// Build one member's statistics record.
pub fn build_member_stats(
    member: &ClanMember,
    player: Option<&PlayerProfile>,
    battle_log: &[BattleRecord],
    ctx: &ClanContext<'_>,
) -> MemberStats {
    let member_tag = member.canonical_tag();
    let eligible: Vec<&BattleRecord> = battle_log.iter().filter(|b| b.is_eligible()).collect();

    let (win_rate, counted_battles) = calculate_win_rate(&eligible);
    let hours_since_last_battle = hours_since_last_battle(&eligible, ctx.now);

    let current_trophies = player.map(|p| p.trophies).unwrap_or(member.trophies);
    let trophy_delta =
        oldest_starting_trophies(&eligible, &member_tag).map(|start| current_trophies - start);

    let average_war_fame = calculate_average_war_fame(ctx.war_log, ctx.clan_tag, &member_tag);

    let current_war_fame = ctx
        .live_participants
        .iter()
        .find(|p| Tag::normalize(&p.tag) == member_tag)
        .map(|p| p.fame)
        .unwrap_or(0);

    MemberStats {
        name: member.name.clone(),
        tag: member.tag.clone(),
        donations: member.donations,
        current_trophies,
        average_war_fame,
        current_war_fame,
        win_rate,
        counted_battles,
        trophy_delta,
        hours_since_last_battle,
    }
}

/// Build statistics for every member, in roster order.
pub fn build_all_member_stats(
    members: &[MemberBattleData],
    ctx: &ClanContext<'_>,
) -> Vec<MemberStats> {
    members
        .iter()
        .map(|m| build_member_stats(&m.member, m.player.as_ref(), &m.battle_log, ctx))
        .collect()
}
