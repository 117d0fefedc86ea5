//! Clan report composition.
//!
//! Turns a loaded [`ClanSnapshot`] into the [`ClanReport`] the presentation
//! layer renders. Everything here is recomputed per run from the snapshot
//! and an explicit `now`.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::calculate::awards::build_member_awards;
use crate::calculate::progression::{average_placement, fame_progression, trophy_progression};
use crate::calculate::ranking::{competition_rank, select_mvp};
use crate::calculate::{build_all_member_stats, ClanContext};
use crate::extract::extract_clan_fame_threshold;
use crate::models::{
    ClanReport, ClanSnapshot, MemberStats, RankedAverageFameMember, RankedCurrentWarMember,
    WarParticipant,
};

/// Live war fame, highest first.
pub fn rank_current_war(participants: &[WarParticipant]) -> Vec<RankedCurrentWarMember> {
    competition_rank(
        participants,
        |p| p.fame as f64,
        true,
        |p| p.name.as_str(),
    )
    .into_iter()
    .map(|entry| RankedCurrentWarMember {
        rank: entry.rank,
        name: entry.item.name.clone(),
        tag: entry.item.tag.clone(),
        fame: entry.item.fame,
    })
    .collect()
}

/// Average historical war fame, highest first.
pub fn rank_average_fame(members: &[MemberStats]) -> Vec<RankedAverageFameMember> {
    competition_rank(members, |m| m.average_war_fame, true, |m| m.name.as_str())
        .into_iter()
        .map(|entry| RankedAverageFameMember {
            rank: entry.rank,
            name: entry.item.name.clone(),
            tag: entry.item.tag.clone(),
            average_fame: entry.value,
        })
        .collect()
}

/// Build the full report for one snapshot.
pub fn analyze(snapshot: &ClanSnapshot, now: DateTime<Utc>) -> ClanReport {
    let clan_tag = snapshot.clan.canonical_tag();
    let live_participants = snapshot.current_war.participants_for(&clan_tag);

    let ctx = ClanContext {
        clan_tag: &clan_tag,
        war_log: &snapshot.war_log,
        live_participants,
        now,
    };
    let members = build_all_member_stats(&snapshot.members, &ctx);

    let fame_points = fame_progression(&snapshot.war_log, &clan_tag);
    let average_placement = average_placement(&fame_points);
    let trophy_points = trophy_progression(
        &snapshot.war_log,
        &clan_tag,
        snapshot.clan.clan_war_trophies,
    );

    let description = Some(snapshot.clan.description.as_str());
    let fame_threshold = extract_clan_fame_threshold(description);

    debug!(
        "Analyzed {}: {} members, {} war periods, threshold {:?}",
        clan_tag,
        members.len(),
        snapshot.war_log.len(),
        fame_threshold
    );

    ClanReport {
        clan: snapshot.clan.clone(),
        fame_threshold,
        has_active_war: snapshot.current_war.is_active(),
        current_war_rankings: rank_current_war(live_participants),
        average_fame_rankings: rank_average_fame(&members),
        mvp: select_mvp(&members),
        awards: build_member_awards(&members),
        fame_progression: fame_points,
        trophy_progression: trophy_points,
        average_placement,
        members,
        generated_at: now,
    }
}
