//! Chronological clan war series for charting.

use crate::models::{FamePoint, Tag, TrophyPoint, WarLogEntry};

/// Clan fame and placement per period, oldest first.
pub fn fame_progression(war_log: &[WarLogEntry], clan: &Tag) -> Vec<FamePoint> {
    war_log
        .iter()
        .rev()
        .map(|entry| {
            let standing = entry.standing_for(clan);
            FamePoint {
                label: entry.label(),
                fame: standing.map(|s| s.clan.fame).unwrap_or(0),
                placement: standing.map(|s| s.rank),
            }
        })
        .collect()
}

/// Mean placement over periods where the clan has a standing.
pub fn average_placement(progression: &[FamePoint]) -> Option<f64> {
    let placements: Vec<u32> = progression.iter().filter_map(|p| p.placement).collect();
    if placements.is_empty() {
        return None;
    }
    let sum: u64 = placements.iter().map(|p| u64::from(*p)).sum();
    Some(sum as f64 / placements.len() as f64)
}

/// Reconstruct clan war trophies per period, oldest first.
///
/// The log only stores deltas, so the series starts from the current total
/// minus every delta and accumulates forward; the last point always equals
/// `current_trophies`.
pub fn trophy_progression(
    war_log: &[WarLogEntry],
    clan: &Tag,
    current_trophies: i64,
) -> Vec<TrophyPoint> {
    let chronological: Vec<(String, i64)> = war_log
        .iter()
        .rev()
        .map(|entry| {
            let change = entry.standing_for(clan).map(|s| s.trophy_change).unwrap_or(0);
            (entry.label(), change)
        })
        .collect();

    let total_change: i64 = chronological.iter().map(|(_, change)| change).sum();
    let mut running = current_trophies - total_change;

    chronological
        .into_iter()
        .map(|(label, trophy_change)| {
            running += trophy_change;
            TrophyPoint {
                label,
                clan_war_trophies: running,
                trophy_change,
            }
        })
        .collect()
}
