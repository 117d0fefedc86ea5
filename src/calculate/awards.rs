//! Member award categories.

use crate::calculate::ranking::award_placements;
use crate::models::{AwardEntry, AwardKind, MemberAward, MemberStats};

/// Format a duration in hours as `3d 4h` / `5h`.
pub fn format_duration_from_hours(hours: f64) -> String {
    if !hours.is_finite() {
        return "No eligible battles".to_string();
    }

    let whole = hours.floor().max(0.0) as u64;
    let days = whole / 24;
    let rem = whole % 24;

    if days > 0 {
        format!("{}d {}h", days, rem)
    } else {
        format!("{}h", rem)
    }
}

/// Format a rate in `[0, 1]` as a percentage with one decimal, halves rounded up.
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", (rate * 1000.0).round() / 10.0)
}

fn format_signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

/// Award input rows for one category, already filtered to eligible members.
pub fn award_entries(kind: AwardKind, members: &[MemberStats]) -> Vec<AwardEntry> {
    match kind {
        AwardKind::HighestWinRate => members
            .iter()
            .filter(|m| m.has_counted_battles())
            .filter_map(|m| {
                let rate = m.win_rate?;
                Some(AwardEntry::new(&m.name, &m.tag, rate, format_percent(rate)))
            })
            .collect(),
        AwardKind::MostDonations => members
            .iter()
            .map(|m| AwardEntry::new(&m.name, &m.tag, m.donations as f64, m.donations.to_string()))
            .collect(),
        AwardKind::MostClimbed => members
            .iter()
            .filter_map(|m| {
                let delta = m.trophy_delta?;
                Some(AwardEntry::new(&m.name, &m.tag, delta as f64, format_signed(delta)))
            })
            .collect(),
        AwardKind::MostHardstuck => members
            .iter()
            .filter_map(|m| {
                let delta = m.trophy_delta.filter(|d| *d <= 0)?;
                Some(AwardEntry::new(&m.name, &m.tag, delta as f64, delta.to_string()))
            })
            .collect(),
        AwardKind::Ghost => members
            .iter()
            .map(|m| {
                AwardEntry::new(
                    &m.name,
                    &m.tag,
                    m.hours_since_last_battle,
                    format_duration_from_hours(m.hours_since_last_battle),
                )
            })
            .collect(),
    }
}

/// Compute one award category.
pub fn build_award(kind: AwardKind, members: &[MemberStats]) -> MemberAward {
    MemberAward::new(
        kind,
        award_placements(award_entries(kind, members), kind.descending()),
    )
}

/// Compute every award category, in display order.
pub fn build_member_awards(members: &[MemberStats]) -> Vec<MemberAward> {
    AwardKind::ALL
        .iter()
        .map(|kind| build_award(*kind, members))
        .collect()
}
