//! Ranked entries and award podium placements.

use serde::Serialize;

/// A value with its 1-based competition ("1224") rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<T> {
    pub rank: u32,
    pub item: T,
    pub value: f64,
}

/// Input row for an award: who, the metric value, and how to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardEntry {
    pub name: String,
    pub tag: String,
    pub value: f64,
    pub score_label: String,
}

impl AwardEntry {
    pub fn new(name: &str, tag: &str, value: f64, score_label: String) -> Self {
        Self {
            name: name.to_string(),
            tag: tag.to_string(),
            value,
            score_label,
        }
    }
}

/// A member standing on a podium place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardMember {
    pub name: String,
    pub tag: String,
    pub score_label: String,
}

/// A podium place (1–3) and everyone tied on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardPlacement {
    pub place: u32,
    pub members: Vec<AwardMember>,
}

impl AwardPlacement {
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }
}

/// The award categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    HighestWinRate,
    MostDonations,
    MostClimbed,
    MostHardstuck,
    Ghost,
}

impl AwardKind {
    pub const ALL: [AwardKind; 5] = [
        AwardKind::HighestWinRate,
        AwardKind::MostDonations,
        AwardKind::MostClimbed,
        AwardKind::MostHardstuck,
        AwardKind::Ghost,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AwardKind::HighestWinRate => "Highest Recent Winrate",
            AwardKind::MostDonations => "Most Recent Donations",
            AwardKind::MostClimbed => "Most Climbed",
            AwardKind::MostHardstuck => "Most Hardstuck",
            AwardKind::Ghost => "Ghost",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            AwardKind::HighestWinRate => "No eligible battle log data found.",
            AwardKind::MostDonations => "No donation data found.",
            AwardKind::MostClimbed => "No trophy climb data found.",
            AwardKind::MostHardstuck => "No hardstuck members found.",
            AwardKind::Ghost => "No battle activity data found.",
        }
    }

    /// Whether a higher metric value ranks first.
    pub fn descending(&self) -> bool {
        !matches!(self, AwardKind::MostHardstuck)
    }
}

/// One award category's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAward {
    pub kind: AwardKind,
    pub title: String,
    pub placements: Vec<AwardPlacement>,
    pub empty_message: String,
}

impl MemberAward {
    pub fn new(kind: AwardKind, placements: Vec<AwardPlacement>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            placements,
            empty_message: kind.empty_message().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
