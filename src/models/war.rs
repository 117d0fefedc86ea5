//! River race (clan war) models: the historical war log and the live snapshot.

use serde::{Deserialize, Deserializer, Serialize};

use super::{ClanProfile, Tag};

/// A member's contribution to one river race period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarParticipant {
    pub tag: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fame: i64,
    #[serde(default)]
    pub repair_points: i64,
    #[serde(default)]
    pub boat_attacks: u32,
    #[serde(default)]
    pub decks_used: u32,
    #[serde(default)]
    pub decks_used_today: u32,
}

/// A clan's entry inside a war-log standing or a live race.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceClan {
    pub tag: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fame: i64,
    #[serde(default)]
    pub repair_points: i64,
    /// The upstream occasionally reports a bare count here; that reads as no list.
    #[serde(default, deserialize_with = "participant_list")]
    pub participants: Vec<WarParticipant>,
}

impl RaceClan {
    pub fn is_clan(&self, tag: &Tag) -> bool {
        Tag::normalize(&self.tag) == *tag
    }

    /// Fame earned by `member` in this period, if they took part.
    pub fn fame_of(&self, member: &Tag) -> Option<i64> {
        self.participants
            .iter()
            .find(|p| Tag::normalize(&p.tag) == *member)
            .map(|p| p.fame)
    }
}

fn participant_list<'de, D>(deserializer: D) -> Result<Vec<WarParticipant>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

/// One clan's result in a finished period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarStanding {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub trophy_change: i64,
    pub clan: RaceClan,
}

/// One historical river race period. The upstream lists these newest-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLogEntry {
    #[serde(default)]
    pub season_id: u32,
    #[serde(default)]
    pub section_index: u32,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub standings: Vec<WarStanding>,
}

impl WarLogEntry {
    /// The standing belonging to `clan`, if it took part in this period.
    pub fn standing_for(&self, clan: &Tag) -> Option<&WarStanding> {
        self.standings.iter().find(|s| s.clan.is_clan(clan))
    }

    /// Chart label, e.g. `S112 W3`.
    pub fn label(&self) -> String {
        format!("S{} W{}", self.season_id, self.section_index + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagingCursors {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: PagingCursors,
}

/// One page of the war log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarLogPage {
    #[serde(default)]
    pub items: Vec<WarLogEntry>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl WarLogPage {
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging.as_ref()?.cursors.after.as_deref()
    }
}

/// The live river race period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRiverRace {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub section_index: u32,
    #[serde(default)]
    pub period_type: String,
    #[serde(default)]
    pub clan: Option<RaceClan>,
    #[serde(default)]
    pub clans: Vec<RaceClan>,
}

impl CurrentRiverRace {
    /// Stand-in used when the clan is not in a race at all.
    pub fn not_in_war(clan: &ClanProfile) -> Self {
        Self {
            state: "notInWar".to_string(),
            section_index: 0,
            period_type: "training".to_string(),
            clan: Some(RaceClan {
                tag: clan.tag.clone(),
                name: clan.name.clone(),
                ..Default::default()
            }),
            clans: Vec::new(),
        }
    }

    /// Training days do not count as an active war.
    pub fn is_active(&self) -> bool {
        !self.period_type.eq_ignore_ascii_case("training")
    }

    /// Live participants for `clan`: the `clan` entry, else the matching `clans` entry.
    pub fn participants_for(&self, clan: &Tag) -> &[WarParticipant] {
        self.clan
            .as_ref()
            .or_else(|| self.clans.iter().find(|c| c.is_clan(clan)))
            .map(|c| c.participants.as_slice())
            .unwrap_or(&[])
    }
}
