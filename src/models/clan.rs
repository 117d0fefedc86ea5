//! Clan profile, roster and player models as served by the upstream API.

use serde::{Deserialize, Serialize};

use super::Tag;

/// Clan profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanProfile {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub clan_type: String,
    #[serde(default)]
    pub clan_score: i64,
    #[serde(default)]
    pub clan_war_trophies: i64,
    #[serde(default)]
    pub required_trophies: i64,
    #[serde(default)]
    pub donations_per_week: i64,
    /// Member count
    #[serde(default)]
    pub members: u32,
}

impl ClanProfile {
    pub fn canonical_tag(&self) -> Tag {
        Tag::normalize(&self.tag)
    }
}

/// One roster entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub exp_level: u32,
    #[serde(default)]
    pub trophies: i64,
    #[serde(default)]
    pub donations: i64,
    #[serde(default)]
    pub donations_received: i64,
    #[serde(default)]
    pub clan_rank: u32,
    #[serde(default)]
    pub previous_clan_rank: u32,
}

impl ClanMember {
    pub fn canonical_tag(&self) -> Tag {
        Tag::normalize(&self.tag)
    }
}

/// Roster response wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClanMembersResponse {
    #[serde(default)]
    pub items: Vec<ClanMember>,
}

/// Live player profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub trophies: i64,
}
