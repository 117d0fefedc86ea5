//! Battle log entries and their classification.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Tag;

/// Battle types that count towards clan-war performance metrics.
pub const ELIGIBLE_BATTLE_TYPES: [&str; 8] = [
    "RIVER_RACE_PVP",
    "RIVER_RACE_DUEL",
    "RIVER_RACE_DUEL_COLOSSEUM",
    "BOAT_BATTLE",
    "PATH_OF_LEGEND",
    "PVP",
    "CHALLENGE",
    "PVP2v2",
];

static BATTLE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})(?:\.\d+)?Z?$")
        .expect("battle time pattern is valid")
});

/// One side's participant in a logged battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleParticipant {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub crowns: Option<u32>,
    #[serde(default)]
    pub starting_trophies: Option<i64>,
}

/// One logged match, as returned by the upstream battle log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRecord {
    #[serde(rename = "type", default)]
    pub battle_type: Option<String>,
    #[serde(default)]
    pub battle_time: Option<String>,
    #[serde(default)]
    pub team: Vec<BattleParticipant>,
    #[serde(default)]
    pub opponent: Vec<BattleParticipant>,
}

/// Outcome of a battle from the logging player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleResult {
    Win,
    Loss,
    Draw,
    /// Crown data missing on at least one side
    Unknown,
}

impl BattleResult {
    /// Contribution to the win total; `None` when the battle is not counted.
    pub fn win_credit(&self) -> Option<f64> {
        match self {
            BattleResult::Win => Some(1.0),
            BattleResult::Draw => Some(0.5),
            BattleResult::Loss => Some(0.0),
            BattleResult::Unknown => None,
        }
    }
}

impl BattleRecord {
    /// Whether this battle's type is on the eligible allow-list.
    pub fn is_eligible(&self) -> bool {
        self.battle_type
            .as_deref()
            .is_some_and(is_eligible_battle_type)
    }

    /// Compare the best crown count on each side.
    pub fn result(&self) -> BattleResult {
        let (Some(ours), Some(theirs)) = (max_crowns(&self.team), max_crowns(&self.opponent))
        else {
            return BattleResult::Unknown;
        };

        match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => BattleResult::Win,
            std::cmp::Ordering::Less => BattleResult::Loss,
            std::cmp::Ordering::Equal => BattleResult::Draw,
        }
    }

    /// Parsed battle time, `None` if absent or malformed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.battle_time.as_deref().and_then(parse_battle_time)
    }

    /// The team entry for `member`, falling back to the first team entry.
    pub fn team_entry_for(&self, member: &Tag) -> Option<&BattleParticipant> {
        self.team
            .iter()
            .find(|p| p.tag.as_deref().map(Tag::normalize).as_ref() == Some(member))
            .or_else(|| self.team.first())
    }
}

/// Strip non-alphanumerics and uppercase, so `pvp-2v2` and `PVP2v2` compare equal.
pub fn canonical_battle_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

pub fn is_eligible_battle_type(raw: &str) -> bool {
    let canonical = canonical_battle_type(raw);
    ELIGIBLE_BATTLE_TYPES
        .iter()
        .any(|t| canonical_battle_type(t) == canonical)
}

/// Free-function form of [`BattleRecord::result`].
pub fn battle_result(record: &BattleRecord) -> BattleResult {
    record.result()
}

/// Parse a compact `YYYYMMDDTHHMMSS[.fff][Z]` battle timestamp.
pub fn parse_battle_time(raw: &str) -> Option<DateTime<Utc>> {
    let caps = BATTLE_TIME.captures(raw.trim())?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = i32::try_from(field(1)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?;
    let datetime = date.and_hms_opt(field(4)?, field(5)?, field(6)?)?;
    Some(datetime.and_utc())
}

fn max_crowns(side: &[BattleParticipant]) -> Option<u32> {
    side.iter().filter_map(|p| p.crowns).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn side(crowns: &[Option<u32>]) -> Vec<BattleParticipant> {
        crowns
            .iter()
            .map(|c| BattleParticipant {
                crowns: *c,
                ..Default::default()
            })
            .collect()
    }

    fn battle(team: &[Option<u32>], opponent: &[Option<u32>]) -> BattleRecord {
        BattleRecord {
            battle_type: Some("PvP".to_string()),
            battle_time: None,
            team: side(team),
            opponent: side(opponent),
        }
    }

    #[test]
    fn test_eligible_types() {
        assert!(is_eligible_battle_type("riverRacePvP"));
        assert!(is_eligible_battle_type("RIVER_RACE_DUEL_COLOSSEUM"));
        assert!(is_eligible_battle_type("boatBattle"));
        assert!(is_eligible_battle_type("pathOfLegend"));
        assert!(is_eligible_battle_type("PvP"));
        assert!(is_eligible_battle_type("pvp-2v2"));
        assert!(is_eligible_battle_type("challenge"));
    }

    #[test]
    fn test_ineligible_types() {
        assert!(!is_eligible_battle_type("friendly"));
        assert!(!is_eligible_battle_type("clanMate"));
        assert!(!is_eligible_battle_type("trail"));
        assert!(!is_eligible_battle_type(""));

        let record = BattleRecord::default();
        assert!(!record.is_eligible());
    }

    #[test]
    fn test_battle_result() {
        assert_eq!(battle(&[Some(3)], &[Some(1)]).result(), BattleResult::Win);
        assert_eq!(battle(&[Some(0)], &[Some(2)]).result(), BattleResult::Loss);
        assert_eq!(battle(&[Some(1)], &[Some(1)]).result(), BattleResult::Draw);
    }

    #[test]
    fn test_battle_result_uses_max_crowns_per_side() {
        // 2v2: best crown count on each side decides
        let record = battle(&[Some(0), Some(2)], &[Some(1), None]);
        assert_eq!(record.result(), BattleResult::Win);
    }

    #[test]
    fn test_battle_result_unknown_without_crowns() {
        assert_eq!(battle(&[], &[Some(1)]).result(), BattleResult::Unknown);
        assert_eq!(battle(&[None], &[Some(1)]).result(), BattleResult::Unknown);
        assert_eq!(battle(&[Some(1)], &[None]).result(), BattleResult::Unknown);
        assert_eq!(BattleResult::Unknown.win_credit(), None);
    }

    #[test]
    fn test_parse_battle_time() {
        let ts = parse_battle_time("20240315T120530.000Z").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 5);
        assert_eq!(ts.second(), 30);

        assert!(parse_battle_time("20240315T120530").is_some());
        assert!(parse_battle_time(" 20240315T120530Z ").is_some());
    }

    #[test]
    fn test_parse_battle_time_malformed() {
        assert!(parse_battle_time("").is_none());
        assert!(parse_battle_time("2024-03-15T12:05:30Z").is_none());
        assert!(parse_battle_time("20241345T120530Z").is_none());
        assert!(parse_battle_time("20240230T120530Z").is_none());
        assert!(parse_battle_time("20240315T250000Z").is_none());
    }

    #[test]
    fn test_team_entry_for_falls_back_to_first() {
        let record = BattleRecord {
            team: vec![
                BattleParticipant {
                    tag: Some("#AAA".to_string()),
                    starting_trophies: Some(5000),
                    ..Default::default()
                },
                BattleParticipant {
                    tag: Some("#BBB".to_string()),
                    starting_trophies: Some(6000),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let bbb = record.team_entry_for(&Tag::from("bbb")).unwrap();
        assert_eq!(bbb.starting_trophies, Some(6000));

        let unknown = record.team_entry_for(&Tag::from("ZZZ")).unwrap();
        assert_eq!(unknown.starting_trophies, Some(5000));

        assert!(BattleRecord::default()
            .team_entry_for(&Tag::from("AAA"))
            .is_none());
    }

    #[test]
    fn test_deserialize_upstream_battle() {
        let json = r##"{
            "type": "riverRacePvP",
            "battleTime": "20240315T120530.000Z",
            "team": [{"tag": "#AAA", "name": "Alice", "crowns": 2, "startingTrophies": 7000}],
            "opponent": [{"tag": "#ZZZ", "crowns": 1}]
        }"##;
        let record: BattleRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_eligible());
        assert_eq!(record.result(), BattleResult::Win);
        assert_eq!(record.team[0].starting_trophies, Some(7000));
        assert!(record.timestamp().is_some());
    }

    #[test]
    fn test_deserialize_sparse_battle() {
        let record: BattleRecord = serde_json::from_str("{}").unwrap();
        assert!(record.team.is_empty());
        assert_eq!(record.result(), BattleResult::Unknown);
        assert!(record.timestamp().is_none());
    }
}
