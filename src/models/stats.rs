//! Derived per-member statistics.

use serde::Serialize;

/// Per-member statistics, rebuilt on every analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberStats {
    pub name: String,

    /// Tag as listed on the roster
    pub tag: String,

    pub donations: i64,

    /// Live profile trophies, falling back to the roster figure
    pub current_trophies: i64,

    /// Total war-log fame divided by the number of war-log periods
    pub average_war_fame: f64,

    /// Fame in the live period (0 when not yet participating)
    pub current_war_fame: i64,

    /// Wins (draws count half) over counted battles; `None` with no counted battles
    pub win_rate: Option<f64>,

    /// Eligible battles with crown data on both sides
    pub counted_battles: u32,

    /// Current trophies minus the starting trophies of the oldest eligible battle
    pub trophy_delta: Option<i64>,

    /// `f64::INFINITY` when there is no timestamped eligible battle (serialized as null)
    pub hours_since_last_battle: f64,
}

impl MemberStats {
    pub fn has_counted_battles(&self) -> bool {
        self.counted_battles > 0 && self.win_rate.is_some()
    }

    pub fn has_battled(&self) -> bool {
        self.hours_since_last_battle.is_finite()
    }
}

/// The top member by MVP score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvpSummary {
    pub name: String,
    pub tag: String,
    pub mvp_score: f64,
    pub average_war_fame: f64,
    pub win_rate: Option<f64>,
    pub donations: i64,
}
