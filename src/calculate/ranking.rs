//! Competition ranking, award podiums and the MVP score.

use crate::models::{AwardEntry, AwardMember, AwardPlacement, MemberStats, MvpSummary, RankedEntry};

/// Values closer than this share a rank.
pub const RANK_TOLERANCE: f64 = 1e-9;

/// MVP weight for normalized average war fame.
pub const MVP_FAME_WEIGHT: f64 = 0.5;
/// MVP weight for normalized win rate (unknown counts as 0).
pub const MVP_WIN_RATE_WEIGHT: f64 = 0.3;
/// MVP weight for normalized donations.
pub const MVP_DONATION_WEIGHT: f64 = 0.2;

/// Number of podium places an award hands out.
pub const PODIUM_PLACES: u32 = 3;

/// Tolerant equality; non-finite values are only equal to themselves.
pub fn values_equal(a: f64, b: f64) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return a == b;
    }
    (a - b).abs() < RANK_TOLERANCE
}

/// Rank items "1224"-style: tied values share a rank and the next distinct
/// value is ranked by its 1-based position.
///
/// Ties are ordered by name (case-sensitive) so the output is deterministic.
pub fn competition_rank<T, V, N>(
    items: impl IntoIterator<Item = T>,
    value_of: V,
    descending: bool,
    name_of: N,
) -> Vec<RankedEntry<T>>
where
    V: Fn(&T) -> f64,
    N: Fn(&T) -> &str,
{
    let mut valued: Vec<(f64, T)> = items.into_iter().map(|item| (value_of(&item), item)).collect();
    valued.sort_by(|(a, _), (b, _)| {
        let ord = a.total_cmp(b);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });

    // Group runs of tied values around the first value of each run, then
    // order each run by name.
    let mut groups: Vec<Vec<(f64, T)>> = Vec::new();
    for (value, item) in valued {
        match groups.last_mut() {
            Some(group) if values_equal(group[0].0, value) => group.push((value, item)),
            _ => groups.push(vec![(value, item)]),
        }
    }

    let mut ranked = Vec::new();
    let mut position = 0u32;
    for mut group in groups {
        group.sort_by(|(_, a), (_, b)| name_of(a).cmp(name_of(b)));
        let rank = position + 1;
        for (value, item) in group {
            position += 1;
            ranked.push(RankedEntry { rank, item, value });
        }
    }

    ranked
}

/// Compress competition ranks into podium places 1–3.
///
/// The first three distinct rank values become places 1, 2 and 3; everyone
/// sharing a rank shares the place. Later ranks are dropped.
pub fn award_placements(entries: Vec<AwardEntry>, descending: bool) -> Vec<AwardPlacement> {
    let ranked = competition_rank(entries, |e| e.value, descending, |e| e.name.as_str());

    let mut placements: Vec<AwardPlacement> = Vec::new();
    let mut current_rank = None;

    for entry in ranked {
        if current_rank != Some(entry.rank) {
            if placements.len() as u32 >= PODIUM_PLACES {
                break;
            }
            current_rank = Some(entry.rank);
            placements.push(AwardPlacement {
                place: placements.len() as u32 + 1,
                members: Vec::new(),
            });
        }

        if let Some(placement) = placements.last_mut() {
            placement.members.push(AwardMember {
                name: entry.item.name,
                tag: entry.item.tag,
                score_label: entry.item.score_label,
            });
        }
    }

    placements
}

/// Min-max scale `value` into [0, 1] over `all`.
///
/// An empty set scales to 0; a set where every value is equal scales to 1.
pub fn normalize_min_max(value: f64, all: &[f64]) -> f64 {
    if all.is_empty() {
        return 0.0;
    }

    let min = all.iter().copied().fold(f64::INFINITY, f64::min);
    let max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return 1.0;
    }
    (value - min) / (max - min)
}

/// MVP score of `member` against the current member set.
///
/// `0.5 × fame + 0.3 × win rate + 0.2 × donations`, each min-max normalized
/// across `all`. The weights are policy, not derived.
pub fn mvp_score(member: &MemberStats, all: &[MemberStats]) -> f64 {
    let fame: Vec<f64> = all.iter().map(|m| m.average_war_fame).collect();
    let win_rate: Vec<f64> = all.iter().map(|m| m.win_rate.unwrap_or(0.0)).collect();
    let donations: Vec<f64> = all.iter().map(|m| m.donations as f64).collect();

    normalize_min_max(member.average_war_fame, &fame) * MVP_FAME_WEIGHT
        + normalize_min_max(member.win_rate.unwrap_or(0.0), &win_rate) * MVP_WIN_RATE_WEIGHT
        + normalize_min_max(member.donations as f64, &donations) * MVP_DONATION_WEIGHT
}

/// MVP score for every member, in input order.
pub fn mvp_scores(members: &[MemberStats]) -> Vec<f64> {
    members.iter().map(|m| mvp_score(m, members)).collect()
}

/// The member with the highest MVP score, ties broken by name.
pub fn select_mvp(members: &[MemberStats]) -> Option<MvpSummary> {
    let scores = mvp_scores(members);
    let ranked = competition_rank(
        members.iter().zip(scores),
        |(_, score)| *score,
        true,
        |(m, _)| m.name.as_str(),
    );

    ranked.into_iter().next().map(|top| {
        let (member, score) = top.item;
        MvpSummary {
            name: member.name.clone(),
            tag: member.tag.clone(),
            mvp_score: score,
            average_war_fame: member.average_war_fame,
            win_rate: member.win_rate,
            donations: member.donations,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, value: f64) -> AwardEntry {
        AwardEntry::new(name, &format!("#{}", name.to_uppercase()), value, format!("{}", value))
    }

    fn ranks_of(values: &[(&str, f64)], descending: bool) -> Vec<(String, u32)> {
        competition_rank(values.iter().copied(), |(_, v)| *v, descending, |(n, _)| *n)
            .into_iter()
            .map(|r| (r.item.0.to_string(), r.rank))
            .collect()
    }

    fn stats(name: &str, fame: f64, win_rate: Option<f64>, donations: i64) -> MemberStats {
        MemberStats {
            name: name.to_string(),
            tag: format!("#{}", name.to_uppercase()),
            donations,
            current_trophies: 0,
            average_war_fame: fame,
            current_war_fame: 0,
            win_rate,
            counted_battles: u32::from(win_rate.is_some()),
            trophy_delta: None,
            hours_since_last_battle: f64::INFINITY,
        }
    }

    #[test]
    fn test_competition_rank_1224() {
        let ranked = ranks_of(&[("a", 10.0), ("b", 10.0), ("c", 8.0)], true);
        let ranks: Vec<u32> = ranked.iter().map(|(_, r)| *r).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn test_competition_rank_ties_broken_by_name() {
        let ranked = ranks_of(
            &[("carol", 5.0), ("Bob", 7.0), ("alice", 7.0), ("dave", 1.0)],
            true,
        );
        assert_eq!(
            ranked,
            vec![
                ("Bob".to_string(), 1),
                ("alice".to_string(), 1),
                ("carol".to_string(), 3),
                ("dave".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_competition_rank_ascending() {
        let ranked = ranks_of(&[("a", -3.0), ("b", 0.0), ("c", -3.0), ("d", -10.0)], false);
        assert_eq!(
            ranked,
            vec![
                ("d".to_string(), 1),
                ("a".to_string(), 2),
                ("c".to_string(), 2),
                ("b".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_competition_rank_tolerance() {
        let ranked = ranks_of(&[("a", 0.1 + 0.2), ("b", 0.3), ("c", 0.2)], true);
        let ranks: Vec<u32> = ranked.iter().map(|(_, r)| *r).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn test_competition_rank_infinity() {
        let ranked = ranks_of(
            &[("a", 5.0), ("b", f64::INFINITY), ("c", f64::INFINITY), ("d", 50.0)],
            true,
        );
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 1),
                ("c".to_string(), 1),
                ("d".to_string(), 3),
                ("a".to_string(), 4),
            ]
        );

        let ascending = ranks_of(&[("a", f64::INFINITY), ("b", 1.0)], false);
        assert_eq!(ascending[1], ("a".to_string(), 2));
    }

    #[test]
    fn test_competition_rank_empty() {
        let ranked = competition_rank(Vec::<(String, f64)>::new(), |e| e.1, true, |e| e.0.as_str());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_award_placements_four_way_tie() {
        let placements = award_placements(
            vec![entry("a", 9.0), entry("b", 9.0), entry("c", 9.0), entry("d", 9.0)],
            true,
        );
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].place, 1);
        assert_eq!(placements[0].member_names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_award_placements_tie_for_first_then_compressed() {
        // Ranks 1,1,3,4,5 -> places 1,1,2,3 and the fifth entry is dropped
        let placements = award_placements(
            vec![
                entry("e", 1.0),
                entry("a", 10.0),
                entry("b", 10.0),
                entry("c", 8.0),
                entry("d", 5.0),
            ],
            true,
        );
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].member_names(), vec!["a", "b"]);
        assert_eq!(placements[1].place, 2);
        assert_eq!(placements[1].member_names(), vec!["c"]);
        assert_eq!(placements[2].place, 3);
        assert_eq!(placements[2].member_names(), vec!["d"]);
    }

    #[test]
    fn test_award_placements_fewer_than_three() {
        let placements = award_placements(vec![entry("a", 1.0), entry("b", 2.0)], false);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].member_names(), vec!["a"]);
        assert!(award_placements(vec![], true).is_empty());
    }

    #[test]
    fn test_award_placements_keep_score_labels() {
        let placements = award_placements(
            vec![AwardEntry::new("Zoe", "#ZOE", 0.75, "75.0%".to_string())],
            true,
        );
        assert_eq!(placements[0].members[0].score_label, "75.0%");
        assert_eq!(placements[0].members[0].tag, "#ZOE");
    }

    #[test]
    fn test_normalize_min_max() {
        assert_eq!(normalize_min_max(5.0, &[]), 0.0);
        assert_eq!(normalize_min_max(3.0, &[3.0, 3.0]), 1.0);
        assert_eq!(normalize_min_max(0.0, &[0.0, 10.0]), 0.0);
        assert_eq!(normalize_min_max(10.0, &[0.0, 10.0]), 1.0);
        assert!((normalize_min_max(2.5, &[0.0, 10.0]) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_mvp_scores_weights() {
        let members = vec![
            stats("alice", 2000.0, Some(0.5), 0),
            stats("bob", 1000.0, Some(1.0), 100),
        ];
        let scores = mvp_scores(&members);
        assert!((scores[0] - 0.5).abs() < 1e-12);
        assert!((scores[1] - 0.5).abs() < 1e-12);
        assert!((mvp_score(&members[1], &members) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mvp_null_win_rate_counts_as_zero() {
        let members = vec![
            stats("alice", 1000.0, None, 50),
            stats("bob", 1000.0, Some(0.4), 50),
        ];
        let scores = mvp_scores(&members);
        // fame and donations tie (1.0 each), win rate 0 vs 0.4
        assert!((scores[0] - 0.7).abs() < 1e-12);
        assert!((scores[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_mvp_tie_broken_by_name() {
        let members = vec![
            stats("bob", 2000.0, Some(0.5), 0),
            stats("alice", 1000.0, Some(1.0), 100),
        ];
        let mvp = select_mvp(&members).unwrap();
        assert_eq!(mvp.name, "alice");
        assert!((mvp.mvp_score - 0.5).abs() < 1e-12);
        assert_eq!(mvp.donations, 100);
    }

    #[test]
    fn test_select_mvp_clear_winner() {
        let members = vec![
            stats("bob", 500.0, Some(0.2), 10),
            stats("carol", 2500.0, Some(0.8), 300),
        ];
        let mvp = select_mvp(&members).unwrap();
        assert_eq!(mvp.name, "carol");
        assert!((mvp.mvp_score - 1.0).abs() < 1e-12);
        assert_eq!(mvp.win_rate, Some(0.8));
    }

    #[test]
    fn test_select_mvp_empty() {
        assert!(select_mvp(&[]).is_none());
    }
}
