use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::records::{MatchRecord, MatchResult, ScorerRecord, StandingRecord};

pub const DEFAULT_TEAM_RANGE: RangeInclusive<usize> = 19..=23;

/// Rank pairs compared by [`rank_gaps`], higher-placed rank first.
pub const TITLE_TO_FOURTH: (u32, u32) = (1, 4);
pub const TOP_FOUR_CUTOFF: (u32, u32) = (4, 5);
pub const RELEGATION_BATTLE: (u32, u32) = (17, 18);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonValue {
    pub season: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeShare {
    pub season: i32,
    pub home: f64,
    pub away: f64,
    pub draw: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerTotal {
    pub name: String,
    pub goals: u64,
    pub assists: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankGaps {
    pub season: i32,
    pub title_to_fourth: Option<f64>,
    pub top_four_cutoff: Option<f64>,
    pub relegation_battle: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaceRow {
    pub season: i32,
    pub mins_per_goal: Option<f64>,
    pub goals_per_match: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Max,
    Min,
}

pub fn count_by_season<T>(records: &[T], season: impl Fn(&T) -> Option<i32>) -> BTreeMap<i32, usize> {
    let mut out = BTreeMap::new();
    for r in records {
        if let Some(s) = season(r) {
            *out.entry(s).or_insert(0usize) += 1;
        }
    }
    out
}

pub fn teams_per_season(standings: &[StandingRecord]) -> Vec<SeasonValue> {
    count_by_season(standings, |r| r.season)
        .into_iter()
        .map(|(season, n)| SeasonValue {
            season,
            value: n as f64,
        })
        .collect()
}

/// Seasons whose team count falls outside `range` are left out of trend charts.
pub fn teams_per_season_in_range(
    standings: &[StandingRecord],
    range: &RangeInclusive<usize>,
) -> Vec<SeasonValue> {
    count_by_season(standings, |r| r.season)
        .into_iter()
        .filter(|(_, n)| range.contains(n))
        .map(|(season, n)| SeasonValue {
            season,
            value: n as f64,
        })
        .collect()
}

pub fn seasons_in_range(standings: &[StandingRecord], range: &RangeInclusive<usize>) -> Vec<i32> {
    teams_per_season_in_range(standings, range)
        .into_iter()
        .map(|sv| sv.season)
        .collect()
}

/// Mean of `value` per season. Records with an absent key or value count
/// towards neither sum nor denominator, so empty groups never appear.
pub fn mean_by_season<T>(
    records: &[T],
    season: impl Fn(&T) -> Option<i32>,
    value: impl Fn(&T) -> Option<f64>,
) -> Vec<SeasonValue> {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for r in records {
        let (Some(s), Some(v)) = (season(r), value(r)) else {
            continue;
        };
        if !v.is_finite() {
            continue;
        }
        let entry = groups.entry(s).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .filter(|(_, (_, n))| *n > 0)
        .map(|(season, (sum, n))| SeasonValue {
            season,
            value: sum / n as f64,
        })
        .filter(|sv| sv.value.is_finite())
        .collect()
}

pub fn average_goals_per_match(matches: &[MatchRecord]) -> Vec<SeasonValue> {
    mean_by_season(matches, |m| m.season, |m| m.total_goals().map(f64::from))
}

pub fn average_home_goals(matches: &[MatchRecord]) -> Vec<SeasonValue> {
    mean_by_season(matches, |m| m.season, |m| m.home_goals.map(f64::from))
}

pub fn average_away_goals(matches: &[MatchRecord]) -> Vec<SeasonValue> {
    mean_by_season(matches, |m| m.season, |m| m.away_goals.map(f64::from))
}

/// Percentage (0..=100) of a season's decided matches ending in `target`.
pub fn outcome_rate(matches: &[MatchRecord], target: MatchResult) -> Vec<SeasonValue> {
    mean_by_season(
        matches,
        |m| m.season,
        |m| m.result.map(|r| if r == target { 100.0 } else { 0.0 }),
    )
}

pub fn outcome_shares(matches: &[MatchRecord]) -> Vec<OutcomeShare> {
    let home = outcome_rate(matches, MatchResult::Home);
    let away: HashMap<i32, f64> = outcome_rate(matches, MatchResult::Away)
        .into_iter()
        .map(|sv| (sv.season, sv.value))
        .collect();
    let draw: HashMap<i32, f64> = outcome_rate(matches, MatchResult::Draw)
        .into_iter()
        .map(|sv| (sv.season, sv.value))
        .collect();

    // All three rates share a denominator, so the season sets match.
    home.into_iter()
        .map(|h| OutcomeShare {
            season: h.season,
            home: h.value,
            away: away.get(&h.season).copied().unwrap_or(0.0),
            draw: draw.get(&h.season).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Sample standard deviation (n - 1). Undefined below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0);
    let std = var.sqrt();
    std.is_finite().then_some(std)
}

pub fn dispersion_by_season<T>(
    records: &[T],
    season: impl Fn(&T) -> Option<i32>,
    value: impl Fn(&T) -> Option<f64>,
) -> Vec<SeasonValue> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in records {
        let (Some(s), Some(v)) = (season(r), value(r)) else {
            continue;
        };
        groups.entry(s).or_default().push(v);
    }
    groups
        .into_iter()
        .filter_map(|(season, values)| {
            sample_std_dev(&values).map(|value| SeasonValue { season, value })
        })
        .collect()
}

pub fn points_dispersion(standings: &[StandingRecord]) -> Vec<SeasonValue> {
    dispersion_by_season(standings, |r| r.season, |r| r.points.map(f64::from))
}

/// Sums `value` per key in first-seen key order, then keeps the `n` largest.
/// Ties keep first-seen order.
pub fn top_n_by<T>(
    records: &[T],
    key: impl Fn(&T) -> Option<&str>,
    value: impl Fn(&T) -> Option<f64>,
    n: usize,
) -> Vec<(String, f64)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();
    for r in records {
        let Some(k) = key(r) else {
            continue;
        };
        let slot = match index.get(k) {
            Some(&i) => i,
            None => {
                index.insert(k.to_string(), totals.len());
                totals.push((k.to_string(), 0.0));
                totals.len() - 1
            }
        };
        if let Some(v) = value(r).filter(|v| v.is_finite()) {
            totals[slot].1 += v;
        }
    }
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals.truncate(n);
    totals
}

/// Career goals + assists across every listed season, highest first.
pub fn top_contributors(scorers: &[ScorerRecord], n: usize) -> Vec<PlayerTotal> {
    let leaders = top_n_by(
        scorers,
        |r| r.name.as_deref(),
        |r| Some(f64::from(r.goals.unwrap_or(0)) + f64::from(r.assists.unwrap_or(0))),
        n,
    );
    leaders
        .into_iter()
        .map(|(name, _)| {
            let (goals, assists) = scorers
                .iter()
                .filter(|r| r.name.as_deref() == Some(name.as_str()))
                .fold((0u64, 0u64), |(g, a), r| {
                    (
                        g + u64::from(r.goals.unwrap_or(0)),
                        a + u64::from(r.assists.unwrap_or(0)),
                    )
                });
            PlayerTotal {
                name,
                goals,
                assists,
                total: goals + assists,
            }
        })
        .collect()
}

/// Points gap between two ranks of one season's table. Absent when either
/// rank (or its points) is missing.
pub fn rank_gap(season_rows: &[&StandingRecord], high: u32, low: u32) -> Option<f64> {
    let points_at = |rank: u32| {
        season_rows
            .iter()
            .find(|r| r.position == Some(rank))
            .and_then(|r| r.points)
    };
    let hi = points_at(high)?;
    let lo = points_at(low)?;
    Some(f64::from(hi) - f64::from(lo))
}

pub fn rank_gaps(standings: &[StandingRecord]) -> Vec<RankGaps> {
    let mut by_season: BTreeMap<i32, Vec<&StandingRecord>> = BTreeMap::new();
    for r in standings {
        if let Some(s) = r.season {
            by_season.entry(s).or_default().push(r);
        }
    }
    by_season
        .into_iter()
        .map(|(season, rows)| RankGaps {
            season,
            title_to_fourth: rank_gap(&rows, TITLE_TO_FOURTH.0, TITLE_TO_FOURTH.1),
            top_four_cutoff: rank_gap(&rows, TOP_FOUR_CUTOFF.0, TOP_FOUR_CUTOFF.1),
            relegation_battle: rank_gap(&rows, RELEGATION_BATTLE.0, RELEGATION_BATTLE.1),
        })
        .collect()
}

/// Picks the largest or smallest value, first season wins a tie. With
/// `recent = Some(k)` only the last `k` seasons are searched.
pub fn select_extremum(
    items: &[SeasonValue],
    which: Extremum,
    recent: Option<usize>,
) -> Option<SeasonValue> {
    let mut ordered: Vec<SeasonValue> = items.iter().copied().filter(|sv| sv.value.is_finite()).collect();
    ordered.sort_by_key(|sv| sv.season);
    let start = match recent {
        Some(k) => ordered.len().saturating_sub(k),
        None => 0,
    };

    let mut best: Option<SeasonValue> = None;
    for sv in &ordered[start..] {
        let better = match best {
            None => true,
            Some(b) => match which {
                Extremum::Max => sv.value > b.value,
                Extremum::Min => sv.value < b.value,
            },
        };
        if better {
            best = Some(*sv);
        }
    }
    best
}

pub fn scorer_pace(scorers: &[ScorerRecord]) -> Vec<PaceRow> {
    let mins = mean_by_season(scorers, |r| r.season, |r| r.mins_per_goal.get());
    let gpm = mean_by_season(scorers, |r| r.season, |r| r.goals_per_match);

    let mut rows: BTreeMap<i32, PaceRow> = BTreeMap::new();
    for sv in mins {
        rows.entry(sv.season)
            .or_insert(PaceRow {
                season: sv.season,
                mins_per_goal: None,
                goals_per_match: None,
            })
            .mins_per_goal = Some(sv.value);
    }
    for sv in gpm {
        rows.entry(sv.season)
            .or_insert(PaceRow {
                season: sv.season,
                mins_per_goal: None,
                goals_per_match: None,
            })
            .goals_per_match = Some(sv.value);
    }
    rows.into_values().collect()
}
