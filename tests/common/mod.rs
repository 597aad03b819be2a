#![allow(dead_code)]

use std::path::PathBuf;

use pl_story::fields::Field;
use pl_story::loader::{Sources, TableSource};
use pl_story::records::{MatchRecord, MatchResult, ScorerRecord, StandingRecord};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_sources() -> Sources {
    Sources {
        matches: TableSource::Path(fixture("matches.csv")),
        standings: TableSource::Path(fixture("standings.csv")),
        scorers: TableSource::Path(fixture("scorers.csv")),
    }
}

pub fn game(season: i32, home_goals: u32, away_goals: u32) -> MatchRecord {
    let result = match home_goals.cmp(&away_goals) {
        std::cmp::Ordering::Greater => MatchResult::Home,
        std::cmp::Ordering::Less => MatchResult::Away,
        std::cmp::Ordering::Equal => MatchResult::Draw,
    };
    MatchRecord {
        season: Some(season),
        week: Some(1),
        date: None,
        home: Some("Home FC".to_string()),
        away: Some("Away FC".to_string()),
        home_goals: Some(home_goals),
        away_goals: Some(away_goals),
        result: Some(result),
    }
}

pub fn standing(season: i32, position: u32, points: u32) -> StandingRecord {
    StandingRecord {
        season: Some(season),
        position: Some(position),
        club: Some(format!("Club {position}")),
        games_played: Some(38),
        wins: None,
        draws: None,
        losses: None,
        points: Some(points),
        goals_for: None,
        goals_against: None,
        goal_difference: None,
        clean_sheets: None,
    }
}

/// A full table for `season` with `teams` clubs, points falling by two per place.
pub fn table(season: i32, teams: u32) -> Vec<StandingRecord> {
    (1..=teams)
        .map(|pos| standing(season, pos, 100 - 2 * pos))
        .collect()
}

pub fn scorer(season: i32, name: &str, goals: u32, assists: u32) -> ScorerRecord {
    ScorerRecord {
        season: Some(season),
        rank: Some(1),
        name: Some(name.to_string()),
        team: Some("Test FC".to_string()),
        goals: Some(goals),
        assists: Some(assists),
        goal_involvements: goals.checked_add(assists),
        appearances: Some(30),
        age: Some(27),
        penalties: Some(0),
        market_value: Field::Missing,
        minutes_played: Field::Present(2700),
        mins_per_goal: Field::Present(2700.0 / f64::from(goals.max(1))),
        goals_per_match: Some(f64::from(goals) / 30.0),
    }
}
