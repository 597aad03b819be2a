use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{
    Field, optional_text, parse_date, parse_decimal, parse_delimited_decimal,
    parse_delimited_int, parse_int, text_field,
};
use crate::raw_table::RawRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Home,
    Away,
    Draw,
}

impl MatchResult {
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "H" => Some(Self::Home),
            "A" => Some(Self::Away),
            "D" => Some(Self::Draw),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home win",
            Self::Away => "Away win",
            Self::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub season: Option<i32>,
    pub week: Option<u32>,
    pub date: Option<NaiveDate>,
    pub home: Option<String>,
    pub away: Option<String>,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub result: Option<MatchResult>,
}

impl MatchRecord {
    /// Absent when either side is missing or the sum does not fit.
    pub fn total_goals(&self) -> Option<u32> {
        self.home_goals?.checked_add(self.away_goals?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRecord {
    pub season: Option<i32>,
    pub position: Option<u32>,
    pub club: Option<String>,
    pub games_played: Option<u32>,
    pub wins: Option<u32>,
    pub draws: Option<u32>,
    pub losses: Option<u32>,
    pub points: Option<u32>,
    pub goals_for: Option<i32>,
    pub goals_against: Option<i32>,
    pub goal_difference: Option<i32>,
    pub clean_sheets: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerRecord {
    pub season: Option<i32>,
    pub rank: Option<u32>,
    pub name: Option<String>,
    pub team: Option<String>,
    pub goals: Option<u32>,
    pub assists: Option<u32>,
    pub goal_involvements: Option<u32>,
    pub appearances: Option<u32>,
    pub age: Option<u32>,
    pub penalties: Option<u32>,
    pub market_value: Field<String>,
    pub minutes_played: Field<i64>,
    pub mins_per_goal: Field<f64>,
    pub goals_per_match: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    Malformed,
    Missing,
}

/// A field that could not be read; the record it belongs to is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Zero-based data row index.
    pub row: usize,
    pub column: &'static str,
    pub raw: Option<String>,
    pub kind: IssueKind,
}

#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub issues: Vec<FieldIssue>,
}

impl<T> Normalized<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub mod columns {
    pub mod matches {
        pub const SEASON: &str = "Season_End_Year";
        pub const WEEK: &str = "Wk";
        pub const DATE: &str = "Date";
        pub const HOME: &str = "Home";
        pub const AWAY: &str = "Away";
        pub const HOME_GOALS: &str = "HomeGoals";
        pub const AWAY_GOALS: &str = "AwayGoals";
        pub const RESULT: &str = "FTR";
    }

    pub mod standings {
        pub const SEASON: &str = "Initial Year";
        pub const POSITION: &str = "League position";
        pub const CLUB: &str = "Club";
        pub const GAMES_PLAYED: &str = "Games Played";
        pub const WINS: &str = "Wins";
        pub const DRAWS: &str = "Draws";
        pub const LOSSES: &str = "Losses";
        pub const POINTS: &str = "Points";
        pub const GOALS_FOR: &str = "Goals for";
        pub const GOALS_AGAINST: &str = "Goals Against";
        pub const GOAL_DIFFERENCE: &str = "Goal Difference";
        pub const CLEAN_SHEETS: &str = "Clean Sheets";
    }

    pub mod scorers {
        pub const SEASON: &str = "Year";
        pub const RANK: &str = "Rank";
        pub const NAME: &str = "Name";
        pub const TEAM: &str = "Team";
        pub const GOALS: &str = "Goals";
        pub const ASSISTS: &str = "Assists";
        pub const GOAL_INVOLVEMENTS: &str = "Goal Involvements";
        pub const MARKET_VALUE: &str = "Market Value";
        pub const APPEARANCES: &str = "Appearances";
        pub const AGE: &str = "Age";
        // Header is spelled this way in the published dataset.
        pub const PENALTIES: &str = "Penaltys";
        pub const MINUTES_PLAYED: &str = "Minutes Played";
        pub const MINS_PER_GOAL: &str = "Mins per goal";
        pub const GOALS_PER_MATCH: &str = "Goals per match";
    }
}

/// Collects issues for one row while its fields are read.
struct RowReader<'a> {
    row: &'a RawRow,
    idx: usize,
    issues: &'a mut Vec<FieldIssue>,
}

impl<'a> RowReader<'a> {
    fn note(&mut self, column: &'static str, kind: IssueKind) {
        self.issues.push(FieldIssue {
            row: self.idx,
            column,
            raw: self.row.get(column).map(str::to_string),
            kind,
        });
    }

    /// Malformed text is reported; an absent column is silently absent.
    fn int<T: TryFrom<i64>>(&mut self, column: &'static str) -> Option<T> {
        let raw = self.row.get(column)?;
        let parsed = parse_int(Some(raw)).and_then(|v| T::try_from(v).ok());
        if parsed.is_none() {
            self.note(column, IssueKind::Malformed);
        }
        parsed
    }

    fn decimal(&mut self, column: &'static str) -> Option<f64> {
        let raw = self.row.get(column)?;
        let parsed = parse_decimal(Some(raw));
        if parsed.is_none() {
            self.note(column, IssueKind::Malformed);
        }
        parsed
    }

    fn delimited_int(&mut self, column: &'static str) -> Field<i64> {
        let field = parse_delimited_int(self.row.get(column));
        if field.is_malformed() {
            self.note(column, IssueKind::Malformed);
        }
        field
    }

    fn delimited_decimal(&mut self, column: &'static str) -> Field<f64> {
        let field = parse_delimited_decimal(self.row.get(column));
        if field.is_malformed() {
            self.note(column, IssueKind::Malformed);
        }
        field
    }

    fn text(&self, column: &'static str) -> Option<String> {
        optional_text(self.row.get(column))
    }

    fn date(&mut self, column: &'static str) -> Option<NaiveDate> {
        match parse_date(self.row.get(column)) {
            Field::Present(date) => Some(date),
            Field::Malformed => {
                self.note(column, IssueKind::Malformed);
                None
            }
            Field::Missing => {
                self.note(column, IssueKind::Missing);
                None
            }
        }
    }

    fn result(&mut self, column: &'static str) -> Option<MatchResult> {
        let Some(raw) = self.row.get(column) else {
            self.note(column, IssueKind::Missing);
            return None;
        };
        let parsed = MatchResult::from_code(raw);
        if parsed.is_none() {
            self.note(column, IssueKind::Malformed);
        }
        parsed
    }
}

fn normalize_rows<T>(rows: &[RawRow], mut read: impl FnMut(&mut RowReader<'_>) -> T) -> Normalized<T> {
    let mut issues = Vec::new();
    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let mut reader = RowReader {
            row,
            idx,
            issues: &mut issues,
        };
        records.push(read(&mut reader));
    }
    Normalized { records, issues }
}

pub fn normalize_matches(rows: &[RawRow]) -> Normalized<MatchRecord> {
    use columns::matches as col;
    normalize_rows(rows, |r| MatchRecord {
        season: r.int(col::SEASON),
        week: r.int(col::WEEK),
        date: r.date(col::DATE),
        home: r.text(col::HOME),
        away: r.text(col::AWAY),
        home_goals: r.int(col::HOME_GOALS),
        away_goals: r.int(col::AWAY_GOALS),
        result: r.result(col::RESULT),
    })
}

pub fn normalize_standings(rows: &[RawRow]) -> Normalized<StandingRecord> {
    use columns::standings as col;
    normalize_rows(rows, |r| StandingRecord {
        season: r.int(col::SEASON),
        position: r.int(col::POSITION),
        club: r.text(col::CLUB),
        games_played: r.int(col::GAMES_PLAYED),
        wins: r.int(col::WINS),
        draws: r.int(col::DRAWS),
        losses: r.int(col::LOSSES),
        points: r.int(col::POINTS),
        goals_for: r.int(col::GOALS_FOR),
        goals_against: r.int(col::GOALS_AGAINST),
        goal_difference: r.int(col::GOAL_DIFFERENCE),
        clean_sheets: r.int(col::CLEAN_SHEETS),
    })
}

pub fn normalize_scorers(rows: &[RawRow]) -> Normalized<ScorerRecord> {
    use columns::scorers as col;
    normalize_rows(rows, |r| ScorerRecord {
        season: r.int(col::SEASON),
        rank: r.int(col::RANK),
        name: r.text(col::NAME),
        team: r.text(col::TEAM),
        goals: r.int(col::GOALS),
        assists: r.int(col::ASSISTS),
        goal_involvements: r.int(col::GOAL_INVOLVEMENTS),
        appearances: r.int(col::APPEARANCES),
        age: r.int(col::AGE),
        penalties: r.int(col::PENALTIES),
        market_value: text_field(r.row.get(col::MARKET_VALUE)),
        minutes_played: r.delimited_int(col::MINUTES_PLAYED),
        mins_per_goal: r.delimited_decimal(col::MINS_PER_GOAL),
        goals_per_match: r.decimal(col::GOALS_PER_MATCH),
    })
}

#[cfg(test)]
mod tests {
    use super::{IssueKind, MatchResult, normalize_matches, normalize_scorers};
    use crate::fields::Field;
    use crate::raw_table::RawRow;

    #[test]
    fn match_row_with_bad_goals_keeps_the_record() {
        let rows = vec![RawRow::from_pairs([
            ("Season_End_Year", "1993"),
            ("Wk", "1"),
            ("Date", "1992-08-15"),
            ("Home", "Coventry City"),
            ("Away", "Middlesbrough"),
            ("HomeGoals", "two"),
            ("AwayGoals", "1"),
            ("FTR", "H"),
        ])];
        let out = normalize_matches(&rows);
        assert_eq!(out.len(), 1);
        let m = &out.records[0];
        assert_eq!(m.season, Some(1993));
        assert_eq!(m.home_goals, None);
        assert_eq!(m.away_goals, Some(1));
        assert_eq!(m.total_goals(), None);
        assert_eq!(m.result, Some(MatchResult::Home));
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].column, "HomeGoals");
        assert_eq!(out.issues[0].kind, IssueKind::Malformed);
    }

    #[test]
    fn unparseable_date_is_reported() {
        let rows = vec![RawRow::from_pairs([
            ("Season_End_Year", "1993"),
            ("Date", "32/13/1992"),
            ("FTR", "D"),
        ])];
        let out = normalize_matches(&rows);
        assert_eq!(out.records[0].date, None);
        assert!(out
            .issues
            .iter()
            .any(|i| i.column == "Date" && i.kind == IssueKind::Malformed));
    }

    #[test]
    fn goal_sum_past_u32_is_absent() {
        let rows = vec![RawRow::from_pairs([
            ("Season_End_Year", "1993"),
            ("HomeGoals", "4294967295"),
            ("AwayGoals", "1"),
            ("FTR", "H"),
        ])];
        let out = normalize_matches(&rows);
        assert_eq!(out.records[0].home_goals, Some(u32::MAX));
        assert_eq!(out.records[0].total_goals(), None);
    }

    #[test]
    fn negative_goals_do_not_fit_unsigned_fields() {
        let rows = vec![RawRow::from_pairs([("HomeGoals", "-1"), ("FTR", "A")])];
        let out = normalize_matches(&rows);
        assert_eq!(out.records[0].home_goals, None);
    }

    #[test]
    fn scorer_delimited_fields_track_missing_and_malformed() {
        let rows = vec![
            RawRow::from_pairs([
                ("Year", "2004"),
                ("Name", "Thierry Henry"),
                ("Minutes Played", "3,005"),
                ("Mins per goal", "1'001"),
                ("Market Value", "€70m"),
            ]),
            RawRow::from_pairs([("Year", "2004"), ("Name", "Alan Shearer"), ("Minutes Played", "n/a")]),
        ];
        let out = normalize_scorers(&rows);
        assert_eq!(out.records[0].minutes_played, Field::Present(3005));
        assert_eq!(out.records[0].mins_per_goal, Field::Present(1001.0));
        assert_eq!(out.records[0].market_value, Field::Present("€70m".to_string()));
        assert_eq!(out.records[1].minutes_played, Field::Malformed);
        assert_eq!(out.records[1].mins_per_goal, Field::Missing);
        assert!(out.records[1].market_value.is_missing());
    }
}
