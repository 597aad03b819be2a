use tracing::{info, warn};

use crate::raw_table::RawTable;
use crate::records::{
    FieldIssue, IssueKind, MatchRecord, ScorerRecord, StandingRecord, normalize_matches,
    normalize_scorers, normalize_standings,
};

/// The three normalized tables. Built once after every source has loaded and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Session {
    matches: Vec<MatchRecord>,
    standings: Vec<StandingRecord>,
    scorers: Vec<ScorerRecord>,
    issues: IssueSummary,
}

#[derive(Debug, Clone, Default)]
pub struct IssueSummary {
    pub matches: Vec<FieldIssue>,
    pub standings: Vec<FieldIssue>,
    pub scorers: Vec<FieldIssue>,
}

impl IssueSummary {
    pub fn total(&self) -> usize {
        self.matches.len() + self.standings.len() + self.scorers.len()
    }

    pub fn bad_dates(&self) -> usize {
        self.matches.iter().filter(|i| i.column == "Date").count()
    }
}

impl Session {
    pub fn new(
        matches: Vec<MatchRecord>,
        standings: Vec<StandingRecord>,
        scorers: Vec<ScorerRecord>,
    ) -> Self {
        Self {
            matches,
            standings,
            scorers,
            issues: IssueSummary::default(),
        }
    }

    pub fn from_tables(matches: &RawTable, standings: &RawTable, scorers: &RawTable) -> Self {
        let m = normalize_matches(&matches.rows);
        let s = normalize_standings(&standings.rows);
        let t = normalize_scorers(&scorers.rows);

        for (table, issues) in [("matches", &m.issues), ("standings", &s.issues), ("scorers", &t.issues)] {
            for issue in issues.iter().filter(|i| i.column == "Date") {
                warn!(
                    table,
                    row = issue.row,
                    raw = issue.raw.as_deref().unwrap_or(""),
                    missing = issue.kind == IssueKind::Missing,
                    "unusable match date"
                );
            }
            if !issues.is_empty() {
                info!(table, count = issues.len(), "fields degraded to absent");
            }
        }

        Self {
            matches: m.records,
            standings: s.records,
            scorers: t.records,
            issues: IssueSummary {
                matches: m.issues,
                standings: s.issues,
                scorers: t.issues,
            },
        }
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn standings(&self) -> &[StandingRecord] {
        &self.standings
    }

    pub fn scorers(&self) -> &[ScorerRecord] {
        &self.scorers
    }

    pub fn issues(&self) -> &IssueSummary {
        &self.issues
    }
}
