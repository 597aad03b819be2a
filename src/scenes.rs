use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::aggregate::{
    self, DEFAULT_TEAM_RANGE, Extremum, OutcomeShare, PaceRow, PlayerTotal, RankGaps, SeasonValue,
};
use crate::records::MatchResult;
use crate::session::Session;
use crate::surface::{
    BarChartData, BarDatum, LineChartData, LineSeries, Surface, TableData, format_value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneId {
    Intro,
    Goals,
    HomeAway,
    Balance,
    Players,
    Pace,
    Conclusion,
}

impl SceneId {
    pub fn slug(self) -> &'static str {
        match self {
            SceneId::Intro => "intro",
            SceneId::Goals => "goals",
            SceneId::HomeAway => "homeaway",
            SceneId::Balance => "balance",
            SceneId::Players => "players",
            SceneId::Pace => "pace",
            SceneId::Conclusion => "conclusion",
        }
    }
}

/// Knobs for the scene aggregations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryParams {
    pub team_range: RangeInclusive<usize>,
    pub top_players: usize,
    pub recent_seasons: usize,
}

impl Default for StoryParams {
    fn default() -> Self {
        Self {
            team_range: DEFAULT_TEAM_RANGE,
            top_players: 10,
            recent_seasons: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub label: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SceneData {
    Teams {
        per_season: Vec<SeasonValue>,
        excluded: Vec<SeasonValue>,
    },
    Goals {
        per_match: Vec<SeasonValue>,
        peak: Option<SeasonValue>,
        low: Option<SeasonValue>,
    },
    HomeAway {
        shares: Vec<OutcomeShare>,
        home_goals: Vec<SeasonValue>,
        away_goals: Vec<SeasonValue>,
    },
    Balance {
        dispersion: Vec<SeasonValue>,
        gaps: Vec<RankGaps>,
        most_competitive: Option<SeasonValue>,
        least_competitive: Option<SeasonValue>,
        recent_most_competitive: Option<SeasonValue>,
    },
    Players {
        leaders: Vec<PlayerTotal>,
    },
    Pace {
        rows: Vec<PaceRow>,
    },
    Conclusion {
        highlights: Vec<Highlight>,
    },
}

pub type AggregateFn = fn(&Session, &StoryParams) -> SceneData;
pub type RenderFn = fn(&SceneData, &mut dyn Surface);

#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub id: SceneId,
    pub title: &'static str,
    pub aggregate: AggregateFn,
    pub render: RenderFn,
}

#[derive(Debug, Clone)]
pub struct SceneRegistry {
    scenes: Vec<Scene>,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::story()
    }
}

impl SceneRegistry {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    /// The seven-step league story in viewing order.
    pub fn story() -> Self {
        Self::new(vec![
            Scene {
                id: SceneId::Intro,
                title: "Introduction: The Birth of the Premier League",
                aggregate: intro_data,
                render: render_intro,
            },
            Scene {
                id: SceneId::Goals,
                title: "Goal Scoring Trends",
                aggregate: goals_data,
                render: render_goals,
            },
            Scene {
                id: SceneId::HomeAway,
                title: "Home vs Away Performance",
                aggregate: home_away_data,
                render: render_home_away,
            },
            Scene {
                id: SceneId::Balance,
                title: "The Rise of Competitive Balance",
                aggregate: balance_data,
                render: render_balance,
            },
            Scene {
                id: SceneId::Players,
                title: "Player Impact: Goals and Assists",
                aggregate: players_data,
                render: render_players,
            },
            Scene {
                id: SceneId::Pace,
                title: "The Changing Pace of the Game",
                aggregate: pace_data,
                render: render_pace,
            },
            Scene {
                id: SceneId::Conclusion,
                title: "Conclusion: The Modern Premier League",
                aggregate: conclusion_data,
                render: render_conclusion,
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }
}

// Aggregations.

pub fn intro_data(session: &Session, params: &StoryParams) -> SceneData {
    let (per_season, excluded): (Vec<SeasonValue>, Vec<SeasonValue>) =
        aggregate::teams_per_season(session.standings())
        .into_iter()
        .partition(|sv| params.team_range.contains(&(sv.value as usize)));
    SceneData::Teams {
        per_season,
        excluded,
    }
}

pub fn goals_data(session: &Session, _params: &StoryParams) -> SceneData {
    let per_match = aggregate::average_goals_per_match(session.matches());
    SceneData::Goals {
        peak: aggregate::select_extremum(&per_match, Extremum::Max, None),
        low: aggregate::select_extremum(&per_match, Extremum::Min, None),
        per_match,
    }
}

pub fn home_away_data(session: &Session, _params: &StoryParams) -> SceneData {
    SceneData::HomeAway {
        shares: aggregate::outcome_shares(session.matches()),
        home_goals: aggregate::average_home_goals(session.matches()),
        away_goals: aggregate::average_away_goals(session.matches()),
    }
}

pub fn balance_data(session: &Session, params: &StoryParams) -> SceneData {
    let seasons = aggregate::seasons_in_range(session.standings(), &params.team_range);
    let dispersion: Vec<SeasonValue> = aggregate::points_dispersion(session.standings())
        .into_iter()
        .filter(|sv| seasons.contains(&sv.season))
        .collect();
    let gaps = aggregate::rank_gaps(session.standings())
        .into_iter()
        .filter(|g| seasons.contains(&g.season))
        .collect();
    SceneData::Balance {
        most_competitive: aggregate::select_extremum(&dispersion, Extremum::Min, None),
        least_competitive: aggregate::select_extremum(&dispersion, Extremum::Max, None),
        recent_most_competitive: aggregate::select_extremum(
            &dispersion,
            Extremum::Min,
            Some(params.recent_seasons),
        ),
        dispersion,
        gaps,
    }
}

pub fn players_data(session: &Session, params: &StoryParams) -> SceneData {
    SceneData::Players {
        leaders: aggregate::top_contributors(session.scorers(), params.top_players),
    }
}

pub fn pace_data(session: &Session, _params: &StoryParams) -> SceneData {
    SceneData::Pace {
        rows: aggregate::scorer_pace(session.scorers()),
    }
}

pub fn conclusion_data(session: &Session, params: &StoryParams) -> SceneData {
    let mut highlights = Vec::new();

    let goals = aggregate::average_goals_per_match(session.matches());
    if let Some(peak) = aggregate::select_extremum(&goals, Extremum::Max, None) {
        highlights.push(Highlight {
            label: "Highest-scoring season".to_string(),
            detail: format!("{}: {:.2} goals per match", peak.season, peak.value),
        });
    }
    if let Some(low) = aggregate::select_extremum(&goals, Extremum::Min, None) {
        highlights.push(Highlight {
            label: "Lowest-scoring season".to_string(),
            detail: format!("{}: {:.2} goals per match", low.season, low.value),
        });
    }

    let home = aggregate::outcome_rate(session.matches(), MatchResult::Home);
    if let (Some(first), Some(last)) = (home.first(), home.last()) {
        if first.season != last.season {
            highlights.push(Highlight {
                label: "Home win rate".to_string(),
                detail: format!(
                    "{:.1}% in {} vs {:.1}% in {}",
                    first.value, first.season, last.value, last.season
                ),
            });
        }
    }

    if let SceneData::Balance {
        most_competitive,
        least_competitive,
        recent_most_competitive,
        ..
    } = balance_data(session, params)
    {
        if let Some(sv) = most_competitive {
            highlights.push(Highlight {
                label: "Most competitive season".to_string(),
                detail: format!("{}: points spread {:.1}", sv.season, sv.value),
            });
        }
        if let Some(sv) = least_competitive {
            highlights.push(Highlight {
                label: "Least competitive season".to_string(),
                detail: format!("{}: points spread {:.1}", sv.season, sv.value),
            });
        }
        if let Some(sv) = recent_most_competitive {
            highlights.push(Highlight {
                label: format!("Most competitive of last {} seasons", params.recent_seasons),
                detail: format!("{}: points spread {:.1}", sv.season, sv.value),
            });
        }
    }

    if let Some(top) = aggregate::top_contributors(session.scorers(), 1).into_iter().next() {
        highlights.push(Highlight {
            label: "Top goal contributor".to_string(),
            detail: format!(
                "{}: {} goals + {} assists = {}",
                top.name, top.goals, top.assists, top.total
            ),
        });
    }

    SceneData::Conclusion { highlights }
}

// Rendering.

/// One point per season from the first to the last, so a season without a
/// value breaks the line instead of being bridged.
fn season_points(values: impl IntoIterator<Item = (i32, Option<f64>)>) -> Vec<(i32, Option<f64>)> {
    let known: BTreeMap<i32, Option<f64>> = values.into_iter().collect();
    let (Some(&first), Some(&last)) = (known.keys().next(), known.keys().next_back()) else {
        return Vec::new();
    };
    (first..=last)
        .map(|season| (season, known.get(&season).copied().flatten()))
        .collect()
}

fn season_series(label: &str, items: &[SeasonValue]) -> LineSeries {
    LineSeries {
        label: label.to_string(),
        points: season_points(items.iter().map(|sv| (sv.season, Some(sv.value)))),
    }
}

fn empty_note(surface: &mut dyn Surface) {
    surface.note("No data available for this scene.");
}

pub fn render_intro(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::Teams {
        per_season,
        excluded,
    } = data
    else {
        return empty_note(surface);
    };
    surface.note("Welcome to the Evolution of the Premier League (1992-2023)");
    if per_season.is_empty() {
        return empty_note(surface);
    }
    surface.bar_chart(BarChartData {
        title: "Teams per season".to_string(),
        y_label: "Number of Teams".to_string(),
        bars: per_season
            .iter()
            .map(|sv| BarDatum {
                label: sv.season.to_string(),
                value: sv.value,
            })
            .collect(),
    });
    if !excluded.is_empty() {
        let list: Vec<String> = excluded
            .iter()
            .map(|sv| format!("{} ({} teams)", sv.season, sv.value))
            .collect();
        surface.note(&format!("Left out for an unusual team count: {}", list.join(", ")));
    }
}

pub fn render_goals(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::Goals {
        per_match,
        peak,
        low,
    } = data
    else {
        return empty_note(surface);
    };
    if per_match.is_empty() {
        return empty_note(surface);
    }
    surface.line_chart(LineChartData {
        title: "Average goals per match".to_string(),
        y_label: "Goals".to_string(),
        series: vec![season_series("Goals/match", per_match)],
    });
    if let Some(p) = peak {
        surface.note(&format!("Peak: {} with {:.2} goals per match", p.season, p.value));
    }
    if let Some(l) = low {
        surface.note(&format!("Low: {} with {:.2} goals per match", l.season, l.value));
    }
}

pub fn render_home_away(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::HomeAway {
        shares,
        home_goals,
        away_goals,
    } = data
    else {
        return empty_note(surface);
    };
    if shares.is_empty() {
        return empty_note(surface);
    }
    let series = |label: &str, pick: fn(&OutcomeShare) -> f64| LineSeries {
        label: label.to_string(),
        points: season_points(shares.iter().map(|s| (s.season, Some(pick(s))))),
    };
    surface.line_chart(LineChartData {
        title: "Result share per season".to_string(),
        y_label: "% of matches".to_string(),
        series: vec![
            series("Home win", |s| s.home),
            series("Away win", |s| s.away),
            series("Draw", |s| s.draw),
        ],
    });
    surface.line_chart(LineChartData {
        title: "Goals per match by side".to_string(),
        y_label: "Goals".to_string(),
        series: vec![
            season_series("Home", home_goals),
            season_series("Away", away_goals),
        ],
    });
}

pub fn render_balance(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::Balance {
        dispersion,
        gaps,
        most_competitive,
        least_competitive,
        recent_most_competitive,
    } = data
    else {
        return empty_note(surface);
    };
    if dispersion.is_empty() && gaps.is_empty() {
        return empty_note(surface);
    }
    surface.line_chart(LineChartData {
        title: "Spread of final points".to_string(),
        y_label: "Std. dev. of points".to_string(),
        series: vec![season_series("Points std dev", dispersion)],
    });

    let gap_series = |label: &str, pick: fn(&RankGaps) -> Option<f64>| LineSeries {
        label: label.to_string(),
        points: season_points(gaps.iter().map(|g| (g.season, pick(g)))),
    };
    surface.line_chart(LineChartData {
        title: "Points gaps between key places".to_string(),
        y_label: "Points".to_string(),
        series: vec![
            gap_series("1st-4th", |g| g.title_to_fourth),
            gap_series("4th-5th", |g| g.top_four_cutoff),
            gap_series("17th-18th", |g| g.relegation_battle),
        ],
    });

    if let Some(sv) = most_competitive {
        surface.note(&format!(
            "Most competitive: {} (points std dev {})",
            sv.season,
            format_value(round2(sv.value))
        ));
    }
    if let Some(sv) = least_competitive {
        surface.note(&format!(
            "Least competitive: {} (points std dev {})",
            sv.season,
            format_value(round2(sv.value))
        ));
    }
    if let Some(sv) = recent_most_competitive {
        surface.note(&format!(
            "Most competitive recently: {} (points std dev {})",
            sv.season,
            format_value(round2(sv.value))
        ));
    }
}

pub fn render_players(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::Players { leaders } = data else {
        return empty_note(surface);
    };
    if leaders.is_empty() {
        return empty_note(surface);
    }
    surface.bar_chart(BarChartData {
        title: "Goals + assists".to_string(),
        y_label: "Goal involvements".to_string(),
        bars: leaders
            .iter()
            .map(|p| BarDatum {
                label: p.name.clone(),
                value: p.total as f64,
            })
            .collect(),
    });
    surface.table(TableData {
        title: "Top contributors".to_string(),
        headers: vec![
            "Player".to_string(),
            "Goals".to_string(),
            "Assists".to_string(),
            "Total".to_string(),
        ],
        rows: leaders
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.goals.to_string(),
                    p.assists.to_string(),
                    p.total.to_string(),
                ]
            })
            .collect(),
    });
}

pub fn render_pace(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::Pace { rows } = data else {
        return empty_note(surface);
    };
    if rows.is_empty() {
        return empty_note(surface);
    }
    surface.line_chart(LineChartData {
        title: "Minutes per goal (top scorers)".to_string(),
        y_label: "Minutes".to_string(),
        series: vec![LineSeries {
            label: "Mins/goal".to_string(),
            points: season_points(rows.iter().map(|r| (r.season, r.mins_per_goal))),
        }],
    });
    surface.line_chart(LineChartData {
        title: "Goals per match (top scorers)".to_string(),
        y_label: "Goals".to_string(),
        series: vec![LineSeries {
            label: "Goals/match".to_string(),
            points: season_points(rows.iter().map(|r| (r.season, r.goals_per_match))),
        }],
    });
}

pub fn render_conclusion(data: &SceneData, surface: &mut dyn Surface) {
    let SceneData::Conclusion { highlights } = data else {
        return empty_note(surface);
    };
    if highlights.is_empty() {
        return empty_note(surface);
    }
    surface.table(TableData {
        title: "Three decades in numbers".to_string(),
        headers: vec!["".to_string(), "".to_string()],
        rows: highlights
            .iter()
            .map(|h| vec![h.label.clone(), h.detail.clone()])
            .collect(),
    });
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
