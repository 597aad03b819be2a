use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::scenes::{SceneData, SceneRegistry, StoryParams};
use crate::session::Session;

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub id: &'static str,
    pub title: &'static str,
    pub data: SceneData,
}

pub struct ExportReport {
    pub scenes: usize,
    pub rows: usize,
}

/// Every scene's aggregate, in viewing order.
pub fn story_snapshot(
    registry: &SceneRegistry,
    session: &Session,
    params: &StoryParams,
) -> Vec<SceneSnapshot> {
    registry
        .iter()
        .map(|scene| SceneSnapshot {
            id: scene.id.slug(),
            title: scene.title,
            data: (scene.aggregate)(session, params),
        })
        .collect()
}

pub fn export_workbook(path: &Path, snapshot: &[SceneSnapshot]) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut rows_written = 0usize;
    for scene in snapshot {
        let rows = scene_rows(&scene.data);
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(scene.id)
            .with_context(|| format!("name sheet {}", scene.id))?;
        write_rows(worksheet, &rows)?;
        rows_written += rows.len().saturating_sub(1);
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(ExportReport {
        scenes: snapshot.len(),
        rows: rows_written,
    })
}

pub fn export_json(path: &Path, snapshot: &[SceneSnapshot]) -> Result<ExportReport> {
    let json = serde_json::to_string_pretty(snapshot).context("serialize story snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write story json")?;
    fs::rename(&tmp, path).context("swap story json")?;
    let rows = snapshot.iter().map(|s| scene_rows(&s.data).len().saturating_sub(1)).sum();
    Ok(ExportReport {
        scenes: snapshot.len(),
        rows,
    })
}

/// Flattens a scene aggregate into a header row plus data rows.
pub fn scene_rows(data: &SceneData) -> Vec<Vec<String>> {
    match data {
        SceneData::Teams {
            per_season,
            excluded,
        } => {
            let mut rows = vec![header(&["Season", "Teams", "In trend charts"])];
            let mut all: Vec<(i32, f64, bool)> = per_season
                .iter()
                .map(|sv| (sv.season, sv.value, true))
                .chain(excluded.iter().map(|sv| (sv.season, sv.value, false)))
                .collect();
            all.sort_by_key(|(season, _, _)| *season);
            for (season, teams, kept) in all {
                rows.push(vec![
                    season.to_string(),
                    teams.to_string(),
                    if kept { "yes" } else { "no" }.to_string(),
                ]);
            }
            rows
        }
        SceneData::Goals { per_match, .. } => {
            let mut rows = vec![header(&["Season", "Goals per match"])];
            rows.extend(
                per_match
                    .iter()
                    .map(|sv| vec![sv.season.to_string(), format!("{:.3}", sv.value)]),
            );
            rows
        }
        SceneData::HomeAway { shares, .. } => {
            let mut rows = vec![header(&["Season", "Home win %", "Away win %", "Draw %"])];
            rows.extend(shares.iter().map(|s| {
                vec![
                    s.season.to_string(),
                    format!("{:.1}", s.home),
                    format!("{:.1}", s.away),
                    format!("{:.1}", s.draw),
                ]
            }));
            rows
        }
        SceneData::Balance {
            dispersion, gaps, ..
        } => {
            let mut rows = vec![header(&[
                "Season",
                "Points std dev",
                "1st-4th",
                "4th-5th",
                "17th-18th",
            ])];
            for g in gaps {
                let std = dispersion
                    .iter()
                    .find(|sv| sv.season == g.season)
                    .map(|sv| format!("{:.2}", sv.value));
                rows.push(vec![
                    g.season.to_string(),
                    std.unwrap_or_default(),
                    opt_to_string(g.title_to_fourth),
                    opt_to_string(g.top_four_cutoff),
                    opt_to_string(g.relegation_battle),
                ]);
            }
            rows
        }
        SceneData::Players { leaders } => {
            let mut rows = vec![header(&["Player", "Goals", "Assists", "Total"])];
            rows.extend(leaders.iter().map(|p| {
                vec![
                    p.name.clone(),
                    p.goals.to_string(),
                    p.assists.to_string(),
                    p.total.to_string(),
                ]
            }));
            rows
        }
        SceneData::Pace { rows: pace } => {
            let mut rows = vec![header(&["Season", "Mins per goal", "Goals per match"])];
            rows.extend(pace.iter().map(|r| {
                vec![
                    r.season.to_string(),
                    r.mins_per_goal.map(|v| format!("{v:.1}")).unwrap_or_default(),
                    r.goals_per_match.map(|v| format!("{v:.3}")).unwrap_or_default(),
                ]
            }));
            rows
        }
        SceneData::Conclusion { highlights } => {
            let mut rows = vec![header(&["Highlight", "Detail"])];
            rows.extend(
                highlights
                    .iter()
                    .map(|h| vec![h.label.clone(), h.detail.clone()]),
            );
            rows
        }
    }
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::scene_rows;
    use crate::aggregate::{RankGaps, SeasonValue};
    use crate::scenes::SceneData;

    #[test]
    fn absent_gap_exports_as_blank_cell() {
        let data = SceneData::Balance {
            dispersion: vec![SeasonValue {
                season: 1995,
                value: 12.5,
            }],
            gaps: vec![RankGaps {
                season: 1995,
                title_to_fourth: Some(10.0),
                top_four_cutoff: Some(2.0),
                relegation_battle: None,
            }],
            most_competitive: None,
            least_competitive: None,
            recent_most_competitive: None,
        };
        let rows = scene_rows(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["1995", "12.50", "10", "2", ""]);
    }
}
