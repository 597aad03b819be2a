use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pl_story::aggregate::{average_goals_per_match, outcome_shares, points_dispersion, rank_gaps};
use pl_story::controller::SceneController;
use pl_story::raw_table::parse_csv;
use pl_story::scenes::{SceneRegistry, StoryParams};
use pl_story::session::Session;
use pl_story::surface::SceneCanvas;

const SEASONS: std::ops::Range<i32> = 1993..2024;

fn matches_csv() -> String {
    let mut out = String::from("Season_End_Year,Wk,Date,Home,HomeGoals,AwayGoals,Away,FTR\n");
    for season in SEASONS {
        for idx in 0..380u32 {
            let home = idx % 4;
            let away = (idx / 4) % 3;
            let ftr = match home.cmp(&away) {
                std::cmp::Ordering::Greater => "H",
                std::cmp::Ordering::Less => "A",
                std::cmp::Ordering::Equal => "D",
            };
            out.push_str(&format!(
                "{season},{},{}-08-{:02},Team {},{home},{away},Team {},{ftr}\n",
                idx / 10 + 1,
                season - 1,
                idx % 28 + 1,
                idx % 20,
                (idx + 7) % 20,
            ));
        }
    }
    out
}

fn standings_csv() -> String {
    let mut out = String::from("Initial Year,League position,Club,Games Played,Points\n");
    for season in SEASONS {
        for pos in 1..=20u32 {
            let points = 95 - pos * 3 + (season as u32 % 5);
            out.push_str(&format!("{season},{pos},Team {pos},38,{points}\n"));
        }
    }
    out
}

fn scorers_csv() -> String {
    let mut out = String::from(
        "Year,Rank,Name,Team,Goals,Assists,Minutes Played,Mins per goal,Goals per match\n",
    );
    for season in SEASONS {
        for rank in 1..=5u32 {
            let goals = 30 - rank * 3;
            out.push_str(&format!(
                "{season},{rank},Player {},Team {rank},{goals},{},\"3,{:03}\",{},{:.2}\n",
                (season as u32 + rank) % 40,
                rank + 2,
                rank * 37,
                3000 / goals,
                f64::from(goals) / 36.0,
            ));
        }
    }
    out
}

fn sample_session() -> Session {
    let matches = parse_csv(&matches_csv()).unwrap();
    let standings = parse_csv(&standings_csv()).unwrap();
    let scorers = parse_csv(&scorers_csv()).unwrap();
    Session::from_tables(&matches, &standings, &scorers)
}

fn bench_normalize(c: &mut Criterion) {
    let matches = parse_csv(&matches_csv()).unwrap();
    let standings = parse_csv(&standings_csv()).unwrap();
    let scorers = parse_csv(&scorers_csv()).unwrap();
    c.bench_function("normalize_session", |b| {
        b.iter(|| {
            let session = Session::from_tables(
                black_box(&matches),
                black_box(&standings),
                black_box(&scorers),
            );
            black_box(session.matches().len());
        })
    });
}

fn bench_aggregates(c: &mut Criterion) {
    let session = sample_session();
    c.bench_function("season_aggregates", |b| {
        b.iter(|| {
            black_box(average_goals_per_match(black_box(session.matches())));
            black_box(outcome_shares(black_box(session.matches())));
            black_box(points_dispersion(black_box(session.standings())));
            black_box(rank_gaps(black_box(session.standings())));
        })
    });
}

fn bench_scene_walk(c: &mut Criterion) {
    let session = sample_session();
    c.bench_function("scene_walk", |b| {
        b.iter(|| {
            let mut controller =
                SceneController::new(SceneRegistry::story(), StoryParams::default());
            let mut canvas = SceneCanvas::new();
            controller.activate(Some(&session), &mut canvas);
            while controller.nav().can_advance {
                controller.advance(Some(&session), &mut canvas);
            }
            black_box(canvas.elements.len());
        })
    });
}

criterion_group!(benches, bench_normalize, bench_aggregates, bench_scene_walk);
criterion_main!(benches);
