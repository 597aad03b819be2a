mod common;

use pl_story::aggregate::{
    Extremum, SeasonValue, average_goals_per_match, count_by_season, outcome_rate,
    points_dispersion, rank_gaps, select_extremum, teams_per_season_in_range, top_contributors,
};
use pl_story::records::{MatchRecord, MatchResult};
use pl_story::scenes::{SceneData, StoryParams, balance_data, intro_data};
use pl_story::session::Session;
use pl_story::surface::LineSeries;

use common::{game, scorer, standing, table};

#[test]
fn season_counts_add_up_to_record_count() {
    let mut standings = table(1993, 22);
    standings.extend(table(1996, 20));
    standings.push(standing(1996, 21, 10));
    let counts = count_by_season(&standings, |r| r.season);
    assert_eq!(counts.get(&1993), Some(&22));
    assert_eq!(counts.get(&1996), Some(&21));
    assert_eq!(counts.values().sum::<usize>(), standings.len());
}

#[test]
fn oversized_season_is_left_out_of_the_intro() {
    let mut standings = table(1994, 20);
    standings.extend(table(1995, 30));
    let session = Session::new(Vec::new(), standings, Vec::new());

    let SceneData::Teams {
        per_season,
        excluded,
    } = intro_data(&session, &StoryParams::default())
    else {
        panic!("intro scene should aggregate team counts");
    };
    assert_eq!(per_season, vec![SeasonValue { season: 1994, value: 20.0 }]);
    assert_eq!(excluded, vec![SeasonValue { season: 1995, value: 30.0 }]);

    let kept = teams_per_season_in_range(session.standings(), &(19..=23));
    assert!(kept.iter().all(|sv| sv.season != 1995));
}

#[test]
fn goals_per_match_averages_by_season() {
    let matches = vec![
        game(2000, 2, 0),
        game(2000, 1, 1),
        game(2001, 3, 1),
        game(2001, 0, 2),
        game(2001, 1, 1),
    ];
    let avg = average_goals_per_match(&matches);
    assert_eq!(avg.len(), 2);
    assert_eq!(avg[0].season, 2000);
    assert!((avg[0].value - 2.0).abs() < 1e-9);
    assert_eq!(avg[1].season, 2001);
    assert!((avg[1].value - 8.0 / 3.0).abs() < 1e-3);
}

#[test]
fn seasons_without_usable_matches_are_skipped() {
    let mut broken = game(2002, 0, 0);
    broken.home_goals = None;
    broken.result = None;
    let matches: Vec<MatchRecord> = vec![game(2001, 1, 0), broken];

    let avg = average_goals_per_match(&matches);
    assert_eq!(avg.len(), 1);
    assert!(avg.iter().all(|sv| sv.value.is_finite()));

    let home = outcome_rate(&matches, MatchResult::Home);
    assert_eq!(home.len(), 1);
    assert!((home[0].value - 100.0).abs() < 1e-9);
}

#[test]
fn single_club_season_has_no_dispersion() {
    let standings = vec![
        standing(2010, 1, 90),
        standing(2010, 2, 70),
        standing(2010, 3, 50),
        standing(2011, 1, 80),
    ];
    let spread = points_dispersion(&standings);
    assert_eq!(spread.len(), 1);
    assert_eq!(spread[0].season, 2010);
    assert!((spread[0].value - 20.0).abs() < 1e-9);
}

#[test]
fn competitive_extremes_pick_first_season_on_ties() {
    let spread = vec![
        SeasonValue { season: 2004, value: 12.0 },
        SeasonValue { season: 2001, value: 15.0 },
        SeasonValue { season: 2002, value: 12.0 },
        SeasonValue { season: 2003, value: 15.0 },
    ];
    let most = select_extremum(&spread, Extremum::Min, None).map(|sv| sv.season);
    let least = select_extremum(&spread, Extremum::Max, None).map(|sv| sv.season);
    assert_eq!(most, Some(2002));
    assert_eq!(least, Some(2001));
    let recent = select_extremum(&spread, Extremum::Max, Some(2)).map(|sv| sv.season);
    assert_eq!(recent, Some(2003));
}

#[test]
fn top_contributors_is_stable_when_recomputed() {
    let scorers = vec![
        scorer(2000, "Phillips", 30, 5),
        scorer(2000, "Shearer", 23, 4),
        scorer(2001, "Hasselbaink", 23, 9),
        scorer(2001, "Shearer", 5, 3),
        scorer(2001, "Cole", 20, 15),
    ];
    let first = top_contributors(&scorers, 3);
    let again = top_contributors(&scorers, 3);
    assert_eq!(first, again);
    let names: Vec<&str> = first.iter().map(|p| p.name.as_str()).collect();
    // Phillips and Shearer and Cole all reach 35; first seen wins.
    assert_eq!(names, vec!["Phillips", "Shearer", "Cole"]);
    assert_eq!(first[1].goals, 28);
    assert_eq!(first[1].assists, 7);
}

#[test]
fn short_season_has_no_relegation_gap() {
    let mut standings = table(1999, 20);
    standings.extend(table(2000, 16));
    standings.extend(table(2001, 20));

    let gaps = rank_gaps(&standings);
    assert_eq!(gaps.len(), 3);
    assert_eq!(gaps[1].season, 2000);
    assert_eq!(gaps[1].relegation_battle, None);
    assert_eq!(gaps[1].title_to_fourth, Some(6.0));
    assert_eq!(gaps[0].relegation_battle, Some(2.0));

    let series = LineSeries {
        label: "17th-18th".to_string(),
        points: gaps.iter().map(|g| (g.season, g.relegation_battle)).collect(),
    };
    let segments = series.segments();
    assert_eq!(segments, vec![vec![(1999.0, 2.0)], vec![(2001.0, 2.0)]]);
}

#[test]
fn balance_scene_uses_in_range_seasons_only() {
    let mut standings = table(2005, 20);
    standings.extend(table(2006, 16));
    let session = Session::new(Vec::new(), standings, Vec::new());
    let SceneData::Balance {
        dispersion, gaps, ..
    } = balance_data(&session, &StoryParams::default())
    else {
        panic!("balance scene should aggregate standings");
    };
    assert_eq!(dispersion.len(), 1);
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].season, 2005);
}

#[test]
fn lone_oversized_season_never_reaches_balance_charts() {
    let session = Session::new(Vec::new(), table(1995, 30), Vec::new());
    let SceneData::Balance {
        dispersion,
        gaps,
        most_competitive,
        least_competitive,
        ..
    } = balance_data(&session, &StoryParams::default())
    else {
        panic!("balance scene should aggregate standings");
    };
    assert!(dispersion.is_empty());
    assert!(gaps.is_empty());
    assert_eq!(most_competitive, None);
    assert_eq!(least_competitive, None);
}

#[test]
fn huge_goal_counts_do_not_overflow() {
    let mut big = game(2003, 0, 1);
    big.home_goals = Some(u32::MAX);
    let avg = average_goals_per_match(&[big, game(2003, 2, 2)]);
    assert_eq!(avg, vec![SeasonValue { season: 2003, value: 4.0 }]);

    let scorers = vec![
        scorer(2003, "Record Breaker", u32::MAX, u32::MAX),
        scorer(2004, "Record Breaker", 10, 0),
    ];
    let top = top_contributors(&scorers, 1);
    assert_eq!(top[0].goals, u64::from(u32::MAX) + 10);
    assert_eq!(top[0].total, 2 * u64::from(u32::MAX) + 10);
}
