use std::fs;
use std::path::PathBuf;

use match_forecast::head_to_head::{head_to_head, summarize};
use match_forecast::record::{MatchResult, RowIssue, Score};
use match_forecast::record_store::parse_records;
use match_forecast::team_resolver::{resolve, teams};
use match_forecast::team_stats::aggregate;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_league_fixture_and_skips_short_row() {
    let parsed = parse_records(&read_fixture("premier_league.csv"), "premier_league");
    assert_eq!(parsed.records.len(), 39);
    assert_eq!(parsed.skipped.len(), 1);
    assert!(matches!(
        parsed.skipped[0],
        RowIssue::MalformedRecord {
            expected: 10,
            found: 5,
            ..
        }
    ));
    assert_eq!(parsed.records.iter().filter(|r| !r.is_played()).count(), 2);
    assert!(parsed.records.iter().all(|r| r.competition == "premier_league"));
}

#[test]
fn quoted_team_names_keep_their_comma() {
    let parsed = parse_records(&read_fixture("premier_league.csv"), "premier_league");
    let names = teams(&parsed.records);
    assert!(names.contains(&"Brighton & Hove Albion, FC".to_string()));
    assert_eq!(names.len(), 8);
}

#[test]
fn unparsable_goals_become_zero() {
    let parsed = parse_records(&read_fixture("premier_league.csv"), "premier_league");
    let rec = parsed
        .records
        .iter()
        .find(|r| r.rolling.is_none())
        .expect("row with junk goals and no rolling columns");
    assert_eq!(rec.score(), Some(Score { home: 0, away: 1 }));
    assert_eq!(rec.result(), Some(MatchResult::Loss));
}

#[test]
fn resolver_on_fixture_names() {
    let parsed = parse_records(&read_fixture("premier_league.csv"), "premier_league");
    let records = &parsed.records;
    assert_eq!(resolve("man city", records).as_deref(), Some("Manchester City"));
    assert_eq!(resolve("MANCHESTER UNITED", records).as_deref(), Some("Manchester United"));
    assert_eq!(resolve("brighton", records).as_deref(), Some("Brighton & Hove Albion, FC"));
    // Ambiguous substrings resolve to the alphabetically first name.
    assert_eq!(resolve("united", records).as_deref(), Some("Leeds United"));
    assert_eq!(resolve("nonexistent fc", records), None);
}

#[test]
fn aggregates_fixture_team() {
    let parsed = parse_records(&read_fixture("premier_league.csv"), "premier_league");
    let s = aggregate("Arsenal", &parsed.records);
    assert_eq!(s.matches_played, 9);
    assert_eq!((s.wins, s.draws, s.losses), (5, 0, 4));
    assert_eq!((s.goals_scored, s.goals_conceded), (14, 13));
    assert_eq!((s.home_matches, s.home_wins), (5, 3));
    assert_eq!((s.away_matches, s.away_wins), (4, 2));
    assert_eq!(s.form_string(), "LLWLW");
    assert!((s.home_win_rate - 0.6).abs() < 1e-12);
    assert!((s.away_win_rate - 0.5).abs() < 1e-12);
}

#[test]
fn head_to_head_on_fixture() {
    let parsed = parse_records(&read_fixture("premier_league.csv"), "premier_league");
    let h2h = head_to_head("liverpool", "arsenal", &parsed.records);
    assert_eq!(h2h.len(), 3);
    assert_eq!(h2h[0].home_team, "Liverpool");
    assert!(h2h.windows(2).all(|w| w[0].date >= w[1].date));
    let summary = summarize("Arsenal", &h2h);
    assert_eq!((summary.team_a_wins, summary.draws, summary.team_b_wins), (2, 0, 1));
}

#[test]
fn dataset_without_dates_keeps_every_match() {
    let parsed = parse_records(&read_fixture("undated.csv"), "undated");
    assert_eq!(parsed.records.len(), 5);
    assert!(parsed.records.iter().all(|r| r.date.is_none()));

    let s = aggregate("Alpha", &parsed.records);
    assert_eq!(s.matches_played, 4);
    assert_eq!((s.wins, s.draws, s.losses), (1, 2, 1));
    assert_eq!((s.goals_scored, s.goals_conceded), (6, 5));
    assert_eq!(s.form_string(), "WLDD");

    let meetings = head_to_head("Alpha", "Beta", &parsed.records);
    assert_eq!(meetings.len(), 4);
    assert_eq!(summarize("Alpha", &meetings).draws, 2);
}

#[test]
fn day_first_dates_are_dropped_but_matches_counted() {
    let parsed = parse_records(&read_fixture("day_first_dates.csv"), "cup");
    assert_eq!(parsed.records.len(), 2);
    assert!(parsed.records.iter().all(|r| r.date.is_none() && r.is_played()));

    let s = aggregate("Alpha", &parsed.records);
    assert_eq!(s.matches_played, 2);
    assert_eq!(s.wins, 2);
}

#[test]
fn oversized_goal_cells_become_zero() {
    let parsed = parse_records(&read_fixture("oversized_goals.csv"), "odd");
    assert_eq!(parsed.records.len(), 3);
    assert_eq!(parsed.records[0].score(), Some(Score { home: 0, away: 0 }));
    assert_eq!(parsed.records[1].score(), Some(Score { home: 0, away: 2 }));

    let s = aggregate("Alpha", &parsed.records);
    assert_eq!((s.wins, s.draws, s.losses), (1, 2, 0));
    assert_eq!((s.goals_scored, s.goals_conceded), (3, 1));
}
