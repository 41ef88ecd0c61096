use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{MatchRecord, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueOverview {
    pub total_matches: usize,
    pub played_matches: usize,
    pub avg_goals_per_match: f64,
    pub home_win_percentage: f64,
    pub draw_percentage: f64,
    pub away_win_percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDistribution {
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTrend {
    pub season: String,
    pub matches: usize,
    pub avg_total_goals: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_to(part as f64 * 100.0 / whole as f64, 1)
    }
}

pub fn result_distribution(records: &[MatchRecord]) -> ResultDistribution {
    let mut out = ResultDistribution::default();
    for result in records.iter().filter_map(MatchRecord::result) {
        match result {
            MatchResult::Win => out.home_wins += 1,
            MatchResult::Draw => out.draws += 1,
            MatchResult::Loss => out.away_wins += 1,
        }
    }
    out
}

pub fn league_overview(records: &[MatchRecord]) -> LeagueOverview {
    let dist = result_distribution(records);
    let played = dist.home_wins + dist.draws + dist.away_wins;
    let goals: u64 = records
        .iter()
        .filter_map(MatchRecord::score)
        .map(|s| s.total())
        .sum();
    LeagueOverview {
        total_matches: records.len(),
        played_matches: played,
        avg_goals_per_match: if played == 0 {
            0.0
        } else {
            round_to(goals as f64 / played as f64, 2)
        },
        home_win_percentage: percentage(dist.home_wins, played),
        draw_percentage: percentage(dist.draws, played),
        away_win_percentage: percentage(dist.away_wins, played),
    }
}

/// Total goals in a played match -> number of such matches.
pub fn goals_distribution(records: &[MatchRecord]) -> BTreeMap<u64, usize> {
    let mut out = BTreeMap::new();
    for score in records.iter().filter_map(MatchRecord::score) {
        *out.entry(score.total()).or_insert(0) += 1;
    }
    out
}

pub fn season_trends(records: &[MatchRecord]) -> Vec<SeasonTrend> {
    let mut by_season: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for rec in records {
        let (Some(season), Some(score)) = (rec.season.as_deref(), rec.score()) else {
            continue;
        };
        let entry = by_season.entry(season).or_default();
        entry.0 += score.total();
        entry.1 += 1;
    }
    by_season
        .into_iter()
        .map(|(season, (goals, matches))| SeasonTrend {
            season: season.to_string(),
            matches,
            avg_total_goals: round_to(goals as f64 / matches as f64, 2),
        })
        .collect()
}

/// Played matches, newest first.
pub fn recent_results(records: &[MatchRecord], limit: usize) -> Vec<&MatchRecord> {
    let mut played: Vec<&MatchRecord> = records.iter().filter(|r| r.is_played()).collect();
    played.sort_by_key(|r| Reverse(r.date));
    played.truncate(limit);
    played
}

/// Scheduled fixtures, soonest first; undated ones last.
pub fn upcoming_fixtures(records: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut upcoming: Vec<&MatchRecord> = records.iter().filter(|r| !r.is_played()).collect();
    upcoming.sort_by_key(|r| (r.date.is_none(), r.date));
    upcoming
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::{MatchStatus, Score};

    fn rec(day: u32, season: Option<&str>, score: Option<(u32, u32)>) -> MatchRecord {
        MatchRecord {
            home_team: format!("H{day}"),
            away_team: format!("A{day}"),
            date: NaiveDate::from_ymd_opt(2022, 10, day).and_then(|d| d.and_hms_opt(0, 0, 0)),
            status: match score {
                Some((home, away)) => MatchStatus::Played(Score { home, away }),
                None => MatchStatus::Scheduled,
            },
            competition: "x".to_string(),
            season: season.map(str::to_string),
            rolling: None,
        }
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            rec(1, Some("2021-2022"), Some((2, 0))),
            rec(2, Some("2021-2022"), Some((1, 1))),
            rec(3, Some("2022-2023"), Some((0, 3))),
            rec(4, Some("2022-2023"), Some((4, 1))),
            rec(6, None, None),
            rec(5, None, None),
        ]
    }

    #[test]
    fn overview_percentages() {
        let o = league_overview(&sample());
        assert_eq!(o.total_matches, 6);
        assert_eq!(o.played_matches, 4);
        assert_eq!(o.avg_goals_per_match, 3.0);
        assert_eq!(o.home_win_percentage, 50.0);
        assert_eq!(o.draw_percentage, 25.0);
        assert_eq!(o.away_win_percentage, 25.0);
    }

    #[test]
    fn empty_overview_is_zeroed() {
        let o = league_overview(&[]);
        assert_eq!(o.played_matches, 0);
        assert_eq!(o.avg_goals_per_match, 0.0);
        assert_eq!(o.home_win_percentage, 0.0);
    }

    #[test]
    fn goals_and_seasons() {
        let goals = goals_distribution(&sample());
        assert_eq!(goals.into_iter().collect::<Vec<_>>(), vec![(2, 2), (3, 1), (5, 1)]);

        let trends = season_trends(&sample());
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].season, "2021-2022");
        assert_eq!(trends[0].avg_total_goals, 2.0);
        assert_eq!(trends[1].avg_total_goals, 4.0);
    }

    #[test]
    fn recent_and_upcoming_ordering() {
        let records = sample();
        let recent = recent_results(&records, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].home_team, "H4");
        assert_eq!(recent[1].home_team, "H3");

        let upcoming = upcoming_fixtures(&records);
        assert_eq!(upcoming[0].home_team, "H5");
        assert_eq!(upcoming[1].home_team, "H6");
    }
}
