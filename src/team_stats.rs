use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{MatchRecord, MatchResult};

pub const RECENT_FORM_LEN: usize = 5;

/// One match from a single team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    pub fn letter(self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }

    /// Flips a home-perspective result for the away side when `is_home` is false.
    pub fn from_perspective(result: MatchResult, is_home: bool) -> Self {
        match (result, is_home) {
            (MatchResult::Draw, _) => FormResult::Draw,
            (MatchResult::Win, true) | (MatchResult::Loss, false) => FormResult::Win,
            (MatchResult::Loss, true) | (MatchResult::Win, false) => FormResult::Loss,
        }
    }
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub team: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u64,
    pub goals_conceded: u64,
    pub home_matches: u32,
    pub home_wins: u32,
    pub away_matches: u32,
    pub away_wins: u32,
    pub win_rate: f64,
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
    pub home_win_rate: f64,
    pub away_win_rate: f64,
    /// Newest first, at most [`RECENT_FORM_LEN`] entries.
    pub recent_form: Vec<FormResult>,
}

impl TeamStatistics {
    pub fn form_string(&self) -> String {
        self.recent_form.iter().map(|r| r.letter()).collect()
    }

    pub fn recent_fraction(&self, wanted: FormResult) -> f64 {
        if self.recent_form.is_empty() {
            return 0.0;
        }
        let hits = self.recent_form.iter().filter(|r| **r == wanted).count();
        hits as f64 / self.recent_form.len() as f64
    }

    /// Recent wins minus recent losses, as fractions of the form window.
    pub fn form_balance(&self) -> f64 {
        self.recent_fraction(FormResult::Win) - self.recent_fraction(FormResult::Loss)
    }

    /// Attack over defence, with conceded floored at 0.5.
    pub fn goal_ratio(&self) -> f64 {
        self.avg_goals_scored / self.avg_goals_conceded.max(0.5)
    }
}

fn ratio(num: u64, den: u32) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Played matches for `team` (already canonical), with repeated fixtures
/// counted once.
pub fn played_matches<'a>(team: &str, records: &'a [MatchRecord]) -> Vec<&'a MatchRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|rec| rec.is_played() && rec.involves(team))
        .filter(|rec| rec.fixture_key().is_none_or(|key| seen.insert(key)))
        .collect()
}

pub fn aggregate(team: &str, records: &[MatchRecord]) -> TeamStatistics {
    let mut matches = played_matches(team, records);
    let mut stats = TeamStatistics {
        team: team.to_string(),
        ..TeamStatistics::default()
    };

    for rec in &matches {
        let Some(score) = rec.score() else { continue };
        let is_home = rec.home_team.eq_ignore_ascii_case(team);
        let (scored, conceded) = if is_home {
            (score.home, score.away)
        } else {
            (score.away, score.home)
        };
        let outcome = FormResult::from_perspective(score.result(), is_home);

        stats.matches_played += 1;
        stats.goals_scored += u64::from(scored);
        stats.goals_conceded += u64::from(conceded);
        if is_home {
            stats.home_matches += 1;
        } else {
            stats.away_matches += 1;
        }
        match outcome {
            FormResult::Win => {
                stats.wins += 1;
                if is_home {
                    stats.home_wins += 1;
                } else {
                    stats.away_wins += 1;
                }
            }
            FormResult::Draw => stats.draws += 1,
            FormResult::Loss => stats.losses += 1,
        }
    }

    stats.win_rate = ratio(stats.wins.into(), stats.matches_played);
    stats.avg_goals_scored = ratio(stats.goals_scored, stats.matches_played);
    stats.avg_goals_conceded = ratio(stats.goals_conceded, stats.matches_played);
    stats.home_win_rate = ratio(stats.home_wins.into(), stats.home_matches);
    stats.away_win_rate = ratio(stats.away_wins.into(), stats.away_matches);

    // Stable sort: undated rows land last, ties keep file order.
    matches.sort_by_key(|rec| Reverse(rec.date));
    stats.recent_form = matches
        .iter()
        .take(RECENT_FORM_LEN)
        .filter_map(|rec| {
            let is_home = rec.home_team.eq_ignore_ascii_case(team);
            rec.result()
                .map(|result| FormResult::from_perspective(result, is_home))
        })
        .collect();

    stats
}
