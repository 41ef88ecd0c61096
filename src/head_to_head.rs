use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::MatchRecord;
use crate::team_stats::FormResult;

/// Played meetings between two teams, either venue, newest first.
///
/// Takes any iterator so callers can chain several datasets; a fixture that
/// appears more than once is kept once.
pub fn head_to_head<'a>(
    team_a: &str,
    team_b: &str,
    records: impl IntoIterator<Item = &'a MatchRecord>,
) -> Vec<&'a MatchRecord> {
    let mut seen = HashSet::new();
    let mut meetings: Vec<&MatchRecord> = records
        .into_iter()
        .filter(|rec| rec.is_played() && is_meeting(rec, team_a, team_b))
        .filter(|rec| rec.fixture_key().is_none_or(|key| seen.insert(key)))
        .collect();
    meetings.sort_by_key(|rec| Reverse(rec.date));
    meetings
}

fn is_meeting(rec: &MatchRecord, team_a: &str, team_b: &str) -> bool {
    let home = rec.home_team.as_str();
    let away = rec.away_team.as_str();
    (home.eq_ignore_ascii_case(team_a) && away.eq_ignore_ascii_case(team_b))
        || (home.eq_ignore_ascii_case(team_b) && away.eq_ignore_ascii_case(team_a))
}

/// Counts over a head-to-head sequence, from `team_a`'s side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub meetings: u32,
    pub team_a_wins: u32,
    pub draws: u32,
    pub team_b_wins: u32,
    pub team_a_goals: u64,
    pub team_b_goals: u64,
}

impl HeadToHeadSummary {
    pub fn team_a_win_fraction(&self) -> Option<f64> {
        (self.meetings > 0).then(|| self.team_a_wins as f64 / self.meetings as f64)
    }
}

pub fn summarize(team_a: &str, meetings: &[&MatchRecord]) -> HeadToHeadSummary {
    let mut out = HeadToHeadSummary::default();
    for rec in meetings {
        let (Some(score), Some(result)) = (rec.score(), rec.result()) else {
            continue;
        };
        let a_home = rec.home_team.eq_ignore_ascii_case(team_a);
        let (a_goals, b_goals) = if a_home {
            (score.home, score.away)
        } else {
            (score.away, score.home)
        };
        out.meetings += 1;
        out.team_a_goals += u64::from(a_goals);
        out.team_b_goals += u64::from(b_goals);
        match FormResult::from_perspective(result, a_home) {
            FormResult::Win => out.team_a_wins += 1,
            FormResult::Draw => out.draws += 1,
            FormResult::Loss => out.team_b_wins += 1,
        }
    }
    out
}
