use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LEAGUE_AVG_GOALS;
use crate::estimator::{Outcome, Prob3};
use crate::record::MatchRecord;
use crate::team_stats::TeamStatistics;

const HOME_SCORING_BOOST: f64 = 1.1;
const FORCED_MARGIN: f64 = 0.3;
const DRAW_HOME_NUDGE: f64 = 0.1;

// Bounds in tenths of a goal.
const HOME_BOUNDS: (i64, i64) = (5, 45);
const AWAY_BOUNDS: (i64, i64) = (3, 40);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scoreline {
    pub home_goals: f64,
    pub away_goals: f64,
}

/// Goals per side per played match; `None` when nothing has been played.
pub fn league_avg_goals_per_side(records: &[MatchRecord]) -> Option<f64> {
    let (goals, played) = records
        .iter()
        .filter_map(MatchRecord::score)
        .fold((0u64, 0u64), |(goals, played), s| {
            (goals + s.total(), played + 1)
        });
    (played > 0).then(|| goals as f64 / (2 * played) as f64)
}

pub fn league_avg_or_default(records: &[MatchRecord]) -> f64 {
    league_avg_goals_per_side(records).unwrap_or(DEFAULT_LEAGUE_AVG_GOALS)
}

/// League-typical output scaled by the team's share of its own goal traffic.
fn base_goals(team: &TeamStatistics, league_avg: f64) -> f64 {
    let traffic = team.avg_goals_scored + team.avg_goals_conceded;
    let share = if traffic > 0.0 {
        team.avg_goals_scored / traffic
    } else {
        0.5
    };
    league_avg * 2.0 * share
}

/// Expected score, reconciled so it never contradicts `probs`.
pub fn project(
    home: &TeamStatistics,
    away: &TeamStatistics,
    league_avg: f64,
    probs: &Prob3,
) -> Scoreline {
    let base_home = base_goals(home, league_avg) * HOME_SCORING_BOOST;
    let base_away = base_goals(away, league_avg);
    let edge = 2.0 * (probs.home - probs.away).abs();

    let outcome = probs.most_likely();
    let (home_goals, away_goals) = match outcome {
        Outcome::Home if base_home <= base_away => (base_away + FORCED_MARGIN + edge, base_away),
        Outcome::Away if base_away <= base_home => (base_home, base_home + FORCED_MARGIN + edge),
        Outcome::Draw => {
            let level = (base_home + base_away) / 2.0;
            (level + DRAW_HOME_NUDGE, level)
        }
        _ => (base_home, base_away),
    };

    let (home_tenths, away_tenths) = settle(
        to_tenths(home_goals, HOME_BOUNDS),
        to_tenths(away_goals, AWAY_BOUNDS),
        outcome,
    );
    Scoreline {
        home_goals: home_tenths as f64 / 10.0,
        away_goals: away_tenths as f64 / 10.0,
    }
}

fn to_tenths(goals: f64, (lo, hi): (i64, i64)) -> i64 {
    if !goals.is_finite() {
        return lo;
    }
    ((goals * 10.0).round() as i64).clamp(lo, hi)
}

// Clamping and rounding can erase or flip a narrow winning margin; restore it
// by a tenth, moving the loser when the winner is already at its bound.
fn settle(mut home: i64, mut away: i64, outcome: Outcome) -> (i64, i64) {
    match outcome {
        Outcome::Home if home <= away => {
            home = (away + 1).min(HOME_BOUNDS.1);
            if home <= away {
                away = (home - 1).max(AWAY_BOUNDS.0);
            }
        }
        Outcome::Away if away <= home => {
            away = (home + 1).min(AWAY_BOUNDS.1);
            if away <= home {
                home = (away - 1).max(HOME_BOUNDS.0);
            }
        }
        _ => {}
    }
    (home, away)
}
