//! Three-way outcome estimate built from additive, bounded signal terms.
//!
//! Every term is an adjustment to a near-uniform 33/34/33 baseline. The raw
//! scores are clamped into plausible bands and then renormalized, so sparse or
//! extreme inputs cannot produce a near-certain prediction.

use serde::{Deserialize, Serialize};

use crate::head_to_head::summarize;
use crate::record::MatchRecord;
use crate::team_stats::TeamStatistics;

const BASE_SIDE: f64 = 0.33;
const BASE_DRAW: f64 = 0.34;

const HOME_ADVANTAGE: f64 = 0.08;
const FORM_WEIGHT: f64 = 0.12;
const GOAL_RATIO_WEIGHT: f64 = 0.15;
const WIN_RATE_WEIGHT: f64 = 0.2;
const H2H_WEIGHT: f64 = 0.1;
const DRAW_DAMPING: f64 = 0.3;

const SIDE_RANGE: (f64, f64) = (0.08, 0.75);
const DRAW_RANGE: (f64, f64) = (0.12, 0.45);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prob3 {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Prob3 {
    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// Strict winner among home and away; anything else (draw on top, or a
    /// tie for the top spot) counts as a draw.
    pub fn most_likely(&self) -> Outcome {
        if self.home > self.away && self.home > self.draw {
            Outcome::Home
        } else if self.away > self.home && self.away > self.draw {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }
}

/// Size of each signal's contribution to the home-side raw score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactors {
    pub home_advantage: f64,
    pub form_differential: f64,
    pub goal_ratio_differential: f64,
    pub win_rate_differential: f64,
    pub head_to_head_differential: f64,
}

impl PredictionFactors {
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("home_advantage", self.home_advantage),
            ("form_differential", self.form_differential),
            ("goal_ratio_differential", self.goal_ratio_differential),
            ("win_rate_differential", self.win_rate_differential),
            ("head_to_head_differential", self.head_to_head_differential),
        ]
    }

    fn total(&self) -> f64 {
        self.entries().iter().map(|(_, v)| v).sum()
    }

    // Terms that describe a real strength gap; home advantage and h2h don't
    // pull the draw down.
    fn strength_gap(&self) -> f64 {
        self.form_differential + self.goal_ratio_differential + self.win_rate_differential
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub probs: Prob3,
    pub factors: PredictionFactors,
}

pub fn factors(
    home: &TeamStatistics,
    away: &TeamStatistics,
    head_to_head: &[&MatchRecord],
) -> PredictionFactors {
    let home_ratio = home.goal_ratio();
    let away_ratio = away.goal_ratio();
    let ratio_total = home_ratio + away_ratio;
    let ratio_diff = if ratio_total > 0.0 {
        (home_ratio - away_ratio) / ratio_total
    } else {
        0.0
    };

    PredictionFactors {
        home_advantage: HOME_ADVANTAGE,
        form_differential: (home.form_balance() - away.form_balance()) * FORM_WEIGHT,
        goal_ratio_differential: ratio_diff * GOAL_RATIO_WEIGHT,
        win_rate_differential: (home.win_rate - away.win_rate) * WIN_RATE_WEIGHT,
        head_to_head_differential: h2h_term(&home.team, head_to_head),
    }
}

fn h2h_term(home_team: &str, head_to_head: &[&MatchRecord]) -> f64 {
    summarize(home_team, head_to_head)
        .team_a_win_fraction()
        .map_or(0.0, |won| (won - 0.5) * H2H_WEIGHT)
}

/// `home` is always the nominal home side, even across competitions.
pub fn estimate(
    home: &TeamStatistics,
    away: &TeamStatistics,
    head_to_head: &[&MatchRecord],
) -> Estimate {
    let factors = factors(home, away, head_to_head);
    let shift = factors.total();

    let raw_home = clamp(BASE_SIDE + shift, SIDE_RANGE);
    let raw_away = clamp(BASE_SIDE - shift, SIDE_RANGE);
    let raw_draw = clamp(
        BASE_DRAW - DRAW_DAMPING * factors.strength_gap().abs(),
        DRAW_RANGE,
    );

    let sum = raw_home + raw_draw + raw_away;
    let probs = Prob3 {
        home: raw_home / sum,
        draw: raw_draw / sum,
        away: raw_away / sum,
    };
    Estimate { probs, factors }
}

fn clamp(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}
