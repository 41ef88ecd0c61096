use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_LEAGUE_AVG_GOALS;
use crate::error::{EngineError, EngineResult};
use crate::estimator::{self, Outcome, PredictionFactors};
use crate::head_to_head::{self, HeadToHeadSummary};
use crate::record::MatchRecord;
use crate::record_store::{DatasetSource, RecordStore};
use crate::scoreline;
use crate::team_resolver;
use crate::team_stats::{self, TeamStatistics};

const CONFIDENCE_FLOOR: f64 = 0.5;
const CONFIDENCE_CEILING: f64 = 0.95;
const CONFIDENCE_SPAN: f64 = 0.45;
const CONFIDENCE_FULL_SAMPLE: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home_team: String,
    pub away_team: String,
    pub home_competition: String,
    pub away_competition: String,
    pub predicted_home_win: f64,
    pub predicted_draw: f64,
    pub predicted_away_win: f64,
    pub predicted_home_goals: f64,
    pub predicted_away_goals: f64,
    pub most_likely: Outcome,
    pub confidence: f64,
    pub factors: PredictionFactors,
    pub head_to_head: HeadToHeadSummary,
}

/// How much data backs a prediction, not how lopsided it is.
pub fn confidence(home_played: u32, away_played: u32, head_to_head_len: usize) -> f64 {
    let data_points = home_played as f64 + away_played as f64 + 2.0 * head_to_head_len as f64;
    (CONFIDENCE_FLOOR + data_points / CONFIDENCE_FULL_SAMPLE * CONFIDENCE_SPAN).min(CONFIDENCE_CEILING)
}

/// One side of a fixture: the name a user typed and the dataset to find it in.
#[derive(Debug, Clone, Copy)]
pub struct TeamQuery<'a> {
    pub competition: &'a str,
    pub name: &'a str,
    pub records: &'a [MatchRecord],
}

impl<'a> TeamQuery<'a> {
    pub fn new(competition: &'a str, name: &'a str, records: &'a [MatchRecord]) -> Self {
        Self {
            competition,
            name,
            records,
        }
    }

    fn resolve(&self) -> EngineResult<String> {
        team_resolver::resolve(self.name, self.records)
            .ok_or_else(|| EngineError::team_not_found(self.name, self.competition))
    }
}

/// Pure prediction over already-loaded records. `home` is the nominal home side.
pub fn predict_records(
    home: TeamQuery<'_>,
    away: TeamQuery<'_>,
    league_avg_fallback: f64,
) -> EngineResult<PredictionResult> {
    let home_team = home.resolve()?;
    let away_team = away.resolve()?;
    debug!(%home_team, %away_team, "teams resolved");

    let home_stats = team_stats::aggregate(&home_team, home.records);
    let away_stats = team_stats::aggregate(&away_team, away.records);

    let same_dataset = std::ptr::eq(home.records, away.records);
    let meetings = if same_dataset {
        head_to_head::head_to_head(&home_team, &away_team, home.records)
    } else {
        head_to_head::head_to_head(
            &home_team,
            &away_team,
            home.records.iter().chain(away.records.iter()),
        )
    };

    let league_avg = if same_dataset {
        scoreline::league_avg_goals_per_side(home.records).unwrap_or(league_avg_fallback)
    } else {
        let a = scoreline::league_avg_goals_per_side(home.records).unwrap_or(league_avg_fallback);
        let b = scoreline::league_avg_goals_per_side(away.records).unwrap_or(league_avg_fallback);
        (a + b) / 2.0
    };

    Ok(compose(
        &home_stats,
        &away_stats,
        &meetings,
        league_avg,
        home.competition,
        away.competition,
    ))
}

fn compose(
    home: &TeamStatistics,
    away: &TeamStatistics,
    meetings: &[&MatchRecord],
    league_avg: f64,
    home_competition: &str,
    away_competition: &str,
) -> PredictionResult {
    let estimate = estimator::estimate(home, away, meetings);
    let score = scoreline::project(home, away, league_avg, &estimate.probs);
    PredictionResult {
        home_team: home.team.clone(),
        away_team: away.team.clone(),
        home_competition: home_competition.to_string(),
        away_competition: away_competition.to_string(),
        predicted_home_win: estimate.probs.home,
        predicted_draw: estimate.probs.draw,
        predicted_away_win: estimate.probs.away,
        predicted_home_goals: score.home_goals,
        predicted_away_goals: score.away_goals,
        most_likely: estimate.probs.most_likely(),
        confidence: confidence(home.matches_played, away.matches_played, meetings.len()),
        factors: estimate.factors,
        head_to_head: head_to_head::summarize(&home.team, meetings),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingPrediction {
    pub date: Option<NaiveDateTime>,
    pub prediction: PredictionResult,
}

/// Engine entry points over a caller-owned [`RecordStore`].
pub struct Forecaster<'s, S> {
    store: &'s RecordStore<S>,
    league_avg_fallback: f64,
}

impl<'s, S: DatasetSource> Forecaster<'s, S> {
    pub fn new(store: &'s RecordStore<S>) -> Self {
        Self {
            store,
            league_avg_fallback: DEFAULT_LEAGUE_AVG_GOALS,
        }
    }

    pub fn with_league_avg_fallback(mut self, goals_per_side: f64) -> Self {
        self.league_avg_fallback = goals_per_side;
        self
    }

    pub fn predict(
        &self,
        competition: &str,
        team_a: &str,
        team_b: &str,
    ) -> EngineResult<PredictionResult> {
        let records = self.store.load(competition)?;
        predict_records(
            TeamQuery::new(competition, team_a, &records),
            TeamQuery::new(competition, team_b, &records),
            self.league_avg_fallback,
        )
    }

    /// `team_a` plays the nominal home side; there is no neutral venue.
    pub fn predict_cross_competition(
        &self,
        competition_a: &str,
        team_a: &str,
        competition_b: &str,
        team_b: &str,
    ) -> EngineResult<PredictionResult> {
        if competition_a == competition_b {
            return self.predict(competition_a, team_a, team_b);
        }
        let records_a = self.store.load(competition_a)?;
        let records_b = self.store.load(competition_b)?;
        predict_records(
            TeamQuery::new(competition_a, team_a, &records_a),
            TeamQuery::new(competition_b, team_b, &records_b),
            self.league_avg_fallback,
        )
    }

    pub fn team_statistics(&self, competition: &str, team: &str) -> EngineResult<TeamStatistics> {
        let records = self.store.load(competition)?;
        let canonical = TeamQuery::new(competition, team, &records).resolve()?;
        Ok(team_stats::aggregate(&canonical, &records))
    }

    pub fn head_to_head(
        &self,
        competition: &str,
        team_a: &str,
        team_b: &str,
    ) -> EngineResult<Vec<MatchRecord>> {
        let records = self.store.load(competition)?;
        let a = TeamQuery::new(competition, team_a, &records).resolve()?;
        let b = TeamQuery::new(competition, team_b, &records).resolve()?;
        Ok(head_to_head::head_to_head(&a, &b, records.iter())
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn teams(&self, competition: &str) -> EngineResult<Vec<String>> {
        Ok(team_resolver::teams(&self.store.load(competition)?))
    }

    /// Predictions for every scheduled fixture, oldest first. Fixtures with a
    /// side that has never played in the dataset are left out.
    pub fn predict_upcoming(&self, competition: &str) -> EngineResult<Vec<UpcomingPrediction>> {
        let records = self.store.load(competition)?;
        let fixtures = crate::league_overview::upcoming_fixtures(&records);
        let records: &[MatchRecord] = &records;
        let league_avg =
            scoreline::league_avg_goals_per_side(records).unwrap_or(self.league_avg_fallback);
        let out = fixtures
            .par_iter()
            .filter_map(|fixture| {
                let home = team_stats::aggregate(&fixture.home_team, records);
                let away = team_stats::aggregate(&fixture.away_team, records);
                if home.matches_played == 0 || away.matches_played == 0 {
                    return None;
                }
                let meetings =
                    head_to_head::head_to_head(&fixture.home_team, &fixture.away_team, records);
                Some(UpcomingPrediction {
                    date: fixture.date,
                    prediction: compose(&home, &away, &meetings, league_avg, competition, competition),
                })
            })
            .collect();
        Ok(out)
    }
}

/// Single composed entry point with default settings.
pub fn predict<S: DatasetSource>(
    store: &RecordStore<S>,
    competition: &str,
    team_a: &str,
    team_b: &str,
) -> EngineResult<PredictionResult> {
    Forecaster::new(store).predict(competition, team_a, team_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_grows_with_sample_and_caps() {
        assert!((confidence(0, 0, 0) - 0.5).abs() < 1e-12);
        assert!((confidence(50, 30, 10) - (0.5 + 100.0 / 200.0 * 0.45)).abs() < 1e-12);
        assert!((confidence(200, 200, 50) - 0.95).abs() < 1e-12);
    }
}
