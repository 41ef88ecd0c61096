use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use csv::StringRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn result(&self) -> MatchResult {
        if self.home > self.away {
            MatchResult::Win
        } else if self.home < self.away {
            MatchResult::Loss
        } else {
            MatchResult::Draw
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.home) + u64::from(self.away)
    }
}

/// Result of a played match from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

/// Goals exist only on played fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Played(Score),
}

/// Rolling-form columns attached upstream. Carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingForm {
    pub home_form_goals_scored: Option<f64>,
    pub home_form_goals_conceded: Option<f64>,
    pub home_form_win_rate: Option<f64>,
    pub away_form_goals_scored: Option<f64>,
    pub away_form_goals_conceded: Option<f64>,
    pub away_form_win_rate: Option<f64>,
}

impl RollingForm {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub date: Option<NaiveDateTime>,
    pub status: MatchStatus,
    pub competition: String,
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling: Option<RollingForm>,
}

impl MatchRecord {
    pub fn score(&self) -> Option<Score> {
        match self.status {
            MatchStatus::Played(score) => Some(score),
            MatchStatus::Scheduled => None,
        }
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.score().map(|s| s.result())
    }

    pub fn is_played(&self) -> bool {
        matches!(self.status, MatchStatus::Played(_))
    }

    pub fn home_goals(&self) -> Option<u32> {
        self.score().map(|s| s.home)
    }

    pub fn away_goals(&self) -> Option<u32> {
        self.score().map(|s| s.away)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team.eq_ignore_ascii_case(team) || self.away_team.eq_ignore_ascii_case(team)
    }

    /// Key under which two rows describe the same fixture. Undated rows have
    /// no key and are always distinct matches.
    pub fn fixture_key(&self) -> Option<(String, String, NaiveDateTime)> {
        let date = self.date?;
        Some((
            self.home_team.to_lowercase(),
            self.away_team.to_lowercase(),
            date,
        ))
    }
}

/// A row that could not be turned into a record. Never leaves the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: missing team name")]
    MissingTeam { line: usize },
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone)]
pub struct Header {
    width: usize,
    columns: HashMap<String, usize>,
}

impl Header {
    pub fn from_record(headers: &StringRecord) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_column(name), idx))
            .collect();
        Self {
            width: headers.len(),
            columns,
        }
    }

    pub fn has(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn has_teams(&self) -> bool {
        self.has("home_team") && self.has("away_team")
    }

    fn cell<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        let idx = *self.columns.get(column)?;
        row.get(idx).map(str::trim)
    }

    fn non_empty<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.cell(row, column).filter(|s| !s.is_empty())
    }

    /// `line` is the 1-based source line the row starts on.
    pub fn decode(
        &self,
        line: usize,
        row: &StringRecord,
        competition: &str,
    ) -> Result<MatchRecord, RowIssue> {
        if row.len() != self.width {
            return Err(RowIssue::MalformedRecord {
                line,
                expected: self.width,
                found: row.len(),
            });
        }

        let (Some(home_team), Some(away_team)) = (
            self.non_empty(row, "home_team"),
            self.non_empty(row, "away_team"),
        ) else {
            return Err(RowIssue::MissingTeam { line });
        };

        let home_goals = self.non_empty(row, "home_goals");
        let away_goals = self.non_empty(row, "away_goals");
        let played = match self.non_empty(row, "status") {
            Some(status) => status.eq_ignore_ascii_case("played"),
            None if self.has("status") => false,
            None => home_goals.is_some() && away_goals.is_some(),
        };
        let status = if played {
            MatchStatus::Played(Score {
                home: coerce_goals(home_goals.unwrap_or_default()),
                away: coerce_goals(away_goals.unwrap_or_default()),
            })
        } else {
            MatchStatus::Scheduled
        };

        let rolling = RollingForm {
            home_form_goals_scored: self.float(row, "home_form_goals_scored"),
            home_form_goals_conceded: self.float(row, "home_form_goals_conceded"),
            home_form_win_rate: self.float(row, "home_form_win_rate"),
            away_form_goals_scored: self.float(row, "away_form_goals_scored"),
            away_form_goals_conceded: self.float(row, "away_form_goals_conceded"),
            away_form_win_rate: self.float(row, "away_form_win_rate"),
        };

        Ok(MatchRecord {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            date: self.non_empty(row, "date").and_then(parse_date),
            status,
            competition: self
                .non_empty(row, "competition")
                .unwrap_or(competition)
                .to_string(),
            season: self.non_empty(row, "season").map(str::to_string),
            rolling: (!rolling.is_empty()).then_some(rolling),
        })
    }

    fn float(&self, row: &StringRecord, column: &str) -> Option<f64> {
        self.non_empty(row, column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

fn normalize_column(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Largest goal count a single side is taken to have scored in one match.
pub const MAX_GOALS: u32 = 99;

/// Goal cells are coerced, never rejected: junk and absurd counts become 0.
pub fn coerce_goals(raw: &str) -> u32 {
    let raw = raw.trim();
    let goals = match raw.parse::<u32>() {
        Ok(v) => v,
        Err(_) => match raw.parse::<f64>() {
            Ok(v) if (0.0..=f64::from(MAX_GOALS)).contains(&v) => v.trunc() as u32,
            _ => 0,
        },
    };
    if goals > MAX_GOALS { 0 } else { goals }
}

pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
