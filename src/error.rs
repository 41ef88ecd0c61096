use std::io;

use thiserror::Error;

/// Failures surfaced to the caller of the engine.
///
/// Row-level problems are never reported here; the record store skips such rows
/// and keeps going (see [`crate::record::RowIssue`]).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no dataset found for competition '{competition}'")]
    DatasetNotFound { competition: String },

    #[error("team '{name}' not found in competition '{competition}'")]
    TeamNotFound { name: String, competition: String },

    #[error("failed reading dataset for competition '{competition}'")]
    DatasetUnreadable {
        competition: String,
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    pub fn dataset_not_found(competition: &str) -> Self {
        Self::DatasetNotFound {
            competition: competition.to_string(),
        }
    }

    pub fn team_not_found(name: &str, competition: &str) -> Self {
        Self::TeamNotFound {
            name: name.to_string(),
            competition: competition.to_string(),
        }
    }

    /// True when the user needs to fix a team name rather than a competition.
    pub fn is_team_error(&self) -> bool {
        matches!(self, Self::TeamNotFound { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
