//! Explainable match-outcome estimation from historical match records.
//!
//! Given a competition's played matches, [`prediction::Forecaster`] resolves two
//! team names, aggregates their statistics, extracts their head-to-head history
//! and produces a calibrated home/draw/away distribution plus a scoreline that
//! agrees with it.

pub mod config;
pub mod error;
pub mod estimator;
pub mod head_to_head;
pub mod league_overview;
pub mod prediction;
pub mod record;
pub mod record_store;
pub mod scoreline;
pub mod team_resolver;
pub mod team_stats;

pub use error::{EngineError, EngineResult};
pub use prediction::{Forecaster, PredictionResult, predict};
pub use record_store::{DatasetSource, DirectorySource, MemorySource, RecordStore};
