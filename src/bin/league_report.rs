use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use match_forecast::config::EngineConfig;
use match_forecast::league_overview::{
    goals_distribution, league_overview, recent_results, result_distribution, season_trends,
};
use match_forecast::{Forecaster, RecordStore};

const RECENT_LIMIT: usize = 10;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let Some(competition) = std::env::args().nth(1) else {
        bail!("usage: league_report <competition> [team]");
    };
    let team = std::env::args().nth(2);

    let config = EngineConfig::from_env();
    let store = RecordStore::new(config.directory_source());
    let forecaster = Forecaster::new(&store).with_league_avg_fallback(config.league_avg_fallback);
    let records = store
        .load(&competition)
        .with_context(|| format!("load competition {competition}"))?;

    let team_stats = match team.as_deref() {
        Some(name) => Some(forecaster.team_statistics(&competition, name)?),
        None => None,
    };

    let report = json!({
        "competition": competition,
        "overview": league_overview(&records),
        "results": result_distribution(&records),
        "goals": goals_distribution(&records),
        "seasons": season_trends(&records),
        "recent": recent_results(&records, RECENT_LIMIT),
        "upcoming": forecaster.predict_upcoming(&competition)?,
        "team": team_stats,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize report")?
    );
    Ok(())
}
