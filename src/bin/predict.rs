use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use match_forecast::config::EngineConfig;
use match_forecast::{EngineError, Forecaster, RecordStore};

const USAGE: &str = "usage: predict <competition> <home team> <away team>\n       predict <competition_a> <team_a> <competition_b> <team_b>";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = EngineConfig::from_env();
    let store = RecordStore::new(config.directory_source());
    let forecaster = Forecaster::new(&store).with_league_avg_fallback(config.league_avg_fallback);

    let result = match args.as_slice() {
        [competition, home, away] => forecaster.predict(competition, home, away),
        [comp_a, team_a, comp_b, team_b] => {
            forecaster.predict_cross_competition(comp_a, team_a, comp_b, team_b)
        }
        _ => bail!("{USAGE}"),
    };

    let prediction = match result {
        Ok(prediction) => prediction,
        Err(err @ EngineError::TeamNotFound { .. }) => {
            return Err(err).context("check the team name spelling");
        }
        Err(err @ EngineError::DatasetNotFound { .. }) => {
            return Err(err).with_context(|| {
                format!("check the competition id (data dir {})", config.data_dir.display())
            });
        }
        Err(err) => return Err(err.into()),
    };

    let json = serde_json::to_string_pretty(&prediction).context("serialize prediction")?;
    println!("{json}");
    Ok(())
}
