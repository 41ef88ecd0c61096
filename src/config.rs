use std::path::PathBuf;

use crate::record_store::DirectorySource;

const DEFAULT_DATA_DIR: &str = "fbref_data/processed";
const DEFAULT_FILE_SUFFIX: &str = "_processed.csv";
pub const DEFAULT_LEAGUE_AVG_GOALS: f64 = 1.3;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub file_suffix: String,
    /// League-average goals per side used when a dataset has no played matches.
    pub league_avg_fallback: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            league_avg_fallback: DEFAULT_LEAGUE_AVG_GOALS,
        }
    }
}

impl EngineConfig {
    /// Reads `FORECAST_*` variables; callers load `.env` files beforehand.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let data_dir = lookup("FORECAST_DATA_DIR")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let file_suffix = lookup("FORECAST_FILE_SUFFIX")
            .filter(|val| !val.trim().is_empty())
            .unwrap_or(defaults.file_suffix);
        let league_avg_fallback = lookup("FORECAST_LEAGUE_AVG_GOALS")
            .and_then(|val| val.trim().parse::<f64>().ok())
            .filter(|val| val.is_finite() && *val > 0.0)
            .unwrap_or(defaults.league_avg_fallback);
        Self {
            data_dir,
            file_suffix,
            league_avg_fallback,
        }
    }

    pub fn directory_source(&self) -> DirectorySource {
        DirectorySource::new(self.data_dir.clone(), self.file_suffix.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let cfg = EngineConfig::from_lookup(|_| None);
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FORECAST_DATA_DIR", "/srv/leagues"),
            ("FORECAST_FILE_SUFFIX", ".csv"),
            ("FORECAST_LEAGUE_AVG_GOALS", "1.45"),
        ]);
        let cfg = EngineConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/leagues"));
        assert_eq!(cfg.file_suffix, ".csv");
        assert!((cfg.league_avg_fallback - 1.45).abs() < 1e-12);
    }

    #[test]
    fn bad_league_average_is_ignored() {
        for bad in ["abc", "-1", "0", "NaN"] {
            let cfg = EngineConfig::from_lookup(|key| {
                (key == "FORECAST_LEAGUE_AVG_GOALS").then(|| bad.to_string())
            });
            assert!((cfg.league_avg_fallback - DEFAULT_LEAGUE_AVG_GOALS).abs() < 1e-12);
        }
    }
}
