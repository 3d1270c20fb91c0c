//! Arena configuration: optional JSON file, then environment overrides.
//!
//! Environment variables:
//! - `DUEL_ARENA_CONFIG` - config file path (default: `duel_arena.json`)
//! - `DUEL_ARENA_STATS` - stats ledger path (default: `fighter_stats.txt`)
//! - `DUEL_ARENA_STATS_FORMAT` - `pipe` or `json` (default: `pipe`)
//! - `DUEL_ARENA_DIFFICULTY` - default difficulty level 1..3 (default: 2)
//! - `DUEL_ARENA_SEED` - fixed RNG seed; unset means entropy-seeded duels
//! - `DUEL_ARENA_WORKERS` - balance worker threads, 0 = all cores (default: 0)
//! - `DUEL_ARENA_INPUT_ATTEMPTS` - prompt retries before giving up (default: 5)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{Difficulty, Rng};
use crate::data::{StatsFormat, StatsStore, DEFAULT_STATS_PATH};

pub const DEFAULT_CONFIG_PATH: &str = "duel_arena.json";
pub const DEFAULT_INPUT_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub stats_path: PathBuf,
    pub stats_format: StatsFormat,
    pub difficulty: Difficulty,
    pub seed: Option<u64>,
    pub workers: usize,
    pub input_attempts: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            stats_path: PathBuf::from(DEFAULT_STATS_PATH),
            stats_format: StatsFormat::Pipe,
            difficulty: Difficulty::Standard,
            seed: None,
            workers: 0,
            input_attempts: DEFAULT_INPUT_ATTEMPTS,
        }
    }
}

impl ArenaConfig {
    /// File (if any) then environment. Never fails; a bad file is logged and ignored.
    pub fn load() -> Self {
        let path = env::var("DUEL_ARENA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = match Self::from_file(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!(%err, "ignoring config file");
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// `Ok(None)` when the file does not exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var("DUEL_ARENA_STATS") {
            if !path.trim().is_empty() {
                self.stats_path = PathBuf::from(path);
            }
        }
        if let Some(format) = read_env::<StatsFormat>("DUEL_ARENA_STATS_FORMAT") {
            self.stats_format = format;
        }
        if let Some(level) = read_env::<i64>("DUEL_ARENA_DIFFICULTY") {
            self.difficulty = Difficulty::from_level(level);
        }
        if let Some(seed) = read_env::<u64>("DUEL_ARENA_SEED") {
            self.seed = Some(seed);
        }
        if let Some(workers) = read_env::<usize>("DUEL_ARENA_WORKERS") {
            self.workers = workers;
        }
        if let Some(attempts) = read_env::<u32>("DUEL_ARENA_INPUT_ATTEMPTS") {
            self.input_attempts = attempts.max(1);
        }
    }

    pub fn stats_store(&self) -> StatsStore {
        StatsStore::with_format(&self.stats_path, self.stats_format)
    }

    /// Fixed seed when configured, otherwise a fresh entropy-seeded stream.
    pub fn rng(&self) -> Rng {
        self.seed.map(Rng::new).unwrap_or_else(Rng::from_entropy)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, body: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "duel-arena-config-{name}-{}.json",
            std::process::id()
        ));
        fs::write(&path, body).expect("fixture should be written");
        path
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let missing = env::temp_dir().join("duel-arena-config-does-not-exist.json");
        assert!(matches!(ArenaConfig::from_file(missing), Ok(None)));
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let path = temp_config("partial", r#"{"difficulty":"high_risk","seed":11}"#);
        let config = ArenaConfig::from_file(&path)
            .expect("valid json")
            .expect("file exists");
        assert_eq!(config.difficulty, Difficulty::HighRisk);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.stats_path, PathBuf::from(DEFAULT_STATS_PATH));
        assert_eq!(config.input_attempts, DEFAULT_INPUT_ATTEMPTS);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let path = temp_config("broken", "{ not json");
        assert!(matches!(
            ArenaConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn seeded_config_gives_repeatable_rng() {
        let config = ArenaConfig {
            seed: Some(5),
            ..ArenaConfig::default()
        };
        assert_eq!(config.rng().next_u64(), Rng::new(5).next_u64());
    }
}
