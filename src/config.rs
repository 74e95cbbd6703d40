//! Runtime configuration.
//!
//! Layers, later ones winning:
//! 1. built-in defaults
//! 2. a JSON file (`u-roster.json`, or an explicit path)
//! 3. `U_ROSTER_*` environment variables

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Config file looked up from the working directory upwards.
pub const DEFAULT_CONFIG_FILE: &str = "u-roster.json";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "U_ROSTER_";

/// Keys read from the environment, after the prefix is stripped.
const ENV_KEYS: [&str; 5] = ["data_dir", "defaults_dir", "per_room", "seed", "log"];

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `members.json`, `rooms.json`, `timings.json`.
    pub data_dir: PathBuf,
    /// Directory whose files seed a fresh data directory.
    pub defaults_dir: Option<PathBuf>,
    /// Default persons per room when none is given.
    pub per_room: Option<usize>,
    /// Fixed shuffle seed for reproducible rosters.
    pub seed: Option<u64>,
    /// Log filter directive, e.g. `info` or `u_roster=debug`.
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            defaults_dir: None,
            per_room: None,
            seed: None,
            log: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads defaults, the config file and environment overrides.
    ///
    /// An explicit `path` must exist; without one, `u-roster.json` is read
    /// only if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                fs::metadata(path).map_err(|e| RosterError::io(path, e))?;
                path
            }
            None => Path::new(DEFAULT_CONFIG_FILE),
        };
        Ok(Self::figment(file).extract()?)
    }

    /// The provider stack behind [`Config::load`].
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Json::file(file))
            .merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS))
    }
}
