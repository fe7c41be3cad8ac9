use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sweeper_core::DEFAULT_DRAWS_PER_CELL;

use crate::Result;

/// Tunables for the service and the command-line front end, read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_size: i64,
    pub default_mines: i64,
    /// Fixed generator seed, a fresh random seed per game when unset.
    pub seed: Option<u64>,
    /// Rejection-sampling budget per cell before the generator falls back to picking free cells.
    pub max_draws_per_cell: u32,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_size: 8,
            default_mines: 10,
            seed: None,
            max_draws_per_cell: DEFAULT_DRAWS_PER_CELL,
            data_dir: PathBuf::from("games"),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `path`, a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
