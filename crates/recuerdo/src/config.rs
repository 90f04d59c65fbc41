//! Configuration: built-in defaults, then environment, then CLI flags.

use anyhow::{Context, Result};
use chrono::Weekday;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::date::parse_weekday;
use crate::db::{SqliteStorage, DB_FILE};
use crate::error::StoreResult;
use crate::store::ReminderStore;

pub const ENV_DATA_DIR: &str = "RECUERDO_DATA_DIR";
pub const ENV_BACKEND: &str = "RECUERDO_BACKEND";
pub const ENV_WEEK_START: &str = "RECUERDO_WEEK_START";
pub const ENV_PORT: &str = "RECUERDO_PORT";

pub const DEFAULT_PORT: u16 = 8080;

/// Where reminders are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(format!("Unknown backend '{other}' (expected json or sqlite)")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Json => f.write_str("json"),
            Backend::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// First column of the calendar grid
    pub week_start: Weekday,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            backend: Backend::Json,
            week_start: Weekday::Sun,
            port: DEFAULT_PORT,
        }
    }
}

/// Values given on the command line. `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub week_start: Option<Weekday>,
    pub port: Option<u16>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// A `.env` file in the working directory is read first, if present.
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup(ENV_BACKEND) {
            settings.backend = backend
                .parse::<Backend>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("{ENV_BACKEND} is invalid"))?;
        }
        if let Some(day) = lookup(ENV_WEEK_START) {
            settings.week_start =
                parse_weekday(&day).with_context(|| format!("{ENV_WEEK_START} is invalid"))?;
        }
        if let Some(port) = lookup(ENV_PORT) {
            settings.port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        }

        Ok(settings)
    }

    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            data_dir: overrides.data_dir.unwrap_or(self.data_dir),
            backend: overrides.backend.unwrap_or(self.backend),
            week_start: overrides.week_start.unwrap_or(self.week_start),
            port: overrides.port.unwrap_or(self.port),
        }
    }

    /// Open the configured storage backend
    pub fn open_store(&self) -> StoreResult<ReminderStore> {
        Ok(match self.backend {
            Backend::Json => ReminderStore::json(&self.data_dir),
            Backend::Sqlite => ReminderStore::new(Box::new(SqliteStorage::open(
                &self.data_dir.join(DB_FILE),
            )?)),
        })
    }
}
