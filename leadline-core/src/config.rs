use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How a bare month number is matched against record dates.
///
/// `AnyYear` matches the month in every year, which is what the lead views
/// have always done. `CurrentYear` pins the match to the year of "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthScope {
    #[default]
    AnyYear,
    CurrentYear,
}

impl FromStr for MonthScope {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any_year" | "any-year" | "any" => Ok(MonthScope::AnyYear),
            "current_year" | "current-year" | "current" => Ok(MonthScope::CurrentYear),
            other => Err(ConfigError::InvalidEnvVar {
                key: "MONTH_SCOPE".into(),
                value: other.to_string(),
            }),
        }
    }
}

/// Global configuration shared by the service and the binaries.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    pub month_scope: MonthScope,
}

impl CoreConfig {
    /// Loads configuration from the process environment (`LEADLINE_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup("LEADLINE_", |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let database_path = match lookup(&key("DATABASE_PATH")) {
            Some(raw) if !raw.trim().is_empty() => PathBuf::from(raw),
            _ => default_database_path()?,
        };

        let log_level = lookup(&key("LOG")).unwrap_or_else(|| "info".to_string());

        let scope_key = key("MONTH_SCOPE");
        let month_scope = match lookup(&scope_key) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
                key: scope_key.clone(),
                value: raw,
            })?,
            None => MonthScope::default(),
        };

        Ok(Self {
            database_path,
            log_level,
            month_scope,
        })
    }
}

/// `~/.leadline/data/leads.db`
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".leadline").join("data").join("leads.db"))
}
