//! Configuration management for athenaq.
//!
//! Loads named Athena connections and query settings from a TOML file. CLI flags
//! and environment variables are merged on top (see `cli`), then everything is
//! resolved into `Settings`.

use crate::error::{AthenaqError, Result};
use crate::query::{
    PollOptions, RunOptions, SubmitOptions, DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL,
    MAX_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Region used when none is configured anywhere.
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Main configuration structure for athenaq.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named Athena connections.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,

    /// Query execution settings.
    #[serde(default)]
    pub query: QuerySettings,
}

/// Where and how to reach Athena.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// AWS region.
    pub region: Option<String>,

    /// S3 location for query results.
    pub output_location: Option<String>,

    /// Athena workgroup.
    pub workgroup: Option<String>,

    /// Default database for unqualified table names.
    pub database: Option<String>,

    /// AWS shared-config profile.
    pub aws_profile: Option<String>,
}

impl ConnectionConfig {
    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &ConnectionConfig) {
        if other.region.is_some() {
            self.region = other.region.clone();
        }
        if other.output_location.is_some() {
            self.output_location = other.output_location.clone();
        }
        if other.workgroup.is_some() {
            self.workgroup = other.workgroup.clone();
        }
        if other.database.is_some() {
            self.database = other.database.clone();
        }
        if other.aws_profile.is_some() {
            self.aws_profile = other.aws_profile.clone();
        }
    }

    /// Returns the region, falling back to the built-in default.
    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Returns a short description for log output.
    pub fn display_string(&self) -> String {
        let workgroup = self.workgroup.as_deref().unwrap_or("primary");
        let output = self.output_location.as_deref().unwrap_or("<unset>");
        format!("{workgroup} @ {} -> {output}", self.region_or_default())
    }
}

/// Tunables for polling and pagination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct QuerySettings {
    /// Rows per result page (1-1000).
    pub page_size: Option<i32>,

    /// Seconds between status polls.
    pub poll_interval_secs: Option<u64>,

    /// Give up waiting after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl QuerySettings {
    /// Merges another settings block into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &QuerySettings) {
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.poll_interval_secs.is_some() {
            self.poll_interval_secs = other.poll_interval_secs;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("athenaq")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AthenaqError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AthenaqError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named connection, or the default connection if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionConfig> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub region: String,
    pub aws_profile: Option<String>,
    pub run: RunOptions,
}

impl Settings {
    /// Resolves a merged connection and query settings, validating the tunables.
    ///
    /// A missing output location is not rejected here; the submitter reports it.
    pub fn resolve(connection: ConnectionConfig, query: QuerySettings) -> Result<Self> {
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AthenaqError::config(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        let interval = match query.poll_interval_secs {
            Some(0) => {
                return Err(AthenaqError::config("poll interval must be at least 1 second"))
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_POLL_INTERVAL,
        };

        let timeout = match query.timeout_secs {
            Some(0) => return Err(AthenaqError::config("timeout must be at least 1 second")),
            other => other.map(Duration::from_secs),
        };

        Ok(Self {
            region: connection.region_or_default().to_string(),
            aws_profile: connection.aws_profile,
            run: RunOptions {
                submit: SubmitOptions {
                    output_location: connection.output_location,
                    workgroup: connection.workgroup,
                    database: connection.database,
                },
                poll: PollOptions { interval, timeout },
                page_size,
            },
        })
    }
}
