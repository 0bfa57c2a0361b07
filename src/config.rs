//! Client configuration (~/.clinicboard/config.json).
//!
//! The auth/session collaborator is out of scope: this core only consumes
//! a bearer token and the current user's role, both supplied here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the clinic API, e.g. `https://clinic.example.com/api`.
    pub api_base_url: String,
    /// Bearer token from the session bootstrap.
    #[serde(default)]
    pub api_token: String,
    /// Current user's role; gates which mutation affordances are exposed.
    #[serde(default = "default_role")]
    pub role: Role,
    /// IANA timezone name used to anchor date-window filters.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Periodic dashboard refresh interval, seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_role() -> Role {
    Role::Patient
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_refresh_interval() -> u64 {
    30
}

impl Config {
    /// Parse the configured timezone, falling back to the default when
    /// the name is unrecognized.
    pub fn resolved_timezone(&self) -> chrono_tz::Tz {
        self.timezone
            .parse()
            .unwrap_or(chrono_tz::America::New_York)
    }
}

/// Get the canonical config file path (~/.clinicboard/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".clinicboard").join("config.json"))
}

/// Load configuration from ~/.clinicboard/config.json
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!(
            "Config file not found at {}. Create it with: {{ \"apiBaseUrl\": \"https://clinic.example.com/api\" }}",
            path.display()
        ));
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.api_base_url.trim().is_empty() {
        return Err("Config is missing apiBaseUrl".to_string());
    }

    Ok(config)
}
