//! Application-level configuration loading, including the runtime roster.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::draft::Roster;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CELEB_DRAFT_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    roster: Roster,
    celebrities: Vec<CelebritySeed>,
}

/// One celebrity entry loaded from the configuration file before the draft opens.
#[derive(Debug, Clone, Deserialize)]
pub struct CelebritySeed {
    /// Display name of the celebrity.
    pub name: String,
    /// Age shown on the board and used for per-seat ordering.
    pub age: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the baked-in roster.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        seats = app_config.roster.len(),
                        celebrities = app_config.celebrities.len(),
                        "loaded roster from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration around an explicit roster, letting tests exercise
    /// non-default roster sizes.
    pub fn with_roster(roster: Roster) -> Self {
        Self {
            roster,
            celebrities: Vec::new(),
        }
    }

    /// The ordered roster defining seats and draft order.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Celebrities to load into the pool before the draft opens.
    pub fn initial_celebrities(&self) -> &[CelebritySeed] {
        &self.celebrities
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster: Roster::new(default_players()),
            celebrities: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    players: Vec<String>,
    #[serde(default)]
    celebrities: Vec<CelebritySeed>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let trimmed: Vec<String> = value
            .players
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if trimmed.is_empty() {
            warn!("config listed no usable players; falling back to the default roster");
            return Self {
                roster: Roster::new(default_players()),
                celebrities: value.celebrities,
            };
        }

        Self {
            roster: Roster::new(trimmed),
            celebrities: value.celebrities,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in six-player roster shipped with the binary.
fn default_players() -> Vec<String> {
    vec![
        "Maya".to_string(),
        "Jonas".to_string(),
        "Priya".to_string(),
        "Theo".to_string(),
        "Sofia".to_string(),
        "Marcus".to_string(),
    ]
}
