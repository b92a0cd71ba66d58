use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use crate::helpers::clamp_player_name;
use crate::model::Language;

const SETTINGS_FILE_NAME: &str = "settings.json";
const CURRENT_VERSION: u32 = 2;
pub const DATA_DIR_ENV: &str = "ZENNUM_DATA_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub user_name: String,

    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_difficulty_id")]
    pub difficulty_id: String,

    #[serde(default = "default_true")]
    pub audio_enabled: bool,

    #[serde(skip)]
    path: Option<PathBuf>,
}

// Helper functions for default values
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_difficulty_id() -> String {
    "normal".to_string()
}

pub fn generate_user_id() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

/// `$ZENNUM_DATA_DIR` when set, otherwise the platform user data dir.
pub fn data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => glib::user_data_dir().join("zennum"),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: CURRENT_VERSION,
            user_id: generate_user_id(),
            user_name: String::new(),
            language: Language::default(),
            difficulty_id: default_difficulty_id(),
            audio_enabled: true,
            path: None,
        }
    }
}

impl Settings {
    pub fn in_memory() -> Self {
        Settings::default()
    }

    pub fn load_default() -> Self {
        Self::load(data_dir().join(SETTINGS_FILE_NAME))
    }

    /// Reads the profile at `path`. Missing or unreadable files yield a fresh
    /// profile (with a new player id) which is saved right away.
    pub fn load(path: PathBuf) -> Self {
        if let Ok(contents) = fs::read_to_string(&path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.path = Some(path);
                    if settings.migrate() {
                        settings.persist();
                    }
                    return settings;
                }
                Err(err) => {
                    warn!(target: "settings", "Discarding unreadable settings at {:?}: {}", path, err);
                }
            }
        }
        let settings = Settings {
            path: Some(path),
            ..Settings::default()
        };
        settings.persist();
        settings
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string(self)?;
        fs::write(path, contents)
    }

    pub fn persist(&self) {
        if let Err(err) = self.save() {
            error!(target: "settings", "Failed to save settings to {:?}: {}", self.path, err);
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(&mut self) -> bool {
        let before = (self.version, self.user_id.clone());
        match self.version {
            0 | 1 => {
                // v1 profiles were written before the player id moved into settings
                self.version = CURRENT_VERSION;
            }
            _ => (),
        }
        if self.user_id.trim().is_empty() {
            self.user_id = generate_user_id();
        }
        before != (self.version, self.user_id.clone())
    }

    pub fn has_player_name(&self) -> bool {
        !self.user_name.trim().is_empty()
    }

    pub fn set_player_name(&mut self, name: &str) -> bool {
        let name = clamp_player_name(name);
        if name.is_empty() {
            return false;
        }
        self.user_name = name;
        true
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.trim().parse::<u64>().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub countdown_ticks: u32,
    pub tick_interval: Duration,
    pub ranking_timeout: Duration,
    pub enrichment_timeout: Duration,
    pub leaderboard_limit: usize,
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            countdown_ticks: 3,
            tick_interval: Duration::from_secs(1),
            ranking_timeout: Duration::from_secs(5),
            enrichment_timeout: Duration::from_secs(8),
            leaderboard_limit: 1000,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self {
            seed: Settings::seed_from_env(),
            ..Self::default()
        }
    }
}
