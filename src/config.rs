//! Configuration loaded from `~/.config/folio-cli/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pitch::SingleFlight;
use crate::theme::{self, Palette, ThemeMode};

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// Environment variable that overrides the pitch endpoint.
pub const ENDPOINT_ENV_VAR: &str = "FOLIO_PITCH_ENDPOINT";

/// Pitch endpoint configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PitchConfig {
    /// URL the business problem is POSTed to
    pub endpoint: String,
    /// Seconds to wait for a connection before giving up
    pub connect_timeout_secs: u64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/generate-pitch".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl PitchConfig {
    /// Apply environment overrides on top of the file config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint.trim().to_string();
            }
        }
        self
    }
}

/// Behavior configuration for the UI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Number of lines to scroll with Page Up/Down
    pub scroll_page_size: usize,
    /// Frame duration while a pitch is streaming, in milliseconds
    pub stream_frame_ms: u64,
    /// Idle polling interval in milliseconds
    pub idle_poll_ms: u64,
    /// Cursor blink interval in milliseconds
    pub cursor_blink_ms: u64,
    /// What a second submission does while a pitch is streaming
    pub single_flight: SingleFlight,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            scroll_page_size: 10,
            stream_frame_ms: 16, // ~60 FPS
            idle_poll_ms: 100,
            cursor_blink_ms: 530,
            single_flight: SingleFlight::Reject,
        }
    }
}

/// Theme configuration: the active mode and both palettes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Mode used at startup; updated on exit if toggled
    pub mode: ThemeMode,
    #[serde(deserialize_with = "theme::dark_palette")]
    pub dark: Palette,
    #[serde(deserialize_with = "theme::light_palette")]
    pub light: Palette,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
            dark: Palette::dark(),
            light: Palette::light(),
        }
    }
}

/// Where the portfolio content comes from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Profile file; defaults to profile.toml next to config.toml
    pub path: Option<PathBuf>,
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by RUST_LOG
    pub level: String,
    /// Log file; defaults to folio.log in the local data directory
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "folio_cli=info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Resolve the log file path.
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|p| p.join("folio-cli"))
                .unwrap_or_else(std::env::temp_dir)
                .join("folio.log")
        })
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub pitch: PitchConfig,
    pub behavior: BehaviorConfig,
    pub theme: ThemeConfig,
    pub profile: ProfileConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Returns the config directory: ~/.config/folio-cli
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("folio-cli"))
    }

    /// Returns the default config file path: ~/.config/folio-cli/config.toml
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| Self::load_from_path(&path).ok())
            .unwrap_or_default()
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::default_path() {
            self.save_to_path(&path)
        } else {
            Err(anyhow::anyhow!("Could not determine config directory"))
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the profile file path.
    pub fn profile_path(&self) -> Option<PathBuf> {
        self.profile
            .path
            .clone()
            .or_else(|| Self::config_dir().map(|p| p.join("profile.toml")))
    }
}
