//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BoothError, BoothResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Directory where finished photostrips are written.
    pub output_dir: PathBuf,

    /// Default session selections.
    pub session: SessionDefaults,

    /// Capture sequencer pacing.
    pub pacing: PacingConfig,

    /// Photostrip rendering settings.
    pub strip: StripConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Selections a new session starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    /// Photos per strip (2, 3 or 4).
    pub layout: u8,

    /// Filter name (none, grayscale, sepia, soft, vintage).
    pub filter: String,

    /// Strip theme name (white, black, gray).
    pub theme: String,
}

/// Timing of the countdown-then-shoot loop, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// First countdown value shown before each shot.
    pub countdown_from: u8,

    /// How long each countdown value is held.
    pub tick_ms: u64,

    /// How long the flash stays up after a shot when more shots remain.
    pub flash_hold_ms: u64,

    /// Blank pause before the next countdown starts.
    pub reset_hold_ms: u64,

    /// Delay between the last shot and handing frames to the compositor.
    pub handoff_delay_ms: u64,
}

/// Photostrip rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Title caption drawn in the footer band.
    pub title: String,

    /// Watermark drawn near the bottom-right corner.
    pub watermark: String,

    /// TrueType/OpenType font used for captions. Falls back to
    /// common system monospace fonts when unset or unreadable.
    pub font_path: Option<PathBuf>,

    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "photobooth=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs_default_output(),
            session: SessionDefaults::default(),
            pacing: PacingConfig::default(),
            strip: StripConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            layout: 4,
            filter: "none".to_string(),
            theme: "white".to_string(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            tick_ms: 1000,
            flash_hold_ms: 1000,
            reset_hold_ms: 500,
            handoff_delay_ms: 500,
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            title: "Home Proj.".to_string(),
            watermark: "© waveeeh".to_string(),
            font_path: None,
            jpeg_quality: 90,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl BoothConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Check values serde cannot: ranges and non-zero pacing.
    pub fn validate(&self) -> BoothResult<()> {
        if !(2..=4).contains(&self.session.layout) {
            return Err(BoothError::config(format!(
                "session.layout must be 2, 3 or 4 (got {})",
                self.session.layout
            )));
        }
        if self.pacing.countdown_from == 0 {
            return Err(BoothError::config("pacing.countdown_from must be at least 1"));
        }
        if !(1..=100).contains(&self.strip.jpeg_quality) {
            return Err(BoothError::config(format!(
                "strip.jpeg_quality must be 1-100 (got {})",
                self.strip.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Where [`BoothConfig::load`] looks for the config file.
    pub fn path() -> PathBuf {
        config_file_path()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("photobooth").join("config.json")
}

/// Default output directory for photostrips.
fn dirs_default_output() -> PathBuf {
    let base = std::env::var("XDG_PICTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join("Pictures")
        });
    base.join("photobooth")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing_matches_booth_rhythm() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.countdown_from, 3);
        assert_eq!(pacing.tick_ms, 1000);
        assert_eq!(pacing.flash_hold_ms + pacing.reset_hold_ms, 1500);
        assert_eq!(pacing.handoff_delay_ms, 500);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: BoothConfig =
            serde_json::from_str(r#"{"output_dir":"/x","pacing":{"tick_ms":250}}"#).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/x"));
        assert_eq!(config.pacing.tick_ms, 250);
        assert_eq!(config.pacing.countdown_from, 3);
        assert_eq!(config.strip.jpeg_quality, 90);
        assert_eq!(config.session.theme, "white");
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        assert!(BoothConfig::default().validate().is_ok());

        let mut config = BoothConfig::default();
        config.session.layout = 5;
        assert!(matches!(config.validate(), Err(BoothError::Config { .. })));

        let mut config = BoothConfig::default();
        config.strip.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = BoothConfig::default();
        config.strip.title = "Birthday".to_string();
        config.session.layout = 3;
        let json = serde_json::to_string(&config).unwrap();
        let back: BoothConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strip.title, "Birthday");
        assert_eq!(back.session.layout, 3);
        assert_eq!(back.pacing, PacingConfig::default());
    }
}
