use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::SessionSettings;
use crate::session::selection::{REVEAL_MAX, REVEAL_MIN};
use crate::theme::THEMES;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "swipedeck";

pub const DEFAULT_PLAYER: &str = "mpv";
pub const DEFAULT_AUDIO_SOURCE: &str = "https://files.catbox.moe/hive2y.mp3";

pub const KEYS: &[&str] = &[
    "display.theme",
    "display.font",
    "swipe.threshold",
    "reveal.delay_ms",
    "reveal.value",
    "audio.enabled",
    "audio.player",
    "audio.source",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe: Option<SwipeConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Extra TTF/OTF font added as a fallback, e.g. for Arabic glyphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// External program used to play the looping background track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,

    /// Arguments passed before the source. Defaults suit mpv.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Audio settings with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    pub enabled: bool,
    pub player: String,
    pub args: Vec<String>,
    pub source: String,
}

impl AudioSettings {
    pub fn default_args() -> Vec<String> {
        ["--no-video", "--loop=inf", "--really-quiet"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `swipedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# swipedeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme_name(&self) -> &str {
        self.display
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("soft")
    }

    pub fn font(&self) -> Option<&Path> {
        self.display.as_ref().and_then(|d| d.font.as_deref())
    }

    /// Settings for a new session. Values a hand-edited file got wrong are
    /// ignored with a warning.
    pub fn session_settings(&self) -> SessionSettings {
        let defaults = SessionSettings::default();
        let swipe = self.swipe.as_ref();
        let reveal = self.reveal.as_ref();

        let swipe_threshold = match swipe.and_then(|s| s.threshold) {
            Some(t) if valid_threshold(t) => t,
            Some(t) => {
                tracing::warn!(
                    threshold = t,
                    default = defaults.swipe_threshold,
                    "Ignoring invalid swipe.threshold"
                );
                defaults.swipe_threshold
            }
            None => defaults.swipe_threshold,
        };
        let reveal_value = match reveal.and_then(|r| r.value) {
            Some(n) if valid_reveal_value(n) => n,
            Some(n) => {
                tracing::warn!(
                    value = n,
                    default = defaults.reveal_value,
                    "Ignoring out-of-range reveal.value"
                );
                defaults.reveal_value
            }
            None => defaults.reveal_value,
        };

        SessionSettings {
            swipe_threshold,
            reveal_delay: reveal
                .and_then(|r| r.delay_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_delay),
            reveal_value,
        }
    }

    pub fn audio_settings(&self) -> AudioSettings {
        let audio = self.audio.clone().unwrap_or_default();
        AudioSettings {
            enabled: audio.enabled.unwrap_or(true),
            player: audio.player.unwrap_or_else(|| DEFAULT_PLAYER.to_string()),
            args: audio.args.unwrap_or_else(AudioSettings::default_args),
            source: audio
                .source
                .unwrap_or_else(|| DEFAULT_AUDIO_SOURCE.to_string()),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "display.theme" => {
                if !THEMES.contains(&value) {
                    anyhow::bail!("Invalid theme: {value}. Must be one of: {}", THEMES.join(", "));
                }
                self.display
                    .get_or_insert_with(DisplayConfig::default)
                    .theme = Some(value.to_string());
            }
            "display.font" => {
                let path = PathBuf::from(value);
                if !path.is_file() {
                    anyhow::bail!("Font file not found: {value}");
                }
                self.display.get_or_insert_with(DisplayConfig::default).font = Some(path);
            }
            "swipe.threshold" => {
                let threshold: f32 = value
                    .parse()
                    .ok()
                    .filter(|t: &f32| valid_threshold(*t))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid threshold: {value}. Must be a positive number.")
                    })?;
                self.swipe.get_or_insert_with(SwipeConfig::default).threshold = Some(threshold);
            }
            "reveal.delay_ms" => {
                let delay: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid delay: {value}. Must be a whole number of milliseconds.")
                })?;
                self.reveal.get_or_insert_with(RevealConfig::default).delay_ms = Some(delay);
            }
            "reveal.value" => {
                let number: u8 = value
                    .parse()
                    .ok()
                    .filter(|n: &u8| valid_reveal_value(*n))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid reveal value: {value}. Must be between {REVEAL_MIN} and {REVEAL_MAX}."
                        )
                    })?;
                self.reveal.get_or_insert_with(RevealConfig::default).value = Some(number);
            }
            "audio.enabled" => {
                let enabled = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => anyhow::bail!("Invalid value: {value}. Must be 'true' or 'false'."),
                };
                self.audio.get_or_insert_with(AudioConfig::default).enabled = Some(enabled);
            }
            "audio.player" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Player command cannot be empty.");
                }
                self.audio.get_or_insert_with(AudioConfig::default).player =
                    Some(value.to_string());
            }
            "audio.source" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Audio source cannot be empty.");
                }
                self.audio.get_or_insert_with(AudioConfig::default).source =
                    Some(value.to_string());
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }
}

fn valid_threshold(threshold: f32) -> bool {
    threshold.is_finite() && threshold > 0.0
}

fn valid_reveal_value(value: u8) -> bool {
    (REVEAL_MIN..=REVEAL_MAX).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_session_defaults() {
        let config = Config::default();
        assert_eq!(config.session_settings(), SessionSettings::default());
        assert_eq!(config.theme_name(), "soft");
        let audio = config.audio_settings();
        assert!(audio.enabled);
        assert_eq!(audio.player, "mpv");
        assert_eq!(audio.source, DEFAULT_AUDIO_SOURCE);
    }

    #[test]
    fn test_set_and_resolve() {
        let mut config = Config::default();
        config.set("swipe.threshold", "45").unwrap();
        config.set("reveal.delay_ms", "250").unwrap();
        config.set("reveal.value", "13").unwrap();
        config.set("display.theme", "night").unwrap();
        config.set("audio.enabled", "off").unwrap();

        let settings = config.session_settings();
        assert_eq!(settings.swipe_threshold, 45.0);
        assert_eq!(settings.reveal_delay, Duration::from_millis(250));
        assert_eq!(settings.reveal_value, 13);
        assert_eq!(config.theme_name(), "night");
        assert!(!config.audio_settings().enabled);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("display.theme", "neon").is_err());
        assert!(config.set("swipe.threshold", "-3").is_err());
        assert!(config.set("swipe.threshold", "NaN").is_err());
        assert!(config.set("reveal.value", "0").is_err());
        assert!(config.set("reveal.value", "21").is_err());
        assert!(config.set("reveal.delay_ms", "soon").is_err());
        assert!(config.set("audio.enabled", "maybe").is_err());
        assert!(config.set("audio.player", "  ").is_err());
        assert!(config.set("display.font", "/no/such/font.ttf").is_err());
        let err = config.set("nope", "1").unwrap_err();
        assert!(err.to_string().contains("reveal.value"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("reveal.value", "5").unwrap();
        config.set("audio.player", "ffplay").unwrap();
        config.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# swipedeck configuration"));
        assert!(!text.contains("swipe:"), "unset sections are skipped");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session_settings().reveal_value, 5);
        assert_eq!(loaded.audio_settings().player, "ffplay");
    }

    #[test]
    fn test_missing_file_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn test_hand_edited_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = SessionSettings::default();

        for yaml in [
            "swipe:\n  threshold: .nan\nreveal:\n  value: 0\n",
            "swipe:\n  threshold: 0\nreveal:\n  value: 21\n",
            "swipe:\n  threshold: -12.5\n",
            "swipe:\n  threshold: .inf\n",
        ] {
            let path = dir.path().join(FILENAME);
            std::fs::write(&path, yaml).unwrap();
            let settings = Config::load_from(&path).unwrap().session_settings();
            assert_eq!(settings.swipe_threshold, defaults.swipe_threshold, "{yaml}");
            assert_eq!(settings.reveal_value, defaults.reveal_value, "{yaml}");
        }

        let path = dir.path().join(FILENAME);
        std::fs::write(&path, "swipe:\n  threshold: 12\nreveal:\n  value: 7\n").unwrap();
        let settings = Config::load_from(&path).unwrap().session_settings();
        assert_eq!(settings.swipe_threshold, 12.0);
        assert_eq!(settings.reveal_value, 7);

        let gesture = crate::session::gesture::GestureInterpreter::new(defaults.swipe_threshold);
        assert!(gesture.classify(-1.0).is_none());
    }
}
