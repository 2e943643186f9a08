//! Configuration system
//!
//! Configs are plain serde structs persisted as TOML or RON. The format
//! follows the file extension; anything else is rejected rather than
//! guessed.

pub use serde::{Serialize, Deserialize};

use std::fmt;
use std::path::Path;

use crate::audio::backend::AudioBackendConfig;
use crate::audio::SoundCategory;

/// On-disk config formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    ///
    /// # Errors
    /// `UnsupportedFormat` for any other extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Ron => "RON",
        })
    }
}

/// Serde config persisted as TOML or RON
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Reject values that parse but cannot be used
    ///
    /// # Errors
    /// `Invalid` describing the first offending field
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Parse and validate config text
    ///
    /// # Errors
    /// `Parse` for malformed text, `Invalid` if validation fails
    fn parse(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(format, e.to_string()))?,
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(format, e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty-printed config text
    ///
    /// # Errors
    /// `Serialize` if the value cannot be represented in `format`
    fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string())),
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    ///
    /// # Errors
    /// `UnsupportedFormat` before touching the file, then `Io`, `Parse` or
    /// `Invalid`
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse(&contents, format)?;
        log::debug!("Loaded {} config from {}", format, path.display());
        Ok(config)
    }

    /// Load configuration from file, falling back to defaults if the file is missing
    ///
    /// # Errors
    /// As [`Config::load_from_file`], except a missing file
    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// `UnsupportedFormat`, `Serialize` or `Io`
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.render(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config text
    #[error("{0} parse error: {1}")]
    Parse(ConfigFormat, String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension other than `.toml` / `.ron`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Well-formed but unusable value
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// What `replay` resumes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// `pause` never records an offset and `stop` zeroes it, so `replay`
    /// always starts from 0 unless the offset was set some other way.
    #[default]
    Compatible,
    /// `pause` records the current position; `replay` resumes from it.
    ResumeFromPause,
}

/// Sound handle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Category assigned to newly created handles
    pub default_category: SoundCategory,
    /// Replay behaviour after pause/stop
    pub replay_policy: ReplayPolicy,
    /// Clamp negative `play` positions to zero before they reach the resource
    pub clamp_negative_position: bool,
    /// Backend output settings
    pub backend: AudioBackendConfig,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            default_category: SoundCategory::Effect,
            replay_policy: ReplayPolicy::Compatible,
            clamp_negative_position: false,
            backend: AudioBackendConfig::default(),
        }
    }
}

impl Config for SoundConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let backend = &self.backend;
        if backend.sample_rate == 0 {
            return Err(ConfigError::Invalid("backend.sample_rate must be positive".into()));
        }
        if backend.channels == 0 {
            return Err(ConfigError::Invalid("backend.channels must be positive".into()));
        }
        if backend.buffer_size == 0 {
            return Err(ConfigError::Invalid("backend.buffer_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("sound_engine_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults() {
        let config = SoundConfig::default();
        assert_eq!(config.default_category, SoundCategory::Effect);
        assert_eq!(config.replay_policy, ReplayPolicy::Compatible);
        assert!(!config.clamp_negative_position);
        assert_eq!(config.backend.sample_rate, 44100);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = SoundConfig::parse(
            r#"
            default_category = "music"
            replay_policy = "resume_from_pause"
            "#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.default_category, SoundCategory::Music);
        assert_eq!(config.replay_policy, ReplayPolicy::ResumeFromPause);
        assert!(!config.clamp_negative_position);
        assert_eq!(config.backend.channels, 2);
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = temp_path("config.toml");
        let config = SoundConfig {
            clamp_negative_position: true,
            ..SoundConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = SoundConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = temp_path("config.ron");
        let config = SoundConfig {
            default_category: SoundCategory::Music,
            ..SoundConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = SoundConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.default_category, SoundCategory::Music);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_format() {
        let result = SoundConfig::default().save_to_file("config.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        // Rejected on the extension, before any read is attempted
        let result = SoundConfig::load_from_file(temp_path("missing.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/sound.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("sound.ron")).unwrap(), ConfigFormat::Ron);
        assert!(ConfigFormat::from_path(Path::new("sound")).is_err());
    }

    #[test]
    fn test_parse_error_names_format() {
        let result = SoundConfig::parse("default_category = ", ConfigFormat::Toml);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(ConfigFormat::Toml, _)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn test_unusable_backend_settings_rejected() {
        let result = SoundConfig::parse(
            r#"
            [backend]
            sample_rate = 44100
            channels = 0
            buffer_size = 4096
            "#,
            ConfigFormat::Toml,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = SoundConfig::load_or_default(temp_path("missing.toml")).unwrap();
        assert_eq!(config, SoundConfig::default());
    }
}
