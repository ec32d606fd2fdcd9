use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    #[serde(default)]
    pub motion: MotionSection,
    #[serde(default)]
    pub general: GeneralSection,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            motion: MotionSection::default(),
            general: GeneralSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionSection {
    /// Global animation toggle. When false all motions jump to their
    /// final state immediately.
    #[serde(default = "default_true")]
    pub animations_enabled: bool,
    /// Milliseconds between animation frames
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            animations_enabled: default_true(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSection {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_frame_interval() -> u64 {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

impl MotionConfig {
    /// Load configuration from file or return defaults.
    ///
    /// The `MOTIVE_DISABLE_ANIMATION` environment variable forces
    /// `animations_enabled` off regardless of the file contents.
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        if std::env::var_os("MOTIVE_DISABLE_ANIMATION").is_some() {
            config.motion.animations_enabled = false;
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/motive/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("motive")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_animation() {
        let config = MotionConfig::default();
        assert!(config.motion.animations_enabled);
        assert_eq!(config.motion.frame_interval_ms, 16);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config = MotionConfig::from_toml_str(
            r#"
            [motion]
            animations_enabled = false
            "#,
        )
        .unwrap();
        assert!(!config.motion.animations_enabled);
        assert_eq!(config.motion.frame_interval_ms, 16);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = MotionConfig::from_toml_str("motion = nonsense").unwrap_err();
        assert!(matches!(err, crate::Error::TomlParse(_)));
    }
}
