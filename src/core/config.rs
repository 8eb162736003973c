use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::mpjpe_tracker::DEFAULT_HISTORY_WINDOW;
use crate::models::pose::PoseConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Compute MPJPE for every processed frame
    pub evaluate_mpjpe: bool,
    /// Draw prediction vs ground truth connectors
    pub visualize_comparison: bool,
    /// Draw the MPJPE panel on the frame
    pub display_mpjpe: bool,
    /// Mirror frames horizontally before processing (live camera view)
    pub flip_frame: bool,
    /// Synthetic ground truth noise level (0.0-1.0)
    pub noise_level: f64,
    /// Number of recent MPJPE values kept for charts
    pub history_window: usize,
    /// TTF font used for overlay text; without it only panels and swatches are drawn
    pub overlay_font_path: Option<PathBuf>,
    /// Where session reports are written
    pub report_dir: PathBuf,
    /// Pose model settings
    pub pose: PoseConfig,
}

fn home_dir() -> ConfigResult<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .map_err(|_| ConfigError::NoHomeDirectory)
}

impl Default for Config {
    fn default() -> Self {
        let mut report_dir = home_dir().unwrap_or_else(|_| PathBuf::from("."));
        report_dir.push(".fitness_vision");
        report_dir.push("reports");

        Self {
            evaluate_mpjpe: false,
            visualize_comparison: false,
            display_mpjpe: false,
            flip_frame: true,
            noise_level: 0.3,
            history_window: DEFAULT_HISTORY_WINDOW,
            overlay_font_path: None,
            report_dir,
            pose: PoseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating with defaults if it doesn't exist
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err(ConfigError::Invalid(format!(
                "noise level {} must be between 0.0 and 1.0",
                self.noise_level
            )));
        }

        if self.history_window == 0 || self.history_window > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "history window {} must be between 1 and 10000 frames",
                self.history_window
            )));
        }

        // Drawing either overlay without evaluating has nothing to show
        if (self.visualize_comparison || self.display_mpjpe) && !self.evaluate_mpjpe {
            return Err(ConfigError::Invalid(
                "visualize_comparison and display_mpjpe require evaluate_mpjpe".to_string(),
            ));
        }

        self.pose
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> ConfigResult<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> ConfigResult<PathBuf> {
        let mut path = home_dir()?;
        path.push(".fitness_vision");
        path.push("config");
        path.push("settings.json");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn get_test_config_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("fitness_vision_test_config_{}", name));
        path.push("settings.json");
        path
    }

    fn cleanup_test_config(path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.evaluate_mpjpe);
        assert!(!config.visualize_comparison);
        assert!(!config.display_mpjpe);
        assert!(config.flip_frame);
        assert_eq!(config.noise_level, 0.3);
        assert_eq!(config.history_window, 100);
        assert!(config.overlay_font_path.is_none());
        assert!(config.report_dir.ends_with("reports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.noise_level = 1.5;
        assert!(config.validate().is_err());
        config.noise_level = -0.1;
        assert!(config.validate().is_err());
        config.noise_level = 0.3;

        config.history_window = 0;
        assert!(config.validate().is_err());
        config.history_window = 100;

        config.display_mpjpe = true;
        assert!(config.validate().is_err());
        config.evaluate_mpjpe = true;
        assert!(config.validate().is_ok());

        config.pose.target_fps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let path = get_test_config_path("roundtrip");
        cleanup_test_config(&path);

        let mut config = Config::default();
        config.evaluate_mpjpe = true;
        config.display_mpjpe = true;
        config.noise_level = 0.7;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        cleanup_test_config(&path);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = get_test_config_path("invalid");
        cleanup_test_config(&path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));

        let mut config = Config::default();
        config.noise_level = 3.0;
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Invalid(_))));

        cleanup_test_config(&path);
    }
}
