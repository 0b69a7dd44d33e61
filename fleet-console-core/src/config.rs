use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::controller::LIST_PAGE_SIZES;
use crate::error::ConsoleError;
use crate::slice::REPORT_PAGE_SIZES;
use crate::window::DEFAULT_WINDOW_WIDTH;

pub const API_URL_ENV: &str = "FLEET_CONSOLE_API_URL";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub page_size_options: Vec<usize>,
    pub default_page_size: usize,
    pub report_page_size_options: Vec<usize>,
    pub page_window_width: usize,
    pub request_timeout_secs: u64,
    pub export_dir: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            page_size_options: LIST_PAGE_SIZES.to_vec(),
            default_page_size: 10,
            report_page_size_options: REPORT_PAGE_SIZES.to_vec(),
            page_window_width: DEFAULT_WINDOW_WIDTH,
            request_timeout_secs: 30,
            export_dir: None,
        }
    }
}

impl ConsoleConfig {
    /// Default location: `<config dir>/fleet-console/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "fleet", "fleet-console")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConsoleError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_json::from_str(&contents)
            .map_err(|e| ConsoleError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the file at `path` (or the default location), then applies the
    /// environment override and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConsoleError> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => Self::load_from(&p)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(&url);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn apply_api_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_base_url = url.to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConsoleError::Config("api_base_url is empty".to_string()));
        }
        for (name, sizes) in [
            ("page_size_options", &self.page_size_options),
            ("report_page_size_options", &self.report_page_size_options),
        ] {
            if sizes.is_empty() || sizes.contains(&0) {
                return Err(ConsoleError::Config(format!(
                    "{} must be non-empty and positive",
                    name
                )));
            }
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConsoleError::Config(format!(
                "default_page_size {} is not one of {:?}",
                self.default_page_size, self.page_size_options
            )));
        }
        if self.page_window_width == 0 {
            return Err(ConsoleError::Config(
                "page_window_width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.page_size_options, vec![5, 10, 20, 50]);
        assert_eq!(config.report_page_size_options, vec![5, 10, 25, 50, 100]);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "api_base_url": "https://fleet.example.com", "default_page_size": 20 }"#,
        )
        .unwrap();

        let config = ConsoleConfig::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://fleet.example.com");
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            ConsoleConfig::load_from(&path),
            Err(ConsoleError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_default_size_outside_options() {
        let config = ConsoleConfig {
            default_page_size: 7,
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = ConsoleConfig::default();
        config.apply_api_url_override("   ");
        assert_eq!(config.api_base_url, "http://localhost:8080");
        config.apply_api_url_override("http://10.0.0.5:9000");
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
    }
}
