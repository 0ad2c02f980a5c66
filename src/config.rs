//! Panel configuration loaded from YAML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_FILE, HOST_COMMAND_ENV};

/// Settings for the panel binary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Executable that implements the host side of the protocol
    pub host_command: String,
    pub host_args: Vec<String>,
    pub log_file: PathBuf,
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            host_command: String::new(),
            host_args: Vec::new(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: String::from("info"),
        }
    }
}

impl PanelConfig {
    /// `<config dir>/request-panel/config.yaml`, or `./request-panel.yaml` without a config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(format!("{}.yaml", CONFIG_DIR_NAME)))
    }

    /// Load from the default location and apply the environment override
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let config = Self::load_from(&path)?;
        Ok(config.with_host_override(std::env::var(HOST_COMMAND_ENV).ok()))
    }

    /// Load from `path`. A missing or empty file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Replace the host command when an override is present and non-empty
    pub fn with_host_override(mut self, host: Option<String>) -> Self {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.host_command = host;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.host_command.trim().is_empty() {
            bail!(
                "no host command configured: set `host_command` in {} or {}",
                Self::default_path().display(),
                HOST_COMMAND_ENV
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PanelConfig::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, PanelConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host_command: node\nhost_args:\n  - host.js").unwrap();

        let config = PanelConfig::load_from(file.path()).unwrap();
        assert_eq!(config.host_command, "node");
        assert_eq!(config.host_args, vec!["host.js".to_string()]);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host_args: [unclosed").unwrap();
        assert!(PanelConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_host_override() {
        let config = PanelConfig::default().with_host_override(Some("python3".into()));
        assert_eq!(config.host_command, "python3");

        let config = config.with_host_override(Some("  ".into()));
        assert_eq!(config.host_command, "python3");
    }
}
