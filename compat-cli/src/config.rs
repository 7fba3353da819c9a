//! Configuration loading from `.compatrc.toml`.
//!
//! Configuration is optional; defaults apply when no config file exists.
//! Command-line flags override anything set here.
//!
//! # Example Configuration
//!
//! ```toml
//! [check]
//! obligation_policy = "when-implementable"
//! parallel = true
//!
//! [output]
//! format = "table"
//! behavior = "major"
//! color = true
//!
//! [exit]
//! behavior = "major-only"
//! ```

use serde::Deserialize;
use std::path::Path;

use compat_core::ObligationPolicy;

use crate::commands::check::{ExitCodeBehavior, OutputBehavior};
use crate::output::OutputFormat;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".compatrc.toml";

/// Root configuration structure loaded from `.compatrc.toml`.
///
/// All sections are optional and will use defaults if not specified.
#[derive(Debug, Deserialize, Default)]
pub struct CompatConfig {
    /// Comparison settings.
    #[serde(default)]
    pub check: CheckSettings,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    /// Process exit code policy.
    #[serde(default)]
    pub exit: ExitSettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct CheckSettings {
    /// Severity of newly added abstract or contract members.
    #[serde(default)]
    pub obligation_policy: Option<ObligationPolicy>,

    /// Extract old and new snapshots concurrently.
    #[serde(default)]
    pub parallel: Option<bool>,
}

/// Output formatting preferences.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `text`, `table`, `json`
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Which severities to list.
    #[serde(default)]
    pub behavior: Option<OutputBehavior>,

    /// Whether to use colored output.
    ///
    /// Defaults to `true` when stdout is a TTY.
    #[serde(default)]
    pub color: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExitSettings {
    #[serde(default)]
    pub behavior: Option<ExitCodeBehavior>,
}

impl CompatConfig {
    /// Load configuration from `.compatrc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn default_format(&self) -> Option<OutputFormat> {
        self.output.format
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let config = CompatConfig::load(dir.path());

        assert!(config.check.obligation_policy.is_none());
        assert!(config.default_format().is_none());
        assert!(config.exit.behavior.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[check]
obligation_policy = "when-implementable"
parallel = true

[output]
format = "json"
behavior = "major"
color = false

[exit]
behavior = "major-and-minor"
"#,
        )
        .unwrap();

        let config = CompatConfig::load(dir.path());
        assert_eq!(
            config.check.obligation_policy,
            Some(ObligationPolicy::WhenImplementable)
        );
        assert_eq!(config.check.parallel, Some(true));
        assert_eq!(config.default_format(), Some(OutputFormat::Json));
        assert_eq!(config.output.behavior, Some(OutputBehavior::Major));
        assert_eq!(config.use_color(), Some(false));
        assert_eq!(config.exit.behavior, Some(ExitCodeBehavior::MajorAndMinor));
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[exit]\nbehavior = \"major-only\"\n").unwrap();

        let config = CompatConfig::load(dir.path());
        assert_eq!(config.exit.behavior, Some(ExitCodeBehavior::MajorOnly));
        assert!(config.output.behavior.is_none());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[exit]\nbehavior = \"sometimes\"\n").unwrap();

        let config = CompatConfig::load(dir.path());
        assert!(config.exit.behavior.is_none());
    }
}
