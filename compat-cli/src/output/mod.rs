//! Output formatting module for the compat CLI
//!
//! Provides unified output formatting across commands with support for
//! three formats: text (line-oriented, the default), table (human-readable
//! grid) and json (machine-readable).
//!
//! Automatically detects TTY context to adjust colors.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

mod json;
mod table;

pub use self::json::JsonOutput;
pub use self::table::TableOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain line-per-change text (default)
    #[default]
    Text,
    /// Human-readable table format
    Table,
    /// JSON format for machine consumption
    Json,
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// The output format to use
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
    /// Compact mode (less whitespace)
    pub compact: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
            compact: false,
        }
    }

    /// Create an OutputConfig with TTY detection and optional color override.
    ///
    /// When stdout is not a TTY colors are disabled unless `color_override`
    /// is `Some(true)`.
    pub fn auto_detect_with_color_override(
        format: OutputFormat,
        color_override: Option<bool>,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let use_color = color_override.unwrap_or(is_tty);
        Self {
            no_color: !use_color,
            ..Self::new(format)
        }
    }

    pub fn use_colors(&self) -> bool {
        !self.no_color
    }

    /// Builder: enable compact mode
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::auto_detect_with_color_override(OutputFormat::Text, None)
    }
}

/// Trait for types that can be formatted as output
///
/// Types implementing this trait can be rendered in any supported format.
pub trait Outputter: Serialize + Sized {
    /// Render as plain text
    fn to_text(&self, config: &OutputConfig) -> String;

    /// Render as table format
    fn to_table(&self, config: &OutputConfig) -> String;

    /// Render as JSON format
    fn to_json(&self, config: &OutputConfig) -> String {
        JsonOutput::format(self, config)
    }

    /// Render using the format specified in config
    fn render(&self, config: &OutputConfig) -> String {
        match config.format {
            OutputFormat::Text => self.to_text(config),
            OutputFormat::Table => self.to_table(config),
            OutputFormat::Json => self.to_json(config),
        }
    }

    /// Render and print to stdout
    fn output(&self, config: &OutputConfig) {
        println!("{}", self.render(config));
    }
}

/// Paint `text` with `paint` only when colors are enabled.
pub fn colorize<F>(text: &str, config: &OutputConfig, paint: F) -> String
where
    F: FnOnce(&str) -> colored::ColoredString,
{
    if config.use_colors() {
        paint(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Colorize;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_colorize_disabled() {
        let config = OutputConfig {
            no_color: true,
            ..OutputConfig::new(OutputFormat::Text)
        };
        assert_eq!(colorize("Major", &config, |s| s.red()), "Major");
    }

    #[test]
    fn test_compact_builder() {
        let config = OutputConfig::new(OutputFormat::Json).compact();
        assert!(config.compact);
        assert!(config.use_colors());
    }
}
