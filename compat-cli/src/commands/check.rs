//! Check command - compare two module versions
//!
//! Loads old and new module metadata, runs the compatibility check and
//! prints the Major and Minor changes followed by the overall diff level.

use std::process::ExitCode;

use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use compat_core::{check, CheckOptions, DiffEntry, DiffResult, DiffSummary, Level, ObligationPolicy};

use crate::config::CompatConfig;
use crate::loader::load_module;
use crate::output::{colorize, OutputConfig, Outputter, TableOutput};

/// How the diff level maps to the process exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitCodeBehavior {
    /// Always exit 0
    #[default]
    None,
    /// Major changes exit 2
    MajorOnly,
    /// Major changes exit 2, minor changes exit 1
    MajorAndMinor,
}

impl ExitCodeBehavior {
    pub fn exit_code(&self, level: Level) -> u8 {
        match (self, level) {
            (ExitCodeBehavior::None, _) => 0,
            (_, Level::Major) => 2,
            (ExitCodeBehavior::MajorAndMinor, Level::Minor) => 1,
            _ => 0,
        }
    }
}

/// Which severities to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputBehavior {
    /// Only the diff level
    None,
    /// Major changes only
    Major,
    /// Minor changes only
    Minor,
    /// Both major and minor changes
    #[default]
    MajorAndMinor,
}

impl OutputBehavior {
    pub fn shows_major(&self) -> bool {
        matches!(self, OutputBehavior::Major | OutputBehavior::MajorAndMinor)
    }

    pub fn shows_minor(&self) -> bool {
        matches!(self, OutputBehavior::Minor | OutputBehavior::MajorAndMinor)
    }
}

/// Obligation policy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObligationArg {
    /// Adding an abstract or contract member is always Major
    Always,
    /// Major only when external code could already implement the type
    WhenImplementable,
}

impl From<ObligationArg> for ObligationPolicy {
    fn from(arg: ObligationArg) -> Self {
        match arg {
            ObligationArg::Always => ObligationPolicy::Always,
            ObligationArg::WhenImplementable => ObligationPolicy::WhenImplementable,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Old module: "[file|]<path>" or "nuget|<package>[|<version>]"
    pub old: String,

    /// New module: "[file|]<path>" or "nuget|<package>[|<version>]"
    pub new: String,

    /// Exit code policy (overrides config)
    #[arg(long, value_enum)]
    pub exit_code_behavior: Option<ExitCodeBehavior>,

    /// Which changes to list (overrides config)
    #[arg(long, value_enum)]
    pub output_behavior: Option<OutputBehavior>,

    /// Compare <NS>.A.* in OLD against <NS>.B.* in NEW
    #[arg(long, value_name = "NS")]
    pub test_namespace: Option<String>,

    /// Severity of newly added abstract or contract members (overrides config)
    #[arg(long, value_enum)]
    pub obligation_policy: Option<ObligationArg>,
}

/// Check result prepared for display.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub old: String,
    pub new: String,
    pub level: Level,
    pub major: Vec<DiffEntry>,
    pub minor: Vec<DiffEntry>,
    pub summary: DiffSummary,
}

impl CheckReport {
    pub fn new(old: &str, new: &str, result: &DiffResult, behavior: OutputBehavior) -> Self {
        let pick = |entries: &[DiffEntry], shown: bool| {
            if shown {
                entries.to_vec()
            } else {
                Vec::new()
            }
        };

        Self {
            old: old.to_string(),
            new: new.to_string(),
            level: result.level(),
            major: pick(result.major(), behavior.shows_major()),
            minor: pick(result.minor(), behavior.shows_minor()),
            summary: result.summary(),
        }
    }

    fn level_line(&self, config: &OutputConfig) -> String {
        let level = self.level.as_str();
        let painted = match self.level {
            Level::Major => colorize(level, config, |s| s.red().bold()),
            Level::Minor => colorize(level, config, |s| s.yellow().bold()),
            Level::None => colorize(level, config, |s| s.green()),
        };
        format!("Diff level: {}", painted)
    }
}

impl Outputter for CheckReport {
    fn to_text(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        if !self.major.is_empty() {
            output.push_str(&format!("{}\n", colorize("Major changes:", config, |s| s.red().bold())));
            for entry in &self.major {
                output.push_str(&format!("{}\n", entry));
            }
            output.push('\n');
        }

        if !self.minor.is_empty() {
            output.push_str(&format!("{}\n", colorize("Minor changes:", config, |s| s.yellow().bold())));
            for entry in &self.minor {
                output.push_str(&format!("{}\n", entry));
            }
            output.push('\n');
        }

        output.push_str(&self.level_line(config));
        output
    }

    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .major
            .iter()
            .chain(&self.minor)
            .map(|entry| {
                vec![
                    entry.severity.to_string(),
                    entry.subject.to_string(),
                    entry.cause.description().to_string(),
                    entry.details.clone().unwrap_or_default(),
                ]
            })
            .collect();

        format!(
            "{}\n{}\n{}",
            TableOutput::format_rows(&["Severity", "Subject", "Change", "Details"], &rows, config),
            self.summary.text(),
            self.level_line(config)
        )
    }
}

/// Run the check command
pub fn run(args: CheckArgs, config: &CompatConfig, output: &OutputConfig) -> anyhow::Result<ExitCode> {
    let old = load_module(&args.old)?;
    let new = load_module(&args.new)?;

    let options = CheckOptions {
        test_namespace: args.test_namespace,
        obligation_policy: args
            .obligation_policy
            .map(ObligationPolicy::from)
            .or(config.check.obligation_policy)
            .unwrap_or_default(),
        parallel: config.check.parallel.unwrap_or(true),
    };

    let result = check(&old, &new, &options)?;

    let behavior = args
        .output_behavior
        .or(config.output.behavior)
        .unwrap_or_default();
    CheckReport::new(&old.name, &new.name, &result, behavior).output(output);

    let exit = args.exit_code_behavior.or(config.exit.behavior).unwrap_or_default();
    Ok(ExitCode::from(exit.exit_code(result.level())))
}
