//! compat CLI - API surface compatibility checks
//!
//! Compares two versions of a module's public surface and reports every
//! change as Major (breaking) or Minor (additive).

use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod loader;
mod output;

use commands::check::CheckArgs;
use commands::surface::SurfaceArgs;
use config::CompatConfig;
use output::{OutputConfig, OutputFormat};

/// Detect breaking changes between two versions of a module.
#[derive(Parser)]
#[command(name = "compat")]
#[command(author, version)]
#[command(about = "Detect breaking changes between two versions of a module's public API")]
#[command(propagate_version = true)]
#[command(next_help_heading = "Options")]
#[command(after_help = "Examples:
  compat check old.json new.json
  compat check old.json new.json --exit-code-behavior major-only
  compat check lib.json lib.json --test-namespace Tests.Inherit
  compat surface new.json --format table")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Compact output (single-line JSON, borderless tables)
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two module versions and report the diff level
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// List the observable surface of one module
    #[command(visible_alias = "s")]
    Surface(SurfaceArgs),
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .compatrc.toml
    let config = CompatConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Text
    let format = cli.format.or(config.default_format()).unwrap_or_default();

    // Apply color override from config if set
    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }
    let mut output = OutputConfig::auto_detect_with_color_override(format, config.use_color());
    if cli.compact {
        output = output.compact();
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(ExitCode::SUCCESS);
        }
    };

    match command {
        Commands::Check(args) => commands::check::run(args, &config, &output),
        Commands::Surface(args) => {
            commands::surface::run(args, &output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "compat",
            "check",
            "old.json",
            "file|new.json",
            "--exit-code-behavior",
            "major-and-minor",
            "--output-behavior",
            "major",
            "--obligation-policy",
            "when-implementable",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.old, "old.json");
                assert_eq!(args.new, "file|new.json");
                assert_eq!(
                    args.exit_code_behavior,
                    Some(commands::check::ExitCodeBehavior::MajorAndMinor)
                );
                assert_eq!(
                    args.output_behavior,
                    Some(commands::check::OutputBehavior::Major)
                );
                assert_eq!(
                    args.obligation_policy,
                    Some(commands::check::ObligationArg::WhenImplementable)
                );
                assert!(args.test_namespace.is_none());
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_rejects_unknown_behavior() {
        assert!(Cli::try_parse_from([
            "compat",
            "check",
            "a.json",
            "b.json",
            "--exit-code-behavior",
            "sometimes",
        ])
        .is_err());
    }
}
