//! Mipha — render a template tree once per configured context.
//!
//! # Usage
//!
//! ```text
//! mipha --templates <DIR> --config <FILE> --output <DIR> [--helper <FILE>] [--dry-run]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use log::{debug, info};

use mipha_core::RunConfig;
use mipha_engine::{pipeline, RenderReport};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mipha",
    version,
    about = "Render a template tree once per context listed in a YAML configuration",
    long_about = None,
    arg_required_else_help = true,
)]
struct Cli {
    /// Folder containing template files.
    #[arg(long, value_name = "DIR", value_parser = NonEmptyStringValueParser::new())]
    templates: String,

    /// Path to the configuration file (YAML, with a `configurations` section).
    #[arg(long, value_name = "FILE", value_parser = NonEmptyStringValueParser::new())]
    config: String,

    /// Path to a helper template file with shared macros, e.g. helper.tpl.
    #[arg(long, value_name = "FILE")]
    helper: Option<String>,

    /// Folder to generate the output into. Its previous content is removed.
    #[arg(long, value_name = "DIR", value_parser = NonEmptyStringValueParser::new())]
    output: String,

    /// Evaluate every template without touching the output folder.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.templates, &self.config, &self.output)
            .with_dry_run(self.dry_run);
        if let Some(helper) = &self.helper {
            config = config.with_helper(helper);
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.run_config();
    log_parameters(&config);

    let report = pipeline::run(&config)
        .with_context(|| format!("rendering into {} failed", config.output.display()))?;
    log_report(&report);

    info!("Process done!");
    Ok(())
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env)
        .format_timestamp_micros()
        .format_target(false)
        .init();
}

fn display_or_none(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn log_parameters(config: &RunConfig) {
    info!(">> Parameters:");
    info!("templates: {}", config.templates.display());
    info!("helper   : {}", display_or_none(config.helper.as_ref()));
    info!("config   : {}", config.config.display());
    info!("output   : {}", config.output.display());
    if config.dry_run {
        info!("dry-run  : true");
    }
}

fn log_report(report: &RenderReport) {
    for write in &report.writes {
        debug!("  {}", write.path().display());
    }
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    info!(
        "{prefix}{} template(s) x {} context(s) -> {} file(s) under {}",
        report.templates,
        report.contexts,
        report.writes.len(),
        report.output.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn empty_helper_flag_means_no_helper() {
        let cli = Cli::try_parse_from([
            "mipha", "--templates", "t", "--config", "c.yaml", "--output", "out", "--helper", "",
        ])
        .unwrap();
        assert!(cli.run_config().helper.is_none());
    }

    #[test]
    fn empty_required_flag_is_rejected() {
        let err = Cli::try_parse_from(["mipha", "--templates", "", "--config", "c", "--output", "o"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_required_flag_is_rejected() {
        let err = Cli::try_parse_from(["mipha", "--templates", "t", "--config", "c"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flags_map_onto_run_config() {
        let cli = Cli::try_parse_from([
            "mipha",
            "--templates",
            "tpl",
            "--config",
            "cfg.yaml",
            "--output",
            "out",
            "--helper",
            "helper.tpl",
            "--dry-run",
        ])
        .unwrap();
        let config = cli.run_config();
        assert_eq!(config.templates, PathBuf::from("tpl"));
        assert_eq!(config.config, PathBuf::from("cfg.yaml"));
        assert_eq!(config.output, PathBuf::from("out"));
        assert_eq!(config.helper, Some(PathBuf::from("helper.tpl")));
        assert!(config.dry_run);
    }
}
