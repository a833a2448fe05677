//! oxnorm - renormalize an oxide composition table after sodium correction
//!
//! Command-line interface for fixed-sodium renormalization.

use clap::Parser;
use log::info;
use oxide_normalize::config::NormalizeConfig;
use oxide_normalize::error::Result;
use oxide_normalize::normalize::{MissingPolicy, Rounding};
use oxide_normalize::pipeline::{NormalizationSummary, Normalizer};
use std::path::{Path, PathBuf};

/// Normalize an AGLAE composition table after sodium correction
#[derive(Parser)]
#[command(name = "oxnorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Composition table to normalize (.xlsx, .xls, .ods, .csv or .tsv)
    input: PathBuf,

    /// Output table (.xlsx, .csv or .tsv); overwritten if it exists
    #[arg(short, long, default_value = "normalized.xlsx")]
    output: PathBuf,

    /// YAML configuration; the flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total each row is scaled to, fixed column included
    #[arg(long)]
    total_scale: Option<f64>,

    /// Column held fixed and dropped from the output
    #[arg(long)]
    fixed_column: Option<String>,

    /// Number of leading columns forming the row key
    #[arg(long)]
    key_columns: Option<usize>,

    /// Worksheet to read (default: first worksheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Rescale rows around missing pool values instead of leaving them missing
    #[arg(long)]
    skip_missing: bool,

    /// Round ties away from zero instead of to even
    #[arg(long)]
    round_half_up: bool,

    /// Write a run summary (.json, .yaml or .yml)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<NormalizeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                NormalizeConfig::from_yaml_file(path)?
            }
            None => NormalizeConfig::default(),
        };

        if let Some(total_scale) = self.total_scale {
            config.total_scale = total_scale;
        }
        if let Some(fixed_column) = &self.fixed_column {
            config.fixed_column = fixed_column.clone();
        }
        if let Some(key_columns) = self.key_columns {
            config.key_columns = key_columns;
        }
        if let Some(sheet) = &self.sheet {
            config.sheet = Some(sheet.clone());
        }
        if self.skip_missing {
            config.missing = MissingPolicy::Skip;
        }
        if self.round_half_up {
            config.rounding = Rounding::HalfAwayFromZero;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let summary = Normalizer::from_config(&config).run(&cli.input, &cli.output)?;

    for line in summary.to_string().lines() {
        info!("{}", line);
    }

    if let Some(report) = &cli.report {
        write_report(&summary, report)?;
    }

    Ok(())
}

fn write_report(summary: &NormalizationSummary, path: &Path) -> Result<()> {
    info!("Writing run summary to {}", path.display());
    summary.write_to(path)
}
