//! Per-column profiling of delimited tables.
//!
//! Each column is classified as discrete (value frequencies) or continuous
//! (equal-width histogram), measured, and assembled into a [`report::Report`]
//! that is written as a side-by-side CSV sheet or JSON.
//!
//! ```no_run
//! use std::path::Path;
//! use field_profiler::{ProfileConfig, RunOptions, run_field_profiling};
//!
//! let config = ProfileConfig::new("value", false)?;
//! let (report, path) = run_field_profiling(Path::new("box_office.csv"), &config, &RunOptions::default())?;
//! println!("{} field(s) written to {}", report.fields.len(), path.display());
//! # Ok::<(), field_profiler::ProfileError>(())
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod frequency;
pub mod histogram;
pub mod io_utils;
pub mod loader;
pub mod report;
pub mod table;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::cli::{Cli, ProfileArgs};

pub use crate::{
    config::{ProfileConfig, SortMode},
    error::ProfileError,
    report::{Report, RunOptions, profile_table, run_field_profiling},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("field_profiler", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    handle_profile(&cli.profile)
}

fn handle_profile(args: &ProfileArgs) -> Result<()> {
    let config = args
        .resolve_config()
        .context("Resolving profiling configuration")?;
    debug!("Profiling configuration: {config:?}");
    let options = RunOptions {
        load: args.load_options(),
        output: args.output.clone(),
        format: args.format,
    };
    let (report, destination) = run_field_profiling(&args.input, &config, &options)
        .with_context(|| format!("Profiling {:?}", args.input))?;
    if args.table {
        table::print_report(&report);
    }
    info!(
        "Report for {} field(s) written to {:?}",
        report.fields.len(),
        destination
    );
    Ok(())
}
