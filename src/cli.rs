use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};

use crate::{
    config::{BinRule, ProfileConfig},
    error::Result,
    loader::LoadOptions,
    writer::OutputFormat,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Profile every column of a CSV file into a frequency/histogram summary",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Input table (.csv, .tsv, .txt)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Report destination (defaults to profiled_<input stem> next to the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML file with profiling settings; explicit flags take precedence
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Bucket order: 'index' (natural) or 'value' (measure descending)
    #[arg(long = "sort-by")]
    pub sort_by: Option<String>,
    /// Report proportions (true) or raw counts (false)
    #[arg(long, action = ArgAction::Set, conflicts_with = "counts")]
    pub normalize: Option<bool>,
    /// Shorthand for --normalize false
    #[arg(long)]
    pub counts: bool,
    /// Histogram bin rule: 'sturges', 'sqrt', or a fixed bin count
    #[arg(long)]
    pub bins: Option<String>,
    /// Minimum distinct values before a numeric column is binned
    #[arg(long = "min-distinct")]
    pub min_distinct: Option<usize>,
    /// Share of the row count distinct values must reach before binning
    #[arg(long = "distinct-ratio")]
    pub distinct_ratio: Option<f64>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Report file format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: OutputFormat,
    /// Also print the report to stdout as a table
    #[arg(long)]
    pub table: bool,
}

impl ProfileArgs {
    /// Config file (if any) overlaid with explicit flags, validated.
    pub fn resolve_config(&self) -> Result<ProfileConfig> {
        let mut config = match &self.config {
            Some(path) => ProfileConfig::load(path)?,
            None => ProfileConfig::default(),
        };
        if let Some(sort_by) = &self.sort_by {
            config.sort_by = sort_by.parse()?;
        }
        if let Some(normalize) = self.normalize {
            config.normalize = normalize;
        }
        if self.counts {
            config.normalize = false;
        }
        if let Some(bins) = &self.bins {
            config.bins = bins.parse::<BinRule>()?;
        }
        if let Some(min_distinct) = self.min_distinct {
            config.classifier.min_distinct = min_distinct;
        }
        if let Some(ratio) = self.distinct_ratio {
            config.classifier.distinct_ratio = ratio;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
            encoding: self.input_encoding.clone(),
        }
    }
}

pub fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
