//! Report serialization.
//!
//! The CSV layout mirrors a spreadsheet: one two-column block per field
//! (label, measure) placed side by side with a blank spacer column between
//! blocks. Output goes to a temp file in the destination directory and is
//! renamed into place only after every byte is written.

use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use clap::ValueEnum;
use csv::QuoteStyle;
use tempfile::NamedTempFile;

use crate::{
    classify::FieldKind,
    error::{ProfileError, Result},
    report::{FieldProfile, Measure, Report},
};

const SPACER_COLUMNS: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

pub fn write_report(report: &Report, path: &Path, format: OutputFormat) -> Result<()> {
    let output_error = |source: io::Error| ProfileError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(directory).map_err(output_error)?;
    {
        let mut sink = BufWriter::new(staged.as_file_mut());
        let written = match format {
            OutputFormat::Csv => write_sheet(report, &mut sink),
            OutputFormat::Json => serde_json::to_writer_pretty(&mut sink, report)
                .map_err(io::Error::from)
                .and_then(|_| writeln!(sink)),
        };
        written.and_then(|_| sink.flush()).map_err(output_error)?;
    }
    staged.persist(path).map_err(|err| output_error(err.error))?;
    Ok(())
}

fn write_sheet<W: Write>(report: &Report, sink: W) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(sink);
    for row in sheet_rows(report) {
        writer.write_record(&row)?;
    }
    writer.flush()
}

/// Cell grid for the CSV layout: a header row followed by bucket rows, padded
/// with empty cells where a field has fewer buckets than the longest one.
pub fn sheet_rows(report: &Report) -> Vec<Vec<String>> {
    let depth = report
        .fields
        .iter()
        .map(|f| f.buckets.len())
        .max()
        .unwrap_or(0);
    let mut rows = Vec::with_capacity(depth + 1);

    rows.push(join_blocks(report.fields.iter().map(|field| {
        [
            label_header(field),
            measure_header(field, report.normalized),
        ]
    })));
    for row in 0..depth {
        rows.push(join_blocks(report.fields.iter().map(|field| {
            match field.buckets.get(row) {
                Some(bucket) => [bucket.label.clone(), format_measure(&bucket.measure)],
                None => [String::new(), String::new()],
            }
        })));
    }
    rows
}

fn join_blocks(blocks: impl Iterator<Item = [String; 2]>) -> Vec<String> {
    let mut cells = Vec::new();
    for (idx, block) in blocks.enumerate() {
        if idx > 0 {
            cells.extend(std::iter::repeat_n(String::new(), SPACER_COLUMNS));
        }
        cells.extend(block);
    }
    cells
}

fn label_header(field: &FieldProfile) -> String {
    match field.kind {
        FieldKind::Discrete => field.name.clone(),
        FieldKind::Continuous => format!("bins|{}", field.name),
    }
}

fn measure_header(field: &FieldProfile, normalized: bool) -> String {
    let prefix = if normalized { "pct" } else { "count" };
    format!("{prefix}|{}", field.name)
}

pub fn format_measure(measure: &Measure) -> String {
    match measure {
        Measure::Count(count) => count.to_string(),
        Measure::Proportion(share) => format!("{share:.6}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SortMode, report::Bucket};

    fn sample_report(normalized: bool) -> Report {
        Report {
            sort_by: SortMode::Index,
            normalized,
            fields: vec![
                FieldProfile {
                    name: "Gross".to_string(),
                    kind: FieldKind::Continuous,
                    row_count: 3,
                    buckets: vec![Bucket::counted("[0, 5)", 1), Bucket::counted("[5, 10]", 2)],
                },
                FieldProfile {
                    name: "Genre".to_string(),
                    kind: FieldKind::Discrete,
                    row_count: 3,
                    buckets: vec![Bucket::counted("drama", 3)],
                },
            ],
        }
    }

    #[test]
    fn sheet_places_fields_side_by_side() {
        let rows = sheet_rows(&sample_report(false));
        assert_eq!(
            rows,
            vec![
                vec!["bins|Gross", "count|Gross", "", "Genre", "count|Genre"],
                vec!["[0, 5)", "1", "", "drama", "3"],
                vec!["[5, 10]", "2", "", "", ""],
            ]
        );
    }

    #[test]
    fn normalized_headers_use_pct_prefix() {
        let rows = sheet_rows(&sample_report(true));
        assert_eq!(rows[0][1], "pct|Gross");
        assert_eq!(format_measure(&Measure::Proportion(0.125)), "0.125000");
    }

    #[test]
    fn write_report_persists_csv() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("profiled_films.csv");
        write_report(&sample_report(false), &path, OutputFormat::Csv).expect("write");
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.starts_with("bins|Gross,count|Gross,,Genre,count|Genre\n"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_report_serializes_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("profiled_films.json");
        write_report(&sample_report(false), &path, OutputFormat::Json).expect("write");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).expect("json");
        assert_eq!(value["fields"][0]["kind"], "continuous");
        assert_eq!(value["fields"][0]["buckets"][1]["measure"]["value"], 2);
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("out.csv");
        let err = write_report(&sample_report(false), &path, OutputFormat::Csv).unwrap_err();
        assert!(matches!(err, ProfileError::OutputWrite { path: p, .. } if p == path));
    }
}
