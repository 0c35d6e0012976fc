//! Report model, per-field dispatch, and report assembly.
//!
//! [`profile_table`] runs Classify → Measure → Assemble over an in-memory
//! [`Table`]; [`run_field_profiling`] wraps it with loading and writing.
//! Each column is profiled independently from read-only data, and results land
//! in column order.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::{
    classify::{FieldKind, classify},
    config::{ProfileConfig, SortMode},
    data::{Column, ColumnData, Table},
    error::{ProfileError, Result},
    frequency, histogram,
    loader::{self, LoadOptions},
    writer::{self, OutputFormat},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Measure {
    Count(usize),
    Proportion(f64),
}

impl Measure {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Measure::Count(count) => count as f64,
            Measure::Proportion(share) => share,
        }
    }

    pub fn count(&self) -> Option<usize> {
        match *self {
            Measure::Count(count) => Some(count),
            Measure::Proportion(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// Distinct value, bin range, or the missing sentinel.
    pub label: String,
    pub measure: Measure,
}

impl Bucket {
    pub fn counted(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            measure: Measure::Count(count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProfile {
    pub name: String,
    pub kind: FieldKind,
    /// Rows in the field, missing cells included.
    pub row_count: usize,
    pub buckets: Vec<Bucket>,
}

impl FieldProfile {
    pub fn total_count(&self) -> Option<usize> {
        self.buckets.iter().map(|b| b.measure.count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sort_by: SortMode,
    pub normalized: bool,
    pub fields: Vec<FieldProfile>,
}

impl Report {
    /// Profile of the field called `name`.
    pub fn field(&self, name: &str) -> Option<&FieldProfile> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Classifies and measures one column. A constant numeric column falls back
/// to a frequency table.
pub fn profile_column(column: &Column, config: &ProfileConfig) -> Result<FieldProfile> {
    let kind = classify(column, &config.classifier);
    debug!("Column '{}' classified as {kind}", column.name);
    measure(column, kind, config)
}

fn measure(column: &Column, kind: FieldKind, config: &ProfileConfig) -> Result<FieldProfile> {
    match (&column.data, kind) {
        (ColumnData::Numeric(values), FieldKind::Continuous) => {
            match histogram::profile_continuous(&column.name, values, config.bins) {
                Err(ProfileError::DegenerateRange { field, value }) => {
                    debug!("Column '{field}' has no spread ({value}); using value counts");
                    frequency::profile_discrete(column)
                }
                other => other,
            }
        }
        _ => frequency::profile_discrete(column),
    }
}

/// Applies the sort mode and normalization to every profile.
///
/// Sorting happens on raw counts and is stable, so ties keep their natural
/// order. Normalization divides by each field's row count, which preserves the
/// order already applied.
pub fn assemble(profiles: Vec<FieldProfile>, sort_by: SortMode, normalize: bool) -> Report {
    let fields = profiles
        .into_iter()
        .map(|mut profile| {
            if sort_by == SortMode::Value {
                profile.buckets.sort_by(|a, b| {
                    b.measure
                        .as_f64()
                        .total_cmp(&a.measure.as_f64())
                });
            }
            if normalize {
                normalize_profile(&mut profile);
            }
            profile
        })
        .collect();
    Report {
        sort_by,
        normalized: normalize,
        fields,
    }
}

fn normalize_profile(profile: &mut FieldProfile) {
    if profile.row_count == 0 {
        return;
    }
    let total = profile.row_count as f64;
    for bucket in &mut profile.buckets {
        if let Measure::Count(count) = bucket.measure {
            bucket.measure = Measure::Proportion(count as f64 / total);
        }
    }
}

/// Profiles every column of `table` in column order.
pub fn profile_table(table: &Table, config: &ProfileConfig) -> Result<Report> {
    config.validate()?;
    let profiles = table
        .columns()
        .iter()
        .map(|column| profile_column(column, config))
        .collect::<Result<Vec<_>>>()?;
    Ok(assemble(profiles, config.sort_by, config.normalize))
}

/// `profiled_<stem>.<ext>` next to the input file.
pub fn derive_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    input.with_file_name(format!("profiled_{stem}.{}", format.extension()))
}

/// Everything about a run that is not profiling policy.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub load: LoadOptions,
    /// Defaults to [`derive_output_path`].
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Load → profile → write. Returns the report together with the path it was
/// written to.
pub fn run_field_profiling(
    input: &Path,
    config: &ProfileConfig,
    options: &RunOptions,
) -> Result<(Report, PathBuf)> {
    config.validate()?;
    let table = loader::load_table(input, &options.load)?;
    let report = profile_table(&table, config)?;
    info!(
        "Profiled {} field(s) (sort_by={}, normalize={})",
        report.fields.len(),
        report.sort_by,
        report.normalized
    );
    let destination = options
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(input, options.format));
    writer::write_report(&report, &destination, options.format)?;
    info!("file saved: {}", destination.display());
    Ok((report, destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MISSING_LABEL;

    fn counted(name: &str, kind: FieldKind, buckets: &[(&str, usize)]) -> FieldProfile {
        FieldProfile {
            name: name.to_string(),
            kind,
            row_count: buckets.iter().map(|(_, c)| c).sum(),
            buckets: buckets
                .iter()
                .map(|(label, count)| Bucket::counted(*label, *count))
                .collect(),
        }
    }

    #[test]
    fn value_sort_is_descending_and_stable() {
        let profile = counted(
            "genre",
            FieldKind::Discrete,
            &[("drama", 2), ("comedy", 5), ("horror", 2), ("noir", 5)],
        );
        let report = assemble(vec![profile], SortMode::Value, false);
        let labels = report.fields[0]
            .buckets
            .iter()
            .map(|b| b.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["comedy", "noir", "drama", "horror"]);
    }

    #[test]
    fn index_sort_keeps_natural_order() {
        let profile = counted("genre", FieldKind::Discrete, &[("b", 1), ("a", 3)]);
        let report = assemble(vec![profile.clone()], SortMode::Index, false);
        assert_eq!(report.fields[0], profile);
    }

    #[test]
    fn normalization_divides_by_row_count() {
        let profile = counted(
            "genre",
            FieldKind::Discrete,
            &[("a", 1), ("b", 3), (MISSING_LABEL, 4)],
        );
        let report = assemble(vec![profile], SortMode::Value, true);
        let shares = report.fields[0]
            .buckets
            .iter()
            .map(|b| b.measure)
            .collect::<Vec<_>>();
        assert_eq!(
            shares,
            vec![
                Measure::Proportion(0.5),
                Measure::Proportion(0.375),
                Measure::Proportion(0.125)
            ]
        );
        assert_eq!(report.fields[0].total_count(), None);
    }

    #[test]
    fn constant_numeric_column_falls_back_to_counts() {
        let column = Column::numeric("flat", vec![Some(5.0); 40]);
        let config = ProfileConfig::default();
        let err = histogram::profile_continuous("flat", &[Some(5.0); 40], config.bins).unwrap_err();
        assert!(matches!(err, ProfileError::DegenerateRange { value, .. } if value == 5.0));

        let profile = measure(&column, FieldKind::Continuous, &config).expect("profile");
        assert_eq!(profile.kind, FieldKind::Discrete);
        assert_eq!(profile.buckets, vec![Bucket::counted("5", 40)]);
        assert_eq!(profile_column(&column, &config).expect("profile"), profile);
    }

    #[test]
    fn empty_table_column_aborts_with_field_name() {
        let table = Table::new(vec![
            Column::numeric("Gross", Vec::new()),
            Column::text("Release", Vec::<Option<String>>::new()),
        ])
        .expect("table");
        let err = profile_table(&table, &ProfileConfig::default()).unwrap_err();
        assert_eq!(err.field(), Some("Gross"));
    }

    #[test]
    fn derived_path_prefixes_stem() {
        let path = derive_output_path(Path::new("/data/box_office.csv"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("/data/profiled_box_office.csv"));
        let path = derive_output_path(Path::new("films.tsv"), OutputFormat::Json);
        assert_eq!(path, PathBuf::from("profiled_films.json"));
    }
}
