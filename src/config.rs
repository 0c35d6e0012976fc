//! Profiling configuration.
//!
//! [`ProfileConfig`] is passed explicitly into [`crate::report::profile_table`]
//! and [`crate::report::run_field_profiling`]. Defaults are `sort_by = index`,
//! `normalize = true`, Sturges binning, and a classifier that requires at least
//! 10 distinct values (and 5% of the row count) before a numeric column is
//! binned.
//!
//! A YAML file can supply the same settings:
//!
//! ```yaml
//! sort_by: value
//! normalize: false
//! min_distinct: 12
//! distinct_ratio: 0.1
//! bins: sqrt        # sturges | sqrt | <integer>
//! ```

use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

pub const DEFAULT_MIN_DISTINCT: usize = 10;
pub const DEFAULT_DISTINCT_RATIO: f64 = 0.05;
/// Upper bound accepted for a fixed bin count.
pub const MAX_FIXED_BINS: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Natural order: discovery order for categories, ascending for bins.
    #[default]
    Index,
    /// Measure descending, ties kept in natural order.
    Value,
}

impl FromStr for SortMode {
    type Err = ProfileError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(SortMode::Index),
            "value" => Ok(SortMode::Value),
            _ => Err(ProfileError::UnsupportedSortMode(value.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Index => write!(f, "index"),
            SortMode::Value => write!(f, "value"),
        }
    }
}

/// Bin-count heuristic for continuous fields; `n` is the non-missing count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinRule {
    /// `ceil(log2 n) + 1`
    #[default]
    Sturges,
    /// `ceil(sqrt n)`
    Sqrt,
    Fixed(usize),
}

impl BinRule {
    pub fn bin_count(&self, n: usize) -> usize {
        match *self {
            _ if n <= 1 => 1,
            BinRule::Sturges => (n as f64).log2().ceil() as usize + 1,
            BinRule::Sqrt => (n as f64).sqrt().ceil() as usize,
            BinRule::Fixed(k) => k,
        }
    }
}

impl FromStr for BinRule {
    type Err = ProfileError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "sturges" => Ok(BinRule::Sturges),
            "sqrt" | "square-root" => Ok(BinRule::Sqrt),
            other => other.parse::<usize>().map(BinRule::Fixed).map_err(|_| {
                ProfileError::InvalidConfiguration(format!(
                    "Unknown bin rule '{trimmed}' (expected 'sturges', 'sqrt' or a bin count)"
                ))
            }),
        }
    }
}

impl fmt::Display for BinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinRule::Sturges => write!(f, "sturges"),
            BinRule::Sqrt => write!(f, "sqrt"),
            BinRule::Fixed(k) => write!(f, "{k}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifierOptions {
    /// Fewer distinct values than this always yields a frequency table.
    pub min_distinct: usize,
    /// Distinct values must also reach this share of the row count.
    pub distinct_ratio: f64,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            min_distinct: DEFAULT_MIN_DISTINCT,
            distinct_ratio: DEFAULT_DISTINCT_RATIO,
        }
    }
}

impl ClassifierOptions {
    /// Distinct-value count at which a numeric column of `row_count` rows is binned.
    pub fn threshold(&self, row_count: usize) -> usize {
        let relative = (self.distinct_ratio * row_count as f64).ceil() as usize;
        self.min_distinct.max(relative)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileConfig {
    pub sort_by: SortMode,
    pub normalize: bool,
    pub classifier: ClassifierOptions,
    pub bins: BinRule,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sort_by: SortMode::Index,
            normalize: true,
            classifier: ClassifierOptions::default(),
            bins: BinRule::Sturges,
        }
    }
}

impl ProfileConfig {
    /// Builds a config from the caller-facing `sort_by` string.
    pub fn new(sort_by: &str, normalize: bool) -> Result<Self> {
        let config = Self {
            sort_by: sort_by.parse()?,
            normalize,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.classifier.min_distinct < 2 {
            return Err(ProfileError::InvalidConfiguration(format!(
                "min_distinct must be at least 2 (got {})",
                self.classifier.min_distinct
            )));
        }
        let ratio = self.classifier.distinct_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ProfileError::InvalidConfiguration(format!(
                "distinct_ratio must lie in [0, 1] (got {ratio})"
            )));
        }
        match self.bins {
            BinRule::Fixed(0) => {
                return Err(ProfileError::InvalidConfiguration(
                    "bin count must be greater than zero".to_string(),
                ));
            }
            BinRule::Fixed(k) if k > MAX_FIXED_BINS => {
                return Err(ProfileError::InvalidConfiguration(format!(
                    "bin count must not exceed {MAX_FIXED_BINS} (got {k})"
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| ProfileError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let raw: ConfigFile =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|err| ProfileError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        let config = raw.into_config(Self::default())?;
        config.validate()?;
        Ok(config)
    }
}

/// On-disk shape of a configuration file; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    sort_by: Option<String>,
    normalize: Option<bool>,
    min_distinct: Option<usize>,
    distinct_ratio: Option<f64>,
    bins: Option<BinSetting>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BinSetting {
    Count(usize),
    Rule(String),
}

impl ConfigFile {
    fn into_config(self, mut base: ProfileConfig) -> Result<ProfileConfig> {
        if let Some(sort_by) = self.sort_by {
            base.sort_by = sort_by.parse()?;
        }
        if let Some(normalize) = self.normalize {
            base.normalize = normalize;
        }
        if let Some(min_distinct) = self.min_distinct {
            base.classifier.min_distinct = min_distinct;
        }
        if let Some(ratio) = self.distinct_ratio {
            base.classifier.distinct_ratio = ratio;
        }
        match self.bins {
            Some(BinSetting::Count(k)) => base.bins = BinRule::Fixed(k),
            Some(BinSetting::Rule(rule)) => base.bins = rule.parse()?,
            None => {}
        }
        Ok(base)
    }
}
