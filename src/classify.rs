use std::{collections::HashSet, fmt};

use serde::Serialize;

use crate::{
    config::ClassifierOptions,
    data::{Column, ColumnData},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Profiled by exact value frequency.
    Discrete,
    /// Profiled by binned histogram.
    Continuous,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Discrete => write!(f, "discrete"),
            FieldKind::Continuous => write!(f, "continuous"),
        }
    }
}

/// Decides the statistical treatment of a column from its values alone.
///
/// Text and all-missing columns are discrete. A numeric column is continuous
/// once its distinct present values reach [`ClassifierOptions::threshold`].
pub fn classify(column: &Column, options: &ClassifierOptions) -> FieldKind {
    let ColumnData::Numeric(values) = &column.data else {
        return FieldKind::Discrete;
    };
    let distinct = distinct_numeric_count(values);
    if distinct > 0 && distinct >= options.threshold(values.len()) {
        FieldKind::Continuous
    } else {
        FieldKind::Discrete
    }
}

pub fn distinct_numeric_count(values: &[Option<f64>]) -> usize {
    values
        .iter()
        .flatten()
        // fold -0.0 into 0.0 so both share a key
        .map(|v| (v + 0.0).to_bits())
        .collect::<HashSet<_>>()
        .len()
}
