use std::{fmt, sync::OnceLock};

use regex::Regex;

use crate::error::{ProfileError, Result};

/// Bucket label used for missing cells.
pub const MISSING_LABEL: &str = "<missing>";

/// Column storage, tagged once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Display label for the cell at `row`; missing cells map to [`MISSING_LABEL`].
    pub fn label_at(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(numeric_label)
                .unwrap_or_else(|| MISSING_LABEL.to_string()),
            ColumnData::Text(values) => values
                .get(row)
                .and_then(|v| v.clone())
                .unwrap_or_else(|| MISSING_LABEL.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text<N, S>(name: N, values: Vec<Option<S>>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            data: ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    /// Types a column of raw cells. The column is numeric when it has at least
    /// one present cell and every present cell parses as a number.
    pub fn from_raw(name: impl Into<String>, raw: Vec<String>) -> Self {
        let cells = raw
            .into_iter()
            .map(|value| {
                let trimmed = value.trim();
                if is_missing(trimmed) {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();
        let numbers = cells
            .iter()
            .map(|cell| match cell {
                Some(text) => parse_number(text).map(Some),
                None => Some(None),
            })
            .collect::<Option<Vec<_>>>();
        match numbers {
            Some(values) if values.iter().any(Option::is_some) => Self::numeric(name, values),
            _ => Self::text(name, cells),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }
}

/// Named, equal-length columns in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(column) = columns.iter().find(|c| c.len() != row_count) {
            return Err(ProfileError::ShapeMismatch {
                field: column.name.clone(),
                expected: row_count,
                actual: column.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Data rows shared by every column.
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} column(s) x {} row(s)",
            self.columns.len(),
            self.row_count
        )
    }
}

pub fn is_missing(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    matches!(
        lowered.as_str(),
        "" | "na" | "n/a" | "n.a." | "nan" | "null" | "none" | "missing"
    ) || lowered.chars().all(|c| c == '-')
}

fn currency_tokens() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| {
        Regex::new(r"[$€£¥₣₹,]|USD|GBP|EUR").expect("currency token pattern is valid")
    })
}

/// Parses a finite number, accepting currency-decorated values such as `$1,250.00`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let parsed = trimmed.parse::<f64>().ok().or_else(|| {
        let cleaned = currency_tokens().replace_all(trimmed, "");
        if cleaned.len() == trimmed.len() {
            return None;
        }
        cleaned.trim().parse::<f64>().ok()
    })?;
    parsed.is_finite().then_some(parsed)
}

/// Renders a number so that distinct values never share a label.
pub fn numeric_label(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
