use std::path::Path;

use log::{debug, info};

use crate::{
    data::{Column, Table},
    error::{ProfileError, Result},
    io_utils,
};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Overrides the extension-derived delimiter.
    pub delimiter: Option<u8>,
    /// `encoding_rs` label; UTF-8 when absent.
    pub encoding: Option<String>,
}

/// Reads a delimited file with a header row into a typed [`Table`].
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
    info!(
        "Loading '{}' with delimiter '{}'",
        path.display(),
        io_utils::printable_delimiter(delimiter)
    );

    let read_error = |line: u64, message: String| ProfileError::Read {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let header_record = reader
        .byte_headers()
        .map_err(|err| read_error(1, err.to_string()))?
        .clone();
    let headers = io_utils::decode_record(&header_record, encoding)
        .map_err(|message| read_error(1, message))?;
    if headers.is_empty() {
        return Err(read_error(1, "missing header row".to_string()));
    }

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.byte_records().enumerate() {
        let line = row_idx as u64 + 2;
        let record = record.map_err(|err| read_error(line, err.to_string()))?;
        let decoded =
            io_utils::decode_record(&record, encoding).map_err(|message| read_error(line, message))?;
        for (cells, value) in raw_columns.iter_mut().zip(decoded) {
            cells.push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, cells)| Column::from_raw(name.trim(), cells))
        .collect::<Vec<_>>();
    for column in &columns {
        debug!(
            "Column '{}' loaded as {}",
            column.name,
            if column.is_numeric() { "numeric" } else { "text" }
        );
    }
    let table = Table::new(columns)?;
    info!("Loaded {table} from {:?}", path);
    Ok(table)
}
