#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the box-office fixture and returns its path.
    pub fn box_office(&self, rows: usize) -> PathBuf {
        self.write("box_office.csv", &box_office_csv(rows))
    }
}

/// `Gross` (currency-formatted, varied) and `Release` (unique titles).
pub fn box_office_csv(rows: usize) -> String {
    let mut csv = String::from("Gross,Release\n");
    for i in 0..rows {
        let gross = 1_000.0 + ((i * 7_919) % 1_000) as f64 * 123.45;
        let _ = writeln!(csv, "\"${gross:.2}\",Release {i:03}");
    }
    csv
}
