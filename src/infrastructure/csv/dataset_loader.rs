// ============================================================
// DATASET LOADER
// ============================================================
// Parse the CSV source into the three placeholder pools

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::domain::dataset::PlaceholderDataset;
use crate::domain::error::{AppError, Result};
use crate::domain::placeholder::PlaceholderKind;

/// Loads a [`PlaceholderDataset`] from a header-plus-rows CSV source.
pub struct DatasetLoader {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load the dataset from a CSV file on disk
    pub fn load_file(&self, path: &Path) -> Result<PlaceholderDataset> {
        let file = File::open(path).map_err(|e| {
            AppError::IoError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let dataset = self.load_reader(file)?;
        info!(
            path = %path.display(),
            rows = dataset.row_count(),
            "Placeholder dataset loaded"
        );
        Ok(dataset)
    }

    /// Load the dataset from in-memory CSV content
    pub fn load_content(&self, content: &str) -> Result<PlaceholderDataset> {
        self.load_reader(content.as_bytes())
    }

    /// Load the dataset from any reader. Fails fast: a single bad row
    /// rejects the whole source.
    pub fn load_reader<R: Read>(&self, source: R) -> Result<PlaceholderDataset> {
        // Trimming is done by hand: only leading whitespace is dropped.
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .flexible(false)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| AppError::IoError(format!("Failed to read CSV headers: {}", e)))?
            .clone();
        let columns = locate_columns(&headers)?;
        debug!(?columns, "Resolved placeholder columns");

        let mut pools: [Vec<String>; 3] = Default::default();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::IoError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            for (pool, column) in pools.iter_mut().zip(columns) {
                let value = record.get(column).unwrap_or("");
                pool.push(value.trim_start().to_string());
            }
        }

        let [fullname, address, random_text] = pools;
        PlaceholderDataset::new(fullname, address, random_text)
    }
}

/// Column index of every placeholder kind, in `PlaceholderKind::ALL` order.
/// A repeated column name binds its last occurrence.
fn locate_columns(headers: &StringRecord) -> Result<[usize; 3]> {
    let mut columns = [0usize; 3];
    let mut missing = Vec::new();

    for (slot, kind) in columns.iter_mut().zip(PlaceholderKind::ALL) {
        let last_match = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.trim_start() == kind.as_str())
            .map(|(index, _)| index)
            .last();
        match last_match {
            Some(index) => *slot = index,
            None => missing.push(kind.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(AppError::SchemaError(format!(
            "CSV must have columns 'fullname', 'address' and 'random-text'; missing: {}",
            missing.join(", ")
        )));
    }

    Ok(columns)
}
