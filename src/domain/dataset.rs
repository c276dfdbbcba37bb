// ============================================================
// PLACEHOLDER DATASET
// ============================================================
// Value pools sampled by the substitution engine. Built once at
// startup and read-only afterwards.

use rand::Rng;
use serde::Serialize;

use super::error::{AppError, Result};
use super::placeholder::PlaceholderKind;

/// Candidate values for one placeholder kind. Never empty.
#[derive(Debug, Clone)]
pub struct ValuePool {
    values: Vec<String>,
}

impl ValuePool {
    pub fn new(kind: PlaceholderKind, values: Vec<String>) -> Result<Self> {
        if values.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Pool '{}' has no values",
                kind
            )));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|candidate| candidate == value)
    }

    /// Uniform draw over `[0, len)`, with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.values[rng.gen_range(0..self.values.len())]
    }
}

/// Pool sizes reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub fullname: usize,
    pub address: usize,
    #[serde(rename = "random-text")]
    pub random_text: usize,
}

#[derive(Debug, Clone)]
pub struct PlaceholderDataset {
    fullname: ValuePool,
    address: ValuePool,
    random_text: ValuePool,
}

impl PlaceholderDataset {
    pub fn new(
        fullname: Vec<String>,
        address: Vec<String>,
        random_text: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            fullname: ValuePool::new(PlaceholderKind::Fullname, fullname)?,
            address: ValuePool::new(PlaceholderKind::Address, address)?,
            random_text: ValuePool::new(PlaceholderKind::RandomText, random_text)?,
        })
    }

    pub fn pool(&self, kind: PlaceholderKind) -> &ValuePool {
        match kind {
            PlaceholderKind::Fullname => &self.fullname,
            PlaceholderKind::Address => &self.address,
            PlaceholderKind::RandomText => &self.random_text,
        }
    }

    /// Samples per pool. Pools loaded from one file share this length.
    pub fn row_count(&self) -> usize {
        PlaceholderKind::ALL
            .iter()
            .map(|kind| self.pool(*kind).len())
            .max()
            .unwrap_or(0)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            rows: self.row_count(),
            fullname: self.fullname.len(),
            address: self.address.len(),
            random_text: self.random_text.len(),
        }
    }
}
