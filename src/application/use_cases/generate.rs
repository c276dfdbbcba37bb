use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::Value;

use crate::application::use_cases::substitution::fill_placeholders;
use crate::domain::dataset::PlaceholderDataset;

/// Fills request documents from the shared dataset.
///
/// The dataset is read-only and shared across actix workers. The generator
/// is the only mutable state; it is locked per draw, so concurrent walks
/// interleave instead of queueing behind each other.
pub struct GenerateUseCase {
    dataset: Arc<PlaceholderDataset>,
    rng: Mutex<StdRng>,
}

impl GenerateUseCase {
    /// `Some(seed)` makes the draws reproducible for this process; `None`
    /// seeds from OS entropy.
    pub fn new(dataset: Arc<PlaceholderDataset>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            dataset,
            rng: Mutex::new(rng),
        }
    }

    pub fn dataset(&self) -> &Arc<PlaceholderDataset> {
        &self.dataset
    }

    pub fn execute(&self, document: &Value) -> Value {
        fill_placeholders(document, &self.dataset, &mut SharedRng(&self.rng))
    }
}

/// Borrowed handle that takes the generator lock for a single draw only.
struct SharedRng<'a>(&'a Mutex<StdRng>);

impl SharedRng<'_> {
    fn with<T>(&mut self, draw: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic elsewhere cannot leave the generator in an invalid state.
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut *rng)
    }
}

impl RngCore for SharedRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.with(|rng| rng.next_u32())
    }

    fn next_u64(&mut self) -> u64 {
        self.with(|rng| rng.next_u64())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.with(|rng| rng.fill_bytes(dest))
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.with(|rng| rng.try_fill_bytes(dest))
    }
}
