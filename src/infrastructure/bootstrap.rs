use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::application::GenerateUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::DatasetLoader;

/// Load the dataset and build the shared use case. Any failure here is
/// fatal: the service never runs with an incomplete dataset.
pub fn setup(config: &AppConfig) -> Result<Arc<GenerateUseCase>> {
    let dataset_path = Path::new(&config.dataset_path);
    let loader = DatasetLoader::new().with_delimiter(config.delimiter_byte()?);

    let dataset = loader.load_file(dataset_path).map_err(|err| {
        error!(
            error = %err,
            dataset_path = %dataset_path.display(),
            "Failed to load placeholder dataset"
        );
        err
    })?;

    let summary = dataset.summary();
    info!(
        fullname = summary.fullname,
        address = summary.address,
        random_text = summary.random_text,
        "Placeholder pools ready"
    );

    let seed = config.rng_seed();
    match seed {
        Some(seed) => info!(seed, "Sampling with fixed seed"),
        None => info!("Sampling with entropy seed"),
    }

    Ok(Arc::new(GenerateUseCase::new(Arc::new(dataset), seed)))
}
