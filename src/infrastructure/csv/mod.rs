// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Loading the placeholder dataset from a CSV source

mod dataset_loader;

pub use dataset_loader::DatasetLoader;
