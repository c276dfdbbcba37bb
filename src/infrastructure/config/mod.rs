// ============================================================
// SERVICE CONFIGURATION
// ============================================================
// Defaults, then `datafill.toml`, then `DATAFILL_*` environment variables

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "datafill.toml";
pub const ENV_PREFIX: &str = "DATAFILL_";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// CSV source holding the `fullname`, `address` and `random-text` columns
    #[validate(length(min = 1))]
    pub dataset_path: String,

    /// Single ASCII character
    pub delimiter: String,

    /// Sampling seed, ignored when `random_seed` is set
    pub seed: u64,

    pub random_seed: bool,

    /// Actix worker count; defaults to the number of CPUs
    #[validate(range(min = 1))]
    pub workers: Option<usize>,

    #[validate(range(min = 1))]
    pub max_body_bytes: usize,

    /// Deepest array/object nesting accepted in a request body
    #[validate(range(min = 1))]
    pub max_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            dataset_path: "data.csv".to_string(),
            delimiter: ",".to_string(),
            seed: 42,
            random_seed: false,
            workers: None,
            max_body_bytes: 2 * 1024 * 1024,
            max_depth: 512,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from the working directory and environment.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|err| AppError::ValidationError(err.to_string()))?;
        self.delimiter_byte()?;
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(AppError::ValidationError(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    pub fn rng_seed(&self) -> Option<u64> {
        (!self.random_seed).then_some(self.seed)
    }

    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
