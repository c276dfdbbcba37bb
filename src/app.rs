use tracing_subscriber::EnvFilter;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::start_server;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load()?;
    tracing::debug!(?config, "Configuration resolved");

    let generate_use_case = bootstrap::setup(&config)?;

    start_server(generate_use_case, &config)
        .map_err(|err| {
            AppError::IoError(format!(
                "Failed to bind {}:{}: {}",
                config.host, config.port, err
            ))
        })?
        .await
        .map_err(AppError::from)
}
