use std::path::PathBuf;

use anyhow::Result;
use check_air_quality::{AppConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config file path as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_from_path(config_path)?;

    logging::init_tracing(&config.logging)?;
    tracing::info!(version = check_air_quality::VERSION, "starting check-air-quality");

    web::run(&config).await
}
