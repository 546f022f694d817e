use anyhow::Result;
use dotenv::dotenv;

mod batch;
mod calc;
mod config;
mod data;
mod util;
use crate::config::RunConfig;

#[cfg(test)]
mod batch_test;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Input and output locations come from the environment, see config.rs for defaults
    let config = RunConfig::from_env()?;
    log::debug!("Run config: {:?}", config);

    let results = batch::run(&config).await?;

    match results.first() {
        Some(top) => log::info!(
            "Processed {} series; highest unbiased volatility: {} at {}%",
            results.len(),
            top.file_name,
            top.volatility_unbiased
        ),
        None => log::info!("No price files found in {}", config.input_dir.display()),
    }

    Ok(())
}
