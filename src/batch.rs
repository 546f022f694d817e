use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::calc::returns::{continuously_compounded_returns, PriceSeries};
use crate::calc::volatility::estimate_volatility;
use crate::config::RunConfig;
use crate::data::price_csv::{discover_price_files, load_price_series};
use crate::data::results_csv::{write_results, SeriesResult};
use crate::util::ordering::descending_nan_last;

/// Processes every price file in the input directory, ranks the results by
/// unbiased volatility and writes the summary CSV.
///
/// Any I/O failure aborts the run before anything is written.
pub async fn run(config: &RunConfig) -> Result<Vec<SeriesResult>> {
    log::info!(
        "Computing historical daily volatility for files in {}",
        config.input_dir.display()
    );

    let files = discover_price_files(&config.input_dir).await?;
    log::info!("Found {} price file(s)", files.len());

    let mut results = process_all(files, config.max_concurrent_files).await?;
    sort_by_volatility(&mut results);

    write_results(&config.output_path(), &results).await?;
    Ok(results)
}

/// Runs at most `max_concurrent` files at once and returns results in discovery order.
pub(crate) async fn process_all(
    files: Vec<PathBuf>,
    max_concurrent: usize,
) -> Result<Vec<SeriesResult>> {
    let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let result = process_file(&path).await?;
            Ok::<_, anyhow::Error>((index, result))
        });
    }

    let mut indexed = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        // Returning early drops the JoinSet, which aborts the remaining tasks
        let (index, result) = joined.context("Price file task panicked or was cancelled")??;
        indexed.push((index, result));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, result)| result).collect())
}

/// Loads one price file and summarizes it under its file name.
pub async fn process_file(path: &Path) -> Result<SeriesResult> {
    let series = load_price_series(path).await?;
    let identifier = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(summarize(identifier, &series))
}

/// Runs the return and volatility calculations for one series.
pub fn summarize(identifier: String, series: &PriceSeries) -> SeriesResult {
    if !series.has_sufficient_data() {
        log::warn!(
            "{} has {} price(s); the unbiased estimator needs at least 2",
            identifier,
            series.len()
        );
    }

    let (returns, stats) = continuously_compounded_returns(series);
    let volatility = estimate_volatility(series, &returns, &stats);

    if !volatility.volatility_unbiased.is_finite() {
        log::warn!(
            "{}: unbiased volatility is {}",
            identifier,
            volatility.volatility_unbiased
        );
    }
    log::debug!(
        "{}: {} prices, volatility {}% (unbiased), {}% (mle)",
        identifier,
        series.len(),
        volatility.volatility_unbiased,
        volatility.volatility_mle
    );

    SeriesResult::new(identifier, stats, volatility)
}

/// Stable sort by unbiased volatility, highest first, NaN last.
pub fn sort_by_volatility(results: &mut [SeriesResult]) {
    results.sort_by(|a, b| descending_nan_last(a.volatility_unbiased, b.volatility_unbiased));
}
