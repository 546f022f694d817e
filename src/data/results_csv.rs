use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::calc::returns::ReturnStatistics;
use crate::calc::volatility::VolatilityResult;
use crate::util::formatting::serialize_decimal;

/// Output columns, in order.
pub const HEADER: [&str; 6] = [
    "File Name",
    "Average DPSR",
    "Sample Daily Variance (unbiased estimator) [in %]",
    "Sample Daily Variance (maximum likelihood estimate) [in %]",
    "Historical Daily Volatility (unbiased estimator) [in %]",
    "Historical Daily Volatility (maximum likelihood estimate) [in %]",
];

/// One summary row per input file. Field order matches `HEADER`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesResult {
    pub file_name: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub mean_return: f64,
    #[serde(serialize_with = "serialize_decimal")]
    pub sample_variance_unbiased: f64,
    #[serde(serialize_with = "serialize_decimal")]
    pub sample_variance_mle: f64,
    #[serde(serialize_with = "serialize_decimal")]
    pub volatility_unbiased: f64,
    #[serde(serialize_with = "serialize_decimal")]
    pub volatility_mle: f64,
}

impl SeriesResult {
    pub fn new(file_name: String, stats: ReturnStatistics, volatility: VolatilityResult) -> Self {
        Self {
            file_name,
            mean_return: stats.mean_return,
            sample_variance_unbiased: volatility.sample_variance_unbiased,
            sample_variance_mle: volatility.sample_variance_mle,
            volatility_unbiased: volatility.volatility_unbiased,
            volatility_mle: volatility.volatility_mle,
        }
    }
}

/// Renders the header and one row per result into CSV bytes.
pub fn render_results(results: &[SeriesResult]) -> Result<Vec<u8>> {
    // Header is written by hand so an empty run still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for result in results {
        writer
            .serialize(result)
            .with_context(|| format!("Failed to serialize result for {}", result.file_name))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))
}

/// Writes the summary CSV to `path`, creating its directory when missing.
///
/// The content goes to a temporary sibling first and is renamed into place, so
/// `path` never holds a half-written file.
pub async fn write_results(path: &Path, results: &[SeriesResult]) -> Result<()> {
    let bytes = render_results(results)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let written = match tokio::fs::write(tmp_path, &bytes).await {
        Ok(()) => tokio::fs::rename(tmp_path, path)
            .await
            .with_context(|| format!("Failed to move results into {}", path.display())),
        Err(e) => Err(e).with_context(|| format!("Failed to write {}", tmp_path.display())),
    };
    if written.is_err() {
        // A failed write may leave a partial temporary file
        let _ = tokio::fs::remove_file(tmp_path).await;
    }
    written?;

    log::info!("Results successfully written to {}", path.display());
    Ok(())
}
