use super::returns::{PriceSeries, ReturnSeries, ReturnStatistics};

/// Raw fractional figures are multiplied by this for presentation.
pub const PERCENT: f64 = 100.0;

/// Sample daily variance and historical daily volatility, all in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityResult {
    pub sample_variance_unbiased: f64,
    pub sample_variance_mle: f64,
    pub volatility_unbiased: f64,
    pub volatility_mle: f64,
}

/// Derives both variance estimators and their volatilities from a return series.
///
/// - unbiased: `1/(n - 1) · Σ (R[i] - mean)²`
/// - maximum likelihood: `1/n · Σ R[i]²`
///
/// Square roots are taken on the raw variances; only the returned numbers are
/// scaled to percent. Denominators are floating point, so `n = 1` yields a NaN
/// unbiased variance instead of a panic, and the record keeps flowing.
pub fn estimate_volatility(
    series: &PriceSeries,
    returns: &ReturnSeries,
    stats: &ReturnStatistics,
) -> VolatilityResult {
    let n = series.len() as f64;

    // Accumulated from the latest day back to day 0.
    let sum_squared_deviation = returns
        .iter()
        .rev()
        .fold(0.0, |acc, r| acc + (r - stats.mean_return).powi(2));
    let sum_squared_raw = returns.iter().rev().fold(0.0, |acc, r| acc + r.powi(2));

    // Weighted by the reciprocal of the day count, which rounds differently from dividing
    let variance_unbiased = (1.0 / (n - 1.0)) * sum_squared_deviation;
    let variance_mle = (1.0 / n) * sum_squared_raw;
    let volatility_unbiased = variance_unbiased.sqrt();
    let volatility_mle = variance_mle.sqrt();

    log::debug!(
        "sample daily variance (unbiased): {} ({} in %)",
        variance_unbiased,
        variance_unbiased * PERCENT
    );
    log::debug!(
        "sample daily variance (mle): {} ({} in %)",
        variance_mle,
        variance_mle * PERCENT
    );
    log::debug!(
        "historical daily volatility (unbiased): {} ({} in %)",
        volatility_unbiased,
        volatility_unbiased * PERCENT
    );
    log::debug!(
        "historical daily volatility (mle): {} ({} in %)",
        volatility_mle,
        volatility_mle * PERCENT
    );

    VolatilityResult {
        sample_variance_unbiased: variance_unbiased * PERCENT,
        sample_variance_mle: variance_mle * PERCENT,
        volatility_unbiased: volatility_unbiased * PERCENT,
        volatility_mle: volatility_mle * PERCENT,
    }
}
