/// Prices of one instrument, one per observation day, earliest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// At least two prices are needed to get a single non-trivial return.
    pub fn has_sufficient_data(&self) -> bool {
        self.prices.len() >= 2
    }
}

/// Daily log returns keyed by day index. Day 0 is compared against itself and is always 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    returns: Vec<f64>,
}

impl ReturnSeries {
    #[cfg(test)]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    #[cfg(test)]
    pub fn get(&self, day: usize) -> Option<f64> {
        self.returns.get(day).copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.returns.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStatistics {
    pub mean_return: f64,
}

/// Converts a price series into continuously compounded daily returns
/// `ln(P[i] / P[i-1])` and their arithmetic mean over all `n` days.
///
/// The first day uses its own price as the previous one, so `R[0] = ln(1) = 0`
/// and the mean is diluted by that extra zero. Non-positive or NaN prices are
/// not rejected; they surface as NaN or infinite returns.
pub fn continuously_compounded_returns(series: &PriceSeries) -> (ReturnSeries, ReturnStatistics) {
    let prices = series.prices();
    let mut returns = Vec::with_capacity(prices.len());
    let mut compound_return = 0.0;

    if let Some(&first) = prices.first() {
        let mut prev_price = first;
        for (day, &current_price) in prices.iter().enumerate() {
            let dpsr = (current_price / prev_price).ln();
            log::trace!("day {}: price {}, dpsr {}", day, current_price, dpsr);
            returns.push(dpsr);
            compound_return += dpsr;
            prev_price = current_price;
        }
    }

    // An empty series divides 0 by 0 here, leaving the mean NaN.
    let mean_return = compound_return / prices.len() as f64;
    log::debug!(
        "average DPSR: {} ({} in %)",
        mean_return,
        mean_return * 100.0
    );

    (ReturnSeries { returns }, ReturnStatistics { mean_return })
}
