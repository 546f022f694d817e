use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::calc::returns::PriceSeries;
use crate::util::parsing::parse_float_prefix;

/// Second column of every row holds the price.
const PRICE_COLUMN: usize = 1;
/// A row whose price column reads this is a header.
const HEADER_MARKER: &str = "price";

/// Parses comma separated rows into a price series, in row order.
///
/// Prices are read from their leading numeric text, so `100 USD` is 100. A
/// missing or non-numeric price becomes NaN and the series still reaches the
/// calculation; only structural CSV errors (e.g. invalid UTF-8) are returned.
pub fn parse_price_series<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .from_reader(reader);

    let mut prices = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", row + 1))?;
        let field = record.get(PRICE_COLUMN);
        if field == Some(HEADER_MARKER) {
            continue;
        }

        let price = field.map_or(f64::NAN, parse_float_prefix);
        if price.is_nan() {
            log::warn!("Row {}: invalid price {:?}, using NaN", row + 1, field);
        }
        prices.push(price);
    }

    Ok(PriceSeries::new(prices))
}

/// Reads a whole price file into memory and parses it.
pub async fn load_price_series(path: &Path) -> Result<PriceSeries> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read price file {}", path.display()))?;

    parse_price_series(contents.as_slice())
        .with_context(|| format!("Failed to parse price file {}", path.display()))
}

/// Lists the regular files of the input directory, in directory listing order.
pub async fn discover_price_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list input directory {}", dir.display()))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if file_type.is_file() {
            files.push(path);
        } else {
            log::debug!("Skipping non-file entry {}", path.display());
        }
    }

    Ok(files)
}
