use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "./data/";
const DEFAULT_RESULTS_DIR: &str = "./results/";
const DEFAULT_RESULTS_FILE_NAME: &str = "crypto_historical_volatility.csv";
const DEFAULT_MAX_CONCURRENT_FILES: usize = 4;

/// Where to read price files from and where to put the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_file_name: String,
    pub max_concurrent_files: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            output_file_name: DEFAULT_RESULTS_FILE_NAME.to_string(),
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
        }
    }
}

impl RunConfig {
    /// Loads the config from the process environment (after `.env` has been read).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let input_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.input_dir);
        let output_dir = lookup("RESULTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let output_file_name = lookup("RESULTS_FILE_NAME").unwrap_or(defaults.output_file_name);

        let max_concurrent_files = match lookup("MAX_CONCURRENT_FILES") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_CONCURRENT_FILES must be a valid integer, got {:?}", value))?,
            None => defaults.max_concurrent_files,
        };

        if output_file_name.trim().is_empty() {
            bail!("RESULTS_FILE_NAME must not be empty");
        }
        if max_concurrent_files == 0 {
            bail!("MAX_CONCURRENT_FILES must be at least 1");
        }

        Ok(Self {
            input_dir,
            output_dir,
            output_file_name,
            max_concurrent_files,
        })
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file_name)
    }
}
