// runtime settings from the environment (and an optional .env file)

use std::env;

use crate::error::{Error, Result};

pub const WORKERS_VAR: &str = "RUSTSEQ_WORKERS";
pub const BATCH_CONCURRENCY_VAR: &str = "RUSTSEQ_BATCH_CONCURRENCY";

/// Concurrency defaults for the aligners. 0 means use every available core.
///
/// Zero or negative counts from any source are normalised to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub workers: usize,
    pub batch_concurrency: usize,
}

impl Settings {
    /// Read settings after loading `.env` from the working directory, if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            workers: parse_count(WORKERS_VAR, lookup(WORKERS_VAR))?,
            batch_concurrency: parse_count(
                BATCH_CONCURRENCY_VAR,
                lookup(BATCH_CONCURRENCY_VAR),
            )?,
        })
    }

    /// Command-line values take precedence over the environment.
    pub fn with_overrides(self, workers: Option<i64>, batch_concurrency: Option<i64>) -> Self {
        Self {
            workers: workers.map_or(self.workers, normalize_count),
            batch_concurrency: batch_concurrency.map_or(self.batch_concurrency, normalize_count),
        }
    }
}

/// Map a signed count to a worker count, where anything at or below 0 means auto.
pub fn normalize_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn parse_count(key: &str, value: Option<String>) -> Result<usize> {
    match value {
        None => Ok(0),
        Some(v) if v.trim().is_empty() => Ok(0),
        Some(v) => match v.trim().parse::<i64>() {
            Ok(n) => Ok(normalize_count(n)),
            Err(_) => Err(Error::InvalidConfig {
                key: key.to_string(),
                value: v,
            }),
        },
    }
}
