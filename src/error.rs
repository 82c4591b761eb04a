//! Errors raised around the alignment engine: input loading, configuration, output.
//!
//! The aligners themselves are total and never return these.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no sequence data found in {}", .path.display())]
    NoSequence { path: PathBuf },

    #[error("{name} is not a DNA sequence (expected only A, C, G, T)")]
    InvalidSequence { name: String },

    #[error("invalid value `{value}` for {key}")]
    InvalidConfig { key: String, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Log `err` and terminate the process with status 1.
pub fn handle_error_and_exit(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
