//! Error handling module for the kmerctl CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use thiserror::Error;

/// Main error type for the kmerctl CLI application.
#[derive(Error, Debug)]
pub enum CliError {
    /// Error when a required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error surfaced by the kmer-index library itself.
    #[error("Index error: {0}")]
    Index(#[from] kmer_index::IndexError),

    /// Error when a UFX input line doesn't match the expected record shape.
    #[error("Malformed UFX record in {path} at line {line}: {reason}")]
    MalformedUfxLine {
        path: String,
        line: usize,
        reason: String,
    },

    /// Error when the requested k-mer length has no compiled dispatch arm.
    ///
    /// `P = ceil(k / 4)` must be a compile-time constant for `KmerIndex<P>`;
    /// this CLI only instantiates it for `P` in `1..=16` (k up to 64).
    #[error("Unsupported k-mer length {k} (packed width {packed_len} bytes, supported range is 1..=16)")]
    UnsupportedK { k: usize, packed_len: usize },

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization/deserialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using CliError.
pub type Result<T> = std::result::Result<T, CliError>;
