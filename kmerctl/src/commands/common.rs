//! Common types and utilities for kmerctl commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use crate::error::{CliError, Result};

// ============================================================================
// UFX Record Parsing
// ============================================================================

/// A single parsed UFX record: the k-mer text plus its left/right extension
/// bases (§2 GLOSSARY). Parsing the fixed-width UFX line shape is CLI
/// plumbing, not part of the index library itself (`kmer_index::ufx` only
/// validates file sizing); this driver is the one place that actually reads
/// the `K` bases + separator + lExt + rExt line shape.
pub struct UfxRecord<'a> {
    pub kmer: &'a [u8],
    pub l_ext: u8,
    pub r_ext: u8,
}

/// Parse one UFX text line (without its trailing newline) for a k-mer of
/// length `k`. Expected shape: `K` bases, one separator byte (space or
/// tab), `lExt`, `rExt`.
pub fn parse_ufx_line(line: &[u8], k: usize) -> Result<UfxRecord<'_>> {
    if line.len() != k + 3 {
        return Err(CliError::MalformedUfxLine {
            path: String::new(),
            line: 0,
            reason: format!("expected {} bytes, got {}", k + 3, line.len()),
        });
    }

    let kmer = &line[..k];
    let sep = line[k];
    if sep != b' ' && sep != b'\t' {
        return Err(CliError::MalformedUfxLine {
            path: String::new(),
            line: 0,
            reason: "missing separator between k-mer and extensions".to_string(),
        });
    }

    Ok(UfxRecord {
        kmer,
        l_ext: line[k + 1],
        r_ext: line[k + 2],
    })
}

/// A start k-mer (GLOSSARY) has a single left extension, conventionally
/// written `F` in UFX output.
pub fn is_start_kmer(l_ext: u8) -> bool {
    l_ext == b'F'
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
pub mod output_messages {
    /// Generic info message format.
    pub const INFO: &str = "ℹ️ {}";

    /// Generic warning message format.
    pub const WARNING: &str = "⚠️ {}";

    /// Generic error message format.
    pub const ERROR: &str = "❌ {}";
}
