//! Command modules for the kmerctl CLI.
//!
//! This module contains implementations for all available subcommands.
//! Each subcommand is implemented in its own file following a standardized pattern.

pub mod common;
pub mod traits;

pub mod ingest;
pub mod lookup;

#[allow(unused_imports)]
pub use ingest::{run_ingest, IngestArgs};
#[allow(unused_imports)]
pub use lookup::{run_lookup, LookupArgs};
