//! Lookup command implementation.
//!
//! Rebuilds the index from the same UFX inputs `ingest` would use — the
//! index has no persistence (§4.6 Non-goals) — then queries it for each
//! requested k-mer.

use std::path::PathBuf;

use crate::commands::ingest::build_and_ingest;
use crate::config::Config;
use crate::dispatch::AnyIndex;
use crate::error::Result;

/// Arguments for the lookup command.
#[derive(Debug, Clone)]
pub struct LookupArgs {
    /// UFX input files to rebuild the index from.
    pub inputs: Vec<PathBuf>,
    /// Index sizing and worker configuration.
    pub config: Config,
    /// K-mer texts to query.
    pub queries: Vec<String>,
}

/// Outcome of a single query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    pub found: bool,
    pub handle: Option<i64>,
    pub l_ext: Option<u8>,
    pub r_ext: Option<u8>,
}

/// Run the `lookup` subcommand.
pub fn run_lookup(args: LookupArgs) -> Result<Vec<QueryOutcome>> {
    let (index, _stats) = build_and_ingest(&args.inputs, &args.config)?;

    let mut outcomes = Vec::with_capacity(args.queries.len());
    for query in &args.queries {
        match index.lookup(query.as_bytes())? {
            Some((handle, l_ext, r_ext)) => outcomes.push(QueryOutcome {
                query: query.clone(),
                found: true,
                handle: Some(handle),
                l_ext: Some(l_ext),
                r_ext: Some(r_ext),
            }),
            None => outcomes.push(QueryOutcome {
                query: query.clone(),
                found: false,
                handle: None,
                l_ext: None,
                r_ext: None,
            }),
        }
    }

    Ok(outcomes)
}
