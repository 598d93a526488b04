//! Index Logging and Tracing
//!
//! Structured logging for index lifecycle, ingest, and query operations,
//! useful for:
//! - Diagnosing heap/bucket sizing problems
//! - Observing chain-length growth during ingest
//! - Production monitoring of a running ingest job
//!
//! Log Levels:
//! - ERROR: fatal allocation/invariant failures (§7)
//! - WARN: unusual but non-fatal conditions (e.g. a long chain)
//! - INFO: lifecycle milestones (create, barrier crossings, destroy)
//! - DEBUG: per-worker ingest progress
//! - TRACE: per-insert/per-lookup detail

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Log level for index operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

/// Index event types.
#[derive(Debug, Clone)]
pub enum IndexEvent {
    /// The heap and bucket table finished allocation.
    Created {
        workers: usize,
        heap_capacity: u64,
        bucket_count: u64,
    },

    /// A worker crossed a lifecycle barrier (init -> ingest -> query).
    BarrierCrossed { rank: usize, phase: &'static str },

    /// A worker's local heap cursor advanced past the configured capacity.
    HeapExhausted {
        rank: usize,
        pos_local: u64,
        heap_block_size: u64,
    },

    /// A single insert completed, after however many CAS retries.
    Inserted {
        rank: usize,
        bucket: u64,
        handle: i64,
        cas_retries: u32,
    },

    /// A lookup completed.
    Lookup { bucket: u64, found: bool, chain_len: u32 },

    /// The index was torn down.
    Destroyed { workers: usize },
}

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct IndexLoggerConfig {
    /// Minimum log level.
    pub level: LogLevel,

    /// Enable console output.
    pub console: bool,

    /// Enable JSON format (instead of human-readable).
    pub json: bool,

    /// Enable timestamps.
    pub timestamps: bool,
}

impl Default for IndexLoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            console: true,
            json: false,
            timestamps: true,
        }
    }
}

/// Centralized logger for index operations.
pub struct IndexLogger {
    config: IndexLoggerConfig,
    events: Mutex<Vec<(Instant, IndexEvent)>>,
    enabled: AtomicBool,
}

impl IndexLogger {
    /// Create a new logger.
    pub fn new(config: IndexLoggerConfig) -> Self {
        Self {
            config,
            events: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Enable logging.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disable logging.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Check if logging is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Log an index event.
    pub fn log(&self, event: IndexEvent) {
        if !self.is_enabled() {
            return;
        }

        let event_level = self.event_level(&event);
        if event_level > self.config.level {
            return;
        }

        let timestamp = Instant::now();

        if let Ok(mut events) = self.events.lock() {
            events.push((timestamp, event.clone()));
        }

        if self.config.console {
            self.output_console(&event);
        }
    }

    fn event_level(&self, event: &IndexEvent) -> LogLevel {
        match event {
            IndexEvent::HeapExhausted { .. } => LogLevel::Error,
            IndexEvent::Created { .. } | IndexEvent::Destroyed { .. } => LogLevel::Info,
            IndexEvent::BarrierCrossed { .. } => LogLevel::Debug,
            IndexEvent::Inserted { .. } | IndexEvent::Lookup { .. } => LogLevel::Trace,
        }
    }

    fn output_console(&self, event: &IndexEvent) {
        if self.config.timestamps {
            let now = chrono::Local::now();
            print!("[{}] ", now.format("%Y-%m-%d %H:%M:%S%.3f"));
        }

        if self.config.json {
            self.output_json(event);
        } else {
            self.output_human(event);
        }
    }

    fn output_human(&self, event: &IndexEvent) {
        match event {
            IndexEvent::Created {
                workers,
                heap_capacity,
                bucket_count,
            } => {
                println!(
                    "[index] created: {} workers, {} heap slots, {} buckets",
                    workers, heap_capacity, bucket_count
                );
            },
            IndexEvent::BarrierCrossed { rank, phase } => {
                println!("[index] worker {} entered phase '{}'", rank, phase);
            },
            IndexEvent::HeapExhausted {
                rank,
                pos_local,
                heap_block_size,
            } => {
                eprintln!(
                    "[index] worker {} heap exhausted: cursor {} >= block size {}",
                    rank, pos_local, heap_block_size
                );
            },
            IndexEvent::Inserted {
                rank,
                bucket,
                handle,
                cas_retries,
            } => {
                println!(
                    "[index] worker {} inserted handle {} into bucket {} ({} CAS retries)",
                    rank, handle, bucket, cas_retries
                );
            },
            IndexEvent::Lookup {
                bucket,
                found,
                chain_len,
            } => {
                println!(
                    "[index] lookup in bucket {}: {} after {} hops",
                    bucket,
                    if *found { "found" } else { "not found" },
                    chain_len
                );
            },
            IndexEvent::Destroyed { workers } => {
                println!("[index] destroyed ({} workers)", workers);
            },
        }
    }

    fn output_json(&self, event: &IndexEvent) {
        let json = match event {
            IndexEvent::Created {
                workers,
                heap_capacity,
                bucket_count,
            } => serde_json::json!({
                "type": "created",
                "workers": workers,
                "heap_capacity": heap_capacity,
                "bucket_count": bucket_count,
            }),
            IndexEvent::BarrierCrossed { rank, phase } => serde_json::json!({
                "type": "barrier_crossed",
                "rank": rank,
                "phase": phase,
            }),
            IndexEvent::HeapExhausted {
                rank,
                pos_local,
                heap_block_size,
            } => serde_json::json!({
                "type": "heap_exhausted",
                "rank": rank,
                "pos_local": pos_local,
                "heap_block_size": heap_block_size,
            }),
            IndexEvent::Inserted {
                rank,
                bucket,
                handle,
                cas_retries,
            } => serde_json::json!({
                "type": "inserted",
                "rank": rank,
                "bucket": bucket,
                "handle": handle,
                "cas_retries": cas_retries,
            }),
            IndexEvent::Lookup {
                bucket,
                found,
                chain_len,
            } => serde_json::json!({
                "type": "lookup",
                "bucket": bucket,
                "found": found,
                "chain_len": chain_len,
            }),
            IndexEvent::Destroyed { workers } => serde_json::json!({
                "type": "destroyed",
                "workers": workers,
            }),
        };

        if let Ok(json_str) = serde_json::to_string(&json) {
            println!("{}", json_str);
        }
    }

    /// Get all recorded events.
    pub fn get_events(&self) -> Vec<(Instant, IndexEvent)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Clear all recorded events.
    pub fn clear_events(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get the number of recorded events.
    pub fn event_count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl Default for IndexLogger {
    fn default() -> Self {
        Self::new(IndexLoggerConfig::default())
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_LOGGER: Mutex<IndexLogger> = Mutex::new(IndexLogger::default());
}

/// Log an event to the global logger.
pub fn log_event(event: IndexEvent) {
    if let Ok(logger) = GLOBAL_LOGGER.lock() {
        logger.log(event);
    }
}

/// Configure the global logger.
pub fn configure_logger(config: IndexLoggerConfig) {
    if let Ok(mut logger) = GLOBAL_LOGGER.lock() {
        *logger = IndexLogger::new(config);
    }
}

/// Get the global logger's event count.
pub fn get_event_count() -> usize {
    GLOBAL_LOGGER.lock().map(|l| l.event_count()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_basic() {
        let logger = IndexLogger::default();
        logger.log(IndexEvent::Created {
            workers: 2,
            heap_capacity: 1024,
            bucket_count: 512,
        });
        assert_eq!(logger.event_count(), 1);
    }

    #[test]
    fn test_logger_disable() {
        let logger = IndexLogger::default();
        logger.disable();
        logger.log(IndexEvent::Created {
            workers: 2,
            heap_capacity: 1024,
            bucket_count: 512,
        });
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_trace_filtered_by_default() {
        let logger = IndexLogger::default();
        logger.log(IndexEvent::Inserted {
            rank: 0,
            bucket: 0,
            handle: 0,
            cas_retries: 0,
        });
        assert_eq!(logger.event_count(), 0);
    }
}
