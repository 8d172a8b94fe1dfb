//! Configuration and constants for the CLI.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default output file names
pub const DEFAULT_EVENTS_CSV: &str = "events.csv";
pub const DEFAULT_FUNC_STATS_CSV: &str = "func_stats.csv";
pub const DEFAULT_CALLGRAPH_STATS_CSV: &str = "callgraph_stats.csv";

/// Decimal places for timestamps (seconds) and durations (microseconds)
pub const TIMESTAMP_PRECISION: usize = 9;
pub const DURATION_PRECISION: usize = 3;

pub const MICROS_PER_SECOND: f64 = 1e6;

// Flamegraph weights must be integers; self time is rendered in nanoseconds
pub const NANOS_PER_MICRO: f64 = 1e3;

/// Settings that change how records are partitioned into call stacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceConfig {
    /// Track one stack per (pid, cpu) instead of one per pid
    pub key_by_cpu: bool,
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_by_cpu(mut self, key_by_cpu: bool) -> Self {
        self.key_by_cpu = key_by_cpu;
        self
    }
}
