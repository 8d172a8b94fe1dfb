//! Output JSON schema definitions for the analysis report.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace log that was analyzed
    pub source: String,

    /// Whether stacks were keyed by (pid, cpu)
    pub key_by_cpu: bool,

    /// Line and stack accounting for the run
    pub summary: RunSummary,

    /// Per-function statistics, descending total time
    pub functions: Vec<FunctionRow>,

    /// Per caller->callee statistics, descending total time
    pub edges: Vec<EdgeRow>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

/// Counters collected while reconciling the log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_lines: usize,
    pub skipped_lines: usize,
    pub calls: u64,
    pub returns: u64,
    pub spans: u64,
    pub orphan_returns: u64,
    pub unmatched_returns: u64,
    pub discarded_frames: u64,
    pub unclosed_frames: usize,
}

/// Latency figures shared by function and edge rows, in microseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRow {
    pub count: u64,
    pub total_us: f64,
    pub avg_us: f64,
    pub min_us: f64,
    pub max_us: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRow {
    pub function: String,
    #[serde(flatten)]
    pub latency: LatencyRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub caller: String,
    pub callee: String,
    #[serde(flatten)]
    pub latency: LatencyRow,
}
