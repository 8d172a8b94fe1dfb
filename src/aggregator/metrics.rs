//! Running latency statistics per function and per call edge.
//!
//! Tables keep first-seen order so snapshots sorted by total time are
//! deterministic among exact ties.

use super::reconciler::CallSpan;
use crate::parser::schema::{EdgeRow, FunctionRow, LatencyRow};
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

/// Count, total, min and max of a set of durations (microseconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub total_micros: f64,
    pub min_micros: f64,
    pub max_micros: f64,
}

impl Default for LatencyStats {
    fn default() -> Self {
        // Sentinels so the first observation wins both comparisons
        Self {
            count: 0,
            total_micros: 0.0,
            min_micros: f64::INFINITY,
            max_micros: f64::NEG_INFINITY,
        }
    }
}

impl LatencyStats {
    pub fn observe(&mut self, duration_micros: f64) {
        self.count += 1;
        self.total_micros += duration_micros;
        self.min_micros = self.min_micros.min(duration_micros);
        self.max_micros = self.max_micros.max(duration_micros);
    }

    pub fn average_micros(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_micros / self.count as f64
        }
    }

    pub fn to_row(&self) -> LatencyRow {
        LatencyRow {
            count: self.count,
            total_us: self.total_micros,
            avg_us: self.average_micros(),
            min_us: self.min_micros,
            max_us: self.max_micros,
        }
    }
}

/// Caller -> callee pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub caller: String,
    pub callee: String,
}

impl Edge {
    pub fn new(caller: impl Into<String>, callee: impl Into<String>) -> Self {
        Self {
            caller: caller.into(),
            callee: callee.into(),
        }
    }
}

/// Insertion-ordered stats table
#[derive(Debug, Clone)]
struct StatsTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, LatencyStats)>,
}

impl<K> Default for StatsTable<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> StatsTable<K> {
    fn entry(&mut self, key: K) -> &mut LatencyStats {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, LatencyStats::default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    fn get(&self, key: &K) -> Option<&LatencyStats> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Descending total; `sort_by` is stable so ties keep first-seen order
    fn snapshot(&self) -> Vec<(K, LatencyStats)> {
        let mut rows = self.entries.clone();
        rows.sort_by(|a, b| b.1.total_micros.total_cmp(&a.1.total_micros));
        rows
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Owns the function and edge tables of a run
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    functions: StatsTable<String>,
    edges: StatsTable<Edge>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed call into both tables
    pub fn record(&mut self, span: &CallSpan) {
        self.functions
            .entry(span.callee.clone())
            .observe(span.duration_micros);
        self.edges
            .entry(Edge::new(span.caller.as_str(), span.callee.as_str()))
            .observe(span.duration_micros);
    }

    pub fn function(&self, name: &str) -> Option<&LatencyStats> {
        self.functions.get(&name.to_string())
    }

    pub fn edge(&self, caller: &str, callee: &str) -> Option<&LatencyStats> {
        self.edges.get(&Edge::new(caller, callee))
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn snapshot_functions(&self) -> Vec<(String, LatencyStats)> {
        debug!("Snapshotting {} function entries", self.functions.len());
        self.functions.snapshot()
    }

    pub fn snapshot_edges(&self) -> Vec<(Edge, LatencyStats)> {
        debug!("Snapshotting {} edge entries", self.edges.len());
        self.edges.snapshot()
    }

    /// Function snapshot in report form
    pub fn function_rows(&self) -> Vec<FunctionRow> {
        self.snapshot_functions()
            .into_iter()
            .map(|(function, stats)| FunctionRow {
                function,
                latency: stats.to_row(),
            })
            .collect()
    }

    /// Edge snapshot in report form
    pub fn edge_rows(&self) -> Vec<EdgeRow> {
        self.snapshot_edges()
            .into_iter()
            .map(|(edge, stats)| EdgeRow {
                caller: edge.caller,
                callee: edge.callee,
                latency: stats.to_row(),
            })
            .collect()
    }
}
