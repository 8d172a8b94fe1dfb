//! Reconciliation and aggregation of trace records.
//!
//! This module transforms parsed trace records into:
//! - Call spans (matched call/return pairs with depth and duration)
//! - Per-function and per-edge latency statistics
//! - Collapsed stacks (for flamegraph generation)

pub mod analysis;
pub mod metrics;
pub mod reconciler;
pub mod stack_builder;

// Re-export main types and functions
pub use analysis::Analysis;
pub use metrics::{Aggregator, Edge, LatencyStats};
pub use reconciler::{CallSpan, ReconcilerStats, StackFrame, StackReconciler};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
