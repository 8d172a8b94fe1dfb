//! ftrace-callstats
//!
//! Reconstructs nested call/return events from a flat perf/ftrace branch log
//! and reports latency per function and per caller->callee edge.
//!
//! The core is [`aggregator::StackReconciler`], which keeps one call stack
//! per execution context and tolerates missing or out-of-order returns.
//!
//! ```ignore
//! let log = ftrace_callstats::parser::read_log("trace.log")?;
//! let analysis = Analysis::run(&log.records, TraceConfig::default());
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod utils;
