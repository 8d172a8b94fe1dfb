//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Parsing raw perf/ftrace branch log lines
//! - The normalized call/return record model
//! - Defining the JSON report schema

pub mod ftrace_log;
pub mod record;
pub mod schema;

// Re-export main types
pub use ftrace_log::{parse_line, parse_log, read_log, ParsedLog};
pub use record::{ContextKey, TraceEvent, TraceRecord};
pub use schema::{EdgeRow, FunctionRow, LatencyRow, Report, RunSummary};
