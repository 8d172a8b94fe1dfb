//! CSV table writers.
//!
//! Symbols in the input are `[A-Za-z0-9_]+`, so fields never need quoting.

use super::create_output_file;
use crate::aggregator::metrics::{Edge, LatencyStats};
use crate::aggregator::reconciler::CallSpan;
use crate::utils::config::{DURATION_PRECISION, TIMESTAMP_PRECISION};
use crate::utils::error::OutputError;
use log::info;
use std::io::Write;
use std::path::Path;

pub const EVENTS_HEADER: &str =
    "pid,cpu,depth,caller,callee,enter_ts_sec,exit_ts_sec,duration_us";
pub const FUNCTION_STATS_HEADER: &str = "function,count,total_us,avg_us,min_us,max_us";
pub const EDGE_STATS_HEADER: &str = "caller,callee,count,total_us,avg_us,min_us,max_us";

/// Write one row per call span
pub fn write_events<W: Write>(mut writer: W, spans: &[CallSpan]) -> std::io::Result<()> {
    writeln!(writer, "{}", EVENTS_HEADER)?;
    for span in spans {
        writeln!(
            writer,
            "{},{},{},{},{},{:.tp$},{:.tp$},{:.dp$}",
            span.pid,
            span.cpu,
            span.depth,
            span.caller,
            span.callee,
            span.enter_timestamp,
            span.exit_timestamp,
            span.duration_micros,
            tp = TIMESTAMP_PRECISION,
            dp = DURATION_PRECISION,
        )?;
    }
    writer.flush()
}

/// Write the function snapshot (already sorted)
pub fn write_function_stats<W: Write>(
    mut writer: W,
    rows: &[(String, LatencyStats)],
) -> std::io::Result<()> {
    writeln!(writer, "{}", FUNCTION_STATS_HEADER)?;
    for (function, stats) in rows {
        writeln!(writer, "{},{}", function, latency_columns(stats))?;
    }
    writer.flush()
}

/// Write the edge snapshot (already sorted)
pub fn write_edge_stats<W: Write>(
    mut writer: W,
    rows: &[(Edge, LatencyStats)],
) -> std::io::Result<()> {
    writeln!(writer, "{}", EDGE_STATS_HEADER)?;
    for (edge, stats) in rows {
        writeln!(
            writer,
            "{},{},{}",
            edge.caller,
            edge.callee,
            latency_columns(stats)
        )?;
    }
    writer.flush()
}

fn latency_columns(stats: &LatencyStats) -> String {
    format!(
        "{},{:.p$},{:.p$},{:.p$},{:.p$}",
        stats.count,
        stats.total_micros,
        stats.average_micros(),
        stats.min_micros,
        stats.max_micros,
        p = DURATION_PRECISION,
    )
}

pub fn write_events_csv(spans: &[CallSpan], path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    write_events(create_output_file(path)?, spans)?;
    info!("Wrote {} events to {}", spans.len(), path.display());
    Ok(())
}

pub fn write_function_stats_csv(
    rows: &[(String, LatencyStats)],
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    write_function_stats(create_output_file(path)?, rows)?;
    info!("Wrote {} function rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_edge_stats_csv(
    rows: &[(Edge, LatencyStats)],
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    write_edge_stats(create_output_file(path)?, rows)?;
    info!("Wrote {} edge rows to {}", rows.len(), path.display());
    Ok(())
}
