//! JSON report writer.
//!
//! Writes Report structs to JSON files with proper formatting.

use super::create_output_file;
use crate::aggregator::Analysis;
use crate::parser::schema::{Report, RunSummary};
use crate::parser::ParsedLog;
use crate::utils::config::{TraceConfig, SCHEMA_VERSION};
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Assemble a report from a finished run
///
/// **Public** - used by the analyze command and tests
pub fn build_report(
    source: &str,
    log: &ParsedLog,
    analysis: &Analysis,
    config: &TraceConfig,
) -> Report {
    let stats = analysis.stats;

    Report {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        key_by_cpu: config.key_by_cpu,
        summary: RunSummary {
            total_lines: log.total_lines,
            skipped_lines: log.skipped_lines,
            calls: stats.calls,
            returns: stats.returns,
            spans: stats.spans,
            orphan_returns: stats.orphan_returns,
            unmatched_returns: stats.unmatched_returns,
            discarded_frames: stats.discarded_frames,
            unclosed_frames: analysis.unclosed_frames,
        },
        functions: analysis.aggregator.function_rows(),
        edges: analysis.aggregator.edge_rows(),
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &Report, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    let writer = create_output_file(output_path)?;

    // Serialize to JSON with pretty printing
    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let report: Report = serde_json::from_reader(BufReader::new(file))
        .map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, source {}",
        report.version, report.source
    );

    Ok(report)
}
