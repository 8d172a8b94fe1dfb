use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use log::warn;
use std::path::Path;

/// Validate a JSON report file and print a digest
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    if report.version != SCHEMA_VERSION {
        warn!(
            "Report schema v{} differs from current v{}",
            report.version, SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version:        {}", report.version);
    println!("  Source:         {}", report.source);
    println!("  Keyed by CPU:   {}", report.key_by_cpu);
    println!("  Spans:          {}", report.summary.spans);
    println!("  Functions:      {}", report.functions.len());
    println!("  Edges:          {}", report.edges.len());
    println!("  Unclosed:       {}", report.summary.unclosed_frames);
    println!("  Generated at:   {}", report.generated_at);

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("ftrace-callstats v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call/return latency statistics from perf/ftrace branch logs.");
}
