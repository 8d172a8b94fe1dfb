//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads and parses the trace log
//! 2. Reconciles call stacks into spans
//! 3. Aggregates function and edge statistics
//! 4. Writes CSV tables
//! 5. Writes optional JSON report and flamegraph
//! 6. Reports unclosed frames

use super::models::AnalyzeArgs;
use crate::aggregator::{build_collapsed_stacks, Analysis};
use crate::flamegraph::generate_flamegraph;
use crate::output::{
    build_report, generate_text_summary, write_edge_stats_csv, write_events_csv,
    write_function_stats_csv, write_report, write_svg,
};
use crate::parser::read_log;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// Returns the finished analysis so callers can inspect it.
///
/// # Errors
/// * Log file missing or unreadable
/// * File write errors
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<Analysis> {
    let start_time = Instant::now();

    info!("Analyzing trace log: {}", args.log_file.display());
    if args.trace_config.key_by_cpu {
        info!("Call stacks keyed by (pid, cpu)");
    }

    // Step 1: Parse log
    info!("Step 1/4: Parsing trace log...");
    let log = read_log(&args.log_file)
        .with_context(|| format!("Failed to read trace log {}", args.log_file.display()))?;

    if log.skipped_lines > 0 {
        debug!("{} lines did not match the call/return grammar", log.skipped_lines);
    }

    // Step 2: Reconcile and aggregate
    info!("Step 2/4: Reconciling call stacks...");
    let analysis = Analysis::run(&log.records, args.trace_config);

    // Step 3: CSV tables
    info!("Step 3/4: Writing CSV tables...");
    write_events_csv(&analysis.spans, &args.events_csv).context("Failed to write events CSV")?;
    write_function_stats_csv(
        &analysis.aggregator.snapshot_functions(),
        &args.func_stats_csv,
    )
    .context("Failed to write function stats CSV")?;
    write_edge_stats_csv(
        &analysis.aggregator.snapshot_edges(),
        &args.callgraph_stats_csv,
    )
    .context("Failed to write call-graph stats CSV")?;

    // Step 4: Optional outputs
    info!("Step 4/4: Writing optional outputs...");
    if let Some(json_path) = &args.output_json {
        let source = args.log_file.display().to_string();
        let report = build_report(&source, &log, &analysis, &args.trace_config);
        write_report(&report, json_path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    if let Some(svg_path) = &args.output_svg {
        write_flamegraph(&analysis, args, svg_path)?;
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("CALL LATENCY SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Log:     {}", args.log_file.display());
        println!("Records: {} ({} lines skipped)", log.records.len(), log.skipped_lines);
        println!("Spans:   {}", analysis.spans.len());
        println!("\n{}", generate_text_summary(&analysis, args.top));
        println!("{}", "=".repeat(80));
    }

    if analysis.unclosed_frames > 0 {
        warn!(
            "Run completed with {} unclosed frame(s); statistics cover matched calls only",
            analysis.unclosed_frames
        );
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(analysis)
}

/// Render and write the self-time flamegraph
///
/// An empty graph is logged and skipped, not treated as a failure.
fn write_flamegraph(analysis: &Analysis, args: &AnalyzeArgs, svg_path: &Path) -> Result<()> {
    let stacks = build_collapsed_stacks(&analysis.spans);
    if stacks.is_empty() {
        warn!("No completed calls with positive self time; skipping flamegraph");
        return Ok(());
    }

    let svg = generate_flamegraph(&stacks, args.flamegraph_config.as_ref())
        .context("Failed to generate flamegraph")?;
    write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
    info!("✓ Flamegraph written to: {}", svg_path.display());

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.log_file.as_os_str().is_empty() {
        anyhow::bail!("Log file path cannot be empty");
    }

    if !args.log_file.exists() {
        anyhow::bail!("Log file does not exist: {}", args.log_file.display());
    }

    if args.log_file.is_dir() {
        anyhow::bail!("Log file is a directory: {}", args.log_file.display());
    }

    let mut outputs = vec![&args.events_csv, &args.func_stats_csv, &args.callgraph_stats_csv];
    outputs.extend(args.output_json.iter());
    outputs.extend(args.output_svg.iter());

    for (i, a) in outputs.iter().enumerate() {
        if a.as_os_str().is_empty() {
            anyhow::bail!("Output paths cannot be empty");
        }
        if outputs[i + 1..].contains(a) {
            anyhow::bail!("Output files must be distinct: {}", a.display());
        }
        if *a == &args.log_file {
            anyhow::bail!("Refusing to overwrite the input log: {}", a.display());
        }
    }

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if let Some(config) = &args.flamegraph_config {
        if config.width == 0 {
            anyhow::bail!("Flamegraph width must be greater than 0");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn args_for(log: &Path) -> AnalyzeArgs {
        AnalyzeArgs {
            log_file: log.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        let log = NamedTempFile::new().unwrap();
        assert!(validate_args(&args_for(log.path())).is_ok());
    }

    #[test]
    fn test_validate_args_empty_log_path() {
        let args = AnalyzeArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_log() {
        let args = args_for(Path::new("/definitely/not/here.log"));
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_duplicate_outputs() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            func_stats_csv: PathBuf::from("same.csv"),
            callgraph_stats_csv: PathBuf::from("same.csv"),
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_output_overwrites_log() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            events_csv: log.path().to_path_buf(),
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_json_overwrites_log() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            output_json: Some(log.path().to_path_buf()),
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_flamegraph_overwrites_log() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            output_svg: Some(log.path().to_path_buf()),
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_json_collides_with_csv() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            output_json: Some(PathBuf::from("events.csv")),
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_distinct_optional_outputs() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            output_json: Some(PathBuf::from("report.json")),
            output_svg: Some(PathBuf::from("flamegraph.svg")),
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_top_zero() {
        let log = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            top: 0,
            ..args_for(log.path())
        };
        assert!(validate_args(&args).is_err());
    }
}
