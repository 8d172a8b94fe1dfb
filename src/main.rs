//! ftrace-callstats CLI
//!
//! Reads a perf/ftrace call/return log and writes per-call, per-function
//! and per-edge latency tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use ftrace_callstats::commands::{
    display_version, execute_analyze, validate_args, validate_report_file, AnalyzeArgs,
};
use ftrace_callstats::flamegraph::FlamegraphConfig;
use ftrace_callstats::utils::config::{
    TraceConfig, DEFAULT_CALLGRAPH_STATS_CSV, DEFAULT_EVENTS_CSV, DEFAULT_FUNC_STATS_CSV,
};

/// ftrace-callstats - call latency statistics from branch trace logs
#[derive(Parser, Debug)]
#[command(name = "ftrace-callstats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconstruct calls from a log and write statistics
    Analyze {
        /// Input log file
        logfile: PathBuf,

        /// Track call stacks per (pid, cpu) instead of per pid
        #[arg(long, env = "FTRACE_CALLSTATS_KEY_BY_CPU")]
        key_by_cpu: bool,

        /// Per-call detail output
        #[arg(long, default_value = DEFAULT_EVENTS_CSV)]
        events_csv: PathBuf,

        /// Per-function statistics output
        #[arg(long, default_value = DEFAULT_FUNC_STATS_CSV)]
        func_stats_csv: PathBuf,

        /// Per caller->callee statistics output
        #[arg(long, default_value = DEFAULT_CALLGRAPH_STATS_CSV)]
        callgraph_stats_csv: PathBuf,

        /// Output path for JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for SVG flamegraph of self time
        #[arg(short, long, default_missing_value = "flamegraph.svg", num_args = 0..=1)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Rows per table in the text summary
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Validate a JSON report file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            logfile,
            key_by_cpu,
            events_csv,
            func_stats_csv,
            callgraph_stats_csv,
            json,
            flamegraph,
            title,
            width,
            summary,
            top,
        } => {
            let fg_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config,
                }
            });

            let args = AnalyzeArgs {
                log_file: logfile,
                trace_config: TraceConfig::new().with_key_by_cpu(key_by_cpu),
                events_csv,
                func_stats_csv,
                callgraph_stats_csv,
                output_json: json,
                output_svg: flamegraph,
                flamegraph_config: fg_config,
                print_summary: summary,
                top,
            };

            validate_args(&args)?;
            execute_analyze(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
