use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::{
    TraceConfig, DEFAULT_CALLGRAPH_STATS_CSV, DEFAULT_EVENTS_CSV, DEFAULT_FUNC_STATS_CSV,
};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace log to read
    pub log_file: PathBuf,

    /// Stack partitioning
    pub trace_config: TraceConfig,

    /// Per-call detail table
    pub events_csv: PathBuf,

    /// Per-function statistics table
    pub func_stats_csv: PathBuf,

    /// Per caller->callee statistics table
    pub callgraph_stats_csv: PathBuf,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Rows per table in the text summary
    pub top: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            log_file: PathBuf::new(),
            trace_config: TraceConfig::default(),
            events_csv: PathBuf::from(DEFAULT_EVENTS_CSV),
            func_stats_csv: PathBuf::from(DEFAULT_FUNC_STATS_CSV),
            callgraph_stats_csv: PathBuf::from(DEFAULT_CALLGRAPH_STATS_CSV),
            output_json: None,
            output_svg: None,
            flamegraph_config: None,
            print_summary: false,
            top: 20,
        }
    }
}
