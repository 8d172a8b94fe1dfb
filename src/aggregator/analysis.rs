//! Drive the reconciler and aggregator over one ordered record sequence.

use super::metrics::Aggregator;
use super::reconciler::{CallSpan, ReconcilerStats, StackReconciler};
use crate::parser::record::TraceRecord;
use crate::utils::config::TraceConfig;
use log::{debug, info};

/// Everything derived from one run over a log
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Completed calls, in the order their returns arrived
    pub spans: Vec<CallSpan>,
    pub aggregator: Aggregator,
    pub stats: ReconcilerStats,
    /// Frames still pending when input ran out
    pub unclosed_frames: usize,
}

impl Analysis {
    /// Consume `records` start to finish
    ///
    /// Never fails: anomalies are counted, not rejected.
    pub fn run<'a, I>(records: I, config: TraceConfig) -> Self
    where
        I: IntoIterator<Item = &'a TraceRecord>,
    {
        let mut reconciler = StackReconciler::new(config);
        let mut aggregator = Aggregator::new();
        let mut spans = Vec::new();

        for record in records {
            if let Some(span) = reconciler.on_record(record) {
                aggregator.record(&span);
                spans.push(span);
            }
        }

        let unclosed_frames = reconciler.end_of_stream();
        let stats = reconciler.stats();

        info!(
            "Reconciled {} spans ({} functions, {} edges)",
            spans.len(),
            aggregator.function_count(),
            aggregator.edge_count()
        );
        debug!(
            "calls={} returns={} orphan={} unmatched={} discarded={}",
            stats.calls,
            stats.returns,
            stats.orphan_returns,
            stats.unmatched_returns,
            stats.discarded_frames
        );

        Self {
            spans,
            aggregator,
            stats,
            unclosed_frames,
        }
    }
}
