//! Stack reconciliation: match `return` records to pending `call` frames.
//!
//! One stack is kept per context key. A return is matched by callee name,
//! searching from the top of the stack downward, so a missing return in the
//! log only costs the frames above the match instead of desynchronizing the
//! whole stack.

use crate::parser::record::{ContextKey, TraceEvent, TraceRecord};
use crate::utils::config::{TraceConfig, MICROS_PER_SECOND};
use log::{debug, warn};
use std::collections::HashMap;

/// A pending (unreturned) call
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    pub callee: String,
    pub caller: String,
    pub enter_timestamp: f64,
    /// Stack size when this frame was pushed (0 = outermost)
    pub depth: usize,
    /// Duration of matched children, for self time
    pub child_micros: f64,
}

/// A completed call, produced when a return matches a frame
#[derive(Debug, Clone, PartialEq)]
pub struct CallSpan {
    pub pid: u32,
    /// CPU of the closing return record
    pub cpu: u32,
    pub depth: usize,
    pub caller: String,
    pub callee: String,
    pub enter_timestamp: f64,
    pub exit_timestamp: f64,
    pub duration_micros: f64,
    /// Duration minus matched children
    pub self_micros: f64,
    /// Collapsed ancestry, e.g. `do_syscall_64;__x64_sys_futex;do_futex`
    pub stack: String,
}

/// Counters for the tolerated anomalies and normal traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerStats {
    pub calls: u64,
    pub returns: u64,
    pub spans: u64,
    /// Returns seen while the context had no pending frame
    pub orphan_returns: u64,
    /// Returns whose function matched no pending frame
    pub unmatched_returns: u64,
    /// Frames dropped above a return that matched below the top
    pub discarded_frames: u64,
}

/// Owns every call stack of a run
#[derive(Debug, Default)]
pub struct StackReconciler {
    config: TraceConfig,
    stacks: HashMap<ContextKey, Vec<StackFrame>>,
    stats: ReconcilerStats,
}

impl StackReconciler {
    pub fn new(config: TraceConfig) -> Self {
        Self {
            config,
            stacks: HashMap::new(),
            stats: ReconcilerStats::default(),
        }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn stats(&self) -> ReconcilerStats {
        self.stats
    }

    /// Feed one record; returns a span when a return closes a frame
    pub fn on_record(&mut self, record: &TraceRecord) -> Option<CallSpan> {
        match &record.event {
            TraceEvent::Call { caller, callee } => {
                self.on_call(record, caller, callee);
                None
            }
            TraceEvent::Return { returning, .. } => self.on_return(record, returning),
        }
    }

    fn on_call(&mut self, record: &TraceRecord, caller: &str, callee: &str) {
        self.stats.calls += 1;

        let key = record.context_key(&self.config);
        let stack = self.stacks.entry(key).or_default();
        let depth = stack.len();

        stack.push(StackFrame {
            callee: callee.to_string(),
            caller: caller.to_string(),
            enter_timestamp: record.timestamp,
            depth,
            child_micros: 0.0,
        });
    }

    fn on_return(&mut self, record: &TraceRecord, returning: &str) -> Option<CallSpan> {
        self.stats.returns += 1;

        let key = record.context_key(&self.config);
        let stack = match self.stacks.get_mut(&key) {
            Some(stack) if !stack.is_empty() => stack,
            _ => {
                self.stats.orphan_returns += 1;
                debug!(
                    "Orphan return of {} in context {} at {:.9}",
                    returning, key, record.timestamp
                );
                return None;
            }
        };

        let Some(idx) = stack.iter().rposition(|frame| frame.callee == returning) else {
            self.stats.unmatched_returns += 1;
            debug!(
                "Unmatched return of {} in context {} at {:.9}",
                returning, key, record.timestamp
            );
            return None;
        };

        let skipped = stack.len() - idx - 1;
        if skipped > 0 {
            self.stats.discarded_frames += skipped as u64;
            debug!(
                "Return of {} in context {} at {:.9} skips {} frame(s)",
                returning, key, record.timestamp, skipped
            );
        }
        stack.truncate(idx + 1);

        let frame = stack.pop()?;
        let duration_micros = (record.timestamp - frame.enter_timestamp) * MICROS_PER_SECOND;

        if let Some(parent) = stack.last_mut() {
            parent.child_micros += duration_micros;
        }

        let collapsed = collapsed_path(stack, &frame);

        self.stats.spans += 1;

        Some(CallSpan {
            pid: record.pid,
            cpu: record.cpu,
            depth: frame.depth,
            caller: frame.caller,
            callee: frame.callee,
            enter_timestamp: frame.enter_timestamp,
            exit_timestamp: record.timestamp,
            duration_micros,
            self_micros: duration_micros - frame.child_micros,
            stack: collapsed,
        })
    }

    /// Pending frames across all contexts
    pub fn pending_frames(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    /// Depth of one context's stack
    pub fn stack_depth(&self, key: &ContextKey) -> usize {
        self.stacks.get(key).map_or(0, Vec::len)
    }

    /// Finish the run and report frames that never returned
    ///
    /// No spans are produced for them; the count is logged once as a warning
    /// and the stacks are cleared, so a second call reports nothing.
    pub fn end_of_stream(&mut self) -> usize {
        let unclosed = self.pending_frames();
        self.stacks = HashMap::new();
        if unclosed > 0 {
            warn!(
                "{} unclosed call frame(s) remain; the log may be truncated or out of order",
                unclosed
            );
        }
        unclosed
    }
}

/// `outermost caller;callee;...;frame.callee` for the frames still below `frame`
fn collapsed_path(below: &[StackFrame], frame: &StackFrame) -> String {
    let root = below.first().unwrap_or(frame);
    let mut parts = Vec::with_capacity(below.len() + 2);
    parts.push(root.caller.as_str());
    parts.extend(below.iter().map(|f| f.callee.as_str()));
    parts.push(frame.callee.as_str());
    parts.join(";")
}
