//! Build collapsed stack format from reconciled call spans.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "do_syscall_64;__x64_sys_futex;do_futex 1830"
//! This means do_futex, reached through that path, spent 1830ns in its own body.

use super::reconciler::CallSpan;
use crate::utils::config::NANOS_PER_MICRO;
use log::debug;
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight (self time in nanoseconds)
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as one line of collapsed-stack text
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from call spans
///
/// **Public** - main entry point for stack building
///
/// # Returns
/// One entry per unique call path, sorted by weight (descending)
///
/// # Algorithm
/// 1. Convert each span's self time to whole nanoseconds
/// 2. Aggregate by unique stack path (sum weights)
/// 3. Drop zero-weight paths; they cannot be drawn
pub fn build_collapsed_stacks(spans: &[CallSpan]) -> Vec<CollapsedStack> {
    debug!("Building collapsed stacks from {} spans", spans.len());

    let mut order: Vec<&str> = Vec::new();
    let mut stack_map: HashMap<&str, u64> = HashMap::new();

    for span in spans {
        // Children can outlast a parent when timestamps are out of order
        let nanos = (span.self_micros.max(0.0) * NANOS_PER_MICRO).round() as u64;

        let weight = stack_map.entry(span.stack.as_str()).or_insert_with(|| {
            order.push(span.stack.as_str());
            0
        });
        *weight += nanos;
    }

    let mut stacks: Vec<CollapsedStack> = order
        .into_iter()
        .filter_map(|stack| {
            let weight = stack_map.get(stack).copied().unwrap_or(0);
            (weight > 0).then(|| CollapsedStack::new(stack.to_string(), weight))
        })
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight));

    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}
