//! Normalized trace records.
//!
//! One record per recognized `call` or `return` line of the tracer log.

use crate::utils::config::TraceConfig;
use std::fmt;

/// What happened at a record's timestamp
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// `caller` transferred control into `callee`
    Call { caller: String, callee: String },

    /// `returning` finished; execution resumes in `target`
    Return { returning: String, target: String },
}

/// One observed event from the log
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub pid: u32,
    pub cpu: u32,
    /// Seconds, as printed by the tracer
    pub timestamp: f64,
    pub event: TraceEvent,
}

impl TraceRecord {
    pub fn call(pid: u32, cpu: u32, timestamp: f64, caller: &str, callee: &str) -> Self {
        Self {
            pid,
            cpu,
            timestamp,
            event: TraceEvent::Call {
                caller: caller.to_string(),
                callee: callee.to_string(),
            },
        }
    }

    pub fn ret(pid: u32, cpu: u32, timestamp: f64, returning: &str, target: &str) -> Self {
        Self {
            pid,
            cpu,
            timestamp,
            event: TraceEvent::Return {
                returning: returning.to_string(),
                target: target.to_string(),
            },
        }
    }

    /// Context key for this record under the given configuration
    pub fn context_key(&self, config: &TraceConfig) -> ContextKey {
        ContextKey {
            pid: self.pid,
            cpu: config.key_by_cpu.then_some(self.cpu),
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self.event, TraceEvent::Call { .. })
    }
}

/// Partition of the event stream into independent call stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey {
    pub pid: u32,
    /// Present only when stacks are keyed by CPU
    pub cpu: Option<u32>,
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cpu {
            Some(cpu) => write!(f, "{}[{:03}]", self.pid, cpu),
            None => write!(f, "{}", self.pid),
        }
    }
}
