//! Trace event and record types.
//!
//! This module defines the events recorded while condition trees are
//! evaluated.

use ruleweave_foundation::{FactId, Value};
use ruleweave_storage::FactShape;

// =============================================================================
// Trace Event
// =============================================================================

/// Events that can be traced during evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// A rule's left-hand side was evaluated.
    RuleEvaluated {
        /// The rule name.
        rule: String,
        /// Whether the rule was satisfied.
        matched: bool,
        /// The committed bindings (empty when unsatisfied).
        bindings: Vec<(String, Value)>,
    },

    /// Evaluation entered a condition node.
    NodeEntered {
        /// The node kind (`and`, `or`, `not`, `pattern`).
        kind: &'static str,
        /// Depth below the root (root = 0).
        depth: usize,
    },

    /// Evaluation left a condition node.
    NodeExited {
        /// The node kind.
        kind: &'static str,
        /// Depth below the root.
        depth: usize,
        /// The node's outcome.
        matched: bool,
    },

    /// A candidate fact was checked against a pattern.
    PatternTried {
        /// The pattern's fact name.
        pattern: String,
        /// The candidate fact.
        fact: FactId,
        /// Why it failed, if it did.
        failure: Option<String>,
    },

    /// A candidate fact was skipped because the pattern excludes its shape.
    FactSkipped {
        /// The pattern's fact name.
        pattern: String,
        /// The skipped fact.
        fact: FactId,
        /// The fact's shape.
        shape: FactShape,
    },

    /// A candidate failed because it disagreed with an existing binding.
    BindingConflict {
        /// The variable name.
        variable: String,
        /// The previously bound value.
        bound: Value,
        /// The value that conflicted.
        found: Value,
    },

    /// Custom user event.
    Custom {
        /// Event name.
        name: String,
        /// Event data.
        data: Value,
    },
}

impl TraceEvent {
    /// Returns the event type name (for filtering).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RuleEvaluated { .. } => "rule-evaluated",
            Self::NodeEntered { .. } => "node-entered",
            Self::NodeExited { .. } => "node-exited",
            Self::PatternTried { .. } => "pattern-tried",
            Self::FactSkipped { .. } => "fact-skipped",
            Self::BindingConflict { .. } => "binding-conflict",
            Self::Custom { .. } => "custom",
        }
    }

    /// Nesting depth used for indentation, where the event has one.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        match self {
            Self::NodeEntered { depth, .. } | Self::NodeExited { depth, .. } => Some(*depth),
            _ => None,
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A recorded trace event with metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord {
    /// Unique record ID (monotonically increasing).
    pub id: u64,
    /// Evaluation cycle this event belongs to.
    pub cycle: u64,
    /// Nanoseconds since the tracer was created.
    pub timestamp_ns: u64,
    /// The event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, cycle: u64, timestamp_ns: u64, event: TraceEvent) -> Self {
        Self {
            id,
            cycle,
            timestamp_ns,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
