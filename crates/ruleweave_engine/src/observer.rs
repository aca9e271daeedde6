//! Hooks into condition evaluation.
//!
//! An [`EvalObserver`] is told about every node entered and left and every
//! candidate fact a pattern leaf considers. The debug layer implements it
//! to record traces; evaluation itself never depends on what an observer
//! does.

use ruleweave_foundation::FactId;
use ruleweave_storage::FactShape;

use crate::condition::ConditionNode;
use crate::pattern::{MatchFailure, Pattern};

/// Receives evaluation events. Every method defaults to a no-op.
pub trait EvalObserver {
    /// A node is about to be evaluated. The root has depth 0.
    fn node_entered(&mut self, node: &ConditionNode, depth: usize) {
        let _ = (node, depth);
    }

    /// A node finished evaluating.
    fn node_exited(&mut self, node: &ConditionNode, depth: usize, matched: bool) {
        let _ = (node, depth, matched);
    }

    /// A candidate fact was skipped because its shape is excluded.
    fn fact_skipped(&mut self, pattern: &Pattern, fact: FactId, shape: FactShape) {
        let _ = (pattern, fact, shape);
    }

    /// A candidate fact was checked against a pattern.
    fn pattern_tried(
        &mut self,
        pattern: &Pattern,
        fact: FactId,
        outcome: &Result<(), MatchFailure>,
    ) {
        let _ = (pattern, fact, outcome);
    }
}

/// An observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EvalObserver for NoopObserver {}

/// Counts evaluation events. Useful for tests and quick profiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingObserver {
    /// Nodes entered.
    pub nodes: usize,
    /// Candidate facts checked.
    pub candidates: usize,
    /// Candidate facts skipped on shape.
    pub skipped: usize,
    /// Candidates that matched.
    pub matches: usize,
}

impl EvalObserver for CountingObserver {
    fn node_entered(&mut self, _node: &ConditionNode, _depth: usize) {
        self.nodes += 1;
    }

    fn fact_skipped(&mut self, _pattern: &Pattern, _fact: FactId, _shape: FactShape) {
        self.skipped += 1;
    }

    fn pattern_tried(
        &mut self,
        _pattern: &Pattern,
        _fact: FactId,
        outcome: &Result<(), MatchFailure>,
    ) {
        self.candidates += 1;
        if outcome.is_ok() {
            self.matches += 1;
        }
    }
}
