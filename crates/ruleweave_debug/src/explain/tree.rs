//! Explanation trees built from an observed evaluation.

use std::fmt::{self, Write};

use ruleweave_engine::{
    BindingEnvironment, ConditionNode, EvalObserver, MatchFailure, MatchState, Pattern,
};
use ruleweave_foundation::FactId;
use ruleweave_storage::{FactShape, FactStore};
use tracing::debug;

use crate::config::DebugConfig;

// =============================================================================
// Candidate
// =============================================================================

/// What happened to one candidate fact at a pattern leaf.
#[derive(Clone, Debug, PartialEq)]
pub enum CandidateVerdict {
    /// The fact matched and was committed.
    Matched,
    /// The pattern excludes the fact's shape; it was skipped, not failed.
    ShapeSkipped {
        /// The fact's shape.
        shape: FactShape,
    },
    /// The fact was checked and rejected.
    Rejected(MatchFailure),
}

/// A candidate fact and its verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// The candidate fact.
    pub fact: FactId,
    /// What happened to it.
    pub verdict: CandidateVerdict,
}

// =============================================================================
// Explanation
// =============================================================================

/// One node of an explanation tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Explanation {
    /// Node kind (`and`, `or`, `not`, `pattern`).
    pub kind: &'static str,
    /// The node rendered as text.
    pub text: String,
    /// The node's outcome.
    pub matched: bool,
    /// Depth below the root (root = 0).
    pub depth: usize,
    /// Children that were evaluated, in order.
    pub children: Vec<Explanation>,
    /// Candidate facts, for pattern leaves.
    pub candidates: Vec<Candidate>,
    /// True if children below the depth limit were left out.
    pub truncated: bool,
}

impl Explanation {
    fn open(node: &ConditionNode, depth: usize) -> Self {
        Self {
            kind: node.kind_name(),
            text: node.to_string(),
            matched: false,
            depth,
            children: Vec::new(),
            candidates: Vec::new(),
            truncated: false,
        }
    }

    /// Returns true if this is a pattern leaf for which the store held no
    /// fact with the pattern's name.
    #[must_use]
    pub fn no_facts_named(&self) -> bool {
        self.kind == "pattern" && self.candidates.is_empty()
    }

    /// Pattern leaves that failed, depth first.
    #[must_use]
    pub fn failing_patterns(&self) -> Vec<&Explanation> {
        let mut out = Vec::new();
        self.collect_failing(&mut out);
        out
    }

    fn collect_failing<'a>(&'a self, out: &mut Vec<&'a Explanation>) {
        if self.kind == "pattern" && !self.matched {
            out.push(self);
        }
        for child in &self.children {
            child.collect_failing(out);
        }
    }

    /// Renders the tree as indented text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        let indent = "  ".repeat(self.depth);
        let status = if self.matched { "ok" } else { "fail" };
        let label = match self.kind {
            "pattern" => self.text.as_str(),
            kind => kind,
        };
        let _ = writeln!(out, "{indent}{label}: {status}");

        if self.no_facts_named() {
            let _ = writeln!(out, "{indent}  - no facts with this name");
        }
        for candidate in &self.candidates {
            let _ = match &candidate.verdict {
                CandidateVerdict::Matched => writeln!(out, "{indent}  - {} matched", candidate.fact),
                CandidateVerdict::ShapeSkipped { shape } => {
                    writeln!(out, "{indent}  - {} skipped ({shape})", candidate.fact)
                }
                CandidateVerdict::Rejected(failure) => {
                    writeln!(out, "{indent}  - {} rejected: {failure}", candidate.fact)
                }
            };
        }
        for child in &self.children {
            child.render_into(out);
        }
        if self.truncated {
            let _ = writeln!(out, "{indent}  ...");
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render().trim_end())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds an explanation tree from evaluation events.
struct ExplainObserver {
    max_depth: usize,
    stack: Vec<Explanation>,
    root: Option<Explanation>,
}

impl ExplainObserver {
    fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            stack: Vec::new(),
            root: None,
        }
    }

    fn candidate(&mut self, fact: FactId, verdict: CandidateVerdict) {
        if let Some(top) = self.stack.last_mut() {
            if top.kind == "pattern" {
                top.candidates.push(Candidate { fact, verdict });
            }
        }
    }
}

impl EvalObserver for ExplainObserver {
    fn node_entered(&mut self, node: &ConditionNode, depth: usize) {
        if depth > self.max_depth {
            if let Some(parent) = self.stack.last_mut() {
                parent.truncated = true;
            }
            return;
        }
        self.stack.push(Explanation::open(node, depth));
    }

    fn node_exited(&mut self, _node: &ConditionNode, depth: usize, matched: bool) {
        if depth > self.max_depth {
            return;
        }
        let Some(mut done) = self.stack.pop() else {
            return;
        };
        done.matched = matched;
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => self.root = Some(done),
        }
    }

    fn fact_skipped(&mut self, _pattern: &Pattern, fact: FactId, shape: FactShape) {
        self.candidate(fact, CandidateVerdict::ShapeSkipped { shape });
    }

    fn pattern_tried(
        &mut self,
        _pattern: &Pattern,
        fact: FactId,
        outcome: &Result<(), MatchFailure>,
    ) {
        let verdict = match outcome {
            Ok(()) => CandidateVerdict::Matched,
            Err(failure) => CandidateVerdict::Rejected(failure.clone()),
        };
        self.candidate(fact, verdict);
    }
}

/// Explains how `node` evaluates against `facts` from empty bindings.
#[must_use]
pub fn explain(node: &ConditionNode, facts: &FactStore) -> Explanation {
    explain_with_depth(node, facts, &BindingEnvironment::new(), usize::MAX)
}

/// Explains how `node` evaluates against `facts` from empty bindings,
/// cut off at the configured [`DebugConfig::explain_depth`].
#[must_use]
pub fn explain_with_config(
    node: &ConditionNode,
    facts: &FactStore,
    config: &DebugConfig,
) -> Explanation {
    explain_with_depth(node, facts, &BindingEnvironment::new(), config.explain_depth)
}

/// Explains an evaluation from the given bindings, keeping nodes no deeper
/// than `max_depth` (root = 0).
#[must_use]
pub fn explain_with_depth(
    node: &ConditionNode,
    facts: &FactStore,
    bindings: &BindingEnvironment,
    max_depth: usize,
) -> Explanation {
    let mut observer = ExplainObserver::new(max_depth);
    let mut state = MatchState::with_bindings(bindings.clone());
    let matched = node.evaluate_observed(facts, &mut state, &mut observer);
    debug!(node = node.kind_name(), matched, max_depth, "explanation built");
    observer.root.unwrap_or_else(|| {
        // Only reachable if the observer saw no root node.
        let mut root = Explanation::open(node, 0);
        root.matched = matched;
        root
    })
}
