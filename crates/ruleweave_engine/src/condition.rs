//! Condition trees: AND / OR / NOT over pattern leaves.
//!
//! Evaluation is a synchronous walk of the tree against a borrowed
//! [`FactStore`]. Bindings flow through a [`MatchState`]:
//!
//! - `And` threads one state through its children, left to right;
//! - `Or` runs each alternative on a clone of the incoming state and keeps
//!   the first that succeeds;
//! - `Not` runs its child on a clone and always discards it;
//! - a pattern leaf tries each fact with the pattern's name, each on a
//!   clone, and keeps the first whose chosen bindings agree with the ones
//!   already made (see [`Pattern::check_conjunct`]).
//!
//! Failed branches therefore never leak bindings.

use std::collections::BTreeSet;
use std::fmt;

use ruleweave_foundation::{Error, FactId, Result};
use ruleweave_storage::FactStore;
use tracing::trace;

use crate::binding::BindingEnvironment;
use crate::observer::{EvalObserver, NoopObserver};
use crate::pattern::Pattern;

// =============================================================================
// Match State
// =============================================================================

/// Bindings plus the facts matched along the accepted path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchState {
    /// Variable bindings.
    pub bindings: BindingEnvironment,
    /// Facts matched by pattern leaves, in match order.
    pub matched: im::Vector<FactId>,
}

impl MatchState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state seeded with existing bindings.
    #[must_use]
    pub fn with_bindings(bindings: BindingEnvironment) -> Self {
        Self {
            bindings,
            matched: im::Vector::new(),
        }
    }

    /// The matched facts as a plain vector.
    #[must_use]
    pub fn matched_facts(&self) -> Vec<FactId> {
        self.matched.iter().copied().collect()
    }
}

// =============================================================================
// Condition Node
// =============================================================================

/// A rule's left-hand side.
///
/// The tree owns its children and is immutable once built. `Not` holds
/// exactly one child by construction; [`ConditionNode::not_of`] is the
/// checked constructor for callers holding a child list.
#[derive(Clone, Debug)]
pub enum ConditionNode {
    /// All children must hold under one assignment. Empty succeeds.
    And(Vec<ConditionNode>),
    /// Some child must hold. Empty fails.
    Or(Vec<ConditionNode>),
    /// The child must not hold.
    Not(Box<ConditionNode>),
    /// Some fact in the store must match the pattern.
    Pattern(Pattern),
}

impl ConditionNode {
    /// Builds an `And` node.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = ConditionNode>) -> Self {
        Self::And(children.into_iter().collect())
    }

    /// Builds an `Or` node.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = ConditionNode>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// Builds a `Not` node.
    #[must_use]
    pub fn not(child: ConditionNode) -> Self {
        Self::Not(Box::new(child))
    }

    /// Builds a pattern leaf.
    #[must_use]
    pub fn pattern(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }

    /// Builds a `Not` node from a child list.
    ///
    /// # Errors
    /// Returns an arity mismatch unless exactly one child is given.
    pub fn not_of(children: impl IntoIterator<Item = ConditionNode>) -> Result<Self> {
        let mut children: Vec<_> = children.into_iter().collect();
        if children.len() != 1 {
            return Err(Error::arity_mismatch("not", 1, children.len()).in_frame("not"));
        }
        match children.pop() {
            Some(child) => Ok(Self::not(child)),
            None => Err(Error::arity_mismatch("not", 1, 0).in_frame("not")),
        }
    }

    /// Builds an `And` node from fallible children, recording the
    /// failing child's position in the error context.
    ///
    /// # Errors
    /// Returns the first child's construction error.
    pub fn try_and(children: impl IntoIterator<Item = Result<ConditionNode>>) -> Result<Self> {
        Self::collect_children(children, "and").map(Self::And)
    }

    /// Builds an `Or` node from fallible children.
    ///
    /// # Errors
    /// Returns the first child's construction error.
    pub fn try_or(children: impl IntoIterator<Item = Result<ConditionNode>>) -> Result<Self> {
        Self::collect_children(children, "or").map(Self::Or)
    }

    fn collect_children(
        children: impl IntoIterator<Item = Result<ConditionNode>>,
        label: &str,
    ) -> Result<Vec<ConditionNode>> {
        children
            .into_iter()
            .enumerate()
            .map(|(i, child)| child.map_err(|e| e.in_frame(format!("{label}[{i}]"))))
            .collect()
    }

    /// A short name for the node kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::Pattern(_) => "pattern",
        }
    }

    /// The node's children (a leaf has none).
    #[must_use]
    pub fn children(&self) -> &[ConditionNode] {
        match self {
            Self::And(children) | Self::Or(children) => children,
            Self::Not(child) => std::slice::from_ref(child.as_ref()),
            Self::Pattern(_) => &[],
        }
    }

    /// Height of the tree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Number of pattern leaves.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        match self {
            Self::Pattern(_) => 1,
            _ => self.children().iter().map(Self::pattern_count).sum(),
        }
    }

    /// Every variable any pattern in the tree can bind.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        match self {
            Self::Pattern(pattern) => pattern.variables(),
            _ => self
                .children()
                .iter()
                .flat_map(Self::variables)
                .collect(),
        }
    }

    /// Evaluates the tree, extending `bindings` along the accepted path.
    ///
    /// On success `bindings` holds the committed assignment. On failure it
    /// holds whatever the failing path had committed before failing;
    /// callers wanting rollback evaluate against a clone.
    pub fn evaluate(&self, facts: &FactStore, bindings: &mut BindingEnvironment) -> bool {
        let mut state = MatchState::with_bindings(std::mem::take(bindings));
        let matched = self.evaluate_observed(facts, &mut state, &mut NoopObserver);
        *bindings = state.bindings;
        matched
    }

    /// Evaluates the tree with full state and an observer.
    pub fn evaluate_observed(
        &self,
        facts: &FactStore,
        state: &mut MatchState,
        observer: &mut dyn EvalObserver,
    ) -> bool {
        self.eval(facts, state, observer, 0)
    }

    fn eval(
        &self,
        facts: &FactStore,
        state: &mut MatchState,
        observer: &mut dyn EvalObserver,
        depth: usize,
    ) -> bool {
        observer.node_entered(self, depth);

        let matched = match self {
            Self::And(children) => children
                .iter()
                .all(|child| child.eval(facts, state, observer, depth + 1)),
            Self::Or(children) => {
                let base = state.clone();
                let mut accepted = false;
                for child in children {
                    let mut branch = base.clone();
                    if child.eval(facts, &mut branch, observer, depth + 1) {
                        *state = branch;
                        accepted = true;
                        break;
                    }
                }
                accepted
            }
            Self::Not(child) => {
                let mut scratch = state.clone();
                !child.eval(facts, &mut scratch, observer, depth + 1)
            }
            Self::Pattern(pattern) => Self::eval_leaf(pattern, facts, state, observer),
        };

        trace!(node = self.kind_name(), depth, matched, "condition evaluated");
        observer.node_exited(self, depth, matched);
        matched
    }

    fn eval_leaf(
        pattern: &Pattern,
        facts: &FactStore,
        state: &mut MatchState,
        observer: &mut dyn EvalObserver,
    ) -> bool {
        for (id, fact) in facts.facts_named_with_ids(pattern.fact_name()) {
            if !pattern.accepts_shape(fact.shape()) {
                observer.fact_skipped(pattern, id, fact.shape());
                continue;
            }

            let outcome = pattern.check_conjunct(fact, &mut state.bindings);
            trace!(fact = %id, matched = outcome.is_ok(), "pattern tried");
            observer.pattern_tried(pattern, id, &outcome);

            if outcome.is_ok() {
                state.matched.push_back(id);
                return true;
            }
        }
        false
    }
}

impl From<Pattern> for ConditionNode {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => write!(f, "{pattern}"),
            Self::Not(child) => write!(f, "(not {child})"),
            Self::And(children) | Self::Or(children) => {
                write!(f, "({}", self.kind_name())?;
                for child in children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
