//! Rules and rule sets.
//!
//! A [`Rule`] pairs a condition tree with opaque action handles. The engine
//! only decides whether the left-hand side holds; choosing which satisfied
//! rule fires, and running its actions, is the caller's business.

use std::fmt;
use std::sync::Arc;

use ruleweave_foundation::{FactId, Result};
use ruleweave_storage::FactStore;
use tracing::debug;

use crate::binding::BindingEnvironment;
use crate::condition::{ConditionNode, MatchState};
use crate::observer::{EvalObserver, NoopObserver};

// =============================================================================
// Action Handle
// =============================================================================

/// An opaque reference to a right-hand-side action.
///
/// The engine never interprets it; the caller maps handles to whatever it
/// executes on activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionHandle(pub u64);

impl fmt::Display for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

// =============================================================================
// Activation
// =============================================================================

/// A satisfied rule, ready for the caller's agenda.
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    /// Which rule
    pub rule: Arc<str>,
    /// Variable bindings from the match
    pub bindings: BindingEnvironment,
    /// Facts matched along the accepted path, in match order
    pub matched_facts: Vec<FactId>,
    /// The rule's actions, in declaration order
    pub actions: Vec<ActionHandle>,
}

// =============================================================================
// Rule
// =============================================================================

/// A named condition tree with actions.
#[derive(Clone, Debug)]
pub struct Rule {
    name: Arc<str>,
    lhs: ConditionNode,
    rhs: Vec<ActionHandle>,
}

impl Rule {
    /// Creates a rule with no actions.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, lhs: ConditionNode) -> Self {
        Self {
            name: name.into(),
            lhs,
            rhs: Vec::new(),
        }
    }

    /// Creates a rule from a fallibly built condition tree, tagging any
    /// construction error with the rule's name.
    ///
    /// # Errors
    /// Returns the condition tree's construction error.
    pub fn try_new(name: impl Into<Arc<str>>, lhs: Result<ConditionNode>) -> Result<Self> {
        let name = name.into();
        match lhs {
            Ok(lhs) => Ok(Self::new(name, lhs)),
            Err(mut err) => {
                let context = err.context.take().unwrap_or_default();
                Err(err.with_context(context.with_source(format!("rule {name}"))))
            }
        }
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action(mut self, action: ActionHandle) -> Self {
        self.rhs.push(action);
        self
    }

    /// Appends several actions.
    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = ActionHandle>) -> Self {
        self.rhs.extend(actions);
        self
    }

    /// The rule's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The left-hand side.
    #[must_use]
    pub fn lhs(&self) -> &ConditionNode {
        &self.lhs
    }

    /// The right-hand side action handles.
    #[must_use]
    pub fn rhs(&self) -> &[ActionHandle] {
        &self.rhs
    }

    /// Evaluates the left-hand side from empty bindings.
    ///
    /// Returns the outcome and, on success, the committed bindings. A
    /// failed evaluation returns empty bindings.
    #[must_use]
    pub fn is_satisfied(&self, facts: &FactStore) -> (bool, BindingEnvironment) {
        let (matched, state) = self.evaluate_observed(facts, &mut NoopObserver);
        if matched {
            (true, state.bindings)
        } else {
            (false, BindingEnvironment::new())
        }
    }

    /// Evaluates the rule and, if satisfied, returns its activation.
    #[must_use]
    pub fn activation(&self, facts: &FactStore) -> Option<Activation> {
        let (matched, state) = self.evaluate_observed(facts, &mut NoopObserver);
        matched.then(|| Activation {
            rule: Arc::clone(&self.name),
            matched_facts: state.matched_facts(),
            bindings: state.bindings,
            actions: self.rhs.clone(),
        })
    }

    /// Evaluates the left-hand side with an observer, returning the final
    /// state whether or not it matched.
    pub fn evaluate_observed(
        &self,
        facts: &FactStore,
        observer: &mut dyn EvalObserver,
    ) -> (bool, MatchState) {
        let mut state = MatchState::new();
        let matched = self.lhs.evaluate_observed(facts, &mut state, observer);
        debug!(
            rule = %self.name,
            matched,
            bindings = state.bindings.len(),
            "rule evaluated"
        );
        (matched, state)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(rule {} {})", self.name, self.lhs)
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// An ordered collection of rules.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule at the end.
    pub fn add(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Adds a rule, builder style.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.add(rule);
        self
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Looks a rule up by name. With duplicate names, the first wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Activations of every satisfied rule, in declaration order.
    #[must_use]
    pub fn satisfied(&self, facts: &FactStore) -> Vec<Activation> {
        self.rules
            .iter()
            .filter_map(|rule| rule.activation(facts))
            .collect()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
