//! Pattern matching of a single fact.
//!
//! A [`Pattern`] selects facts by name and runs its constraints, in
//! declaration order, against the fact's payload:
//!
//! - list, set, and single facts are searched existentially: a constraint
//!   holds if *some* element passes, and the first such element is bound;
//! - mapping facts are tested attribute by attribute: the constraint's
//!   attribute selects exactly one value, and an absent key fails;
//! - external-reference facts only match patterns without constraints.
//!
//! [`Pattern::check`] never looks at existing bindings: it binds what the
//! first satisfying element (or the selected attribute) holds, overwriting
//! earlier values. [`Pattern::check_conjunct`] is the form condition trees
//! use: the chosen values must agree with variables bound before the
//! pattern started, or the fact is rejected with
//! [`MatchFailure::BindingConflict`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use ruleweave_foundation::Value;
use ruleweave_storage::{Fact, FactShape, Payload};

use crate::binding::BindingEnvironment;
use crate::constraint::Constraint;

// =============================================================================
// Pattern
// =============================================================================

/// A fact-name selector plus an ordered list of constraints.
#[derive(Clone, Debug)]
pub struct Pattern {
    fact_name: Arc<str>,
    constraints: Vec<Constraint>,
    shape: Option<FactShape>,
}

impl Pattern {
    /// Create a pattern with no constraints.
    #[must_use]
    pub fn new(fact_name: impl Into<Arc<str>>) -> Self {
        Self {
            fact_name: fact_name.into(),
            constraints: Vec::new(),
            shape: None,
        }
    }

    /// Appends a constraint.
    #[must_use]
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends several constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Restricts the pattern to facts of one shape. Pattern leaves skip
    /// facts of any other shape.
    #[must_use]
    pub fn with_shape(mut self, shape: FactShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// The fact name this pattern selects.
    #[must_use]
    pub fn fact_name(&self) -> &str {
        &self.fact_name
    }

    /// The constraints, in evaluation order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The shape restriction, if any.
    #[must_use]
    pub fn shape(&self) -> Option<FactShape> {
        self.shape
    }

    /// Returns true if facts of `shape` are eligible for this pattern.
    #[must_use]
    pub fn accepts_shape(&self, shape: FactShape) -> bool {
        self.shape.is_none_or(|s| s == shape)
    }

    /// Variables bound by this pattern's constraints.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        self.constraints
            .iter()
            .filter_map(Constraint::binding)
            .collect()
    }

    /// Matches a fact, extending `bindings` on success.
    ///
    /// On failure `bindings` may hold bindings from constraints that
    /// succeeded before the failing one; callers that need rollback work
    /// on a clone.
    #[must_use]
    pub fn matches(&self, fact: &Fact, bindings: &mut BindingEnvironment) -> bool {
        self.check(fact, bindings).is_ok()
    }

    /// Like [`Pattern::matches`], reporting why a fact did not match.
    ///
    /// # Errors
    /// Returns the first reason the fact fails the pattern.
    pub fn check(&self, fact: &Fact, bindings: &mut BindingEnvironment) -> Result<(), MatchFailure> {
        if fact.name() != self.fact_name.as_ref() {
            return Err(MatchFailure::NameMismatch {
                expected: self.fact_name.to_string(),
                actual: fact.name().to_string(),
            });
        }

        if !self.accepts_shape(fact.shape()) {
            return Err(MatchFailure::ShapeExcluded {
                shape: fact.shape(),
            });
        }

        if self.constraints.is_empty() {
            return Ok(());
        }

        match fact.payload() {
            Payload::List(values) | Payload::Set(values) => self.check_elements(values, bindings),
            Payload::Single(value) => self.check_elements(std::slice::from_ref(value), bindings),
            Payload::Mapping(_) => self.check_attributes(fact, bindings),
            Payload::ExternalRef(_) => Err(MatchFailure::ConstraintsOnExternalRef),
        }
    }

    /// Matches a fact as one conjunct of a larger condition.
    ///
    /// Runs [`Pattern::check`] on a copy of `bindings`, then requires every
    /// variable this pattern binds to agree with its value in `bindings`, if
    /// it had one. `bindings` is only extended when both steps succeed.
    ///
    /// # Errors
    /// Returns the pattern's own failure, or the first binding conflict in
    /// variable-name order.
    pub fn check_conjunct(
        &self,
        fact: &Fact,
        bindings: &mut BindingEnvironment,
    ) -> Result<(), MatchFailure> {
        let mut candidate = bindings.clone();
        self.check(fact, &mut candidate)?;

        for var in self.variables() {
            let Some(found) = candidate.get(var) else {
                continue;
            };
            if !bindings.is_consistent(var, found) {
                return Err(MatchFailure::BindingConflict {
                    variable: var.to_string(),
                    bound: bindings.get(var).cloned().unwrap_or_else(|| found.clone()),
                    found: found.clone(),
                });
            }
        }

        *bindings = candidate;
        Ok(())
    }

    fn check_elements(
        &self,
        elements: &[Value],
        bindings: &mut BindingEnvironment,
    ) -> Result<(), MatchFailure> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            let Some(element) = elements.iter().find(|e| constraint.accepts(e)) else {
                return Err(MatchFailure::NoElementSatisfied { constraint: index });
            };
            Self::record(constraint, element, bindings);
        }
        Ok(())
    }

    fn check_attributes(
        &self,
        fact: &Fact,
        bindings: &mut BindingEnvironment,
    ) -> Result<(), MatchFailure> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            let Some(value) = constraint.attribute().and_then(|key| fact.attribute(key)) else {
                return Err(MatchFailure::MissingAttribute {
                    constraint: index,
                    attribute: constraint.attribute().map(String::from),
                });
            };

            if !constraint.accepts(value) {
                return Err(MatchFailure::AttributeRejected {
                    constraint: index,
                    attribute: constraint.attribute().unwrap_or_default().to_string(),
                });
            }

            Self::record(constraint, value, bindings);
        }
        Ok(())
    }

    fn record(constraint: &Constraint, value: &Value, bindings: &mut BindingEnvironment) {
        if let Some(var) = constraint.binding_arc() {
            bindings.bind(Arc::clone(var), value.clone());
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.fact_name)?;
        if let Some(shape) = self.shape {
            write!(f, " :{shape}")?;
        }
        for constraint in &self.constraints {
            write!(f, " [{constraint}]")?;
        }
        write!(f, ")")
    }
}

// =============================================================================
// Match Failure
// =============================================================================

/// Reason why a fact failed to match a pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchFailure {
    /// The fact's name differs from the pattern's.
    NameMismatch {
        /// The pattern's fact name.
        expected: String,
        /// The fact's name.
        actual: String,
    },

    /// The pattern is restricted to another shape.
    ShapeExcluded {
        /// The fact's shape.
        shape: FactShape,
    },

    /// External-reference facts only match constraint-free patterns.
    ConstraintsOnExternalRef,

    /// No element of a list, set, or single fact satisfied a constraint.
    NoElementSatisfied {
        /// Index of the failing constraint (0-based).
        constraint: usize,
    },

    /// A mapping fact lacks the constraint's attribute.
    MissingAttribute {
        /// Index of the failing constraint (0-based).
        constraint: usize,
        /// The attribute looked up (`None` if the constraint names none).
        attribute: Option<String>,
    },

    /// A mapping attribute was present but failed the test.
    AttributeRejected {
        /// Index of the failing constraint (0-based).
        constraint: usize,
        /// The attribute tested.
        attribute: String,
    },

    /// A conjunct chose a value that disagrees with an earlier binding.
    BindingConflict {
        /// The variable name.
        variable: String,
        /// The previously bound value.
        bound: Value,
        /// The value that conflicted.
        found: Value,
    },
}

impl MatchFailure {
    /// A short name for the failure kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::NameMismatch { .. } => "name-mismatch",
            Self::ShapeExcluded { .. } => "shape-excluded",
            Self::ConstraintsOnExternalRef => "constraints-on-external-ref",
            Self::NoElementSatisfied { .. } => "no-element-satisfied",
            Self::MissingAttribute { .. } => "missing-attribute",
            Self::AttributeRejected { .. } => "attribute-rejected",
            Self::BindingConflict { .. } => "binding-conflict",
        }
    }
}

impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMismatch { expected, actual } => {
                write!(f, "fact named {actual}, pattern wants {expected}")
            }
            Self::ShapeExcluded { shape } => write!(f, "{shape} facts are excluded"),
            Self::ConstraintsOnExternalRef => {
                write!(f, "external-ref facts cannot satisfy constraints")
            }
            Self::NoElementSatisfied { constraint } => {
                write!(f, "no element satisfied constraint #{constraint}")
            }
            Self::MissingAttribute {
                constraint,
                attribute: Some(attribute),
            } => write!(f, "constraint #{constraint}: attribute {attribute} absent"),
            Self::MissingAttribute {
                constraint,
                attribute: None,
            } => write!(f, "constraint #{constraint} names no attribute"),
            Self::AttributeRejected {
                constraint,
                attribute,
            } => write!(f, "constraint #{constraint}: attribute {attribute} rejected"),
            Self::BindingConflict {
                variable,
                bound,
                found,
            } => write!(f, "?{variable} is bound to {bound:?}, found {found:?}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
