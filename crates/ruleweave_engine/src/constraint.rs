//! Single-value tests used by patterns.
//!
//! A [`Constraint`] tests one element of a list, set, or single fact, or
//! one attribute of a mapping fact. The test is either a literal value
//! compared for kind-checked equality, or a named [`Predicate`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ruleweave_foundation::{Value, ValueKind};

// =============================================================================
// Predicate
// =============================================================================

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A named, caller-supplied test over a single value.
///
/// Predicates must be total (never panic for any value they may receive)
/// and deterministic within an evaluation.
///
/// Cloning shares the function. The function is only ever called through
/// `&self`, so clones of a pattern or rule share it read-only and never
/// observe each other.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    func: Arc<PredicateFn>,
}

impl Predicate {
    /// Creates a predicate from a name and a function.
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the predicate's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the predicate.
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        (self.func)(value)
    }

    fn ordered(op: &str, threshold: Value, accept: fn(Ordering) -> bool) -> Self {
        let name = format!("{op} {threshold:?}");
        Self::new(name, move |value| {
            value.partial_cmp(&threshold).is_some_and(accept)
        })
    }

    /// Values of the threshold's kind strictly greater than it.
    #[must_use]
    pub fn greater_than(threshold: impl Into<Value>) -> Self {
        Self::ordered(">", threshold.into(), Ordering::is_gt)
    }

    /// Values of the threshold's kind strictly less than it.
    #[must_use]
    pub fn less_than(threshold: impl Into<Value>) -> Self {
        Self::ordered("<", threshold.into(), Ordering::is_lt)
    }

    /// Values of the threshold's kind greater than or equal to it.
    #[must_use]
    pub fn at_least(threshold: impl Into<Value>) -> Self {
        Self::ordered(">=", threshold.into(), Ordering::is_ge)
    }

    /// Values of the threshold's kind less than or equal to it.
    #[must_use]
    pub fn at_most(threshold: impl Into<Value>) -> Self {
        Self::ordered("<=", threshold.into(), Ordering::is_le)
    }

    /// Values not equal to `other` (including values of other kinds).
    #[must_use]
    pub fn not_equal(other: impl Into<Value>) -> Self {
        let other = other.into();
        let name = format!("!= {other:?}");
        Self::new(name, move |value| !value.equals(&other))
    }

    /// Values of the given kind.
    #[must_use]
    pub fn kind_is(kind: ValueKind) -> Self {
        Self::new(format!("kind {kind}"), move |value| value.kind() == kind)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

// =============================================================================
// Constraint
// =============================================================================

/// What a constraint checks a value against.
#[derive(Clone, Debug)]
pub enum ConstraintTest {
    /// Kind-checked equality with a literal.
    Literal(Value),
    /// A caller-supplied predicate.
    Predicate(Predicate),
}

impl ConstraintTest {
    /// Runs the test, before negation.
    #[must_use]
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Self::Literal(literal) => literal.equals(value),
            Self::Predicate(predicate) => predicate.test(value),
        }
    }
}

impl fmt::Display for ConstraintTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "== {value:?}"),
            Self::Predicate(predicate) => write!(f, "{}", predicate.name()),
        }
    }
}

/// A single test against one element or attribute of a fact.
#[derive(Clone, Debug)]
pub struct Constraint {
    attribute: Option<String>,
    test: ConstraintTest,
    bind: Option<Arc<str>>,
    negate: bool,
}

impl Constraint {
    /// Creates a constraint from an explicit test.
    #[must_use]
    pub fn new(test: ConstraintTest) -> Self {
        Self {
            attribute: None,
            test,
            bind: None,
            negate: false,
        }
    }

    /// A constraint satisfied by values equal to `value`.
    #[must_use]
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::new(ConstraintTest::Literal(value.into()))
    }

    /// A constraint satisfied by values accepted by `predicate`.
    #[must_use]
    pub fn satisfies(predicate: Predicate) -> Self {
        Self::new(ConstraintTest::Predicate(predicate))
    }

    /// Selects the mapping attribute to test. Ignored for non-mapping facts.
    #[must_use]
    pub fn on(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Records the matched value under `var`.
    #[must_use]
    pub fn bind(mut self, var: impl Into<Arc<str>>) -> Self {
        self.bind = Some(var.into());
        self
    }

    /// Inverts the test outcome.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// The mapping attribute this constraint selects, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// The test.
    #[must_use]
    pub fn test(&self) -> &ConstraintTest {
        &self.test
    }

    /// The variable this constraint binds, if any.
    #[must_use]
    pub fn binding(&self) -> Option<&str> {
        self.bind.as_deref()
    }

    /// Whether the test outcome is inverted.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// Runs the test and applies negation.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.test.check(value) != self.negate
    }

    pub(crate) fn binding_arc(&self) -> Option<&Arc<str>> {
        self.bind.as_ref()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(attribute) = &self.attribute {
            write!(f, ":{attribute} ")?;
        }
        if self.negate {
            write!(f, "not ")?;
        }
        write!(f, "{}", self.test)?;
        if let Some(var) = &self.bind {
            write!(f, " -> ?{var}")?;
        }
        Ok(())
    }
}
