//! Variable bindings produced by pattern matching.

use std::fmt;
use std::sync::Arc;

use ruleweave_foundation::Value;

/// A mapping from variable name to the value it was bound to.
///
/// Backed by a persistent ordered map, so cloning is O(1). Alternative
/// branches (OR, NOT, candidate facts) each work on a clone and only the
/// accepted branch is written back.
#[derive(Clone, Default, PartialEq)]
pub struct BindingEnvironment {
    values: im::OrdMap<Arc<str>, Value>,
}

impl BindingEnvironment {
    /// Create empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding by variable name.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&Value> {
        self.values.get(var)
    }

    /// Returns true if the variable is bound.
    #[must_use]
    pub fn contains(&self, var: &str) -> bool {
        self.values.contains_key(var)
    }

    /// Bind a variable, replacing any previous value.
    pub fn bind(&mut self, var: impl Into<Arc<str>>, value: Value) {
        self.values.insert(var.into(), value);
    }

    /// Returns true if binding `var` to `value` agrees with the current
    /// assignment (the variable is unbound, or bound to an equal value).
    #[must_use]
    pub fn is_consistent(&self, var: &str, value: &Value) -> bool {
        self.get(var).is_none_or(|bound| bound.equals(value))
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate all bindings in variable-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Convert to name/value pairs in variable-name order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl fmt::Debug for BindingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for BindingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?{var}={value:?}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<Arc<str>>> FromIterator<(K, Value)> for BindingEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (var, value) in iter {
            env.bind(var, value);
        }
        env
    }
}
