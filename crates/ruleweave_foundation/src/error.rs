//! Errors raised while building facts and condition trees.
//!
//! Only construction and store lookups can fail; a pattern or condition
//! that does not match is an ordinary `false`, never an error.

use std::fmt;

use thiserror::Error;

use crate::id::FactId;
use crate::types::ValueKind;

/// A construction or store-lookup failure.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Rule and node path, when known.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// An error without context.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Replaces the context.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds a frame to this error's context, creating the context if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(node: &'static str, expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            node,
            expected,
            actual,
        })
    }

    /// Creates a fact not found error.
    #[must_use]
    pub fn fact_not_found(id: FactId) -> Self {
        Self::new(ErrorKind::FactNotFound(id))
    }

    /// Creates a stale fact reference error.
    #[must_use]
    pub fn stale_fact(id: FactId) -> Self {
        Self::new(ErrorKind::StaleFact(id))
    }
}

/// Failure categories.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A fact payload mixed value kinds.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The kind fixed by the payload's first element.
        expected: ValueKind,
        /// The offending element's kind.
        actual: ValueKind,
    },

    /// A condition node was built with the wrong number of children.
    #[error("arity mismatch: {node} takes {expected} child(ren), got {actual}")]
    ArityMismatch {
        /// The node kind being built.
        node: &'static str,
        /// Required number of children.
        expected: usize,
        /// Number of children supplied.
        actual: usize,
    },

    /// Fact id was never issued by this store.
    #[error("fact not found: {0:?}")]
    FactNotFound(FactId),

    /// Fact id refers to a fact that has since been removed.
    #[error("stale fact reference: {0:?}")]
    StaleFact(FactId),

    /// Broken internal invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Where in a rule definition an error was raised.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Rule or builder that raised the error.
    pub source: Option<String>,
    /// Path of condition nodes leading to the error, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// No source, empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the rule or builder.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a frame. Frames are pushed innermost first and displayed
    /// outermost first.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.insert(0, frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.stack.is_empty() {
            if self.source.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at {}", self.stack.join("/"))?;
        }
        Ok(())
    }
}
