//! Pattern matching and condition evaluation for ruleweave.
//!
//! This crate provides:
//! - [`Constraint`] and [`Predicate`] - Single-value tests with optional binding
//! - [`Pattern`] - Fact-name selectors with ordered constraints
//! - [`BindingEnvironment`] - Variable bindings produced by a match
//! - [`ConditionNode`] - AND / OR / NOT trees over patterns
//! - [`Rule`] and [`RuleSet`] - Named condition trees with opaque actions
//! - [`EvalObserver`] - Hooks for tracing evaluation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod condition;
pub mod constraint;
pub mod observer;
pub mod pattern;
pub mod rule;

pub use binding::BindingEnvironment;
pub use condition::{ConditionNode, MatchState};
pub use constraint::{Constraint, ConstraintTest, Predicate};
pub use observer::{CountingObserver, EvalObserver, NoopObserver};
pub use pattern::{MatchFailure, Pattern};
pub use rule::{ActionHandle, Activation, Rule, RuleSet};
