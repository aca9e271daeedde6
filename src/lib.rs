//! Ruleweave - Inference core of a forward-chaining rule engine
//!
//! This crate re-exports all layers of the ruleweave system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: ruleweave_debug      Evaluation tracing, match explanations
//! Layer 2: ruleweave_engine     Constraints, patterns, condition trees, rules
//! Layer 1: ruleweave_storage    Facts and the fact store
//! Layer 0: ruleweave_foundation Core types (Value, FactId, Error)
//! ```

pub use ruleweave_debug as debug;
pub use ruleweave_engine as engine;
pub use ruleweave_foundation as foundation;
pub use ruleweave_storage as storage;
