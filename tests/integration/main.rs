//! Cross-layer integration tests for ruleweave
//!
//! Tests that verify correct interaction between multiple crates.

mod diagnostics;
mod properties;
mod scenarios;
