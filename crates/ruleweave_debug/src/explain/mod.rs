//! "Why (not)" explanations for condition trees.
//!
//! [`explain`] evaluates a condition tree exactly as the engine would and
//! returns an [`Explanation`] mirroring the nodes it visited: each node's
//! outcome and, for pattern leaves, the verdict on every candidate fact.
//! Alternatives an `Or` never reached do not appear.

pub mod tree;

pub use tree::{Candidate, CandidateVerdict, Explanation, explain, explain_with_config, explain_with_depth};
