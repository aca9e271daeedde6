//! Evaluation tracing and match explanations for ruleweave.
//!
//! This crate provides:
//! - [`Tracer`] - Records condition evaluation into a ring buffer
//! - [`explain`](explain::explain) - "Why not" trees for condition evaluation
//! - [`DebugConfig`] - Settings shared by both

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod explain;
pub mod trace;

pub use config::DebugConfig;
pub use explain::{
    Candidate, CandidateVerdict, Explanation, explain, explain_with_config,
    explain_with_depth,
};
pub use trace::{
    HumanFormatter, JsonFormatter, TraceBuffer, TraceBufferStats, TraceEvent, TraceFormatter,
    TraceOutput, TraceRecord, Tracer, TracerConfig,
};
