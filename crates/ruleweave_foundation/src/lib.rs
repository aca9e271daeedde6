//! Core values, identifiers, and error types for ruleweave.
//!
//! This crate provides:
//! - [`Value`] - The closed set of scalar data carried by facts and constraints
//! - [`ValueKind`] - The variant tag of a [`Value`]
//! - [`FactId`] - Generational fact identities issued by a fact store
//! - [`ExternalHandle`] - Non-owning handles to caller-managed objects
//! - [`Error`] - Construction and lookup errors with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use id::{ExternalHandle, FactId};
pub use types::ValueKind;
pub use value::Value;

/// Result type alias using ruleweave's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
