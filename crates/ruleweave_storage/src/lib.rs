//! Typed facts and the fact store for ruleweave.
//!
//! This crate provides:
//! - [`Fact`] - A named container of values in one of five shapes
//! - [`FactShape`] / [`Payload`] - The shape tag and shape-specific data
//! - [`FactStore`] - Exclusive owner of the working set, queryable by name

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod fact;
pub mod store;

pub use fact::{Fact, FactShape, Payload};
pub use store::FactStore;
