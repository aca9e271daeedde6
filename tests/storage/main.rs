//! Integration tests for Layer 1: Storage
//!
//! Tests for facts and the fact store.

mod facts;
