//! Fact identities and external handles.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fact identifier with generational index for stale reference detection.
///
/// The generation counter increments when a slot is reused after its fact
/// was removed, so an id kept past removal never resolves to a newer fact.
///
/// # Layout
/// - `index`: slot in the owning fact store
/// - `generation`: 32-bit generation counter (odd while the slot is occupied)
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactId {
    /// Slot index in the store.
    pub index: u64,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl FactId {
    /// Creates a fact id with the given index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Debug for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fact({})", self.index)
    }
}

/// Non-owning handle to an object whose lifetime the caller manages.
///
/// The engine never dereferences a handle; it only compares handles for
/// identity. The caller guarantees the referent outlives any evaluation
/// that reads a fact or value carrying the handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExternalHandle(u64);

impl ExternalHandle {
    /// Wraps a caller-assigned raw handle.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ExternalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalHandle({:#x})", self.0)
    }
}

impl fmt::Display for ExternalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{:#x}", self.0)
    }
}
