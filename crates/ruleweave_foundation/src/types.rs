//! Kind tags for values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The active variant of a [`Value`](crate::Value).
///
/// Used to enforce payload homogeneity inside a fact and to report
/// mismatches when a fact is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point.
    Float,
    /// Boolean.
    Boolean,
    /// UTF-8 text.
    Text,
    /// Opaque handle to a caller-managed object.
    ExternalRef,
}

impl ValueKind {
    /// All kinds, in declaration order.
    pub const ALL: [ValueKind; 5] = [
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Text,
        Self::ExternalRef,
    ];

    /// Returns true for the numeric kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Returns the lowercase name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::ExternalRef => "external-ref",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
