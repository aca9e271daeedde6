//! Named, shape-tagged facts.
//!
//! A [`Fact`] is a closed sum over five payload shapes. Matching dispatches
//! on the shape tag, so no fact is ever viewed through a payload type it
//! does not have.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ruleweave_foundation::{Error, ExternalHandle, Result, Value, ValueKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Shape
// =============================================================================

/// The payload shape of a fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FactShape {
    /// Ordered sequence of values.
    List,
    /// Text keys to values.
    Mapping,
    /// De-duplicated, unordered values.
    Set,
    /// Exactly one value.
    Single,
    /// Opaque handle to a caller-managed object.
    ExternalRef,
}

impl fmt::Display for FactShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Mapping => write!(f, "mapping"),
            Self::Set => write!(f, "set"),
            Self::Single => write!(f, "single"),
            Self::ExternalRef => write!(f, "external-ref"),
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// The data a fact carries, in its shape-specific form.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Payload {
    /// Ordered values.
    List(Vec<Value>),
    /// Key-value pairs, iterated in key order.
    Mapping(BTreeMap<String, Value>),
    /// Distinct values, kept in first-seen order.
    Set(Vec<Value>),
    /// One value.
    Single(Value),
    /// Non-owning handle; never dereferenced by the engine.
    ExternalRef(ExternalHandle),
}

impl Payload {
    /// Returns the shape tag for this payload.
    #[must_use]
    pub const fn shape(&self) -> FactShape {
        match self {
            Self::List(_) => FactShape::List,
            Self::Mapping(_) => FactShape::Mapping,
            Self::Set(_) => FactShape::Set,
            Self::Single(_) => FactShape::Single,
            Self::ExternalRef(_) => FactShape::ExternalRef,
        }
    }

    /// Returns the value kind shared by every element, if any element exists.
    #[must_use]
    pub fn element_kind(&self) -> Option<ValueKind> {
        match self {
            Self::List(values) | Self::Set(values) => values.first().map(Value::kind),
            Self::Mapping(map) => map.values().next().map(Value::kind),
            Self::Single(value) => Some(value.kind()),
            Self::ExternalRef(_) => Some(ValueKind::ExternalRef),
        }
    }

    /// Number of elements (1 for single and external-ref payloads).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(values) | Self::Set(values) => values.len(),
            Self::Mapping(map) => map.len(),
            Self::Single(_) | Self::ExternalRef(_) => 1,
        }
    }

    /// Returns true if the payload holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every element has the same kind.
    fn check_homogeneous(&self) -> Result<()> {
        let mut values: Box<dyn Iterator<Item = &Value>> = match self {
            Self::List(values) | Self::Set(values) => Box::new(values.iter()),
            Self::Mapping(map) => Box::new(map.values()),
            Self::Single(_) | Self::ExternalRef(_) => return Ok(()),
        };
        let Some(expected) = values.next().map(Value::kind) else {
            return Ok(());
        };
        match values.find(|v| v.kind() != expected) {
            Some(odd) => Err(Error::type_mismatch(expected, odd.kind())),
            None => Ok(()),
        }
    }

    fn structurally_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            // Both sides are de-duplicated, so equal length plus containment
            // is order-independent equality.
            (Self::Set(a), Self::Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.equals(y)))
            }
            (Self::Single(a), Self::Single(b)) => a.equals(b),
            (Self::ExternalRef(a), Self::ExternalRef(b)) => a == b,
            _ => false,
        }
    }
}

fn dedup(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut distinct: Vec<Value> = Vec::new();
    for value in values {
        if !distinct.iter().any(|seen| seen.equals(&value)) {
            distinct.push(value);
        }
    }
    distinct
}

// =============================================================================
// Fact
// =============================================================================

/// A named, shape-tagged container of values.
///
/// Facts are deliberately not `Clone`: a fact is owned by its creator until
/// it is moved into a [`FactStore`](crate::FactStore), and by the store
/// afterwards. Updates are modelled as remove-then-insert.
///
/// The payload is homogeneous: every element has the same [`ValueKind`]
/// for the fact's whole lifetime.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "FactRepr"))]
pub struct Fact {
    name: Arc<str>,
    payload: Payload,
}

impl Fact {
    /// Creates a fact from an explicit payload.
    ///
    /// # Errors
    /// Returns a type mismatch if the payload mixes value kinds.
    pub fn new(name: impl Into<Arc<str>>, payload: Payload) -> Result<Self> {
        payload.check_homogeneous()?;
        Ok(Self {
            name: name.into(),
            payload,
        })
    }

    /// Creates a list fact.
    ///
    /// # Errors
    /// Returns a type mismatch if the values mix kinds.
    pub fn list<V: Into<Value>>(
        name: impl Into<Arc<str>>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        Self::new(
            name,
            Payload::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Creates a mapping fact.
    ///
    /// # Errors
    /// Returns a type mismatch if the values mix kinds.
    pub fn mapping<K: Into<String>, V: Into<Value>>(
        name: impl Into<Arc<str>>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self> {
        Self::new(
            name,
            Payload::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        )
    }

    /// Creates a set fact. Duplicate values are dropped.
    ///
    /// # Errors
    /// Returns a type mismatch if the values mix kinds.
    pub fn set<V: Into<Value>>(
        name: impl Into<Arc<str>>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        Self::new(name, Payload::Set(dedup(values.into_iter().map(Into::into))))
    }

    /// Creates a single-value fact.
    #[must_use]
    pub fn single(name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::Single(value.into()),
        }
    }

    /// Creates an external-reference fact.
    #[must_use]
    pub fn external(name: impl Into<Arc<str>>, handle: ExternalHandle) -> Self {
        Self {
            name: name.into(),
            payload: Payload::ExternalRef(handle),
        }
    }

    /// Returns the fact's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fact's shape.
    #[must_use]
    pub const fn shape(&self) -> FactShape {
        self.payload.shape()
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the kind shared by the payload's elements.
    #[must_use]
    pub fn element_kind(&self) -> Option<ValueKind> {
        self.payload.element_kind()
    }

    /// Returns the number of payload elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the payload holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The values a constraint searches existentially.
    ///
    /// `Some` for list, set, and single facts; `None` for mappings and
    /// external references.
    #[must_use]
    pub fn elements(&self) -> Option<&[Value]> {
        match &self.payload {
            Payload::List(values) | Payload::Set(values) => Some(values),
            Payload::Single(value) => Some(std::slice::from_ref(value)),
            Payload::Mapping(_) | Payload::ExternalRef(_) => None,
        }
    }

    /// Looks up a mapping attribute. `None` for other shapes.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        match &self.payload {
            Payload::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the list payload, if this is a list fact.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.payload {
            Payload::List(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the mapping payload, if this is a mapping fact.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match &self.payload {
            Payload::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the set payload, if this is a set fact.
    #[must_use]
    pub fn as_set(&self) -> Option<&[Value]> {
        match &self.payload {
            Payload::Set(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the value, if this is a single fact.
    #[must_use]
    pub fn as_single(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Single(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the handle, if this is an external-reference fact.
    #[must_use]
    pub fn as_external(&self) -> Option<ExternalHandle> {
        match &self.payload {
            Payload::ExternalRef(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Shape-aware structural equality: same name, same shape, same payload.
    /// Set payloads compare without regard to order.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.name == other.name && self.payload.structurally_equal(&other.payload)
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fact")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .finish()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ", self.name)?;
        match &self.payload {
            Payload::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, "]")?;
            }
            Payload::Set(values) => {
                write!(f, "#{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, "}}")?;
            }
            Payload::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} {v:?}")?;
                }
                write!(f, "}}")?;
            }
            Payload::Single(value) => write!(f, "{value:?}")?,
            Payload::ExternalRef(handle) => write!(f, "{handle}")?,
        }
        write!(f, ")")
    }
}

/// Unchecked wire form; converted through [`Fact::new`] so deserialized
/// facts keep the homogeneity invariant.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct FactRepr {
    name: Arc<str>,
    payload: Payload,
}

#[cfg(feature = "serde")]
impl TryFrom<FactRepr> for Fact {
    type Error = Error;

    fn try_from(repr: FactRepr) -> Result<Self> {
        let payload = match repr.payload {
            Payload::Set(values) => Payload::Set(dedup(values)),
            other => other,
        };
        Self::new(repr.name, payload)
    }
}
