//! Integration tests for Fact
//!
//! Tests shape-specific construction, the homogeneity invariant, and
//! structural equality.

use ruleweave_foundation::{ErrorKind, ExternalHandle, Value, ValueKind};
use ruleweave_storage::{Fact, FactShape, Payload};

// =============================================================================
// Construction
// =============================================================================

#[test]
fn each_shape_constructs() {
    assert_eq!(Fact::list("l", [1, 2]).unwrap().shape(), FactShape::List);
    assert_eq!(
        Fact::mapping("m", [("k", 1)]).unwrap().shape(),
        FactShape::Mapping
    );
    assert_eq!(Fact::set("s", [1]).unwrap().shape(), FactShape::Set);
    assert_eq!(Fact::single("one", 1).shape(), FactShape::Single);
    assert_eq!(
        Fact::external("ext", ExternalHandle::new(1)).shape(),
        FactShape::ExternalRef
    );
}

#[test]
fn mixed_kinds_are_rejected() {
    let err = Fact::new(
        "mixed",
        Payload::List(vec![Value::Integer(1), Value::Float(2.0)]),
    )
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: ValueKind::Integer,
            actual: ValueKind::Float
        }
    ));

    let err = Fact::mapping("m", [("a", Value::from("x")), ("b", Value::Boolean(true))]);
    assert!(err.is_err());
}

#[test]
fn element_kind_is_fixed() {
    let fact = Fact::list("names", ["Alice", "Bob"]).unwrap();
    assert_eq!(fact.element_kind(), Some(ValueKind::Text));
    assert_eq!(Fact::list::<i64>("empty", []).unwrap().element_kind(), None);
}

#[test]
fn sets_deduplicate_with_kind_checked_equality() {
    let fact = Fact::set("s", [1, 1, 2, 2, 3]).unwrap();
    assert_eq!(fact.len(), 3);
}

// =============================================================================
// Access
// =============================================================================

#[test]
fn shape_specific_access() {
    let list = Fact::list("users", ["Alice", "Bob"]).unwrap();
    assert_eq!(list.as_list().map(<[Value]>::len), Some(2));
    assert!(list.as_mapping().is_none());

    let mapping = Fact::mapping("person", [("age", 30)]).unwrap();
    assert_eq!(mapping.attribute("age"), Some(&Value::Integer(30)));
    assert_eq!(mapping.attribute("city"), None);
    assert!(mapping.elements().is_none());

    let single = Fact::single("flag", true);
    assert_eq!(single.elements(), Some(&[Value::Boolean(true)][..]));

    let ext = Fact::external("window", ExternalHandle::new(0xbeef));
    assert_eq!(ext.as_external(), Some(ExternalHandle::new(0xbeef)));
    assert!(ext.elements().is_none());
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn identically_built_facts_are_equal() {
    let a = Fact::mapping("person", [("age", 30), ("height", 180)]).unwrap();
    let b = Fact::mapping("person", [("height", 180), ("age", 30)]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn any_single_difference_breaks_equality() {
    let base = Fact::list("nums", [1, 2, 3]).unwrap();
    assert_ne!(base, Fact::list("other", [1, 2, 3]).unwrap());
    assert_ne!(base, Fact::set("nums", [1, 2, 3]).unwrap());
    assert_ne!(base, Fact::list("nums", [1, 2, 4]).unwrap());
    assert_ne!(base, Fact::list("nums", [3, 2, 1]).unwrap());
}

#[test]
fn set_equality_is_order_independent() {
    assert_eq!(
        Fact::set("s", ["a", "b", "c"]).unwrap(),
        Fact::set("s", ["c", "a", "b"]).unwrap()
    );
}

#[test]
fn display() {
    assert_eq!(
        Fact::list("users", ["Alice", "Bob"]).unwrap().to_string(),
        "(users [\"Alice\" \"Bob\"])"
    );
    assert_eq!(
        Fact::mapping("inventory", [("widget", 10)]).unwrap().to_string(),
        "(inventory {widget 10})"
    );
}
