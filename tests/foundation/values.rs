//! Integration tests for Value
//!
//! Tests construction, kind-checked equality, ordering, and display.

use ruleweave_foundation::{ExternalHandle, Value, ValueKind};
use std::sync::Arc;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn value_from_conversions() {
    assert_eq!(Value::from(42_i64), Value::Integer(42));
    assert_eq!(Value::from(42_i32), Value::Integer(42));
    assert_eq!(Value::from(1.5), Value::Float(1.5));
    assert_eq!(Value::from(true), Value::Boolean(true));
    assert_eq!(Value::from("hi"), Value::Text(Arc::from("hi")));
    assert_eq!(Value::from(String::from("hi")), Value::Text(Arc::from("hi")));
    assert_eq!(
        Value::from(ExternalHandle::new(9)),
        Value::ExternalRef(ExternalHandle::new(9))
    );
}

#[test]
fn value_kinds() {
    assert_eq!(Value::Integer(1).kind(), ValueKind::Integer);
    assert_eq!(Value::Float(1.0).kind(), ValueKind::Float);
    assert_eq!(Value::Boolean(false).kind(), ValueKind::Boolean);
    assert_eq!(Value::from("x").kind(), ValueKind::Text);
    assert_eq!(
        Value::ExternalRef(ExternalHandle::new(1)).kind(),
        ValueKind::ExternalRef
    );
}

#[test]
fn accessors_are_kind_exact() {
    let v = Value::Integer(7);
    assert_eq!(v.as_int(), Some(7));
    assert_eq!(v.as_float(), None);
    assert_eq!(v.as_str(), None);
    assert!(v.is_numeric());
    assert!(!Value::from("7").is_numeric());
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn integer_and_float_are_never_equal() {
    assert!(!Value::Integer(3).equals(&Value::Float(3.0)));
    assert_ne!(Value::Integer(3), Value::Float(3.0));
}

#[test]
fn cross_kind_equality_is_false_not_error() {
    let values = [
        Value::Integer(1),
        Value::Float(1.0),
        Value::Boolean(true),
        Value::from("1"),
        Value::ExternalRef(ExternalHandle::new(1)),
    ];
    for (i, a) in values.iter().enumerate() {
        for (j, b) in values.iter().enumerate() {
            assert_eq!(a.equals(b), i == j, "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn nan_follows_ieee() {
    let nan = Value::Float(f64::NAN);
    assert!(!nan.equals(&nan));
    assert!(Value::Float(0.0).equals(&Value::Float(-0.0)));
}

#[test]
fn external_refs_compare_by_identity() {
    let a = Value::ExternalRef(ExternalHandle::new(0x10));
    let b = Value::ExternalRef(ExternalHandle::new(0x10));
    let c = Value::ExternalRef(ExternalHandle::new(0x20));
    assert!(a.equals(&b));
    assert!(!a.equals(&c));
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn ordering_within_kind_only() {
    assert!(Value::Integer(1) < Value::Integer(2));
    assert!(Value::from("a") < Value::from("b"));
    assert_eq!(Value::Integer(1).partial_cmp(&Value::Float(2.0)), None);
    assert_eq!(Value::from("a").partial_cmp(&Value::Integer(0)), None);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_and_debug() {
    assert_eq!(Value::from("Bob").to_string(), "Bob");
    assert_eq!(format!("{:?}", Value::from("Bob")), "\"Bob\"");
    assert_eq!(Value::Integer(10).to_string(), "10");
    assert_eq!(ValueKind::ExternalRef.to_string(), "external-ref");
}
