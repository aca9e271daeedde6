//! Integration tests for Error
//!
//! Tests error kinds, context, and messages.

use ruleweave_foundation::{Error, ErrorContext, ErrorKind, FactId, ValueKind};

#[test]
fn type_mismatch_message() {
    let err = Error::type_mismatch(ValueKind::Integer, ValueKind::Text);
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: ValueKind::Integer,
            actual: ValueKind::Text
        }
    ));
    assert!(err.to_string().contains("expected integer, got text"));
}

#[test]
fn arity_mismatch_message() {
    let err = Error::arity_mismatch("not", 1, 3);
    assert!(err.to_string().contains("not takes 1 child(ren), got 3"));
}

#[test]
fn fact_lookup_errors() {
    let id = FactId::new(4, 2);
    assert!(matches!(Error::fact_not_found(id).kind, ErrorKind::FactNotFound(x) if x == id));
    assert!(matches!(Error::stale_fact(id).kind, ErrorKind::StaleFact(x) if x == id));
}

#[test]
fn frames_accumulate_outermost_first() {
    let err = Error::arity_mismatch("not", 1, 0)
        .in_frame("not")
        .in_frame("or[2]")
        .in_frame("and[0]");
    let context = err.context.unwrap();
    assert_eq!(context.stack, vec!["and[0]", "or[2]", "not"]);
}

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_source("rule check-stock")
        .with_frame("not")
        .with_frame("and[1]");
    assert_eq!(context.to_string(), "in rule check-stock at and[1]/not");
    assert_eq!(ErrorContext::new().with_frame("x").to_string(), "at x");
}
