//! Integration tests for Pattern matching
//!
//! Tests existential semantics over collections, attribute semantics over
//! mappings, and external references.

use ruleweave_engine::{BindingEnvironment, Constraint, MatchFailure, Pattern, Predicate};
use ruleweave_foundation::{ExternalHandle, Value, ValueKind};
use ruleweave_storage::{Fact, FactShape};

fn matches(pattern: &Pattern, fact: &Fact) -> bool {
    pattern.matches(fact, &mut BindingEnvironment::new())
}

// =============================================================================
// Name and empty patterns
// =============================================================================

#[test]
fn name_must_match_exactly() {
    let pattern = Pattern::new("users");
    assert!(matches(&pattern, &Fact::list("users", ["x"]).unwrap()));
    assert!(!matches(&pattern, &Fact::list("Users", ["x"]).unwrap()));
    assert!(!matches(&pattern, &Fact::list("user", ["x"]).unwrap()));
}

#[test]
fn empty_pattern_matches_every_shape_and_empty_payloads() {
    let pattern = Pattern::new("f");
    assert!(matches(&pattern, &Fact::list::<i64>("f", []).unwrap()));
    assert!(matches(&pattern, &Fact::mapping::<&str, i64>("f", []).unwrap()));
    assert!(matches(&pattern, &Fact::set::<bool>("f", []).unwrap()));
    assert!(matches(&pattern, &Fact::single("f", 0)));
    assert!(matches(&pattern, &Fact::external("f", ExternalHandle::new(1))));
}

// =============================================================================
// Collections
// =============================================================================

#[test]
fn existential_over_list_and_set() {
    let pattern = Pattern::new("nums").with(Constraint::equals(5));
    assert!(matches(&pattern, &Fact::list("nums", [1, 5, 9]).unwrap()));
    assert!(!matches(&pattern, &Fact::list("nums", [1, 2, 9]).unwrap()));
    assert!(matches(&pattern, &Fact::set("nums", [9, 5, 1]).unwrap()));
    assert!(!matches(&pattern, &Fact::set("nums", [1, 2, 9]).unwrap()));
}

#[test]
fn each_constraint_may_use_a_different_element() {
    let pattern = Pattern::new("users")
        .with(Constraint::equals("Alice").bind("first"))
        .with(Constraint::equals("Bob").bind("second"));
    let mut env = BindingEnvironment::new();
    assert!(pattern.matches(&Fact::list("users", ["Bob", "Alice"]).unwrap(), &mut env));
    assert_eq!(env.get("first"), Some(&Value::from("Alice")));
    assert_eq!(env.get("second"), Some(&Value::from("Bob")));
}

#[test]
fn binds_first_satisfying_element() {
    let pattern = Pattern::new("nums")
        .with(Constraint::satisfies(Predicate::greater_than(2)).bind("big"));
    let mut env = BindingEnvironment::new();
    assert!(pattern.matches(&Fact::list("nums", [1, 3, 7]).unwrap(), &mut env));
    assert_eq!(env.get("big"), Some(&Value::Integer(3)));
}

#[test]
fn negated_constraint_finds_a_non_matching_element() {
    let pattern = Pattern::new("users").with(Constraint::equals("Bob").negated().bind("other"));
    let mut env = BindingEnvironment::new();
    assert!(pattern.matches(&Fact::list("users", ["Bob", "Alice"]).unwrap(), &mut env));
    assert_eq!(env.get("other"), Some(&Value::from("Alice")));
    assert!(!matches(&pattern, &Fact::list("users", ["Bob"]).unwrap()));
}

#[test]
fn kind_mismatch_is_non_match() {
    let pattern = Pattern::new("nums").with(Constraint::equals(3.0));
    assert!(!matches(&pattern, &Fact::list("nums", [1, 2, 3]).unwrap()));
}

#[test]
fn single_fact_behaves_like_one_element() {
    let pattern = Pattern::new("temp").with(Constraint::satisfies(Predicate::at_least(20.0)));
    assert!(matches(&pattern, &Fact::single("temp", 21.5)));
    assert!(!matches(&pattern, &Fact::single("temp", 19.0)));
}

// =============================================================================
// Mappings
// =============================================================================

#[test]
fn mapping_attribute_semantics() {
    let pattern = Pattern::new("person").with(Constraint::equals(30).on("age"));
    assert!(matches(
        &pattern,
        &Fact::mapping("person", [("age", Value::Integer(30))]).unwrap()
    ));
    assert!(!matches(
        &pattern,
        &Fact::mapping("person", [("city", "X")]).unwrap()
    ));
    assert!(!matches(&pattern, &Fact::mapping("person", [("age", 31)]).unwrap()));
}

#[test]
fn mapping_constraints_each_bind() {
    let integer = || Constraint::satisfies(Predicate::kind_is(ValueKind::Integer));
    let pattern = Pattern::new("point")
        .with(integer().on("x").bind("x"))
        .with(integer().on("y").bind("y"));
    let mut env = BindingEnvironment::new();
    assert!(pattern.matches(&Fact::mapping("point", [("x", 1), ("y", 2)]).unwrap(), &mut env));
    assert_eq!(env.len(), 2);
}

#[test]
fn same_attribute_twice_last_binding_wins() {
    let pattern = Pattern::new("p")
        .with(Constraint::satisfies(Predicate::greater_than(0)).on("v").bind("v"))
        .with(Constraint::satisfies(Predicate::less_than(100)).on("v").bind("v"));
    let mut env = BindingEnvironment::new();
    assert!(pattern.matches(&Fact::mapping("p", [("v", 42)]).unwrap(), &mut env));
    assert_eq!(env.get("v"), Some(&Value::Integer(42)));

    let conflicting = Pattern::new("p")
        .with(Constraint::equals(42).on("v"))
        .with(Constraint::equals(43).on("v"));
    assert!(!matches(&conflicting, &Fact::mapping("p", [("v", 42)]).unwrap()));
}

#[test]
fn mapping_failure_reasons() {
    let pattern = Pattern::new("person").with(Constraint::equals(30).on("age"));
    let missing = pattern
        .check(
            &Fact::mapping("person", [("city", "X")]).unwrap(),
            &mut BindingEnvironment::new(),
        )
        .unwrap_err();
    assert_eq!(
        missing,
        MatchFailure::MissingAttribute {
            constraint: 0,
            attribute: Some("age".to_string())
        }
    );
}

// =============================================================================
// External references and shape restriction
// =============================================================================

#[test]
fn external_refs_fail_constrained_patterns() {
    let fact = Fact::external("window", ExternalHandle::new(7));
    assert!(matches(&Pattern::new("window"), &fact));
    let constrained = Pattern::new("window").with(Constraint::equals(7));
    assert_eq!(
        constrained
            .check(&fact, &mut BindingEnvironment::new())
            .unwrap_err(),
        MatchFailure::ConstraintsOnExternalRef
    );
}

#[test]
fn shape_restriction() {
    let pattern = Pattern::new("users").with_shape(FactShape::Set);
    assert!(!matches(&pattern, &Fact::list("users", ["a"]).unwrap()));
    assert!(matches(&pattern, &Fact::set("users", ["a"]).unwrap()));
}
