//! Property tests for evaluation laws.

use proptest::prelude::*;
use ruleweave::engine::{BindingEnvironment, ConditionNode, Constraint, Pattern, Predicate, Rule};
use ruleweave::foundation::Value;
use ruleweave::storage::{Fact, FactStore};

fn store_from(lists: &[Vec<i64>]) -> FactStore {
    let mut facts = FactStore::new();
    for values in lists {
        facts.insert(Fact::list("nums", values.iter().copied()).unwrap());
    }
    facts
}

fn binds_equal(target: i64, var: &str) -> ConditionNode {
    ConditionNode::pattern(Pattern::new("nums").with(Constraint::equals(target).bind(var)))
}

fn binds_above(threshold: i64, var: &str) -> ConditionNode {
    ConditionNode::pattern(
        Pattern::new("nums").with(Constraint::satisfies(Predicate::greater_than(threshold)).bind(var)),
    )
}

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        lists in prop::collection::vec(prop::collection::vec(-20i64..20, 0..6), 0..6),
        a in -20i64..20,
        b in -20i64..20,
    ) {
        let facts = store_from(&lists);
        let rule = Rule::new("r", ConditionNode::and([
            binds_above(a, "x"),
            ConditionNode::or([binds_equal(b, "y"), ConditionNode::not(binds_equal(a, "z"))]),
        ]));
        let first = rule.is_satisfied(&facts);
        prop_assert_eq!(rule.is_satisfied(&facts), first.clone());
        prop_assert_eq!(rule.is_satisfied(&facts), first);
    }

    #[test]
    fn not_never_binds(
        lists in prop::collection::vec(prop::collection::vec(-5i64..5, 0..4), 0..4),
        target in -5i64..5,
    ) {
        let facts = store_from(&lists);
        let mut env = BindingEnvironment::new();
        let _ = ConditionNode::not(binds_equal(target, "z")).evaluate(&facts, &mut env);
        prop_assert!(env.is_empty());
    }

    #[test]
    fn or_output_comes_from_one_branch(
        lists in prop::collection::vec(prop::collection::vec(-5i64..5, 0..4), 0..4),
        a in -5i64..5,
        b in -5i64..5,
    ) {
        let facts = store_from(&lists);
        let tree = ConditionNode::or([binds_equal(a, "left"), binds_equal(b, "right")]);
        let mut env = BindingEnvironment::new();
        if tree.evaluate(&facts, &mut env) {
            prop_assert_eq!(env.len(), 1);
        } else {
            prop_assert!(env.is_empty());
        }
    }

    #[test]
    fn and_bindings_are_consistent(
        lists in prop::collection::vec(prop::collection::vec(-5i64..5, 1..4), 1..4),
        t1 in -5i64..5,
        t2 in -5i64..5,
    ) {
        let facts = store_from(&lists);
        let tree = ConditionNode::and([binds_above(t1, "x"), binds_above(t2, "x")]);
        let mut env = BindingEnvironment::new();
        if tree.evaluate(&facts, &mut env) {
            let x = env.get("x").and_then(Value::as_int).unwrap();
            prop_assert!(x > t1 && x > t2);
        }
    }

    #[test]
    fn and_compares_first_satisfying_elements(
        left in prop::collection::vec(-5i64..5, 1..6),
        right in prop::collection::vec(-5i64..5, 1..6),
        t1 in -5i64..5,
        t2 in -5i64..5,
    ) {
        let mut facts = FactStore::new();
        facts.insert(Fact::list("left", left.iter().copied()).unwrap());
        facts.insert(Fact::list("right", right.iter().copied()).unwrap());
        let above = |name: &str, threshold: i64| {
            ConditionNode::pattern(Pattern::new(name).with(
                Constraint::satisfies(Predicate::greater_than(threshold)).bind("x"),
            ))
        };
        let tree = ConditionNode::and([above("left", t1), above("right", t2)]);

        let first_left = left.iter().copied().find(|v| *v > t1);
        let first_right = right.iter().copied().find(|v| *v > t2);
        let expected = match (first_left, first_right) {
            (Some(l), Some(r)) if l == r => Some(l),
            _ => None,
        };

        let mut env = BindingEnvironment::new();
        let matched = tree.evaluate(&facts, &mut env);
        prop_assert_eq!(matched, expected.is_some());
        if matched {
            prop_assert_eq!(env.get("x").and_then(Value::as_int), expected);
        }
    }

    #[test]
    fn existential_match_agrees_with_contains(
        values in prop::collection::vec(-10i64..10, 0..8),
        target in -10i64..10,
    ) {
        let fact = Fact::list("nums", values.iter().copied()).unwrap();
        let pattern = Pattern::new("nums").with(Constraint::equals(target));
        prop_assert_eq!(
            pattern.matches(&fact, &mut BindingEnvironment::new()),
            values.contains(&target)
        );
    }
}
