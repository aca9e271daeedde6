//! End-to-end scenarios through the re-exporting root crate.

use ruleweave::engine::{ConditionNode, Constraint, Pattern, Predicate, Rule, RuleSet};
use ruleweave::foundation::Value;
use ruleweave::storage::{Fact, FactStore};

#[test]
fn user_list_contains_bob() {
    let mut facts = FactStore::new();
    facts.insert(Fact::list("users", ["Alice", "Bob"]).unwrap());

    let rule = Rule::new(
        "bob-present",
        ConditionNode::and([ConditionNode::pattern(
            Pattern::new("users").with(Constraint::equals("Bob")),
        )]),
    );
    let (matched, bindings) = rule.is_satisfied(&facts);
    assert!(matched);
    assert!(bindings.is_empty());
}

#[test]
fn inventory_count_binding() {
    let mut facts = FactStore::new();
    facts.insert(Fact::mapping("inventory", [("widget", 10)]).unwrap());

    let rule = Rule::new(
        "plenty",
        ConditionNode::pattern(
            Pattern::new("inventory").with(
                Constraint::satisfies(Predicate::greater_than(5))
                    .on("widget")
                    .bind("count"),
            ),
        ),
    );
    let (matched, bindings) = rule.is_satisfied(&facts);
    assert!(matched);
    assert_eq!(bindings.to_vec(), vec![("count".to_string(), Value::Integer(10))]);
}

#[test]
fn order_fulfilment() {
    let mut facts = FactStore::new();
    facts.insert(Fact::mapping("order", [("item", "widget"), ("customer", "acme")]).unwrap());
    // One fact per stocked item: the leaf searches facts, while a single
    // collection would only offer its first element.
    facts.insert(Fact::single("in-stock", "gizmo"));
    facts.insert(Fact::single("in-stock", "widget"));
    facts.insert(Fact::list("blocked", ["globex"]).unwrap());

    // An order whose item is in stock and whose customer is not blocked.
    let fulfil = Rule::new(
        "fulfil",
        ConditionNode::and([
            ConditionNode::pattern(
                Pattern::new("order")
                    .with(Constraint::satisfies(Predicate::new("any", |_| true)).on("item").bind("item"))
                    .with(
                        Constraint::satisfies(Predicate::new("any", |_| true))
                            .on("customer")
                            .bind("customer"),
                    ),
            ),
            ConditionNode::pattern(
                Pattern::new("in-stock")
                    .with(Constraint::satisfies(Predicate::new("any", |_| true)).bind("item")),
            ),
            ConditionNode::not(ConditionNode::pattern(
                Pattern::new("blocked")
                    .with(Constraint::satisfies(Predicate::new("any", |_| true)).bind("customer")),
            )),
        ]),
    );

    let activation = fulfil.activation(&facts).unwrap();
    assert_eq!(activation.bindings.get("item"), Some(&Value::from("widget")));
    assert_eq!(activation.bindings.get("customer"), Some(&Value::from("acme")));
    assert_eq!(activation.matched_facts.len(), 2);

    // Blocking the customer turns the rule off.
    facts.insert(Fact::list("blocked", ["acme"]).unwrap());
    assert!(!fulfil.is_satisfied(&facts).0);
}

#[test]
fn rules_share_a_snapshot_across_threads() {
    let mut facts = FactStore::new();
    for i in 0..50 {
        facts.insert(Fact::single("reading", i));
    }
    let rules: RuleSet = (0..8)
        .map(|n| {
            Rule::new(
                format!("over-{n}"),
                ConditionNode::pattern(
                    Pattern::new("reading")
                        .with(Constraint::satisfies(Predicate::greater_than(n * 10)).bind("r")),
                ),
            )
        })
        .collect();

    let facts = &facts;
    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = rules
            .iter()
            .map(|rule| scope.spawn(move || rule.is_satisfied(facts).0))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, vec![true, true, true, true, true, false, false, false]);
}
