//! Tracing and explanations over real evaluations.

use ruleweave::debug::{
    CandidateVerdict, DebugConfig, JsonFormatter, TraceEvent, TraceFormatter, Tracer, explain,
    explain_with_depth,
};
use ruleweave::engine::{
    BindingEnvironment, ConditionNode, Constraint, MatchFailure, Pattern, Predicate, Rule,
};
use ruleweave::storage::{Fact, FactStore};

fn facts() -> FactStore {
    let mut facts = FactStore::new();
    facts.insert(Fact::mapping("inventory", [("widget", 2)]).unwrap());
    facts.insert(Fact::list("users", ["Alice", "Bob"]).unwrap());
    facts
}

fn restock() -> Rule {
    Rule::new(
        "restock",
        ConditionNode::and([
            ConditionNode::pattern(Pattern::new("users").with(Constraint::equals("Bob"))),
            ConditionNode::pattern(
                Pattern::new("inventory").with(
                    Constraint::satisfies(Predicate::greater_than(5))
                        .on("widget")
                        .bind("count"),
                ),
            ),
        ]),
    )
}

#[test]
fn tracer_from_config_records_a_rule() {
    let config = DebugConfig::enabled().with_buffer_size(64);
    let mut tracer = Tracer::new(config.tracer_config());
    let (matched, _) = tracer.trace_rule(&restock(), &facts());
    assert!(!matched);

    let last = tracer.buffer().last().unwrap();
    assert_eq!(
        last.event,
        TraceEvent::RuleEvaluated {
            rule: "restock".to_string(),
            matched: false,
            bindings: vec![],
        }
    );
    assert_eq!(tracer.stats().count("pattern-tried"), 2);
}

#[test]
fn buffer_size_bounds_records() {
    let mut tracer = Tracer::new(DebugConfig::enabled().with_buffer_size(3).tracer_config());
    for _ in 0..5 {
        tracer.trace_rule(&restock(), &facts());
    }
    assert_eq!(tracer.buffer().len(), 3);
    assert_eq!(tracer.current_cycle(), 5);
}

#[test]
fn json_trace_round_trips_through_serde_json() {
    let mut tracer = Tracer::recording();
    tracer.trace_rule(&restock(), &facts());
    let records: Vec<_> = tracer.buffer().iter().collect();
    let rendered = JsonFormatter::new().format_many(&records);
    let types: Vec<String> = rendered
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(types.first().map(String::as_str), Some("node-entered"));
    assert_eq!(types.last().map(String::as_str), Some("rule-evaluated"));
}

#[test]
fn explanation_points_at_the_failing_attribute() {
    let explanation = explain(restock().lhs(), &facts());
    assert!(!explanation.matched);
    assert!(explanation.children[0].matched);

    let failing = explanation.failing_patterns();
    assert_eq!(failing.len(), 1);
    assert!(matches!(
        &failing[0].candidates[0].verdict,
        CandidateVerdict::Rejected(MatchFailure::AttributeRejected { attribute, .. })
            if attribute == "widget"
    ));
}

#[test]
fn explanation_respects_configured_depth() {
    let config = DebugConfig::default().with_explain_depth(0);
    let explanation = explain_with_depth(
        restock().lhs(),
        &facts(),
        &BindingEnvironment::new(),
        config.explain_depth,
    );
    assert!(explanation.children.is_empty());
    assert!(explanation.truncated);
}

#[test]
fn explanation_agrees_with_evaluation() {
    let facts = facts();
    let rule = restock();
    assert_eq!(explain(rule.lhs(), &facts).matched, rule.is_satisfied(&facts).0);
}
