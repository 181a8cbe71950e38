//! Tests for the condition evaluation contract.
mod common;
use chatflow::prelude::*;
use common::*;

fn rule(subject: RuleSubject, operator: ConditionOperator, value: &str) -> ConditionRule {
    ConditionRule {
        subject,
        operator,
        value: value.to_string(),
        attribute_key: None,
    }
}

#[test]
fn test_string_operators_are_case_sensitive() {
    assert!(ConditionOperator::Equals.apply(Some("Billing"), "Billing"));
    assert!(!ConditionOperator::Equals.apply(Some("billing"), "Billing"));
    assert!(ConditionOperator::Contains.apply(Some("refund please"), "refund"));
    assert!(!ConditionOperator::Contains.apply(Some("Refund please"), "refund please now"));
    assert!(ConditionOperator::StartsWith.apply(Some("order 42"), "order"));
    assert!(ConditionOperator::EndsWith.apply(Some("order 42"), "42"));
}

#[test]
fn test_negated_operators_match_absent_values() {
    assert!(ConditionOperator::NotEquals.apply(None, "x"));
    assert!(ConditionOperator::NotContains.apply(None, "x"));
    assert!(!ConditionOperator::NotContains.apply(Some("xy"), "x"));
}

#[test]
fn test_numeric_operators_parse_both_sides() {
    assert!(ConditionOperator::GreaterThan.apply(Some("10"), "5"));
    assert!(ConditionOperator::LessThan.apply(Some(" 3 "), "4"));
    assert!(!ConditionOperator::GreaterThan.apply(Some("abc"), "5"));
    assert!(!ConditionOperator::LessThan.apply(Some("3"), "many"));
    assert!(!ConditionOperator::GreaterThan.apply(None, "5"));
}

#[test]
fn test_empty_operators() {
    assert!(ConditionOperator::IsEmpty.apply(None, ""));
    assert!(ConditionOperator::IsEmpty.apply(Some(""), ""));
    assert!(!ConditionOperator::IsEmpty.apply(Some("x"), ""));
    assert!(ConditionOperator::IsNotEmpty.apply(Some("x"), ""));
    assert!(!ConditionOperator::IsNotEmpty.apply(None, ""));
}

#[test]
fn test_rules_resolve_their_subjects() {
    let mut values = TestValues::default();
    values.message = Some("I want a refund".to_string());
    values
        .contact
        .insert("name".to_string(), "Ana".to_string());
    values
        .contact_attributes
        .insert("plan".to_string(), "pro".to_string());

    assert!(rule(RuleSubject::Message, ConditionOperator::Contains, "refund").evaluate(&values));
    assert!(rule(RuleSubject::ContactName, ConditionOperator::Equals, "Ana").evaluate(&values));

    let custom = ConditionRule {
        subject: RuleSubject::ContactAttribute,
        operator: ConditionOperator::Equals,
        value: "pro".to_string(),
        attribute_key: Some("plan".to_string()),
    };
    assert!(custom.evaluate(&values));

    // Without a key the custom subject resolves to nothing.
    let keyless = ConditionRule {
        attribute_key: None,
        ..custom
    };
    assert!(!keyless.evaluate(&values));
}

#[test]
fn test_logic_operator_folds_the_whole_list() {
    let mut values = TestValues::default();
    values.message = Some("hello".to_string());
    values
        .contact
        .insert("name".to_string(), "Ana".to_string());

    let hit = rule(RuleSubject::Message, ConditionOperator::Contains, "hello");
    let miss = rule(RuleSubject::ContactName, ConditionOperator::Equals, "Bob");

    assert!(!evaluate_rules(
        &[hit.clone(), miss.clone()],
        LogicOperator::And,
        &values
    ));
    assert!(evaluate_rules(&[hit, miss], LogicOperator::Or, &values));
}

#[test]
fn test_empty_rule_list_is_never_satisfied() {
    let values = TestValues::default();
    assert!(!evaluate_rules(&[], LogicOperator::And, &values));
    assert!(!evaluate_rules(&[], LogicOperator::Or, &values));
}

#[test]
fn test_select_branch_is_total() {
    let custom = ConditionData {
        outputs: vec!["A".to_string(), "B".to_string()],
        ..ConditionData::default()
    };

    assert_eq!(select_branch(&custom, Some(0)).id, "out-0");
    assert_eq!(select_branch(&custom, Some(1)).id, "out-1");
    // Out-of-range and no-match both land on the fallback.
    assert_eq!(select_branch(&custom, Some(5)).id, "else");
    assert_eq!(select_branch(&custom, None).id, "else");

    let binary = ConditionData::default();
    assert_eq!(select_branch(&binary, Some(0)).id, "true");
    assert_eq!(select_branch(&binary, None).id, "else");
}

#[test]
fn test_evaluate_and_select_follows_exactly_one_port() {
    let mut values = TestValues::default();
    values.message = Some("cancel my order".to_string());

    let data = ConditionData {
        rules: vec![rule(
            RuleSubject::Message,
            ConditionOperator::Contains,
            "cancel",
        )],
        logic_operator: LogicOperator::And,
        outputs: Vec::new(),
    };

    assert_eq!(evaluate_and_select(&data, &values).id, "true");

    values.message = Some("all good".to_string());
    assert_eq!(evaluate_and_select(&data, &values).id, "else");
}
