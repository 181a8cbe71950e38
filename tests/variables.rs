//! Tests for `{{token}}` variable resolution.
mod common;
use ahash::AHashMap;
use chatflow::prelude::*;
use common::*;

fn contact_values() -> AHashMap<String, String> {
    let mut values = AHashMap::new();
    values.insert("name".to_string(), "Ana".to_string());
    values
}

#[test]
fn test_valued_tokens_substitute_and_unknown_tokens_warn() {
    let resolver = VariableResolver::builder()
        .with_contact_values(&contact_values())
        .build();

    let resolution =
        resolver.resolve("Hello {{contact.name}}, your code is {{missing_key}}");

    assert_eq!(resolution.text, "Hello Ana, your code is {{missing_key}}");
    assert_eq!(resolution.unknown, vec!["missing_key".to_string()]);
    assert!(!resolution.is_clean());
}

/// Declared keys without a value stay literal and produce no warning; the
/// runtime substitutes them later.
#[test]
fn test_declared_keys_stay_literal_without_warning() {
    let resolver = VariableResolver::builder().with_contact_fields().build();

    let resolution = resolver.resolve("Reach you at {{contact.email}}?");

    assert_eq!(resolution.text, "Reach you at {{contact.email}}?");
    assert!(resolution.unknown.is_empty());
}

#[test]
fn test_flow_inputs_are_resolvable() {
    let inputs = vec![InputVariable {
        key: "order_id".to_string(),
        label: "Order ID".to_string(),
        required: true,
    }];
    let resolver = VariableResolver::builder().with_flow_inputs(&inputs).build();

    assert!(resolver.is_resolvable("order_id"));
    assert!(resolver.resolve("Order {{order_id}} found").unknown.is_empty());
}

#[test]
fn test_attribute_scope_respects_model_filter() {
    let registry = create_registry();

    let contact_only = VariableResolver::builder()
        .with_attributes(&registry, Some(AttributeModel::Contact))
        .build();
    assert!(contact_only.is_resolvable("plan"));
    assert_eq!(
        contact_only.resolve("{{priority}}").unknown,
        vec!["priority".to_string()]
    );

    let unfiltered = VariableResolver::builder()
        .with_attributes(&registry, None)
        .build();
    assert!(unfiltered.is_resolvable("plan"));
    assert!(unfiltered.is_resolvable("priority"));
}

#[test]
fn test_repeated_unknown_keys_warn_once() {
    let resolver = VariableResolver::builder().build();
    let resolution = resolver.resolve("{{x}} and {{x}} again");

    assert_eq!(resolution.text, "{{x}} and {{x}} again");
    assert_eq!(resolution.unknown, vec!["x".to_string()]);
}

#[test]
fn test_unterminated_tokens_are_left_verbatim() {
    let resolver = VariableResolver::builder().with_contact_fields().build();
    let resolution = resolver.resolve("broken {{contact.name");

    assert_eq!(resolution.text, "broken {{contact.name");
    assert!(resolution.unknown.is_empty());
}

#[test]
fn test_inner_whitespace_is_tolerated() {
    let mut values = AHashMap::new();
    values.insert("order_id".to_string(), "A-77".to_string());
    let resolver = VariableResolver::builder().with_input_values(&values).build();

    assert_eq!(resolver.resolve("Order {{ order_id }}").text, "Order A-77");
}

#[test]
fn test_resolution_never_drops_surrounding_text() {
    let resolver = VariableResolver::builder().build();
    let input = "a {{}} b {{unknown}} c";
    let resolution = resolver.resolve(input);

    assert_eq!(resolution.text, input);
    assert_eq!(resolution.unknown, vec!["unknown".to_string()]);
}
