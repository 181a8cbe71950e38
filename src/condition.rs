//! Design-time contract for condition evaluation.
//!
//! A condition node carries a flat list of rules combined by a single
//! logic operator. The external runtime supplies attribute values at
//! execution time; this module fixes the semantics it must follow:
//! operator behavior, the flat `and`/`or` fold, and branch selection with
//! a guaranteed fallback port.

use crate::attribute::AttributeModel;
use serde::{Deserialize, Serialize};

/// Comparison operators available to condition rules.
///
/// String comparisons are case-sensitive byte comparisons. The executing
/// runtime may layer case folding on top, but the contract here is strict.
/// `greater_than` and `less_than` parse both sides as numbers and are
/// false when either side does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
}

impl ConditionOperator {
    /// Applies the operator to a resolved attribute value.
    ///
    /// `None` means the attribute was absent entirely, which only
    /// `is_empty` treats as a match.
    pub fn apply(&self, actual: Option<&str>, comparand: &str) -> bool {
        match self {
            ConditionOperator::IsEmpty => actual.is_none_or(|v| v.is_empty()),
            ConditionOperator::IsNotEmpty => actual.is_some_and(|v| !v.is_empty()),
            ConditionOperator::Equals => actual == Some(comparand),
            ConditionOperator::NotEquals => actual != Some(comparand),
            ConditionOperator::Contains => actual.is_some_and(|v| v.contains(comparand)),
            ConditionOperator::NotContains => actual.is_none_or(|v| !v.contains(comparand)),
            ConditionOperator::StartsWith => actual.is_some_and(|v| v.starts_with(comparand)),
            ConditionOperator::EndsWith => actual.is_some_and(|v| v.ends_with(comparand)),
            ConditionOperator::GreaterThan => compare_numeric(actual, comparand, |a, b| a > b),
            ConditionOperator::LessThan => compare_numeric(actual, comparand, |a, b| a < b),
        }
    }
}

fn compare_numeric(actual: Option<&str>, comparand: &str, cmp: fn(f64, f64) -> bool) -> bool {
    let Some(actual) = actual.and_then(|v| v.trim().parse::<f64>().ok()) else {
        return false;
    };
    let Ok(comparand) = comparand.trim().parse::<f64>() else {
        return false;
    };
    cmp(actual, comparand)
}

/// How the rules of one condition node combine.
///
/// The combination is flat: one operator folded across the entire rule
/// list, never a nested expression tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

/// What a rule inspects on the active conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSubject {
    /// Text of the message that triggered the flow step.
    Message,
    ContactName,
    ContactEmail,
    ContactPhone,
    ContactCompany,
    ContactLocation,
    /// A custom contact attribute, resolved through `attribute_key`.
    ContactAttribute,
    /// A custom conversation attribute, resolved through `attribute_key`.
    ConversationAttribute,
}

impl RuleSubject {
    /// The attribute model a custom-attribute subject resolves against.
    pub fn attribute_model(&self) -> Option<AttributeModel> {
        match self {
            RuleSubject::ContactAttribute => Some(AttributeModel::Contact),
            RuleSubject::ConversationAttribute => Some(AttributeModel::Conversation),
            _ => None,
        }
    }
}

/// A single rule inside a condition node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    #[serde(rename = "attribute")]
    pub subject: RuleSubject,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub attribute_key: Option<String>,
}

/// Runtime seam: supplies the values rules are evaluated against.
///
/// The core never holds live conversation state; the executing runtime
/// implements this over its session data.
pub trait RuleValueSource {
    fn message(&self) -> Option<String>;
    fn contact_field(&self, field: &str) -> Option<String>;
    fn attribute(&self, model: AttributeModel, key: &str) -> Option<String>;
}

impl ConditionRule {
    /// Resolves this rule's subject and applies its operator.
    pub fn evaluate(&self, source: &dyn RuleValueSource) -> bool {
        let actual = match self.subject {
            RuleSubject::Message => source.message(),
            RuleSubject::ContactName => source.contact_field("name"),
            RuleSubject::ContactEmail => source.contact_field("email"),
            RuleSubject::ContactPhone => source.contact_field("phone"),
            RuleSubject::ContactCompany => source.contact_field("company"),
            RuleSubject::ContactLocation => source.contact_field("location"),
            RuleSubject::ContactAttribute => self
                .attribute_key
                .as_ref()
                .and_then(|key| source.attribute(AttributeModel::Contact, key)),
            RuleSubject::ConversationAttribute => self
                .attribute_key
                .as_ref()
                .and_then(|key| source.attribute(AttributeModel::Conversation, key)),
        };
        self.operator.apply(actual.as_deref(), &self.value)
    }
}

/// Folds a whole rule list with one logic operator.
///
/// An empty rule list is never satisfied; traversal falls through to the
/// else port rather than vacuously matching.
pub fn evaluate_rules(
    rules: &[ConditionRule],
    logic: LogicOperator,
    source: &dyn RuleValueSource,
) -> bool {
    if rules.is_empty() {
        return false;
    }
    match logic {
        LogicOperator::And => rules.iter().all(|rule| rule.evaluate(source)),
        LogicOperator::Or => rules.iter().any(|rule| rule.evaluate(source)),
    }
}

/// Maps an evaluation outcome onto exactly one derived port.
///
/// `matched` is the index of the custom branch the runtime matched, or
/// `None` when no rule set was satisfied. Out-of-range indices fall back
/// to the else port, so exactly one port is always followed.
pub fn select_branch(
    data: &crate::node::ConditionData,
    matched: Option<usize>,
) -> crate::node::OutputPort {
    let mut ports = crate::node::condition_ports(data);
    let else_port = ports
        .pop()
        .expect("condition nodes always derive the else port");
    match matched {
        Some(index) if index < ports.len() => ports.swap_remove(index),
        _ => else_port,
    }
}

/// Evaluates a condition node's rule list and picks the port traversal
/// follows: the first branch when satisfied, the else port otherwise.
pub fn evaluate_and_select(
    data: &crate::node::ConditionData,
    source: &dyn RuleValueSource,
) -> crate::node::OutputPort {
    let satisfied = evaluate_rules(&data.rules, data.logic_operator, source);
    select_branch(data, satisfied.then_some(0))
}
