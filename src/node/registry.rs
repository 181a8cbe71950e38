//! Static registry of node type metadata.
//!
//! The type set is closed; lookups by [`NodeKind`] are total. Lookups by
//! string tag can fail for externally supplied data and return
//! [`GraphError::UnknownNodeType`], which the load path downgrades to a
//! per-node validation issue.

use super::data::{NodeData, NodeKind};
use crate::error::GraphError;

/// How a node type's outbound ports are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStrategy {
    /// One generic, unlabeled port.
    Single,
    /// Custom named branches plus the guaranteed else branch.
    ConditionBranches,
    /// One port per class once more than one class is configured.
    ClassifierClasses,
    /// One port per button entry, blanks included.
    ButtonList,
    /// One port per option entry, blanks included.
    OptionList,
}

/// Registry record for one node type.
#[derive(Debug, Clone, Copy)]
pub struct NodeTypeSpec {
    pub kind: NodeKind,
    pub tag: &'static str,
    /// `start`/`trigger` nodes have no inbound connection point.
    pub accepts_inbound: bool,
    pub strategy: PortStrategy,
}

const fn spec(kind: NodeKind, tag: &'static str, accepts_inbound: bool, strategy: PortStrategy) -> NodeTypeSpec {
    NodeTypeSpec {
        kind,
        tag,
        accepts_inbound,
        strategy,
    }
}

static NODE_TYPES: [NodeTypeSpec; 23] = [
    spec(NodeKind::Start, "start", false, PortStrategy::Single),
    spec(NodeKind::Trigger, "trigger", false, PortStrategy::Single),
    spec(NodeKind::Condition, "condition", true, PortStrategy::ConditionBranches),
    spec(NodeKind::Ai, "ai", true, PortStrategy::ClassifierClasses),
    spec(
        NodeKind::QuestionClassifier,
        "question_classifier",
        true,
        PortStrategy::ClassifierClasses,
    ),
    spec(NodeKind::Buttons, "buttons", true, PortStrategy::ButtonList),
    spec(NodeKind::Select, "select", true, PortStrategy::OptionList),
    spec(NodeKind::Assign, "assign", true, PortStrategy::Single),
    spec(NodeKind::Tag, "tag", true, PortStrategy::Single),
    spec(NodeKind::SetAttribute, "set_attribute", true, PortStrategy::Single),
    spec(NodeKind::StartFlow, "start_flow", true, PortStrategy::Single),
    spec(NodeKind::End, "end", true, PortStrategy::Single),
    spec(NodeKind::Message, "message", true, PortStrategy::Single),
    spec(NodeKind::Wait, "wait", true, PortStrategy::Single),
    spec(NodeKind::Csat, "csat", true, PortStrategy::Single),
    spec(NodeKind::Note, "note", true, PortStrategy::Single),
    spec(NodeKind::Webhook, "webhook", true, PortStrategy::Single),
    spec(NodeKind::Http, "http", true, PortStrategy::Single),
    spec(NodeKind::Code, "code", true, PortStrategy::Single),
    spec(NodeKind::Llm, "llm", true, PortStrategy::Single),
    spec(NodeKind::QuickInput, "quick_input", true, PortStrategy::Single),
    spec(NodeKind::InputForm, "input_form", true, PortStrategy::Single),
    spec(NodeKind::Carousel, "carousel", true, PortStrategy::Single),
];

/// Looks up the registry record for a kind. Total over the closed set.
pub fn node_type(kind: NodeKind) -> &'static NodeTypeSpec {
    NODE_TYPES
        .iter()
        .find(|spec| spec.kind == kind)
        .expect("every NodeKind has a registry record")
}

/// Resolves a wire tag to its kind.
pub fn kind_from_tag(tag: &str) -> Result<NodeKind, GraphError> {
    NODE_TYPES
        .iter()
        .find(|spec| spec.tag == tag)
        .map(|spec| spec.kind)
        .ok_or_else(|| GraphError::UnknownNodeType(tag.to_string()))
}

/// Whether nodes of this kind accept an inbound connection.
pub fn accepts_inbound(kind: NodeKind) -> bool {
    node_type(kind).accepts_inbound
}

/// Parses an open `data` bag against the schema for `tag`.
///
/// Unknown tags and schema mismatches fail with the corresponding
/// [`GraphError`]; persistence-load callers surface these per node rather
/// than aborting the whole document.
pub fn parse_data(node_id: &str, tag: &str, data: serde_json::Value) -> Result<NodeData, GraphError> {
    let kind = kind_from_tag(tag)?;
    // A stored node may omit its bag entirely; that is the default shape.
    let data = if data.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        data
    };
    let tagged = serde_json::json!({ "type": kind.tag(), "data": data });
    serde_json::from_value(tagged).map_err(|err| GraphError::InvalidNodeData {
        node_id: node_id.to_string(),
        tag: tag.to_string(),
        message: err.to_string(),
    })
}
