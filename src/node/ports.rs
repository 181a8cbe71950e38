//! Derivation of outbound connection points from node content.
//!
//! Ports are a pure projection of a node's data: they are recomputed on
//! every edit and never persisted or cached. Edges reference ports by id,
//! so every id produced here must be stable for unchanged data.

use super::data::NodeData;
use super::registry::{self, PortStrategy};
use serde::{Deserialize, Serialize};

/// A named outbound connection point on a node.
///
/// Generic single ports carry no label; the builder renders them as a bare
/// connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPort {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl OutputPort {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }

    pub fn generic() -> Self {
        Self {
            id: GENERIC_PORT.to_string(),
            label: None,
        }
    }
}

/// Port id of the single generic outbound point.
pub const GENERIC_PORT: &str = "out";
/// Port id of a condition node's guaranteed fallback branch.
pub const ELSE_PORT: &str = "else";
/// Port id of a condition node's default Yes branch.
pub const YES_PORT: &str = "true";

/// Derives the outbound ports for a node's current data.
///
/// Pure and cheap; callers recompute rather than cache. A type that
/// derives no ports of its own gets exactly one generic port.
pub fn derive_ports(data: &NodeData) -> Vec<OutputPort> {
    let ports = typed_ports(data);
    if ports.is_empty() {
        vec![OutputPort::generic()]
    } else {
        ports
    }
}

/// Strategy dispatch via the type registry. The registry table aligns
/// strategies with kinds, so the strategy/data pairs below are the only
/// ones that occur.
fn typed_ports(data: &NodeData) -> Vec<OutputPort> {
    let strategy = registry::node_type(data.kind()).strategy;
    match (strategy, data) {
        (PortStrategy::ConditionBranches, NodeData::Condition(condition)) => {
            condition_ports(condition)
        }
        (
            PortStrategy::ClassifierClasses,
            NodeData::Ai(classifier) | NodeData::QuestionClassifier(classifier),
        ) => {
            if classifier.classes.len() > 1 {
                classifier
                    .classes
                    .iter()
                    .enumerate()
                    .map(|(i, _)| {
                        OutputPort::new(format!("class-{}", i), format!("CLASS {}", i + 1))
                    })
                    .collect()
            } else {
                Vec::new()
            }
        }
        (PortStrategy::ButtonList, NodeData::Buttons(buttons)) => buttons
            .buttons
            .iter()
            .enumerate()
            .map(|(i, text)| OutputPort::new(format!("btn-{}", i), port_label(text, "Button", i)))
            .collect(),
        (PortStrategy::OptionList, NodeData::Select(select)) => select
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| OutputPort::new(format!("opt-{}", i), port_label(text, "Option", i)))
            .collect(),
        // PortStrategy::Single, plus the unreachable mismatched pairs.
        _ => Vec::new(),
    }
}

/// Ports of a condition node: custom branches (blanks filtered) or the
/// binary Yes port, always followed by the else fallback.
pub fn condition_ports(condition: &crate::node::data::ConditionData) -> Vec<OutputPort> {
    // Only condition outputs filter blanks. Blank button/option labels
    // still occupy a port slot in the lists above.
    let outputs: Vec<&str> = condition
        .outputs
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.trim().is_empty())
        .collect();

    let mut ports = if outputs.is_empty() {
        vec![OutputPort::new(YES_PORT, "Yes")]
    } else {
        outputs
            .iter()
            .enumerate()
            .map(|(i, name)| OutputPort::new(format!("out-{}", i), *name))
            .collect()
    };
    // The fallback branch exists no matter how many custom branches are
    // configured.
    ports.push(OutputPort::new(ELSE_PORT, "Else"));
    ports
}

fn port_label(text: &str, fallback: &str, index: usize) -> String {
    if text.is_empty() {
        format!("{} {}", fallback, index + 1)
    } else {
        text.to_string()
    }
}

/// True when `port_id` is currently derived from `data`.
pub fn has_port(data: &NodeData, port_id: &str) -> bool {
    derive_ports(data).iter().any(|port| port.id == port_id)
}
