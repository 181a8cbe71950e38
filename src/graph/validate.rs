//! Whole-graph validation.
//!
//! Validation never halts editing: problems are collected into a
//! [`ValidationReport`] keyed by node id, and only publishing is gated on
//! the report carrying no errors. Warnings (unreachable nodes, unresolved
//! variables) are expected on under-construction flows.

use super::{FlowDefinition, FlowNode};
use crate::attribute::{AttributeModel, AttributeRegistry};
use crate::node::NodeData;
use crate::variable::VariableResolver;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// How severe a validation finding is.
///
/// Errors block publishing; warnings never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("flow has no start or trigger node")]
    MissingEntryPoint,

    #[error("flow has {count} entry nodes, expected exactly one")]
    MultipleEntryPoints { count: usize },

    #[error("node is not reachable from the entry node")]
    UnreachableNode,

    #[error("unknown node type tag '{tag}'")]
    UnknownNodeType { tag: String },

    #[error("node data does not match the '{tag}' schema: {message}")]
    InvalidNodeData { tag: String, message: String },

    #[error("a node with this id appeared more than once; later occurrences were dropped")]
    DuplicateNodeId,

    #[error("edge '{edge_id}' referenced port '{port_id}', which is no longer derived")]
    DanglingEdge { edge_id: String, port_id: String },

    #[error("start_flow target '{flow_id}' does not exist")]
    UnknownFlowReference { flow_id: String },

    #[error("required input '{key}' of flow '{flow_id}' has no binding")]
    UnboundRequiredInput { flow_id: String, key: String },

    #[error("variable '{{{{{key}}}}}' is not resolvable in any scope")]
    UnknownVariable { key: String },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::UnreachableNode
            | ValidationIssue::DanglingEdge { .. }
            | ValidationIssue::UnknownVariable { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Structured validation outcome: flow-level findings plus findings keyed
/// by the node they concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub flow_issues: Vec<ValidationIssue>,
    pub node_issues: BTreeMap<String, Vec<ValidationIssue>>,
}

impl ValidationReport {
    pub fn push_flow(&mut self, issue: ValidationIssue) {
        self.flow_issues.push(issue);
    }

    pub fn push_node(&mut self, node_id: impl Into<String>, issue: ValidationIssue) {
        self.node_issues.entry(node_id.into()).or_default().push(issue);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &ValidationIssue)> {
        self.flow_issues
            .iter()
            .map(|i| (None, i))
            .chain(self.node_issues.iter().flat_map(|(id, issues)| {
                issues.iter().map(move |i| (Some(id.as_str()), i))
            }))
    }

    pub fn is_empty(&self) -> bool {
        self.flow_issues.is_empty() && self.node_issues.values().all(Vec::is_empty)
    }

    pub fn error_count(&self) -> usize {
        self.iter()
            .filter(|(_, i)| i.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.iter()
            .filter(|(_, i)| i.severity() == Severity::Warning)
            .count()
    }

    /// True when nothing blocks publishing this flow.
    pub fn publishable(&self) -> bool {
        self.error_count() == 0
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.flow_issues.extend(other.flow_issues);
        for (id, issues) in other.node_issues {
            self.node_issues.entry(id).or_default().extend(issues);
        }
    }
}

/// Resolves flow ids referenced by `start_flow` nodes.
///
/// Implemented by whatever owns the stored flows: the persistence layer,
/// or an in-memory set of loaded documents.
pub trait FlowCatalog {
    fn flow(&self, flow_id: &str) -> Option<&FlowDefinition>;
}

/// The empty catalog: every sub-flow reference is unknown.
impl FlowCatalog for () {
    fn flow(&self, _flow_id: &str) -> Option<&FlowDefinition> {
        None
    }
}

impl FlowCatalog for ahash::AHashMap<String, FlowDefinition> {
    fn flow(&self, flow_id: &str) -> Option<&FlowDefinition> {
        self.get(flow_id)
    }
}

impl FlowDefinition {
    /// Checks the whole graph and returns a structured report.
    ///
    /// `registry` supplies the custom-attribute scope for variable
    /// resolution; `catalog` resolves `start_flow` targets.
    pub fn validate(
        &self,
        registry: &AttributeRegistry,
        catalog: &dyn FlowCatalog,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.check_entry_nodes(&mut report);
        self.check_reachability(&mut report);
        self.check_subflows(catalog, &mut report);
        self.check_variables(registry, &mut report);

        report
    }

    fn check_entry_nodes(&self, report: &mut ValidationReport) {
        let count = self.entry_nodes().count();
        match count {
            0 => report.push_flow(ValidationIssue::MissingEntryPoint),
            1 => {}
            _ => report.push_flow(ValidationIssue::MultipleEntryPoints { count }),
        }
    }

    /// Flags non-entry nodes with no directed path from any entry node.
    /// Skipped entirely when the flow has no entry yet; the missing-entry
    /// error already covers that state.
    fn check_reachability(&self, report: &mut ValidationReport) {
        let mut queue: Vec<&str> = self.entry_nodes().map(|n| n.id.as_str()).collect();
        if queue.is_empty() {
            return;
        }

        let mut reached: AHashSet<&str> = queue.iter().copied().collect();
        while let Some(current) = queue.pop() {
            for edge in self.edges().iter().filter(|e| e.source == current) {
                if reached.insert(edge.target.as_str()) {
                    queue.push(edge.target.as_str());
                }
            }
        }

        for node in self.nodes() {
            if !reached.contains(node.id.as_str()) {
                report.push_node(node.id.clone(), ValidationIssue::UnreachableNode);
            }
        }
    }

    fn check_subflows(&self, catalog: &dyn FlowCatalog, report: &mut ValidationReport) {
        for node in self.nodes() {
            let NodeData::StartFlow(call) = &node.data else {
                continue;
            };
            let Some(target) = catalog.flow(&call.flow_id) else {
                report.push_node(
                    node.id.clone(),
                    ValidationIssue::UnknownFlowReference {
                        flow_id: call.flow_id.clone(),
                    },
                );
                continue;
            };
            for input in target.input_variables.iter().filter(|v| v.required) {
                let bound = call.variable_bindings.contains_key(&input.key);
                if !bound && !call.ai_collect_inputs {
                    report.push_node(
                        node.id.clone(),
                        ValidationIssue::UnboundRequiredInput {
                            flow_id: call.flow_id.clone(),
                            key: input.key.clone(),
                        },
                    );
                }
            }
        }
    }

    /// Checks that every `{{token}}` in any string field of any node's
    /// data names a key from the contact, flow-input, or custom-attribute
    /// scopes. The custom scope of a `set_attribute` node is narrowed to
    /// its target model.
    fn check_variables(&self, registry: &AttributeRegistry, report: &mut ValidationReport) {
        let full = self.design_time_resolver(registry, None);
        for node in self.nodes() {
            let resolver;
            let scoped = match &node.data {
                NodeData::SetAttribute(data) => {
                    resolver = self.design_time_resolver(registry, Some(data.target));
                    &resolver
                }
                _ => &full,
            };
            for key in unknown_keys_in_node(node, scoped) {
                report.push_node(node.id.clone(), ValidationIssue::UnknownVariable { key });
            }
        }
    }

    fn design_time_resolver(
        &self,
        registry: &AttributeRegistry,
        model: Option<AttributeModel>,
    ) -> VariableResolver {
        VariableResolver::builder()
            .with_contact_fields()
            .with_flow_inputs(&self.input_variables)
            .with_attributes(registry, model)
            .build()
    }
}

/// Walks every string in the node's serialized data bag and collects the
/// unresolvable interpolation keys, deduplicated.
fn unknown_keys_in_node(node: &FlowNode, resolver: &VariableResolver) -> Vec<String> {
    let tagged = serde_json::to_value(&node.data).expect("node data always serializes");
    let bag = tagged.get("data").cloned().unwrap_or_default();

    let mut keys = Vec::new();
    collect_strings(&bag, &mut |text| {
        for key in resolver.unknown_keys(text) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    });
    keys
}

fn collect_strings(value: &serde_json::Value, visit: &mut impl FnMut(&str)) {
    match value {
        serde_json::Value::String(s) => visit(s),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_strings(item, visit);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                collect_strings(item, visit);
            }
        }
        _ => {}
    }
}
