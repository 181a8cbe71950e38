//! The persisted flow document and the binary flow archive.
//!
//! Documents are the JSON form the external store reads and writes:
//! `nodes[].data` is an open bag keyed by the node's `type` tag. Loading
//! is tolerant per node: unknown tags, schema mismatches, and stale edges
//! become report entries instead of aborting the whole document, since
//! corrupt rows must not lock an agent out of the builder.

use super::validate::{ValidationIssue, ValidationReport};
use super::{FlowDefinition, FlowEdge, FlowNode, InputVariable, Position};
use crate::error::{ArchiveError, GraphError};
use crate::node;
use ahash::AHashSet;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use tracing::warn;

/// One stored node: type tag plus an open data bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    pub data: serde_json::Value,
}

/// One stored edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentEdge {
    pub id: String,
    pub source_node_id: String,
    pub source_port_id: String,
    pub target_node_id: String,
}

/// The JSON document exchanged with the external store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub ai_tool: bool,
    pub ai_tool_description: String,
    pub input_variables: Vec<InputVariable>,
    pub nodes: Vec<DocumentNode>,
    pub edges: Vec<DocumentEdge>,
}

impl FlowDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("documents always serialize")
    }
}

impl FlowDefinition {
    /// Builds a graph from a stored document.
    ///
    /// Per-node corruption (unknown type tags, data that does not fit the
    /// tag's schema, duplicated ids) is reported and the node skipped;
    /// edges whose endpoints were skipped are dropped, and edges whose
    /// port is no longer derived are dropped with a warning. The returned
    /// report is empty for a well-formed document.
    pub fn from_document(doc: FlowDocument) -> (FlowDefinition, ValidationReport) {
        let mut report = ValidationReport::default();
        let mut flow = FlowDefinition {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            enabled: doc.enabled,
            ai_tool: doc.ai_tool,
            ai_tool_description: doc.ai_tool_description,
            input_variables: doc.input_variables,
            ..FlowDefinition::default()
        };

        let duplicate_ids: AHashSet<String> =
            doc.nodes.iter().map(|n| n.id.clone()).duplicates().collect();
        for id in duplicate_ids.iter().sorted() {
            report.push_node(id.clone(), ValidationIssue::DuplicateNodeId);
        }

        let mut seen: AHashSet<String> = AHashSet::new();
        for raw in doc.nodes {
            if !seen.insert(raw.id.clone()) {
                continue;
            }
            match node::parse_data(&raw.id, &raw.node_type, raw.data) {
                Ok(data) => flow.insert_node(FlowNode {
                    id: raw.id,
                    position: raw.position,
                    data,
                }),
                Err(GraphError::UnknownNodeType(tag)) => {
                    warn!(node = %raw.id, %tag, "skipping node with unknown type tag");
                    report.push_node(raw.id, ValidationIssue::UnknownNodeType { tag });
                }
                Err(GraphError::InvalidNodeData { tag, message, .. }) => {
                    warn!(node = %raw.id, %tag, "skipping node with malformed data");
                    report.push_node(raw.id, ValidationIssue::InvalidNodeData { tag, message });
                }
                Err(_) => unreachable!("parse_data only fails with type or data errors"),
            }
        }

        let mut connected_targets: AHashSet<String> = AHashSet::new();
        for raw in doc.edges {
            let Some(source) = flow.node(&raw.source_node_id) else {
                continue;
            };
            if flow.node(&raw.target_node_id).is_none() {
                continue;
            }
            if !node::has_port(&source.data, &raw.source_port_id) {
                let edge_id = if raw.id.is_empty() {
                    FlowEdge::derived_id(&raw.source_node_id, &raw.source_port_id, &raw.target_node_id)
                } else {
                    raw.id
                };
                report.push_node(
                    raw.source_node_id,
                    ValidationIssue::DanglingEdge {
                        edge_id,
                        port_id: raw.source_port_id,
                    },
                );
                continue;
            }
            // One inbound edge per target; later duplicates lose.
            if !connected_targets.insert(raw.target_node_id.clone()) {
                continue;
            }
            let id = if raw.id.is_empty() {
                FlowEdge::derived_id(&raw.source_node_id, &raw.source_port_id, &raw.target_node_id)
            } else {
                raw.id
            };
            flow.insert_edge(FlowEdge {
                id,
                source: raw.source_node_id,
                source_port: raw.source_port_id,
                target: raw.target_node_id,
            });
        }

        (flow, report)
    }

    /// Serializes the graph into its stored document form. Ports are a
    /// derivation of `data` and are never written out.
    pub fn to_document(&self) -> FlowDocument {
        let nodes = self
            .nodes()
            .iter()
            .map(|node| {
                let tagged =
                    serde_json::to_value(&node.data).expect("node data always serializes");
                DocumentNode {
                    id: node.id.clone(),
                    node_type: node.data.tag().to_string(),
                    position: node.position,
                    data: tagged.get("data").cloned().unwrap_or_default(),
                }
            })
            .collect();
        let edges = self
            .edges()
            .iter()
            .map(|edge| DocumentEdge {
                id: edge.id.clone(),
                source_node_id: edge.source.clone(),
                source_port_id: edge.source_port.clone(),
                target_node_id: edge.target.clone(),
            })
            .collect();

        FlowDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
            ai_tool: self.ai_tool,
            ai_tool_description: self.ai_tool_description.clone(),
            input_variables: self.input_variables.clone(),
            nodes,
            edges,
        }
    }
}

/// A compact binary bundle of published flows, for deployments that
/// snapshot a workspace without a JSON store round-trip.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FlowArchive {
    pub flows: Vec<FlowDefinition>,
}

impl FlowArchive {
    pub fn new(flows: Vec<FlowDefinition>) -> Self {
        Self { flows }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        encode_to_vec(self, standard()).map_err(|e| ArchiveError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        decode_from_slice(bytes, standard())
            .map(|(archive, _)| archive)
            .map_err(|e| ArchiveError::Decode(e.to_string()))
    }

    pub fn save(&self, path: &str) -> Result<(), ArchiveError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Ok(())
    }

    pub fn from_file(path: &str) -> Result<Self, ArchiveError> {
        let mut file = fs::File::open(path).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            source: e,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_bytes(&bytes)
    }
}
