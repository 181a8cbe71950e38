//! The flow graph model: nodes, edges, input-variable declarations, and
//! the mutation operations the builder edits a flow through.
//!
//! Every mutation that can shrink a node's derived port set is itself
//! responsible for pruning edges left dangling by the change; callers
//! never have to remember a separate prune step.

use crate::error::GraphError;
use crate::node::{self, NodeData, NodeKind, OutputPort};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub mod persist;
pub mod validate;

pub use persist::{FlowArchive, FlowDocument};
pub use validate::{FlowCatalog, Severity, ValidationIssue, ValidationReport};

/// Canvas position of a node. Layout only; no semantic effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One declared input of a flow: the contract callers (other flows or the
/// AI) must satisfy to start it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputVariable {
    pub key: String,
    pub label: String,
    pub required: bool,
}

/// A typed unit of behavior in a flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
}

impl FlowNode {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// The node's current outbound ports, derived from its data.
    pub fn ports(&self) -> Vec<OutputPort> {
        node::derive_ports(&self.data)
    }
}

/// A directed connection from a source node's port to a target node's
/// single inbound point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub source_port: String,
    pub target: String,
}

impl FlowEdge {
    fn derived_id(source: &str, port: &str, target: &str) -> String {
        format!("e-{}-{}-{}", source, port, target)
    }
}

/// A named automation graph, exclusively owning its nodes and edges.
///
/// Collections are private: all mutation goes through the operations
/// below so the structural invariants hold at every step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    /// Marks this flow as invocable by an AI agent as a callable tool.
    pub ai_tool: bool,
    pub ai_tool_description: String,
    pub input_variables: Vec<InputVariable>,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
}

impl FlowDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    fn node_mut(&mut self, node_id: &str) -> Option<&mut FlowNode> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    /// Nodes with no inbound connection point (`start`/`trigger`).
    pub fn entry_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|n| !node::accepts_inbound(n.kind()))
    }

    /// Derived ports of a node, failing when the node does not exist.
    pub fn ports_of(&self, node_id: &str) -> Result<Vec<OutputPort>, GraphError> {
        self.node(node_id)
            .map(FlowNode::ports)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))
    }

    /// Creates a node of `kind` with the registry's default data.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> &FlowNode {
        let id = self.fresh_node_id(kind);
        trace!(node = %id, kind = %kind, "add node");
        self.nodes.push(FlowNode {
            id,
            position,
            data: NodeData::default_for(kind),
        });
        self.nodes.last().expect("node was just pushed")
    }

    /// Creates a node from a wire tag, failing on unknown tags.
    pub fn add_node_tagged(
        &mut self,
        tag: &str,
        position: Position,
    ) -> Result<&FlowNode, GraphError> {
        let kind = node::kind_from_tag(tag)?;
        Ok(self.add_node(kind, position))
    }

    /// Replaces a node's payload, then prunes edges whose source port is
    /// no longer derived.
    pub fn set_node_data(&mut self, node_id: &str, data: NodeData) -> Result<(), GraphError> {
        let node = self
            .node_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.data = data;
        self.prune_dangling_edges(node_id);
        Ok(())
    }

    /// Merges a partial JSON bag into a node's data.
    ///
    /// The merged bag is re-validated against the node's type schema
    /// before it replaces the old payload; a patch that does not fit the
    /// schema leaves the node untouched. Edges referencing ports the new
    /// data no longer derives are pruned, not reported.
    pub fn update_node_data(
        &mut self,
        node_id: &str,
        patch: serde_json::Value,
    ) -> Result<(), GraphError> {
        let node = self
            .node(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        let tag = node.data.tag();

        let tagged = serde_json::to_value(&node.data)
            .expect("node data always serializes");
        let mut bag = tagged
            .get("data")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        if let (Some(current), serde_json::Value::Object(patch)) = (bag.as_object_mut(), patch) {
            for (key, value) in patch {
                current.insert(key, value);
            }
        }

        let merged = node::parse_data(node_id, tag, bag)?;
        self.set_node_data(node_id, merged)
    }

    /// Deletes a node and every edge referencing it as source or target.
    pub fn remove_node(&mut self, node_id: &str) -> Result<FlowNode, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        let removed = self.nodes.remove(index);
        let before = self.edges.len();
        self.edges
            .retain(|e| e.source != node_id && e.target != node_id);
        debug!(
            node = %node_id,
            edges_removed = before - self.edges.len(),
            "removed node"
        );
        Ok(removed)
    }

    /// Connects a source port to a target node's inbound point.
    ///
    /// Fails without mutating when the port is not currently derived, the
    /// connection would loop a node onto itself, or the target takes no
    /// inbound edge. An existing inbound edge on the target (and any edge
    /// already leaving the same port) is replaced; repeating an identical
    /// connection is a no-op returning the existing edge.
    pub fn connect(
        &mut self,
        source_id: &str,
        source_port: &str,
        target_id: &str,
    ) -> Result<&FlowEdge, GraphError> {
        if source_id == target_id {
            return Err(GraphError::SelfLoop(source_id.to_string()));
        }
        let source = self
            .node(source_id)
            .ok_or_else(|| GraphError::NodeNotFound(source_id.to_string()))?;
        if !node::has_port(&source.data, source_port) {
            return Err(GraphError::InvalidPort {
                node_id: source_id.to_string(),
                port_id: source_port.to_string(),
            });
        }
        let target = self
            .node(target_id)
            .ok_or_else(|| GraphError::NodeNotFound(target_id.to_string()))?;
        if !node::accepts_inbound(target.kind()) {
            return Err(GraphError::TargetNotConnectable(target_id.to_string()));
        }

        if let Some(index) = self.edges.iter().position(|e| {
            e.source == source_id && e.source_port == source_port && e.target == target_id
        }) {
            return Ok(&self.edges[index]);
        }

        // One inbound edge per target, one outbound edge per port.
        self.edges.retain(|e| {
            e.target != target_id && !(e.source == source_id && e.source_port == source_port)
        });

        trace!(source = %source_id, port = %source_port, target = %target_id, "connect");
        self.edges.push(FlowEdge {
            id: FlowEdge::derived_id(source_id, source_port, target_id),
            source: source_id.to_string(),
            source_port: source_port.to_string(),
            target: target_id.to_string(),
        });
        Ok(self.edges.last().expect("edge was just pushed"))
    }

    /// Removes an edge by id.
    pub fn remove_edge(&mut self, edge_id: &str) -> Option<FlowEdge> {
        let index = self.edges.iter().position(|e| e.id == edge_id)?;
        Some(self.edges.remove(index))
    }

    /// Drops edges whose source port is no longer derived from `node_id`'s
    /// current data. Shrinking a port set by editing a node is expected,
    /// so pruning is silent rather than an error.
    fn prune_dangling_edges(&mut self, node_id: &str) {
        let Some(node) = self.node(node_id) else {
            return;
        };
        let ports = node.ports();
        let before = self.edges.len();
        self.edges.retain(|e| {
            e.source != node_id || ports.iter().any(|p| p.id == e.source_port)
        });
        let pruned = before - self.edges.len();
        if pruned > 0 {
            debug!(node = %node_id, pruned, "pruned dangling edges after data edit");
        }
    }

    pub(crate) fn insert_node(&mut self, node: FlowNode) {
        self.nodes.push(node);
    }

    pub(crate) fn insert_edge(&mut self, edge: FlowEdge) {
        self.edges.push(edge);
    }

    fn fresh_node_id(&self, kind: NodeKind) -> String {
        let mut n = self.nodes.len() + 1;
        loop {
            let id = format!("{}-{}", kind.tag(), n);
            if self.node(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}
