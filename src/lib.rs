//! # Chatflow - Flow Graph Model and Validation Engine
//!
//! **Chatflow** is the graph core behind a visual automation builder for
//! customer-support chat flows. It owns the typed node/edge model, derives
//! each node's outbound connection points from its content, resolves
//! `{{token}}` interpolation across scopes, and validates graphs into a
//! structured report a builder UI can render. Execution of a validated
//! flow (sending messages, calling webhooks, invoking LLMs) belongs to an
//! external runtime that consumes the model this crate produces.
//!
//! ## Core Workflow
//!
//! 1.  **Load or create a flow**: parse a stored [`graph::FlowDocument`]
//!     (tolerant of per-node corruption) or start an empty
//!     [`graph::FlowDefinition`] and add nodes from the closed
//!     [`node::NodeKind`] set.
//! 2.  **Edit**: mutate through the graph operations. Ports are derived
//!     from node data on every edit; edges left dangling by a shrinking
//!     port set are pruned automatically.
//! 3.  **Validate**: [`graph::FlowDefinition::validate`] checks entry
//!     nodes, reachability, sub-flow contracts, and variable resolution,
//!     returning a [`graph::ValidationReport`]. Publishing is gated on
//!     `report.publishable()`; editing never is.
//! 4.  **Hand off**: serialize back to a document for the store, or bundle
//!     published flows into a binary [`graph::FlowArchive`] for the
//!     runtime.
//!
//! The model is single-threaded and synchronous: every operation is a pure
//! or in-memory-mutating function with no I/O and no suspension points.
//! One builder session edits one flow at a time; concurrent writers are a
//! persistence-layer concern (optimistic versioning), not a graph one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut flow = FlowDefinition::new("fl-welcome", "Welcome");
//!
//!     // Build a tiny graph: trigger -> buttons -> message
//!     let trigger = flow.add_node(NodeKind::Trigger, Position::new(0.0, 0.0)).id.clone();
//!     let buttons = flow.add_node(NodeKind::Buttons, Position::new(200.0, 0.0)).id.clone();
//!     let message = flow.add_node(NodeKind::Message, Position::new(400.0, 0.0)).id.clone();
//!
//!     flow.set_node_data(
//!         &buttons,
//!         NodeData::Buttons(ButtonsData {
//!             text: "How can we help, {{contact.name}}?".to_string(),
//!             buttons: vec!["Billing".to_string(), "Support".to_string()],
//!         }),
//!     )?;
//!
//!     // Ports are derived from the data: one per button.
//!     flow.connect(&trigger, "out", &buttons)?;
//!     flow.connect(&buttons, "btn-0", &message)?;
//!
//!     // Validate against the workspace's custom attributes.
//!     let registry = AttributeRegistry::default();
//!     let report = flow.validate(&registry, &());
//!     for (node, issue) in report.iter() {
//!         println!("{}: {}", node.unwrap_or("<flow>"), issue);
//!     }
//!
//!     if report.publishable() {
//!         println!("{}", flow.to_document().to_json());
//!     }
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod condition;
pub mod error;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod subflow;
pub mod variable;
