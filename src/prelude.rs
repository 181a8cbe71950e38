//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the chatflow
//! crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let doc = FlowDocument::from_json(&json)?;
//! let (flow, load_report) = FlowDefinition::from_document(doc);
//!
//! let registry = AttributeRegistry::default();
//! let report = flow.validate(&registry, &());
//! println!("publishable: {}", report.publishable());
//! # Ok(())
//! # }
//! ```

// Graph model and mutation surface
pub use crate::graph::{
    FlowArchive, FlowCatalog, FlowDefinition, FlowDocument, FlowEdge, FlowNode, InputVariable,
    Position, Severity, ValidationIssue, ValidationReport,
};

// Node types, data payloads, and port derivation
pub use crate::node::{
    derive_ports, AssignTarget, ButtonsData, ClassifierData, ConditionData, EndBehavior,
    MessageData, NodeData, NodeKind, OutputPort, SelectData, StartData, StartFlowData, TagAction,
    TriggerEvent,
};

// Condition evaluation contract
pub use crate::condition::{
    evaluate_and_select, evaluate_rules, select_branch, ConditionOperator, ConditionRule,
    LogicOperator, RuleSubject, RuleValueSource,
};

// Variables and attributes
pub use crate::attribute::{AttributeDefinition, AttributeModel, AttributeRegistry};
pub use crate::variable::{Resolution, VariableResolver, CONTACT_FIELDS};

// Sub-flow invocation
pub use crate::subflow::{plan_invocation, InvocationPlan, ResolvedBinding};

// Error types
pub use crate::error::{ArchiveError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
