use thiserror::Error;

/// Errors raised by graph mutation operations.
///
/// These are hard failures of a single operation: the graph is left
/// untouched and the builder surfaces the message to the user. Problems
/// with an in-progress graph as a whole are not errors; they are collected
/// into a [`ValidationReport`](crate::graph::ValidationReport) instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown node type tag '{0}'")]
    UnknownNodeType(String),

    #[error("node '{0}' not found in this flow")]
    NodeNotFound(String),

    #[error("port '{port_id}' is not derived from the current data of node '{node_id}'")]
    InvalidPort { node_id: String, port_id: String },

    #[error("node '{0}' cannot be connected to itself")]
    SelfLoop(String),

    #[error("node '{0}' does not accept inbound connections")]
    TargetNotConnectable(String),

    #[error("data for node '{node_id}' does not match the '{tag}' schema: {message}")]
    InvalidNodeData {
        node_id: String,
        tag: String,
        message: String,
    },
}

/// Errors that can occur when saving or loading a binary flow archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("archive encoding failed: {0}")]
    Encode(String),

    #[error("archive decoding failed: {0}")]
    Decode(String),

    #[error("could not access archive file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
