//! Error types for hydration and tree mutation

use crate::dom::NodeId;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HydrateError>;

/// Errors raised while claiming nodes, reordering containers, or mutating
/// the in-memory document.
#[derive(Debug, Error)]
pub enum HydrateError {
    /// Node handle does not exist in the host tree
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Node cannot hold children (text, comment)
    #[error("Node {0} is not a container")]
    NotAContainer(NodeId),

    /// Reference node is not a child of the given parent
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Text operation on a non-text node
    #[error("Node {0} is not a text node")]
    NotText(NodeId),

    /// Split offset past the end or inside a UTF-8 sequence
    #[error("Cannot split text node {node} at byte {offset} (length: {length})")]
    SplitOutOfBounds {
        node: NodeId,
        offset: usize,
        length: usize,
    },

    /// Insertion would make a node its own ancestor
    #[error("Inserting {node} into {parent} would create a cycle")]
    HierarchyCycle { parent: NodeId, node: NodeId },

    /// Child reached reconciliation without a claim order
    #[error("Child {node} of {container} has no claim order")]
    MissingClaimOrder { container: NodeId, node: NodeId },

    /// Two children of one container share a claim order
    #[error("Claim order {order} appears more than once under {container}")]
    DuplicateClaimOrder { container: NodeId, order: u32 },

    /// Deserialized document arena does not form a tree
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Configuration could not be parsed
    #[error("Invalid hydration config: {0}")]
    Config(#[from] serde_json::Error),
}
