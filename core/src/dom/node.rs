//! Node handles and node payloads for the in-memory document

use crate::host::ContainerState;
use serde::{Deserialize, Serialize};

/// Handle to a node in a hydration host
///
/// Hosts hand these out and resolve them back to their own nodes. In
/// [`Document`](super::Document) it is the arena slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element namespace
///
/// HTML element names are stored upper-case (matching DOM `nodeName`);
/// SVG names keep their case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Namespace {
    Html,
    Svg,
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Document root
    Document,

    /// Element with ordered attributes
    Element {
        name: String,
        namespace: Namespace,
        attributes: Vec<(String, String)>,
    },

    /// Character data
    Text(String),

    /// Comment (hydration markers, server annotations)
    Comment(String),
}

impl NodeKind {
    /// DOM-style node name: element tag, `#text`, `#comment` or `#document`
    pub fn node_name(&self) -> &str {
        match self {
            NodeKind::Document => "#document",
            NodeKind::Element { name, .. } => name,
            NodeKind::Text(_) => "#text",
            NodeKind::Comment(_) => "#comment",
        }
    }

    /// Only documents and elements hold children
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element { .. })
    }
}

/// A node slot in the document arena
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    /// Position in the parent's `children`; kept exact on every insert and removal
    #[serde(skip)]
    pub(crate) slot: usize,

    /// Stamp assigned when hydration claims this node
    pub(crate) claim_order: Option<u32>,

    /// Reconciliation bookkeeping, meaningless outside a hydration pass
    #[serde(skip)]
    pub(crate) state: ContainerState,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            slot: 0,
            claim_order: None,
            state: ContainerState::default(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn claim_order(&self) -> Option<u32> {
        self.claim_order
    }
}
