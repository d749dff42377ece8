//! Host interface: what a DOM-like tree must provide to be hydrated
//!
//! [`HydrationHost`] is everything the reconciler and the append/insert
//! helpers touch. [`ClaimableDom`] adds the node inspection and creation
//! used by element and text claims. [`Document`](crate::dom::Document)
//! implements both; a binding to a real DOM would map [`NodeId`] handles
//! to its own nodes.

use crate::dom::NodeId;
use crate::error::Result;

/// Where `append` should place the next claimed child of a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndCursor {
    /// Not yet positioned; resolves to the first child
    #[default]
    Unset,
    /// Before this child
    At(NodeId),
    /// After the last child
    End,
}

/// Per-container reconciliation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerState {
    /// Set once the container's children have been reordered
    pub hydrate_init: bool,

    /// Insertion cursor for hydrating appends
    pub end_cursor: EndCursor,
}

/// Tree operations needed to reconcile and append during hydration
pub trait HydrationHost {
    /// Name used to match foreign-tolerant containers and claimed elements
    fn node_name(&self, node: NodeId) -> Result<String>;

    /// Children in document order
    fn child_nodes(&self, parent: NodeId) -> Result<Vec<NodeId>>;

    fn parent_node(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn first_child(&self, parent: NodeId) -> Result<Option<NodeId>>;

    fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>>;

    /// Claim order stamp; `None` for foreign or not-yet-claimed nodes
    fn claim_order(&self, node: NodeId) -> Result<Option<u32>>;

    fn set_claim_order(&mut self, node: NodeId, order: u32) -> Result<()>;

    /// Move `node` under `parent`, before `anchor` or at the end when `None`
    fn insert_before(&mut self, parent: NodeId, node: NodeId, anchor: Option<NodeId>)
        -> Result<()>;

    /// Detach `node` from its parent; no-op when already detached
    fn remove_child(&mut self, node: NodeId) -> Result<()>;

    fn container_state(&self, container: NodeId) -> Result<ContainerState>;

    fn container_state_mut(&mut self, container: NodeId) -> Result<&mut ContainerState>;
}

/// Node inspection and creation used by the claim helpers
pub trait ClaimableDom: HydrationHost {
    fn is_text(&self, node: NodeId) -> Result<bool>;

    fn text_data(&self, node: NodeId) -> Result<&str>;

    fn set_text_data(&mut self, node: NodeId, data: &str) -> Result<()>;

    /// Keep the first `offset` bytes in `node`, move the rest into a new
    /// text node placed right after it, and return the new node
    fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId>;

    fn attribute_names(&self, node: NodeId) -> Result<Vec<String>>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()>;

    /// Create a detached HTML element
    fn create_element(&mut self, name: &str) -> NodeId;

    /// Create a detached SVG element
    fn create_svg_element(&mut self, name: &str) -> NodeId;

    /// Create a detached text node
    fn create_text(&mut self, data: &str) -> NodeId;
}
