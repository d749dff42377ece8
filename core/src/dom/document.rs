//! Document: arena-backed DOM tree
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. Removed nodes
//! stay in the arena, detached, so handles never dangle.

use super::node::{Namespace, Node, NodeId, NodeKind};
use crate::error::{HydrateError, Result};
use crate::host::{ClaimableDom, ContainerState, HydrationHost};
use serde::{Deserialize, Serialize};

/// In-memory document
///
/// # Example
///
/// ```rust
/// use hydrakit_core::dom::Document;
///
/// let mut doc = Document::new();
/// let body = doc.append_element(doc.root(), "body").unwrap();
/// let p = doc.append_element(body, "p").unwrap();
/// doc.append_text(p, "Hello").unwrap();
///
/// assert_eq!(doc.snapshot(body).unwrap(), "<BODY><P>Hello</P></BODY>");
/// ```
///
/// Deserializing rejects an arena that does not form a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Unchecked wire form of [`Document`]
#[derive(Deserialize)]
struct RawDocument {
    nodes: Vec<Node>,
    root: NodeId,
}

impl TryFrom<RawDocument> for Document {
    type Error = HydrateError;

    fn try_from(raw: RawDocument) -> Result<Self> {
        let RawDocument { mut nodes, root } = raw;
        let len = nodes.len();
        let in_range = |id: NodeId| id.index() < len;
        let malformed = |reason: String| Err(HydrateError::MalformedDocument(reason));

        if !in_range(root) {
            return malformed(format!("root {} outside an arena of {} nodes", root, len));
        }
        if nodes[root.index()].parent.is_some() {
            return malformed(format!("root {} has a parent", root));
        }

        for (i, node) in nodes.iter().enumerate() {
            let id = NodeId(i as u32);
            if !node.children.is_empty() && !node.kind.is_container() {
                return malformed(format!("{} holds children but is not a container", id));
            }
            if let Some(parent) = node.parent {
                if !in_range(parent) {
                    return malformed(format!("parent {} of {} does not exist", parent, id));
                }
                let listed = nodes[parent.index()]
                    .children
                    .iter()
                    .filter(|&&c| c == id)
                    .count();
                if listed != 1 {
                    return malformed(format!(
                        "{} is listed {} times under its parent {}",
                        id, listed, parent
                    ));
                }
            }
            for &child in &node.children {
                if !in_range(child) {
                    return malformed(format!("child {} of {} does not exist", child, id));
                }
                if nodes[child.index()].parent != Some(id) {
                    return malformed(format!("{} is listed under {} but not parented there", child, id));
                }
            }
        }

        // Links agree, so a parent chain longer than the arena must loop
        for i in 0..len {
            let mut cursor = nodes[i].parent;
            let mut steps = 0;
            while let Some(current) = cursor {
                steps += 1;
                if steps > len {
                    return malformed(format!("{} is its own ancestor", NodeId(i as u32)));
                }
                cursor = nodes[current.index()].parent;
            }
        }

        let slots: Vec<(usize, usize)> = nodes
            .iter()
            .flat_map(|n| n.children.iter().enumerate().map(|(slot, c)| (c.index(), slot)))
            .collect();
        for (index, slot) in slots {
            nodes[index].slot = slot;
        }

        Ok(Self { nodes, root })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only its root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.index())
            .ok_or(HydrateError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(HydrateError::NodeNotFound(id))
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind));
        id
    }

    /// Create a detached element in the HTML namespace (name upper-cased)
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_element_ns(name, Namespace::Html)
    }

    /// Create a detached element in the given namespace
    pub fn create_element_ns(&mut self, name: &str, namespace: Namespace) -> NodeId {
        let name = match namespace {
            Namespace::Html => name.to_ascii_uppercase(),
            Namespace::Svg => name.to_string(),
        };
        self.alloc(NodeKind::Element {
            name,
            namespace,
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Text(data.to_string()))
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.to_string()))
    }

    /// Create an HTML element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        let id = self.create_element(name);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`
    pub fn append_text(&mut self, parent: NodeId, data: &str) -> Result<NodeId> {
        let id = self.create_text(data);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.insert_before(parent, node, None)
    }

    /// Move `node` under `parent`, before `anchor` (or last when `None`)
    ///
    /// Detaches `node` from its current parent first. Inserting a node
    /// before itself is a no-op.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        anchor: Option<NodeId>,
    ) -> Result<()> {
        if !self.get(parent)?.kind.is_container() {
            return Err(HydrateError::NotAContainer(parent));
        }
        self.get(node)?;
        if let Some(anchor) = anchor {
            if self.get(anchor)?.parent != Some(parent) {
                return Err(HydrateError::NotAChild {
                    parent,
                    child: anchor,
                });
            }
            if anchor == node {
                return Ok(());
            }
        }
        if self.is_inclusive_ancestor(node, parent)? {
            return Err(HydrateError::HierarchyCycle { parent, node });
        }

        self.remove(node)?;

        let position = match anchor {
            Some(anchor) => match self.position_in_parent(anchor)? {
                Some((_, index)) => index,
                None => {
                    return Err(HydrateError::NotAChild {
                        parent,
                        child: anchor,
                    })
                }
            },
            None => self.get(parent)?.children.len(),
        };
        self.get_mut(parent)?.children.insert(position, node);
        self.get_mut(node)?.parent = Some(parent);
        self.reindex_children(parent, position)
    }

    /// Detach `node` from its parent, keeping its subtree intact
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let Some((parent, index)) = self.position_in_parent(node)? else {
            return Ok(());
        };
        self.get_mut(parent)?.children.remove(index);
        self.get_mut(node)?.parent = None;
        self.reindex_children(parent, index)
    }

    /// Refresh `slot` for `parent`'s children from `from` onward
    fn reindex_children(&mut self, parent: NodeId, from: usize) -> Result<()> {
        let len = self.get(parent)?.children.len();
        for slot in from..len {
            let child = self.get(parent)?.children[slot];
            self.get_mut(child)?.slot = slot;
        }
        Ok(())
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    ///
    /// The walk is bounded by the arena size, so a corrupted parent chain
    /// is reported instead of looping.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool> {
        let mut cursor = Some(node);
        let mut steps = 0;
        while let Some(current) = cursor {
            if current == ancestor {
                return Ok(true);
            }
            steps += 1;
            if steps > self.nodes.len() {
                return Err(HydrateError::MalformedDocument(format!(
                    "parent chain of {} does not end",
                    node
                )));
            }
            cursor = self.get(current)?.parent;
        }
        Ok(false)
    }

    pub fn children(&self, parent: NodeId) -> Result<&[NodeId]> {
        Ok(self.get(parent)?.children())
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node)?.parent)
    }

    fn position_in_parent(&self, node: NodeId) -> Result<Option<(NodeId, usize)>> {
        let entry = self.get(node)?;
        let Some(parent) = entry.parent else {
            return Ok(None);
        };
        if self.get(parent)?.children.get(entry.slot) != Some(&node) {
            return Err(HydrateError::NotAChild {
                parent,
                child: node,
            });
        }
        Ok(Some((parent, entry.slot)))
    }

    pub fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        match self.position_in_parent(node)? {
            Some((parent, index)) => Ok(self.get(parent)?.children.get(index + 1).copied()),
            None => Ok(None),
        }
    }

    pub fn claim_order(&self, node: NodeId) -> Result<Option<u32>> {
        Ok(self.get(node)?.claim_order)
    }

    /// Claim orders of `parent`'s children in document order
    pub fn child_claim_orders(&self, parent: NodeId) -> Result<Vec<Option<u32>>> {
        self.get(parent)?
            .children
            .iter()
            .map(|&c| self.claim_order(c))
            .collect()
    }

    /// Forget every claim stamp and reconciliation flag
    pub fn clear_hydration_state(&mut self) {
        for node in &mut self.nodes {
            node.claim_order = None;
            node.state = ContainerState::default();
        }
    }

    pub fn text(&self, node: NodeId) -> Result<&str> {
        match &self.get(node)?.kind {
            NodeKind::Text(data) => Ok(data),
            _ => Err(HydrateError::NotText(node)),
        }
    }

    pub fn set_text(&mut self, node: NodeId, data: &str) -> Result<()> {
        match &mut self.get_mut(node)?.kind {
            NodeKind::Text(current) => {
                current.clear();
                current.push_str(data);
                Ok(())
            }
            _ => Err(HydrateError::NotText(node)),
        }
    }

    /// Split a text node at a byte offset
    ///
    /// `node` keeps `[0, offset)`; the remainder moves to a new text node
    /// inserted directly after it when `node` is attached.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId> {
        let tail = match &mut self.get_mut(node)?.kind {
            NodeKind::Text(data) => {
                if offset > data.len() || !data.is_char_boundary(offset) {
                    return Err(HydrateError::SplitOutOfBounds {
                        node,
                        offset,
                        length: data.len(),
                    });
                }
                data.split_off(offset)
            }
            _ => return Err(HydrateError::NotText(node)),
        };

        let next = self.next_sibling(node)?;
        let parent = self.parent(node)?;
        let created = self.create_text(&tail);
        if let Some(parent) = parent {
            self.insert_before(parent, created, next)?;
        }
        Ok(created)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> Result<String> {
        let mut out = String::new();
        self.collect_text(node, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, node: NodeId, out: &mut String) -> Result<()> {
        let n = self.get(node)?;
        if let NodeKind::Text(data) = &n.kind {
            out.push_str(data);
        }
        for &child in &n.children {
            self.collect_text(child, out)?;
        }
        Ok(())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<&str>> {
        match &self.get(node)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())),
            _ => Ok(None),
        }
    }

    /// Set or replace an attribute; ignored on non-elements
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        if let NodeKind::Element { attributes, .. } = &mut self.get_mut(node)?.kind {
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        if let NodeKind::Element { attributes, .. } = &mut self.get_mut(node)?.kind {
            attributes.retain(|(n, _)| n != name);
        }
        Ok(())
    }

    /// Compact markup rendering, for tests and debug logs
    ///
    /// Attribute values are emitted verbatim (no escaping).
    pub fn snapshot(&self, node: NodeId) -> Result<String> {
        let mut out = String::new();
        self.write_snapshot(node, &mut out)?;
        Ok(out)
    }

    fn write_snapshot(&self, node: NodeId, out: &mut String) -> Result<()> {
        let n = self.get(node)?;
        match &n.kind {
            NodeKind::Document => {
                for &child in &n.children {
                    self.write_snapshot(child, out)?;
                }
            }
            NodeKind::Element {
                name, attributes, ..
            } => {
                out.push('<');
                out.push_str(name);
                for (attr, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", attr, value));
                }
                out.push('>');
                for &child in &n.children {
                    self.write_snapshot(child, out)?;
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            NodeKind::Text(data) => out.push_str(data),
            NodeKind::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
        }
        Ok(())
    }
}

impl HydrationHost for Document {
    fn node_name(&self, node: NodeId) -> Result<String> {
        Ok(self.get(node)?.kind.node_name().to_string())
    }

    fn child_nodes(&self, parent: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.children(parent)?.to_vec())
    }

    fn parent_node(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.parent(node)
    }

    fn first_child(&self, parent: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(parent)?.children.first().copied())
    }

    fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        Document::next_sibling(self, node)
    }

    fn claim_order(&self, node: NodeId) -> Result<Option<u32>> {
        Document::claim_order(self, node)
    }

    fn set_claim_order(&mut self, node: NodeId, order: u32) -> Result<()> {
        self.get_mut(node)?.claim_order = Some(order);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        anchor: Option<NodeId>,
    ) -> Result<()> {
        Document::insert_before(self, parent, node, anchor)
    }

    fn remove_child(&mut self, node: NodeId) -> Result<()> {
        self.remove(node)
    }

    fn container_state(&self, container: NodeId) -> Result<ContainerState> {
        Ok(self.get(container)?.state)
    }

    fn container_state_mut(&mut self, container: NodeId) -> Result<&mut ContainerState> {
        Ok(&mut self.get_mut(container)?.state)
    }
}

impl ClaimableDom for Document {
    fn is_text(&self, node: NodeId) -> Result<bool> {
        Ok(matches!(self.get(node)?.kind, NodeKind::Text(_)))
    }

    fn text_data(&self, node: NodeId) -> Result<&str> {
        self.text(node)
    }

    fn set_text_data(&mut self, node: NodeId, data: &str) -> Result<()> {
        self.set_text(node, data)
    }

    fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId> {
        Document::split_text(self, node, offset)
    }

    fn attribute_names(&self, node: NodeId) -> Result<Vec<String>> {
        match &self.get(node)?.kind {
            NodeKind::Element { attributes, .. } => {
                Ok(attributes.iter().map(|(n, _)| n.clone()).collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        Document::remove_attribute(self, node, name)
    }

    fn create_element(&mut self, name: &str) -> NodeId {
        Document::create_element(self, name)
    }

    fn create_svg_element(&mut self, name: &str) -> NodeId {
        self.create_element_ns(name, Namespace::Svg)
    }

    fn create_text(&mut self, data: &str) -> NodeId {
        Document::create_text(self, data)
    }
}
