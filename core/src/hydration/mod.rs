//! Hydration session: claim server-rendered nodes, then mount them in order
//!
//! A [`Hydrator`] is the explicit context for one hydration pass over a
//! host tree. Rendering code drives it in two phases, mirroring how a
//! compiled component hydrates:
//!
//! 1. **Claim**: for each container, take its [`ClaimList`] with
//!    [`Hydrator::children`], claim the nodes the client expects
//!    ([`claim_element`](Hydrator::claim_element),
//!    [`claim_text`](Hydrator::claim_text)), then drop the leftovers with
//!    [`detach_unclaimed`](Hydrator::detach_unclaimed).
//! 2. **Mount**: [`append`](Hydrator::append) / [`insert`](Hydrator::insert)
//!    each node into its parent. The first hydrating append into a container
//!    reorders it via [`reconcile_container`]; later appends only walk the
//!    container's end cursor.
//!
//! # Example
//!
//! ```rust
//! use hydrakit_core::dom::Document;
//! use hydrakit_core::{HydrationConfig, Hydrator};
//!
//! // Server sent <P>, <H1> but the client renders <H1>, <P>
//! let mut doc = Document::new();
//! let body = doc.append_element(doc.root(), "body").unwrap();
//! doc.append_element(body, "p").unwrap();
//! doc.append_element(body, "h1").unwrap();
//!
//! let mut hydrator = Hydrator::new(&mut doc, HydrationConfig::default());
//! hydrator.start();
//!
//! let mut nodes = hydrator.children(body).unwrap();
//! let h1 = hydrator.claim_element(&mut nodes, "H1", &[]).unwrap();
//! let p = hydrator.claim_element(&mut nodes, "P", &[]).unwrap();
//! hydrator.detach_unclaimed(nodes).unwrap();
//!
//! hydrator.append(body, h1).unwrap();
//! hydrator.append(body, p).unwrap();
//! hydrator.end();
//!
//! assert_eq!(doc.snapshot(body).unwrap(), "<BODY><H1></H1><P></P></BODY>");
//! ```

mod phase;

pub use phase::ContainerPhase;

use crate::claim::{ClaimList, CursorPolicy, Processed};
use crate::config::HydrationConfig;
use crate::dom::NodeId;
use crate::error::Result;
use crate::host::{ClaimableDom, EndCursor};
use crate::reconcile::{reconcile_container, ReconcileReport};
use std::collections::HashMap;

/// Context for one hydration pass over a host tree
///
/// Holds the host mutably for its whole lifetime, so a pass can never be
/// re-entered or interleaved with other mutation of the same tree.
pub struct Hydrator<'a, D: ClaimableDom + ?Sized> {
    dom: &'a mut D,
    config: HydrationConfig,
    hydrating: bool,
    phases: HashMap<NodeId, ContainerPhase>,
}

impl<'a, D: ClaimableDom + ?Sized> Hydrator<'a, D> {
    pub fn new(dom: &'a mut D, config: HydrationConfig) -> Self {
        Self {
            dom,
            config,
            hydrating: false,
            phases: HashMap::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &*self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut *self.dom
    }

    pub fn config(&self) -> &HydrationConfig {
        &self.config
    }

    pub fn is_hydrating(&self) -> bool {
        self.hydrating
    }

    /// Lifecycle phase of a container; `Idle` if never touched
    pub fn phase(&self, container: NodeId) -> ContainerPhase {
        self.phases.get(&container).copied().unwrap_or_default()
    }

    /// Enter hydrating mode
    pub fn start(&mut self) {
        log::debug!("hydration started");
        self.hydrating = true;
    }

    /// Leave hydrating mode; every tracked container becomes `Normal`
    pub fn end(&mut self) {
        self.hydrating = false;
        for phase in self.phases.values_mut() {
            *phase = phase.on_session_end();
        }
        log::debug!("hydration ended ({} containers)", self.phases.len());
    }

    /// Snapshot `container`'s children for claiming
    pub fn children(&mut self, container: NodeId) -> Result<ClaimList> {
        let nodes = self.dom.child_nodes(container)?;
        let phase = self.phases.entry(container).or_default();
        *phase = phase.on_claim_started();
        Ok(ClaimList::new(nodes))
    }

    /// Claim an HTML element by name, or create it
    ///
    /// Names compare against the upper-cased `name`. A claimed element
    /// loses every attribute not listed in `keep_attributes`; the caller
    /// sets the values it wants afterwards.
    pub fn claim_element(
        &mut self,
        nodes: &mut ClaimList,
        name: &str,
        keep_attributes: &[&str],
    ) -> Result<NodeId> {
        let wanted = name.to_ascii_uppercase();
        self.claim_element_base(nodes, &wanted, keep_attributes, |dom: &mut D| {
            Ok(dom.create_element(name))
        })
    }

    /// Claim an SVG element by exact, case-sensitive name, or create it
    pub fn claim_svg_element(
        &mut self,
        nodes: &mut ClaimList,
        name: &str,
        keep_attributes: &[&str],
    ) -> Result<NodeId> {
        self.claim_element_base(nodes, name, keep_attributes, |dom: &mut D| {
            Ok(dom.create_svg_element(name))
        })
    }

    fn claim_element_base<C>(
        &mut self,
        nodes: &mut ClaimList,
        wanted: &str,
        keep_attributes: &[&str],
        create: C,
    ) -> Result<NodeId>
    where
        C: FnOnce(&mut D) -> Result<NodeId>,
    {
        nodes.claim_node(
            &mut *self.dom,
            |dom: &D, node| Ok(dom.node_name(node)? == wanted),
            |dom: &mut D, node| {
                for attribute in dom.attribute_names(node)? {
                    if !keep_attributes.contains(&attribute.as_str()) {
                        dom.remove_attribute(node, &attribute)?;
                    }
                }
                Ok(Processed::Consume)
            },
            create,
            CursorPolicy::Advance,
        )
    }

    /// Claim a text node holding `data`, or create it
    ///
    /// Any text node matches. If its data starts with `data` and is longer,
    /// it is split: the claimed node keeps `data` and the remainder goes
    /// back into `nodes` for the next text claim. Otherwise its data is
    /// overwritten.
    pub fn claim_text(&mut self, nodes: &mut ClaimList, data: &str) -> Result<NodeId> {
        let policy = if self.config.text_claims_update_cursor {
            CursorPolicy::Advance
        } else {
            CursorPolicy::Keep
        };

        nodes.claim_node(
            &mut *self.dom,
            |dom: &D, node| dom.is_text(node),
            |dom: &mut D, node| {
                let current = dom.text_data(node)?;
                if current.starts_with(data) {
                    if current.len() != data.len() {
                        let rest = dom.split_text(node, data.len())?;
                        return Ok(Processed::Replace(rest));
                    }
                } else {
                    dom.set_text_data(node, data)?;
                }
                Ok(Processed::Consume)
            },
            |dom: &mut D| Ok(dom.create_text(data)),
            policy,
        )
    }

    /// Claim a single space text node
    pub fn claim_space(&mut self, nodes: &mut ClaimList) -> Result<NodeId> {
        self.claim_text(nodes, " ")
    }

    /// Remove every node nobody claimed; returns how many were removed
    pub fn detach_unclaimed(&mut self, nodes: ClaimList) -> Result<usize> {
        let leftovers = nodes.into_remaining();
        for &node in &leftovers {
            self.dom.remove_child(node)?;
        }
        if !leftovers.is_empty() {
            log::trace!("detached {} unclaimed nodes", leftovers.len());
        }
        Ok(leftovers.len())
    }

    /// Reorder `container` into claim order if that has not happened yet
    pub fn reconcile(&mut self, container: NodeId) -> Result<ReconcileReport> {
        let report = reconcile_container(&mut *self.dom, container, &self.config)?;
        let phase = self.phases.entry(container).or_default();
        *phase = phase.on_reconciled();
        Ok(report)
    }

    /// Append `node` to `target`
    ///
    /// While hydrating, the first append reconciles `target`; afterwards
    /// `target`'s end cursor tracks the next stamped child expected in
    /// place, and `node` only moves when it is not already there. Outside
    /// hydration, `node` moves unless it already is `target`'s last child.
    pub fn append(&mut self, target: NodeId, node: NodeId) -> Result<()> {
        if !self.hydrating {
            if self.dom.parent_node(node)? != Some(target) || self.dom.next_sibling(node)?.is_some()
            {
                self.dom.insert_before(target, node, None)?;
            }
            return Ok(());
        }

        self.reconcile(target)?;

        let mut cursor = match self.dom.container_state(target)?.end_cursor {
            EndCursor::Unset => self.dom.first_child(target)?,
            EndCursor::End => None,
            EndCursor::At(child) => {
                if self.dom.parent_node(child)? == Some(target) {
                    Some(child)
                } else {
                    // Cursor node was moved elsewhere; start over
                    self.dom.first_child(target)?
                }
            }
        };

        // Skip nodes of undefined ordering
        while let Some(child) = cursor {
            if self.dom.claim_order(child)?.is_some() {
                break;
            }
            cursor = self.dom.next_sibling(child)?;
        }

        if cursor == Some(node) {
            cursor = self.dom.next_sibling(node)?;
        } else if self.dom.claim_order(node)?.is_some()
            || self.dom.parent_node(node)? != Some(target)
        {
            self.dom.insert_before(target, node, cursor)?;
        }

        self.dom.container_state_mut(target)?.end_cursor = match cursor {
            Some(child) => EndCursor::At(child),
            None => EndCursor::End,
        };
        Ok(())
    }

    /// Insert `node` into `target` before `anchor`
    ///
    /// A hydrating insert with no anchor is an [`append`](Self::append).
    pub fn insert(&mut self, target: NodeId, node: NodeId, anchor: Option<NodeId>) -> Result<()> {
        if self.hydrating && anchor.is_none() {
            return self.append(target, node);
        }
        if self.dom.parent_node(node)? != Some(target) || self.dom.next_sibling(node)? != anchor {
            self.dom.insert_before(target, node, anchor)?;
        }
        Ok(())
    }

    /// Remove `node` from its parent, if it has one
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        self.dom.remove_child(node)
    }
}
