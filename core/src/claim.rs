//! Claim tracker: match pending server-rendered nodes to client requests
//!
//! Each container being hydrated gets a [`ClaimList`] holding the nodes not
//! yet claimed. Every claim stamps the returned node with the next claim
//! order, so the reconciler can later put the container's children in the
//! order the client asked for them.
//!
//! # Scan strategy
//!
//! A claim scans forward from the last match, then backward from just
//! before it. Requests that arrive in document order therefore cost one
//! probe each, and a request that trails the cursor does not restart the
//! scan from the front. Matching near the cursor also tends to lengthen the
//! run of already-ordered nodes, which means fewer moves at reconcile time.

use crate::dom::NodeId;
use crate::error::Result;
use crate::host::HydrationHost;
use serde::{Deserialize, Serialize};

/// Bookkeeping for one container's claim pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInfo {
    /// Position of the most recent match; a hint, never authoritative
    pub last_index: usize,

    /// Next claim order to hand out
    pub total_claimed: u32,

    /// Candidate nodes passed to a predicate so far
    pub probes: u64,
}

/// What a claim did with the matched node's slot in the pending list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    /// Drop the node from the pending list
    Consume,
    /// Put this node in the matched node's slot (e.g. the tail of a split text node)
    Replace(NodeId),
}

/// Whether a match moves `last_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPolicy {
    Advance,
    /// Used for low-value matches such as text, where preserving the
    /// cursor keeps it on the element run it was tracking
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Pending children of one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimList {
    nodes: Vec<NodeId>,
    info: ClaimInfo,
}

impl ClaimList {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            info: ClaimInfo::default(),
        }
    }

    /// Nodes still waiting to be claimed
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn info(&self) -> ClaimInfo {
        self.info
    }

    /// Unclaimed leftovers, in their remaining order
    pub fn into_remaining(self) -> Vec<NodeId> {
        self.nodes
    }

    /// Claim the first pending node matching `predicate`, or create one
    ///
    /// Scans forward from `last_index`, then backward from
    /// `last_index - 1`. A match is handed to `process`, which decides what
    /// stays in its slot. With no match, `create` builds a fresh node. The
    /// returned node, matched or created, is stamped with the next claim
    /// order.
    ///
    /// The stamp is written before `process` runs, while the node is still
    /// pending: a failed stamp leaves the list untouched, and a failed
    /// `process` leaves the stamped node pending with its order used up, so
    /// orders stay unique. `total_claimed` only advances once a stamp has
    /// been written.
    pub fn claim_node<H, P, F, C>(
        &mut self,
        host: &mut H,
        mut predicate: P,
        process: F,
        create: C,
        policy: CursorPolicy,
    ) -> Result<NodeId>
    where
        H: HydrationHost + ?Sized,
        P: FnMut(&H, NodeId) -> Result<bool>,
        F: FnOnce(&mut H, NodeId) -> Result<Processed>,
        C: FnOnce(&mut H) -> Result<NodeId>,
    {
        let start = self.info.last_index.min(self.nodes.len());

        let hit = match self.scan(host, &mut predicate, start..self.nodes.len())? {
            Some(i) => Some((i, Direction::Forward)),
            None => self
                .scan(host, &mut predicate, (0..start).rev())?
                .map(|i| (i, Direction::Backward)),
        };

        let Some((index, direction)) = hit else {
            let node = create(host)?;
            self.stamp(host, node)?;
            log::trace!("no pending match, created {}", node);
            return Ok(node);
        };

        let node = self.nodes[index];
        self.stamp(host, node)?;
        let processed = process(host, node)?;
        self.settle(index, direction, processed, policy);
        log::trace!(
            "claimed {} at pending index {} ({:?})",
            node,
            index,
            direction
        );
        Ok(node)
    }

    fn stamp<H>(&mut self, host: &mut H, node: NodeId) -> Result<()>
    where
        H: HydrationHost + ?Sized,
    {
        host.set_claim_order(node, self.info.total_claimed)?;
        self.info.total_claimed += 1;
        Ok(())
    }

    fn scan<H, P, I>(&mut self, host: &H, predicate: &mut P, indices: I) -> Result<Option<usize>>
    where
        H: HydrationHost + ?Sized,
        P: FnMut(&H, NodeId) -> Result<bool>,
        I: Iterator<Item = usize>,
    {
        for i in indices {
            self.info.probes += 1;
            if predicate(host, self.nodes[i])? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    fn settle(
        &mut self,
        index: usize,
        direction: Direction,
        processed: Processed,
        policy: CursorPolicy,
    ) {
        let consumed = match processed {
            Processed::Consume => {
                self.nodes.remove(index);
                true
            }
            Processed::Replace(replacement) => {
                self.nodes[index] = replacement;
                false
            }
        };

        match policy {
            CursorPolicy::Advance => self.info.last_index = index,
            // The slot we removed sat before the cursor, so the cursor shifts down
            CursorPolicy::Keep if consumed && direction == Direction::Backward => {
                self.info.last_index -= 1;
            }
            CursorPolicy::Keep => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    /// Container with one element per name, in order
    fn setup(names: &[&str]) -> (Document, NodeId, ClaimList) {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div").unwrap();
        for name in names {
            doc.append_element(div, name).unwrap();
        }
        let list = ClaimList::new(doc.children(div).unwrap().to_vec());
        (doc, div, list)
    }

    fn claim_named(doc: &mut Document, list: &mut ClaimList, name: &str) -> NodeId {
        claim_with(doc, list, name, CursorPolicy::Advance)
    }

    fn claim_with(
        doc: &mut Document,
        list: &mut ClaimList,
        name: &str,
        policy: CursorPolicy,
    ) -> NodeId {
        let upper = name.to_ascii_uppercase();
        list.claim_node(
            doc,
            |d: &Document, n| Ok(d.node_name(n)? == upper),
            |_, _| Ok(Processed::Consume),
            |d: &mut Document| Ok(d.create_element(name)),
            policy,
        )
        .unwrap()
    }

    #[test]
    fn test_forward_claims_stamp_in_order() {
        let (mut doc, div, mut list) = setup(&["a", "b", "i"]);

        for name in ["a", "b", "i"] {
            claim_named(&mut doc, &mut list, name);
        }

        assert!(list.is_empty());
        assert_eq!(
            doc.child_claim_orders(div).unwrap(),
            vec![Some(0), Some(1), Some(2)]
        );
        assert_eq!(list.info().total_claimed, 3);
    }

    #[test]
    fn test_backward_scan_finds_trailing_node() {
        let (mut doc, div, mut list) = setup(&["a", "b", "i"]);

        let i = claim_named(&mut doc, &mut list, "i");
        assert_eq!(list.info().last_index, 2);

        // Nothing at or after index 2 now; "a" is found scanning backward
        let a = claim_named(&mut doc, &mut list, "a");
        assert_eq!(list.info().last_index, 0);
        assert_eq!(list.nodes().len(), 1);

        assert_eq!(doc.claim_order(i).unwrap(), Some(0));
        assert_eq!(doc.claim_order(a).unwrap(), Some(1));
        assert_eq!(doc.child_claim_orders(div).unwrap()[1], None);
    }

    #[test]
    fn test_create_when_no_match() {
        let (mut doc, div, mut list) = setup(&["a"]);

        let created = claim_named(&mut doc, &mut list, "section");

        assert_eq!(doc.parent(created).unwrap(), None);
        assert_eq!(doc.claim_order(created).unwrap(), Some(0));
        assert_eq!(list.len(), 1, "pool must not be drawn from on create");
        assert_eq!(list.info().total_claimed, 1);
        assert_eq!(doc.children(div).unwrap().len(), 1);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let (mut doc, _div, mut list) = setup(&["a", "b"]);
        let replacement = doc.create_element("b");
        let first = list.nodes()[0];

        let claimed = list
            .claim_node(
                &mut doc,
                |d: &Document, n| Ok(d.node_name(n)? == "A"),
                |_, _| Ok(Processed::Replace(replacement)),
                |d: &mut Document| Ok(d.create_element("a")),
                CursorPolicy::Advance,
            )
            .unwrap();

        assert_eq!(claimed, first);
        assert_eq!(list.nodes()[0], replacement);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_keep_policy_backward_consume_decrements_cursor() {
        let (mut doc, _div, mut list) = setup(&["a", "b", "i", "u"]);

        claim_named(&mut doc, &mut list, "i");
        assert_eq!(list.info().last_index, 2);

        // Backward match at 0 with the cursor held: the removal shifts
        // everything after it, so the cursor must follow
        claim_with(&mut doc, &mut list, "a", CursorPolicy::Keep);
        assert_eq!(list.info().last_index, 1);

        // The cursor still points at "u", the node after the last element match
        let pending: Vec<_> = list
            .nodes()
            .iter()
            .map(|&n| doc.node_name(n).unwrap())
            .collect();
        assert_eq!(pending, vec!["B", "U"]);
        assert_eq!(pending[list.info().last_index], "U");
    }

    #[test]
    fn test_keep_policy_forward_consume_holds_cursor() {
        let (mut doc, _div, mut list) = setup(&["a", "b", "i"]);

        claim_named(&mut doc, &mut list, "a");
        assert_eq!(list.info().last_index, 0);

        claim_with(&mut doc, &mut list, "i", CursorPolicy::Keep);
        assert_eq!(list.info().last_index, 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_keep_policy_backward_replace_holds_cursor() {
        let (mut doc, _div, mut list) = setup(&["a", "b", "i"]);
        claim_named(&mut doc, &mut list, "i");
        let replacement = doc.create_text("rest");

        list.claim_node(
            &mut doc,
            |d: &Document, n| Ok(d.node_name(n)? == "A"),
            |_, _| Ok(Processed::Replace(replacement)),
            |d: &mut Document| Ok(d.create_element("a")),
            CursorPolicy::Keep,
        )
        .unwrap();

        assert_eq!(list.info().last_index, 2);
        assert_eq!(list.nodes()[0], replacement);
    }

    #[test]
    fn test_in_order_claims_are_linear() {
        let names: Vec<String> = (0..200).map(|i| format!("x{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (mut doc, _div, mut list) = setup(&refs);
        let n = refs.len() as u64;

        let mut last = 0;
        for name in &refs {
            claim_named(&mut doc, &mut list, name);
            assert!(list.info().last_index >= last || list.is_empty());
            last = list.info().last_index;
        }

        let m = refs.len() as u64;
        assert!(
            list.info().probes <= n + m,
            "expected <= {} probes, got {}",
            n + m,
            list.info().probes
        );
    }

    #[test]
    fn test_error_leaves_counter_untouched() {
        let (mut doc, _div, mut list) = setup(&["a"]);

        let result = list.claim_node(
            &mut doc,
            |_: &Document, _| Ok(false),
            |_, _| Ok(Processed::Consume),
            |_: &mut Document| Err(crate::error::HydrateError::NodeNotFound(NodeId(42))),
            CursorPolicy::Advance,
        );

        assert!(result.is_err());
        assert_eq!(list.info().total_claimed, 0);
    }

    #[test]
    fn test_failed_stamp_keeps_node_pending() {
        let mut doc = Document::new();
        let missing = NodeId(99);
        let mut list = ClaimList::new(vec![missing]);
        let mut processed = false;

        let err = list
            .claim_node(
                &mut doc,
                |_: &Document, _| Ok(true),
                |_, _| {
                    processed = true;
                    Ok(Processed::Consume)
                },
                |d: &mut Document| Ok(d.create_element("a")),
                CursorPolicy::Advance,
            )
            .unwrap_err();

        assert!(matches!(err, crate::error::HydrateError::NodeNotFound(NodeId(99))));
        assert!(!processed);
        assert_eq!(list.nodes(), &[missing]);
        assert_eq!(list.info().total_claimed, 0);
    }

    #[test]
    fn test_failed_process_keeps_orders_unique() {
        let (mut doc, _div, mut list) = setup(&["a", "b"]);
        let a = list.nodes()[0];

        let result = list.claim_node(
            &mut doc,
            |d: &Document, n| Ok(d.node_name(n)? == "A"),
            |_, n| Err(crate::error::HydrateError::NotText(n)),
            |d: &mut Document| Ok(d.create_element("a")),
            CursorPolicy::Advance,
        );
        assert!(result.is_err());

        // Still pending, stamped, and its order is not handed out again
        assert_eq!(list.len(), 2);
        assert_eq!(doc.claim_order(a).unwrap(), Some(0));
        assert_eq!(list.info().total_claimed, 1);

        assert_eq!(claim_named(&mut doc, &mut list, "a"), a);
        assert_eq!(doc.claim_order(a).unwrap(), Some(1));
        assert_eq!(list.len(), 1);
    }
}
