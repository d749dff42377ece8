//! Reconciler: reorder a container's claimed children with minimal moves
//!
//! After the claim phase every child of a container carries a claim order,
//! but the server-rendered document order can differ from the order the
//! client claimed them in. [`reconcile_container`] fixes that once per
//! container:
//!
//! 1. Collect the children (only stamped ones for foreign-tolerant
//!    containers such as `HEAD`)
//! 2. Keep a longest increasing subsequence of claim orders in place
//! 3. Move every other child, in claim order, in front of the first stable
//!    child with a larger claim order (or to the end)
//!
//! The pass is guarded by the container's `hydrate_init` flag, so repeated
//! calls are free.

mod lis;

pub use lis::{longest_increasing_subsequence, plan_reorder, PlannedMove, ReorderPlan};

use crate::config::HydrationConfig;
use crate::dom::NodeId;
use crate::error::{HydrateError, Result};
use crate::host::HydrationHost;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of one reconciliation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub container: NodeId,

    /// The container had already been reconciled; nothing was done
    pub skipped: bool,

    /// Children taking part in the reorder
    pub considered: usize,

    /// Children left in place
    pub stable: usize,

    /// Children moved
    pub moved: usize,
}

impl ReconcileReport {
    fn skipped(container: NodeId) -> Self {
        Self {
            container,
            skipped: true,
            considered: 0,
            stable: 0,
            moved: 0,
        }
    }
}

/// Reorder `container`'s children into claim order, once
///
/// Children are expected to carry distinct claim orders. With
/// `verify_claim_orders` on, a missing or repeated order is an error and
/// nothing moves. With it off, an unstamped child sorts as claim order 0
/// and the resulting order may be wrong, but the pass still completes.
pub fn reconcile_container<H>(
    host: &mut H,
    container: NodeId,
    config: &HydrationConfig,
) -> Result<ReconcileReport>
where
    H: HydrationHost + ?Sized,
{
    if host.container_state(container)?.hydrate_init {
        return Ok(ReconcileReport::skipped(container));
    }

    let foreign_ok = config.accepts_foreign_children(&host.node_name(container)?);

    let mut nodes = Vec::new();
    let mut keys = Vec::new();
    for child in host.child_nodes(container)? {
        match host.claim_order(child)? {
            Some(order) => {
                nodes.push(child);
                keys.push(order);
            }
            None if foreign_ok => {}
            None if config.verify_claim_orders => {
                return Err(HydrateError::MissingClaimOrder {
                    container,
                    node: child,
                });
            }
            None => {
                log::warn!(
                    "child {} of {} has no claim order, ordering it first",
                    child,
                    container
                );
                nodes.push(child);
                keys.push(0);
            }
        }
    }

    if config.verify_claim_orders {
        let mut seen = HashSet::with_capacity(keys.len());
        if let Some(&order) = keys.iter().find(|&&k| !seen.insert(k)) {
            return Err(HydrateError::DuplicateClaimOrder { container, order });
        }
    }

    host.container_state_mut(container)?.hydrate_init = true;

    let plan = plan_reorder(&keys);
    for mv in &plan.moves {
        let node = nodes[mv.index];
        let anchor = mv.anchor.map(|a| nodes[a]);
        log::trace!("moving {} before {:?} in {}", node, anchor, container);
        host.insert_before(container, node, anchor)?;
    }

    let report = ReconcileReport {
        container,
        skipped: false,
        considered: nodes.len(),
        stable: plan.stable.len(),
        moved: plan.moves.len(),
    };
    log::debug!(
        "reconciled {}: {} children, {} stable, {} moved",
        container,
        report.considered,
        report.stable,
        report.moved
    );
    Ok(report)
}
