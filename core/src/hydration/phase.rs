//! Per-container hydration phase

use serde::{Deserialize, Serialize};

/// Where a container is in its hydration lifecycle
///
/// ```text
/// Idle -> Hydrating -> Reconciled -> Normal
/// ```
///
/// `Hydrating` starts when the container's children are handed out for
/// claiming, `Reconciled` after the first hydrating append reorders it, and
/// `Normal` once the session ends. Phases only move forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerPhase {
    #[default]
    Idle,
    Hydrating,
    Reconciled,
    Normal,
}

impl ContainerPhase {
    pub fn on_claim_started(self) -> Self {
        self.max(ContainerPhase::Hydrating)
    }

    pub fn on_reconciled(self) -> Self {
        self.max(ContainerPhase::Reconciled)
    }

    pub fn on_session_end(self) -> Self {
        ContainerPhase::Normal
    }
}
