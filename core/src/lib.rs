//! HydraKit Core - Hydration of server-rendered markup
//!
//! This is the Rust core of HydraKit, compiled to both native and WASM.
//! It implements:
//! - Claim tracking that matches pre-rendered nodes to client requests
//! - Minimal-move child reordering (longest increasing subsequence)
//! - A hydration session with hydrating append/insert semantics
//! - An in-memory DOM host for tests and non-browser rendering
//!
//! # Examples
//!
//! ```rust
//! use hydrakit_core::reconcile::plan_reorder;
//!
//! // Children stamped 3, 1, 4, 0, 2 in document order
//! let plan = plan_reorder(&[3, 1, 4, 0, 2]);
//!
//! // Two of them can stay put; three move
//! assert_eq!(plan.stable.len(), 2);
//! assert_eq!(plan.moves.len(), 3);
//! ```

pub mod claim;
pub mod config;
pub mod dom;
pub mod error;
pub mod host;
pub mod hydration;
pub mod order;
pub mod reconcile;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use claim::{ClaimInfo, ClaimList};
pub use config::HydrationConfig;
pub use dom::{Document, NodeId};
pub use error::{HydrateError, Result};
pub use host::{ClaimableDom, HydrationHost};
pub use hydration::{ContainerPhase, Hydrator};
pub use reconcile::{reconcile_container, ReconcileReport};
