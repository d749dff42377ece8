//! WASM bindings for HydraKit
//!
//! JS hosts keep their real DOM and use these bindings for the planning
//! half of reconciliation: pass the claim orders of a container's children
//! in document order, get back which children to move and where.

#[cfg(feature = "wasm")]
pub mod bindings;

#[cfg(feature = "wasm")]
pub mod utils;

// Re-export main entry points
#[cfg(feature = "wasm")]
pub use bindings::{lis_indices, plan_reorder_json, upper_bound_u32};
