//! JavaScript bindings for the reorder planner

use crate::order::upper_bound;
use crate::reconcile::{longest_increasing_subsequence, plan_reorder};
use wasm_bindgen::prelude::*;

/// Plan the fewest moves that sort children by claim order
///
/// Takes claim orders in document order and returns the JSON-encoded plan:
/// `{ "stable": [indices], "moves": [{ "index": i, "anchor": j | null }] }`.
/// Apply each move as `parent.insertBefore(children[index], anchor === null
/// ? null : children[anchor])`, in the order given.
#[wasm_bindgen(js_name = planReorder)]
pub fn plan_reorder_json(claim_orders: Vec<u32>) -> Result<String, JsValue> {
    let plan = plan_reorder(&claim_orders);
    serde_json::to_string(&plan)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Indices of one longest increasing subsequence of `keys`
#[wasm_bindgen(js_name = longestIncreasingSubsequence)]
pub fn lis_indices(keys: Vec<u32>) -> Vec<u32> {
    longest_increasing_subsequence(&keys)
        .into_iter()
        .map(|i| i as u32)
        .collect()
}

/// First index in `[low, high)` of a sorted array whose value exceeds `value`
#[wasm_bindgen(js_name = upperBound)]
pub fn upper_bound_u32(sorted: Vec<u32>, low: u32, high: u32, value: u32) -> u32 {
    let high = (high as usize).min(sorted.len());
    upper_bound(low as usize, high, |i| sorted[i], value) as u32
}
