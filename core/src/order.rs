//! Binary search over an index range ordered by an external key

/// Return the first index in `[low, high)` whose key is greater than `value`
///
/// Equal keys sort before `value`, so the result is the insertion point
/// that keeps the range sorted with `value` placed after its equals.
/// Returns `high` when no key in the range exceeds `value`.
///
/// `key` is probed O(log(high - low)) times and must return the same
/// answer for the same index during one call.
///
/// # Example
///
/// ```rust
/// use hydrakit_core::order::upper_bound;
///
/// let keys = [1, 3, 3, 5, 8];
/// assert_eq!(upper_bound(0, keys.len(), |i| keys[i], 3), 3);
/// assert_eq!(upper_bound(0, keys.len(), |i| keys[i], 0), 0);
/// assert_eq!(upper_bound(0, keys.len(), |i| keys[i], 9), 5);
/// ```
pub fn upper_bound<K, F>(mut low: usize, mut high: usize, mut key: F, value: K) -> usize
where
    K: PartialOrd,
    F: FnMut(usize) -> K,
{
    while low < high {
        let mid = low + ((high - low) >> 1);
        if key(mid) <= value {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    low
}
