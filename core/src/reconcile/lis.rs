//! Longest increasing subsequence and the move plan derived from it
//!
//! Nodes that do not move during a reorder keep their relative order, so
//! they always form an increasing subsequence of claim orders. Keeping a
//! *longest* one in place is therefore the fewest moves possible:
//! `n - lis_len`.

use crate::order::upper_bound;
use serde::{Deserialize, Serialize};

/// One node to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMove {
    /// Index of the node to move, in original child order
    pub index: usize,

    /// Index of the stable node to insert before; `None` means the end
    pub anchor: Option<usize>,
}

/// Which children stay put and where the rest go
///
/// Applying `moves` in order, each as an insert-before of `index` ahead
/// of `anchor`, leaves the children sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    /// Indices on the longest increasing subsequence, ascending
    pub stable: Vec<usize>,

    /// Moves sorted by key ascending
    pub moves: Vec<PlannedMove>,
}

impl ReorderPlan {
    pub fn is_noop(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Indices of one longest increasing subsequence of `keys`
///
/// Patience sorting, O(n log n). Equal keys extend a run, so with
/// duplicates this is the longest non-decreasing subsequence.
///
/// # Example
///
/// ```rust
/// use hydrakit_core::reconcile::longest_increasing_subsequence;
///
/// let keys = [3, 1, 4, 0, 2];
/// let lis = longest_increasing_subsequence(&keys);
/// assert_eq!(lis.len(), 2);
/// assert!(keys[lis[0]] < keys[lis[1]]);
/// ```
pub fn longest_increasing_subsequence(keys: &[u32]) -> Vec<usize> {
    // tails[len]: index of the smallest key ending a run of length `len`.
    // tails[0] is a placeholder and never read.
    let mut tails: Vec<usize> = Vec::with_capacity(keys.len() + 1);
    tails.push(usize::MAX);
    let mut predecessor: Vec<Option<usize>> = Vec::with_capacity(keys.len());
    let mut longest = 0;

    for (i, &current) in keys.iter().enumerate() {
        // Longest run ending below `current`. Fast path when `current`
        // extends the longest run found so far.
        let run = if longest > 0 && keys[tails[longest]] <= current {
            longest
        } else {
            upper_bound(1, longest, |len| keys[tails[len]], current) - 1
        };

        predecessor.push(if run == 0 { None } else { Some(tails[run]) });

        let new_len = run + 1;
        if new_len == tails.len() {
            tails.push(i);
        } else {
            tails[new_len] = i;
        }
        longest = longest.max(new_len);
    }

    let mut lis = Vec::with_capacity(longest);
    let mut cursor = if longest == 0 {
        None
    } else {
        Some(tails[longest])
    };
    while let Some(i) = cursor {
        lis.push(i);
        cursor = predecessor[i];
    }
    lis.reverse();
    lis
}

/// Plan the fewest moves that sort `keys` ascending
///
/// # Example
///
/// ```rust
/// use hydrakit_core::reconcile::plan_reorder;
///
/// let plan = plan_reorder(&[4, 3, 2, 1, 0]);
/// assert_eq!(plan.stable.len(), 1);
/// assert_eq!(plan.moves.len(), 4);
/// ```
pub fn plan_reorder(keys: &[u32]) -> ReorderPlan {
    let stable = longest_increasing_subsequence(keys);

    let mut on_path = vec![false; keys.len()];
    for &i in &stable {
        on_path[i] = true;
    }

    let mut to_move: Vec<usize> = (0..keys.len()).filter(|&i| !on_path[i]).collect();
    // Key order makes nodes sharing an anchor land in the right order
    to_move.sort_by_key(|&i| keys[i]);

    let mut next_stable = 0;
    let moves = to_move
        .into_iter()
        .map(|index| {
            while next_stable < stable.len() && keys[index] >= keys[stable[next_stable]] {
                next_stable += 1;
            }
            PlannedMove {
                index,
                anchor: stable.get(next_stable).copied(),
            }
        })
        .collect();

    ReorderPlan { stable, moves }
}
