//! Most-used key selection over the per-position press counts

use serde::{Deserialize, Serialize};

/// A key position and how often it was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub position: u32,
    pub count: u32,
}

/// Select the `k` most-pressed positions, highest count first.
///
/// Partial selection sort: each output slot takes the best of the remaining
/// entries. Equal counts keep ascending position order. Result length is
/// `min(k, counts.len())`.
pub fn top_keys(counts: &[u32], k: usize) -> Vec<KeyEntry> {
    let mut entries: Vec<KeyEntry> = counts
        .iter()
        .enumerate()
        .map(|(position, &count)| KeyEntry {
            position: position as u32,
            count,
        })
        .collect();

    let k = k.min(entries.len());
    for slot in 0..k {
        let mut best = slot;
        for candidate in slot + 1..entries.len() {
            let (c, b) = (entries[candidate], entries[best]);
            if c.count > b.count || (c.count == b.count && c.position < b.position) {
                best = candidate;
            }
        }
        entries.swap(slot, best);
    }

    entries.truncate(k);
    entries
}
