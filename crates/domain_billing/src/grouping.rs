//! Order-preserving grouping primitive
//!
//! Row order in presented output comes directly from this ordering, so
//! distinct keys keep their first-occurrence order: stable, never sorted.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Partitions `items` by `key_fn`, preserving the first-occurrence order of
/// distinct keys and the relative order of items within each partition.
/// Every item lands in exactly one partition.
pub fn group_by<'a, T, K, F>(items: &'a [T], mut key_fn: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();

    for item in items {
        let key = key_fn(item);
        match positions.entry(key.clone()) {
            Entry::Occupied(slot) => groups[*slot.get()].1.push(item),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}
