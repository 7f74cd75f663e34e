use std::cmp::Ordering;
use std::collections::HashMap;

/// Order group totals by quantity, largest first. Equal quantities fall back
/// to ascending key order so the output never depends on hash order.
pub fn rank<K: Ord>(totals: HashMap<K, u64>) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = totals.into_iter().collect();
    ranked.sort_by(by_quantity_then_key);
    ranked
}

/// First `n` entries, or all of them when the list is shorter.
pub fn top_n<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[..n.min(ranked.len())]
}

pub fn by_quantity_then_key<K: Ord>(a: &(K, u64), b: &(K, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
