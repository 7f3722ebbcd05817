//! Shared helpers for the trie benchmarks.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, B256};

/// Deterministic key/value corpus, sorted by key so it can feed the hash
/// builder directly.
pub fn entries(n: usize) -> Vec<(B256, Vec<u8>)> {
    let mut map = BTreeMap::new();
    for i in 0..n {
        let key = keccak256((i as u64).to_be_bytes());
        let value = keccak256(key).to_vec();
        map.insert(key, value);
    }
    map.into_iter().collect()
}
