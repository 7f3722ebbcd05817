//! Differential tests: roots must match `alloy-trie`'s hash builder over
//! the same map, and survive commit/reload cycles unchanged.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Bytes, B256};
use alloy_trie::{HashBuilder, Nibbles};
use hextrie::{MemoryDb, Trie, EMPTY_ROOT};

fn hash_builder_root(entries: &BTreeMap<B256, Bytes>) -> B256 {
    let mut hash_builder = HashBuilder::default();
    for (key, value) in entries {
        hash_builder.add_leaf(Nibbles::unpack(*key), value);
    }
    hash_builder.root()
}

fn trie_root(entries: &BTreeMap<B256, Bytes>) -> B256 {
    let mut trie = Trie::new_empty(MemoryDb::new());
    for (key, value) in entries {
        trie.put(key.as_slice(), value);
    }
    trie.commit().expect("commit failed")
}

fn assert_roots_match(entries: &BTreeMap<B256, Bytes>) {
    assert_eq!(trie_root(entries), hash_builder_root(entries));
}

#[test]
fn empty_maps_agree() {
    assert_eq!(hash_builder_root(&BTreeMap::new()), EMPTY_ROOT);
    assert_eq!(trie_root(&BTreeMap::new()), EMPTY_ROOT);
}

#[test]
fn small_fixed_maps_agree() {
    let mut entries = BTreeMap::new();
    for i in 0u8..5 {
        entries.insert(keccak256([i]), Bytes::from(vec![i + 1; 3]));
    }
    assert_roots_match(&entries);
}

#[test]
fn randomized_insert_and_remove_sequences_agree() {
    let mut model = BTreeMap::<B256, Bytes>::new();

    for case in 0u8..8 {
        model.clear();
        for step in 0u8..48 {
            let key = keccak256([case, step, 0xa5]);
            if step % 3 == 0 {
                model.remove(&key);
            } else {
                let len = 1 + ((case as usize + step as usize) % 64);
                let value: Vec<u8> = (0..len)
                    .map(|i| (i as u8) ^ case.wrapping_mul(17) ^ step.wrapping_mul(29))
                    .collect();
                model.insert(key, Bytes::from(value));
            }

            assert_roots_match(&model);
        }
    }
}

#[test]
fn value_size_boundaries_agree() {
    for len in [31usize, 32, 33] {
        let mut entries = BTreeMap::new();
        entries.insert(keccak256([len as u8, 1]), Bytes::from(vec![0x11; len]));
        entries.insert(keccak256([len as u8, 2]), Bytes::from(vec![0x22; len]));
        entries.insert(keccak256([len as u8, 3]), Bytes::from(vec![0x33; len]));
        assert_roots_match(&entries);
    }
}

#[test]
fn deletions_converge_to_the_remaining_map() {
    let store = MemoryDb::new();
    let mut trie = Trie::new_empty(store);
    let mut model = BTreeMap::new();

    for i in 0u8..24 {
        let key = keccak256([i, 0x33]);
        let value = Bytes::from(vec![i; 1 + (i as usize % 7)]);
        trie.put(key.as_slice(), &value);
        model.insert(key, value);
    }
    assert_eq!(trie.commit().unwrap(), hash_builder_root(&model));

    // Remove every third key, committing as we go so deletions run against
    // hash references loaded back from the store.
    for i in (0u8..24).step_by(3) {
        let key = keccak256([i, 0x33]);
        trie.delete(key.as_slice()).unwrap();
        model.remove(&key);
        assert_eq!(trie.commit().unwrap(), hash_builder_root(&model));
    }
}

#[test]
fn reload_round_trips_the_full_state() {
    let store = MemoryDb::new();
    let mut trie = Trie::new_empty(store.clone());
    let mut model = BTreeMap::new();

    for i in 0u16..64 {
        let key = keccak256(i.to_be_bytes());
        let value = Bytes::from(keccak256(key).to_vec());
        trie.put(key.as_slice(), &value);
        model.insert(key, value);
    }
    let root = trie.commit().unwrap();
    assert_eq!(root, hash_builder_root(&model));

    let reloaded = Trie::load(store, root);
    for (key, value) in &model {
        assert_eq!(reloaded.get(key.as_slice()).unwrap(), *value);
    }

    let absent = keccak256(b"absent");
    assert!(reloaded.get(absent.as_slice()).is_err());
}
