#![no_main]

use std::collections::BTreeMap;

use alloy_primitives::{Bytes, B256};
use alloy_trie::{HashBuilder, Nibbles};
use arbitrary::Arbitrary;
use hextrie::{MemoryDb, Trie};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert { key: [u8; 32], value: Vec<u8> },
    Remove { key: [u8; 32] },
}

#[derive(Debug, Arbitrary)]
struct Input {
    ops: Vec<Op>,
}

fn model_root(model: &BTreeMap<B256, Bytes>) -> B256 {
    let mut hash_builder = HashBuilder::default();
    for (key, value) in model {
        hash_builder.add_leaf(Nibbles::unpack(*key), value);
    }
    hash_builder.root()
}

fuzz_target!(|input: Input| {
    let mut trie = Trie::new_empty(MemoryDb::new());
    let mut model = BTreeMap::<B256, Bytes>::new();

    for op in input.ops {
        match op {
            Op::Insert { key, value } => {
                if value.is_empty() {
                    continue;
                }
                let key = B256::from(key);
                trie.put(key.as_slice(), &value);
                model.insert(key, Bytes::from(value));
            }
            Op::Remove { key } => {
                let key = B256::from(key);
                let removed = trie.delete(key.as_slice());
                assert_eq!(removed.is_ok(), model.remove(&key).is_some());
            }
        }

        // Validate after each operation so transient divergences are not
        // masked by later ops.
        let root = trie.commit().expect("commit failed");
        assert_eq!(root, model_root(&model), "hextrie root != HashBuilder root");
    }
});
