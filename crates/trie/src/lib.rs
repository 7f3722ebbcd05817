//! An Ethereum-compatible Merkle Patricia Trie over a key-value store.
//!
//! The trie maps arbitrary byte keys to arbitrary byte values while giving
//! every state a single Keccak-256 root and compact inclusion proofs that
//! third parties can check without the backing store. Roots are bit-identical
//! to the reference Ethereum implementation over the same map, so they can
//! be cross-validated against other MPT implementations.
//!
//! Mutations are copy-on-write along the touched path and a single writer is
//! assumed; `get` and `proof` only read. [`Trie::commit`] persists every
//! reachable node through the [`Database`] it was built over and collapses
//! the in-memory tree into its root reference; later reads expand hash
//! references back into nodes on demand.

pub mod encoding;
pub mod error;
mod trie;

pub use error::{Result, TrieError};
pub use hextrie_store::{Database, MemoryDb, StoreError};
pub use trie::{verify_proof, Trie};

use alloy_primitives::{b256, B256};

/// Root hash of an empty trie: `keccak256(rlp(""))`.
pub const EMPTY_ROOT: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");
