mod commit;
mod delete;
mod display;
mod get;
mod nodes;
mod proof;
mod put;
mod rlp;

pub use proof::verify_proof;
pub(crate) use nodes::Node;

use alloy_primitives::B256;
use hextrie_store::Database;
use log::trace;

use crate::error::{Result, TrieError};
use crate::EMPTY_ROOT;

/// A Merkle Patricia Trie backed by a key-value store.
///
/// A `Trie` is single-writer: `put`, `delete` and `commit` must be
/// serialized by the caller, while `get` and `proof` only read. Nodes live
/// in memory until [`Trie::commit`] writes them out and replaces the tree
/// with its root reference; hash references encountered later are expanded
/// back into nodes through the store on demand.
#[derive(Debug)]
pub struct Trie<D: Database> {
    root: Option<Node>,
    db: D,
    /// Storage paths orphaned by deletions since the last commit.
    stale: Vec<Vec<u8>>,
}

impl<D: Database> Trie<D> {
    /// Creates an empty trie over `db`.
    pub fn new_empty(db: D) -> Self {
        Self {
            root: None,
            db,
            stale: Vec::new(),
        }
    }

    /// Opens a previously committed trie by its root hash.
    pub fn load(db: D, root: B256) -> Self {
        let root = (root != EMPTY_ROOT).then_some(Node::Hashed(root));
        Self {
            root,
            db,
            stale: Vec::new(),
        }
    }

    pub(crate) fn load_hashed(&self, path: &[u8], hash: B256) -> Result<Node> {
        load_node(&self.db, path, hash)
    }
}

/// Fetches and decodes the node persisted under `path`, stamping `hash` as
/// its cached digest.
pub(crate) fn load_node<D: Database>(db: &D, path: &[u8], hash: B256) -> Result<Node> {
    let raw = db.get(path)?.ok_or(TrieError::NotFound)?;
    trace!("loaded node {hash} at depth {}", path.len());
    Node::decode(&raw, Some(hash))
}
