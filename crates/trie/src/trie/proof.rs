//! Merkle proof generation and verification.

use std::collections::HashMap;

use alloy_primitives::{keccak256, Bytes, B256};
use hextrie_store::Database;

use super::nodes::ExtensionNode;
use super::{Node, Trie};
use crate::encoding;
use crate::error::{Result, TrieError};

impl<D: Database> Trie<D> {
    /// Collects the RLP blobs a verifier needs to replay the walk to `key`:
    /// every node on the path whose encoding is at least digest-sized, and
    /// the root regardless. Smaller nodes ride along inlined in their
    /// parent's blob.
    ///
    /// A walk that ends at an empty slot still yields a proof (of absence);
    /// a key that falls off an extension is [`TrieError::NotFound`].
    pub fn proof(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        let path = encoding::to_hex(key);
        let mut blobs = Vec::new();
        self.proof_at(self.root.as_ref(), &path, 0, &mut blobs)?;

        if blobs.is_empty() {
            return Err(TrieError::NotFound);
        }
        Ok(blobs)
    }

    fn proof_at(
        &self,
        node: Option<&Node>,
        path: &[u8],
        depth: usize,
        blobs: &mut Vec<Vec<u8>>,
    ) -> Result<()> {
        if depth == path.len() {
            return Ok(());
        }
        let Some(node) = node else {
            // The walk ends at an empty slot; what was collected proves the
            // absence.
            return Ok(());
        };

        match node {
            Node::Leaf(_) => Ok(()),

            Node::Branch(branch) => {
                push_blob(blobs, node);
                let idx = path[depth] as usize;
                self.proof_at(branch.children[idx].as_ref(), path, depth + 1, blobs)
            }

            Node::Extension(ext) => {
                let key_len = ext.key.len();
                if path.len() - depth < key_len || path[depth..depth + key_len] != ext.key[..] {
                    return Err(TrieError::NotFound);
                }
                push_blob(blobs, node);
                self.proof_at(Some(&ext.next), path, depth + key_len, blobs)
            }

            Node::Hashed(hash) => {
                let resolved = self.load_hashed(&path[..depth], *hash)?;
                self.proof_at(Some(&resolved), path, depth, blobs)
            }
        }
    }
}

/// A node enters the proof iff it is the root or too big to be inlined in
/// its parent.
fn push_blob(blobs: &mut Vec<Vec<u8>>, node: &Node) {
    let encoded = node.encode();
    if blobs.is_empty() || encoded.len() >= 32 {
        blobs.push(encoded);
    }
}

/// Replays `blobs` against `root`, walking `key` through the reconstructed
/// nodes. Returns the proven value, or `None` when the proof shows the key
/// absent. Blobs that do not chain up to `root` are rejected.
pub fn verify_proof(root: B256, key: &[u8], blobs: &[Vec<u8>]) -> Result<Option<Bytes>> {
    let Some(first) = blobs.first() else {
        return Err(TrieError::BadProof("empty proof"));
    };
    if keccak256(first) != root {
        return Err(TrieError::BadProof("first blob does not hash to the root"));
    }

    let index: HashMap<B256, &[u8]> = blobs
        .iter()
        .map(|blob| (keccak256(blob), blob.as_slice()))
        .collect();

    let path = encoding::to_hex(key);
    let node = Node::decode(first, Some(root))?;
    walk_proof(&index, node, &path, 0)
}

fn walk_proof(
    index: &HashMap<B256, &[u8]>,
    node: Node,
    path: &[u8],
    depth: usize,
) -> Result<Option<Bytes>> {
    match node {
        Node::Leaf(value) => Ok(Some(value)),

        Node::Branch(mut branch) => {
            let Some(&nibble) = path.get(depth) else {
                return Ok(None);
            };
            match branch.children[nibble as usize].take() {
                None => Ok(None),
                Some(child) => walk_proof(index, child, path, depth + 1),
            }
        }

        Node::Extension(ext) => {
            let ExtensionNode { key, next, .. } = *ext;
            if path.len() - depth < key.len() || path[depth..depth + key.len()] != key[..] {
                return Ok(None);
            }
            walk_proof(index, next, path, depth + key.len())
        }

        Node::Hashed(hash) => {
            let Some(blob) = index.get(&hash) else {
                return Err(TrieError::BadProof("referenced node missing from the proof"));
            };
            walk_proof(index, Node::decode(blob, Some(hash))?, path, depth)
        }
    }
}
