//! Insertion with copy-on-write along the touched path.

use alloy_primitives::Bytes;
use hextrie_store::Database;

use super::nodes::{BranchNode, ExtensionNode};
use super::{load_node, Node, Trie};
use crate::encoding;

impl<D: Database> Trie<D> {
    /// Inserts `value` under `key`, overwriting any previous value.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        let path = encoding::to_hex(key);
        let root = self.root.take();
        let leaf = Node::Leaf(Bytes::copy_from_slice(value));
        self.root = Some(self.put_at(root, &path, 0, leaf));
    }

    /// Rebuilds the subtree at `path[depth..]` with `value` spliced in,
    /// clearing the cached digest of every node on the way.
    fn put_at(&mut self, node: Option<Node>, path: &[u8], depth: usize, value: Node) -> Node {
        if depth == path.len() {
            return value;
        }

        match node {
            None => Node::extension(path[depth..].to_vec(), value),

            Some(Node::Branch(mut branch)) => {
                let idx = path[depth] as usize;
                let child = branch.children[idx].take();
                branch.children[idx] = Some(self.put_at(child, path, depth + 1, value));
                branch.hash = None;
                Node::Branch(branch)
            }

            Some(Node::Extension(ext)) => {
                let ExtensionNode { key, next, .. } = *ext;
                let rest = &path[depth..];
                let matched = encoding::common_prefix_len(rest, &key);

                if matched == key.len() {
                    let next = self.put_at(Some(next), path, depth + matched, value);
                    return Node::extension(key, next);
                }

                // The paths diverge inside the extension key: a branch takes
                // over at the split point, the prefix (if any) stays an
                // extension above it.
                let mut branch = BranchNode::new();
                branch.children[key[matched] as usize] = Some(reattach(&key[matched + 1..], next));
                branch.children[rest[matched] as usize] =
                    Some(reattach(&rest[matched + 1..], value));
                let branch = Node::Branch(Box::new(branch));

                if matched == 0 {
                    branch
                } else {
                    Node::extension(rest[..matched].to_vec(), branch)
                }
            }

            Some(Node::Leaf(_)) => panic!("trie: leaf reached outside its extension"),

            Some(Node::Hashed(hash)) => match load_node(&self.db, &path[..depth], hash) {
                Ok(resolved) => self.put_at(Some(resolved), path, depth, value),
                Err(err) => panic!("trie: failed to resolve node during insert: {err}"),
            },
        }
    }
}

/// Hangs `node` under the remaining sub-path, directly when nothing is left.
fn reattach(rest: &[u8], node: Node) -> Node {
    if rest.is_empty() {
        node
    } else {
        Node::extension(rest.to_vec(), node)
    }
}
