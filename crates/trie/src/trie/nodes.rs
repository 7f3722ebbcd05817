//! Definition of the node flavors building the trie.

use alloy_primitives::{Bytes, B256};

use crate::encoding::ALPHABET_SIZE;

/// Child slots addressable by a nibble.
pub(crate) const BRANCH_CHILDREN: usize = ALPHABET_SIZE;
/// Total slots in a branch: sixteen children plus the value slot.
pub(crate) const BRANCH_SIZE: usize = ALPHABET_SIZE + 1;
/// Index of the value slot, addressed by the terminator nibble.
pub(crate) const BRANCH_VALUE: usize = ALPHABET_SIZE;

/// A node of the trie.
///
/// Values only ever hang off a terminator-keyed extension or the value slot
/// of a branch, so a `Leaf` is plain bytes with no key of its own. The
/// terminator distinction is carried by the extension key: keys ending in
/// the terminator nibble denote a leaf-terminated path.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// Raw value bytes.
    Leaf(Bytes),
    /// A shared nibble prefix leading to the next node.
    Extension(Box<ExtensionNode>),
    /// Radix-16 inner node with an extra value slot.
    Branch(Box<BranchNode>),
    /// Digest of a persisted node, resolved through the store on demand.
    Hashed(B256),
}

#[derive(Debug, Clone)]
pub(crate) struct ExtensionNode {
    pub(crate) key: Vec<u8>,
    pub(crate) next: Node,
    pub(crate) hash: Option<B256>,
}

#[derive(Debug, Clone)]
pub(crate) struct BranchNode {
    pub(crate) children: [Option<Node>; BRANCH_SIZE],
    pub(crate) hash: Option<B256>,
}

impl Node {
    /// Builds an extension over `key`; the cached hash starts cleared.
    pub(crate) fn extension(key: Vec<u8>, next: Node) -> Self {
        debug_assert!(!key.is_empty(), "degenerate extension");
        Node::Extension(Box::new(ExtensionNode {
            key,
            next,
            hash: None,
        }))
    }

    /// The cached digest, valid only while the node is unchanged since it
    /// was computed. Leaves and hash references carry none.
    pub(crate) fn cached_hash(&self) -> Option<B256> {
        match self {
            Node::Extension(ext) => ext.hash,
            Node::Branch(branch) => branch.hash,
            Node::Leaf(_) | Node::Hashed(_) => None,
        }
    }
}

impl BranchNode {
    pub(crate) fn new() -> Self {
        BranchNode {
            children: [const { None }; BRANCH_SIZE],
            hash: None,
        }
    }

    /// Number of occupied slots, the value slot included.
    pub(crate) fn occupied(&self) -> usize {
        self.children.iter().filter(|slot| slot.is_some()).count()
    }

    /// Index of the sole occupied slot, if exactly one is left.
    pub(crate) fn sole_child(&self) -> Option<usize> {
        let mut occupied = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some());
        match (occupied.next(), occupied.next()) {
            (Some((idx, _)), None) => Some(idx),
            _ => None,
        }
    }
}

impl Default for BranchNode {
    fn default() -> Self {
        Self::new()
    }
}
