//! Removal of a key, collapsing branches left with a single occupant.

use hextrie_store::Database;

use super::nodes::{BranchNode, ExtensionNode, BRANCH_VALUE};
use super::{load_node, Node, Trie};
use crate::encoding::{self, TERMINATOR};
use crate::error::{Result, TrieError};

impl<D: Database> Trie<D> {
    /// Removes `key` from the trie, or returns [`TrieError::NotFound`]
    /// leaving the trie untouched. Storage paths orphaned by the removal
    /// are deleted from the store on the next commit.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        let path = encoding::to_hex(key);
        let Self { root, db, stale } = self;
        delete_at(db, stale, root, &path, 0)
    }
}

/// Deletes `path[depth..]` below `slot`, rewriting `slot` in place.
fn delete_at<D: Database>(
    db: &D,
    stale: &mut Vec<Vec<u8>>,
    slot: &mut Option<Node>,
    path: &[u8],
    depth: usize,
) -> Result<()> {
    match slot {
        None => Err(TrieError::NotFound),

        // Reached through the value slot of a branch; the parent clears it.
        Some(Node::Leaf(_)) => {
            *slot = None;
            Ok(())
        }

        Some(Node::Hashed(hash)) => {
            let hash = *hash;
            let resolved = load_node(db, &path[..depth], hash)?;
            *slot = Some(resolved);
            delete_at(db, stale, slot, path, depth)
        }

        Some(Node::Branch(_)) => delete_below_branch(db, stale, slot, path, depth),

        Some(Node::Extension(_)) => delete_below_extension(db, stale, slot, path, depth),
    }
}

fn delete_below_branch<D: Database>(
    db: &D,
    stale: &mut Vec<Vec<u8>>,
    slot: &mut Option<Node>,
    path: &[u8],
    depth: usize,
) -> Result<()> {
    let Some(Node::Branch(branch)) = slot else {
        unreachable!("caller matched a branch")
    };
    let Some(&nibble) = path.get(depth) else {
        return Err(TrieError::NotFound);
    };

    let idx = nibble as usize;
    if branch.children[idx].is_none() {
        return Err(TrieError::NotFound);
    }
    delete_at(db, stale, &mut branch.children[idx], path, depth + 1)?;
    branch.hash = None;

    if branch.children[idx].is_some() {
        return Ok(());
    }

    let replacement = match branch.occupied() {
        0 => None,
        1 => {
            let Some(survivor_idx) = branch.sole_child() else {
                unreachable!("one slot is occupied")
            };
            Some(collapse_branch(db, stale, branch, survivor_idx, path, depth)?)
        }
        // Still carrying at least two occupants; the branch stays.
        _ => return Ok(()),
    };
    *slot = replacement;
    Ok(())
}

/// Absorbs the last occupant of a collapsing branch into its replacement.
fn collapse_branch<D: Database>(
    db: &D,
    stale: &mut Vec<Vec<u8>>,
    branch: &mut BranchNode,
    idx: usize,
    path: &[u8],
    depth: usize,
) -> Result<Node> {
    let Some(survivor) = branch.children[idx].take() else {
        unreachable!("slot {idx} is occupied")
    };

    // The surviving value slot becomes a leaf node keyed by the lone
    // terminator nibble.
    if idx == BRANCH_VALUE {
        return Ok(Node::extension(vec![TERMINATOR], survivor));
    }

    let mut survivor_path = path[..depth].to_vec();
    survivor_path.push(idx as u8);

    let survivor = match survivor {
        Node::Hashed(hash) => match load_node(db, &survivor_path, hash) {
            Ok(resolved) => resolved,
            Err(err) => {
                branch.children[idx] = Some(Node::Hashed(hash));
                return Err(err);
            }
        },
        other => other,
    };

    match survivor {
        // The extension dissolves into the nibble-prefixed replacement, so
        // whatever was persisted for it goes stale. Its own child keeps its
        // storage position.
        Node::Extension(ext) => {
            stale.push(survivor_path);
            let ExtensionNode { key, next, .. } = *ext;
            let mut merged = Vec::with_capacity(key.len() + 1);
            merged.push(idx as u8);
            merged.extend_from_slice(&key);
            Ok(Node::extension(merged, next))
        }
        // A branch survivor stays where it is, now below a one-nibble
        // extension; its storage path is still live.
        survivor @ Node::Branch(_) => Ok(Node::extension(vec![idx as u8], survivor)),
        Node::Leaf(_) | Node::Hashed(_) => Err(TrieError::Malformed("leaf in a nibble slot")),
    }
}

fn delete_below_extension<D: Database>(
    db: &D,
    stale: &mut Vec<Vec<u8>>,
    slot: &mut Option<Node>,
    path: &[u8],
    depth: usize,
) -> Result<()> {
    {
        let Some(Node::Extension(ext)) = &*slot else {
            unreachable!("caller matched an extension")
        };
        if encoding::common_prefix_len(&path[depth..], &ext.key) < ext.key.len() {
            return Err(TrieError::NotFound);
        }
    }

    let Some(Node::Extension(ext)) = slot.take() else {
        unreachable!()
    };
    let ExtensionNode { key, next, .. } = *ext;

    // The whole remaining path matched: this is the leaf-terminated
    // extension holding the key.
    if depth + key.len() == path.len() {
        stale.push(path[..depth].to_vec());
        return Ok(());
    }

    let next_depth = depth + key.len();
    let mut next_slot = Some(next);
    if let Err(err) = delete_at(db, stale, &mut next_slot, path, next_depth) {
        if let Some(next) = next_slot {
            *slot = Some(Node::extension(key, next));
        }
        return Err(err);
    }

    *slot = match next_slot {
        // The subtree vanished with the deletion; nothing to point at.
        None => None,
        // Two extensions in a row merge into one; the child's own storage
        // path is superseded.
        Some(Node::Extension(child)) => {
            stale.push(path[..next_depth].to_vec());
            let ExtensionNode {
                key: child_key,
                next: child_next,
                ..
            } = *child;
            let mut merged = key;
            merged.extend_from_slice(&child_key);
            Some(Node::extension(merged, child_next))
        }
        Some(next) => Some(Node::extension(key, next)),
    };
    Ok(())
}
