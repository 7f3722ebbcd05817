//! Persisting the trie: post-order encode-and-store with digest caching.

use alloy_primitives::{keccak256, B256};
use hextrie_store::Database;
use log::debug;

use super::nodes::{ExtensionNode, BRANCH_CHILDREN};
use super::{Node, Trie};
use crate::error::{Result, TrieError};
use crate::EMPTY_ROOT;

impl<D: Database> Trie<D> {
    /// Writes every reachable node to the store and returns the root hash.
    ///
    /// Children are committed first, so a parent embeds each of them either
    /// inline (encoding shorter than a digest) or as its hash; a node with a
    /// live cached digest was loaded from the store and is still there, so
    /// it reduces to its reference without re-encoding. Afterwards the
    /// in-memory tree is just the root reference; reads re-expand it on
    /// demand. A commit that fails midway leaves the trie inconsistent and
    /// the caller should discard it.
    pub fn commit(&mut self) -> Result<B256> {
        // Deletions recorded since the last commit go first, so paths they
        // free can be rewritten below.
        for path in std::mem::take(&mut self.stale) {
            self.db.delete(&path)?;
        }

        let Some(root) = self.root.take() else {
            return Ok(EMPTY_ROOT);
        };

        let mut path = Vec::new();
        let committed = self.commit_at(root, &mut path)?;

        // The root is persisted and hashed no matter how small it encodes,
        // so `load` can find it under the empty path.
        let root_hash = match committed {
            Node::Hashed(hash) => hash,
            small => {
                let encoded = small.encode();
                let hash = keccak256(&encoded);
                self.db.put(&[], &encoded)?;
                hash
            }
        };

        debug!("committed trie, root {root_hash}");
        self.root = Some(Node::Hashed(root_hash));
        Ok(root_hash)
    }

    /// Commits the subtree rooted at `node`, stored under the traversal
    /// path `path`, and returns the form its parent should embed.
    fn commit_at(&mut self, node: Node, path: &mut Vec<u8>) -> Result<Node> {
        match node {
            Node::Hashed(_) => Ok(node),

            Node::Leaf(_) => Err(TrieError::Malformed("leaf stored outside its parent")),

            Node::Branch(mut branch) => {
                if let Some(hash) = branch.hash {
                    return Ok(Node::Hashed(hash));
                }

                for i in 0..BRANCH_CHILDREN {
                    let Some(child) = branch.children[i].take() else {
                        continue;
                    };
                    path.push(i as u8);
                    let committed = self.commit_at(child, path);
                    path.pop();
                    branch.children[i] = Some(committed?);
                }
                // The value slot leaf is embedded in the branch encoding.

                self.persist(Node::Branch(branch), path)
            }

            Node::Extension(ext) => {
                if let Some(hash) = ext.hash {
                    return Ok(Node::Hashed(hash));
                }

                let ExtensionNode { key, next, .. } = *ext;
                let next = match next {
                    Node::Branch(_) => {
                        let mark = path.len();
                        path.extend_from_slice(&key);
                        let committed = self.commit_at(next, path);
                        path.truncate(mark);
                        committed?
                    }
                    // A hash reference stays as is; a terminator-keyed
                    // extension keeps its leaf inline.
                    other => other,
                };
                self.persist(Node::extension(key, next), path)
            }
        }
    }

    /// Stores the encoded node under `path` when it is too big to inline,
    /// returning the form its parent embeds.
    fn persist(&mut self, node: Node, path: &[u8]) -> Result<Node> {
        let encoded = node.encode();
        if encoded.len() < 32 {
            return Ok(node);
        }
        let hash = keccak256(&encoded);
        self.db.put(path, &encoded)?;
        Ok(Node::Hashed(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, Bytes};
    use hextrie_store::MemoryDb;

    // Expected hashes for the single-node tries below are the published
    // evmone MPT test vectors.

    #[test]
    fn empty_trie_commits_to_the_well_known_root() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        assert_eq!(trie.commit().unwrap(), EMPTY_ROOT);
        assert_eq!(
            EMPTY_ROOT,
            hex!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421")
        );
    }

    #[test]
    fn single_leaf_root() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(&hex!("010203"), b"hello");
        assert_eq!(
            trie.commit().unwrap(),
            hex!("82c8fd36022fbc91bd6b51580cfd941d3d9994017d59ab2e8293ae9c94c3ab6e")
        );
    }

    #[test]
    fn branch_of_two_leaves_root() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(&hex!("41"), b"v___________________________1");
        trie.put(&hex!("5a"), b"v___________________________2");
        assert_eq!(
            trie.commit().unwrap(),
            hex!("1aaa6f712413b9a115730852323deb5f5d796c29151a60a1f55f41a25354cd26")
        );
    }

    #[test]
    fn branch_of_three_inline_leaves_root() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(&hex!("00"), b"X");
        trie.put(&hex!("10"), b"Y");
        trie.put(&hex!("20"), b"Z");
        assert_eq!(
            trie.commit().unwrap(),
            hex!("5c5154e8d108dcf8b9946c8d33730ec8178345ce9d36e6feed44f0134515482d")
        );
    }

    #[test]
    fn leaves_with_empty_paths_root() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(&hex!("00"), b"X");
        trie.put(&hex!("01"), b"Y");
        assert_eq!(
            trie.commit().unwrap(),
            hex!("0a923005d10fbd4e571655cec425db7c5091db03c33891224073a55d3abc2415")
        );
    }

    #[test]
    fn extension_above_a_branch_root() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(&hex!("585841"), b"v___________________________1");
        trie.put(&hex!("58585a"), b"v___________________________2");
        assert_eq!(
            trie.commit().unwrap(),
            hex!("3eefc183db443d44810b7d925684eb07256e691d5c9cb13215660107121454f9")
        );

        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(&hex!("585841"), b"v___________________________1");
        trie.put(&hex!("58595a"), b"v___________________________2");
        assert_eq!(
            trie.commit().unwrap(),
            hex!("ac28c08fa3ff1d0d2cc9a6423abb7af3f4dcc37aa2210727e7d3009a9b4a34e8")
        );
    }

    #[test]
    fn same_content_same_root() {
        let mut a = Trie::new_empty(MemoryDb::new());
        a.put(b"do", b"verb");
        a.put(b"dog", b"puppy");
        a.put(b"doge", b"coins");
        a.put(b"horse", b"stallion");

        let mut b = Trie::new_empty(MemoryDb::new());
        b.put(b"horse", b"stallion");
        b.put(b"doge", b"coins");
        b.put(b"dog", b"puppy");
        b.put(b"do", b"verb");

        assert_eq!(a.commit().unwrap(), b.commit().unwrap());
    }

    #[test]
    fn commit_is_idempotent() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(b"do", b"verb");
        trie.put(b"horse", b"stallion");

        let first = trie.commit().unwrap();
        assert_eq!(trie.commit().unwrap(), first);
    }

    #[test]
    fn reload_sees_the_committed_state() {
        let store = MemoryDb::new();
        let mut trie = Trie::new_empty(store.clone());
        trie.put(b"do", b"verb");
        trie.put(b"dog", b"puppy");
        trie.put(b"doge", b"coins");
        trie.put(b"horse", b"stallion");
        let root = trie.commit().unwrap();

        let reloaded = Trie::load(store.clone(), root);
        assert_eq!(reloaded.get(b"horse").unwrap(), Bytes::from("stallion"));
        assert_eq!(reloaded.get(b"doge").unwrap(), Bytes::from("coins"));
        assert!(matches!(
            reloaded.get(b"dogs"),
            Err(TrieError::NotFound)
        ));

        // Committing the reloaded, untouched trie reproduces the root.
        let mut reloaded = Trie::load(store, root);
        assert_eq!(reloaded.commit().unwrap(), root);
    }

    #[test]
    fn loading_the_empty_root_is_an_empty_trie() {
        let trie: Trie<MemoryDb> = Trie::load(MemoryDb::new(), EMPTY_ROOT);
        assert!(matches!(trie.get(b"anything"), Err(TrieError::NotFound)));
    }

    #[test]
    fn recommit_after_mutations_tracks_content() {
        let store = MemoryDb::new();
        let mut trie = Trie::new_empty(store.clone());
        trie.put(b"do", b"verb");
        trie.put(b"dog", b"puppy");
        let before = trie.commit().unwrap();

        trie.put(b"doge", b"coins");
        let after = trie.commit().unwrap();
        assert_ne!(before, after);

        // A fresh build of the same map commits to the same root.
        let mut fresh = Trie::new_empty(MemoryDb::new());
        fresh.put(b"do", b"verb");
        fresh.put(b"dog", b"puppy");
        fresh.put(b"doge", b"coins");
        assert_eq!(fresh.commit().unwrap(), after);
    }

    #[test]
    fn delete_then_put_leaves_no_orphaned_paths() {
        let store = MemoryDb::new();
        let mut trie = Trie::new_empty(store.clone());
        trie.put(b"key", b"value-1");
        trie.commit().unwrap();
        assert!(store.contains(&[]));

        trie.delete(b"key").unwrap();
        trie.put(b"key", b"value-2");
        trie.commit().unwrap();

        assert_eq!(trie.get(b"key").unwrap(), Bytes::from("value-2"));
        // Only the root path remains; nothing from the old version.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_to_empty_scrubs_the_store() {
        let store = MemoryDb::new();
        let mut trie = Trie::new_empty(store.clone());
        trie.put(b"key", b"value");
        trie.commit().unwrap();
        assert!(!store.is_empty());

        trie.delete(b"key").unwrap();
        assert_eq!(trie.commit().unwrap(), EMPTY_ROOT);
        assert!(store.is_empty());
    }
}
