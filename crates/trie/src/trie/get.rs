//! Lookup of a value by key path.

use alloy_primitives::Bytes;
use hextrie_store::Database;

use super::{Node, Trie};
use crate::encoding;
use crate::error::{Result, TrieError};

impl<D: Database> Trie<D> {
    /// Returns the value stored under `key`, or [`TrieError::NotFound`].
    pub fn get(&self, key: &[u8]) -> Result<Bytes> {
        let path = encoding::to_hex(key);
        self.get_at(self.root.as_ref(), &path, 0)
    }

    fn get_at(&self, node: Option<&Node>, path: &[u8], depth: usize) -> Result<Bytes> {
        match node {
            None => Err(TrieError::NotFound),

            // End of the walk: the terminator-keyed extension or value slot
            // above consumed the rest of the path.
            Some(Node::Leaf(value)) => Ok(value.clone()),

            Some(Node::Branch(branch)) => match path.get(depth) {
                Some(&nibble) => {
                    self.get_at(branch.children[nibble as usize].as_ref(), path, depth + 1)
                }
                None => Err(TrieError::NotFound),
            },

            Some(Node::Extension(ext)) => {
                let key_len = ext.key.len();
                if path.len() - depth < key_len || path[depth..depth + key_len] != ext.key[..] {
                    return Err(TrieError::NotFound);
                }
                self.get_at(Some(&ext.next), path, depth + key_len)
            }

            Some(Node::Hashed(hash)) => {
                let resolved = self.load_hashed(&path[..depth], *hash)?;
                self.get_at(Some(&resolved), path, depth)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hextrie_store::MemoryDb;

    fn fixture() -> Trie<MemoryDb> {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(b"do", b"verb");
        trie.put(b"dog", b"puppy");
        trie.put(b"doge", b"coins");
        trie.put(b"horse", b"stallion");
        trie
    }

    #[test]
    fn finds_every_inserted_key() {
        let trie = fixture();
        assert_eq!(trie.get(b"do").unwrap(), Bytes::from("verb"));
        assert_eq!(trie.get(b"dog").unwrap(), Bytes::from("puppy"));
        assert_eq!(trie.get(b"doge").unwrap(), Bytes::from("coins"));
        assert_eq!(trie.get(b"horse").unwrap(), Bytes::from("stallion"));
    }

    #[test]
    fn misses_are_not_found() {
        let trie = fixture();
        // A key extending a stored key.
        assert!(matches!(trie.get(b"dogs"), Err(TrieError::NotFound)));
        // A strict prefix of a stored key.
        assert!(matches!(trie.get(b"d"), Err(TrieError::NotFound)));
        // A key diverging at the root.
        assert!(matches!(trie.get(b"cat"), Err(TrieError::NotFound)));
        assert!(matches!(trie.get(b""), Err(TrieError::NotFound)));
    }

    #[test]
    fn empty_trie_has_nothing() {
        let trie = Trie::new_empty(MemoryDb::new());
        assert!(matches!(trie.get(b"anything"), Err(TrieError::NotFound)));
    }

    #[test]
    fn empty_key_is_a_key() {
        let mut trie = Trie::new_empty(MemoryDb::new());
        trie.put(b"", b"rooted");
        assert_eq!(trie.get(b"").unwrap(), Bytes::from("rooted"));
    }
}
