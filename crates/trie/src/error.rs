//! Error types for trie operations.

use hextrie_store::StoreError;
use thiserror::Error;

/// Result alias for trie operations.
pub type Result<T> = core::result::Result<T, TrieError>;

/// Errors surfaced by trie operations.
#[derive(Debug, Error)]
pub enum TrieError {
    /// The key is not present in the trie.
    #[error("key not found")]
    NotFound,

    /// A node decoded into a list of unexpected length.
    #[error("invalid number of items in list: {0}")]
    InvalidListLength(usize),

    /// A child slot held a string of a size other than 0 or 32.
    #[error("bad child size {0}, expected 0 or 32")]
    BadChildLength(usize),

    /// Node bytes that do not parse as RLP.
    #[error(transparent)]
    Rlp(#[from] alloy_rlp::Error),

    /// A structural invariant does not hold for the stored trie.
    #[error("malformed trie: {0}")]
    Malformed(&'static str),

    /// A proof that does not reconstruct against its root.
    #[error("invalid proof: {0}")]
    BadProof(&'static str),

    /// Failure propagated from the key-value backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}
