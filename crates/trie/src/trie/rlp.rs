//! RLP serialization of trie nodes.
//!
//! The wire form is the canonical Ethereum one: an extension is a two-item
//! list of compact key and child, a branch a seventeen-item list, and a
//! child appears either inlined (when its encoding is shorter than a
//! digest) or as a 32-byte hash string.

use alloy_primitives::{keccak256, Bytes, B256};
use alloy_rlp::{Encodable, Header, PayloadView, EMPTY_STRING_CODE};

use super::nodes::{BranchNode, ExtensionNode, Node, BRANCH_CHILDREN, BRANCH_SIZE, BRANCH_VALUE};
use crate::encoding;
use crate::error::{Result, TrieError};

impl Node {
    /// Full RLP encoding of the node, children in their committed form.
    pub(crate) fn encode(&self) -> Vec<u8> {
        match self {
            Node::Leaf(value) => encode_string(value),
            Node::Hashed(hash) => encode_word(hash),

            Node::Extension(ext) => {
                let compact = encoding::compact(&ext.key);
                let child = match &ext.next {
                    // A leaf is embedded as the raw value string no matter
                    // how long it is.
                    Node::Leaf(value) => encode_string(value),
                    next => next.rlp_node(),
                };
                let mut out = encode_list_header(compact.as_slice().length() + child.len());
                compact.as_slice().encode(&mut out);
                out.extend_from_slice(&child);
                out
            }

            Node::Branch(branch) => {
                let mut payload = Vec::new();
                for slot in &branch.children {
                    match slot {
                        None => payload.push(EMPTY_STRING_CODE),
                        Some(Node::Leaf(value)) => payload.extend_from_slice(&encode_string(value)),
                        Some(child) => payload.extend_from_slice(&child.rlp_node()),
                    }
                }
                let mut out = encode_list_header(payload.len());
                out.extend_from_slice(&payload);
                out
            }
        }
    }

    /// The form a node takes inside its parent: the raw encoding when it is
    /// shorter than a digest, the encoded digest otherwise.
    pub(crate) fn rlp_node(&self) -> Vec<u8> {
        if let Some(hash) = self.cached_hash() {
            return encode_word(&hash);
        }
        let encoded = self.encode();
        if encoded.len() < 32 {
            encoded
        } else {
            encode_word(&keccak256(&encoded))
        }
    }

    /// Reconstructs a node from its RLP bytes. `hash` is the digest the
    /// blob was fetched under and is stamped as the node's cached digest.
    pub(crate) fn decode(raw: &[u8], hash: Option<B256>) -> Result<Node> {
        let mut buf = raw;
        let items = match Header::decode_raw(&mut buf)? {
            PayloadView::List(items) => items,
            PayloadView::String(_) => return Err(TrieError::Malformed("expected a node list")),
        };

        match items.len() {
            2 => {
                let [encoded_key, encoded_child] = items.as_slice() else {
                    unreachable!()
                };
                let mut key_buf = *encoded_key;
                let key = encoding::expand_to_hex(Header::decode_bytes(&mut key_buf, false)?);
                if key.is_empty() {
                    return Err(TrieError::Malformed("extension with an empty key"));
                }

                let next = if encoding::has_terminator(&key) {
                    let mut value_buf = *encoded_child;
                    let value = Header::decode_bytes(&mut value_buf, false)?;
                    Node::Leaf(Bytes::copy_from_slice(value))
                } else {
                    decode_child(encoded_child)?
                        .ok_or(TrieError::Malformed("extension without a child"))?
                };

                Ok(Node::Extension(Box::new(ExtensionNode { key, next, hash })))
            }

            BRANCH_SIZE => {
                let mut branch = BranchNode::new();
                for (i, encoded) in items[..BRANCH_CHILDREN].iter().enumerate() {
                    branch.children[i] = decode_child(encoded)?;
                }

                let mut value_buf = items[BRANCH_VALUE];
                let value = Header::decode_bytes(&mut value_buf, false)?;
                if !value.is_empty() {
                    branch.children[BRANCH_VALUE] = Some(Node::Leaf(Bytes::copy_from_slice(value)));
                }

                branch.hash = hash;
                Ok(Node::Branch(Box::new(branch)))
            }

            n => Err(TrieError::InvalidListLength(n)),
        }
    }
}

/// Decodes a child slot: absent, a digest reference, or an inlined node.
fn decode_child(encoded: &[u8]) -> Result<Option<Node>> {
    let mut probe = encoded;
    match Header::decode_raw(&mut probe)? {
        PayloadView::List(_) => Ok(Some(Node::decode(encoded, None)?)),
        PayloadView::String(payload) => match payload.len() {
            0 => Ok(None),
            32 => Ok(Some(Node::Hashed(B256::from_slice(payload)))),
            n => Err(TrieError::BadChildLength(n)),
        },
    }
}

fn encode_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    bytes.encode(&mut out);
    out
}

fn encode_word(hash: &B256) -> Vec<u8> {
    let mut out = Vec::with_capacity(33);
    hash.encode(&mut out);
    out
}

/// Encodes a list header for a known payload length, reserving the buffer.
fn encode_list_header(payload_length: usize) -> Vec<u8> {
    let header = Header {
        list: true,
        payload_length,
    };
    let mut out = Vec::with_capacity(header.length() + payload_length);
    header.encode(&mut out);
    out
}
