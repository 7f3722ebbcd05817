//! Hex-nibble key encoding.
//!
//! Inside the trie every key is a path of nibbles ending in a terminator
//! pseudo-nibble; on disk the path is packed into the compact ("hex-prefix")
//! form whose flag byte records the terminator and odd-length bits.

/// Number of nibble values, and the radix of a branch node.
pub const ALPHABET_SIZE: usize = 16;

/// Pseudo-nibble marking a leaf-bearing path. Doubles as the index of the
/// value slot in a branch node.
pub const TERMINATOR: u8 = 0x10;

const ODD_FLAG: u8 = 0x10;
const TERM_FLAG: u8 = 0x20;

/// Expands a byte key into hex nibbles followed by the terminator:
/// high nibble, then low nibble, per byte.
pub fn to_hex(key: &[u8]) -> Vec<u8> {
    let mut nibbles = Vec::with_capacity(key.len() * 2 + 1);
    for byte in key {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0f);
    }
    nibbles.push(TERMINATOR);
    nibbles
}

/// Length of the longest common prefix of two nibble paths.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Whether a hex path ends with the terminator nibble.
pub fn has_terminator(hex: &[u8]) -> bool {
    hex.last() == Some(&TERMINATOR)
}

/// Packs a hex path into its compact form: a flag byte, then two nibbles per
/// byte. The terminator is stripped and recorded as a flag; an odd-length
/// path parks its first nibble in the flag byte.
pub fn compact(hex: &[u8]) -> Vec<u8> {
    let mut hex = hex;
    let mut prefix = 0u8;
    if has_terminator(hex) {
        prefix |= TERM_FLAG;
        hex = &hex[..hex.len() - 1];
    }

    let mut buf = Vec::with_capacity(hex.len() / 2 + 1);
    if hex.len() % 2 == 1 {
        buf.push(prefix | ODD_FLAG | hex[0]);
        hex = &hex[1..];
    } else {
        buf.push(prefix);
    }

    for pair in hex.chunks_exact(2) {
        buf.push(pair[0] << 4 | pair[1]);
    }
    buf
}

/// Unpacks a compact key back into hex nibbles, restoring the terminator
/// when the flag byte carries it. Exact inverse of [`compact`] for valid
/// inputs.
pub fn expand_to_hex(compact: &[u8]) -> Vec<u8> {
    if compact.is_empty() {
        return Vec::new();
    }

    let mut hex = to_hex(compact);
    // `to_hex` appended a terminator; it stands in for the one the flag
    // encodes, so it only stays when the terminator flag is set.
    if hex[0] < TERM_FLAG >> 4 {
        hex.pop();
    }

    if hex[0] & (ODD_FLAG >> 4) != 0 {
        hex.drain(..1);
    } else {
        hex.drain(..2);
    }
    hex
}
