#![no_main]

use arbitrary::Arbitrary;
use hextrie::encoding;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    nibbles: Vec<u8>,
    terminated: bool,
}

fuzz_target!(|input: Input| {
    let mut hex: Vec<u8> = input.nibbles.iter().map(|n| n & 0x0f).collect();
    if input.terminated {
        hex.push(encoding::TERMINATOR);
    }

    let expanded = encoding::expand_to_hex(&encoding::compact(&hex));
    assert_eq!(expanded, hex, "compact encoding failed to round-trip");
});
