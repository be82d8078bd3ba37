//! Self-delimiting binary frame for embedded messages.
//!
//! Frame layout, bit-exact:
//!
//! ```text
//! [16-bit big-endian length L][L * 8 bits of payload][16-bit terminator]
//! ```
//!
//! `L` counts payload characters, not bits. Bits are represented as a
//! sequence of `0`/`1` byte values, most significant bit first within
//! each field.

use crate::error::{Result, StegoError};

/// End-of-frame sentinel: `1111111111111110`.
pub const TERMINATOR: [u8; 16] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

/// Hard cap imposed by the 16-bit length header.
pub const MAX_MESSAGE_LEN: usize = 65535;

const LENGTH_BITS: usize = 16;
const CHAR_BITS: usize = 8;

/// Serialize a payload into a framed bitstream.
///
/// Characters above code point 255 are truncated to their low 8 bits, so
/// the frame is only lossless for Latin-1-representable text. Payloads
/// longer than [`MAX_MESSAGE_LEN`] characters are rejected rather than
/// letting the fixed-width header wrap.
pub fn pack(payload: &str) -> Result<Vec<u8>> {
    let char_count = payload.chars().count();
    if char_count > MAX_MESSAGE_LEN {
        return Err(StegoError::MessageTooLong(char_count));
    }

    let mut bits = Vec::with_capacity(LENGTH_BITS + char_count * CHAR_BITS + TERMINATOR.len());
    push_bits(&mut bits, char_count as u64, LENGTH_BITS);
    for ch in payload.chars() {
        push_bits(&mut bits, (ch as u32 & 0xFF) as u64, CHAR_BITS);
    }
    bits.extend_from_slice(&TERMINATOR);
    Ok(bits)
}

/// Recover the payload text from a framed bitstream.
///
/// The frame ends at the FIRST occurrence of the terminator pattern
/// anywhere in the stream, header included. A header or payload whose
/// bits happen to contain that pattern therefore terminates the frame
/// early; this matches the extraction side, which stops accumulating at
/// the same point.
pub fn unpack(bits: &[u8]) -> Result<String> {
    let end = find_terminator(bits).ok_or(StegoError::TerminatorNotFound)?;

    if end < LENGTH_BITS {
        return Err(StegoError::TruncatedFrame {
            declared: 0,
            available_bits: end,
        });
    }

    let declared = read_bits(&bits[..LENGTH_BITS]) as usize;
    let payload_bits = &bits[LENGTH_BITS..end];
    if payload_bits.len() < declared * CHAR_BITS {
        return Err(StegoError::TruncatedFrame {
            declared,
            available_bits: payload_bits.len(),
        });
    }

    let payload = payload_bits[..declared * CHAR_BITS]
        .chunks(CHAR_BITS)
        .map(|byte| read_bits(byte) as u8 as char)
        .collect();
    Ok(payload)
}

/// Index of the first bit of the first terminator occurrence, if any.
pub fn find_terminator(bits: &[u8]) -> Option<usize> {
    bits.windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR.as_slice())
}

fn push_bits(bits: &mut Vec<u8>, value: u64, width: usize) {
    for shift in (0..width).rev() {
        bits.push(((value >> shift) & 1) as u8);
    }
}

fn read_bits(bits: &[u8]) -> u64 {
    bits.iter().fold(0, |acc, &bit| acc << 1 | bit as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(s: &str) -> Vec<u8> {
        s.bytes().map(|b| b - b'0').collect()
    }

    #[test]
    fn test_pack_hi_exact_layout() {
        // "HI": length 2, then 'H' = 0x48, 'I' = 0x49, then terminator.
        let expected = bits_of("0000000000000010")
            .into_iter()
            .chain(bits_of("01001000"))
            .chain(bits_of("01001001"))
            .chain(TERMINATOR)
            .collect::<Vec<_>>();
        assert_eq!(pack("HI").unwrap(), expected);
        assert_eq!(pack("HI").unwrap().len(), 48);
    }

    #[test]
    fn test_pack_empty_payload() {
        let bits = pack("").unwrap();
        assert_eq!(bits.len(), 32);
        assert_eq!(unpack(&bits).unwrap(), "");
    }

    #[test]
    fn test_roundtrip() {
        for payload in ["HI", "hello world", "1234,5678,91011", "\u{00ff}"] {
            let bits = pack(payload).unwrap();
            assert_eq!(unpack(&bits).unwrap(), payload.to_string());
        }
    }

    #[test]
    fn test_high_code_points_truncate() {
        // U+0141 truncates to 0x41 'A'.
        let bits = pack("\u{0141}").unwrap();
        assert_eq!(unpack(&bits).unwrap(), "A");
    }

    #[test]
    fn test_unpack_without_terminator() {
        let mut bits = pack("HI").unwrap();
        bits.truncate(bits.len() - 16);
        assert_eq!(unpack(&bits), Err(StegoError::TerminatorNotFound));
    }

    #[test]
    fn test_unpack_truncated_payload() {
        // Header claims 4 characters but only one byte precedes the
        // terminator.
        let mut bits = Vec::new();
        push_bits(&mut bits, 4, 16);
        push_bits(&mut bits, 0x41, 8);
        bits.extend_from_slice(&TERMINATOR);
        assert_eq!(
            unpack(&bits),
            Err(StegoError::TruncatedFrame {
                declared: 4,
                available_bits: 8,
            })
        );
    }

    #[test]
    fn test_trailing_noise_after_terminator_ignored() {
        // Extraction can overshoot by the bits of a partly consumed
        // pixel; unpack must cut at the first terminator occurrence.
        let mut bits = pack("HI").unwrap();
        bits.extend_from_slice(&[0, 1, 0]);
        assert_eq!(unpack(&bits).unwrap(), "HI");
    }

    #[test]
    fn test_message_too_long() {
        let payload = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert_eq!(
            pack(&payload),
            Err(StegoError::MessageTooLong(MAX_MESSAGE_LEN + 1))
        );
        assert!(pack(&"a".repeat(MAX_MESSAGE_LEN)).is_ok());
    }
}
