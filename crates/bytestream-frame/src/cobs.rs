//! Consistent Overhead Byte Stuffing.
//!
//! Wire format:
//! ```text
//! ┌─────────────┬──────────────────────┬─────┬──────┐
//! │ Length (1B) │ Literals (Length-1)  │ ... │ 0x00 │
//! └─────────────┴──────────────────────┴─────┴──────┘
//! ```
//!
//! Every zero in the payload is elided and replaced by the length byte of
//! the block that follows it. A length byte of `0xFF` marks a block that was
//! closed because it reached 254 literals, so no zero is elided after it.

use bytes::{BufMut, BytesMut};

use crate::decoder::ByteDecoder;

/// Frame delimiter.
pub const DELIMITER: u8 = 0x00;

/// Length byte of a block closed at the 254-literal cap.
const MAX_BLOCK_CODE: u8 = 0xFF;

/// Worst-case encoded size for a payload of `len` bytes, terminator included.
pub const fn max_encoded_len(len: usize) -> usize {
    len.saturating_add(len.div_ceil(254)).saturating_add(2)
}

/// Encode `input` as one COBS frame, appending to `dst`.
pub fn encode(input: &[u8], dst: &mut BytesMut) {
    dst.reserve(max_encoded_len(input.len()));

    let mut slot = Some(dst.len());
    dst.put_u8(0);
    let mut block_len: u8 = 1;

    for (index, &byte) in input.iter().enumerate() {
        if byte != 0 {
            dst.put_u8(byte);
            block_len += 1;
        }

        if byte == 0 || block_len == MAX_BLOCK_CODE {
            if let Some(at) = slot {
                dst[at] = block_len;
            }
            block_len = 1;

            // A block closed at the cap as the final input byte needs no
            // follow-up block: the terminator goes straight after it.
            slot = if byte == 0 || index + 1 != input.len() {
                let at = dst.len();
                dst.put_u8(0);
                Some(at)
            } else {
                None
            };
        }
    }

    if let Some(at) = slot {
        dst[at] = block_len;
    }
    dst.put_u8(DELIMITER);
}

/// Encode `input` into a freshly allocated buffer.
pub fn encode_to_vec(input: &[u8]) -> Vec<u8> {
    let mut dst = BytesMut::with_capacity(max_encoded_len(input.len()));
    encode(input, &mut dst);
    dst.to_vec()
}

/// Decode one COBS frame from `input`, appending the payload to `dst`.
///
/// Stops after the terminating zero and returns the number of input bytes
/// consumed. Input that ends before a terminator yields everything decoded
/// so far and reports the whole input as consumed.
pub fn decode(input: &[u8], dst: &mut BytesMut) -> usize {
    let mut code = MAX_BLOCK_CODE;
    let mut block: u8 = 0;

    for (index, &byte) in input.iter().enumerate() {
        if block > 0 {
            dst.put_u8(byte);
            block -= 1;
            continue;
        }

        if byte != 0 && code != MAX_BLOCK_CODE {
            dst.put_u8(0);
        }
        code = byte;
        if code == 0 {
            return index + 1;
        }
        block = byte - 1;
    }

    input.len()
}

/// Decode one COBS frame into a freshly allocated buffer.
pub fn decode_to_vec(input: &[u8]) -> Vec<u8> {
    let mut dst = BytesMut::with_capacity(input.len());
    decode(input, &mut dst);
    dst.to_vec()
}

/// Incremental COBS decoder fed one byte at a time.
///
/// Once a frame completes, the next byte fed starts a new frame without an
/// explicit [`reset`](CobsDecoder::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CobsDecoder {
    block_remaining: u8,
    code: u8,
    packet_complete: bool,
}

impl Default for CobsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CobsDecoder {
    /// Create a decoder waiting for the first length byte.
    pub const fn new() -> Self {
        Self {
            block_remaining: 0,
            code: MAX_BLOCK_CODE,
            packet_complete: false,
        }
    }
}

impl ByteDecoder for CobsDecoder {
    fn process_byte(&mut self, byte: u8) -> Option<u8> {
        if self.packet_complete {
            self.reset();
        }

        if self.block_remaining > 0 {
            self.block_remaining -= 1;
            return Some(byte);
        }

        let previous = self.code;
        self.code = byte;
        if byte == 0 {
            self.packet_complete = true;
            return None;
        }
        self.block_remaining = byte - 1;

        // Restore the zero elided between two blocks.
        if previous != MAX_BLOCK_CODE {
            return Some(0);
        }
        None
    }

    fn packet_complete(&self) -> bool {
        self.packet_complete
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u16, end: u16) -> Vec<u8> {
        (start..end).map(|b| b as u8).collect()
    }

    fn compose(parts: &[&[u8]]) -> Vec<u8> {
        parts.concat()
    }

    /// Reference table from the COBS paper / Wikipedia encoding examples.
    fn vectors() -> Vec<(Vec<u8>, Vec<u8>)> {
        vec![
            (vec![0x00], vec![0x01, 0x01, 0x00]),
            (vec![0x00, 0x00], vec![0x01, 0x01, 0x01, 0x00]),
            (vec![0x00, 0x11, 0x00], vec![0x01, 0x02, 0x11, 0x01, 0x00]),
            (
                vec![0x11, 0x22, 0x00, 0x33],
                vec![0x03, 0x11, 0x22, 0x02, 0x33, 0x00],
            ),
            (
                vec![0x11, 0x22, 0x33, 0x44],
                vec![0x05, 0x11, 0x22, 0x33, 0x44, 0x00],
            ),
            (
                vec![0x11, 0x00, 0x00, 0x00],
                vec![0x02, 0x11, 0x01, 0x01, 0x01, 0x00],
            ),
            (
                range(0x01, 0xFF),
                compose(&[&[0xFF], &range(0x01, 0xFF), &[0x00]]),
            ),
            (
                range(0x00, 0xFF),
                compose(&[&[0x01, 0xFF], &range(0x01, 0xFF), &[0x00]]),
            ),
            (
                range(0x01, 0x100),
                compose(&[&[0xFF], &range(0x01, 0xFF), &[0x02, 0xFF, 0x00]]),
            ),
            (
                compose(&[&range(0x02, 0x100), &[0x00]]),
                compose(&[&[0xFF], &range(0x02, 0x100), &[0x01, 0x01, 0x00]]),
            ),
            (
                compose(&[&range(0x03, 0x100), &[0x00, 0x01]]),
                compose(&[&[0xFE], &range(0x03, 0x100), &[0x02, 0x01, 0x00]]),
            ),
        ]
    }

    fn decode_piecemeal(encoded: &[u8]) -> (Vec<u8>, usize) {
        let mut decoder = CobsDecoder::new();
        let mut decoded = Vec::new();
        let mut completions = 0;
        for &byte in encoded {
            if let Some(out) = decoder.process_byte(byte) {
                decoded.push(out);
            }
            if decoder.packet_complete() {
                completions += 1;
            }
        }
        (decoded, completions)
    }

    #[test]
    fn encodes_reference_vectors() {
        for (decoded, encoded) in vectors() {
            assert_eq!(encode_to_vec(&decoded), encoded, "input {decoded:02X?}");
        }
    }

    #[test]
    fn decodes_reference_vectors() {
        for (decoded, encoded) in vectors() {
            let mut out = BytesMut::new();
            let consumed = decode(&encoded, &mut out);
            assert_eq!(consumed, encoded.len());
            assert_eq!(out.as_ref(), decoded.as_slice());
        }
    }

    #[test]
    fn piecemeal_decoding_matches_bulk() {
        for (decoded, encoded) in vectors() {
            let (piecemeal, completions) = decode_piecemeal(&encoded);
            assert_eq!(piecemeal, decoded);
            assert_eq!(completions, 1);
        }
    }

    #[test]
    fn max_encoded_len_bounds_reference_vectors() {
        for (decoded, encoded) in vectors() {
            assert!(max_encoded_len(decoded.len()) >= encoded.len());
        }
    }

    #[test]
    fn max_encoded_len_formula() {
        assert_eq!(max_encoded_len(0), 2);
        assert_eq!(max_encoded_len(1), 4);
        assert_eq!(max_encoded_len(254), 257);
        assert_eq!(max_encoded_len(255), 259);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let encoded = encode_to_vec(&[]);
        assert_eq!(encoded, vec![0x01, 0x00]);
        assert!(decode_to_vec(&encoded).is_empty());
        assert_eq!(decode_piecemeal(&encoded), (Vec::new(), 1));
    }

    #[test]
    fn cap_boundaries_roundtrip() {
        for len in [253usize, 254, 255, 256, 257, 508, 509, 1024] {
            let nonzero: Vec<u8> = (0..len).map(|i| (i % 255) as u8 + 1).collect();
            let with_zeros: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
            for input in [nonzero, with_zeros] {
                let encoded = encode_to_vec(&input);
                assert!(encoded.len() <= max_encoded_len(input.len()));
                assert_eq!(encoded.iter().filter(|&&b| b == 0).count(), 1);
                assert_eq!(decode_to_vec(&encoded), input, "len {len}");
                assert_eq!(decode_piecemeal(&encoded).0, input, "len {len}");
            }
        }
    }

    #[test]
    fn decoder_auto_resets_between_frames() {
        let mut wire = encode_to_vec(&[0x11, 0x00, 0x22]);
        wire.extend(encode_to_vec(&[0x00]));
        wire.extend(encode_to_vec(&range(0x01, 0x100)));

        let mut decoder = CobsDecoder::new();
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for byte in wire {
            if let Some(out) = decoder.process_byte(byte) {
                current.push(out);
            }
            if decoder.packet_complete() {
                frames.push(std::mem::take(&mut current));
            }
        }

        assert_eq!(
            frames,
            vec![vec![0x11, 0x00, 0x22], vec![0x00], range(0x01, 0x100)]
        );
    }

    #[test]
    fn bulk_decode_stops_at_terminator() {
        let mut wire = encode_to_vec(&[0x01, 0x02]);
        wire.extend_from_slice(&[0x05, 0x06]);

        let mut out = BytesMut::new();
        let consumed = decode(&wire, &mut out);
        assert_eq!(consumed, 4);
        assert_eq!(out.as_ref(), &[0x01, 0x02]);
    }

    #[test]
    fn bulk_decode_without_terminator_returns_partial() {
        let mut out = BytesMut::new();
        let consumed = decode(&[0x03, 0x11, 0x22, 0x02], &mut out);
        assert_eq!(consumed, 4);
        assert_eq!(out.as_ref(), &[0x11, 0x22, 0x00]);
    }

    #[test]
    fn reset_clears_mid_frame_state() {
        let mut decoder = CobsDecoder::new();
        assert_eq!(decoder.process_byte(0x03), None);
        assert_eq!(decoder.process_byte(0x11), Some(0x11));
        decoder.reset();
        assert_eq!(decoder, CobsDecoder::new());
    }
}
