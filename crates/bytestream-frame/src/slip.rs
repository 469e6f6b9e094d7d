//! Serial Line IP framing (RFC 1055).
//!
//! `END` and `ESC` inside the payload are transposed to two-byte escape
//! sequences; every frame is terminated by a single unescaped `END`.

use bytes::{BufMut, BytesMut};

use crate::decoder::ByteDecoder;

/// Frame end.
pub const END: u8 = 0xC0;

/// Frame escape.
pub const ESC: u8 = 0xDB;

/// Transposed frame end.
pub const ESC_END: u8 = 0xDC;

/// Transposed frame escape.
pub const ESC_ESC: u8 = 0xDD;

/// Worst-case encoded size for a payload of `len` bytes, terminator included.
pub const fn max_encoded_len(len: usize) -> usize {
    len.saturating_mul(2).saturating_add(2)
}

/// Encode `input` as one SLIP frame, appending to `dst`.
pub fn encode(input: &[u8], dst: &mut BytesMut) {
    dst.reserve(max_encoded_len(input.len()));
    for &byte in input {
        match byte {
            END => dst.put_slice(&[ESC, ESC_END]),
            ESC => dst.put_slice(&[ESC, ESC_ESC]),
            _ => dst.put_u8(byte),
        }
    }
    dst.put_u8(END);
}

/// Encode `input` into a freshly allocated buffer.
pub fn encode_to_vec(input: &[u8]) -> Vec<u8> {
    let mut dst = BytesMut::with_capacity(max_encoded_len(input.len()));
    encode(input, &mut dst);
    dst.to_vec()
}

/// Decode one SLIP frame from `input`, appending the payload to `dst`.
///
/// Runs the same state machine as [`SlipDecoder`], so malformed escapes are
/// handled identically on both paths. Returns the number of input bytes
/// consumed, up to and including the terminating `END`.
pub fn decode(input: &[u8], dst: &mut BytesMut) -> usize {
    let mut decoder = SlipDecoder::new();
    for (index, &byte) in input.iter().enumerate() {
        if let Some(out) = decoder.process_byte(byte) {
            dst.put_u8(out);
        }
        if decoder.packet_complete() {
            return index + 1;
        }
    }
    input.len()
}

/// Decode one SLIP frame into a freshly allocated buffer.
pub fn decode_to_vec(input: &[u8]) -> Vec<u8> {
    let mut dst = BytesMut::with_capacity(input.len());
    decode(input, &mut dst);
    dst.to_vec()
}

/// Incremental SLIP decoder fed one byte at a time.
///
/// A byte other than `ESC_END`/`ESC_ESC` following `ESC` is dropped, and an
/// `END` following `ESC` is swallowed without clearing the escape. Both are
/// best-effort recovery, not validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlipDecoder {
    escaped: bool,
    packet_complete: bool,
}

impl SlipDecoder {
    /// Create a decoder at the start of a frame.
    pub const fn new() -> Self {
        Self {
            escaped: false,
            packet_complete: false,
        }
    }

    /// Whether the previous byte was an unconsumed `ESC`.
    pub fn is_escaped(&self) -> bool {
        self.escaped
    }
}

impl ByteDecoder for SlipDecoder {
    fn process_byte(&mut self, byte: u8) -> Option<u8> {
        if self.packet_complete {
            self.reset();
        }

        match byte {
            ESC => {
                self.escaped = true;
                None
            }
            ESC_END if self.escaped => {
                self.escaped = false;
                Some(END)
            }
            ESC_ESC if self.escaped => {
                self.escaped = false;
                Some(ESC)
            }
            ESC_END | ESC_ESC => Some(byte),
            END => {
                if !self.escaped {
                    self.packet_complete = true;
                }
                None
            }
            _ if self.escaped => None,
            _ => Some(byte),
        }
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

    fn vectors() -> Vec<(Vec<u8>, Vec<u8>)> {
        vec![
            (vec![0x00], vec![0x00, END]),
            (vec![0x00, 0x00], vec![0x00, 0x00, END]),
            (vec![0x00, 0x11, 0x22], vec![0x00, 0x11, 0x22, END]),
            (vec![END], vec![ESC, ESC_END, END]),
            (vec![ESC], vec![ESC, ESC_ESC, END]),
            (vec![ESC_END], vec![ESC_END, END]),
            (vec![ESC_ESC], vec![ESC_ESC, END]),
            (vec![END, ESC], vec![ESC, ESC_END, ESC, ESC_ESC, END]),
            (vec![ESC, END], vec![ESC, ESC_ESC, ESC, ESC_END, END]),
            (
                vec![END, ESC, END],
                vec![ESC, ESC_END, ESC, ESC_ESC, ESC, ESC_END, END],
            ),
            (
                vec![ESC, END, ESC],
                vec![ESC, ESC_ESC, ESC, ESC_END, ESC, ESC_ESC, END],
            ),
            (
                range(0x00, 0x100),
                [
                    range(0x00, END as u16),
                    vec![ESC, ESC_END],
                    range(END as u16 + 1, ESC as u16),
                    vec![ESC, ESC_ESC],
                    range(ESC as u16 + 1, 0x100),
                    vec![END],
                ]
                .concat(),
            ),
        ]
    }

    fn decode_piecemeal(encoded: &[u8]) -> (Vec<u8>, usize) {
        let mut decoder = SlipDecoder::new();
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
            assert_eq!(decode(&encoded, &mut out), encoded.len());
            assert_eq!(out.as_ref(), decoded.as_slice());
        }
    }

    #[test]
    fn piecemeal_decoding_matches_bulk() {
        for (decoded, encoded) in vectors() {
            assert_eq!(decode_piecemeal(&encoded), (decoded, 1));
        }
    }

    #[test]
    fn max_encoded_len_bounds_reference_vectors() {
        for (decoded, encoded) in vectors() {
            assert!(max_encoded_len(decoded.len()) >= encoded.len());
        }
        let worst = vec![END; 64];
        assert_eq!(encode_to_vec(&worst).len(), max_encoded_len(64) - 1);
    }

    #[test]
    fn empty_payload_is_bare_end() {
        assert_eq!(encode_to_vec(&[]), vec![END]);
        assert_eq!(decode_piecemeal(&[END]), (Vec::new(), 1));
    }

    #[test]
    fn decoder_auto_resets_between_frames() {
        let mut wire = encode_to_vec(&[0x01, END]);
        wire.extend(encode_to_vec(&[ESC, 0x02]));

        let mut decoder = SlipDecoder::new();
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

        assert_eq!(frames, vec![vec![0x01, END], vec![ESC, 0x02]]);
    }

    #[test]
    fn byte_after_stray_escape_is_dropped() {
        let (decoded, completions) = decode_piecemeal(&[0x01, ESC, 0x42, END]);
        // The escape stays armed after the dropped byte, so END is swallowed.
        assert_eq!(decoded, vec![0x01]);
        assert_eq!(completions, 0);
        assert_eq!(decode_to_vec(&[0x01, ESC, 0x42, END]), vec![0x01]);
    }

    #[test]
    fn end_after_escape_is_swallowed_and_escape_stays_armed() {
        let mut decoder = SlipDecoder::new();
        assert_eq!(decoder.process_byte(ESC), None);
        assert_eq!(decoder.process_byte(END), None);
        assert!(!decoder.packet_complete());
        assert!(decoder.is_escaped());

        // A second END is swallowed too; only a valid escape code disarms it.
        assert_eq!(decoder.process_byte(END), None);
        assert!(!decoder.packet_complete());
        assert_eq!(decoder.process_byte(ESC_ESC), Some(ESC));
        assert_eq!(decoder.process_byte(END), None);
        assert!(decoder.packet_complete());
    }

    #[test]
    fn bulk_decode_matches_incremental_on_escaped_end() {
        let wire = [0x10, ESC, END, ESC_END, 0x20, END, 0x30];
        let mut out = BytesMut::new();
        let consumed = decode(&wire, &mut out);
        assert_eq!(consumed, 6);
        assert_eq!(out.as_ref(), &[0x10, END, 0x20]);
    }

    #[test]
    fn arbitrary_payload_roundtrip() {
        let payload: Vec<u8> = (0..1024u32).map(|i| (i * 37 % 256) as u8).collect();
        let encoded = encode_to_vec(&payload);
        assert!(encoded.len() <= max_encoded_len(payload.len()));
        assert_eq!(decode_to_vec(&encoded), payload);
        assert_eq!(decode_piecemeal(&encoded), (payload, 1));
    }
}
