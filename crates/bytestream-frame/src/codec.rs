use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::cobs::{self, CobsDecoder};
use crate::decoder::ByteDecoder;
use crate::error::{FrameError, Result};
use crate::slip::{self, SlipDecoder};

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Byte-stuffing scheme used to delimit frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrameMode {
    /// Consistent Overhead Byte Stuffing, `0x00` delimited.
    #[default]
    Cobs,
    /// Serial Line IP, `0xC0` delimited.
    Slip,
}

impl FrameMode {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            FrameMode::Cobs => "cobs",
            FrameMode::Slip => "slip",
        }
    }

    /// The byte that terminates every frame on the wire.
    pub fn delimiter(self) -> u8 {
        match self {
            FrameMode::Cobs => cobs::DELIMITER,
            FrameMode::Slip => slip::END,
        }
    }

    /// Worst-case encoded size for a payload of `len` bytes.
    pub fn max_encoded_len(self, len: usize) -> usize {
        match self {
            FrameMode::Cobs => cobs::max_encoded_len(len),
            FrameMode::Slip => slip::max_encoded_len(len),
        }
    }

    /// A fresh incremental decoder for this mode.
    pub fn decoder(self) -> FrameDecoder {
        match self {
            FrameMode::Cobs => FrameDecoder::Cobs(CobsDecoder::new()),
            FrameMode::Slip => FrameDecoder::Slip(SlipDecoder::new()),
        }
    }
}

impl fmt::Display for FrameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameMode {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cobs" => Ok(FrameMode::Cobs),
            "slip" => Ok(FrameMode::Slip),
            _ => Err(FrameError::UnknownMode(s.to_string())),
        }
    }
}

/// Incremental decoder for either framing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecoder {
    Cobs(CobsDecoder),
    Slip(SlipDecoder),
}

impl FrameDecoder {
    /// The mode this decoder understands.
    pub fn mode(&self) -> FrameMode {
        match self {
            FrameDecoder::Cobs(_) => FrameMode::Cobs,
            FrameDecoder::Slip(_) => FrameMode::Slip,
        }
    }
}

impl ByteDecoder for FrameDecoder {
    fn process_byte(&mut self, byte: u8) -> Option<u8> {
        match self {
            FrameDecoder::Cobs(decoder) => decoder.process_byte(byte),
            FrameDecoder::Slip(decoder) => decoder.process_byte(byte),
        }
    }

    fn packet_complete(&self) -> bool {
        match self {
            FrameDecoder::Cobs(decoder) => decoder.packet_complete(),
            FrameDecoder::Slip(decoder) => decoder.packet_complete(),
        }
    }

    fn reset(&mut self) {
        match self {
            FrameDecoder::Cobs(decoder) => decoder.reset(),
            FrameDecoder::Slip(decoder) => decoder.reset(),
        }
    }
}

/// Encode one payload as a frame, appending to `dst`.
pub fn encode_frame(mode: FrameMode, payload: &[u8], dst: &mut BytesMut) {
    match mode {
        FrameMode::Cobs => cobs::encode(payload, dst),
        FrameMode::Slip => slip::encode(payload, dst),
    }
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes (delimiter included) from the buffer.
///
/// This function keeps no state between calls. Buffers without a delimiter
/// are only scanned for the delimiter byte, but every call that finds one
/// decodes from the start of `src` again. Use [`PacketAssembler`] or
/// `FrameCodec` to decode a slowly filling stream.
///
/// # Oversized frames
///
/// A delimited frame whose payload is over `max_payload` is consumed and
/// reported. When `src` holds more than `max_encoded_len(max_payload)` bytes
/// and no delimiter, the whole buffer is discarded and reported, so the next
/// call starts on fresh input. The rest of that frame is then returned as a
/// payload of its own once its delimiter arrives.
///
/// [`PacketAssembler`]: crate::PacketAssembler
pub fn decode_frame(mode: FrameMode, src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let max_wire = mode.max_encoded_len(max_payload);
    if src.len() <= max_wire && !src.contains(&mode.delimiter()) {
        return Ok(None); // Need more data
    }

    let mut decoder = mode.decoder();
    let mut payload = BytesMut::new();
    let mut consumed = None;

    for (index, &byte) in src.iter().enumerate() {
        if let Some(out) = decoder.process_byte(byte) {
            payload.put_u8(out);
        }
        if decoder.packet_complete() {
            consumed = Some(index + 1);
            break;
        }
    }

    let consumed = match consumed {
        Some(consumed) => consumed,
        None if src.len() <= max_wire => return Ok(None),
        None => {
            tracing::debug!(mode = %mode, wire = src.len(), "discarding undelimited oversized input");
            src.clear();
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: max_payload,
            });
        }
    };

    src.advance(consumed);
    if payload.len() > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: max_payload,
        });
    }

    tracing::trace!(mode = %mode, wire = consumed, size = payload.len(), "decoded frame");
    Ok(Some(payload.freeze()))
}

/// Configuration for stream framing.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Framing scheme. Default: COBS.
    pub mode: FrameMode,
    /// Maximum decoded payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            mode: FrameMode::default(),
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl FrameConfig {
    /// Default configuration for the given mode.
    pub fn with_mode(mode: FrameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
