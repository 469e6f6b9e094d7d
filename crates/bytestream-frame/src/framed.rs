//! `tokio-util` codec adapter (requires the `async` feature).

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::assembler::PacketAssembler;
use crate::codec::{encode_frame, FrameConfig};
use crate::error::{FrameError, Result};

/// COBS/SLIP codec for `FramedRead` / `FramedWrite`.
///
/// Decoding consumes the read buffer byte by byte through the same
/// incremental state machine as the blocking [`FrameReader`](crate::FrameReader),
/// so no input is ever rescanned.
#[derive(Debug)]
pub struct FrameCodec {
    assembler: PacketAssembler,
    config: FrameConfig,
}

impl FrameCodec {
    /// Create a codec with explicit configuration.
    pub fn new(config: FrameConfig) -> Self {
        Self {
            assembler: PacketAssembler::with_max_payload(config.mode, config.max_payload_size),
            config,
        }
    }

    /// Current codec configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        while src.has_remaining() {
            let byte = src.get_u8();
            if let Some(frame) = self.assembler.push(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if self.assembler.pending().is_empty() {
            Ok(None)
        } else {
            Err(FrameError::ConnectionClosed)
        }
    }
}

impl<T: AsRef<[u8]>> Encoder<T> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<()> {
        let payload = item.as_ref();
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }
        encode_frame(self.config.mode, payload, dst);
        Ok(())
    }
}
