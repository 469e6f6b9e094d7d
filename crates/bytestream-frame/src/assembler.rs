use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{FrameDecoder, FrameMode, DEFAULT_MAX_PAYLOAD};
use crate::decoder::ByteDecoder;
use crate::error::{FrameError, Result};

/// Collects decoded bytes into whole packets.
///
/// Drives a [`FrameDecoder`] one byte at a time and hands back each payload
/// as soon as its delimiter arrives. The decoder resets itself on the byte
/// after a delimiter, so the assembler never resets it between frames.
#[derive(Debug)]
pub struct PacketAssembler {
    decoder: FrameDecoder,
    buf: BytesMut,
    max_payload: usize,
    discarding: bool,
}

impl PacketAssembler {
    /// Create an assembler with the default payload limit.
    pub fn new(mode: FrameMode) -> Self {
        Self::with_max_payload(mode, DEFAULT_MAX_PAYLOAD)
    }

    /// Create an assembler with an explicit payload limit.
    pub fn with_max_payload(mode: FrameMode, max_payload: usize) -> Self {
        Self {
            decoder: mode.decoder(),
            buf: BytesMut::new(),
            max_payload,
            discarding: false,
        }
    }

    /// Feed one wire byte.
    ///
    /// Returns the payload when `byte` completes a frame. A payload that
    /// grows past the limit is reported once with
    /// [`FrameError::PayloadTooLarge`]; the rest of that frame is dropped and
    /// assembly resumes after its delimiter.
    pub fn push(&mut self, byte: u8) -> Result<Option<Bytes>> {
        if let Some(decoded) = self.decoder.process_byte(byte) {
            if !self.discarding {
                if self.buf.len() >= self.max_payload {
                    self.discarding = true;
                    self.buf.clear();
                    return Err(FrameError::PayloadTooLarge {
                        size: self.max_payload + 1,
                        max: self.max_payload,
                    });
                }
                self.buf.put_u8(decoded);
            }
        }

        if !self.decoder.packet_complete() {
            return Ok(None);
        }

        if self.discarding {
            self.discarding = false;
            tracing::debug!(mode = %self.mode(), "dropped oversized frame");
            return Ok(None);
        }

        Ok(Some(self.buf.split().freeze()))
    }

    /// Feed a slice of wire bytes, appending every completed payload to `frames`.
    ///
    /// Stops at the first error; bytes after the offending one are not fed.
    pub fn push_slice(&mut self, input: &[u8], frames: &mut Vec<Bytes>) -> Result<()> {
        for &byte in input {
            if let Some(frame) = self.push(byte)? {
                frames.push(frame);
            }
        }
        Ok(())
    }

    /// Decoded bytes of the frame currently being assembled.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// The framing mode in use.
    pub fn mode(&self) -> FrameMode {
        self.decoder.mode()
    }

    /// Update the payload limit for subsequent bytes.
    pub fn set_max_payload(&mut self, max_payload: usize) {
        self.max_payload = max_payload;
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.buf.clear();
        self.discarding = false;
    }
}
