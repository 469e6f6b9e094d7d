//! Self-synchronising byte-stream framing.
//!
//! Two byte-stuffing schemes delimit variable-length messages inside a
//! continuous byte stream:
//! - [`cobs`]: Consistent Overhead Byte Stuffing, frames end in `0x00`
//! - [`slip`]: Serial Line IP, frames end in `0xC0`
//!
//! Each scheme offers bulk encode/decode over buffers and an incremental
//! [`ByteDecoder`] that consumes one byte per call, for poll- or
//! interrupt-driven input. [`FrameReader`] / [`FrameWriter`] adapt either
//! scheme to `std::io` streams; `FrameCodec` (feature `async`) adapts it to
//! `tokio-util`.

pub mod assembler;
pub mod cobs;
pub mod codec;
pub mod decoder;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod reader;
pub mod slip;
pub mod writer;

pub use assembler::PacketAssembler;
pub use cobs::CobsDecoder;
pub use codec::{
    decode_frame, encode_frame, FrameConfig, FrameDecoder, FrameMode, DEFAULT_MAX_PAYLOAD,
};
pub use decoder::ByteDecoder;
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use framed::FrameCodec;
pub use reader::FrameReader;
pub use slip::SlipDecoder;
pub use writer::FrameWriter;
