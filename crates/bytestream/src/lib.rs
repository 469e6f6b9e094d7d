//! COBS/SLIP stream framing and typed binary records.
//!
//! # Crate Structure
//!
//! - [`frame`]: COBS and SLIP codecs, incremental decoders and stream framing
//! - [`record`]: Type tokens, typed field buffers and binary record encoding
//!
//! A typical pipeline builds a [`record::Record`], encodes it under a
//! [`record::ByteOrder`] and wraps the bytes in a frame:
//!
//! ```
//! use bytestream::frame::{encode_frame, FrameMode};
//! use bytestream::record::{Atom, ByteOrder, Record};
//!
//! let mut record = Record::parse(["u16", "u8[]"]).unwrap();
//! record.load(0, Atom::Int(300)).unwrap();
//! record.load(1, &[Atom::Int(1), Atom::Int(2), Atom::Int(3)]).unwrap();
//!
//! let payload = record.to_bytes(ByteOrder::Little).unwrap();
//! let mut wire = bytes::BytesMut::new();
//! encode_frame(FrameMode::Slip, &payload, &mut wire);
//! assert_eq!(wire.last(), Some(&0xC0));
//! ```

/// Re-export frame types.
pub mod frame {
    pub use bytestream_frame::*;
}

/// Re-export record types.
pub mod record {
    pub use bytestream_record::*;
}
