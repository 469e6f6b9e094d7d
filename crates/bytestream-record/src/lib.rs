//! Typed binary records.
//!
//! A record is an ordered list of fields, each declared by a compact type
//! token (`u16`, `f32[4]`, `u8[]`). Fields are filled from numeric atoms or
//! small matrices and encoded to bytes under a chosen byte order.

pub mod atom;
pub mod buffer;
pub mod codec;
pub mod descriptor;
mod element;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod primitive;
pub mod record;

pub use atom::Atom;
pub use buffer::{BufferData, Source, TypedBuffer};
pub use codec::{deserialize, serialize, to_bytes, ByteOrder, COUNT_PREFIX_LEN};
pub use descriptor::{Arity, TypeDescriptor, MAX_FIXED_SIZE};
pub use error::{RecordError, Result};
pub use layout::RecordLayout;
pub use matrix::{Matrix, MatrixData};
pub use primitive::PrimitiveKind;
pub use record::Record;
