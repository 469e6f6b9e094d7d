//! Binary record encoding.
//!
//! Fields are written back to back in declaration order. Scalar and fixed
//! fields carry only their elements; variable fields are preceded by a `u32`
//! element count in the same byte order as the elements.

use std::fmt;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::buffer::{with_data, BufferData};
use crate::descriptor::{Arity, TypeDescriptor};
use crate::element::Element;
use crate::error::{RecordError, Result};
use crate::primitive::PrimitiveKind;
use crate::record::Record;

/// Width of the element count written before variable fields.
pub const COUNT_PREFIX_LEN: usize = 4;

/// Byte order policy for encoding and decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
    /// Network byte order, same as [`ByteOrder::Big`].
    Network,
    /// Whatever the host uses.
    #[default]
    Native,
}

impl ByteOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            ByteOrder::Big => "big",
            ByteOrder::Little => "little",
            ByteOrder::Network => "network",
            ByteOrder::Native => "native",
        }
    }

    pub fn is_big_endian(self) -> bool {
        match self {
            ByteOrder::Big | ByteOrder::Network => true,
            ByteOrder::Little => false,
            ByteOrder::Native => cfg!(target_endian = "big"),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ByteOrder {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" => Ok(ByteOrder::Big),
            "little" => Ok(ByteOrder::Little),
            "network" => Ok(ByteOrder::Network),
            "native" => Ok(ByteOrder::Native),
            _ => Err(RecordError::UnknownByteOrder(s.to_string())),
        }
    }
}

/// Append the encoding of `record` to `dst`.
///
/// Nothing is written if a variable field is too long for its count prefix.
pub fn serialize(record: &Record, order: ByteOrder, dst: &mut BytesMut) -> Result<()> {
    let mut total = 0usize;
    for (index, field) in record.fields().iter().enumerate() {
        if field.descriptor().is_variable() {
            if u32::try_from(field.len()).is_err() {
                return Err(RecordError::LengthOverflow {
                    field: index,
                    len: field.len(),
                });
            }
            total += COUNT_PREFIX_LEN;
        }
        total += field.payload_len();
    }

    let big = order.is_big_endian();
    dst.reserve(total);
    for field in record.fields() {
        if field.descriptor().is_variable() {
            (field.len() as u32).write(big, dst);
        }
        with_data!(field.data(), values => {
            for &value in values {
                value.write(big, dst);
            }
        });
    }
    Ok(())
}

/// Encode `record` into a fresh buffer.
pub fn to_bytes(record: &Record, order: ByteOrder) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    serialize(record, order, &mut dst)?;
    Ok(dst.freeze())
}

/// Decode `src` into `record`, returning the number of bytes consumed.
///
/// The record is only updated once every field has decoded; on error it
/// keeps its previous contents. Bytes after the last field are left unread.
pub fn deserialize(record: &mut Record, src: &[u8], order: ByteOrder) -> Result<usize> {
    let big = order.is_big_endian();
    let mut offset = 0usize;
    let mut decoded = Vec::with_capacity(record.len());

    for (index, field) in record.fields().iter().enumerate() {
        let (data, used) = decode_field(index, field.descriptor(), &src[offset..], big)?;
        offset += used;
        decoded.push(data);
    }

    for (field, data) in record.fields_mut().iter_mut().zip(decoded) {
        field.replace_data(data);
    }

    if offset < src.len() {
        tracing::debug!(
            consumed = offset,
            trailing = src.len() - offset,
            "ignoring bytes after record"
        );
    }
    Ok(offset)
}

fn decode_field(
    index: usize,
    descriptor: TypeDescriptor,
    src: &[u8],
    big: bool,
) -> Result<(BufferData, usize)> {
    let truncated = |needed: usize| RecordError::Truncated {
        field: index,
        needed,
        available: src.len(),
    };

    let (count, start) = match descriptor.arity() {
        Arity::Scalar => (1, 0),
        Arity::Fixed(n) => (n, 0),
        Arity::Variable => {
            if src.len() < COUNT_PREFIX_LEN {
                return Err(truncated(COUNT_PREFIX_LEN));
            }
            (u32::read(src, big) as usize, COUNT_PREFIX_LEN)
        }
    };

    // Checked before allocating so a bogus count cannot reserve memory.
    let end = count
        .checked_mul(descriptor.kind().width())
        .and_then(|len| len.checked_add(start))
        .ok_or_else(|| truncated(usize::MAX))?;
    if src.len() < end {
        return Err(truncated(end));
    }

    Ok((read_elements(descriptor.kind(), &src[start..end], big), end))
}

fn read_elements(kind: PrimitiveKind, src: &[u8], big: bool) -> BufferData {
    match kind {
        PrimitiveKind::U8 => BufferData::U8(read_all(src, big)),
        PrimitiveKind::I8 => BufferData::I8(read_all(src, big)),
        PrimitiveKind::U16 => BufferData::U16(read_all(src, big)),
        PrimitiveKind::I16 => BufferData::I16(read_all(src, big)),
        PrimitiveKind::U32 => BufferData::U32(read_all(src, big)),
        PrimitiveKind::I32 => BufferData::I32(read_all(src, big)),
        PrimitiveKind::U64 => BufferData::U64(read_all(src, big)),
        PrimitiveKind::I64 => BufferData::I64(read_all(src, big)),
        PrimitiveKind::F32 => BufferData::F32(read_all(src, big)),
        PrimitiveKind::F64 => BufferData::F64(read_all(src, big)),
    }
}

fn read_all<T: Element>(src: &[u8], big: bool) -> Vec<T> {
    src.chunks_exact(T::WIDTH)
        .map(|chunk| T::read(chunk, big))
        .collect()
}
