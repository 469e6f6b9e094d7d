use std::fmt;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};

use crate::atom::Atom;
use crate::buffer::{Source, TypedBuffer};
use crate::codec::{self, ByteOrder, COUNT_PREFIX_LEN};
use crate::descriptor::TypeDescriptor;
use crate::error::{RecordError, Result};

/// An ordered, non-empty set of typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<TypedBuffer>,
}

impl Record {
    /// Build a zero-filled record from descriptors.
    pub fn new(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self> {
        let fields: Vec<TypedBuffer> = descriptors.into_iter().map(TypedBuffer::new).collect();
        if fields.is_empty() {
            return Err(RecordError::EmptyRecord);
        }
        Ok(Self { fields })
    }

    /// Build a record from type tokens. Fails on the first bad token.
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let descriptors = tokens
            .into_iter()
            .map(|token| TypeDescriptor::parse(token.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let record = Self::new(descriptors)?;
        tracing::trace!(layout = %record, "built record");
        Ok(record)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[TypedBuffer] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [TypedBuffer] {
        &mut self.fields
    }

    pub fn field(&self, index: usize) -> Option<&TypedBuffer> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut TypedBuffer> {
        self.fields.get_mut(index)
    }

    pub fn descriptors(&self) -> Vec<TypeDescriptor> {
        self.fields.iter().map(TypedBuffer::descriptor).collect()
    }

    /// Load field `index` from `source`.
    pub fn load<'a>(&mut self, index: usize, source: impl Into<Source<'a>>) -> Result<()> {
        let len = self.fields.len();
        self.fields
            .get_mut(index)
            .ok_or(RecordError::FieldIndex { index, len })?
            .load(source)
    }

    /// Every field's elements, in field order.
    pub fn to_atoms(&self) -> Vec<Vec<Atom>> {
        self.fields.iter().map(TypedBuffer::to_atoms).collect()
    }

    /// Smallest encoding this layout can have: fixed fields at full size
    /// and variable fields empty.
    pub fn min_encoded_len(&self) -> usize {
        self.fields
            .iter()
            .map(|field| {
                field
                    .descriptor()
                    .size_bytes()
                    .unwrap_or(COUNT_PREFIX_LEN)
            })
            .sum()
    }

    /// Size of the encoding with the current contents.
    pub fn encoded_len(&self) -> usize {
        self.fields
            .iter()
            .map(|field| {
                let prefix = if field.descriptor().is_variable() {
                    COUNT_PREFIX_LEN
                } else {
                    0
                };
                prefix + field.payload_len()
            })
            .sum()
    }

    /// Append the encoding to `dst`.
    pub fn encode(&self, order: ByteOrder, dst: &mut BytesMut) -> Result<()> {
        codec::serialize(self, order, dst)
    }

    pub fn to_bytes(&self, order: ByteOrder) -> Result<Bytes> {
        codec::to_bytes(self, order)
    }

    /// Replace the contents from `src`, returning the bytes consumed.
    /// On error the record is unchanged.
    pub fn decode(&mut self, src: &[u8], order: ByteOrder) -> Result<usize> {
        codec::deserialize(self, src, order)
    }
}

impl fmt::Display for Record {
    /// Space-separated type tokens.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", field.descriptor())?;
        }
        Ok(())
    }
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.split_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{Matrix, MatrixData};
    use crate::primitive::PrimitiveKind;

    #[test]
    fn parse_builds_fields_in_order() {
        let record = Record::parse(["u16", "f32[3]", "i8[]"]).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.field(1).unwrap().len(), 3);
        assert_eq!(record.field(2).unwrap().kind(), PrimitiveKind::I8);
        assert_eq!(record.to_string(), "u16 f32[3] i8[]");
        assert_eq!(record, "u16  f32[3]\ti8[]".parse::<Record>().unwrap());
    }

    #[test]
    fn parse_rejects_bad_or_missing_tokens() {
        let err = Record::parse(["u16", "u8[0]"]).unwrap_err();
        assert!(matches!(err, RecordError::Parse { ref token, .. } if token == "u8[0]"));

        let none: [&str; 0] = [];
        assert!(matches!(
            Record::parse(none).unwrap_err(),
            RecordError::EmptyRecord
        ));
    }

    #[test]
    fn parse_rejects_oversized_fixed_arrays() {
        let result = std::panic::catch_unwind(|| Record::parse(["u64[4611686018427387904]"]));
        let err = result.expect("parse must not panic").unwrap_err();
        assert!(matches!(
            err,
            RecordError::Parse { reason: "array length out of range", .. }
        ));

        assert!(Record::parse(["u16", "u8[10000000000]"]).is_err());
    }

    #[test]
    fn load_by_index() {
        let mut record = Record::parse(["u8", "f64[]"]).unwrap();
        record.load(0, 255i64).unwrap();
        record
            .load(1, &Matrix::from_rows(1, 2, MatrixData::F32(vec![0.5, 1.5])))
            .unwrap();

        assert_eq!(
            record.to_atoms(),
            vec![
                vec![Atom::Int(255)],
                vec![Atom::Float(0.5), Atom::Float(1.5)]
            ]
        );

        let err = record.load(2, 1i64).unwrap_err();
        assert!(matches!(err, RecordError::FieldIndex { index: 2, len: 2 }));
    }

    #[test]
    fn field_mut_loads_in_place() {
        let mut record = Record::parse(["i32[2]"]).unwrap();
        record
            .field_mut(0)
            .unwrap()
            .load_atoms(&[Atom::Int(4), Atom::Int(5)]);
        assert_eq!(record.field(0).unwrap().get(1), Some(Atom::Int(5)));
        assert!(record.field_mut(1).is_none());
    }

    #[test]
    fn encoded_lengths() {
        let mut record = Record::parse(["u16", "u8[]", "f64[2]"]).unwrap();
        assert_eq!(record.min_encoded_len(), 2 + 4 + 16);
        assert_eq!(record.encoded_len(), record.min_encoded_len());

        record.load(1, &[Atom::Int(1), Atom::Int(2)]).unwrap();
        assert_eq!(record.encoded_len(), 2 + 4 + 2 + 16);
        assert_eq!(
            record.to_bytes(ByteOrder::Little).unwrap().len(),
            record.encoded_len()
        );
    }

    #[test]
    fn decode_roundtrip() {
        let mut record = Record::parse(["i64", "u16[]"]).unwrap();
        record.load(0, -9i64).unwrap();
        record.load(1, &[Atom::Int(1), Atom::Int(65535)]).unwrap();

        let mut dst = BytesMut::new();
        record.encode(ByteOrder::Big, &mut dst).unwrap();

        let mut back = Record::parse(["i64", "u16[]"]).unwrap();
        assert_eq!(back.decode(&dst, ByteOrder::Big).unwrap(), dst.len());
        assert_eq!(back, record);
        assert_eq!(back.descriptors(), record.descriptors());
    }
}
