/// Errors that can occur while building, loading or (de)serializing records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A type token does not match the type grammar.
    #[error("invalid type token {token:?}: {reason}")]
    Parse { token: String, reason: &'static str },

    /// A load source cannot be converted into the buffer.
    #[error("unsupported conversion: {0}")]
    Conversion(String),

    /// The input ran out before a field was fully read.
    #[error("truncated record: field {field} needs {needed} bytes, {available} available")]
    Truncated {
        field: usize,
        needed: usize,
        available: usize,
    },

    /// A variable-length field is too long for its element count prefix.
    #[error("field {field} holds {len} elements, more than a u32 count prefix can describe")]
    LengthOverflow { field: usize, len: usize },

    /// A load addressed a field the record does not have.
    #[error("no field at index {index} (record has {len} fields)")]
    FieldIndex { index: usize, len: usize },

    /// A record must have at least one field.
    #[error("record needs at least one field")]
    EmptyRecord,

    /// The byte order name is not recognized.
    #[error("unknown byte order {0:?} (expected big, little, network or native)")]
    UnknownByteOrder(String),

    /// A record layout could not be loaded.
    #[error("invalid record layout: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, RecordError>;
