use std::fmt;
use std::str::FromStr;

use crate::error::{RecordError, Result};

/// Element type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Every kind, in grammar order.
    pub const ALL: [PrimitiveKind; 10] = [
        PrimitiveKind::U8,
        PrimitiveKind::I8,
        PrimitiveKind::U16,
        PrimitiveKind::I16,
        PrimitiveKind::U32,
        PrimitiveKind::I32,
        PrimitiveKind::U64,
        PrimitiveKind::I64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
    ];

    /// Size in bytes of a single element.
    pub const fn width(self) -> usize {
        match self {
            PrimitiveKind::U8 | PrimitiveKind::I8 => 1,
            PrimitiveKind::U16 | PrimitiveKind::I16 => 2,
            PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::U64 | PrimitiveKind::I64 | PrimitiveKind::F64 => 8,
        }
    }

    /// Whether elements are floating point.
    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }

    /// Name as written in type tokens.
    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = RecordError;

    /// Case-sensitive: `U8` is not a kind.
    fn from_str(s: &str) -> Result<Self> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RecordError::Parse {
                token: s.to_string(),
                reason: "unknown primitive type",
            })
    }
}
