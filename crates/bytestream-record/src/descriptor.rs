//! Field type tokens: `u16`, `f32[4]`, `u8[]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};
use crate::primitive::PrimitiveKind;

/// Largest encoded size of a fixed-length array field, in bytes (16 MiB).
///
/// Fixed fields are allocated in full when a record is built, so larger
/// lengths are rejected at parse time. Variable fields are not capped here.
pub const MAX_FIXED_SIZE: usize = 16 * 1024 * 1024;

/// How many elements a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly one element, written `T`.
    Scalar,
    /// Exactly `n > 0` elements, written `T[n]`.
    Fixed(usize),
    /// Any number of elements, written `T[]`. Serialized with a count prefix.
    Variable,
}

/// Parsed type token.
///
/// `Fixed(1)` and `Scalar` occupy the same bytes on the wire but stay
/// distinct so that every descriptor prints back to the token it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeDescriptor {
    kind: PrimitiveKind,
    arity: Arity,
}

impl TypeDescriptor {
    pub const fn scalar(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            arity: Arity::Scalar,
        }
    }

    pub const fn variable(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            arity: Arity::Variable,
        }
    }

    /// Fixed-length array descriptor. `len` must be non-zero and the array
    /// no larger than [`MAX_FIXED_SIZE`] bytes.
    pub fn fixed(kind: PrimitiveKind, len: usize) -> Result<Self> {
        check_fixed_len(kind, len).map_err(|reason| RecordError::Parse {
            token: format!("{kind}[{len}]"),
            reason,
        })?;
        Ok(Self {
            kind,
            arity: Arity::Fixed(len),
        })
    }

    /// Parse a single type token such as `u16`, `f32[4]` or `u8[]`.
    pub fn parse(token: &str) -> Result<Self> {
        let err = |reason| RecordError::Parse {
            token: token.to_string(),
            reason,
        };

        let Some(open) = token.find('[') else {
            return token.parse::<PrimitiveKind>().map(Self::scalar);
        };

        let kind = token[..open]
            .parse::<PrimitiveKind>()
            .map_err(|_| err("unknown primitive type"))?;
        let inner = token[open + 1..]
            .strip_suffix(']')
            .ok_or_else(|| err("missing closing bracket"))?;

        if inner.is_empty() {
            return Ok(Self::variable(kind));
        }
        if !inner.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("array length must be decimal digits"));
        }

        let len = inner
            .parse::<usize>()
            .map_err(|_| err("array length out of range"))?;
        check_fixed_len(kind, len).map_err(err)?;

        Ok(Self {
            kind,
            arity: Arity::Fixed(len),
        })
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_variable(&self) -> bool {
        self.arity == Arity::Variable
    }

    /// Element count when it is known up front.
    pub fn fixed_len(&self) -> Option<usize> {
        match self.arity {
            Arity::Scalar => Some(1),
            Arity::Fixed(n) => Some(n),
            Arity::Variable => None,
        }
    }

    /// Encoded size of the elements, or `None` for variable fields whose
    /// size depends on the data.
    pub fn size_bytes(&self) -> Option<usize> {
        self.fixed_len()
            .and_then(|n| n.checked_mul(self.kind.width()))
    }
}

fn check_fixed_len(kind: PrimitiveKind, len: usize) -> std::result::Result<(), &'static str> {
    if len == 0 {
        return Err("array length must be greater than zero");
    }
    match len.checked_mul(kind.width()) {
        Some(size) if size <= MAX_FIXED_SIZE => Ok(()),
        _ => Err("array length out of range"),
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Arity::Scalar => write!(f, "{}", self.kind),
            Arity::Fixed(n) => write!(f, "{}[{n}]", self.kind),
            Arity::Variable => write!(f, "{}[]", self.kind),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TypeDescriptor> for String {
    fn from(value: TypeDescriptor) -> Self {
        value.to_string()
    }
}
