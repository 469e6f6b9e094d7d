use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// A single numeric value crossing the record boundary.
///
/// Serializes untagged, so JSON sees plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    Int(i64),
    Float(f64),
}

impl Atom {
    pub fn is_float(&self) -> bool {
        matches!(self, Atom::Float(_))
    }

    /// Value as `i64`, truncating floats toward zero.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Atom::Int(v) => v,
            Atom::Float(v) => v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Atom::Int(v) => v as f64,
            Atom::Float(v) => v,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(v) => write!(f, "{v}"),
            // `{:?}` keeps the decimal point on whole floats.
            Atom::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl FromStr for Atom {
    type Err = RecordError;

    /// Integers first, then floats. `0x` prefixes are accepted for integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if let Some(hex) = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            if hex.starts_with(['+', '-']) {
                return Err(RecordError::Conversion(format!("{s:?} is not a number")));
            }
            let value = u64::from_str_radix(hex, 16)
                .map_err(|err| RecordError::Conversion(format!("{s:?}: {err}")))?
                as i64;
            return Ok(Atom::Int(if negative { value.wrapping_neg() } else { value }));
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Atom::Int(value));
        }
        // Whole numbers beyond i64 keep their bit pattern when they fit in u64.
        if let Ok(value) = trimmed.parse::<u64>() {
            return Ok(Atom::Int(value as i64));
        }
        trimmed
            .parse::<f64>()
            .map(Atom::Float)
            .map_err(|_| RecordError::Conversion(format!("{s:?} is not a number")))
    }
}

macro_rules! atom_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Atom {
                fn from(value: $t) -> Self {
                    Atom::$variant(value as $target)
                }
            }
        )*
    };
}

atom_from!(Int as i64: u8, i8, u16, i16, u32, i32, i64, u64);
atom_from!(Float as f64: f32, f64);
