//! Typed element storage for one record field.

use crate::atom::Atom;
use crate::descriptor::{Arity, TypeDescriptor};
use crate::element::Element;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::primitive::PrimitiveKind;

/// Elements of a field, one variant per primitive kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Run `$body` with `$v` bound to the inner `Vec` of a [`BufferData`].
macro_rules! with_data {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            BufferData::U8($v) => $body,
            BufferData::I8($v) => $body,
            BufferData::U16($v) => $body,
            BufferData::I16($v) => $body,
            BufferData::U32($v) => $body,
            BufferData::I32($v) => $body,
            BufferData::U64($v) => $body,
            BufferData::I64($v) => $body,
            BufferData::F32($v) => $body,
            BufferData::F64($v) => $body,
        }
    };
}

pub(crate) use with_data;

impl BufferData {
    /// `len` default-valued elements of `kind`.
    pub fn zeroed(kind: PrimitiveKind, len: usize) -> Self {
        match kind {
            PrimitiveKind::U8 => BufferData::U8(vec![0; len]),
            PrimitiveKind::I8 => BufferData::I8(vec![0; len]),
            PrimitiveKind::U16 => BufferData::U16(vec![0; len]),
            PrimitiveKind::I16 => BufferData::I16(vec![0; len]),
            PrimitiveKind::U32 => BufferData::U32(vec![0; len]),
            PrimitiveKind::I32 => BufferData::I32(vec![0; len]),
            PrimitiveKind::U64 => BufferData::U64(vec![0; len]),
            PrimitiveKind::I64 => BufferData::I64(vec![0; len]),
            PrimitiveKind::F32 => BufferData::F32(vec![0.0; len]),
            PrimitiveKind::F64 => BufferData::F64(vec![0.0; len]),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            BufferData::U8(_) => PrimitiveKind::U8,
            BufferData::I8(_) => PrimitiveKind::I8,
            BufferData::U16(_) => PrimitiveKind::U16,
            BufferData::I16(_) => PrimitiveKind::I16,
            BufferData::U32(_) => PrimitiveKind::U32,
            BufferData::I32(_) => PrimitiveKind::I32,
            BufferData::U64(_) => PrimitiveKind::U64,
            BufferData::I64(_) => PrimitiveKind::I64,
            BufferData::F32(_) => PrimitiveKind::F32,
            BufferData::F64(_) => PrimitiveKind::F64,
        }
    }

    pub fn len(&self) -> usize {
        with_data!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a load takes its values from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Scalar(Atom),
    Atoms(&'a [Atom]),
    Matrix(&'a Matrix),
}

impl From<Atom> for Source<'_> {
    fn from(value: Atom) -> Self {
        Source::Scalar(value)
    }
}

impl From<i64> for Source<'_> {
    fn from(value: i64) -> Self {
        Source::Scalar(Atom::Int(value))
    }
}

impl From<f64> for Source<'_> {
    fn from(value: f64) -> Self {
        Source::Scalar(Atom::Float(value))
    }
}

impl<'a> From<&'a [Atom]> for Source<'a> {
    fn from(value: &'a [Atom]) -> Self {
        Source::Atoms(value)
    }
}

impl<'a> From<&'a Vec<Atom>> for Source<'a> {
    fn from(value: &'a Vec<Atom>) -> Self {
        Source::Atoms(value)
    }
}

impl<'a, const N: usize> From<&'a [Atom; N]> for Source<'a> {
    fn from(value: &'a [Atom; N]) -> Self {
        Source::Atoms(value)
    }
}

impl<'a> From<&'a Matrix> for Source<'a> {
    fn from(value: &'a Matrix) -> Self {
        Source::Matrix(value)
    }
}

/// Storage for one field, shaped by its [`TypeDescriptor`].
///
/// Scalar and fixed fields always hold exactly their declared element
/// count; only variable fields change length.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBuffer {
    descriptor: TypeDescriptor,
    data: BufferData,
}

impl TypedBuffer {
    /// Zero-filled buffer. Variable fields start empty.
    pub fn new(descriptor: TypeDescriptor) -> Self {
        let len = descriptor.fixed_len().unwrap_or(0);
        Self {
            descriptor,
            data: BufferData::zeroed(descriptor.kind(), len),
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.descriptor.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &BufferData {
        &self.data
    }

    /// Encoded size of the current elements, excluding any count prefix.
    pub fn payload_len(&self) -> usize {
        self.len() * self.kind().width()
    }

    /// Load from any [`Source`].
    pub fn load<'a>(&mut self, source: impl Into<Source<'a>>) -> Result<()> {
        match source.into() {
            Source::Scalar(atom) => {
                self.load_scalar(atom);
                Ok(())
            }
            Source::Atoms(atoms) => {
                self.load_atoms(atoms);
                Ok(())
            }
            Source::Matrix(matrix) => self.load_matrix(matrix),
        }
    }

    /// Overwrite the first element. A variable field is resized to one
    /// element first; the rest of a fixed field is left as it was.
    pub fn load_scalar(&mut self, atom: impl Into<Atom>) {
        let atom = atom.into();
        let variable = self.descriptor.is_variable();
        with_data!(&mut self.data, v => store_scalar(v, variable, atom));
    }

    /// Copy a sequence. A variable field takes the sequence's length; a
    /// fixed field takes as many leading values as fit and keeps the rest.
    pub fn load_atoms(&mut self, atoms: &[Atom]) {
        let variable = self.descriptor.is_variable();
        with_data!(&mut self.data, v => store_all(v, variable, atoms.iter().copied()));
    }

    /// Copy a one- or two-dimensional matrix row by row, with the same
    /// sizing rules as [`load_atoms`](Self::load_atoms).
    ///
    /// Fails without touching the buffer if the matrix shape is unsupported.
    pub fn load_matrix(&mut self, matrix: &Matrix) -> Result<()> {
        matrix.validate()?;
        let variable = self.descriptor.is_variable();
        with_data!(&mut self.data, v => store_all(v, variable, matrix.atoms()));
        Ok(())
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<Atom> {
        with_data!(&self.data, v => v.get(index).map(|x| x.to_atom()))
    }

    /// All elements in order.
    pub fn to_atoms(&self) -> Vec<Atom> {
        with_data!(&self.data, v => v.iter().map(|x| x.to_atom()).collect())
    }

    /// Swap in freshly decoded elements of the same kind and shape.
    pub(crate) fn replace_data(&mut self, data: BufferData) {
        debug_assert_eq!(data.kind(), self.kind());
        debug_assert!(match self.descriptor.arity() {
            Arity::Variable => true,
            _ => Some(data.len()) == self.descriptor.fixed_len(),
        });
        self.data = data;
    }
}

fn store_scalar<T: Element>(values: &mut Vec<T>, variable: bool, atom: Atom) {
    if variable {
        values.resize(1, T::default());
    }
    if let Some(first) = values.first_mut() {
        *first = T::from_atom(atom);
    }
}

fn store_all<T: Element>(values: &mut Vec<T>, variable: bool, atoms: impl Iterator<Item = Atom>) {
    if variable {
        values.clear();
        values.extend(atoms.map(T::from_atom));
    } else {
        for (slot, atom) in values.iter_mut().zip(atoms) {
            *slot = T::from_atom(atom);
        }
    }
}
