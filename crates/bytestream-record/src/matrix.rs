use crate::atom::Atom;
use crate::error::{RecordError, Result};

/// Element storage of a [`Matrix`].
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl MatrixData {
    pub fn len(&self) -> usize {
        match self {
            MatrixData::U8(v) => v.len(),
            MatrixData::I32(v) => v.len(),
            MatrixData::F32(v) => v.len(),
            MatrixData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // `index` must be below `len()`.
    fn atom(&self, index: usize) -> Atom {
        match self {
            MatrixData::U8(v) => Atom::from(v[index]),
            MatrixData::I32(v) => Atom::from(v[index]),
            MatrixData::F32(v) => Atom::from(v[index]),
            MatrixData::F64(v) => Atom::from(v[index]),
        }
    }
}

/// Dense row-major matrix used as a load source.
///
/// Only one- and two-dimensional shapes can be loaded into a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dims: Vec<usize>,
    data: MatrixData,
}

impl Matrix {
    /// Build a matrix. The shape is checked when it is loaded, not here.
    pub fn new(dims: impl Into<Vec<usize>>, data: MatrixData) -> Self {
        Self {
            dims: dims.into(),
            data,
        }
    }

    /// Two-dimensional matrix from row-major data.
    pub fn from_rows(rows: usize, cols: usize, data: MatrixData) -> Self {
        Self::new(vec![rows, cols], data)
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.dims.is_empty() || self.dims.len() > 2 {
            return Err(RecordError::Conversion(format!(
                "{}-dimensional matrices are not supported",
                self.dims.len()
            )));
        }
        let expected = self
            .dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d));
        if expected != Some(self.data.len()) {
            return Err(RecordError::Conversion(format!(
                "matrix shape {:?} does not match {} elements",
                self.dims,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Elements flattened row by row.
    pub fn atoms(&self) -> impl ExactSizeIterator<Item = Atom> + '_ {
        (0..self.data.len()).map(|i| self.data.atom(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_shape() {
        let ok = Matrix::from_rows(2, 3, MatrixData::I32(vec![1, 2, 3, 4, 5, 6]));
        assert!(ok.validate().is_ok());

        let column = Matrix::new(vec![4], MatrixData::U8(vec![1, 2, 3, 4]));
        assert!(column.validate().is_ok());

        let cube = Matrix::new(vec![2, 2, 2], MatrixData::F32(vec![0.0; 8]));
        assert!(matches!(cube.validate(), Err(RecordError::Conversion(_))));

        let short = Matrix::from_rows(2, 2, MatrixData::F64(vec![1.0]));
        assert!(matches!(short.validate(), Err(RecordError::Conversion(_))));
    }

    #[test]
    fn flattens_row_major() {
        let m = Matrix::from_rows(2, 2, MatrixData::U8(vec![1, 2, 3, 4]));
        let atoms: Vec<Atom> = m.atoms().collect();
        assert_eq!(
            atoms,
            vec![Atom::Int(1), Atom::Int(2), Atom::Int(3), Atom::Int(4)]
        );
    }
}
