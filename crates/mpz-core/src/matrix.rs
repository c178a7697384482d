//! Bit matrices.

use crate::{BitError, BitVector};

/// A rectangular matrix of bits.
///
/// The matrix keeps both a row-major and a column-major view. The views are only
/// ever built together from a complete set of rows or columns, so they are always
/// transposes of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: Vec<BitVector>,
    columns: Vec<BitVector>,
}

impl BitMatrix {
    /// Creates a matrix from its rows.
    ///
    /// Returns an error if `rows` is empty or jagged.
    pub fn from_rows(rows: Vec<BitVector>) -> Result<Self, BitError> {
        let columns = columns_from_rows(&rows)?;
        Ok(Self { rows, columns })
    }

    /// Creates a matrix from its columns.
    ///
    /// Returns an error if `columns` is empty or jagged.
    pub fn from_columns(columns: Vec<BitVector>) -> Result<Self, BitError> {
        let rows = rows_from_columns(&columns)?;
        Ok(Self { rows, columns })
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the row at `index`.
    pub fn row(&self, index: usize) -> Option<&BitVector> {
        self.rows.get(index)
    }

    /// Returns the column at `index`.
    pub fn column(&self, index: usize) -> Option<&BitVector> {
        self.columns.get(index)
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[BitVector] {
        &self.rows
    }

    /// Returns the columns.
    pub fn columns(&self) -> &[BitVector] {
        &self.columns
    }

    /// Returns the transposed matrix.
    pub fn transpose(self) -> Self {
        Self {
            rows: self.columns,
            columns: self.rows,
        }
    }

    /// Returns the rows, consuming the matrix.
    pub fn into_rows(self) -> Vec<BitVector> {
        self.rows
    }

    /// Returns the columns, consuming the matrix.
    pub fn into_columns(self) -> Vec<BitVector> {
        self.columns
    }
}

/// Converts a list of row vectors into the list of column vectors.
pub fn columns_from_rows(rows: &[BitVector]) -> Result<Vec<BitVector>, BitError> {
    transpose(rows)
}

/// Converts a list of column vectors into the list of row vectors.
pub fn rows_from_columns(columns: &[BitVector]) -> Result<Vec<BitVector>, BitError> {
    transpose(columns)
}

fn transpose(vectors: &[BitVector]) -> Result<Vec<BitVector>, BitError> {
    let width = rectangular_width(vectors)?;

    Ok((0..width)
        .map(|j| vectors.iter().map(|v| v.as_slice()[j]).collect())
        .collect())
}

/// Returns the common length of `vectors`.
fn rectangular_width(vectors: &[BitVector]) -> Result<usize, BitError> {
    let width = vectors.first().ok_or(BitError::EmptyMatrix)?.len();
    if width == 0 {
        return Err(BitError::EmptyMatrix);
    }

    if let Some((index, v)) = vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != width)
    {
        return Err(BitError::JaggedMatrix {
            index,
            expected: width,
            actual: v.len(),
        });
    }

    Ok(width)
}
