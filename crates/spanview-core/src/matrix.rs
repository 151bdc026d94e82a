use crate::{shape, Shape, TensorDType};

/// A dense 2-D matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: TensorDType> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: TensorDType> Matrix<T> {
    /// # Panics
    ///
    /// If `data.len() != rows * cols`.
    pub fn from_data<U: Into<Vec<T>>>(data: U, rows: usize, cols: usize) -> Self {
        let data = data.into();
        assert_eq!(
            data.len(),
            rows * cols,
            "{} elements cannot fill a {}x{} matrix",
            data.len(),
            rows,
            cols
        );
        Self { rows, cols, data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_data(vec![T::zero(); rows * cols], rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        shape![self.rows, self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
