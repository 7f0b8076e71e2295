use std::fmt;

use rand::Rng;

use crate::math::random::init_value;

/// A single row-major plane of f64 values.
///
/// `Matrix` is the 2-D building block of a [`Tensor3D`](crate::math::tensor::Tensor3D):
/// one per channel of an image, one per filter of an activation map, one per
/// input channel of a convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Fills a `rows × cols` plane with independent draws from the kernel
    /// initialization range [0.01, 1.0).
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = init_value(rng);
            }
        }

        res
    }

    /// Wraps row data as-is. The column count is taken from the first row;
    /// use [`Matrix::is_rectangular`] before trusting data from outside.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, Vec::len),
            data,
        }
    }

    pub fn is_rectangular(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }

    /// Dot product between `kernel` and the same-sized sub-window of `self`
    /// whose top-left corner sits at column `x`, row `y`.
    ///
    /// The window must lie inside the plane.
    pub fn window_dot(&self, x: usize, y: usize, kernel: &Matrix) -> f64 {
        kernel
            .data
            .iter()
            .zip(&self.data[y..y + kernel.rows])
            .map(|(k_row, row)| {
                k_row
                    .iter()
                    .zip(&row[x..x + kernel.cols])
                    .map(|(k, v)| k * v)
                    .sum::<f64>()
            })
            .sum()
    }

    /// Largest value in the `width × height` window at (`x`, `y`).
    ///
    /// The running maximum starts at 0.0 and only strictly larger values
    /// replace it, so a window holding nothing above zero reports 0.0.
    pub fn window_max(&self, x: usize, y: usize, width: usize, height: usize) -> f64 {
        let mut max = 0.0;
        for row in &self.data[y..y + height] {
            for &value in &row[x..x + width] {
                if value > max {
                    max = value;
                }
            }
        }
        max
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Bracketed rows separated by `;`, one row per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ";\n ")?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Matrix {
        Matrix::from_data(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])
    }

    #[test]
    fn window_dot_uses_offset_sub_window() {
        let kernel = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        // window at (1, 1) is [[5, 6], [8, 9]]
        assert_eq!(grid().window_dot(1, 1, &kernel), 14.0);
    }

    #[test]
    fn window_max_floors_at_zero() {
        let negative = Matrix::from_data(vec![vec![-3.0, -1.0], vec![-2.0, -4.0]]);
        assert_eq!(negative.window_max(0, 0, 2, 2), 0.0);
        assert_eq!(grid().window_max(0, 1, 2, 2), 8.0);
    }

    #[test]
    fn from_data_tolerates_empty_rows() {
        let m = Matrix::from_data(vec![]);
        assert_eq!((m.rows, m.cols), (0, 0));
        assert!(m.is_rectangular());

        let ragged = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(!ragged.is_rectangular());
    }

    #[test]
    fn display_lists_rows() {
        let m = Matrix::from_data(vec![vec![1.0, 2.5], vec![3.0, 4.0]]);
        assert_eq!(m.to_string(), "[1, 2.5;\n 3, 4]");
    }
}
