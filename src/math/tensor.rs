use std::fmt;

use crate::error::{CnnError, Result};
use crate::math::matrix::Matrix;

/// A channel-major stack of equal-sized planes: the volume that flows
/// between layers.
///
/// Invariants: at least one channel, every plane rectangular, every plane
/// the same `height × width`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor3D {
    planes: Vec<Matrix>,
}

impl Tensor3D {
    /// Validates and wraps `planes`.
    pub fn new(planes: Vec<Matrix>) -> Result<Tensor3D> {
        let first = planes.first().ok_or_else(|| {
            CnnError::InvalidConfiguration("a volume needs at least one channel".into())
        })?;
        let (rows, cols) = (first.rows, first.cols);

        for (channel, plane) in planes.iter().enumerate() {
            if !plane.is_rectangular() {
                return Err(CnnError::shape(
                    "volume",
                    format!("channel {channel} has rows of differing length"),
                ));
            }
            if plane.rows != rows || plane.cols != cols {
                return Err(CnnError::shape(
                    "volume",
                    format!(
                        "channel {channel} is {}x{}, channel 0 is {rows}x{cols}",
                        plane.rows, plane.cols
                    ),
                ));
            }
        }

        Ok(Tensor3D { planes })
    }

    /// Convenience for literal volumes: `data[channel][row][col]`.
    pub fn from_data(data: Vec<Vec<Vec<f64>>>) -> Result<Tensor3D> {
        Tensor3D::new(data.into_iter().map(Matrix::from_data).collect())
    }

    /// A zero-filled volume. `channels` is clamped to at least one.
    pub fn zeros(channels: usize, height: usize, width: usize) -> Tensor3D {
        Tensor3D {
            planes: vec![Matrix::zeros(height, width); channels.max(1)],
        }
    }

    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    pub fn height(&self) -> usize {
        self.planes[0].rows
    }

    pub fn width(&self) -> usize {
        self.planes[0].cols
    }

    /// Flattened element count: channels × height × width.
    pub fn len(&self) -> usize {
        self.channels() * self.height() * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn planes(&self) -> &[Matrix] {
        &self.planes
    }

    pub fn plane(&self, channel: usize) -> &Matrix {
        &self.planes[channel]
    }

    pub fn into_planes(self) -> Vec<Matrix> {
        self.planes
    }

    pub fn get(&self, channel: usize, row: usize, col: usize) -> f64 {
        self.planes[channel].get(row, col)
    }

    pub fn set(&mut self, channel: usize, row: usize, col: usize, value: f64) {
        self.planes[channel].set(row, col, value);
    }

    /// Values in flattening order: channel, then row, then column.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.planes.iter().flat_map(|p| p.data.iter().flatten().copied())
    }

    pub fn map<F>(&self, functor: F) -> Tensor3D
    where
        F: Fn(f64) -> f64,
    {
        Tensor3D {
            planes: self.planes.iter().map(|p| p.map(&functor)).collect(),
        }
    }

    pub fn sum(&self) -> f64 {
        self.planes.iter().map(Matrix::sum).sum()
    }
}

impl fmt::Display for Tensor3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (channel, plane) in self.planes.iter().enumerate() {
            writeln!(f, " - Channel: {channel}")?;
            writeln!(f, "{plane}")?;
        }
        Ok(())
    }
}
