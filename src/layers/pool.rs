use std::fmt;

use crate::error::Result;
use crate::layers::window::Window;
use crate::math::{Matrix, Tensor3D};

const LAYER: &str = "pooling";

/// Max pooling: each window collapses to its largest value, per channel.
///
/// The running maximum starts at 0.0, so windows containing only negative
/// values pool to 0.0 rather than to their true maximum. Behind a ReLU this
/// makes no difference.
#[derive(Debug, Clone)]
pub struct PoolingLayer {
    window: Window,
}

impl PoolingLayer {
    pub fn new(window_width: usize, window_height: usize, stride_x: usize, stride_y: usize) -> Result<PoolingLayer> {
        Ok(PoolingLayer {
            window: Window::new(LAYER, window_width, window_height, stride_x, stride_y)?,
        })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn execute(&self, input: &Tensor3D) -> Result<Tensor3D> {
        let (height, width) = (input.height(), input.width());
        let (out_height, out_width) = self.window.check_fits(LAYER, height, width)?;

        let planes = input
            .planes()
            .iter()
            .map(|plane| {
                let mut pooled = Matrix::zeros(out_height, out_width);
                for pos in self.window.positions(height, width) {
                    let max = plane.window_max(pos.x, pos.y, self.window.width, self.window.height);
                    pooled.set(pos.out_y, pos.out_x, max);
                }
                pooled
            })
            .collect();
        let downsampled = Tensor3D::new(planes)?;

        log::debug!("downsampled volume:\n{downsampled}");
        Ok(downsampled)
    }
}

impl fmt::Display for PoolingLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pooling Layer")?;
        writeln!(
            f,
            "Window Width: {}, Window Height: {}, Stride X: {}, Stride Y: {}",
            self.window.width, self.window.height, self.window.stride_x, self.window.stride_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CnnError;

    fn four_by_four() -> Tensor3D {
        Tensor3D::from_data(vec![vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
            vec![13.0, 14.0, 15.0, 16.0],
        ]])
        .unwrap()
    }

    #[test]
    fn two_by_two_stride_two() {
        let out = PoolingLayer::new(2, 2, 2, 2).unwrap().execute(&four_by_four()).unwrap();
        assert_eq!(out.plane(0).data, vec![vec![6.0, 8.0], vec![14.0, 16.0]]);
    }

    #[test]
    fn overlapping_windows_with_unit_stride() {
        let out = PoolingLayer::new(2, 2, 1, 1).unwrap().execute(&four_by_four()).unwrap();
        assert_eq!((out.height(), out.width()), (3, 3));
        assert_eq!(out.plane(0).data[2], vec![14.0, 15.0, 16.0]);
    }

    #[test]
    fn trailing_columns_are_truncated() {
        let input = Tensor3D::from_data(vec![vec![vec![1.0, 9.0, 3.0, 4.0, 100.0]]]).unwrap();
        let out = PoolingLayer::new(2, 1, 2, 1).unwrap().execute(&input).unwrap();
        assert_eq!(out.plane(0).data, vec![vec![9.0, 4.0]]);
    }

    #[test]
    fn negative_windows_pool_to_zero() {
        let input = Tensor3D::from_data(vec![vec![vec![-1.0, -2.0], vec![-3.0, -4.0]]]).unwrap();
        let out = PoolingLayer::new(2, 2, 1, 1).unwrap().execute(&input).unwrap();
        assert_eq!(out.plane(0).data, vec![vec![0.0]]);
    }

    #[test]
    fn pools_every_channel() {
        let input = Tensor3D::from_data(vec![
            vec![vec![1.0, 2.0]],
            vec![vec![7.0, 3.0]],
        ])
        .unwrap();
        let out = PoolingLayer::new(2, 1, 1, 1).unwrap().execute(&input).unwrap();
        assert_eq!(out.iter().collect::<Vec<_>>(), vec![2.0, 7.0]);
    }

    #[test]
    fn window_larger_than_input() {
        let input = Tensor3D::from_data(vec![vec![vec![1.0, 2.0, 3.0]]]).unwrap();
        assert!(matches!(
            PoolingLayer::new(2, 2, 1, 1).unwrap().execute(&input),
            Err(CnnError::ShapeMismatch { .. })
        ));
    }
}
