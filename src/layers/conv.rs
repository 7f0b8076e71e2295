use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CnnError, Result};
use crate::layers::window::Window;
use crate::math::{Matrix, Tensor3D};

const LAYER: &str = "convolution";

/// Where a convolution writes each window's dot product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCanvas {
    /// One cell per window position: the activation map shrinks to
    /// `((H - kh) / sy + 1) × ((W - kw) / sx + 1)`.
    #[default]
    Downsampled,
    /// Input-sized map; each value lands on its window's top-left corner and
    /// every cell between strided positions stays 0.0.
    Sparse,
}

/// A bank of filters slid over the input volume.
///
/// Each filter holds one `kernel_height × kernel_width` plane per input
/// channel and produces one plane of the activation map.
#[derive(Debug, Clone)]
pub struct ConvolutionLayer {
    window: Window,
    input_channels: usize,
    canvas: OutputCanvas,
    filters: Vec<Vec<Matrix>>,
}

impl ConvolutionLayer {
    /// Builds `filter_count` filters with every kernel value drawn from
    /// [0.01, 1.0).
    pub fn new<R: Rng + ?Sized>(
        filter_count: usize,
        kernel_width: usize,
        kernel_height: usize,
        stride_x: usize,
        stride_y: usize,
        input_channels: usize,
        rng: &mut R,
    ) -> Result<ConvolutionLayer> {
        let window = Window::new(LAYER, kernel_width, kernel_height, stride_x, stride_y)?;
        if filter_count == 0 || input_channels == 0 {
            return Err(CnnError::InvalidConfiguration(format!(
                "{LAYER} needs at least one filter and one input channel \
                 (got {filter_count} filters, {input_channels} channels)"
            )));
        }

        let filters = (0..filter_count)
            .map(|_| {
                (0..input_channels)
                    .map(|_| Matrix::random(kernel_height, kernel_width, rng))
                    .collect()
            })
            .collect();

        Ok(ConvolutionLayer {
            window,
            input_channels,
            canvas: OutputCanvas::default(),
            filters,
        })
    }

    /// Builds a layer around explicit kernels, `filters[filter][channel]`.
    /// The kernel size and channel count are read from the first filter.
    pub fn with_filters(filters: Vec<Vec<Matrix>>, stride_x: usize, stride_y: usize) -> Result<ConvolutionLayer> {
        let first = filters
            .first()
            .and_then(|f| f.first())
            .ok_or_else(|| {
                CnnError::InvalidConfiguration(format!("{LAYER} needs at least one non-empty filter"))
            })?;
        let window = Window::new(LAYER, first.cols, first.rows, stride_x, stride_y)?;
        let input_channels = filters[0].len();

        for (index, filter) in filters.iter().enumerate() {
            if filter.len() != input_channels {
                return Err(CnnError::InvalidConfiguration(format!(
                    "filter {index} has {} kernel planes, expected {input_channels}",
                    filter.len()
                )));
            }
            let well_formed = filter.iter().all(|k| {
                k.is_rectangular() && k.rows == window.height && k.cols == window.width
            });
            if !well_formed {
                return Err(CnnError::InvalidConfiguration(format!(
                    "filter {index} kernels must all be {}x{}",
                    window.height, window.width
                )));
            }
        }

        Ok(ConvolutionLayer {
            window,
            input_channels,
            canvas: OutputCanvas::default(),
            filters,
        })
    }

    pub fn with_canvas(mut self, canvas: OutputCanvas) -> ConvolutionLayer {
        self.canvas = canvas;
        self
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn canvas(&self) -> OutputCanvas {
        self.canvas
    }

    pub fn filters(&self) -> &[Vec<Matrix>] {
        &self.filters
    }

    /// Produces the activation map: one plane per filter, each cell the sum
    /// over input channels of the window/kernel dot product.
    pub fn execute(&self, input: &Tensor3D) -> Result<Tensor3D> {
        if input.channels() != self.input_channels {
            return Err(CnnError::shape(
                LAYER,
                format!(
                    "expected {} input channels, got {}",
                    self.input_channels,
                    input.channels()
                ),
            ));
        }
        let (height, width) = (input.height(), input.width());
        let (out_height, out_width) = match self.canvas {
            OutputCanvas::Downsampled => self.window.check_fits(LAYER, height, width)?,
            OutputCanvas::Sparse => {
                self.window.check_fits(LAYER, height, width)?;
                (height, width)
            }
        };

        let mut activation_map = Tensor3D::zeros(self.filters.len(), out_height, out_width);

        for pos in self.window.positions(height, width) {
            let (row, col) = match self.canvas {
                OutputCanvas::Downsampled => (pos.out_y, pos.out_x),
                OutputCanvas::Sparse => (pos.y, pos.x),
            };
            for (filter_index, filter) in self.filters.iter().enumerate() {
                let dot_product: f64 = filter
                    .iter()
                    .zip(input.planes())
                    .map(|(kernel, plane)| plane.window_dot(pos.x, pos.y, kernel))
                    .sum();
                activation_map.set(filter_index, row, col, dot_product);
            }
        }

        log::debug!("activation map:\n{activation_map}");
        Ok(activation_map)
    }
}

impl fmt::Display for ConvolutionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Convolutional Layer")?;
        writeln!(
            f,
            "Filter number: {}, Kernel Width: {}, Kernel Height: {}, Stride X: {}, Stride Y: {}, Channel number: {}, Canvas: {:?}",
            self.filters.len(),
            self.window.width,
            self.window.height,
            self.window.stride_x,
            self.window.stride_y,
            self.input_channels,
            self.canvas,
        )?;
        for (filter_index, filter) in self.filters.iter().enumerate() {
            writeln!(f, " - Filter {filter_index}")?;
            for (channel, kernel) in filter.iter().enumerate() {
                writeln!(f, " -- Channel {channel}")?;
                writeln!(f, "{kernel}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::{seeded, INIT_HIGH, INIT_LOW};

    fn ramp(height: usize, width: usize) -> Tensor3D {
        let data = (0..height)
            .map(|r| (0..width).map(|c| (r * width + c + 1) as f64).collect())
            .collect();
        Tensor3D::new(vec![Matrix::from_data(data)]).unwrap()
    }

    fn identity() -> ConvolutionLayer {
        ConvolutionLayer::with_filters(vec![vec![Matrix::from_data(vec![vec![1.0]])]], 1, 1).unwrap()
    }

    #[test]
    fn random_kernels_have_configured_shape_and_range() {
        let layer = ConvolutionLayer::new(4, 3, 2, 1, 1, 3, &mut seeded(1)).unwrap();
        assert_eq!(layer.filters().len(), 4);
        for filter in layer.filters() {
            assert_eq!(filter.len(), 3);
            for kernel in filter {
                assert_eq!((kernel.rows, kernel.cols), (2, 3));
                assert!(kernel.data.iter().flatten().all(|v| (INIT_LOW..INIT_HIGH).contains(v)));
            }
        }
    }

    #[test]
    fn identity_kernel_reproduces_input() {
        let input = ramp(3, 4);
        assert_eq!(identity().execute(&input).unwrap(), input);
    }

    #[test]
    fn downsampled_canvas_shrinks_with_stride() {
        let layer = ConvolutionLayer::with_filters(
            vec![vec![Matrix::from_data(vec![vec![1.0, 1.0], vec![1.0, 1.0]])]],
            2,
            2,
        )
        .unwrap();
        let out = layer.execute(&ramp(4, 4)).unwrap();
        // window sums of [[1..4],[5..8],[9..12],[13..16]] in 2x2 blocks
        assert_eq!(out.plane(0).data, vec![vec![14.0, 22.0], vec![46.0, 54.0]]);
    }

    #[test]
    fn sparse_canvas_keeps_input_size_with_gaps() {
        let layer = ConvolutionLayer::with_filters(
            vec![vec![Matrix::from_data(vec![vec![1.0]])]],
            2,
            2,
        )
        .unwrap()
        .with_canvas(OutputCanvas::Sparse);
        let out = layer.execute(&ramp(3, 3)).unwrap();
        assert_eq!(
            out.plane(0).data,
            vec![vec![1.0, 0.0, 3.0], vec![0.0, 0.0, 0.0], vec![7.0, 0.0, 9.0]]
        );
    }

    #[test]
    fn sums_dot_products_across_channels() {
        let one = Matrix::from_data(vec![vec![1.0]]);
        let two = Matrix::from_data(vec![vec![2.0]]);
        let layer = ConvolutionLayer::with_filters(vec![vec![one, two]], 1, 1).unwrap();
        let input = Tensor3D::from_data(vec![vec![vec![1.0, 2.0]], vec![vec![10.0, 20.0]]]).unwrap();
        assert_eq!(layer.execute(&input).unwrap().plane(0).data, vec![vec![21.0, 42.0]]);
    }

    #[test]
    fn oversized_kernel_is_a_shape_mismatch() {
        let layer = ConvolutionLayer::new(1, 5, 5, 1, 1, 1, &mut seeded(3)).unwrap();
        assert!(matches!(
            layer.execute(&ramp(3, 3)),
            Err(CnnError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn channel_count_must_match() {
        let layer = ConvolutionLayer::new(1, 1, 1, 1, 1, 3, &mut seeded(3)).unwrap();
        assert!(matches!(
            layer.execute(&ramp(2, 2)),
            Err(CnnError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn zero_filters_rejected_at_construction() {
        assert!(matches!(
            ConvolutionLayer::new(0, 2, 2, 1, 1, 1, &mut seeded(0)),
            Err(CnnError::InvalidConfiguration(_))
        ));
    }
}
