use crate::error::{CnnError, Result};

/// Sliding-window geometry shared by convolution and pooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub width: usize,
    pub height: usize,
    pub stride_x: usize,
    pub stride_y: usize,
}

/// One stop of the window: its top-left corner in the input and its index
/// in the downsampled output grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: usize,
    pub y: usize,
    pub out_x: usize,
    pub out_y: usize,
}

impl Window {
    /// Rejects zero sizes and strides up front; `layer` names the owner in
    /// the error.
    pub fn new(
        layer: &'static str,
        width: usize,
        height: usize,
        stride_x: usize,
        stride_y: usize,
    ) -> Result<Window> {
        if width == 0 || height == 0 || stride_x == 0 || stride_y == 0 {
            return Err(CnnError::InvalidConfiguration(format!(
                "{layer} window {width}x{height} with stride {stride_x}x{stride_y}: \
                 sizes and strides must be positive"
            )));
        }
        Ok(Window { width, height, stride_x, stride_y })
    }

    /// Downsampled `(height, width)` for an input plane, or `None` when the
    /// window does not fit at all. Division truncates: trailing rows and
    /// columns too narrow for a full window are skipped.
    pub fn output_size(&self, height: usize, width: usize) -> Option<(usize, usize)> {
        let rows = height.checked_sub(self.height)? / self.stride_y + 1;
        let cols = width.checked_sub(self.width)? / self.stride_x + 1;
        Some((rows, cols))
    }

    pub fn check_fits(&self, layer: &'static str, height: usize, width: usize) -> Result<(usize, usize)> {
        self.output_size(height, width).ok_or_else(|| {
            CnnError::shape(
                layer,
                format!(
                    "{}x{} window does not fit a {height}x{width} input",
                    self.height, self.width
                ),
            )
        })
    }

    /// Every valid window placement, rows outer and columns inner.
    pub fn positions(&self, height: usize, width: usize) -> impl Iterator<Item = WindowPosition> {
        let (rows, cols) = self.output_size(height, width).unwrap_or((0, 0));
        let Window { stride_x, stride_y, .. } = *self;

        (0..rows).flat_map(move |out_y| {
            (0..cols).map(move |out_x| WindowPosition {
                x: out_x * stride_x,
                y: out_y * stride_y,
                out_x,
                out_y,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stride_is_rejected() {
        assert!(matches!(
            Window::new("pooling", 2, 2, 0, 1),
            Err(CnnError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn output_size_truncates() {
        let w = Window::new("pooling", 2, 2, 2, 2).unwrap();
        assert_eq!(w.output_size(5, 5), Some((2, 2)));
        assert_eq!(w.output_size(1, 4), None);
    }

    #[test]
    fn positions_restart_each_row() {
        let w = Window::new("convolution", 2, 2, 1, 1).unwrap();
        let origins: Vec<(usize, usize)> = w.positions(3, 3).map(|p| (p.x, p.y)).collect();
        assert_eq!(origins, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn strided_positions_map_to_dense_indices() {
        let w = Window::new("pooling", 2, 2, 2, 2).unwrap();
        let last = w.positions(4, 4).last().unwrap();
        assert_eq!(last, WindowPosition { x: 2, y: 2, out_x: 1, out_y: 1 });
    }
}
