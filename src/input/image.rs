//! Image ingestion: turns in-memory pixel grids into channel-separated
//! volumes.
//!
//! Sample values are converted to f64 as they are. Nothing is resized or
//! normalized, so an 8-bit image yields values in [0, 255].
use image::DynamicImage;

use crate::error::{CnnError, Result};
use crate::math::{Matrix, Tensor3D};

/// Splits interleaved samples (row-major pixels, channel fastest) into one
/// plane per channel.
///
/// `channels` must be 1 or 3 and `samples` must hold exactly
/// `height * width * channels` values.
pub fn volume_from_samples<T>(
    height: usize,
    width: usize,
    channels: usize,
    samples: &[T],
) -> Result<Tensor3D>
where
    T: Copy + Into<f64>,
{
    if channels != 1 && channels != 3 {
        return Err(CnnError::UnsupportedChannelCount(channels));
    }
    let expected = height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            CnnError::shape(
                "image",
                format!("{height}x{width}x{channels} image has more samples than fit in memory"),
            )
        })?;
    if samples.len() != expected {
        return Err(CnnError::shape(
            "image",
            format!(
                "{height}x{width}x{channels} image needs {expected} samples, got {}",
                samples.len()
            ),
        ));
    }

    let mut planes = vec![Matrix::zeros(height, width); channels];
    for (i, &sample) in samples.iter().enumerate() {
        let pixel = i / channels;
        planes[i % channels].set(pixel / width, pixel % width, sample.into());
    }

    Tensor3D::new(planes)
}

/// Ingests a decoded image. Grayscale layouts give one plane, RGB layouts
/// give three planes in R, G, B order. Layouts with an alpha channel are
/// rejected.
pub fn volume_from_image(img: &DynamicImage) -> Result<Tensor3D> {
    let (height, width) = (img.height() as usize, img.width() as usize);

    match img {
        DynamicImage::ImageLuma8(buf) => volume_from_samples(height, width, 1, buf.as_raw()),
        DynamicImage::ImageLuma16(buf) => volume_from_samples(height, width, 1, buf.as_raw()),
        DynamicImage::ImageRgb8(buf) => volume_from_samples(height, width, 3, buf.as_raw()),
        DynamicImage::ImageRgb16(buf) => volume_from_samples(height, width, 3, buf.as_raw()),
        DynamicImage::ImageRgb32F(buf) => volume_from_samples(height, width, 3, buf.as_raw()),
        other => Err(CnnError::UnsupportedChannelCount(
            other.color().channel_count() as usize,
        )),
    }
}

/// Decodes PNG/JPEG/BMP/GIF bytes and ingests the result.
pub fn volume_from_image_bytes(bytes: &[u8]) -> Result<Tensor3D> {
    let img = image::load_from_memory(bytes)?;
    volume_from_image(&img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn grayscale_is_one_plane() {
        let img = GrayImage::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let volume = volume_from_image(&DynamicImage::ImageLuma8(img)).unwrap();

        assert_eq!(volume.channels(), 1);
        assert_eq!((volume.height(), volume.width()), (2, 3));
        assert_eq!(volume.get(0, 1, 0), 4.0);
        assert_eq!(volume.get(0, 0, 2), 3.0);
    }

    #[test]
    fn color_is_split_per_channel() {
        let img = RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let volume = volume_from_image(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(volume.channels(), 3);
        assert_eq!(volume.plane(0).data, vec![vec![10.0, 40.0]]);
        assert_eq!(volume.plane(1).data, vec![vec![20.0, 50.0]]);
        assert_eq!(volume.plane(2).data, vec![vec![30.0, 60.0]]);
    }

    #[test]
    fn alpha_layouts_are_rejected() {
        let img = RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
        let err = volume_from_image(&DynamicImage::ImageRgba8(img)).unwrap_err();
        assert!(matches!(err, CnnError::UnsupportedChannelCount(4)));
    }

    #[test]
    fn raw_samples_validate_channels_and_length() {
        assert!(matches!(
            volume_from_samples(1, 1, 2, &[0.0f64, 1.0]),
            Err(CnnError::UnsupportedChannelCount(2))
        ));
        assert!(matches!(
            volume_from_samples(2, 2, 1, &[0u8, 1, 2]),
            Err(CnnError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn overflowing_dimensions_are_a_shape_mismatch() {
        assert!(matches!(
            volume_from_samples::<u8>(usize::MAX, 2, 1, &[]),
            Err(CnnError::ShapeMismatch { layer: "image", .. })
        ));
        assert!(matches!(
            volume_from_samples::<u8>(usize::MAX / 2, 1, 3, &[]),
            Err(CnnError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = volume_from_image_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, CnnError::Image(_)));
    }
}
