pub mod image;

pub use self::image::{volume_from_image, volume_from_image_bytes, volume_from_samples};
