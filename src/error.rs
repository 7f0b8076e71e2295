use thiserror::Error;

/// Everything that can go wrong while assembling or running a network.
///
/// All variants describe deterministic configuration problems; nothing here
/// is transient, so callers should not retry.
#[derive(Debug, Error)]
pub enum CnnError {
    /// A layer received a volume it cannot process with its configured
    /// filter, window, or weight dimensions.
    #[error("shape mismatch in {layer}: {detail}")]
    ShapeMismatch { layer: &'static str, detail: String },

    /// Image ingestion only understands grayscale (1) or color (3) images.
    #[error("unsupported channel count {0}, expected 1 (grayscale) or 3 (color)")]
    UnsupportedChannelCount(usize),

    /// A builder was handed a zero count, size, or stride, or an operation
    /// was used on a layer that does not support it.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A layer sits after the fully connected layer, which ends the pipeline.
    #[error("layer {index} comes after the fully connected layer at {terminal}")]
    UseOfTerminalLayerNotAtEnd { index: usize, terminal: usize },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, CnnError>;

impl CnnError {
    pub(crate) fn shape(layer: &'static str, detail: impl Into<String>) -> Self {
        CnnError::ShapeMismatch { layer, detail: detail.into() }
    }
}
