use std::fmt;

use crate::error::{CnnError, Result};
use crate::layers::{ActivationLayer, ConvolutionLayer, FullyConnectedLayer, PoolingLayer};
use crate::math::Tensor3D;

/// One stage of the pipeline.
///
/// The three transforming kinds map a volume to a volume through
/// [`Layer::execute`]. `FullyConnected` instead scores the volume and ends
/// the pipeline; the network handles it in its own match arm.
#[derive(Debug, Clone)]
pub enum Layer {
    Convolution(ConvolutionLayer),
    Activation(ActivationLayer),
    Pooling(PoolingLayer),
    FullyConnected(FullyConnectedLayer),
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Convolution(_) => "convolution",
            Layer::Activation(_) => "activation",
            Layer::Pooling(_) => "pooling",
            Layer::FullyConnected(_) => "fully connected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Layer::FullyConnected(_))
    }

    pub fn execute(&self, input: Tensor3D) -> Result<Tensor3D> {
        match self {
            Layer::Convolution(conv) => conv.execute(&input),
            Layer::Activation(activation) => Ok(activation.execute(input)),
            Layer::Pooling(pool) => pool.execute(&input),
            Layer::FullyConnected(_) => Err(CnnError::InvalidConfiguration(
                "a fully connected layer scores volumes, it cannot transform them".into(),
            )),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Convolution(conv) => fmt::Display::fmt(conv, f),
            Layer::Activation(activation) => fmt::Display::fmt(activation, f),
            Layer::Pooling(pool) => fmt::Display::fmt(pool, f),
            Layer::FullyConnected(fc) => fmt::Display::fmt(fc, f),
        }
    }
}

impl From<ConvolutionLayer> for Layer {
    fn from(layer: ConvolutionLayer) -> Self {
        Layer::Convolution(layer)
    }
}

impl From<ActivationLayer> for Layer {
    fn from(layer: ActivationLayer) -> Self {
        Layer::Activation(layer)
    }
}

impl From<PoolingLayer> for Layer {
    fn from(layer: PoolingLayer) -> Self {
        Layer::Pooling(layer)
    }
}

impl From<FullyConnectedLayer> for Layer {
    fn from(layer: FullyConnectedLayer) -> Self {
        Layer::FullyConnected(layer)
    }
}
