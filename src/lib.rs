pub mod activation;
pub mod error;
pub mod input;
pub mod layers;
pub mod logging;
pub mod math;
pub mod network;

// Convenience re-exports
pub use activation::ActivationKind;
pub use error::{CnnError, Result};
pub use layers::{ActivationLayer, ConvolutionLayer, FullyConnectedLayer, Layer, Node, OutputCanvas, PoolingLayer};
pub use math::{Matrix, Tensor3D};
pub use network::{classify, LayerSpec, Network, NetworkSpec};
