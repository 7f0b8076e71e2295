pub mod activation;
pub mod conv;
pub mod fully_connected;
pub mod layer;
pub mod pool;
pub mod window;

pub use activation::ActivationLayer;
pub use conv::{ConvolutionLayer, OutputCanvas};
pub use fully_connected::{FullyConnectedLayer, Node, NodeState};
pub use layer::Layer;
pub use pool::PoolingLayer;
pub use window::{Window, WindowPosition};
