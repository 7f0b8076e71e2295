pub mod matrix;
pub mod random;
pub mod tensor;

pub use matrix::Matrix;
pub use tensor::Tensor3D;
