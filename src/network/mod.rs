pub mod classify;
pub mod network;
pub mod spec;

pub use classify::classify;
pub use network::Network;
pub use spec::{LayerSpec, NetworkSpec};
