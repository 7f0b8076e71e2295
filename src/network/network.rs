use std::fmt;

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activation::ActivationKind;
use crate::error::{CnnError, Result};
use crate::input::volume_from_image;
use crate::layers::{
    ActivationLayer, ConvolutionLayer, FullyConnectedLayer, Layer, PoolingLayer,
};
use crate::math::Tensor3D;
use crate::network::spec::{LayerSpec, NetworkSpec};

/// An append-only sequence of layers plus the random source used to
/// initialize them.
pub struct Network {
    layers: Vec<Layer>,
    rng: StdRng,
}

impl Network {
    /// An empty network seeded from the OS.
    pub fn new() -> Network {
        Network::with_rng(StdRng::from_entropy())
    }

    /// An empty network whose kernels and weights are reproducible.
    pub fn with_seed(seed: u64) -> Network {
        Network::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Network {
        Network { layers: Vec::new(), rng }
    }

    /// Builds every layer of `spec`, in order.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        let mut network = match spec.seed {
            Some(seed) => Network::with_seed(seed),
            None => Network::new(),
        };
        for layer in &spec.layers {
            network.add_layer(layer)?;
        }
        Ok(network)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Appends an already-built layer, e.g. one with hand-picked weights.
    pub fn push_layer(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }

    pub fn add_layer(&mut self, spec: &LayerSpec) -> Result<()> {
        match *spec {
            LayerSpec::Convolution {
                filter_count,
                kernel_width,
                kernel_height,
                stride_x,
                stride_y,
                input_channels,
                canvas,
            } => {
                let conv = ConvolutionLayer::new(
                    filter_count,
                    kernel_width,
                    kernel_height,
                    stride_x,
                    stride_y,
                    input_channels,
                    &mut self.rng,
                )?
                .with_canvas(canvas);
                self.push_layer(conv);
            }
            LayerSpec::Activation { kind } => self.add_activation_layer(kind),
            LayerSpec::Pooling { window_width, window_height, stride_x, stride_y } => {
                self.add_pooling_layer(window_width, window_height, stride_x, stride_y)?
            }
            LayerSpec::FullyConnected { node_count } => self.add_fully_connected_layer(node_count)?,
        }
        Ok(())
    }

    pub fn add_convolution_layer(
        &mut self,
        filter_count: usize,
        kernel_width: usize,
        kernel_height: usize,
        stride_x: usize,
        stride_y: usize,
        input_channels: usize,
    ) -> Result<()> {
        let conv = ConvolutionLayer::new(
            filter_count,
            kernel_width,
            kernel_height,
            stride_x,
            stride_y,
            input_channels,
            &mut self.rng,
        )?;
        self.push_layer(conv);
        Ok(())
    }

    pub fn add_activation_layer(&mut self, kind: ActivationKind) {
        self.push_layer(ActivationLayer::new(kind));
    }

    pub fn add_pooling_layer(
        &mut self,
        window_width: usize,
        window_height: usize,
        stride_x: usize,
        stride_y: usize,
    ) -> Result<()> {
        let pool = PoolingLayer::new(window_width, window_height, stride_x, stride_y)?;
        self.push_layer(pool);
        Ok(())
    }

    pub fn add_fully_connected_layer(&mut self, node_count: usize) -> Result<()> {
        let fc = FullyConnectedLayer::new(node_count)?;
        self.push_layer(fc);
        Ok(())
    }

    /// Ingests `image` and runs it through every layer.
    pub fn forward_pass(&mut self, image: &DynamicImage) -> Result<Vec<f64>> {
        let volume = volume_from_image(image)?;
        self.forward_volume(volume)
    }

    /// Runs a prepared volume through every layer and returns the fully
    /// connected layer's scores, or an empty vector when the network has no
    /// fully connected layer.
    ///
    /// A layer placed after the fully connected layer is rejected before
    /// anything runs.
    pub fn forward_volume(&mut self, volume: Tensor3D) -> Result<Vec<f64>> {
        self.check_terminal()?;

        let mut current = volume;
        for (index, layer) in self.layers.iter_mut().enumerate() {
            log::debug!("running layer {index} ({})", layer.name());
            match layer {
                Layer::FullyConnected(fc) => {
                    fc.ensure_initialized(current.len(), &mut self.rng)?;
                    return fc.score(&current);
                }
                other => current = other.execute(current)?,
            }
        }

        Ok(Vec::new())
    }

    fn check_terminal(&self) -> Result<()> {
        if let Some(terminal) = self.layers.iter().position(Layer::is_terminal) {
            if terminal + 1 < self.layers.len() {
                return Err(CnnError::UseOfTerminalLayerNotAtEnd {
                    index: terminal + 1,
                    terminal,
                });
            }
        }
        Ok(())
    }

    /// Prints every layer's configuration and parameters to stdout.
    pub fn print_network(&self) {
        print!("{self}");
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::new()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = "-".repeat(30);
        writeln!(f, "{line}")?;
        writeln!(f, "CNN MODEL")?;
        writeln!(f)?;
        for layer in &self.layers {
            writeln!(f, "{layer}")?;
        }
        writeln!(f, "{line}")
    }
}
