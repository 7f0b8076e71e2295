use serde::{Deserialize, Serialize};

use crate::activation::ActivationKind;
use crate::layers::OutputCanvas;

/// Describes one layer in a network specification.
///
/// Serialized with a `type` tag, e.g.
/// `{"type": "pooling", "window_width": 2, "window_height": 2, "stride_x": 2, "stride_y": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Convolution {
        filter_count: usize,
        kernel_width: usize,
        kernel_height: usize,
        stride_x: usize,
        stride_y: usize,
        input_channels: usize,
        #[serde(default)]
        canvas: OutputCanvas,
    },
    Activation {
        #[serde(default)]
        kind: ActivationKind,
    },
    Pooling {
        window_width: usize,
        window_height: usize,
        stride_x: usize,
        stride_y: usize,
    },
    FullyConnected {
        node_count: usize,
    },
}

/// A serializable network architecture.
///
/// Only the layer layout is stored; kernels and weights are drawn fresh
/// when a [`Network`](crate::network::Network) is built from the spec.
/// A fixed `seed` makes those draws reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the spec file stem.
    pub name: String,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Ordered list of layers, input first.
    pub layers: Vec<LayerSpec>,
    /// Optional class names, indexed like the output scores.
    #[serde(default)]
    pub class_labels: Option<Vec<String>>,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Name of the class at `index`, falling back to the index itself.
    pub fn label_for(&self, index: usize) -> String {
        self.class_labels
            .as_ref()
            .and_then(|labels| labels.get(index).cloned())
            .unwrap_or_else(|| index.to_string())
    }
}
