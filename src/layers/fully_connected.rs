use std::fmt;

use rand::Rng;

use crate::error::{CnnError, Result};
use crate::math::random::init_value;
use crate::math::Tensor3D;

const LAYER: &str = "fully connected";

/// A linear scoring unit: one weight per flattened input element plus a bias.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    bias: f64,
    weights: Vec<f64>,
}

impl Node {
    /// Bias and every weight drawn from [0.01, 1.0).
    pub fn random<R: Rng + ?Sized>(connections: usize, rng: &mut R) -> Node {
        let bias = init_value(rng);
        let weights = (0..connections).map(|_| init_value(rng)).collect();
        Node { bias, weights }
    }

    pub fn from_parts(bias: f64, weights: Vec<f64>) -> Node {
        Node { bias, weights }
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `bias + Σ weight[i] · value[i]` with values flattened channel, row,
    /// column.
    pub fn evaluate(&self, input: &Tensor3D) -> Result<f64> {
        if self.weights.len() != input.len() {
            return Err(CnnError::shape(
                LAYER,
                format!(
                    "node has {} weights but the {}x{}x{} input has {} elements",
                    self.weights.len(),
                    input.channels(),
                    input.height(),
                    input.width(),
                    input.len()
                ),
            ));
        }
        let weighted: f64 = self.weights.iter().zip(input.iter()).map(|(w, v)| w * v).sum();
        Ok(weighted + self.bias)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bias: {}", self.bias)?;
        for (i, weight) in self.weights.iter().enumerate() {
            writeln!(f, "Weight {i}: {weight}")?;
        }
        Ok(())
    }
}

/// Nodes are only created once the flattened input size is known.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Initialized { nodes: Vec<Node> },
}

/// Terminal scoring layer: one score per node.
///
/// It does not transform volumes; the network calls [`score`](Self::score)
/// on it instead of `execute` and stops there.
#[derive(Debug, Clone)]
pub struct FullyConnectedLayer {
    node_count: usize,
    state: NodeState,
}

impl FullyConnectedLayer {
    pub fn new(node_count: usize) -> Result<FullyConnectedLayer> {
        if node_count == 0 {
            return Err(CnnError::InvalidConfiguration(format!(
                "{LAYER} layer needs at least one node"
            )));
        }
        Ok(FullyConnectedLayer {
            node_count,
            state: NodeState::Uninitialized,
        })
    }

    /// An already-initialized layer around explicit nodes, which must all
    /// carry the same number of weights.
    pub fn with_nodes(nodes: Vec<Node>) -> Result<FullyConnectedLayer> {
        let connections = nodes.first().map(|n| n.weights.len()).ok_or_else(|| {
            CnnError::InvalidConfiguration(format!("{LAYER} layer needs at least one node"))
        })?;
        if let Some(index) = nodes.iter().position(|n| n.weights.len() != connections) {
            return Err(CnnError::InvalidConfiguration(format!(
                "node {index} has {} weights, node 0 has {connections}",
                nodes[index].weights.len()
            )));
        }
        Ok(FullyConnectedLayer {
            node_count: nodes.len(),
            state: NodeState::Initialized { nodes },
        })
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, NodeState::Initialized { .. })
    }

    /// Weights per node once initialized.
    pub fn connections(&self) -> Option<usize> {
        match &self.state {
            NodeState::Uninitialized => None,
            NodeState::Initialized { nodes } => Some(nodes.first().map_or(0, |n| n.weights.len())),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        match &self.state {
            NodeState::Uninitialized => &[],
            NodeState::Initialized { nodes } => nodes,
        }
    }

    /// Creates the nodes on first use. Later calls are no-ops when
    /// `connections` matches and a shape mismatch otherwise.
    pub fn ensure_initialized<R: Rng + ?Sized>(&mut self, connections: usize, rng: &mut R) -> Result<()> {
        match self.connections() {
            None => {
                let nodes = (0..self.node_count).map(|_| Node::random(connections, rng)).collect();
                self.state = NodeState::Initialized { nodes };
                log::debug!("initialized {} nodes with {connections} weights each", self.node_count);
                Ok(())
            }
            Some(existing) if existing == connections => Ok(()),
            Some(existing) => Err(CnnError::shape(
                LAYER,
                format!("nodes were sized for {existing} inputs, got {connections}"),
            )),
        }
    }

    pub fn score(&self, input: &Tensor3D) -> Result<Vec<f64>> {
        let NodeState::Initialized { nodes } = &self.state else {
            return Err(CnnError::InvalidConfiguration(format!(
                "{LAYER} layer scored before its nodes were initialized"
            )));
        };
        let scores = nodes.iter().map(|n| n.evaluate(input)).collect::<Result<Vec<f64>>>()?;

        log::debug!("scores: {scores:?}");
        Ok(scores)
    }
}

impl fmt::Display for FullyConnectedLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fully Connected Layer")?;
        writeln!(f, "Node number: {}", self.node_count)?;
        for (i, node) in self.nodes().iter().enumerate() {
            writeln!(f, "Node {i}")?;
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
