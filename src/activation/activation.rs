use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CnnError;

/// Element-wise non-linearity applied by an activation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    #[default]
    Relu,
}

impl ActivationKind {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationKind::Relu => if x > 0.0 { x } else { 0.0 },
        }
    }
}

impl FromStr for ActivationKind {
    type Err = CnnError;

    /// Accepts the layer names used when wiring a network by hand, e.g. `"RELU"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(ActivationKind::Relu),
            other => Err(CnnError::InvalidConfiguration(format!(
                "unknown activation '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationKind::Relu => write!(f, "RELU"),
        }
    }
}
