use std::fmt;

use crate::activation::ActivationKind;
use crate::math::Tensor3D;

/// Applies an [`ActivationKind`] to every element. Stateless and
/// shape-preserving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationLayer {
    kind: ActivationKind,
}

impl ActivationLayer {
    pub fn new(kind: ActivationKind) -> ActivationLayer {
        ActivationLayer { kind }
    }

    pub fn kind(&self) -> ActivationKind {
        self.kind
    }

    pub fn execute(&self, input: Tensor3D) -> Tensor3D {
        let rectified = input.map(|x| self.kind.function(x));
        log::trace!("rectified volume:\n{rectified}");
        rectified
    }
}

impl fmt::Display for ActivationLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Layer", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Tensor3D {
        Tensor3D::from_data(vec![
            vec![vec![-1.5, 0.0], vec![2.0, -0.25]],
            vec![vec![3.0, -7.0], vec![-0.0, 4.5]],
        ])
        .unwrap()
    }

    #[test]
    fn every_element_is_max_of_zero_and_input() {
        let input = mixed();
        let out = ActivationLayer::new(ActivationKind::Relu).execute(input.clone());
        for (a, b) in input.iter().zip(out.iter()) {
            assert_eq!(b, a.max(0.0));
        }
    }

    #[test]
    fn relu_is_idempotent() {
        let relu = ActivationLayer::new(ActivationKind::Relu);
        let once = relu.execute(mixed());
        let twice = relu.execute(once.clone());
        assert_eq!(once, twice);
    }
}
