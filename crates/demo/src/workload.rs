//! Gradient descent on a small quadratic over a vector configuration.
//!
//! The phases are timed with the always-active macros and each pass marks an
//! iteration boundary, so the report carries per-iteration statistics.

use calltree_core::{finished_iteration, tic, toc};

use crate::config::{ConfigError, VectorConfig};

const STEP: f64 = 0.1;

/// Minimize `0.5 * |x - target|^2` and return the remaining error.
pub struct Descent {
    target: VectorConfig,
    estimate: VectorConfig,
}

impl Descent {
    /// A problem with `variables` keys of dimension `dim` each.
    pub fn new(variables: usize, dim: usize) -> Self {
        let mut target = VectorConfig::new();
        let mut estimate = VectorConfig::new();
        for i in 0..variables {
            let name = format!("x{i}");
            target.insert(name.clone(), (0..dim).map(|k| (i * dim + k) as f64).collect());
            estimate.insert(name, vec![0.0; dim]);
        }
        Self { target, estimate }
    }

    pub fn estimate(&self) -> &VectorConfig {
        &self.estimate
    }

    /// Squared distance to the target.
    pub fn error(&self) -> Result<f64, ConfigError> {
        tic!(error);
        let residual = self.estimate.minus(&self.target)?;
        residual.dot(&residual)
    }

    /// One descent pass.
    pub fn step(&mut self) -> Result<f64, ConfigError> {
        tic!(iteration);

        tic!(linearize);
        let gradient = self.estimate.minus(&self.target)?;
        toc!(linearize);

        tic!(update);
        let delta = gradient.scale(-STEP);
        self.estimate = self.estimate.exmap(&delta)?;
        toc!(update);

        self.error()
    }

    /// Run `iterations` passes, marking an iteration boundary after each.
    pub fn run(&mut self, iterations: usize) -> Result<f64, ConfigError> {
        let mut err = self.error()?;
        for i in 0..iterations {
            err = self.step()?;
            finished_iteration!();
            log::trace!("iteration {i}: error {err:.6}");
        }
        Ok(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltree_core::{ManualClock, install_clock, snapshot};

    #[test]
    fn descent_converges() {
        let mut d = Descent::new(3, 2);
        let start = d.error().unwrap();
        let end = d.run(50).unwrap();
        assert!(end < start * 1e-3);
        assert_eq!(d.estimate().dim(), 6);
    }

    #[test]
    fn run_builds_the_expected_tree() {
        install_clock(ManualClock::new());
        let mut d = Descent::new(2, 2);
        d.run(4).unwrap();

        let root = snapshot();
        let iteration = root.child("iteration").expect("iteration");
        assert_eq!((iteration.closes, iteration.iterations), (4, 4));
        let labels: Vec<&str> = iteration.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["linearize", "update", "error"]);
        // the error evaluated before the first pass sits directly under the root
        assert_eq!(root.child("error").map(|e| e.closes), Some(1));
    }
}
