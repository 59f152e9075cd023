//! Nelder-Mead simplex minimizer
//!
//! Derivative-free, so the objective may be an arbitrary pipeline (here a
//! full model build). Standard coefficients: reflection 1, expansion 2,
//! contraction 1/2, shrink 1/2. Only the worst vertex is ever replaced outside
//! a shrink, and a shrink keeps the best vertex, so the best value found never
//! increases.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use swf_core::SwfResult;
use tracing::debug;

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Stopping rules and initial simplex size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadConfig {
    pub max_iterations: usize,
    /// Largest distance from the best vertex at convergence
    pub x_tolerance: f64,
    /// Largest spread of simplex values at convergence
    pub f_tolerance: f64,
    /// Offset of the initial simplex along each axis
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            x_tolerance: 1e-6,
            f_tolerance: 1e-10,
            initial_step: 0.05,
        }
    }
}

/// Result of a minimization
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: DVector<f64>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone)]
struct Vertex {
    point: DVector<f64>,
    value: f64,
}

/// Nelder-Mead minimizer
#[derive(Debug, Clone, Copy, Default)]
pub struct NelderMead {
    config: NelderMeadConfig,
}

impl NelderMead {
    pub fn new(config: NelderMeadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NelderMeadConfig {
        &self.config
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// Objective errors abort the search. Non-finite values rank as worst.
    pub fn minimize<F>(&self, start: DVector<f64>, mut objective: F) -> SwfResult<Minimum>
    where
        F: FnMut(&DVector<f64>) -> SwfResult<f64>,
    {
        let dim = start.len();
        let mut evaluations = 0usize;
        let mut eval = |point: DVector<f64>| -> SwfResult<Vertex> {
            evaluations += 1;
            let raw = objective(&point)?;
            let value = if raw.is_finite() { raw } else { f64::INFINITY };
            Ok(Vertex { point, value })
        };

        let mut simplex = Vec::with_capacity(dim + 1);
        simplex.push(eval(start.clone())?);
        for axis in 0..dim {
            let mut point = start.clone();
            point[axis] += self.config.initial_step;
            simplex.push(eval(point)?);
        }

        let mut iterations = 0;
        let mut converged = false;
        loop {
            sort(&mut simplex);
            debug!(iteration = iterations, best = simplex[0].value, "nelder-mead step");
            if self.has_converged(&simplex) {
                converged = true;
                break;
            }
            if iterations >= self.config.max_iterations {
                break;
            }
            iterations += 1;

            let worst = dim;
            let centroid = simplex[..worst]
                .iter()
                .fold(DVector::<f64>::zeros(dim), |acc, v| acc + &v.point)
                / dim as f64;
            let toward = |coef: f64, from: &DVector<f64>| &centroid + (&centroid - from) * coef;

            let reflected = eval(toward(REFLECTION, &simplex[worst].point))?;
            if reflected.value < simplex[0].value {
                let expanded = eval(toward(EXPANSION, &simplex[worst].point))?;
                simplex[worst] = if expanded.value < reflected.value {
                    expanded
                } else {
                    reflected
                };
            } else if reflected.value < simplex[worst - 1].value {
                simplex[worst] = reflected;
            } else {
                let contracted = if reflected.value < simplex[worst].value {
                    eval(&centroid + (&reflected.point - &centroid) * CONTRACTION)?
                } else {
                    eval(&centroid + (&simplex[worst].point - &centroid) * CONTRACTION)?
                };
                if contracted.value < reflected.value.min(simplex[worst].value) {
                    simplex[worst] = contracted;
                } else {
                    let best = simplex[0].point.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        *vertex = eval(&best + (&vertex.point - &best) * SHRINK)?;
                    }
                }
            }
        }

        let best = simplex.swap_remove(0);
        Ok(Minimum {
            point: best.point,
            value: best.value,
            iterations,
            evaluations,
            converged,
        })
    }

    fn has_converged(&self, simplex: &[Vertex]) -> bool {
        let best = &simplex[0];
        let spread = simplex
            .iter()
            .map(|v| (v.value - best.value).abs())
            .fold(0.0, f64::max);
        let reach = simplex
            .iter()
            .map(|v| (&v.point - &best.point).amax())
            .fold(0.0, f64::max);
        spread <= self.config.f_tolerance && reach <= self.config.x_tolerance
    }
}

/// Order by value, best first; ties keep insertion order
fn sort(simplex: &mut [Vertex]) {
    simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
}
