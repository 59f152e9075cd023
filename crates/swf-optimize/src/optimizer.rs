//! Coefficient optimizer
//!
//! Searches the two free lifting parameters `(alpha, beta)`, closing `gamma`
//! at every trial, for the model with the lowest panning cost. Each objective
//! evaluation is a full model build.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use swf_core::{
    derive_gamma, LiftingCoefficients, LiftingVariant, ModelConfig, Projection, SwfError,
    SwfResult, DEFAULT_LAMBDA,
};
use swf_mesh::BaseMesh;
use swf_wavelet::Model;
use tracing::{debug, info, warn};

use crate::{panning_cost, CostWeights, NelderMead, NelderMeadConfig};

/// Starting point of the search, `(alpha, beta)`
pub const INITIAL_GUESS: [f64; 2] = [0.5, 0.0];

/// Optimizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    #[serde(flatten)]
    pub search: NelderMeadConfig,
    /// Starting `(alpha, beta)`
    pub initial_guess: [f64; 2],
    /// Prediction weight held fixed during the search
    pub lambda: f64,
    pub variant: LiftingVariant,
    pub projection: Projection,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            search: NelderMeadConfig::default(),
            initial_guess: INITIAL_GUESS,
            lambda: DEFAULT_LAMBDA,
            variant: LiftingVariant::default(),
            projection: Projection::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.search.max_iterations = max_iterations;
        self
    }
}

/// One trial: candidate parameters, the model they build and its cost
#[derive(Debug, Clone)]
pub struct OptimizationState {
    pub alpha: f64,
    pub beta: f64,
    /// `(1 - 2(alpha + beta)) / 4`
    pub gamma: f64,
    pub model: Model,
    pub cost: f64,
}

impl OptimizationState {
    /// Build and score the model for `(alpha, beta)`
    pub fn evaluate(
        base: &BaseMesh,
        depth: usize,
        level: usize,
        weights: &CostWeights,
        config: &OptimizerConfig,
        alpha: f64,
        beta: f64,
    ) -> SwfResult<Self> {
        let gamma = derive_gamma(alpha, beta);
        let coefficients = LiftingCoefficients::with_lambda(alpha, beta, gamma, config.lambda)?;
        let model_config = ModelConfig {
            depth,
            coefficients,
            variant: config.variant,
            projection: config.projection,
        };
        let model = Model::build(base, &model_config)?;
        let cost = panning_cost(&model, level, weights)?;
        Ok(Self {
            alpha,
            beta,
            gamma,
            model,
            cost,
        })
    }

    pub fn coefficients(&self) -> &LiftingCoefficients {
        self.model.coefficients()
    }
}

/// Best coefficients found and the model built from them
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub coefficients: LiftingCoefficients,
    pub cost: f64,
    /// Cost at the initial guess
    pub initial_cost: f64,
    pub iterations: usize,
    pub converged: bool,
    pub model: Model,
}

/// Searches lifting coefficients for minimal panning cost
#[derive(Debug, Clone, Copy, Default)]
pub struct CoefficientOptimizer {
    config: OptimizerConfig,
}

impl CoefficientOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Minimize the cost of encoding finest-level sources down to `level`
    /// over models of the given `depth`
    pub fn optimize(
        &self,
        base: &BaseMesh,
        depth: usize,
        weights: CostWeights,
        level: usize,
    ) -> SwfResult<OptimizationOutcome> {
        if depth == 0 {
            return Err(SwfError::InvalidDepth(depth));
        }
        if level >= depth {
            return Err(SwfError::LevelOutOfRange { level, depth });
        }

        let [alpha0, beta0] = self.config.initial_guess;
        let initial = OptimizationState::evaluate(
            base,
            depth,
            level,
            &weights,
            &self.config,
            alpha0,
            beta0,
        )?;
        let initial_cost = initial.cost;
        debug!(alpha = alpha0, beta = beta0, cost = initial_cost, "initial guess");

        let mut best = initial;
        let minimizer = NelderMead::new(self.config.search);
        let minimum = minimizer.minimize(DVector::from_vec(vec![alpha0, beta0]), |x| {
            let state = OptimizationState::evaluate(
                base,
                depth,
                level,
                &weights,
                &self.config,
                x[0],
                x[1],
            )?;
            let cost = state.cost;
            if cost < best.cost {
                best = state;
            }
            Ok(cost)
        })?;

        if !minimum.converged {
            warn!(
                iterations = minimum.iterations,
                cost = best.cost,
                "coefficient search stopped before converging"
            );
        }
        info!(
            alpha = best.alpha,
            beta = best.beta,
            gamma = best.gamma,
            cost = best.cost,
            initial_cost,
            evaluations = minimum.evaluations,
            "coefficient search finished"
        );

        Ok(OptimizationOutcome {
            coefficients: *best.coefficients(),
            cost: best.cost,
            initial_cost,
            iterations: minimum.iterations,
            converged: minimum.converged,
            model: best.model,
        })
    }
}
