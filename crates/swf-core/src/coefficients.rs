//! Lifting coefficients
//!
//! `alpha`, `beta` and `gamma` weight the first, second and third coarse
//! neighbor rings of a detail vertex in the update operator; `lambda` scales
//! the prediction operator. The update weights must satisfy the closure
//! relation `2a + 2b + 4c = 1`.

use serde::{Deserialize, Serialize};

use crate::{SwfError, SwfResult};

/// Absolute tolerance on `2a + 2b + 4c - 1`
pub const CLOSURE_TOLERANCE: f64 = 1e-5;

/// Default prediction weight
pub const DEFAULT_LAMBDA: f64 = 1.0 / 6.0;

/// Validated lifting coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoefficients", into = "RawCoefficients")]
pub struct LiftingCoefficients {
    alpha: f64,
    beta: f64,
    gamma: f64,
    lambda: f64,
}

impl LiftingCoefficients {
    /// Create coefficients with the default `lambda`
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> SwfResult<Self> {
        Self::with_lambda(alpha, beta, gamma, DEFAULT_LAMBDA)
    }

    /// Create coefficients, rejecting any that violate closure
    pub fn with_lambda(alpha: f64, beta: f64, gamma: f64, lambda: f64) -> SwfResult<Self> {
        let sum = closure_sum(alpha, beta, gamma);
        if !sum.is_finite() || (sum - 1.0).abs() > CLOSURE_TOLERANCE {
            return Err(SwfError::InvalidParameters { sum });
        }
        Ok(Self {
            alpha,
            beta,
            gamma,
            lambda,
        })
    }

    /// Coefficients from the two free parameters, `gamma` derived from closure
    pub fn from_free(alpha: f64, beta: f64) -> SwfResult<Self> {
        Self::new(alpha, beta, derive_gamma(alpha, beta))
    }

    /// Same update weights, different prediction weight
    pub fn with_prediction(self, lambda: f64) -> Self {
        Self { lambda, ..self }
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// `2a + 2b + 4c`
    pub fn closure_sum(&self) -> f64 {
        closure_sum(self.alpha, self.beta, self.gamma)
    }
}

impl Default for LiftingCoefficients {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.125,
            gamma: -0.0625,
            lambda: DEFAULT_LAMBDA,
        }
    }
}

/// `2a + 2b + 4c`
#[inline]
pub fn closure_sum(alpha: f64, beta: f64, gamma: f64) -> f64 {
    2.0 * alpha + 2.0 * beta + 4.0 * gamma
}

/// The `gamma` that closes `(alpha, beta)`
#[inline]
pub fn derive_gamma(alpha: f64, beta: f64) -> f64 {
    (1.0 - 2.0 * (alpha + beta)) / 4.0
}

/// Unvalidated wire shape for serde
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoefficients {
    alpha: f64,
    beta: f64,
    gamma: f64,
    #[serde(default = "default_lambda")]
    lambda: f64,
}

fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}

impl TryFrom<RawCoefficients> for LiftingCoefficients {
    type Error = SwfError;

    fn try_from(raw: RawCoefficients) -> SwfResult<Self> {
        Self::with_lambda(raw.alpha, raw.beta, raw.gamma, raw.lambda)
    }
}

impl From<LiftingCoefficients> for RawCoefficients {
    fn from(c: LiftingCoefficients) -> Self {
        RawCoefficients {
            alpha: c.alpha,
            beta: c.beta,
            gamma: c.gamma,
            lambda: c.lambda,
        }
    }
}
