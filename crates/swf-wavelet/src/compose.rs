//! Cross-level composition and encoding
//!
//! With `k` indexing the filters that take mesh `k` to mesh `k + 1`:
//!
//! - `phi(j)  = P_{n-1} ... P_j`
//! - `psi(j)  = P_{n-1} ... P_{j+1} Q_j`
//! - `phi2(j) = A_j ... A_{n-1}`
//! - `psi2(j) = B_j A_{j+1} ... A_{n-1}`
//!
//! Each product is built from the next level's composite and cached in the
//! model, so a full sweep over `j` costs one multiplication per level.

use std::sync::OnceLock;

use nalgebra::{DMatrix, DVector};
use swf_core::{SwfError, SwfResult};

use crate::Model;

/// Return the cached value, or compute and cache it
fn memoized<'a>(
    slot: &'a OnceLock<DMatrix<f64>>,
    compute: impl FnOnce() -> SwfResult<DMatrix<f64>>,
) -> SwfResult<&'a DMatrix<f64>> {
    if let Some(value) = slot.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(slot.get_or_init(|| value))
}

impl Model {
    fn check_level(&self, level: usize) -> SwfResult<()> {
        if level >= self.depth() {
            return Err(SwfError::LevelOutOfRange {
                level,
                depth: self.depth(),
            });
        }
        Ok(())
    }

    fn is_last(&self, level: usize) -> bool {
        level + 1 == self.depth()
    }

    /// Direct scaling operator, finest × `N_level`
    pub fn phi(&self, level: usize) -> SwfResult<&DMatrix<f64>> {
        self.check_level(level)?;
        memoized(&self.composites[level].phi, || {
            let p = &self.filters(level)?.p;
            if self.is_last(level) {
                Ok(p.clone())
            } else {
                Ok(self.phi(level + 1)? * p)
            }
        })
    }

    /// Direct wavelet operator, finest × `m_level`
    pub fn psi(&self, level: usize) -> SwfResult<&DMatrix<f64>> {
        self.check_level(level)?;
        memoized(&self.composites[level].psi, || {
            let q = &self.filters(level)?.q;
            if self.is_last(level) {
                Ok(q.clone())
            } else {
                Ok(self.phi(level + 1)? * q)
            }
        })
    }

    /// Dual scaling operator, `N_level` × finest
    pub fn phi2(&self, level: usize) -> SwfResult<&DMatrix<f64>> {
        self.check_level(level)?;
        memoized(&self.composites[level].phi2, || {
            let a = &self.filters(level)?.a;
            if self.is_last(level) {
                Ok(a.clone())
            } else {
                Ok(a * self.phi2(level + 1)?)
            }
        })
    }

    /// Dual wavelet operator, `m_level` × finest
    pub fn psi2(&self, level: usize) -> SwfResult<&DMatrix<f64>> {
        self.check_level(level)?;
        memoized(&self.composites[level].psi2, || {
            let b = &self.filters(level)?.b;
            if self.is_last(level) {
                Ok(b.clone())
            } else {
                Ok(b * self.phi2(level + 1)?)
            }
        })
    }

    /// Scaling coefficients of a finest-level signal at `level`
    pub fn encode(&self, signal: &DVector<f64>, level: usize) -> SwfResult<DVector<f64>> {
        let phi2 = self.phi2(level)?;
        self.check_signal(signal)?;
        Ok(phi2 * signal)
    }

    /// Wavelet (detail) coefficients of a finest-level signal at `level`
    pub fn encode_details(&self, signal: &DVector<f64>, level: usize) -> SwfResult<DVector<f64>> {
        let psi2 = self.psi2(level)?;
        self.check_signal(signal)?;
        Ok(psi2 * signal)
    }

    fn check_signal(&self, signal: &DVector<f64>) -> SwfResult<()> {
        let expected = self.finest().vertex_count();
        if signal.len() != expected {
            return Err(SwfError::DimensionMismatch {
                expected,
                actual: signal.len(),
            });
        }
        Ok(())
    }
}
