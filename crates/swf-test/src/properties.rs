//! Invariant checks
//!
//! Each check returns `true` when the property holds, so scenario runs can
//! count violations instead of stopping at the first one.

use nalgebra::DMatrix;
use swf_core::SwfResult;
use swf_mesh::Mesh;
use swf_panner::PanWeights;
use swf_wavelet::Model;

fn identity_error(m: &DMatrix<f64>) -> f64 {
    (m - DMatrix::<f64>::identity(m.nrows(), m.ncols())).amax()
}

/// Property: every level's filters satisfy `A·P = I`, `B·Q = I`, `A·Q = 0`, `B·P = 0`
pub fn filters_biorthogonal(model: &Model, tolerance: f64) -> bool {
    model.biorthogonality_error() < tolerance
}

/// Property: `phi2(j)·phi(j) = I` and `psi2(j)·psi(j) = I` at every truncation level
pub fn composites_biorthogonal(model: &Model, tolerance: f64) -> SwfResult<bool> {
    for j in 0..model.depth() {
        let scaling = model.phi2(j)? * model.phi(j)?;
        let wavelet = model.psi2(j)? * model.psi(j)?;
        if identity_error(&scaling) >= tolerance || identity_error(&wavelet) >= tolerance {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Property: one new vertex per parent edge, four children per parent face
pub fn counting_law_holds(parent: &Mesh, child: &Mesh) -> bool {
    child.vertex_count() == parent.vertex_count() + parent.edge_count()
        && child.face_count() == 4 * parent.face_count()
        && child.level() == parent.level() + 1
}

/// Property: weights lie in `[0, 1]` and sum to 1
pub fn partition_of_unity(weights: &PanWeights, tolerance: f64) -> bool {
    (weights.sum() - 1.0).abs() < tolerance
        && weights
            .weights
            .iter()
            .all(|&w| (-tolerance..=1.0 + tolerance).contains(&w))
}
