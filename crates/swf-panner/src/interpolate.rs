//! Interpolation engine
//!
//! Maps a direction to weights on the three corners of the nearest face of the
//! finest mesh. The query is projected onto the face plane and each corner is
//! weighted by the area of the sub-triangle opposite it. Weights are
//! renormalized so that they sum to 1 even when the projection falls outside
//! the face.

use nalgebra::{DMatrix, DVector};
use swf_core::{triangle_area, unit_normal, Point3, SwfError, SwfResult, AREA_EPSILON};
use swf_mesh::Mesh;
use swf_wavelet::Model;
use tracing::warn;

use crate::{nearest_face, NearestFace};

/// Sparse weights of one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanWeights {
    /// Index of the winning face
    pub face: usize,
    /// Corner vertex indices, in face order
    pub vertices: [usize; 3],
    /// Corner weights, summing to 1
    pub weights: [f64; 3],
}

impl PanWeights {
    /// Scatter into a vector over all `vertex_count` vertices
    pub fn to_dense(&self, vertex_count: usize) -> DVector<f64> {
        let mut dense = DVector::zeros(vertex_count);
        for (&v, &w) in self.vertices.iter().zip(&self.weights) {
            dense[v] += w;
        }
        dense
    }

    fn scatter(&self, out: &mut DMatrix<f64>, col: usize) {
        for (&v, &w) in self.vertices.iter().zip(&self.weights) {
            out[(v, col)] += w;
        }
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Real-time direction interpolation over a fixed mesh
#[derive(Debug, Clone)]
pub struct InterpolationEngine {
    mesh: Mesh,
}

impl InterpolationEngine {
    pub fn new(mesh: Mesh) -> Self {
        Self { mesh }
    }

    /// Engine over a model's finest mesh
    pub fn from_model(model: &Model) -> Self {
        Self::new(model.finest().clone())
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Nearest face to `direction`
    pub fn locate(&self, direction: &Point3) -> SwfResult<NearestFace> {
        nearest_face(&self.mesh, direction)
    }

    /// Sparse weights for one direction
    pub fn weights(&self, direction: &Point3) -> SwfResult<PanWeights> {
        if !direction.iter().all(|c| c.is_finite()) {
            return Err(SwfError::DegenerateGeometry(format!(
                "non-finite query {direction:?}"
            )));
        }
        let hit = self.locate(direction)?;
        let vertices = self.mesh.faces()[hit.face];
        let [p, q, r] = self.mesh.triangle(hit.face);

        let area = triangle_area(&p, &q, &r);
        let normal = match unit_normal(&p, &q, &r) {
            Some(n) if area > AREA_EPSILON => n,
            _ => {
                warn!(face = hit.face, area, "nearest face is degenerate");
                return Err(SwfError::DegenerateGeometry(format!(
                    "face {} has zero area",
                    hit.face
                )));
            }
        };

        let s = direction - normal * (direction - p).dot(&normal);
        let raw = [
            triangle_area(&s, &q, &r) / area,
            triangle_area(&p, &s, &r) / area,
            triangle_area(&p, &q, &s) / area,
        ];
        let total: f64 = raw.iter().sum();
        let weights = raw.map(|w| w / total);

        Ok(PanWeights {
            face: hit.face,
            vertices,
            weights,
        })
    }

    /// Dense weights for a batch of directions, `vertex_count × directions.len()`.
    ///
    /// Only every `hop_size`-th direction is computed; the directions in
    /// between reuse the last computed column.
    pub fn interpolate(&self, directions: &[Point3], hop_size: usize) -> SwfResult<DMatrix<f64>> {
        if hop_size == 0 {
            return Err(SwfError::InvalidHopSize);
        }

        let n = self.vertex_count();
        let mut out = DMatrix::zeros(n, directions.len());
        let mut current: Option<PanWeights> = None;
        for (col, direction) in directions.iter().enumerate() {
            if col % hop_size == 0 {
                current = Some(self.weights(direction)?);
            }
            if let Some(w) = &current {
                w.scatter(&mut out, col);
            }
        }
        Ok(out)
    }
}
