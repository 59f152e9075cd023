//! Model - base mesh plus a chain of lifted subdivision levels

use std::sync::OnceLock;

use nalgebra::DMatrix;
use swf_core::{LiftingCoefficients, LiftingVariant, ModelConfig, SwfError, SwfResult};
use swf_mesh::{subdivide, BaseMesh, Mesh};
use tracing::{debug, info};

use crate::{FilterBank, Level, LiftingFilterBuilder, SubdividedLevel};

/// Cross-level operators for one truncation level, filled on first use
#[derive(Debug, Clone, Default)]
pub(crate) struct Composites {
    pub(crate) phi: OnceLock<DMatrix<f64>>,
    pub(crate) psi: OnceLock<DMatrix<f64>>,
    pub(crate) phi2: OnceLock<DMatrix<f64>>,
    pub(crate) psi2: OnceLock<DMatrix<f64>>,
}

/// Multiresolution model over a subdivided base mesh.
///
/// `chain()[0]` is the base mesh, `chain()[k]` for `k >= 1` is the mesh after
/// `k` subdivisions together with the filters relating it to `chain()[k - 1]`.
/// Models are immutable once built.
#[derive(Debug, Clone)]
pub struct Model {
    chain: Vec<Level>,
    config: ModelConfig,
    pub(crate) composites: Vec<Composites>,
}

impl Model {
    /// Subdivide `base` `config.depth` times, lifting every level.
    ///
    /// Closure needs no check here: a `LiftingCoefficients` value cannot be
    /// constructed without satisfying it.
    pub fn build(base: &BaseMesh, config: &ModelConfig) -> SwfResult<Self> {
        if config.depth == 0 {
            return Err(SwfError::InvalidDepth(config.depth));
        }

        let builder = LiftingFilterBuilder::new(config.coefficients, config.variant);
        let base = base.resolve(config.projection)?;

        let mut chain = Vec::with_capacity(config.depth + 1);
        let mut current = base.clone();
        chain.push(Level::Base(base));

        for _ in 0..config.depth {
            let sub = subdivide(&current, config.projection)?;
            let filters = builder.build(&sub.adjacency, sub.coarse_count)?;
            debug!(
                level = sub.mesh.level(),
                coarse = filters.coarse_count(),
                detail = filters.detail_count(),
                "lifted level"
            );
            current = sub.mesh.clone();
            chain.push(Level::Subdivided(SubdividedLevel::new(sub.mesh, filters)));
        }

        info!(
            depth = config.depth,
            vertices = current.vertex_count(),
            faces = current.face_count(),
            variant = ?config.variant,
            "built model"
        );

        Ok(Model {
            chain,
            config: *config,
            composites: vec![Composites::default(); config.depth],
        })
    }

    /// Build from raw scalars; fails with `InvalidParameters` when
    /// `2·alpha + 2·beta + 4·gamma != 1`
    #[allow(clippy::too_many_arguments)]
    pub fn from_parameters(
        base: &BaseMesh,
        depth: usize,
        alpha: f64,
        beta: f64,
        gamma: f64,
        lambda: f64,
        variant: LiftingVariant,
    ) -> SwfResult<Self> {
        let coefficients = LiftingCoefficients::with_lambda(alpha, beta, gamma, lambda)?;
        let config = ModelConfig {
            depth,
            coefficients,
            variant,
            ..ModelConfig::default()
        };
        Self::build(base, &config)
    }

    /// Number of subdivision levels
    #[inline]
    pub fn depth(&self) -> usize {
        self.chain.len() - 1
    }

    #[inline]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[inline]
    pub fn coefficients(&self) -> &LiftingCoefficients {
        &self.config.coefficients
    }

    /// Base mesh followed by every subdivided level
    #[inline]
    pub fn chain(&self) -> &[Level] {
        &self.chain
    }

    pub fn base(&self) -> &Mesh {
        self.chain[0].mesh()
    }

    /// The most refined mesh
    pub fn finest(&self) -> &Mesh {
        self.chain[self.chain.len() - 1].mesh()
    }

    /// Mesh after `level` subdivisions, `level` in `0..=depth`
    pub fn mesh(&self, level: usize) -> SwfResult<&Mesh> {
        self.chain
            .get(level)
            .map(Level::mesh)
            .ok_or(SwfError::LevelOutOfRange {
                level,
                depth: self.depth(),
            })
    }

    /// Filters taking mesh `k` to mesh `k + 1`, `k` in `0..depth`
    pub fn filters(&self, k: usize) -> SwfResult<&FilterBank> {
        self.chain
            .get(k + 1)
            .and_then(Level::filters)
            .ok_or(SwfError::LevelOutOfRange {
                level: k,
                depth: self.depth(),
            })
    }

    /// Largest biorthogonality deviation across all levels
    pub fn biorthogonality_error(&self) -> f64 {
        self.chain
            .iter()
            .filter_map(Level::filters)
            .map(FilterBank::biorthogonality_error)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swf_core::Projection;
    use swf_mesh::BasePreset;

    fn octahedron() -> BaseMesh {
        BaseMesh::Preset(BasePreset::Octahedron)
    }

    #[test]
    fn test_octahedron_chain_sizes() {
        let model = Model::build(&octahedron(), &ModelConfig::default().with_depth(2)).unwrap();

        assert_eq!(model.depth(), 2);
        assert!(model.chain()[0].is_base());
        assert!(model.chain()[0].filters().is_none());
        assert_eq!(model.mesh(1).unwrap().vertex_count(), 18);
        assert_eq!(model.mesh(1).unwrap().face_count(), 32);
        assert_eq!(model.finest().vertex_count(), 66);
        assert_eq!(model.finest().face_count(), 128);
        assert_eq!(model.filters(1).unwrap().p.shape(), (66, 18));
        assert!(model.filters(2).is_err());
    }

    #[test]
    fn test_open_coefficients_rejected_before_build() {
        let err = Model::from_parameters(
            &octahedron(),
            2,
            0.5,
            0.125,
            0.0,
            1.0 / 6.0,
            LiftingVariant::Modified,
        )
        .unwrap_err();
        assert!(matches!(err, SwfError::InvalidParameters { .. }));

        let ok = Model::from_parameters(
            &octahedron(),
            2,
            0.5,
            0.125,
            -0.0625,
            1.0 / 6.0,
            LiftingVariant::Modified,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = Model::build(&octahedron(), &ModelConfig::default().with_depth(0)).unwrap_err();
        assert_eq!(err, SwfError::InvalidDepth(0));
    }

    #[test]
    fn test_every_level_biorthogonal() {
        for variant in [LiftingVariant::Classical, LiftingVariant::Modified] {
            let config = ModelConfig::default().with_depth(2).with_variant(variant);
            let model = Model::build(&octahedron(), &config).unwrap();
            assert!(model.biorthogonality_error() < 1e-9, "{variant:?}");
        }
    }

    #[test]
    fn test_flat_projection_keeps_midpoints_planar() {
        let base = Mesh::new(
            vec![
                swf_core::Point3::new(0.0, 0.0, 0.0),
                swf_core::Point3::new(1.0, 0.0, 0.0),
                swf_core::Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let config = ModelConfig::default()
            .with_depth(2)
            .with_projection(Projection::Flat);
        let model = Model::build(&BaseMesh::Custom(base), &config).unwrap();

        assert_eq!(model.finest().vertex_count(), 15);
        assert!(model.finest().vertices().iter().all(|v| v.z == 0.0));
        assert!(model.biorthogonality_error() < 1e-9);
    }
}
