//! Scenario harness - seeded end-to-end runs
//!
//! A scenario builds a model over one base preset, checks the filter and
//! composite invariants, then pans a batch of random directions and checks
//! every weight vector.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swf_core::{LiftingVariant, ModelConfig, Point3, SwfResult};
use swf_mesh::{BaseMesh, BasePreset};
use swf_panner::InterpolationEngine;
use swf_wavelet::Model;
use tracing::{debug, warn};

use crate::properties;

/// Scenario configuration
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub preset: BasePreset,
    /// Subdivision depth
    pub depth: usize,
    pub variant: LiftingVariant,
    /// Random directions to pan
    pub query_count: usize,
    /// Decimation for the batch run
    pub hop_size: usize,
    /// Query radius range; directions need not be unit length
    pub radius: (f64, f64),
    /// Tolerance for every invariant
    pub tolerance: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            preset: BasePreset::Octahedron,
            depth: 2,
            variant: LiftingVariant::Modified,
            query_count: 64,
            hop_size: 1,
            radius: (0.5, 2.0),
            tolerance: 1e-9,
            seed: 42,
        }
    }
}

impl ScenarioConfig {
    /// Quick run for unit tests
    pub fn light() -> Self {
        ScenarioConfig {
            depth: 1,
            query_count: 16,
            ..Default::default()
        }
    }

    /// Deeper mesh, more queries
    pub fn heavy() -> Self {
        ScenarioConfig {
            depth: 3,
            query_count: 1000,
            hop_size: 4,
            tolerance: 1e-8,
            ..Default::default()
        }
    }

    pub fn with_preset(mut self, preset: BasePreset) -> Self {
        self.preset = preset;
        self
    }
}

/// Scenario outcome
#[derive(Clone, Debug, Default)]
pub struct ScenarioResult {
    pub vertices: usize,
    pub faces: usize,
    pub biorthogonality_error: f64,
    pub filter_violations: u32,
    pub composite_violations: u32,
    pub counting_violations: u32,
    pub unity_violations: u32,
    pub failed_queries: u32,
    pub queries: usize,
}

impl ScenarioResult {
    pub fn is_valid(&self) -> bool {
        self.filter_violations == 0
            && self.composite_violations == 0
            && self.counting_violations == 0
            && self.unity_violations == 0
            && self.failed_queries == 0
    }
}

/// Runs one scenario
pub struct ScenarioRunner {
    config: ScenarioConfig,
    rng: StdRng,
}

impl ScenarioRunner {
    pub fn new(config: ScenarioConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Uniform direction on the sphere, scaled into the radius range
    pub fn random_direction(&mut self) -> Point3 {
        let z: f64 = self.rng.gen_range(-1.0..=1.0);
        let phi: f64 = self.rng.gen_range(0.0..TAU);
        let (lo, hi) = self.config.radius;
        let radius = if hi > lo { self.rng.gen_range(lo..hi) } else { lo };
        let r = (1.0 - z * z).max(0.0).sqrt();
        Point3::new(r * phi.cos(), r * phi.sin(), z) * radius
    }

    /// Build, check and pan
    pub fn run(&mut self) -> SwfResult<ScenarioResult> {
        let model_config = ModelConfig::default()
            .with_depth(self.config.depth)
            .with_variant(self.config.variant);
        let model = Model::build(&BaseMesh::Preset(self.config.preset), &model_config)?;
        let tolerance = self.config.tolerance;

        let mut result = ScenarioResult {
            vertices: model.finest().vertex_count(),
            faces: model.finest().face_count(),
            biorthogonality_error: model.biorthogonality_error(),
            ..Default::default()
        };

        if !properties::filters_biorthogonal(&model, tolerance) {
            result.filter_violations += 1;
        }
        if !properties::composites_biorthogonal(&model, tolerance)? {
            result.composite_violations += 1;
        }
        for pair in model.chain().windows(2) {
            if !properties::counting_law_holds(pair[0].mesh(), pair[1].mesh()) {
                result.counting_violations += 1;
            }
        }

        let engine = InterpolationEngine::from_model(&model);
        let directions: Vec<Point3> = (0..self.config.query_count)
            .map(|_| self.random_direction())
            .collect();
        for direction in &directions {
            result.queries += 1;
            match engine.weights(direction) {
                Ok(weights) if properties::partition_of_unity(&weights, tolerance) => {}
                Ok(weights) => {
                    warn!(?direction, ?weights, "weights do not partition unity");
                    result.unity_violations += 1;
                }
                Err(e) => {
                    warn!(?direction, error = %e, "query failed");
                    result.failed_queries += 1;
                }
            }
        }

        let batch = engine.interpolate(&directions, self.config.hop_size)?;
        for (col, column) in batch.column_iter().enumerate() {
            if (column.sum() - 1.0).abs() >= tolerance {
                debug!(col, sum = column.sum(), "batch column off unity");
                result.unity_violations += 1;
            }
        }

        Ok(result)
    }
}

/// Run `config` once per preset
pub fn run_all_presets(config: &ScenarioConfig) -> SwfResult<Vec<(BasePreset, ScenarioResult)>> {
    BasePreset::all()
        .iter()
        .map(|&preset| {
            let result = ScenarioRunner::new(config.clone().with_preset(preset)).run()?;
            Ok((preset, result))
        })
        .collect()
}
