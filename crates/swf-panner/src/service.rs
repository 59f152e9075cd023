//! Pan service - decoded request in, encoded weights out
//!
//! Transport-agnostic: the host delivers `/position` payloads and sends back
//! whatever `handle` returns. Requests are processed one at a time.

use std::time::{Duration, Instant};

use bytes::Bytes;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use swf_core::{ModelConfig, Point3, SwfError, SwfResult};
use swf_mesh::{BaseMesh, BasePreset};
use swf_wavelet::Model;
use tracing::{debug, info, warn};

use crate::{InterpolationEngine, InterpolationPayload, PanWeights, Payload, PayloadKind};

/// Pan service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanServiceConfig {
    /// Base preset, written by short name (`OCT`, `3.0.1`, `7.0.4`)
    pub base: BasePreset,
    /// Replace `model.coefficients` with the preset's tuned coefficients
    pub tuned_coefficients: bool,
    pub model: ModelConfig,
    /// Decimation for batch requests
    pub hop_size: usize,
}

impl Default for PanServiceConfig {
    fn default() -> Self {
        Self {
            base: BasePreset::Octahedron,
            tuned_coefficients: false,
            model: ModelConfig::default(),
            hop_size: 1,
        }
    }
}

impl PanServiceConfig {
    /// Model configuration after applying the preset's tuned coefficients
    pub fn resolve(&self) -> SwfResult<(BasePreset, ModelConfig)> {
        let mut model = self.model;
        if self.tuned_coefficients {
            model.coefficients = self.base.tuned_coefficients()?;
        }
        Ok((self.base, model))
    }
}

/// Service counters
#[derive(Clone, Debug, Default)]
pub struct PanStats {
    pub requests: u64,
    pub responses: u64,
    pub rejected_payloads: u64,
    pub failed_queries: u64,
    pub batch_queries: u64,
    pub last_request_duration: Duration,
}

/// Synchronous pan service
#[derive(Debug)]
pub struct PanService {
    config: PanServiceConfig,
    model: Model,
    engine: InterpolationEngine,
    stats: PanStats,
}

impl PanService {
    /// Build the model described by `config`
    pub fn new(config: PanServiceConfig) -> SwfResult<Self> {
        if config.hop_size == 0 {
            return Err(SwfError::InvalidHopSize);
        }
        let (preset, model_config) = config.resolve()?;
        let model = Model::build(&BaseMesh::Preset(preset), &model_config)?;
        info!(
            base = preset.name(),
            depth = model.depth(),
            vertices = model.finest().vertex_count(),
            "pan service ready"
        );
        Ok(Self::with_model(model, config))
    }

    /// Serve an already built model
    pub fn with_model(model: Model, config: PanServiceConfig) -> Self {
        let engine = InterpolationEngine::from_model(&model);
        Self {
            config,
            model,
            engine,
            stats: PanStats::default(),
        }
    }

    pub fn config(&self) -> &PanServiceConfig {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn engine(&self) -> &InterpolationEngine {
        &self.engine
    }

    pub fn stats(&self) -> &PanStats {
        &self.stats
    }

    /// Weights for one direction
    pub fn pan(&mut self, direction: &Point3) -> SwfResult<PanWeights> {
        self.engine.weights(direction).map_err(|e| {
            self.stats.failed_queries += 1;
            e
        })
    }

    /// Dense weights for a batch, decimated by the configured hop size
    pub fn pan_batch(&mut self, directions: &[Point3]) -> SwfResult<DMatrix<f64>> {
        self.stats.batch_queries += directions.len() as u64;
        self.engine
            .interpolate(directions, self.config.hop_size)
            .map_err(|e| {
                self.stats.failed_queries += 1;
                e
            })
    }

    /// Decode a `/position` payload and encode the `/interpolation` reply
    pub fn handle(&mut self, request: &[u8]) -> SwfResult<Bytes> {
        let start = Instant::now();
        self.stats.requests += 1;

        let position = match Payload::decode(request) {
            Ok(Payload::Position(position)) => position,
            Ok(other) => {
                self.stats.rejected_payloads += 1;
                warn!(kind = other.kind().address(), "expected a position payload");
                return Err(SwfError::InvalidPayload(format!(
                    "expected {}, got {}",
                    PayloadKind::Position.address(),
                    other.kind().address()
                )));
            }
            Err(e) => {
                self.stats.rejected_payloads += 1;
                warn!(error = %e, len = request.len(), "rejected payload");
                return Err(e);
            }
        };

        let direction = position.direction();
        let weights = self.pan(&direction)?;
        debug!(
            azimuth = position.azimuth_deg,
            colatitude = position.colatitude_deg,
            face = weights.face,
            "panned"
        );

        let dense = weights.to_dense(self.engine.vertex_count());
        let reply = Payload::Interpolation(InterpolationPayload::from_dense(&dense)).encode();
        self.stats.responses += 1;
        self.stats.last_request_duration = start.elapsed();
        Ok(reply)
    }
}
