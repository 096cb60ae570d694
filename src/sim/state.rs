//! Engine state and shared simulation types
//!
//! `EngineState` is the explicit context every tick function receives. It
//! starts `Uninitialized` and becomes `Running` once `init` has built the
//! subsystems for a viewport.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticleField;
use super::phase::PhaseAccumulator;
use super::progress::ProgressChannelSet;
use super::sprites::SpritePhysicsSet;
use crate::config::EngineConfig;

/// Addressable surface dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Negative or non-finite dimensions collapse to zero
    pub fn sanitized(self) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: clean(self.width),
            height: clean(self.height),
        }
    }
}

/// Engine lifecycle (there is no pause and no terminal state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Constructed, nothing allocated yet
    Uninitialized,
    /// Subsystems exist and ticks advance them
    Running,
}

/// Independent RNG stream per subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngStream {
    Progress = 1,
    Rain = 2,
    Sprites = 3,
}

/// Derives per-subsystem generators from the run seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngStreams {
    pub seed: u64,
}

impl RngStreams {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self, stream: RngStream) -> Pcg32 {
        Pcg32::new(self.seed, stream as u64)
    }
}

/// Every subsystem's state slice
#[derive(Debug, Clone)]
pub struct Subsystems {
    pub progress: ProgressChannelSet,
    pub ambient: PhaseAccumulator,
    pub rain: ParticleField,
    pub sprites: SpritePhysicsSet,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct EngineState {
    pub config: EngineConfig,
    pub rng: RngStreams,
    /// Surface size as of the last resize
    pub viewport: Viewport,
    /// Host clock reading (ms) at init
    pub started_at_ms: f64,
    /// Populated by `init`
    pub subsystems: Option<Subsystems>,
}

impl EngineState {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            rng: RngStreams::new(seed),
            viewport: Viewport::default(),
            started_at_ms: 0.0,
            subsystems: None,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        if self.subsystems.is_some() {
            EnginePhase::Running
        } else {
            EnginePhase::Uninitialized
        }
    }

    /// Uninitialized -> Running. A second call is a no-op.
    pub fn init(&mut self, viewport: Viewport, now_ms: f64) {
        if self.subsystems.is_some() {
            log::debug!("Engine already running, init ignored");
            return;
        }
        let viewport = viewport.sanitized();
        let config = &self.config;

        let progress = ProgressChannelSet::new(config, self.rng.to_rng(RngStream::Progress));
        let ambient =
            PhaseAccumulator::new(config.pulse_step, config.glow_step, config.glow_period);
        let rain = ParticleField::new(
            viewport,
            config.cell_size,
            config.column_reset_probability,
            self.rng.to_rng(RngStream::Rain),
        );
        let sprites = SpritePhysicsSet::new(
            config.sprite_count,
            viewport,
            config.sprite_size,
            config.sprite_max_speed,
            self.rng.to_rng(RngStream::Sprites),
        );

        self.viewport = viewport;
        self.started_at_ms = now_ms;
        self.subsystems = Some(Subsystems {
            progress,
            ambient,
            rain,
            sprites,
        });
        log::info!(
            "Engine initialized: {} channels, {} columns, {} sprites at {}x{}",
            self.config.channel_count(),
            self.subsystems.as_ref().map_or(0, |s| s.rain.columns().len()),
            self.config.sprite_count,
            viewport.width,
            viewport.height
        );
    }

    /// Apply new surface dimensions. Only the particle field is rebuilt.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport.sanitized();
        if let Some(sys) = self.subsystems.as_mut() {
            sys.rain.resize(self.viewport);
        }
    }

    /// Seconds since `init` for a host clock reading
    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_at_ms) / 1000.0).max(0.0)
    }
}
