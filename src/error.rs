//! Error types
//!
//! None of these cross the engine boundary into the host page: surface and
//! telemetry failures are logged and swallowed where they happen, config
//! errors are returned from construction.

use thiserror::Error;

/// Rejected engine tunables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("jitter band `{name}` is invalid: [{lo}, {hi}]")]
    InvalidJitterBand { name: &'static str, lo: f32, hi: f32 },

    #[error("speed range must satisfy 0 < min < max, got [{min}, {max})")]
    InvalidSpeedRange { min: f32, max: f32 },

    #[error("probability `{name}` must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("`{name}` must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("`{name}` gives a {period_ms} ms period, below the 1 ms minimum")]
    PeriodTooShort { name: &'static str, period_ms: f64 },

    #[error("at least one progress channel is required")]
    NoChannels,
}

/// Failures writing to the render surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// A named element the engine writes to is absent
    #[error("missing render target `{0}`")]
    MissingTarget(String),

    /// The host rejected an operation
    #[error("host error: {0}")]
    Host(String),
}

/// Failures delivering a telemetry report
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("transport failed: {0}")]
    Transport(String),
}

/// Umbrella error for the public API
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
