//! pagefx - ambient visual effects for a host page
//!
//! Core modules:
//! - `sim`: Seeded simulation of every effect subsystem (no platform deps)
//! - `surface`: Shared canvas and named-element render target
//! - `render`: Writes subsystem state onto the surface
//! - `scheduler`: Cancellable repeating actions (frame loop + fixed intervals)
//! - `engine`: Explicit engine context tying the above together
//! - `platform`: Virtual clock driver (native) and browser host (wasm)
//! - `telemetry`: Install-time environment report, sanitized before sending

pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod render;
pub mod scheduler;
pub mod sim;
pub mod surface;
pub mod telemetry;

pub use config::{EngineConfig, JitterBand, SpeedRange, TelemetryConfig};
pub use engine::Engine;
pub use error::{ConfigError, Error, SurfaceError, TelemetryError};
pub use scheduler::{Action, Cadence, CancelToken, FrameScheduler};

/// Engine tuning defaults
pub mod consts {
    /// Continuous render loop target rate
    pub const FRAME_HZ: f64 = 60.0;
    /// Ambient pulse/glow interval
    pub const AMBIENT_PERIOD_MS: f64 = 50.0;
    /// Glyph rain redraw interval
    pub const RAIN_PERIOD_MS: f64 = 33.0;
    /// Shortest period any repeating action may have
    pub const MIN_PERIOD_MS: f64 = 1.0;

    /// Channel target speed range (MB/s)
    pub const SPEED_MIN: f32 = 4.0;
    pub const SPEED_MAX: f32 = 12.0;
    /// Multiplier band applied to the width increment
    pub const WIDTH_JITTER: (f32, f32) = (0.9, 1.1);
    /// Multiplier band applied to the displayed speed only
    pub const DISPLAY_JITTER: (f32, f32) = (0.85, 1.15);
    /// Per-tick chance that every channel picks a new target speed
    pub const RESAMPLE_PROBABILITY: f64 = 0.2;
    /// Divisor turning speed x seconds into reported volume
    pub const VOLUME_DIVISOR: f64 = 8.0;

    /// Pulse phase step per ambient tick (radians)
    pub const PULSE_STEP: f32 = 0.02;
    /// Glow phase step per ambient tick
    pub const GLOW_STEP: f32 = 0.1;
    /// Glow phase wraps at this value
    pub const GLOW_PERIOD: f32 = 100.0;

    /// Glyph cell size in pixels (also the font size)
    pub const CELL_SIZE: f32 = 16.0;
    /// Overlay alpha for the trail effect (lower = longer trails)
    pub const TRAIL_ALPHA: f32 = 0.05;
    /// Chance a column past the bottom restarts at row 0
    pub const COLUMN_RESET_PROBABILITY: f64 = 0.025;

    /// Sprite defaults
    pub const SPRITE_COUNT: usize = 5;
    pub const SPRITE_SIZE: f32 = 100.0;
    /// Max absolute velocity component (pixels per tick)
    pub const SPRITE_MAX_SPEED: f32 = 2.5;
}

/// Format elapsed seconds as `MM:SS` (minutes keep growing past 99)
pub fn format_elapsed(secs: f64) -> String {
    let total = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Wrap a phase into [0, period)
#[inline]
pub fn wrap_phase(value: f32, period: f32) -> f32 {
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs
    if wrapped >= period { 0.0 } else { wrapped }
}
