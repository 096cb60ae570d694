//! Engine tunables
//!
//! Everything is fixed at construction time. There is no config file; hosts
//! build an `EngineConfig` (usually `Default`) and hand it to `Engine::new`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Multiplicative randomization band applied to a base rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterBand {
    pub lo: f32,
    pub hi: f32,
}

impl JitterBand {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    /// Draw a multiplier uniformly from [lo, hi]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.random_range(self.lo..=self.hi)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.lo && value <= self.hi
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.lo.is_finite() && self.hi.is_finite() && self.lo > 0.0 && self.lo <= self.hi {
            Ok(())
        } else {
            Err(ConfigError::InvalidJitterBand {
                name,
                lo: self.lo,
                hi: self.hi,
            })
        }
    }
}

/// Half-open range a channel's target speed is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.random_range(self.min..self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }
}

/// All engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // === Scheduling ===
    /// Continuous render loop target rate
    pub frame_hz: f64,
    /// Ambient pulse/glow interval (ms)
    pub ambient_period_ms: f64,
    /// Glyph rain interval (ms)
    pub rain_period_ms: f64,

    // === Progress channels ===
    /// One channel per title
    pub channel_titles: Vec<String>,
    pub speed_range: SpeedRange,
    pub width_jitter: JitterBand,
    pub display_jitter: JitterBand,
    pub resample_probability: f64,

    // === Ambient ===
    pub pulse_step: f32,
    pub glow_step: f32,
    pub glow_period: f32,

    // === Glyph rain ===
    pub cell_size: f32,
    pub trail_alpha: f32,
    pub column_reset_probability: f64,

    // === Sprites ===
    pub sprite_count: usize,
    pub sprite_size: f32,
    pub sprite_max_speed: f32,
    /// Image shown for each sprite; plain blocks when unset
    pub sprite_image: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_hz: FRAME_HZ,
            ambient_period_ms: AMBIENT_PERIOD_MS,
            rain_period_ms: RAIN_PERIOD_MS,

            channel_titles: vec!["Cache".into(), "Index".into(), "Assets".into()],
            speed_range: SpeedRange {
                min: SPEED_MIN,
                max: SPEED_MAX,
            },
            width_jitter: JitterBand::new(WIDTH_JITTER.0, WIDTH_JITTER.1),
            display_jitter: JitterBand::new(DISPLAY_JITTER.0, DISPLAY_JITTER.1),
            resample_probability: RESAMPLE_PROBABILITY,

            pulse_step: PULSE_STEP,
            glow_step: GLOW_STEP,
            glow_period: GLOW_PERIOD,

            cell_size: CELL_SIZE,
            trail_alpha: TRAIL_ALPHA,
            column_reset_probability: COLUMN_RESET_PROBABILITY,

            sprite_count: SPRITE_COUNT,
            sprite_size: SPRITE_SIZE,
            sprite_max_speed: SPRITE_MAX_SPEED,
            sprite_image: None,
        }
    }
}

impl EngineConfig {
    /// Number of progress channels
    pub fn channel_count(&self) -> usize {
        self.channel_titles.len()
    }

    /// Check every tunable; the engine refuses to start on invalid values
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("frame_hz", self.frame_hz)?;
        positive("ambient_period_ms", self.ambient_period_ms)?;
        positive("rain_period_ms", self.rain_period_ms)?;
        min_period("frame_hz", 1000.0 / self.frame_hz)?;
        min_period("ambient_period_ms", self.ambient_period_ms)?;
        min_period("rain_period_ms", self.rain_period_ms)?;

        if self.channel_titles.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        let SpeedRange { min, max } = self.speed_range;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(ConfigError::InvalidSpeedRange { min, max });
        }
        self.width_jitter.validate("width_jitter")?;
        self.display_jitter.validate("display_jitter")?;
        probability("resample_probability", self.resample_probability)?;

        positive("pulse_step", self.pulse_step as f64)?;
        positive("glow_step", self.glow_step as f64)?;
        positive("glow_period", self.glow_period as f64)?;

        positive("cell_size", self.cell_size as f64)?;
        if !(self.trail_alpha > 0.0 && self.trail_alpha <= 1.0) {
            return Err(ConfigError::InvalidProbability {
                name: "trail_alpha",
                value: self.trail_alpha as f64,
            });
        }
        probability("column_reset_probability", self.column_reset_probability)?;

        positive("sprite_size", self.sprite_size as f64)?;
        if !(self.sprite_max_speed.is_finite() && self.sprite_max_speed >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "sprite_max_speed",
                value: self.sprite_max_speed as f64,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Periods below the minimum would re-arm at the same clock reading
fn min_period(name: &'static str, period_ms: f64) -> Result<(), ConfigError> {
    if period_ms >= MIN_PERIOD_MS {
        Ok(())
    } else {
        Err(ConfigError::PeriodTooShort { name, period_ms })
    }
}

fn probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

/// Where the install-time environment report goes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Reporting is disabled when unset
    pub endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.channel_count(), 3);
    }

    #[test]
    fn test_rejects_inverted_jitter_band() {
        let config = EngineConfig {
            width_jitter: JitterBand::new(1.1, 0.9),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidJitterBand { name: "width_jitter", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let no_channels = EngineConfig {
            channel_titles: Vec::new(),
            ..Default::default()
        };
        assert_eq!(no_channels.validate(), Err(ConfigError::NoChannels));

        let bad_probability = EngineConfig {
            resample_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad_probability.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));

        let zero_cell = EngineConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_cell.validate(),
            Err(ConfigError::NonPositive { name: "cell_size", .. })
        ));

        let empty_speed = EngineConfig {
            speed_range: SpeedRange { min: 5.0, max: 5.0 },
            ..Default::default()
        };
        assert!(matches!(
            empty_speed.validate(),
            Err(ConfigError::InvalidSpeedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_sub_millisecond_periods() {
        let fast_frames = EngineConfig {
            frame_hz: 1e300,
            ..Default::default()
        };
        assert!(matches!(
            fast_frames.validate(),
            Err(ConfigError::PeriodTooShort { name: "frame_hz", .. })
        ));

        let fast_rain = EngineConfig {
            rain_period_ms: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            fast_rain.validate(),
            Err(ConfigError::PeriodTooShort { name: "rain_period_ms", .. })
        ));

        let limit = EngineConfig {
            frame_hz: 1000.0,
            ambient_period_ms: 1.0,
            ..Default::default()
        };
        assert_eq!(limit.validate(), Ok(()));
    }

    #[test]
    fn test_jitter_samples_stay_in_band() {
        let band = JitterBand::new(0.9, 1.1);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(band.contains(band.sample(&mut rng)));
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = EngineConfig {
            sprite_image: Some("sprite.png".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
