//! Simulated progress channels
//!
//! Each channel fills toward 100% at a randomized rate. The speed label is
//! drawn from its own jitter band and is not derived from the width increment,
//! so the displayed rate and the bar never reconcile exactly.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::{EngineConfig, JitterBand, SpeedRange};
use crate::consts::VOLUME_DIVISOR;
use crate::format_elapsed;

/// Upper bound for `displayed_width` (percent)
pub const MAX_WIDTH: f32 = 100.0;

/// One progress meter
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressChannel {
    pub id: usize,
    pub title: String,
    /// Base rate, > 0
    pub target_speed: f32,
    /// Bar fill in [0, 100]
    pub displayed_width: f32,
    /// Decorative rate shown next to the bar
    pub displayed_speed: f32,
}

/// All progress channels plus the shared elapsed clock
#[derive(Debug, Clone)]
pub struct ProgressChannelSet {
    channels: Vec<ProgressChannel>,
    speed_range: SpeedRange,
    width_jitter: JitterBand,
    display_jitter: JitterBand,
    resample_probability: f64,
    elapsed_secs: f64,
    resamples: u64,
    rng: Pcg32,
}

impl ProgressChannelSet {
    pub fn new(config: &EngineConfig, mut rng: Pcg32) -> Self {
        let channels = config
            .channel_titles
            .iter()
            .enumerate()
            .map(|(id, title)| ProgressChannel {
                id,
                title: title.clone(),
                target_speed: config.speed_range.sample(&mut rng),
                displayed_width: 0.0,
                displayed_speed: 0.0,
            })
            .collect();

        Self {
            channels,
            speed_range: config.speed_range,
            width_jitter: config.width_jitter,
            display_jitter: config.display_jitter,
            resample_probability: config.resample_probability,
            elapsed_secs: 0.0,
            resamples: 0,
            rng,
        }
    }

    pub fn channels(&self) -> &[ProgressChannel] {
        &self.channels
    }

    /// Advance every channel one step; `elapsed_secs` is time since start
    pub fn tick(&mut self, elapsed_secs: f64) {
        self.elapsed_secs = elapsed_secs.max(self.elapsed_secs);

        for channel in &mut self.channels {
            let increment = channel.target_speed * self.width_jitter.sample(&mut self.rng);
            channel.displayed_width = (channel.displayed_width + increment).min(MAX_WIDTH);
            channel.displayed_speed =
                channel.target_speed * self.display_jitter.sample(&mut self.rng);
        }

        // Bursty throughput: occasionally every channel picks a new rate
        if self.rng.random_bool(self.resample_probability) {
            self.resample();
        }
    }

    /// Draw a fresh target speed for every channel
    pub fn resample(&mut self) {
        for channel in &mut self.channels {
            channel.target_speed = self.speed_range.sample(&mut self.rng);
        }
        self.resamples += 1;
        log::trace!("Progress speeds resampled ({} total)", self.resamples);
    }

    /// External reset: empty every bar, keep speeds and the clock
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.displayed_width = 0.0;
        }
    }

    pub fn resample_count(&self) -> u64 {
        self.resamples
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Elapsed time as `MM:SS`
    pub fn elapsed_total(&self) -> String {
        format_elapsed(self.elapsed_secs)
    }

    /// Σ(target_speed × elapsed / 8). Grows for as long as the engine runs.
    pub fn total_simulated_volume(&self) -> f64 {
        self.channels
            .iter()
            .map(|c| c.target_speed as f64 * self.elapsed_secs / VOLUME_DIVISOR)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn channel_set(config: &EngineConfig) -> ProgressChannelSet {
        ProgressChannelSet::new(config, Pcg32::seed_from_u64(1234))
    }

    #[test]
    fn test_initial_speeds_in_range() {
        let config = EngineConfig::default();
        let set = channel_set(&config);
        assert_eq!(set.channels().len(), 3);
        for (i, c) in set.channels().iter().enumerate() {
            assert_eq!(c.id, i);
            assert!(config.speed_range.contains(c.target_speed));
            assert_eq!(c.displayed_width, 0.0);
        }
        assert_eq!(set.channels()[1].title, "Index");
    }

    #[test]
    fn test_width_increment_within_jitter_band() {
        // No resampling so target speeds stay put between ticks
        let config = EngineConfig {
            resample_probability: 0.0,
            speed_range: SpeedRange { min: 0.1, max: 0.2 },
            ..Default::default()
        };
        let mut set = channel_set(&config);

        for tick in 1..=200 {
            let before: Vec<(f32, f32)> = set
                .channels()
                .iter()
                .map(|c| (c.displayed_width, c.target_speed))
                .collect();
            set.tick(tick as f64 / 60.0);

            for (c, (width, speed)) in set.channels().iter().zip(before) {
                let delta = c.displayed_width - width;
                if c.displayed_width < MAX_WIDTH {
                    assert!(delta >= speed * 0.9 - 1e-4, "delta {delta} below band");
                    assert!(delta <= speed * 1.1 + 1e-4, "delta {delta} above band");
                }
                let ratio = c.displayed_speed / speed;
                assert!((0.85 - 1e-4..=1.15 + 1e-4).contains(&ratio));
            }
        }
    }

    #[test]
    fn test_width_clamps_at_100() {
        let config = EngineConfig::default();
        let mut set = channel_set(&config);
        // 12 MB/s max, at least 4 * 0.9 per tick: 30 ticks is plenty
        for tick in 0..30 {
            set.tick(tick as f64);
        }
        for c in set.channels() {
            assert_eq!(c.displayed_width, MAX_WIDTH);
        }
    }

    #[test]
    fn test_reset_empties_bars() {
        let config = EngineConfig::default();
        let mut set = channel_set(&config);
        set.tick(1.0);
        set.reset();
        assert!(set.channels().iter().all(|c| c.displayed_width == 0.0));
        assert_eq!(set.elapsed_secs(), 1.0);
    }

    #[test]
    fn test_resample_always_fires_at_probability_one() {
        let config = EngineConfig {
            resample_probability: 1.0,
            ..Default::default()
        };
        let mut set = channel_set(&config);
        for tick in 0..10 {
            set.tick(tick as f64);
        }
        assert_eq!(set.resample_count(), 10);
        for c in set.channels() {
            assert!(config.speed_range.contains(c.target_speed));
        }
    }

    #[test]
    fn test_resample_rate_is_roughly_configured() {
        let config = EngineConfig::default();
        let mut set = channel_set(&config);
        for tick in 0..5000 {
            set.tick(tick as f64 / 60.0);
        }
        // Expected 1000 at p = 0.2
        let n = set.resample_count();
        assert!((850..=1150).contains(&n), "resampled {n} times");
    }

    #[test]
    fn test_elapsed_label_and_volume() {
        let config = EngineConfig {
            resample_probability: 0.0,
            ..Default::default()
        };
        let mut set = channel_set(&config);
        set.tick(125.4);
        assert_eq!(set.elapsed_total(), "02:05");

        let speed_sum: f64 = set.channels().iter().map(|c| c.target_speed as f64).sum();
        let expected = speed_sum * 125.4 / 8.0;
        assert!((set.total_simulated_volume() - expected).abs() < 1e-6);

        // Volume keeps growing with time
        let v1 = set.total_simulated_volume();
        set.tick(250.0);
        assert!(set.total_simulated_volume() > v1);
    }

    #[test]
    fn test_elapsed_never_goes_backwards() {
        let config = EngineConfig::default();
        let mut set = channel_set(&config);
        set.tick(10.0);
        set.tick(4.0);
        assert_eq!(set.elapsed_total(), "00:10");
    }
}
