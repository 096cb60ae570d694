//! Phase accumulator for ambient pulse and glow

use std::f32::consts::TAU;

use crate::wrap_phase;

/// Two phases advanced once per ambient tick.
///
/// `phase` wraps in [0, 2π) and drives the backdrop pulse. `secondary` only
/// ever grows; readers take it modulo `secondary_period` for the frame glow.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseAccumulator {
    pub phase: f32,
    pub secondary: f32,
    step: f32,
    secondary_step: f32,
    secondary_period: f32,
    ticks: u64,
}

impl PhaseAccumulator {
    pub fn new(step: f32, secondary_step: f32, secondary_period: f32) -> Self {
        Self {
            phase: 0.0,
            secondary: 0.0,
            step,
            secondary_step,
            secondary_period,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        self.phase = wrap_phase(self.phase + self.step, TAU);
        self.secondary += self.secondary_step;
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Secondary phase reduced into [0, period)
    pub fn secondary_wrapped(&self) -> f32 {
        wrap_phase(self.secondary, self.secondary_period)
    }

    /// Backdrop pulse strength in [0, 0.1]
    pub fn pulse_intensity(&self) -> f32 {
        (self.phase * 3.0).sin().abs() * 0.1
    }

    /// Backdrop alpha in [0.9, 1.0]
    pub fn backdrop_alpha(&self) -> f32 {
        0.9 + self.pulse_intensity()
    }

    /// Inner and outer glow blur radii in pixels
    pub fn glow_radii(&self) -> (f32, f32) {
        let b = self.secondary_wrapped();
        (20.0 + b.sin() * 10.0, 30.0 + b.cos() * 15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wraps() {
        let mut acc = PhaseAccumulator::new(0.02, 0.1, 100.0);
        for _ in 0..1000 {
            acc.tick();
            assert!(acc.phase >= 0.0 && acc.phase < TAU);
        }
        // 1000 * 0.02 = 20 rad, i.e. three full turns plus change
        assert!((acc.phase - (20.0 - 3.0 * TAU)).abs() < 1e-3);
    }

    #[test]
    fn test_secondary_is_unbounded_but_read_wrapped() {
        let mut acc = PhaseAccumulator::new(0.02, 0.1, 100.0);
        for _ in 0..1500 {
            acc.tick();
        }
        assert!(acc.secondary > 100.0);
        let wrapped = acc.secondary_wrapped();
        assert!((0.0..100.0).contains(&wrapped));
        assert!((wrapped - 50.0).abs() < 0.1);
        assert_eq!(acc.ticks(), 1500);
    }

    #[test]
    fn test_effect_ranges() {
        let mut acc = PhaseAccumulator::new(0.02, 0.1, 100.0);
        for _ in 0..500 {
            acc.tick();
            let alpha = acc.backdrop_alpha();
            assert!((0.9..=1.0).contains(&alpha));
            let (inner, outer) = acc.glow_radii();
            assert!((10.0..=30.0).contains(&inner));
            assert!((15.0..=45.0).contains(&outer));
        }
    }
}
