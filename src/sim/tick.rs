//! Per-action simulation steps
//!
//! Each function advances exactly the subsystems its scheduled action owns
//! and does nothing before `init`. Surface dimensions are read once at the
//! start of the step.

use super::particles::GlyphDraw;
use super::sprites::SpriteTickReport;
use super::state::EngineState;

/// Continuous-render step: progress channels and sprites
pub fn frame_tick(state: &mut EngineState, now_ms: f64) -> SpriteTickReport {
    let viewport = state.viewport;
    let elapsed = state.elapsed_secs(now_ms);
    let Some(sys) = state.subsystems.as_mut() else {
        return SpriteTickReport::default();
    };

    sys.progress.tick(elapsed);
    sys.sprites.tick(viewport)
}

/// Fixed-interval step for the pulse/glow phases
pub fn ambient_tick(state: &mut EngineState) {
    if let Some(sys) = state.subsystems.as_mut() {
        sys.ambient.tick();
    }
}

/// Fixed-interval step for the glyph rain; returns this tick's draws
pub fn rain_tick(state: &mut EngineState) -> &[GlyphDraw] {
    match state.subsystems.as_mut() {
        Some(sys) => sys.rain.tick(),
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::sim::state::{EnginePhase, Viewport};

    fn running(seed: u64) -> EngineState {
        let mut state = EngineState::new(EngineConfig::default(), seed);
        state.init(Viewport::new(800.0, 600.0), 0.0);
        state
    }

    #[test]
    fn test_ticks_before_init_are_noops() {
        let mut state = EngineState::new(EngineConfig::default(), 1);
        assert_eq!(frame_tick(&mut state, 100.0), SpriteTickReport::default());
        ambient_tick(&mut state);
        assert!(rain_tick(&mut state).is_empty());
        assert_eq!(state.phase(), EnginePhase::Uninitialized);
    }

    #[test]
    fn test_actions_touch_only_their_subsystems() {
        let mut state = running(11);
        let snapshot = state.subsystems.clone().unwrap();

        ambient_tick(&mut state);
        {
            let sys = state.subsystems.as_ref().unwrap();
            assert_eq!(sys.ambient.ticks(), 1);
            assert_eq!(sys.progress.channels(), snapshot.progress.channels());
            assert_eq!(sys.sprites.bodies(), snapshot.sprites.bodies());
            assert_eq!(sys.rain.columns(), snapshot.rain.columns());
        }

        assert_eq!(rain_tick(&mut state).len(), 50);
        {
            let sys = state.subsystems.as_ref().unwrap();
            assert_eq!(sys.progress.channels(), snapshot.progress.channels());
            assert_eq!(sys.sprites.bodies(), snapshot.sprites.bodies());
        }

        frame_tick(&mut state, 16.0);
        let sys = state.subsystems.as_ref().unwrap();
        assert_eq!(sys.ambient.ticks(), 1);
        assert!(sys.rain.columns().iter().all(|c| c.drop_row == 1));
        assert_ne!(sys.sprites.bodies(), snapshot.sprites.bodies());
    }

    #[test]
    fn test_determinism() {
        // Same seed and same action sequence produce identical state
        let mut a = running(99);
        let mut b = running(99);
        for i in 0..120 {
            let now = i as f64 * 16.0;
            frame_tick(&mut a, now);
            frame_tick(&mut b, now);
            if i % 3 == 0 {
                ambient_tick(&mut a);
                ambient_tick(&mut b);
                let da = rain_tick(&mut a).to_vec();
                let db = rain_tick(&mut b).to_vec();
                assert_eq!(da, db);
            }
        }
        let (sa, sb) = (a.subsystems.unwrap(), b.subsystems.unwrap());
        assert_eq!(sa.progress.channels(), sb.progress.channels());
        assert_eq!(sa.sprites.bodies(), sb.sprites.bodies());
        assert_eq!(sa.ambient, sb.ambient);
    }

    #[test]
    fn test_resize_only_rebuilds_rain() {
        let mut state = running(3);
        for i in 0..30 {
            frame_tick(&mut state, i as f64 * 16.0);
            rain_tick(&mut state);
        }
        let before = state.subsystems.clone().unwrap();

        state.resize(Viewport::new(1200.0, 800.0));
        let sys = state.subsystems.as_ref().unwrap();
        assert_eq!(sys.rain.columns().len(), 75);
        assert!(sys.rain.columns().iter().all(|c| c.drop_row == 0));
        assert_eq!(sys.progress.channels(), before.progress.channels());
        assert_eq!(sys.sprites.bodies(), before.sprites.bodies());
        assert_eq!(state.viewport, Viewport::new(1200.0, 800.0));
    }
}
