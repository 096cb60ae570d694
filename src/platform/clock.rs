//! Virtual-time driver
//!
//! Steps from one due time to the next and runs whatever the scheduler hands
//! out, so a minute of animation can be replayed instantly and exactly.

use crate::engine::Engine;
use crate::surface::{Canvas, Hud};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualClock {
    now_ms: f64,
}

impl VirtualClock {
    pub fn new(now_ms: f64) -> Self {
        Self { now_ms }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance by `delta_ms`, running every action that falls due on the way.
    /// Returns how many actions ran.
    pub fn advance<C: Canvas, H: Hud>(
        &mut self,
        engine: &mut Engine<C, H>,
        delta_ms: f64,
    ) -> usize {
        let target = self.now_ms + delta_ms.max(0.0);
        let mut ran = 0;
        while let Some(due) = engine.scheduler().next_due() {
            if due > target {
                break;
            }
            self.now_ms = self.now_ms.max(due);
            ran += engine.run_due(self.now_ms);
        }
        self.now_ms = target;
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::scheduler::Action;
    use crate::surface::{RecordingCanvas, RecordingHud, ids};

    fn engine() -> Engine<RecordingCanvas, RecordingHud> {
        Engine::new(
            EngineConfig::default(),
            8,
            RecordingCanvas::new(800.0, 600.0),
            RecordingHud::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_one_second_of_actions() {
        let mut e = engine();
        let mut clock = VirtualClock::new(0.0);
        e.start(clock.now_ms());
        clock.advance(&mut e, 1_000.0);

        let s = e.scheduler();
        // Frames at 0, 16.7, ... ; about 60 in a second, dropped catch-up aside
        assert!((59..=61).contains(&s.runs(Action::Frame)), "{}", s.runs(Action::Frame));
        assert_eq!(s.runs(Action::Ambient), 20);
        assert_eq!(s.runs(Action::Rain), 30);
        assert_eq!(clock.now_ms(), 1_000.0);
    }

    #[test]
    fn test_labels_follow_virtual_time() {
        let mut e = engine();
        let mut clock = VirtualClock::default();
        e.start(0.0);
        clock.advance(&mut e, 125_400.0);
        assert_eq!(e.surface().hud().text(ids::ELAPSED), Some("02:05"));
    }

    #[test]
    fn test_stopped_engine_stays_still() {
        let mut e = engine();
        let mut clock = VirtualClock::default();
        e.start(0.0);
        clock.advance(&mut e, 500.0);
        e.stop();
        e.stop();

        let frames = e.scheduler().runs(Action::Frame);
        let bodies = e.state().subsystems.as_ref().unwrap().sprites.bodies().to_vec();
        assert_eq!(clock.advance(&mut e, 5_000.0), 0);
        assert_eq!(e.scheduler().runs(Action::Frame), frames);
        assert_eq!(e.state().subsystems.as_ref().unwrap().sprites.bodies(), &bodies[..]);
    }

    #[test]
    fn test_not_started_runs_nothing() {
        let mut e = engine();
        let mut clock = VirtualClock::default();
        assert_eq!(clock.advance(&mut e, 1_000.0), 0);
    }
}
