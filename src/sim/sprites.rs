//! Drifting sprite bodies
//!
//! Velocities are in pixels per tick, not time scaled. Bodies bounce off the
//! side edges, wrap from the bottom back to just above the top, and never
//! interact with each other.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Viewport;

/// A moving sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteBody {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Boundary events from one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteTickReport {
    /// Horizontal velocity flips
    pub reflections: usize,
    /// Bottom-edge respawns
    pub respawns: usize,
}

#[derive(Debug, Clone)]
pub struct SpritePhysicsSet {
    bodies: Vec<SpriteBody>,
    sprite_height: f32,
    rng: Pcg32,
}

impl SpritePhysicsSet {
    /// Spawn `count` bodies anywhere inside the viewport
    pub fn new(
        count: usize,
        viewport: Viewport,
        sprite_height: f32,
        max_speed: f32,
        mut rng: Pcg32,
    ) -> Self {
        let bodies = (0..count)
            .map(|i| SpriteBody {
                id: i as u32,
                pos: Vec2::new(
                    rng.random::<f32>() * viewport.width,
                    rng.random::<f32>() * viewport.height,
                ),
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 2.0 * max_speed,
                    (rng.random::<f32>() - 0.5) * 2.0 * max_speed,
                ),
            })
            .collect();

        Self {
            bodies,
            sprite_height,
            rng,
        }
    }

    /// Build from explicit bodies (scripted motion, tests)
    pub fn from_bodies(bodies: Vec<SpriteBody>, sprite_height: f32, rng: Pcg32) -> Self {
        Self {
            bodies,
            sprite_height,
            rng,
        }
    }

    pub fn bodies(&self) -> &[SpriteBody] {
        &self.bodies
    }

    pub fn sprite_height(&self) -> f32 {
        self.sprite_height
    }

    /// Move every body one step within `viewport`
    pub fn tick(&mut self, viewport: Viewport) -> SpriteTickReport {
        let mut report = SpriteTickReport::default();
        let top = -self.sprite_height;

        for body in &mut self.bodies {
            body.pos += body.vel;

            // Point vx back inside; position is not pulled back. A body left
            // outside by a shrinking viewport keeps heading in, never flips again.
            let inward = if body.pos.x < 0.0 {
                body.vel.x.abs()
            } else if body.pos.x > viewport.width {
                -body.vel.x.abs()
            } else {
                body.vel.x
            };
            if inward != body.vel.x {
                body.vel.x = inward;
                report.reflections += 1;
            }

            if body.pos.y > viewport.height {
                body.pos.y = top;
                body.pos.x = self.rng.random_range(0.0..=viewport.width);
                report.respawns += 1;
            } else if body.pos.y < top {
                // Rising bodies bounce off the line they respawn on
                body.pos.y = top;
                body.vel.y = -body.vel.y;
            }
        }

        if report.respawns > 0 {
            log::trace!("{} sprite(s) respawned at the top", report.respawns);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn single(pos: Vec2, vel: Vec2) -> SpritePhysicsSet {
        SpritePhysicsSet::from_bodies(
            vec![SpriteBody { id: 0, pos, vel }],
            100.0,
            Pcg32::seed_from_u64(5),
        )
    }

    #[test]
    fn test_spawn_inside_viewport() {
        let set = SpritePhysicsSet::new(5, VIEW, 100.0, 2.5, Pcg32::seed_from_u64(3));
        assert_eq!(set.bodies().len(), 5);
        for b in set.bodies() {
            assert!((0.0..=800.0).contains(&b.pos.x));
            assert!((0.0..=600.0).contains(&b.pos.y));
            assert!(b.vel.x.abs() <= 2.5 && b.vel.y.abs() <= 2.5);
        }
    }

    #[test]
    fn test_moves_by_velocity() {
        let mut set = single(Vec2::new(100.0, 100.0), Vec2::new(2.0, -1.5));
        let report = set.tick(VIEW);
        assert_eq!(set.bodies()[0].pos, Vec2::new(102.0, 98.5));
        assert_eq!(report, SpriteTickReport::default());
    }

    #[test]
    fn test_reflects_on_right_edge_without_clamp() {
        let mut set = single(Vec2::new(799.0, 100.0), Vec2::new(2.0, 0.0));
        let report = set.tick(VIEW);
        let body = set.bodies()[0];
        assert_eq!(body.pos.x, 801.0);
        assert_eq!(body.vel.x, -2.0);
        assert_eq!(report.reflections, 1);

        // Next tick moves back inside and does not flip again
        set.tick(VIEW);
        let body = set.bodies()[0];
        assert_eq!(body.pos.x, 799.0);
        assert_eq!(body.vel.x, -2.0);
    }

    #[test]
    fn test_reflects_on_left_edge() {
        let mut set = single(Vec2::new(1.0, 100.0), Vec2::new(-2.0, 1.0));
        set.tick(VIEW);
        assert_eq!(set.bodies()[0].vel.x, 2.0);
    }

    #[test]
    fn test_body_outside_after_shrink_comes_back() {
        // Viewport shrank from 1200 to 800 while the body sat at x = 1100
        let mut set = single(Vec2::new(1100.0, 100.0), Vec2::new(2.0, 0.0));
        let report = set.tick(VIEW);
        assert_eq!(report.reflections, 1);
        assert_eq!(set.bodies()[0].vel.x, -2.0);

        for _ in 0..200 {
            let report = set.tick(VIEW);
            assert_eq!(report.reflections, 0);
        }
        let body = set.bodies()[0];
        assert!((0.0..=800.0).contains(&body.pos.x), "x = {}", body.pos.x);
        assert_eq!(body.vel.x, -2.0);
    }

    #[test]
    fn test_left_overshoot_with_inward_velocity_keeps_it() {
        let mut set = single(Vec2::new(-50.0, 100.0), Vec2::new(3.0, 0.0));
        let report = set.tick(VIEW);
        assert_eq!(report.reflections, 0);
        assert_eq!(set.bodies()[0].vel.x, 3.0);
    }

    #[test]
    fn test_respawn_at_top_keeps_velocity() {
        let mut set = single(Vec2::new(400.0, 599.0), Vec2::new(1.5, 2.0));
        let report = set.tick(VIEW);
        let body = set.bodies()[0];
        assert_eq!(report.respawns, 1);
        assert_eq!(body.pos.y, -100.0);
        assert!((0.0..=800.0).contains(&body.pos.x));
        assert_eq!(body.vel, Vec2::new(1.5, 2.0));
    }

    #[test]
    fn test_rising_body_stays_below_top_line() {
        let mut set = single(Vec2::new(400.0, -99.0), Vec2::new(0.0, -2.0));
        set.tick(VIEW);
        let body = set.bodies()[0];
        assert_eq!(body.pos.y, -100.0);
        assert_eq!(body.vel.y, 2.0);
    }

    #[test]
    fn test_zero_width_viewport() {
        let mut set = single(Vec2::new(0.0, 10.0), Vec2::new(0.0, 50.0));
        set.tick(Viewport::new(0.0, 20.0));
        let body = set.bodies()[0];
        assert_eq!(body.pos, Vec2::new(0.0, -100.0));
    }
}
