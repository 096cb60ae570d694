//! Engine context
//!
//! Owns the simulation state, the render surface and the scheduler. Hosts call
//! into it; nothing here reaches for globals.

use crate::config::EngineConfig;
use crate::error::Error;
use crate::render;
use crate::scheduler::{Action, FrameScheduler};
use crate::sim::{self, EnginePhase, EngineState, Viewport};
use crate::surface::{Canvas, Hud, HudLayout, RenderSurface};

pub struct Engine<C: Canvas, H: Hud> {
    state: EngineState,
    surface: RenderSurface<C, H>,
    scheduler: FrameScheduler,
}

impl<C: Canvas, H: Hud> Engine<C, H> {
    /// Validate the config and wrap the surface. Nothing runs until `start`.
    pub fn new(config: EngineConfig, seed: u64, canvas: C, hud: H) -> Result<Self, Error> {
        config.validate()?;
        let scheduler = FrameScheduler::new(&config);
        Ok(Self {
            state: EngineState::new(config, seed),
            surface: RenderSurface::new(canvas, hud),
            scheduler,
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.state.phase()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn surface(&self) -> &RenderSurface<C, H> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut RenderSurface<C, H> {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    /// Attach elements and build the subsystems for the current surface size
    pub fn init(&mut self, now_ms: f64) {
        if self.state.phase() == EnginePhase::Running {
            return;
        }
        self.surface.attach(&HudLayout::from_config(&self.state.config));
        self.state.init(self.surface.viewport(), now_ms);
    }

    /// Init if needed and arm every repeating action
    pub fn start(&mut self, now_ms: f64) {
        self.init(now_ms);
        self.scheduler.start(now_ms);
    }

    /// Clean-shutdown hook. Idempotent.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Viewport change from the host. Applied between actions, so every tick
    /// sees either the old or the new size.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = self.surface.resize(width, height);
        self.state.resize(viewport);
        log::info!("Resized to {}x{}", viewport.width, viewport.height);
    }

    pub fn viewport(&self) -> Viewport {
        self.surface.viewport()
    }

    /// Run every action due at `now_ms`. Returns how many ran.
    pub fn run_due(&mut self, now_ms: f64) -> usize {
        let mut ran = 0;
        while let Some(action) = self.scheduler.poll(now_ms) {
            self.run_action(action, now_ms);
            ran += 1;
        }
        ran
    }

    /// Run one action to completion: simulate, then write its region
    pub fn run_action(&mut self, action: Action, now_ms: f64) {
        match action {
            Action::Frame => {
                sim::frame_tick(&mut self.state, now_ms);
                if let Some(sys) = self.state.subsystems.as_ref() {
                    render::present_progress(&sys.progress, &mut self.surface);
                    render::present_sprites(&sys.sprites, &mut self.surface);
                }
            }
            Action::Ambient => {
                sim::ambient_tick(&mut self.state);
                if let Some(sys) = self.state.subsystems.as_ref() {
                    render::present_ambient(&sys.ambient, &mut self.surface);
                }
            }
            Action::Rain => {
                let cell_size = self.state.config.cell_size;
                let trail_alpha = self.state.config.trail_alpha;
                let glyphs = sim::rain_tick(&mut self.state);
                render::present_rain(glyphs, cell_size, trail_alpha, &mut self.surface);
            }
        }
    }
}
