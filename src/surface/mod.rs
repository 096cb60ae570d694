//! Shared render surface
//!
//! One canvas for the glyph rain plus a small set of named elements for
//! everything else. The surface never interprets what is drawn; it only owns
//! sizing and skips writes whose target has gone missing.

pub mod record;

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashSet;

pub use record::{DrawCommand, ElementState, RecordingCanvas, RecordingHud};

use crate::config::EngineConfig;
use crate::error::SurfaceError;
use crate::sim::Viewport;

/// Element ids the engine writes to
pub mod ids {
    pub const BACKDROP: &str = "fx-backdrop";
    pub const FRAME: &str = "fx-frame";
    pub const RAIN_CANVAS: &str = "fx-rain";
    pub const ELAPSED: &str = "fx-elapsed";
    pub const TOTAL_VOLUME: &str = "fx-total";

    pub fn progress_bar(channel: usize) -> String {
        format!("fx-progress-{channel}")
    }

    pub fn speed_label(channel: usize) -> String {
        format!("fx-speed-{channel}")
    }

    pub fn sprite(index: usize) -> String {
        format!("fx-sprite-{index}")
    }
}

/// Pixel drawing target for the glyph rain
pub trait Canvas {
    fn size(&self) -> Viewport;
    fn resize(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &str, color: &str);
}

/// Named DOM elements (bars, labels, sprites, ambient layers)
pub trait Hud {
    /// Create the elements described by `layout`
    fn attach(&mut self, layout: &HudLayout) -> Result<(), SurfaceError>;
    fn set_text(&mut self, id: &str, text: &str) -> Result<(), SurfaceError>;
    fn set_style(&mut self, id: &str, property: &str, value: &str) -> Result<(), SurfaceError>;
}

/// What `Hud::attach` has to create
#[derive(Debug, Clone, PartialEq)]
pub struct HudLayout {
    pub channel_titles: Vec<String>,
    pub sprite_count: usize,
    pub sprite_size: f32,
    pub sprite_image: Option<String>,
}

impl HudLayout {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            channel_titles: config.channel_titles.clone(),
            sprite_count: config.sprite_count,
            sprite_size: config.sprite_size,
            sprite_image: config.sprite_image.clone(),
        }
    }

    /// Every element id the layout defines
    pub fn element_ids(&self) -> Vec<String> {
        let mut out = vec![
            ids::BACKDROP.to_string(),
            ids::FRAME.to_string(),
            ids::ELAPSED.to_string(),
            ids::TOTAL_VOLUME.to_string(),
        ];
        for i in 0..self.channel_titles.len() {
            out.push(ids::progress_bar(i));
            out.push(ids::speed_label(i));
        }
        out.extend((0..self.sprite_count).map(ids::sprite));
        out
    }
}

/// The canvas and element host shared by all subsystems
pub struct RenderSurface<C: Canvas, H: Hud> {
    canvas: C,
    hud: H,
    viewport: Viewport,
    /// Ids already reported missing (warn once each)
    missing: HashSet<String>,
}

impl<C: Canvas, H: Hud> RenderSurface<C, H> {
    pub fn new(canvas: C, hud: H) -> Self {
        let viewport = canvas.size().sanitized();
        Self {
            canvas,
            hud,
            viewport,
            missing: HashSet::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update addressable dimensions; subsystem state is not touched here
    pub fn resize(&mut self, width: f32, height: f32) -> Viewport {
        let viewport = Viewport::new(width, height).sanitized();
        self.canvas.resize(viewport.width, viewport.height);
        self.viewport = viewport;
        viewport
    }

    pub fn attach(&mut self, layout: &HudLayout) {
        if let Err(e) = self.hud.attach(layout) {
            log::warn!("Could not attach all elements: {e}");
        }
    }

    /// Canvas handle for the glyph rain
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut H {
        &mut self.hud
    }

    /// Write text, skipping a missing target. Returns whether it landed.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        let result = self.hud.set_text(id, text);
        self.note(id, result)
    }

    /// Write a style property, skipping a missing target
    pub fn set_style(&mut self, id: &str, property: &str, value: &str) -> bool {
        let result = self.hud.set_style(id, property, value);
        self.note(id, result)
    }

    fn note(&mut self, id: &str, result: Result<(), SurfaceError>) -> bool {
        match result {
            Ok(()) => {
                // Element may have come back
                if !self.missing.is_empty() {
                    self.missing.remove(id);
                }
                true
            }
            Err(e) => {
                if self.missing.insert(id.to_string()) {
                    log::warn!("Skipping writes to `{id}`: {e}");
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RenderSurface<RecordingCanvas, RecordingHud> {
        let mut s = RenderSurface::new(RecordingCanvas::new(800.0, 600.0), RecordingHud::default());
        s.attach(&HudLayout::from_config(&EngineConfig::default()));
        s
    }

    #[test]
    fn test_layout_ids() {
        let layout = HudLayout::from_config(&EngineConfig::default());
        let ids = layout.element_ids();
        assert_eq!(ids.len(), 4 + 3 * 2 + 5);
        assert!(ids.contains(&"fx-progress-2".to_string()));
        assert!(ids.contains(&"fx-sprite-4".to_string()));
    }

    #[test]
    fn test_resize_updates_canvas_and_viewport() {
        let mut s = surface();
        let v = s.resize(1200.0, 800.0);
        assert_eq!(v, Viewport::new(1200.0, 800.0));
        assert_eq!(s.viewport(), v);
        assert_eq!(s.canvas().size(), v);
        assert_eq!(s.canvas().resize_count(), 1);
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut s = surface();
        s.hud_mut().detach(ids::ELAPSED);

        assert!(!s.set_text(ids::ELAPSED, "00:01"));
        assert!(!s.set_text(ids::ELAPSED, "00:02"));
        assert!(s.set_text(ids::TOTAL_VOLUME, "1.0 MB"));
        assert!(s.set_style(ids::TOTAL_VOLUME, "color", "#fcc"));
        assert_eq!(s.hud().text(ids::TOTAL_VOLUME), Some("1.0 MB"));
        assert_eq!(s.hud().text(ids::ELAPSED), None);
        assert!(s.hud().element(ids::ELAPSED).is_none());
        assert_eq!(s.hud().element(ids::TOTAL_VOLUME).map(|e| e.writes), Some(2));
    }

    #[test]
    fn test_negative_resize_collapses() {
        let mut s = surface();
        assert_eq!(s.resize(-1.0, 10.0), Viewport::new(0.0, 10.0));
    }
}
