//! Writes subsystem state onto the render surface
//!
//! Each function writes only the region its subsystem owns.

use crate::sim::{GlyphDraw, PhaseAccumulator, ProgressChannelSet, SpritePhysicsSet};
use crate::surface::{Canvas, Hud, RenderSurface, ids};

/// Glyph colour for the rain
pub const GLYPH_COLOR: &str = "#0F0";

/// Bars, speed labels, elapsed time and total volume
pub fn present_progress<C: Canvas, H: Hud>(
    progress: &ProgressChannelSet,
    surface: &mut RenderSurface<C, H>,
) {
    for channel in progress.channels() {
        surface.set_style(
            &ids::progress_bar(channel.id),
            "width",
            &format!("{:.2}%", channel.displayed_width),
        );
        surface.set_text(
            &ids::speed_label(channel.id),
            &format!("{:.1} MB/s", channel.displayed_speed),
        );
    }
    surface.set_text(ids::ELAPSED, &progress.elapsed_total());
    surface.set_text(
        ids::TOTAL_VOLUME,
        &format!("{:.1} MB", progress.total_simulated_volume()),
    );
}

/// Backdrop pulse and frame glow
pub fn present_ambient<C: Canvas, H: Hud>(
    ambient: &PhaseAccumulator,
    surface: &mut RenderSurface<C, H>,
) {
    surface.set_style(
        ids::BACKDROP,
        "background",
        &format!("rgba(40,0,0,{:.3})", ambient.backdrop_alpha()),
    );
    let (inner, outer) = ambient.glow_radii();
    surface.set_style(
        ids::FRAME,
        "box-shadow",
        &format!("0 0 {inner:.1}px #f00, 0 0 {outer:.1}px #f22"),
    );
}

/// Fade the previous frames, then draw this tick's glyphs
pub fn present_rain<C: Canvas, H: Hud>(
    glyphs: &[GlyphDraw],
    cell_size: f32,
    trail_alpha: f32,
    surface: &mut RenderSurface<C, H>,
) {
    let viewport = surface.viewport();
    let font = format!("{cell_size}px monospace");
    let canvas = surface.canvas_mut();

    canvas.fill_rect(
        0.0,
        0.0,
        viewport.width,
        viewport.height,
        &format!("rgba(0, 0, 0, {trail_alpha})"),
    );
    for glyph in glyphs {
        let (x, y) = glyph.position(cell_size);
        canvas.fill_text(glyph.glyph.as_str(), x, y, &font, GLYPH_COLOR);
    }
}

/// Sprite element positions
pub fn present_sprites<C: Canvas, H: Hud>(
    sprites: &SpritePhysicsSet,
    surface: &mut RenderSurface<C, H>,
) {
    for body in sprites.bodies() {
        let id = ids::sprite(body.id as usize);
        surface.set_style(&id, "left", &format!("{:.1}px", body.pos.x));
        surface.set_style(&id, "top", &format!("{:.1}px", body.pos.y));
    }
}
