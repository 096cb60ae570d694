//! Falling glyph columns
//!
//! The field is a row of independent column generators. Every tick each column
//! emits one glyph at its current row and moves down a row. Columns that have
//! run past the bottom restart at the top only with a small probability, which
//! staggers the streams.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Viewport;

/// Binary symbol drawn by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Zero,
    One,
}

impl Glyph {
    pub fn as_str(&self) -> &'static str {
        match self {
            Glyph::Zero => "0",
            Glyph::One => "1",
        }
    }
}

/// One falling stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleColumn {
    pub index: usize,
    pub drop_row: u32,
}

/// A glyph emitted by the last tick, in cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphDraw {
    pub column: usize,
    pub row: u32,
    pub glyph: Glyph,
}

impl GlyphDraw {
    /// Pixel position of the glyph baseline
    pub fn position(&self, cell_size: f32) -> (f32, f32) {
        (self.column as f32 * cell_size, self.row as f32 * cell_size)
    }
}

/// Column count for a surface width
pub fn column_count_for(width: f32, cell_size: f32) -> usize {
    if cell_size > 0.0 && width.is_finite() && width > 0.0 {
        (width / cell_size).floor() as usize
    } else {
        0
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    columns: Vec<ParticleColumn>,
    cell_size: f32,
    surface_height: f32,
    reset_probability: f64,
    rng: Pcg32,
    /// Draws produced by the last tick (reused between ticks)
    pending: Vec<GlyphDraw>,
}

impl ParticleField {
    pub fn new(viewport: Viewport, cell_size: f32, reset_probability: f64, rng: Pcg32) -> Self {
        let mut field = Self {
            columns: Vec::new(),
            cell_size,
            surface_height: 0.0,
            reset_probability,
            rng,
            pending: Vec::new(),
        };
        field.resize(viewport);
        field
    }

    pub fn columns(&self) -> &[ParticleColumn] {
        &self.columns
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Rebuild the columns for new dimensions. Old drop rows are discarded.
    pub fn resize(&mut self, viewport: Viewport) {
        let count = column_count_for(viewport.width, self.cell_size);
        self.surface_height = viewport.height;
        self.columns = (0..count)
            .map(|index| ParticleColumn { index, drop_row: 0 })
            .collect();
        self.pending.clear();
        self.pending.reserve(count);
    }

    /// Emit one glyph per column and advance the drops
    pub fn tick(&mut self) -> &[GlyphDraw] {
        self.pending.clear();
        for column in &mut self.columns {
            let glyph = if self.rng.random_bool(0.5) {
                Glyph::One
            } else {
                Glyph::Zero
            };
            self.pending.push(GlyphDraw {
                column: column.index,
                row: column.drop_row,
                glyph,
            });

            let offset = column.drop_row as f32 * self.cell_size;
            if offset > self.surface_height && self.rng.random_bool(self.reset_probability) {
                column.drop_row = 0;
            } else {
                column.drop_row = column.drop_row.saturating_add(1);
            }
        }
        &self.pending
    }

    /// Draws from the most recent tick
    pub fn pending(&self) -> &[GlyphDraw] {
        &self.pending
    }
}
