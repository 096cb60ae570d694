//! Effect simulation module
//!
//! All subsystem dynamics live here. This module must stay pure:
//! - Seeded RNG only, one stream per subsystem
//! - Each subsystem mutates only its own state
//! - No rendering or platform dependencies

pub mod particles;
pub mod phase;
pub mod progress;
pub mod sprites;
pub mod state;
pub mod tick;

pub use particles::{Glyph, GlyphDraw, ParticleColumn, ParticleField};
pub use phase::PhaseAccumulator;
pub use progress::{ProgressChannel, ProgressChannelSet};
pub use sprites::{SpriteBody, SpritePhysicsSet, SpriteTickReport};
pub use state::{EnginePhase, EngineState, RngStream, RngStreams, Subsystems, Viewport};
pub use tick::{ambient_tick, frame_tick, rain_tick};
