//! Platform drivers
//!
//! Hosts that actually fire the engine's repeating actions:
//! - `clock`: virtual time, pumps the scheduler (native preview, tests)
//! - `web`: requestAnimationFrame + setInterval in the browser

pub mod clock;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::VirtualClock;
