//! pagefx entry point
//!
//! In the browser this attaches the effects to the page. Natively it runs a
//! headless preview on virtual time and logs what the page would show.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("pagefx starting...");
    pagefx::platform::web::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pagefx::platform::VirtualClock;
    use pagefx::surface::{RecordingCanvas, RecordingHud, ids};
    use pagefx::{Action, Engine, EngineConfig};

    env_logger::init();
    log::info!("pagefx (native) starting headless preview...");

    let seed: u64 = rand::random();
    let mut engine = match Engine::new(
        EngineConfig::default(),
        seed,
        RecordingCanvas::new(800.0, 600.0),
        RecordingHud::default(),
    ) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return;
        }
    };
    log::info!("Engine created with seed: {seed}");

    let mut clock = VirtualClock::default();
    engine.start(clock.now_ms());

    for second in 1..=5 {
        clock.advance(&mut engine, 1_000.0);
        // Keep memory flat; the preview only reports counts
        let drawn = engine.surface_mut().canvas_mut().take_commands().len();

        let hud = engine.surface().hud();
        let bars: Vec<&str> = (0..engine.state().config.channel_count())
            .map(|i| hud.style(&ids::progress_bar(i), "width").unwrap_or("-"))
            .collect();
        log::info!(
            "t={second}s elapsed={} total={} bars={:?} canvas_ops={drawn}",
            hud.text(ids::ELAPSED).unwrap_or("-"),
            hud.text(ids::TOTAL_VOLUME).unwrap_or("-"),
            bars,
        );

        if second == 3 {
            engine.resize(1200.0, 800.0);
        }
    }

    engine.stop();
    engine.stop();
    let s = engine.scheduler();
    log::info!(
        "Stopped after {} frames, {} ambient ticks, {} rain ticks",
        s.runs(Action::Frame),
        s.runs(Action::Ambient),
        s.runs(Action::Rain)
    );
}
