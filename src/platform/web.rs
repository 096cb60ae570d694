//! Browser host
//!
//! Registers the engine's actions with real timers: the frame action rides
//! `requestAnimationFrame` and re-requests itself after each run, interval
//! actions use `setInterval`. Every callback checks the scheduler's cancel
//! token first, and `stop` clears the pending timer handles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window};

use crate::config::{EngineConfig, TelemetryConfig};
use crate::engine::Engine;
use crate::error::TelemetryError;
use crate::scheduler::{Action, Cadence};
use crate::surface::web::{CanvasSurface, DomHud};
use crate::telemetry::{EnvironmentSnapshot, TelemetryReporter, Transport};

type WebEngine = Engine<CanvasSurface, DomHud>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

thread_local! {
    static HOST: RefCell<Option<WebHost>> = const { RefCell::new(None) };
}

fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn window_size(window: &Window) -> (f32, f32) {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (read(window.inner_width()), read(window.inner_height()))
}

/// Live timers for one engine
pub struct WebHost {
    engine: Rc<RefCell<WebEngine>>,
    raf_id: Rc<Cell<Option<i32>>>,
    frame: FrameCallback,
    intervals: Vec<(i32, Closure<dyn FnMut()>)>,
    resize: Option<Closure<dyn FnMut()>>,
}

impl WebHost {
    fn start(engine: WebEngine, window: &Window) -> Result<Self, JsValue> {
        let engine = Rc::new(RefCell::new(engine));
        engine.borrow_mut().start(now_ms(window));
        let token = engine.borrow().scheduler().token();

        // Continuous frame loop
        let raf_id = Rc::new(Cell::new(None));
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        {
            let engine = engine.clone();
            let token = token.clone();
            let raf_id = raf_id.clone();
            let handle = frame.clone();
            *frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                raf_id.set(None);
                if token.is_cancelled() {
                    return;
                }
                {
                    let mut e = engine.borrow_mut();
                    e.scheduler_mut().note_run(Action::Frame);
                    e.run_action(Action::Frame, time);
                }
                let Some(window) = web_sys::window() else {
                    return;
                };
                if let Some(cb) = handle.borrow().as_ref() {
                    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        Ok(id) => raf_id.set(Some(id)),
                        Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
                    }
                }
            }));
        }
        if let Some(cb) = frame.borrow().as_ref() {
            raf_id.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        }

        // Fixed-interval actions
        let cadences: Vec<(Action, f64)> = engine
            .borrow()
            .scheduler()
            .tasks()
            .iter()
            .filter_map(|t| match t.cadence {
                Cadence::Interval { period_ms } => Some((t.action, period_ms)),
                Cadence::Continuous { .. } => None,
            })
            .collect();

        let mut intervals = Vec::with_capacity(cadences.len());
        for (action, period_ms) in cadences {
            let engine = engine.clone();
            let token = token.clone();
            let cb = Closure::<dyn FnMut()>::new(move || {
                if token.is_cancelled() {
                    return;
                }
                let now = web_sys::window().map(|w| now_ms(&w)).unwrap_or(0.0);
                let mut e = engine.borrow_mut();
                e.scheduler_mut().note_run(action);
                e.run_action(action, now);
            });
            let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                period_ms.round() as i32,
            )?;
            intervals.push((id, cb));
        }

        // Viewport changes
        let resize = {
            let engine = engine.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(window) = web_sys::window() {
                    let (w, h) = window_size(&window);
                    engine.borrow_mut().resize(w, h);
                }
            })
        };
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;

        Ok(Self {
            engine,
            raf_id,
            frame,
            intervals,
            resize: Some(resize),
        })
    }

    /// Cancel the frame request and every interval. Idempotent.
    pub fn stop(&mut self) {
        self.engine.borrow_mut().stop();
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(id) = self.raf_id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        for (id, _cb) in self.intervals.drain(..) {
            window.clear_interval_with_handle(id);
        }
        if let Some(resize) = self.resize.take() {
            let _ = window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
        // Breaks the frame closure's reference to itself
        self.frame.borrow_mut().take();
    }
}

/// Build the surface, start the engine and keep it alive for the page
pub fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (width, height) = window_size(&window);

    let canvas = CanvasSurface::attach(&document, width, height)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let hud = DomHud::new(document);
    let seed = js_sys::Date::now() as u64;
    let engine = Engine::new(EngineConfig::default(), seed, canvas, hud)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!("Engine created with seed: {seed}");

    let host = WebHost::start(engine, &window)?;
    HOST.with(|h| {
        if let Some(mut old) = h.borrow_mut().replace(host) {
            old.stop();
        }
    });

    // Teardown hook
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        stop();
    });
    window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
    closure.forget();

    log::info!("Effects running");
    Ok(())
}

/// Stop all effects. Safe to call repeatedly.
#[wasm_bindgen(js_name = stopEffects)]
pub fn stop() {
    HOST.with(|h| {
        if let Some(host) = h.borrow_mut().as_mut() {
            host.stop();
        }
    });
}

fn js_err(e: JsValue) -> TelemetryError {
    TelemetryError::Transport(format!("{e:?}"))
}

/// POSTs with `fetch`; the response is awaited in the background and only logged
pub struct FetchTransport;

impl Transport for FetchTransport {
    fn post_json(&self, endpoint: &str, body: &str) -> Result<(), TelemetryError> {
        let window =
            web_sys::window().ok_or_else(|| TelemetryError::Transport("no window".into()))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(body));
        let request = Request::new_with_str_and_init(endpoint, &init).map_err(js_err)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;

        let promise = window.fetch_with_request(&request);
        let endpoint = endpoint.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(value) => {
                    let status = value.dyn_into::<Response>().map(|r| r.status()).unwrap_or(0);
                    if (200..300).contains(&status) {
                        log::info!("Collector at {endpoint} answered {status}");
                    } else {
                        log::warn!("Collector at {endpoint} answered {status}");
                    }
                }
                Err(e) => log::warn!("Report to {endpoint} failed: {e:?}"),
            }
        });
        Ok(())
    }
}

/// Send the install-time environment report captured by the host script
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen(js_name = reportEnvironment)]
pub fn report_environment(
    endpoint: String,
    install_timestamp: f64,
    user_agent: String,
    language: String,
    screen_resolution: String,
    timezone: String,
    platform: String,
    active_tab_url: Option<String>,
    installed_extension_names: Vec<String>,
) -> bool {
    let config = TelemetryConfig {
        endpoint: Some(endpoint),
    };
    let snapshot = EnvironmentSnapshot {
        install_timestamp: install_timestamp.max(0.0) as u64,
        user_agent,
        language,
        screen_resolution,
        timezone,
        platform,
        active_tab_url,
        installed_extension_names,
    };
    TelemetryReporter::new(&config, FetchTransport).report(&snapshot)
}
