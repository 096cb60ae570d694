//! Browser surface: a 2D canvas and plain DOM elements

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement};

use super::{Canvas, Hud, HudLayout, ids};
use crate::error::SurfaceError;
use crate::sim::Viewport;

fn host_err(e: JsValue) -> SurfaceError {
    SurfaceError::Host(format!("{e:?}"))
}

/// Full-viewport canvas behind the page content
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Reuse `#fx-rain` if present, otherwise create and append it
    pub fn attach(document: &Document, width: f32, height: f32) -> Result<Self, SurfaceError> {
        let canvas: HtmlCanvasElement = match document.get_element_by_id(ids::RAIN_CANVAS) {
            Some(el) => el.dyn_into().map_err(|_| {
                SurfaceError::Host(format!("`{}` is not a canvas", ids::RAIN_CANVAS))
            })?,
            None => {
                let c: HtmlCanvasElement = document
                    .create_element("canvas")
                    .map_err(host_err)?
                    .dyn_into()
                    .map_err(|_| SurfaceError::Host("canvas element has wrong type".into()))?;
                c.set_id(ids::RAIN_CANVAS);
                c.set_attribute(
                    "style",
                    "position:fixed;left:0;top:0;pointer-events:none;z-index:1;",
                )
                .map_err(host_err)?;
                let body = document
                    .body()
                    .ok_or_else(|| SurfaceError::MissingTarget("body".into()))?;
                body.append_child(&c).map_err(host_err)?;
                c
            }
        };

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(host_err)?
            .ok_or_else(|| SurfaceError::Host("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| SurfaceError::Host("2d context has wrong type".into()))?;

        let mut surface = Self { canvas, ctx };
        surface.resize(width, height);
        Ok(surface)
    }
}

impl Canvas for CanvasSurface {
    fn size(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &str, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(font);
        if let Err(e) = self.ctx.fill_text(text, x as f64, y as f64) {
            log::debug!("fill_text failed: {e:?}");
        }
    }
}

/// Named elements in the live document
pub struct DomHud {
    document: Document,
}

impl DomHud {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Result<Element, SurfaceError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| SurfaceError::MissingTarget(id.to_string()))
    }

    fn create(&self, tag: &str, id: Option<&str>, style: &str) -> Result<Element, SurfaceError> {
        let el = self.document.create_element(tag).map_err(host_err)?;
        if let Some(id) = id {
            el.set_id(id);
        }
        el.set_attribute("style", style).map_err(host_err)?;
        Ok(el)
    }

    fn text(&self, text: &str, id: Option<&str>, style: &str) -> Result<Element, SurfaceError> {
        let el = self.create("span", id, style)?;
        el.set_text_content(Some(text));
        Ok(el)
    }
}

impl Hud for DomHud {
    fn attach(&mut self, layout: &HudLayout) -> Result<(), SurfaceError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| SurfaceError::MissingTarget("body".into()))?;

        if self.document.get_element_by_id(ids::FRAME).is_some() {
            log::debug!("Elements already attached");
            return Ok(());
        }

        let backdrop = self.create(
            "div",
            Some(ids::BACKDROP),
            "position:fixed;inset:0;z-index:0;pointer-events:none;background:rgba(40,0,0,0.9);",
        )?;
        body.append_child(&backdrop).map_err(host_err)?;

        let frame = self.create(
            "div",
            Some(ids::FRAME),
            "position:fixed;top:50%;left:50%;transform:translate(-50%,-50%);z-index:2;\
             background:#110000;border:2px solid #f00;padding:2rem;min-width:320px;\
             font-family:monospace;color:#fcc;display:grid;gap:1rem;",
        )?;

        for (i, title) in layout.channel_titles.iter().enumerate() {
            let row = self.create("div", None, "")?;
            let header = self.create(
                "div",
                None,
                "display:flex;justify-content:space-between;font-size:0.9rem;",
            )?;
            header
                .append_child(&self.text(title, None, "")?)
                .map_err(host_err)?;
            header
                .append_child(&self.text(
                    "0.0 MB/s",
                    Some(&ids::speed_label(i)),
                    "color:#ff8888;",
                )?)
                .map_err(host_err)?;
            let track = self.create(
                "div",
                None,
                "height:8px;background:#330000;border-radius:4px;overflow:hidden;",
            )?;
            let bar = self.create(
                "div",
                Some(&ids::progress_bar(i)),
                "height:100%;width:0%;background:#ff4444;",
            )?;
            track.append_child(&bar).map_err(host_err)?;
            row.append_child(&header).map_err(host_err)?;
            row.append_child(&track).map_err(host_err)?;
            frame.append_child(&row).map_err(host_err)?;
        }

        let stats = self.create("div", None, "border-left:2px solid #f00;padding-left:1rem;")?;
        stats
            .append_child(&self.text("0.0 MB", Some(ids::TOTAL_VOLUME), "display:block;")?)
            .map_err(host_err)?;
        stats
            .append_child(&self.text("00:00", Some(ids::ELAPSED), "display:block;")?)
            .map_err(host_err)?;
        frame.append_child(&stats).map_err(host_err)?;
        body.append_child(&frame).map_err(host_err)?;

        let size = layout.sprite_size;
        for i in 0..layout.sprite_count {
            let style = format!(
                "position:fixed;left:0;top:0;width:{size}px;height:{size}px;\
                 z-index:3;pointer-events:none;"
            );
            let sprite = match &layout.sprite_image {
                Some(src) => {
                    let img = self.create("img", Some(&ids::sprite(i)), &style)?;
                    img.set_attribute("src", src).map_err(host_err)?;
                    img
                }
                None => self.create(
                    "div",
                    Some(&ids::sprite(i)),
                    &format!("{style}background:rgba(255,60,60,0.35);border-radius:50%;"),
                )?,
            };
            body.append_child(&sprite).map_err(host_err)?;
        }

        log::info!("Attached {} elements", layout.element_ids().len());
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), SurfaceError> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) -> Result<(), SurfaceError> {
        let el = self.element(id)?;
        let el: &HtmlElement = el
            .dyn_ref()
            .ok_or_else(|| SurfaceError::Host(format!("`{id}` is not an HTML element")))?;
        el.style().set_property(property, value).map_err(host_err)
    }
}
