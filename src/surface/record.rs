//! In-memory surface
//!
//! Records every draw and element write. Used by the native preview binary
//! and by tests in place of a browser.

use std::collections::BTreeMap;

use super::{Canvas, Hud, HudLayout};
use crate::error::SurfaceError;
use crate::sim::Viewport;

/// A canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: String,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        font: String,
        color: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    size: Viewport,
    commands: Vec<DrawCommand>,
    resizes: usize,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Viewport::new(width, height),
            commands: Vec::new(),
            resizes: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.size = Viewport::new(width, height);
        self.resizes += 1;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &str, color: &str) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: font.to_string(),
            color: color.to_string(),
        });
    }
}

/// Last written state of one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub text: Option<String>,
    pub styles: BTreeMap<String, String>,
    pub writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingHud {
    elements: BTreeMap<String, ElementState>,
}

impl RecordingHud {
    /// Remove an element, as if the host page deleted it
    pub fn detach(&mut self, id: &str) -> Option<ElementState> {
        self.elements.remove(id)
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id)?.text.as_deref()
    }

    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.elements.get(id)?.styles.get(property).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut ElementState, SurfaceError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| SurfaceError::MissingTarget(id.to_string()))
    }
}

impl Hud for RecordingHud {
    fn attach(&mut self, layout: &HudLayout) -> Result<(), SurfaceError> {
        for id in layout.element_ids() {
            self.elements.entry(id).or_default();
        }
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), SurfaceError> {
        let el = self.get_mut(id)?;
        el.text = Some(text.to_string());
        el.writes += 1;
        Ok(())
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) -> Result<(), SurfaceError> {
        let el = self.get_mut(id)?;
        el.styles.insert(property.to_string(), value.to_string());
        el.writes += 1;
        Ok(())
    }
}
