//! Scene files: a canvas, its objects, and the events to replay against it.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use guideline::canvas_snap::CanvasSize;
use guideline::{CanvasEvent, CanvasObject, HostCanvas, MemoryCanvas, Signal, SnapConfig};
use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Deserialize)]
pub struct Scene {
    pub canvas: CanvasSize,
    /// Partial overrides on top of the defaults.
    #[serde(default)]
    pub config: SnapConfig,
    #[serde(default)]
    pub objects: Vec<CanvasObject>,
    #[serde(default)]
    pub events: Vec<SceneEvent>,
}

#[derive(Debug, Deserialize)]
pub struct SceneEvent {
    pub signal: String,
    #[serde(default)]
    pub target: Option<CanvasObject>,
}

impl Scene {
    /// Parse a scene from JSON text.
    pub fn parse(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    /// A memory canvas holding the scene's objects in file order.
    pub fn build_canvas(&self) -> MemoryCanvas {
        let mut canvas = MemoryCanvas::new(self.canvas.width, self.canvas.height);
        for object in &self.objects {
            canvas.add(object.clone());
        }
        canvas
    }

    /// Every event, resolved to what the host would dispatch.
    pub fn canvas_events(&self) -> Result<Vec<CanvasEvent>, CliError> {
        self.events.iter().map(SceneEvent::to_canvas_event).collect()
    }
}

impl SceneEvent {
    pub fn to_canvas_event(&self) -> Result<CanvasEvent, CliError> {
        let signal = Signal::parse(&self.signal).ok_or_else(|| CliError::UnknownSignal(self.signal.clone()))?;
        let target = || self.target.clone().ok_or(CliError::MissingTarget(signal));
        Ok(match signal {
            Signal::ObjectMoving => CanvasEvent::ObjectMoving { target: target()? },
            Signal::ObjectScaling => CanvasEvent::ObjectScaling { target: target()? },
            Signal::SelectionUpdated => CanvasEvent::SelectionUpdated,
            Signal::MouseUp => CanvasEvent::MouseUp,
        })
    }
}
