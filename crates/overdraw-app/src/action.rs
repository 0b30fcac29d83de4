//! Scripted control-surface actions.

use overdraw_core::canvas::Canvas;
use overdraw_core::input::PointerEvent;
use overdraw_core::stroke::StrokeTool;
use serde::{Deserialize, Serialize};

/// One step of a replayed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Change the current tool.
    SetTool { tool: StrokeTool },
    /// Change stroke color by palette name.
    SetColor { name: String },
    /// Change stroke thickness.
    SetThickness { value: u8 },
    /// Feed a pointer event from the editor surface.
    Pointer { event: PointerEvent },
    /// Save the live buffer as a new version.
    Commit,
    /// Move the version slider (clamped).
    Scrub { version: usize },
    /// Recall an exact version.
    Recall { version: usize },
    /// Show or hide all versions under the live strokes.
    ToggleOverlay,
    /// Switch the editor zoom.
    Zoom { double: bool },
}

impl Action {
    /// Apply the action to `canvas`. Rejected actions are logged and leave the canvas as is.
    pub fn apply(&self, canvas: &mut Canvas) {
        match self {
            Action::SetTool { tool } => canvas.set_tool(*tool),
            Action::SetColor { name } => {
                if let Err(e) = canvas.set_color(name) {
                    log::warn!("Ignoring color change: {}", e);
                }
            }
            Action::SetThickness { value } => canvas.set_thickness(*value),
            Action::Pointer { event } => canvas.handle_pointer(*event),
            Action::Commit => {
                let n = canvas.commit();
                if let Some(version) = canvas.history().get(n) {
                    log::info!("Committed {} ({})", version.name, version.id);
                }
            }
            Action::Scrub { version } => {
                if canvas.scrub_to(*version).is_none() {
                    log::warn!("Cannot scrub to {}: no versions saved", version);
                }
            }
            Action::Recall { version } => {
                if let Err(e) = canvas.recall(*version) {
                    log::warn!("Recall rejected: {}", e);
                }
            }
            Action::ToggleOverlay => {
                let on = canvas.toggle_overlay_all();
                log::debug!("Overlay all versions: {}", on);
            }
            Action::Zoom { double: true } => canvas.zoom_in(),
            Action::Zoom { double: false } => canvas.zoom_out(),
        }
    }
}
