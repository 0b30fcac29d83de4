//! Stroke recorder: turns pointer gestures into strokes.

use crate::palette::{Palette, PaletteError, StrokeColor};
use crate::stroke::{MAX_THICKNESS, Stroke, StrokeSet, StrokeTool};
use kurbo::Point;

/// Default color name for new strokes.
pub const DEFAULT_COLOR: &str = "red";
/// Default thickness for new strokes.
pub const DEFAULT_THICKNESS: u8 = 1;

/// State of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Waiting for a pointer-down.
    #[default]
    Idle,
    /// Pointer is down; moves extend the last live stroke.
    Drawing,
}

/// Records pointer gestures into the live stroke set.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    state: GestureState,
    live: StrokeSet,
    palette: Palette,
    tool: StrokeTool,
    /// Palette name of the active color.
    color_name: String,
    thickness: u8,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl StrokeRecorder {
    /// Create a recorder using `palette` for color lookups.
    ///
    /// The active color starts at `red` when the palette has it, otherwise at the
    /// palette's first entry.
    pub fn new(palette: Palette) -> Self {
        let color_name = if palette.contains(DEFAULT_COLOR) {
            DEFAULT_COLOR.to_string()
        } else {
            palette.names().next().unwrap_or(DEFAULT_COLOR).to_string()
        };
        Self {
            state: GestureState::Idle,
            live: StrokeSet::new(),
            palette,
            tool: StrokeTool::default(),
            color_name,
            thickness: DEFAULT_THICKNESS,
        }
    }

    /// Start a stroke at `position`. Ignored while a gesture is already active, so
    /// a mouse and a touch down-event for the same press only start one stroke.
    pub fn begin_stroke(&mut self, position: Point) {
        if self.state == GestureState::Drawing {
            log::trace!("begin_stroke ignored: gesture already active");
            return;
        }
        let stroke = Stroke::new(self.tool, self.active_color(), self.thickness, position);
        log::debug!(
            "Stroke {} started: {} {} {}",
            self.live.len() + 1,
            stroke.tool,
            stroke.color,
            stroke.thickness
        );
        self.live.push(stroke);
        self.state = GestureState::Drawing;
    }

    /// Append `position` to the stroke being drawn. Silent no-op when idle.
    pub fn extend_stroke(&mut self, position: Point) {
        if self.state != GestureState::Drawing {
            log::trace!("extend_stroke ignored: no active gesture");
            return;
        }
        if !self.live.extend_last(position) {
            // Live buffer was replaced under an active gesture.
            self.state = GestureState::Idle;
        }
    }

    /// Finish the current gesture. Calling it again has no further effect.
    pub fn end_stroke(&mut self) {
        if self.state == GestureState::Drawing {
            if let Some(stroke) = self.live.last() {
                log::debug!("Stroke finished with {} points", stroke.len());
            }
        }
        self.state = GestureState::Idle;
    }

    pub fn set_tool(&mut self, tool: StrokeTool) {
        self.tool = tool;
    }

    /// Select the color for the next stroke. Strokes already started keep
    /// their color.
    pub fn set_color(&mut self, name: &str) -> Result<(), PaletteError> {
        let entry = self.palette.entry(name)?;
        self.color_name = entry.name.clone();
        Ok(())
    }

    /// Select the thickness for the next stroke, saturating at 5.
    pub fn set_thickness(&mut self, thickness: u8) {
        self.thickness = thickness.min(MAX_THICKNESS);
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn color_name(&self) -> &str {
        &self.color_name
    }

    /// The resolved active color.
    pub fn active_color(&self) -> StrokeColor {
        // color_name was validated against the palette when it was set
        self.palette
            .resolve(&self.color_name)
            .unwrap_or_else(|_| StrokeColor::black())
    }

    pub fn thickness(&self) -> u8 {
        self.thickness
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == GestureState::Drawing
    }

    /// The stroke currently growing under the pointer.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        if self.is_drawing() { self.live.last() } else { None }
    }

    /// Borrow the live strokes.
    pub fn live(&self) -> &StrokeSet {
        &self.live
    }

    /// Shared handle to the live strokes. Unchanged until the next mutation.
    pub fn snapshot(&self) -> StrokeSet {
        self.live.clone()
    }

    /// Move the live strokes out, leaving an empty buffer.
    pub fn take_live(&mut self) -> StrokeSet {
        self.state = GestureState::Idle;
        std::mem::take(&mut self.live)
    }

    /// Swap in a new live buffer (e.g. a recalled version).
    pub fn replace_live(&mut self, strokes: StrokeSet) {
        self.state = GestureState::Idle;
        self.live = strokes;
    }
}
