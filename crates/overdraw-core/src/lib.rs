//! Overdraw Core Library
//!
//! Stroke capture and append-only version history for a freehand drawing surface.
//! Rendering is left to a sink that paints the layer list built by [`compose`].

pub mod camera;
pub mod canvas;
pub mod compose;
pub mod config;
pub mod history;
pub mod input;
pub mod palette;
pub mod recorder;
pub mod stroke;

pub use camera::{Camera, Zoom};
pub use canvas::Canvas;
pub use compose::{LayerSource, RenderLayer, Surface, compose_layers};
pub use config::{CanvasConfig, ConfigError};
pub use history::{HistoryError, HistoryResult, Recall, Version, VersionHistory};
pub use input::{PointerEvent, PointerSource};
pub use palette::{Palette, PaletteError, StrokeColor};
pub use recorder::{GestureState, StrokeRecorder};
pub use stroke::{MAX_THICKNESS, Stroke, StrokeSet, StrokeTool};
