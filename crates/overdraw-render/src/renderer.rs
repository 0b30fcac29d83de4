//! Renderer trait abstraction.

use crate::background::Background;
use kurbo::Size;
use overdraw_core::canvas::Canvas;
use overdraw_core::compose::{RenderLayer, Surface};
use overdraw_core::config::DEFAULT_TENSION;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Image encoding failed: {0}")]
    Encode(String),
    #[error("Image decoding failed: {0}")]
    Decode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything needed to paint one frame.
pub struct RenderContext<'a> {
    /// Layers bottom to top.
    pub layers: Vec<RenderLayer>,
    /// Surface size in surface units (before zoom).
    pub surface_size: Size,
    /// Surface to pixel scale (the editor zoom; 1 for the preview).
    pub scale: f64,
    /// Fill under every layer.
    pub background_color: Color,
    /// Picture for the background layer. When missing, that layer is skipped.
    pub background: Option<&'a Background>,
    /// Spline tension for stroke paths.
    pub tension: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a render context for an explicit layer list.
    pub fn new(layers: Vec<RenderLayer>, surface_size: Size) -> Self {
        Self {
            layers,
            surface_size,
            scale: 1.0,
            background_color: Color::WHITE,
            background: None,
            tension: DEFAULT_TENSION,
        }
    }

    /// Create a render context for one of the canvas' surfaces.
    ///
    /// The editor surface uses the canvas zoom and its overlay setting; the preview
    /// is always 1x without overlays.
    pub fn for_canvas(canvas: &Canvas, surface: Surface) -> Self {
        let config = canvas.config();
        let (size, scale) = match surface {
            Surface::Editor => (config.editor_size, canvas.camera.zoom.factor()),
            Surface::Preview => (config.preview_size, 1.0),
        };
        Self::new(canvas.layers(surface), size)
            .with_scale(scale)
            .with_background_color(config.background_color.into())
            .with_tension(config.tension)
    }

    /// Set the surface to pixel scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the background color.
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the background picture.
    pub fn with_background(mut self, background: Option<&'a Background>) -> Self {
        self.background = background;
        self
    }

    /// Set the stroke spline tension.
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    /// Output size in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.surface_size.width * self.scale).ceil();
        let h = (self.surface_size.height * self.scale).ceil();
        (w.max(0.0) as u32, h.max(0.0) as u32)
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Paint the layers of `ctx` into the backend's frame.
    fn render(&mut self, ctx: &RenderContext<'_>) -> RenderResult<()>;

    /// Render `ctx` and encode the frame as PNG.
    fn export_png(&mut self, ctx: &RenderContext<'_>) -> RenderResult<Vec<u8>>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext<'_>) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overdraw_core::camera::Zoom;
    use overdraw_core::config::CanvasConfig;
    use overdraw_core::palette::StrokeColor;

    #[test]
    fn test_pixel_size_rounds_up() {
        let ctx = RenderContext::new(Vec::new(), Size::new(10.5, 4.2)).with_scale(2.0);
        assert_eq!(ctx.pixel_size(), (21, 9));
    }

    #[test]
    fn test_for_canvas_editor_uses_zoom() {
        let mut canvas = Canvas::new();
        canvas.zoom_in();
        assert_eq!(canvas.camera.zoom, Zoom::Double);
        let editor = RenderContext::for_canvas(&canvas, Surface::Editor);
        assert!((editor.scale - 2.0).abs() < f64::EPSILON);
        let preview = RenderContext::for_canvas(&canvas, Surface::Preview);
        assert!((preview.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_for_canvas_uses_config() {
        let config = CanvasConfig {
            background_color: StrokeColor::rgb(1, 2, 3),
            tension: 0.5,
            ..CanvasConfig::default()
        };
        let canvas = Canvas::with_config(config).unwrap();
        let ctx = RenderContext::for_canvas(&canvas, Surface::Preview);
        let c = ctx.background_color.to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (1, 2, 3, 255));
        assert!((ctx.tension - 0.5).abs() < f64::EPSILON);
    }
}
