//! CPU raster renderer built on tiny-skia.
//!
//! Every stroke layer is painted into its own transparent pixmap, so an eraser
//! stroke only removes pixels of the layer it belongs to. Layers are then
//! drawn onto the frame source-over with their opacity.

use crate::background::Background;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use image::{ImageFormat, Rgba, RgbaImage};
use kurbo::{Affine, BezPath, Cap, Circle, Join, PathEl, Rect, Shape, StrokeOpts};
use overdraw_core::compose::RenderLayer;
use overdraw_core::stroke::{Stroke, StrokeSet};
use peniko::{BlendMode, Compose};
use std::io::Cursor;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

/// Largest frame edge in pixels.
const MAX_DIMENSION: u32 = 16_384;
/// Flattening tolerance for stroke outlines, in pixels.
const TOLERANCE: f64 = 0.1;

fn new_pixmap(width: u32, height: u32) -> RenderResult<Pixmap> {
    Pixmap::new(width, height).ok_or_else(|| {
        RendererError::RenderFailed(format!("cannot allocate {width}x{height} pixmap"))
    })
}

fn skia_blend_mode(mode: BlendMode) -> tiny_skia::BlendMode {
    match mode.compose {
        Compose::DestOut => tiny_skia::BlendMode::DestinationOut,
        Compose::Clear => tiny_skia::BlendMode::Clear,
        _ => tiny_skia::BlendMode::SourceOver,
    }
}

fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(a, b, p) => pb.cubic_to(
                a.x as f32, a.y as f32, b.x as f32, b.y as f32, p.x as f32, p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Filled outline of `stroke` in pixel space. `None` when it paints nothing.
fn stroke_outline(stroke: &Stroke, scale: f64, tension: f64) -> Option<BezPath> {
    if stroke.thickness == 0 {
        return None;
    }
    let transform = Affine::scale(scale);
    let width = f64::from(stroke.thickness) * scale;
    let points = stroke.points();
    let first = *points.first()?;

    // zero-length strokes are drawn as their round cap
    if points.iter().all(|&p| p == first) {
        return Some(Circle::new(transform * first, width / 2.0).to_path(TOLERANCE));
    }

    let path = transform * stroke.to_path(tension);
    let style = kurbo::Stroke::new(width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    Some(kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), TOLERANCE))
}

/// Paint `strokes` into a fresh transparent pixmap.
fn paint_layer(
    strokes: &StrokeSet,
    width: u32,
    height: u32,
    scale: f64,
    tension: f64,
) -> RenderResult<Pixmap> {
    let mut layer = new_pixmap(width, height)?;
    let frame_rect = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    let transform = Affine::scale(scale);

    for stroke in strokes {
        if !transform.transform_rect_bbox(stroke.bounds()).overlaps(frame_rect) {
            continue;
        }
        let Some(path) = stroke_outline(stroke, scale, tension).as_ref().and_then(skia_path) else {
            continue;
        };
        let color = stroke.color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.blend_mode = skia_blend_mode(stroke.tool.blend_mode());
        paint.anti_alias = true;
        layer.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    Ok(layer)
}

fn background_pixmap(background: &Background) -> RenderResult<Pixmap> {
    let image = background.image();
    let mut pixmap = new_pixmap(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

/// Encode an RGBA frame as PNG.
pub fn encode_png(frame: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    frame
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RendererError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Software renderer producing an `RgbaImage` frame.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    frame: Option<RgbaImage>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last rendered frame.
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    pub fn take_frame(&mut self) -> Option<RgbaImage> {
        self.frame.take()
    }

    fn rasterize(&self, ctx: &RenderContext<'_>) -> RenderResult<Pixmap> {
        let (width, height) = ctx.pixel_size();
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RendererError::RenderFailed(format!(
                "invalid frame size {width}x{height}"
            )));
        }

        let mut frame = new_pixmap(width, height)?;
        let fill = self.background_color(ctx).to_rgba8();
        frame.fill(tiny_skia::Color::from_rgba8(fill.r, fill.g, fill.b, fill.a));
        let frame_rect = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        let scale = Affine::scale(ctx.scale);

        for layer in &ctx.layers {
            match layer {
                RenderLayer::Background => {
                    let Some(background) = ctx.background else {
                        log::debug!("No background image, skipping background layer");
                        continue;
                    };
                    match background_pixmap(background) {
                        Ok(pixmap) => frame.draw_pixmap(
                            0,
                            0,
                            pixmap.as_ref(),
                            &PixmapPaint {
                                quality: FilterQuality::Nearest,
                                ..PixmapPaint::default()
                            },
                            Transform::from_scale(ctx.scale as f32, ctx.scale as f32),
                            None,
                        ),
                        Err(e) => log::warn!("Skipping background layer: {}", e),
                    }
                }
                RenderLayer::Strokes { strokes, opacity, .. } => {
                    let visible = strokes
                        .bounds()
                        .is_some_and(|b| scale.transform_rect_bbox(b).overlaps(frame_rect));
                    if !visible {
                        continue;
                    }
                    let pixmap = paint_layer(strokes, width, height, ctx.scale, ctx.tension)?;
                    frame.draw_pixmap(
                        0,
                        0,
                        pixmap.as_ref(),
                        &PixmapPaint {
                            opacity: *opacity as f32,
                            ..PixmapPaint::default()
                        },
                        Transform::identity(),
                        None,
                    );
                }
            }
        }

        Ok(frame)
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext<'_>) -> RenderResult<()> {
        let pixmap = self.rasterize(ctx)?;
        self.frame = Some(to_image(&pixmap));
        Ok(())
    }

    fn export_png(&mut self, ctx: &RenderContext<'_>) -> RenderResult<Vec<u8>> {
        self.render(ctx)?;
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| RendererError::RenderFailed("no frame rendered".to_string()))?;
        encode_png(frame)
    }
}
