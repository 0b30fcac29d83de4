//! Canvas state: recorder, history and view.

use crate::camera::Camera;
use crate::compose::{RenderLayer, Surface, compose_layers};
use crate::config::{CanvasConfig, ConfigError};
use crate::history::{HistoryResult, Recall, VersionHistory};
use crate::input::PointerEvent;
use crate::palette::PaletteError;
use crate::recorder::StrokeRecorder;
use crate::stroke::{StrokeSet, StrokeTool};
use kurbo::Point;

/// Runtime state of one drawing session.
///
/// Every mutation goes through `&mut Canvas`, so a recall followed by further
/// drawing can never interleave with a commit.
#[derive(Debug, Clone)]
pub struct Canvas {
    config: CanvasConfig,
    recorder: StrokeRecorder,
    history: VersionHistory,
    /// Editor view transform. The preview surface is never zoomed.
    pub camera: Camera,
    has_background: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas with the default configuration.
    pub fn new() -> Self {
        Self::build(CanvasConfig::default())
    }

    /// Create a canvas from a validated configuration.
    pub fn with_config(config: CanvasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CanvasConfig) -> Self {
        let mut recorder = StrokeRecorder::new(config.palette.clone());
        recorder.set_tool(config.default_tool);
        recorder.set_thickness(config.default_thickness);
        if let Err(e) = recorder.set_color(&config.default_color) {
            log::warn!("Ignoring default color: {}", e);
        }
        Self {
            config,
            recorder,
            history: VersionHistory::new(),
            camera: Camera::new(),
            has_background: false,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Feed a pointer event from the editor surface (screen coordinates).
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position: Some(p), .. } => {
                let p = self.camera.screen_to_surface(p);
                self.recorder.begin_stroke(p);
            }
            PointerEvent::Move { position: Some(p), .. } => {
                let p = self.camera.screen_to_surface(p);
                self.recorder.extend_stroke(p);
            }
            PointerEvent::Up { .. } => self.recorder.end_stroke(),
            PointerEvent::Down { position: None, source }
            | PointerEvent::Move { position: None, source } => {
                log::trace!("Dropped {:?} sample outside the surface", source);
            }
        }
    }

    /// Start a stroke at a surface position.
    pub fn begin_stroke(&mut self, position: Point) {
        self.recorder.begin_stroke(position);
    }

    pub fn extend_stroke(&mut self, position: Point) {
        self.recorder.extend_stroke(position);
    }

    pub fn end_stroke(&mut self) {
        self.recorder.end_stroke();
    }

    pub fn set_tool(&mut self, tool: StrokeTool) {
        self.recorder.set_tool(tool);
    }

    pub fn set_color(&mut self, name: &str) -> Result<(), PaletteError> {
        self.recorder.set_color(name)
    }

    pub fn set_thickness(&mut self, thickness: u8) {
        self.recorder.set_thickness(thickness);
    }

    /// Commit the live strokes as a new version and start a fresh one.
    /// Returns the committed version's number.
    pub fn commit(&mut self) -> usize {
        let strokes = self.recorder.take_live();
        self.history.commit(strokes)
    }

    /// Load version `n` into the live buffer. Out-of-range requests change nothing.
    pub fn recall(&mut self, n: usize) -> HistoryResult<()> {
        if let Recall::Replaced(strokes) = self.history.recall(n)? {
            self.recorder.replace_live(strokes);
        }
        Ok(())
    }

    /// Slider entry point: clamp `n` into the committed range and recall it.
    /// Returns the selected version, or `None` when history is empty.
    pub fn scrub_to(&mut self, n: usize) -> Option<usize> {
        let n = self.history.clamp_index(n)?;
        // clamp_index only returns valid indices
        self.recall(n).ok()?;
        Some(n)
    }

    pub fn toggle_overlay_all(&mut self) -> bool {
        self.history.toggle_overlay_all()
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    /// Tell the canvas whether a background image is available.
    pub fn set_has_background(&mut self, has_background: bool) {
        self.has_background = has_background;
    }

    pub fn has_background(&self) -> bool {
        self.has_background
    }

    /// Ordered render layers for `surface`, bottom first.
    pub fn layers(&self, surface: Surface) -> Vec<RenderLayer> {
        compose_layers(surface, self.has_background, &self.history, self.recorder.live())
    }

    pub fn live(&self) -> &StrokeSet {
        self.recorder.live()
    }

    /// Shared handle to the live strokes for change detection.
    pub fn snapshot(&self) -> StrokeSet {
        self.recorder.snapshot()
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    pub fn current_version(&self) -> usize {
        self.history.current_version()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::LayerSource;
    use crate::history::HistoryError;
    use crate::input::PointerSource;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn draw(canvas: &mut Canvas, points: &[(f64, f64)]) {
        let (x, y) = points[0];
        canvas.handle_pointer(PointerEvent::down(x, y));
        for &(x, y) in &points[1..] {
            canvas.handle_pointer(PointerEvent::moved(x, y));
        }
        canvas.handle_pointer(PointerEvent::up());
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn canvas_with_versions(n: usize) -> Canvas {
        init_logger();
        let mut canvas = Canvas::new();
        for i in 0..n {
            let x = (i * 10) as f64;
            draw(&mut canvas, &[(x, 0.0), (x + 5.0, 5.0)]);
            canvas.commit();
        }
        canvas
    }

    #[test]
    fn test_draw_and_commit() {
        init_logger();
        let mut canvas = Canvas::new();
        canvas.set_tool(StrokeTool::Pen);
        canvas.set_color("red").unwrap();
        canvas.set_thickness(2);
        draw(&mut canvas, &[(10.0, 10.0), (20.0, 20.0), (30.0, 10.0)]);

        assert_eq!(canvas.commit(), 1);

        let version = canvas.history().get(1).unwrap();
        assert_eq!(version.strokes().len(), 1);
        let stroke = version.strokes().get(0).unwrap();
        assert_eq!(stroke.tool, StrokeTool::Pen);
        assert_eq!(stroke.color.to_hex(), "#ff0100");
        assert_eq!(stroke.thickness, 2);
        assert_eq!(stroke.points(), &[pt(10.0, 10.0), pt(20.0, 20.0), pt(30.0, 10.0)]);

        assert!(canvas.live().is_empty());
        assert_eq!(canvas.current_version(), 2);
    }

    #[test]
    fn test_recall_second_of_three() {
        let mut canvas = canvas_with_versions(3);
        canvas.recall(2).unwrap();
        assert_eq!(canvas.live(), canvas.history().get(2).unwrap().strokes());
        assert_eq!(canvas.current_version(), 2);
    }

    #[test]
    fn test_recall_out_of_range_changes_nothing() {
        let mut canvas = canvas_with_versions(3);
        draw(&mut canvas, &[(1.0, 1.0)]);
        let live = canvas.snapshot();

        assert_eq!(
            canvas.recall(5),
            Err(HistoryError::OutOfRange { requested: 5, len: 3 })
        );
        assert_eq!(canvas.current_version(), 4);
        assert!(canvas.live().ptr_eq(&live));
    }

    #[test]
    fn test_scrub_clamps() {
        let mut canvas = canvas_with_versions(3);
        assert_eq!(canvas.scrub_to(5), Some(3));
        assert_eq!(canvas.current_version(), 3);
        assert_eq!(canvas.scrub_to(0), Some(1));
        assert_eq!(canvas.current_version(), 1);
    }

    #[test]
    fn test_scrub_empty_history() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.scrub_to(1), None);
        assert_eq!(canvas.current_version(), 1);
    }

    #[test]
    fn test_recall_then_draw_keeps_history() {
        let mut canvas = canvas_with_versions(2);
        let stored = canvas.history().get(1).unwrap().strokes().clone();
        let before: StrokeSet = stored.iter().cloned().collect();

        canvas.recall(1).unwrap();
        draw(&mut canvas, &[(50.0, 50.0), (60.0, 60.0)]);
        canvas.set_tool(StrokeTool::Eraser);
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0)]);

        assert_eq!(canvas.live().len(), 3);
        assert_eq!(canvas.history().get(1).unwrap().strokes(), &before);
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_recalled_edit_commits_as_new_version() {
        let mut canvas = canvas_with_versions(2);
        canvas.recall(1).unwrap();
        draw(&mut canvas, &[(70.0, 70.0)]);
        assert_eq!(canvas.commit(), 3);
        assert_eq!(canvas.history().get(3).unwrap().strokes().len(), 2);
        assert_eq!(canvas.history().get(1).unwrap().strokes().len(), 1);
        assert_eq!(canvas.current_version(), 4);
    }

    #[test]
    fn test_commit_mid_gesture_ends_it() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::down(0.0, 0.0));
        canvas.commit();
        assert!(!canvas.is_drawing());
        canvas.handle_pointer(PointerEvent::moved(1.0, 1.0));
        assert!(canvas.live().is_empty());
        assert_eq!(canvas.history().get(1).unwrap().strokes().len(), 1);
    }

    #[test]
    fn test_dropped_samples() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::Down { position: None, source: PointerSource::Touch });
        assert!(!canvas.is_drawing());
        assert!(canvas.live().is_empty());

        canvas.handle_pointer(PointerEvent::down(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::Move { position: None, source: PointerSource::Mouse });
        canvas.handle_pointer(PointerEvent::moved(2.0, 2.0));
        canvas.handle_pointer(PointerEvent::up());
        assert_eq!(canvas.live().last().unwrap().points(), &[pt(0.0, 0.0), pt(2.0, 2.0)]);
    }

    #[test]
    fn test_mouse_and_touch_down_together() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::down(3.0, 3.0).with_source(PointerSource::Touch));
        canvas.handle_pointer(PointerEvent::down(3.0, 3.0));
        canvas.handle_pointer(PointerEvent::up().with_source(PointerSource::Touch));
        canvas.handle_pointer(PointerEvent::up());
        assert_eq!(canvas.live().len(), 1);
    }

    #[test]
    fn test_zoom_maps_to_surface() {
        let mut canvas = Canvas::new();
        canvas.zoom_in();
        draw(&mut canvas, &[(40.0, 20.0), (60.0, 30.0)]);
        assert_eq!(canvas.live().last().unwrap().points(), &[pt(20.0, 10.0), pt(30.0, 15.0)]);
    }

    #[test]
    fn test_live_eraser_stays_in_live_layer() {
        let mut canvas = canvas_with_versions(1);
        canvas.set_tool(StrokeTool::Eraser);
        draw(&mut canvas, &[(0.0, 0.0), (5.0, 5.0)]);
        canvas.toggle_overlay_all();

        let layers = canvas.layers(Surface::Editor);
        assert_eq!(layers.len(), 2);
        let version_layer = layers[0].strokes().unwrap();
        assert!(version_layer.iter().all(|s| !s.is_eraser()));
        assert_eq!(layers[1].source(), Some(LayerSource::Live));
        assert!(layers[1].strokes().unwrap().iter().all(|s| s.is_eraser()));
    }

    #[test]
    fn test_background_layer() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.layers(Surface::Preview).len(), 1);
        canvas.set_has_background(true);
        assert_eq!(canvas.layers(Surface::Preview)[0], RenderLayer::Background);
    }

    #[test]
    fn test_with_config_defaults() {
        let config = CanvasConfig {
            default_tool: StrokeTool::Eraser,
            default_color: "green".to_string(),
            default_thickness: 5,
            ..CanvasConfig::default()
        };
        let mut canvas = Canvas::with_config(config).unwrap();
        canvas.begin_stroke(Point::ZERO);
        let stroke = canvas.live().last().unwrap();
        assert!(stroke.is_eraser());
        assert_eq!(stroke.color.to_hex(), "#13ff00");
        assert_eq!(stroke.thickness, 5);
    }

    #[test]
    fn test_with_invalid_config() {
        let config = CanvasConfig {
            default_color: "teal".to_string(),
            ..CanvasConfig::default()
        };
        assert!(Canvas::with_config(config).is_err());
    }
}
