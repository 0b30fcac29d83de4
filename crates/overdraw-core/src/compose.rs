//! Render layer ordering.
//!
//! Produces the ordered layer list a render sink paints, bottom to top:
//! background, then committed versions oldest to newest (overlay only), then the
//! live strokes. Eraser strokes punch through their own layer only, so the live
//! layer can never erase committed history.

use crate::history::VersionHistory;
use crate::stroke::StrokeSet;
use serde::{Deserialize, Serialize};

/// Which drawing surface the layers are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Zoomable editing surface; shows overlays when enabled.
    #[default]
    Editor,
    /// Read-only preview: background and live strokes only, never zoomed.
    Preview,
}

/// Where a stroke layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerSource {
    /// Committed version (1-based).
    Version(usize),
    /// The live editing buffer.
    Live,
}

/// One layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderLayer {
    Background,
    Strokes {
        source: LayerSource,
        /// Layer opacity in `[0, 1]`.
        opacity: f64,
        strokes: StrokeSet,
    },
}

impl RenderLayer {
    pub fn strokes(&self) -> Option<&StrokeSet> {
        match self {
            RenderLayer::Background => None,
            RenderLayer::Strokes { strokes, .. } => Some(strokes),
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            RenderLayer::Background => 1.0,
            RenderLayer::Strokes { opacity, .. } => *opacity,
        }
    }

    pub fn source(&self) -> Option<LayerSource> {
        match self {
            RenderLayer::Background => None,
            RenderLayer::Strokes { source, .. } => Some(*source),
        }
    }
}

/// Build the layer stack from explicit inputs.
///
/// `overlay` yields `(strokes, opacity_hint)` oldest first; hints are clamped
/// into `[0, 1]`.
pub fn compose<'a>(
    has_background: bool,
    overlay: Option<impl IntoIterator<Item = (&'a StrokeSet, f64)>>,
    live: &StrokeSet,
) -> Vec<RenderLayer> {
    let mut layers = Vec::new();

    if has_background {
        layers.push(RenderLayer::Background);
    }

    if let Some(overlay) = overlay {
        for (i, (strokes, hint)) in overlay.into_iter().enumerate() {
            layers.push(RenderLayer::Strokes {
                source: LayerSource::Version(i + 1),
                opacity: clamp_opacity(hint),
                strokes: strokes.clone(),
            });
        }
    }

    layers.push(RenderLayer::Strokes {
        source: LayerSource::Live,
        opacity: 1.0,
        strokes: live.clone(),
    });

    layers
}

/// Build the layer stack for `surface` from the history's overlay state.
pub fn compose_layers(
    surface: Surface,
    has_background: bool,
    history: &VersionHistory,
    live: &StrokeSet,
) -> Vec<RenderLayer> {
    let overlay = (surface == Surface::Editor && history.overlay_all())
        .then(|| history.all_versions_for_overlay());
    compose(has_background, overlay, live)
}

fn clamp_opacity(hint: f64) -> f64 {
    if hint.is_nan() { 0.0 } else { hint.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::StrokeColor;
    use crate::stroke::{Stroke, StrokeTool};
    use kurbo::Point;

    fn one_stroke(x: f64) -> StrokeSet {
        [Stroke::new(StrokeTool::Pen, StrokeColor::black(), 1, Point::new(x, 0.0))]
            .into_iter()
            .collect()
    }

    fn history_with(n: usize) -> VersionHistory {
        let mut history = VersionHistory::new();
        for i in 0..n {
            history.commit(one_stroke(i as f64));
        }
        history
    }

    #[test]
    fn test_live_only() {
        let layers = compose_layers(Surface::Editor, false, &history_with(2), &StrokeSet::new());
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].source(), Some(LayerSource::Live));
        assert!((layers[0].opacity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_background_first() {
        let layers = compose_layers(Surface::Editor, true, &history_with(0), &StrokeSet::new());
        assert_eq!(layers[0], RenderLayer::Background);
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn test_overlay_order() {
        let mut history = history_with(3);
        history.toggle_overlay_all();
        let live = one_stroke(99.0);
        let layers = compose_layers(Surface::Editor, true, &history, &live);

        let sources: Vec<_> = layers.iter().map(RenderLayer::source).collect();
        assert_eq!(
            sources,
            vec![
                None,
                Some(LayerSource::Version(1)),
                Some(LayerSource::Version(2)),
                Some(LayerSource::Version(3)),
                Some(LayerSource::Live),
            ]
        );
        assert_eq!(layers[4].strokes(), Some(&live));
        assert!(layers[1].opacity() < layers[2].opacity());
        assert!(layers[2].opacity() < layers[3].opacity());
    }

    #[test]
    fn test_overlay_opacity_is_clamped() {
        let mut history = history_with(10);
        history.toggle_overlay_all();
        let layers = compose_layers(Surface::Editor, false, &history, &StrokeSet::new());
        assert!(layers.iter().all(|l| (0.0..=1.0).contains(&l.opacity())));
        // index 9 of 10: hint 1.2
        assert!((layers[9].opacity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_preview_never_overlays() {
        let mut history = history_with(3);
        history.toggle_overlay_all();
        let layers = compose_layers(Surface::Preview, true, &history, &StrokeSet::new());
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].source(), Some(LayerSource::Live));
    }

    #[test]
    fn test_overlay_with_empty_history() {
        let mut history = history_with(0);
        history.toggle_overlay_all();
        let layers = compose_layers(Surface::Editor, false, &history, &StrokeSet::new());
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_opacity(f64::NAN), 0.0);
        assert_eq!(clamp_opacity(-1.0), 0.0);
    }
}
