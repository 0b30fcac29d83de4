//! Strokes and stroke sets.

use crate::palette::StrokeColor;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::{BlendMode, Compose, Mix};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Largest thickness a control surface can select.
pub const MAX_THICKNESS: u8 = 5;

/// Drawing tool a stroke was made with.
///
/// The tool only changes how a stroke composites, not its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    #[default]
    Pen,
    Eraser,
}

impl StrokeTool {
    /// Blend mode used when this stroke is painted into its layer.
    pub fn blend_mode(self) -> BlendMode {
        match self {
            StrokeTool::Pen => BlendMode::new(Mix::Normal, Compose::SrcOver),
            StrokeTool::Eraser => BlendMode::new(Mix::Normal, Compose::DestOut),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrokeTool::Pen => "pen",
            StrokeTool::Eraser => "eraser",
        }
    }
}

impl fmt::Display for StrokeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrokeTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pen" => Ok(StrokeTool::Pen),
            "eraser" => Ok(StrokeTool::Eraser),
            other => Err(format!("Unknown tool: {other}")),
        }
    }
}

/// One continuous pointer gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrokeData")]
pub struct Stroke {
    pub tool: StrokeTool,
    pub color: StrokeColor,
    /// Line width in surface units, 0..=5.
    pub thickness: u8,
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `start`.
    pub fn new(tool: StrokeTool, color: StrokeColor, thickness: u8, start: Point) -> Self {
        Self {
            tool,
            color,
            thickness: thickness.min(MAX_THICKNESS),
            points: vec![start],
        }
    }

    /// Build a finished stroke. Returns `None` for an empty point list.
    pub fn from_points(
        tool: StrokeTool,
        color: StrokeColor,
        thickness: u8,
        points: Vec<Point>,
    ) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            tool,
            color,
            thickness: thickness.min(MAX_THICKNESS),
            points,
        })
    }

    pub(crate) fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A stroke with a single point (pointer down and up without moving).
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == StrokeTool::Eraser
    }

    /// Bounding box of the points, grown by half the line width.
    pub fn bounds(&self) -> Rect {
        let Some(&first) = self.points.first() else {
            return Rect::ZERO;
        };
        let rect = self
            .points
            .iter()
            .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p));
        let half = f64::from(self.thickness) / 2.0;
        rect.inflate(half, half)
    }

    /// Smooth path through the points.
    ///
    /// `tension` 0 gives straight segments; 1 matches the drawing surface default.
    /// Interior points get cardinal-spline style control points, the first and last
    /// segments are quadratic.
    pub fn to_path(&self, tension: f64) -> BezPath {
        let mut path = BezPath::new();
        let pts = &self.points;

        match pts.len() {
            0 => return path,
            1 => {
                path.move_to(pts[0]);
                return path;
            }
            2 => {
                path.move_to(pts[0]);
                path.line_to(pts[1]);
                return path;
            }
            _ => {}
        }

        // (incoming, outgoing) control points for every interior point
        let controls: Vec<(Point, Point)> = pts
            .windows(3)
            .map(|w| tension_controls(w[0], w[1], w[2], tension))
            .collect();

        path.move_to(pts[0]);
        path.quad_to(controls[0].0, pts[1]);
        for (i, pair) in controls.windows(2).enumerate() {
            path.curve_to(pair[0].1, pair[1].0, pts[i + 2]);
        }
        if let Some(&(_, out)) = controls.last() {
            path.quad_to(out, pts[pts.len() - 1]);
        }
        path
    }
}

/// Serialized stroke, validated into a [`Stroke`].
#[derive(Deserialize)]
struct StrokeData {
    tool: StrokeTool,
    color: StrokeColor,
    thickness: u8,
    points: Vec<Point>,
}

impl TryFrom<StrokeData> for Stroke {
    type Error = String;

    fn try_from(data: StrokeData) -> Result<Self, Self::Error> {
        Stroke::from_points(data.tool, data.color, data.thickness, data.points)
            .ok_or_else(|| "stroke has no points".to_string())
    }
}

fn tension_controls(p0: Point, p1: Point, p2: Point, tension: f64) -> (Point, Point) {
    let d01 = (p1 - p0).hypot();
    let d12 = (p2 - p1).hypot();
    let total = d01 + d12;
    if total < f64::EPSILON {
        return (p1, p1);
    }
    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let span: Vec2 = p2 - p0;
    (p1 - span * fa, p1 + span * fb)
}

/// Strokes of one version, in paint order.
///
/// Clones share storage; the first mutation of a shared set copies it, so a set
/// handed out as a snapshot or stored in history never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeSet {
    strokes: Arc<Vec<Stroke>>,
}

impl StrokeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    /// Whether both handles point at the same storage.
    ///
    /// Frontends use this for change detection: a mutation always yields a set that
    /// is not pointer-equal to any snapshot taken before it.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.strokes, &other.strokes)
    }

    pub fn push(&mut self, stroke: Stroke) {
        Arc::make_mut(&mut self.strokes).push(stroke);
    }

    /// Append a point to the last stroke. Returns false when the set is empty.
    pub(crate) fn extend_last(&mut self, point: Point) -> bool {
        if self.strokes.is_empty() {
            return false;
        }
        if let Some(stroke) = Arc::make_mut(&mut self.strokes).last_mut() {
            stroke.add_point(point);
        }
        true
    }

    /// Bounding box of every stroke, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(|a, b| a.union(b))
    }
}

impl FromIterator<Stroke> for StrokeSet {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Self {
            strokes: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<'a> IntoIterator for &'a StrokeSet {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
