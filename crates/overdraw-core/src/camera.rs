//! Editor surface zoom.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

/// Discrete zoom levels offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zoom {
    /// 1x
    #[default]
    Normal,
    /// 2x
    Double,
}

impl Zoom {
    pub fn factor(self) -> f64 {
        match self {
            Zoom::Normal => 1.0,
            Zoom::Double => 2.0,
        }
    }
}

/// Maps between screen pixels and surface coordinates.
///
/// Scaling is uniform on both axes and anchored at the surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub zoom: Zoom,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface to screen.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom.factor())
    }

    /// Screen to surface.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom.factor())
    }

    pub fn screen_to_surface(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn surface_to_screen(&self, surface_point: Point) -> Point {
        self.transform() * surface_point
    }

    pub fn zoom_in(&mut self) {
        self.zoom = Zoom::Double;
    }

    pub fn zoom_out(&mut self) {
        self.zoom = Zoom::Normal;
    }
}
