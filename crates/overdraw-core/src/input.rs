//! Pointer events from the drawing surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// Unified mouse/touch event in screen coordinates.
///
/// `position` is `None` when the pointer is outside the tracked surface; such a
/// sample is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down {
        position: Option<Point>,
        #[serde(default)]
        source: PointerSource,
    },
    Move {
        position: Option<Point>,
        #[serde(default)]
        source: PointerSource,
    },
    Up {
        #[serde(default)]
        position: Option<Point>,
        #[serde(default)]
        source: PointerSource,
    },
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Some(Point::new(x, y)),
            source: PointerSource::Mouse,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Some(Point::new(x, y)),
            source: PointerSource::Mouse,
        }
    }

    pub fn up() -> Self {
        PointerEvent::Up {
            position: None,
            source: PointerSource::Mouse,
        }
    }

    /// Same event, tagged as coming from `source`.
    pub fn with_source(self, source: PointerSource) -> Self {
        match self {
            PointerEvent::Down { position, .. } => PointerEvent::Down { position, source },
            PointerEvent::Move { position, .. } => PointerEvent::Move { position, source },
            PointerEvent::Up { position, .. } => PointerEvent::Up { position, source },
        }
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => position,
        }
    }

    pub fn source(&self) -> PointerSource {
        match *self {
            PointerEvent::Down { source, .. }
            | PointerEvent::Move { source, .. }
            | PointerEvent::Up { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(PointerEvent::down(1.0, 2.0).position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerEvent::up().position(), None);
        let touch = PointerEvent::moved(3.0, 4.0).with_source(PointerSource::Touch);
        assert_eq!(touch.source(), PointerSource::Touch);
        assert_eq!(touch.position(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_json_shape() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"kind":"down","position":{"x":10.0,"y":20.0}}"#).unwrap();
        assert_eq!(event, PointerEvent::down(10.0, 20.0));

        let outside: PointerEvent =
            serde_json::from_str(r#"{"kind":"move","position":null,"source":"touch"}"#).unwrap();
        assert_eq!(outside.position(), None);
        assert_eq!(outside.source(), PointerSource::Touch);

        let up: PointerEvent = serde_json::from_str(r#"{"kind":"up"}"#).unwrap();
        assert_eq!(up, PointerEvent::up());
    }
}
