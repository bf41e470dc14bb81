//! # Pointer input
//!
//! Converts raw pointer events into workspace coordinates, compensating for
//! display scaling. Pure functions of the event and the current layout; no
//! side effects.

use crate::stroke::Point;

/// On-screen bounding rectangle of the display surface, client space.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One contact point of a touch-style event, client space.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// The two raw pointer event shapes the engine consumes.
#[derive(Clone, PartialEq, Debug)]
pub enum PointerInput {
    Mouse {
        client_x: f32,
        client_y: f32,
    },
    /// The first contact point is used; the rest ride along only because the
    /// event shape carries them.
    Touch {
        touches: smallvec::SmallVec<[TouchPoint; 2]>,
    },
}

impl PointerInput {
    fn client(&self) -> Option<(f32, f32)> {
        match self {
            Self::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            Self::Touch { touches } => touches
                .first()
                .map(|touch| (touch.client_x, touch.client_y)),
        }
    }
}

/// Map a raw event into workspace pixels:
/// `x = (client_x - rect.left) / rect.width * extent`, same for y.
///
/// `None` for a touch event with no contact points, or a degenerate rect.
#[must_use]
pub fn sample(input: &PointerInput, rect: SurfaceRect, extent: u32) -> Option<Point> {
    let (client_x, client_y) = input.client()?;
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let extent = extent as f32;
    Some(Point::new(
        (client_x - rect.left) / rect.width * extent,
        (client_y - rect.top) / rect.height * extent,
    ))
}
