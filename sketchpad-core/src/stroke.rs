//! # Strokes
//!
//! The in-progress point sequence of one continuous pointer drag. Points are
//! ephemeral - they exist only while the pointer is down, and the buffer is
//! discarded after the mark is committed to a layer or the drag is cancelled.

/// A position in workspace pixels.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a point set.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}
impl Bounds {
    /// None for an empty set.
    #[must_use]
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in &points[1..] {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.max_y = bounds.max_y.max(point.y);
        }
        Some(bounds)
    }
    /// Grow outward by `margin` on every side.
    #[must_use]
    pub fn inflate(self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Append-only accumulator for the active stroke. Owned exclusively by the
/// drawing session; renderers replay the whole slice on every addition.
#[derive(Clone, Debug, Default)]
pub struct StrokeBuffer {
    points: Vec<Point>,
}
impl StrokeBuffer {
    /// Drop any stale points and start a fresh stroke at `origin`.
    pub fn begin(&mut self, origin: Point) {
        self.points.clear();
        self.points.push(origin);
    }
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// End the stroke, releasing its points.
    pub fn finish(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod test {
    use super::{Bounds, Point, StrokeBuffer};

    #[test]
    fn bounds_of_points() {
        let points = [
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(0.5, 0.5),
        ];
        let bounds = Bounds::of(&points).unwrap();
        assert_eq!(bounds.min_x, -2.0);
        assert_eq!(bounds.max_x, 3.0);
        assert_eq!(bounds.min_y, -1.0);
        assert_eq!(bounds.max_y, 4.0);
        assert!(Bounds::of(&[]).is_none());

        let grown = bounds.inflate(1.0);
        assert!(grown.contains(Point::new(4.0, 5.0)));
        assert!(!grown.contains(Point::new(4.1, 5.0)));
    }
    #[test]
    fn begin_discards_previous_stroke() {
        let mut stroke = StrokeBuffer::default();
        stroke.begin(Point::new(1.0, 1.0));
        stroke.push(Point::new(2.0, 2.0));
        assert_eq!(stroke.len(), 2);

        stroke.begin(Point::new(5.0, 5.0));
        assert_eq!(stroke.points(), &[Point::new(5.0, 5.0)]);

        stroke.finish();
        assert!(stroke.is_empty());
    }
}
