use super::{Point, Rect};

/// Four arbitrary points, one per quad corner index.
///
/// Corner indices follow triangle-strip order: 0 = left-top, 1 = left-bottom,
/// 2 = right-top, 3 = right-bottom for a quad built from a rectangle. Points
/// may describe any (possibly non-axis-aligned) quadrilateral.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Quad {
    points: [Point; 4],
}

impl Quad {
    #[inline]
    pub const fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        Self::new([
            Point::new(rect.left, rect.top),
            Point::new(rect.left, rect.bottom),
            Point::new(rect.right, rect.top),
            Point::new(rect.right, rect.bottom),
        ])
    }

    /// Point at `corner` (0..=3).
    ///
    /// # Panics
    /// Panics when `corner > 3`.
    #[inline]
    pub fn point(&self, corner: usize) -> Point {
        self.points[corner]
    }
}

impl From<Rect> for Quad {
    #[inline]
    fn from(rect: Rect) -> Self {
        Quad::from_rect(rect)
    }
}
