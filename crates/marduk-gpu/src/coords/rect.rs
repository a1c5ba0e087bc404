use super::Quad;

/// Axis-aligned rectangle stored as its four edges.
///
/// Edge order matches vertex emission: `left`/`right` on X, `top`/`bottom` on Y
/// (top-left origin, +Y down). Edges are taken as given; an inverted
/// rectangle produces mirrored quad corners.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[inline]
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_ltrb(x, y, x + w, y + h)
    }

    /// The four corners in triangle-strip order (see [`Quad`]).
    #[inline]
    pub fn to_quad(self) -> Quad {
        Quad::from_rect(self)
    }
}
