//! Corner-aware values for [`VertexWriter::write_quad`].
//!
//! A quad is written as four vertices. Plain values repeat at every vertex;
//! corner values (`TriStrip`, `TriFan`, `Quad`) emit a different point per
//! corner so the four vertices trace the rectangle in the order the primitive
//! topology expects.
//!
//! | corner | TriStrip | TriFan |
//! |--------|----------|--------|
//! | 0      | (l, t)   | (l, t) |
//! | 1      | (l, b)   | (l, b) |
//! | 2      | (r, t)   | (r, b) |
//! | 3      | (r, b)   | (r, t) |

use crate::coords::{Quad, Rect};

use super::{VertexValue, VertexWriter};

/// Index of one of the four vertices of a quad, in emission order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Corner(u8);

impl Corner {
    /// Emission order used by `write_quad`.
    pub const ALL: [Corner; 4] = [Corner(0), Corner(1), Corner(2), Corner(3)];

    #[inline]
    pub const fn new(index: usize) -> Option<Corner> {
        if index < 4 { Some(Corner(index as u8)) } else { None }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A value that knows what to emit at each quad corner.
///
/// Every [`VertexValue`] is a `QuadValue` that emits itself at all four corners.
pub trait QuadValue {
    fn write_corner(&self, writer: &mut VertexWriter<'_>, corner: Corner);
}

impl<T: VertexValue + ?Sized> QuadValue for T {
    #[inline]
    fn write_corner(&self, writer: &mut VertexWriter<'_>, _corner: Corner) {
        self.write_to(writer);
    }
}

/// Rectangle edges expanded in triangle-strip order:
/// left-top, left-bottom, right-top, right-bottom.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriStrip<T> {
    pub l: T,
    pub t: T,
    pub r: T,
    pub b: T,
}

impl TriStrip<f32> {
    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        Self { l: rect.left, t: rect.top, r: rect.right, b: rect.bottom }
    }
}

impl TriStrip<u16> {
    /// Integer texel rectangle given as `[l, t, r, b]`.
    #[inline]
    pub fn from_uvs(rect: [u16; 4]) -> Self {
        let [l, t, r, b] = rect;
        Self { l, t, r, b }
    }
}

impl<T: VertexValue> QuadValue for TriStrip<T> {
    #[inline]
    fn write_corner(&self, writer: &mut VertexWriter<'_>, corner: Corner) {
        match corner.index() {
            0 => writer.write((&self.l, &self.t)),
            1 => writer.write((&self.l, &self.b)),
            2 => writer.write((&self.r, &self.t)),
            _ => writer.write((&self.r, &self.b)),
        }
    }
}

/// Rectangle edges expanded in triangle-fan order:
/// left-top, left-bottom, right-bottom, right-top.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriFan<T> {
    pub l: T,
    pub t: T,
    pub r: T,
    pub b: T,
}

impl TriFan<f32> {
    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        Self { l: rect.left, t: rect.top, r: rect.right, b: rect.bottom }
    }
}

impl<T: VertexValue> QuadValue for TriFan<T> {
    #[inline]
    fn write_corner(&self, writer: &mut VertexWriter<'_>, corner: Corner) {
        match corner.index() {
            0 => writer.write((&self.l, &self.t)),
            1 => writer.write((&self.l, &self.b)),
            2 => writer.write((&self.r, &self.b)),
            _ => writer.write((&self.r, &self.t)),
        }
    }
}

impl QuadValue for Quad {
    #[inline]
    fn write_corner(&self, writer: &mut VertexWriter<'_>, corner: Corner) {
        writer.write(self.point(corner.index()));
    }
}

/// The argument list of one `write_quad` call: a tuple of [`QuadValue`]s.
pub trait QuadRecord {
    /// Writes every element for `corner`, left to right.
    fn write_pass(&self, writer: &mut VertexWriter<'_>, corner: Corner);
}

impl QuadRecord for () {
    #[inline]
    fn write_pass(&self, _writer: &mut VertexWriter<'_>, _corner: Corner) {}
}

macro_rules! impl_quad_record_tuple {
    ($($name:ident),+) => {
        impl<$($name: QuadValue),+> QuadRecord for ($($name,)+) {
            #[inline]
            #[allow(non_snake_case)]
            fn write_pass(&self, writer: &mut VertexWriter<'_>, corner: Corner) {
                let ($($name,)+) = self;
                $($name.write_corner(writer, corner);)+
            }
        }
    };
}

impl_quad_record_tuple!(A);
impl_quad_record_tuple!(A, B);
impl_quad_record_tuple!(A, B, C);
impl_quad_record_tuple!(A, B, C, D);
impl_quad_record_tuple!(A, B, C, D, E);
impl_quad_record_tuple!(A, B, C, D, E, F);
impl_quad_record_tuple!(A, B, C, D, E, F, G);
impl_quad_record_tuple!(A, B, C, D, E, F, G, H);
impl_quad_record_tuple!(A, B, C, D, E, F, G, H, I);
impl_quad_record_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_quad_record_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_quad_record_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
