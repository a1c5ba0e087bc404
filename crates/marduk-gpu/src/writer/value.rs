//! Value shapes understood by [`VertexWriter::write`].

use std::marker::PhantomData;

use bytemuck::Pod;

use crate::coords::Point;
use crate::paint::VertexColor;

use super::VertexWriter;

/// A value with a defined serialized layout in a vertex buffer.
///
/// Implemented for:
/// - POD scalars and `Point` (copied verbatim),
/// - `[T; N]` of POD (N elements back to back),
/// - [`VertexColor`] (1 or 4 words),
/// - [`Conditional`] and [`Skip`],
/// - tuples of up to 12 values (written left to right) and references.
///
/// Opt a `#[repr(C)]` POD type in with [`impl_vertex_value!`](crate::impl_vertex_value).
pub trait VertexValue {
    /// Serializes at the writer's cursor and advances it by [`byte_size`](Self::byte_size).
    fn write_to(&self, writer: &mut VertexWriter<'_>);

    /// Number of bytes the cursor advances when this value is written.
    fn byte_size(&self) -> usize;
}

/// Implements [`VertexValue`] for `bytemuck::Pod` types by verbatim copy.
///
/// ```
/// use marduk_gpu::bytemuck::{Pod, Zeroable};
///
/// #[repr(C)]
/// #[derive(Copy, Clone, Pod, Zeroable)]
/// struct Uv { u: u16, v: u16 }
///
/// marduk_gpu::impl_vertex_value!(Uv);
///
/// let mut buf = [0u8; 4];
/// let mut w = marduk_gpu::writer::VertexWriter::new(&mut buf);
/// w.write(Uv { u: 1, v: 2 });
/// assert_eq!(w.position(), 4);
/// ```
#[macro_export]
macro_rules! impl_vertex_value {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::writer::VertexValue for $ty {
            #[inline]
            fn write_to(&self, writer: &mut $crate::writer::VertexWriter<'_>) {
                writer.write_raw($crate::bytemuck::bytes_of(self));
            }

            #[inline]
            fn byte_size(&self) -> usize {
                ::core::mem::size_of::<$ty>()
            }
        }
    )*};
}

crate::impl_vertex_value!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, Point);

impl<T: Pod, const N: usize> VertexValue for [T; N] {
    #[inline]
    fn write_to(&self, writer: &mut VertexWriter<'_>) {
        writer.write_array(self.as_slice());
    }

    #[inline]
    fn byte_size(&self) -> usize {
        N * std::mem::size_of::<T>()
    }
}

impl<T: VertexValue + ?Sized> VertexValue for &T {
    #[inline]
    fn write_to(&self, writer: &mut VertexWriter<'_>) {
        (**self).write_to(writer);
    }

    #[inline]
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

impl VertexValue for VertexColor {
    #[inline]
    fn write_to(&self, writer: &mut VertexWriter<'_>) {
        writer.write_array(self.words());
    }

    #[inline]
    fn byte_size(&self) -> usize {
        VertexColor::byte_size(self)
    }
}

// ── conditional ───────────────────────────────────────────────────────────

/// A value that is only written when its flag is set.
///
/// When the flag is clear it contributes zero bytes and the cursor stays put,
/// so the flag must match how the vertex layout was declared.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Conditional<T> {
    condition: bool,
    value: T,
}

impl<T> Conditional<T> {
    #[inline]
    pub const fn new(condition: bool, value: T) -> Self {
        Self { condition, value }
    }
}

/// Shorthand for [`Conditional::new`].
#[inline]
pub const fn when<T>(condition: bool, value: T) -> Conditional<T> {
    Conditional::new(condition, value)
}

impl<T: VertexValue> VertexValue for Conditional<T> {
    #[inline]
    fn write_to(&self, writer: &mut VertexWriter<'_>) {
        if self.condition {
            self.value.write_to(writer);
        }
    }

    #[inline]
    fn byte_size(&self) -> usize {
        if self.condition { self.value.byte_size() } else { 0 }
    }
}

// ── skip ──────────────────────────────────────────────────────────────────

/// Reserves `size_of::<T>()` bytes without writing them.
///
/// The skipped bytes keep whatever the buffer already held.
pub struct Skip<T>(PhantomData<fn() -> T>);

impl<T> Skip<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Skip<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Skip<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skip<{}>", std::any::type_name::<T>())
    }
}

impl<T> VertexValue for Skip<T> {
    #[inline]
    fn write_to(&self, writer: &mut VertexWriter<'_>) {
        writer.skip(std::mem::size_of::<T>());
    }

    #[inline]
    fn byte_size(&self) -> usize {
        std::mem::size_of::<T>()
    }
}

// ── tuples ────────────────────────────────────────────────────────────────

impl VertexValue for () {
    #[inline]
    fn write_to(&self, _writer: &mut VertexWriter<'_>) {}

    #[inline]
    fn byte_size(&self) -> usize {
        0
    }
}

macro_rules! impl_vertex_value_tuple {
    ($($name:ident),+) => {
        impl<$($name: VertexValue),+> VertexValue for ($($name,)+) {
            #[inline]
            #[allow(non_snake_case)]
            fn write_to(&self, writer: &mut VertexWriter<'_>) {
                let ($($name,)+) = self;
                $($name.write_to(writer);)+
            }

            #[inline]
            #[allow(non_snake_case)]
            fn byte_size(&self) -> usize {
                let ($($name,)+) = self;
                0 $(+ $name.byte_size())+
            }
        }
    };
}

impl_vertex_value_tuple!(A);
impl_vertex_value_tuple!(A, B);
impl_vertex_value_tuple!(A, B, C);
impl_vertex_value_tuple!(A, B, C, D);
impl_vertex_value_tuple!(A, B, C, D, E);
impl_vertex_value_tuple!(A, B, C, D, E, F);
impl_vertex_value_tuple!(A, B, C, D, E, F, G);
impl_vertex_value_tuple!(A, B, C, D, E, F, G, H);
impl_vertex_value_tuple!(A, B, C, D, E, F, G, H, I);
impl_vertex_value_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_vertex_value_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_vertex_value_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
