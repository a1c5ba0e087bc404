use bytemuck::Pod;

use super::quad::{Corner, QuadRecord};
use super::VertexValue;

/// Cursor over a caller-owned vertex region.
///
/// The writer never allocates and does not grow the region. The caller sizes
/// it up front (see [`VertexValue::byte_size`]); running past the end panics on
/// the slice bounds.
///
/// Not `Clone`: two cursors over one region would overwrite each other. Use
/// [`make_offset`](Self::make_offset) for a temporary sub-cursor.
#[derive(Debug)]
pub struct VertexWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> VertexWriter<'a> {
    /// Bit pattern of `+inf` as an IEEE-754 `f32`. Shaders use it as a
    /// "no value" marker in attribute slots.
    pub const IEEE_32_INFINITY: u32 = 0x7f80_0000;

    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written (or skipped) so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Bytes in `[0, position)`.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Sub-cursor `byte_offset` bytes past this writer's cursor.
    ///
    /// Borrows the whole region, so this writer cannot be used until the
    /// sub-cursor is dropped; its own position is unchanged afterwards.
    #[inline]
    pub fn make_offset(&mut self, byte_offset: usize) -> VertexWriter<'_> {
        let pos = self.pos + byte_offset;
        debug_assert!(
            pos <= self.buf.len(),
            "offset {pos} past end of vertex region ({})",
            self.buf.len()
        );
        VertexWriter { buf: &mut *self.buf, pos }
    }

    /// Serializes `value` (a single shape or a tuple of shapes) at the cursor.
    #[inline]
    pub fn write<V: VertexValue>(&mut self, value: V) {
        value.write_to(self);
    }

    /// Copies `items` verbatim.
    #[inline]
    pub fn write_array<T: Pod>(&mut self, items: &[T]) {
        self.write_raw(bytemuck::cast_slice(items));
    }

    /// Writes `value` `repeat_count` times.
    ///
    /// The value is not re-evaluated between repeats: a `Conditional` is either
    /// present in all of them or in none.
    #[inline]
    pub fn fill<V: VertexValue>(&mut self, value: V, repeat_count: usize) {
        for _ in 0..repeat_count {
            value.write_to(self);
        }
    }

    /// Copies opaque bytes verbatim.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    /// Advances the cursor without touching the skipped bytes.
    #[inline]
    pub fn skip(&mut self, byte_count: usize) {
        self.pos += byte_count;
        debug_assert!(self.pos <= self.buf.len(), "skipped past end of vertex region");
    }

    /// Writes four vertices, one per [`Corner`], in order 0..=3.
    ///
    /// Within each vertex the record's elements are written left to right.
    /// Plain values repeat identically in all four; `TriStrip`, `TriFan` and
    /// `Quad` emit their corner's point.
    #[inline]
    pub fn write_quad<R: QuadRecord>(&mut self, record: R) {
        for corner in Corner::ALL {
            record.write_pass(self, corner);
        }
    }
}
