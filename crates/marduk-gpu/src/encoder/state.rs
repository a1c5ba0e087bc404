//! Plain-value pass state forwarded to the native encoder.

/// How triangles are rasterized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TriangleFillMode {
    Fill,
    Lines,
}

/// Vertex winding that marks a triangle as front facing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Primitive assembly for a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    Point,
    Line,
    LineStrip,
    Triangle,
    TriangleStrip,
}

/// Element type of an index buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndexType {
    Uint16,
    Uint32,
}

impl IndexType {
    #[inline]
    pub const fn byte_size(self) -> usize {
        match self {
            IndexType::Uint16 => 2,
            IndexType::Uint32 => 4,
        }
    }
}
