//! Vertex buffer serialization.
//!
//! [`VertexWriter`] is a cursor over caller-owned bytes. Each `write` call
//! appends one value (or a tuple of values) with no implicit padding:
//!
//! ```
//! use marduk_gpu::coords::{Point, Rect};
//! use marduk_gpu::paint::{Color, VertexColor};
//! use marduk_gpu::writer::{when, TriStrip, VertexWriter};
//!
//! let mut buf = vec![0u8; 4 * (8 + 4)];
//! let mut w = VertexWriter::new(&mut buf);
//!
//! let color = VertexColor::narrow(Color::from_premul(1.0, 1.0, 1.0, 1.0));
//! w.write_quad((TriStrip::from_rect(Rect::from_xywh(0.0, 0.0, 4.0, 4.0)), color));
//! assert_eq!(w.position(), 48);
//!
//! let mut buf = vec![0u8; 8];
//! let mut w = VertexWriter::new(&mut buf);
//! w.write((Point::new(1.0, 2.0), when(false, 3u32)));
//! assert_eq!(w.position(), 8);
//! ```

mod quad;
mod value;
mod vertex_writer;

pub use quad::{Corner, QuadRecord, QuadValue, TriFan, TriStrip};
pub use value::{when, Conditional, Skip, VertexValue};
pub use vertex_writer::VertexWriter;
