//! Color model for vertex data.
//!
//! - `Color`: linear premultiplied RGBA (`f32`)
//! - `VertexColor`: the compressed per-vertex encoding (narrow RGBA8 or wide
//!   `f32` x 4)

pub mod color;
pub mod vertex_color;

pub use color::Color;
pub use vertex_color::VertexColor;
