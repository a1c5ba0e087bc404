//! Geometry shared by the vertex writer and the command encoder.
//!
//! CPU space:
//! - origin top-left
//! - +X right, +Y down
//!
//! `Rect`/`Quad`/`Point` feed vertex generation; `Viewport`/`ScissorRect`
//! are native pass state in framebuffer pixels.

mod point;
mod quad;
mod rect;
mod scissor;
mod viewport;

pub use point::Point;
pub use quad::Quad;
pub use rect::Rect;
pub use scissor::ScissorRect;
pub use viewport::Viewport;
