//! Marduk GPU crate.
//!
//! The draw-call hot path of the renderer:
//! - `writer`: packs per-vertex data into caller-owned buffers, including
//!   quad expansion in triangle-strip / triangle-fan order
//! - `encoder`: wraps a native render pass and drops redundant state changes
//!   before they reach the driver
//!
//! Buffer allocation, pipeline creation and submission stay with the caller.

pub mod coords;
pub mod encoder;
pub mod logging;
pub mod paint;
pub mod writer;

/// Re-exported so `impl_vertex_value!` and user `#[derive(Pod)]` types agree
/// on one `bytemuck`.
pub use bytemuck;
