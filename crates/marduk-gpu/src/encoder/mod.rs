//! Render pass encoding with redundant-state filtering.
//!
//! - `native`: the backend interface (one method per native call)
//! - `RenderCommandEncoder`: state cache in front of a backend pass
//! - `recording`: backend that captures calls into a replayable trace
//! - `wgpu_pass`: backend over `wgpu::RenderPass` (feature `wgpu`)

mod command_encoder;
mod config;
mod native;
pub mod recording;
mod state;
#[cfg(feature = "wgpu")]
mod wgpu_pass;

pub use command_encoder::RenderCommandEncoder;
pub use config::{EncoderConfig, EncoderStats};
pub use native::{NativeCommandBuffer, NativeRenderPass};
pub use state::{IndexType, PrimitiveType, TriangleFillMode, Winding};
#[cfg(feature = "wgpu")]
pub use wgpu_pass::WgpuRenderPass;
