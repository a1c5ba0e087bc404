//! The narrow interface to a platform command recorder.
//!
//! A backend implements [`NativeCommandBuffer`] (begins passes) and
//! [`NativeRenderPass`] (records into one pass). Every method maps to one
//! native call; redundancy filtering happens above this layer, in
//! [`RenderCommandEncoder`](super::RenderCommandEncoder).

use anyhow::Result;

use crate::coords::{ScissorRect, Viewport};

use super::state::{IndexType, PrimitiveType, TriangleFillMode, Winding};

/// Something passes can be begun on.
pub trait NativeCommandBuffer {
    type Pass: NativeRenderPass;
    type PassDescriptor<'a>;

    /// Begins one render pass scoped to the descriptor's attachments.
    fn begin_render_pass(&mut self, descriptor: &Self::PassDescriptor<'_>) -> Result<Self::Pass>;
}

/// One native render pass being recorded.
///
/// Handle types are opaque to the encoder; it only compares them by identity.
pub trait NativeRenderPass {
    type Pipeline: ?Sized;
    type DepthStencilState: ?Sized;
    type Buffer: ?Sized;

    fn set_label(&mut self, label: &str);
    fn push_debug_group(&mut self, label: &str);
    fn pop_debug_group(&mut self);
    fn insert_debug_signpost(&mut self, label: &str);

    fn set_render_pipeline_state(&mut self, pipeline: &Self::Pipeline);
    fn set_triangle_fill_mode(&mut self, mode: TriangleFillMode);
    fn set_front_facing_winding(&mut self, winding: Winding);
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Inline uniform bytes bound at vertex buffer slot `index`.
    fn set_vertex_bytes(&mut self, bytes: &[u8], index: u32);
    /// Inline uniform bytes bound at fragment buffer slot `index`.
    fn set_fragment_bytes(&mut self, bytes: &[u8], index: u32);

    fn set_stencil_reference_value(&mut self, value: u32);
    fn set_stencil_front_back_reference_values(&mut self, front: u32, back: u32);
    fn set_depth_stencil_state(&mut self, state: &Self::DepthStencilState);
    fn set_scissor_rect(&mut self, rect: ScissorRect);

    fn draw_primitives(&mut self, primitive: PrimitiveType, vertex_start: u32, vertex_count: u32);
    fn draw_primitives_instanced(
        &mut self,
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
        base_instance: u32,
    );
    fn draw_primitives_indirect(
        &mut self,
        primitive: PrimitiveType,
        indirect_buffer: &Self::Buffer,
        indirect_offset: u64,
    );

    fn draw_indexed_primitives(
        &mut self,
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &Self::Buffer,
        index_offset: u64,
    );
    #[allow(clippy::too_many_arguments)]
    fn draw_indexed_primitives_instanced(
        &mut self,
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &Self::Buffer,
        index_offset: u64,
        instance_count: u32,
        base_vertex: i32,
        base_instance: u32,
    );
    fn draw_indexed_primitives_indirect(
        &mut self,
        primitive: PrimitiveType,
        index_type: IndexType,
        index_buffer: &Self::Buffer,
        index_offset: u64,
        indirect_buffer: &Self::Buffer,
        indirect_offset: u64,
    );

    /// Ends the pass. Called exactly once; nothing is recorded afterwards.
    fn end_encoding(&mut self);
}
