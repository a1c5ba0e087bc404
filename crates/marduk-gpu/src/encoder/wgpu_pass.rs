//! Native backend over `wgpu`.
//!
//! `wgpu` bakes fill mode, winding and depth/stencil state into the render
//! pipeline and fixes a pass label at creation, so those calls are logged at
//! trace level and not forwarded.
//!
//! Inline vertex/fragment bytes become immediates (`RenderPass::set_immediates`).
//! The device must enable `wgpu::Features::IMMEDIATES` and the pipeline layout
//! must declare an immediate range covering every slot in use. Slot `index`
//! starts at byte `index * WgpuRenderPass::IMMEDIATE_SLOT_SIZE`; wgpu immediates
//! are shared by all stages, so vertex and fragment bytes for the same index
//! land in the same slot.

use std::ops::Range;

use anyhow::Result;

use crate::coords::{ScissorRect, Viewport};

use super::native::{NativeCommandBuffer, NativeRenderPass};
use super::state::{IndexType, PrimitiveType, TriangleFillMode, Winding};

impl NativeCommandBuffer for wgpu::CommandEncoder {
    type Pass = WgpuRenderPass;
    type PassDescriptor<'a> = wgpu::RenderPassDescriptor<'a>;

    /// Validation failures surface through the device's error handler, not
    /// here; this only fails if wgpu itself does.
    fn begin_render_pass(
        &mut self,
        descriptor: &wgpu::RenderPassDescriptor<'_>,
    ) -> Result<WgpuRenderPass> {
        let pass = wgpu::CommandEncoder::begin_render_pass(self, descriptor).forget_lifetime();
        Ok(WgpuRenderPass { pass: Some(pass) })
    }
}

/// A `wgpu::RenderPass` detached from its encoder borrow.
///
/// The parent `wgpu::CommandEncoder` stays locked until `end_encoding` drops
/// the pass.
pub struct WgpuRenderPass {
    pass: Option<wgpu::RenderPass<'static>>,
}

impl WgpuRenderPass {
    /// Bytes reserved per immediate slot.
    pub const IMMEDIATE_SLOT_SIZE: u32 = 64;

    #[inline]
    fn with_pass(&mut self, f: impl FnOnce(&mut wgpu::RenderPass<'static>)) {
        match self.pass.as_mut() {
            Some(pass) => f(pass),
            None => debug_assert!(false, "wgpu render pass used after end_encoding"),
        }
    }

    /// Binds `index_buffer` from `index_offset` for the next indexed draw.
    #[inline]
    fn bind_index_buffer(
        &mut self,
        index_type: IndexType,
        index_buffer: &wgpu::Buffer,
        index_offset: u64,
    ) {
        let format = index_format(index_type);
        self.with_pass(|pass| pass.set_index_buffer(index_buffer.slice(index_offset..), format));
    }

    fn upload_immediates(&mut self, bytes: &[u8], index: u32) {
        debug_assert!(
            bytes.len() % 4 == 0,
            "immediate data must be a multiple of 4 bytes, got {}",
            bytes.len()
        );
        debug_assert!(
            bytes.len() <= Self::IMMEDIATE_SLOT_SIZE as usize,
            "{} bytes overflow immediate slot {index}",
            bytes.len()
        );
        let offset = immediate_offset(index);
        self.with_pass(|pass| pass.set_immediates(offset, bytes));
    }
}

#[inline]
fn immediate_offset(index: u32) -> u32 {
    index * WgpuRenderPass::IMMEDIATE_SLOT_SIZE
}

/// `start..start + count`, as wgpu draw ranges are expressed.
#[inline]
fn draw_range(start: u32, count: u32) -> Range<u32> {
    debug_assert!(
        start.checked_add(count).is_some(),
        "draw range {start} + {count} overflows u32"
    );
    start..start.wrapping_add(count)
}

#[inline]
fn index_format(index_type: IndexType) -> wgpu::IndexFormat {
    match index_type {
        IndexType::Uint16 => wgpu::IndexFormat::Uint16,
        IndexType::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

impl NativeRenderPass for WgpuRenderPass {
    type Pipeline = wgpu::RenderPipeline;
    type DepthStencilState = wgpu::DepthStencilState;
    type Buffer = wgpu::Buffer;

    fn set_label(&mut self, label: &str) {
        log::trace!("wgpu pass label is fixed at creation; ignoring {label:?}");
    }

    fn push_debug_group(&mut self, label: &str) {
        self.with_pass(|pass| pass.push_debug_group(label));
    }

    fn pop_debug_group(&mut self) {
        self.with_pass(|pass| pass.pop_debug_group());
    }

    fn insert_debug_signpost(&mut self, label: &str) {
        self.with_pass(|pass| pass.insert_debug_marker(label));
    }

    fn set_render_pipeline_state(&mut self, pipeline: &wgpu::RenderPipeline) {
        self.with_pass(|pass| pass.set_pipeline(pipeline));
    }

    fn set_triangle_fill_mode(&mut self, mode: TriangleFillMode) {
        log::trace!("wgpu fill mode is pipeline state; ignoring {mode:?}");
    }

    fn set_front_facing_winding(&mut self, winding: Winding) {
        log::trace!("wgpu winding is pipeline state; ignoring {winding:?}");
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        let v = *viewport;
        self.with_pass(|pass| {
            pass.set_viewport(v.origin_x, v.origin_y, v.width, v.height, v.znear, v.zfar)
        });
    }

    fn set_vertex_bytes(&mut self, bytes: &[u8], index: u32) {
        self.upload_immediates(bytes, index);
    }

    fn set_fragment_bytes(&mut self, bytes: &[u8], index: u32) {
        self.upload_immediates(bytes, index);
    }

    fn set_stencil_reference_value(&mut self, value: u32) {
        self.with_pass(|pass| pass.set_stencil_reference(value));
    }

    fn set_stencil_front_back_reference_values(&mut self, front: u32, back: u32) {
        if front != back {
            log::trace!("wgpu has one stencil reference; using front ({front}), not back ({back})");
        }
        self.with_pass(|pass| pass.set_stencil_reference(front));
    }

    fn set_depth_stencil_state(&mut self, state: &wgpu::DepthStencilState) {
        log::trace!("wgpu depth/stencil state is pipeline state; ignoring {:?}", state.format);
    }

    fn set_scissor_rect(&mut self, rect: ScissorRect) {
        self.with_pass(|pass| pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height));
    }

    // Primitive topology is part of the wgpu pipeline; `primitive` is not
    // forwarded by any draw below.

    fn draw_primitives(&mut self, _primitive: PrimitiveType, vertex_start: u32, vertex_count: u32) {
        let vertices = draw_range(vertex_start, vertex_count);
        self.with_pass(|pass| pass.draw(vertices, 0..1));
    }

    fn draw_primitives_instanced(
        &mut self,
        _primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
        base_instance: u32,
    ) {
        let vertices = draw_range(vertex_start, vertex_count);
        let instances = draw_range(base_instance, instance_count);
        self.with_pass(|pass| pass.draw(vertices, instances));
    }

    fn draw_primitives_indirect(
        &mut self,
        _primitive: PrimitiveType,
        indirect_buffer: &wgpu::Buffer,
        indirect_offset: u64,
    ) {
        self.with_pass(|pass| pass.draw_indirect(indirect_buffer, indirect_offset));
    }

    fn draw_indexed_primitives(
        &mut self,
        _primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &wgpu::Buffer,
        index_offset: u64,
    ) {
        self.bind_index_buffer(index_type, index_buffer, index_offset);
        self.with_pass(|pass| pass.draw_indexed(0..index_count, 0, 0..1));
    }

    fn draw_indexed_primitives_instanced(
        &mut self,
        _primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &wgpu::Buffer,
        index_offset: u64,
        instance_count: u32,
        base_vertex: i32,
        base_instance: u32,
    ) {
        self.bind_index_buffer(index_type, index_buffer, index_offset);
        let instances = draw_range(base_instance, instance_count);
        self.with_pass(|pass| pass.draw_indexed(0..index_count, base_vertex, instances));
    }

    fn draw_indexed_primitives_indirect(
        &mut self,
        _primitive: PrimitiveType,
        index_type: IndexType,
        index_buffer: &wgpu::Buffer,
        index_offset: u64,
        indirect_buffer: &wgpu::Buffer,
        indirect_offset: u64,
    ) {
        self.bind_index_buffer(index_type, index_buffer, index_offset);
        self.with_pass(|pass| pass.draw_indexed_indirect(indirect_buffer, indirect_offset));
    }

    fn end_encoding(&mut self) {
        // Dropping the pass records its end and unlocks the parent encoder.
        drop(self.pass.take());
    }
}
