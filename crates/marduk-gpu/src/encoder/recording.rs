//! A native backend that records calls instead of issuing them.
//!
//! Used to inspect exactly what reached the "driver" (tests, debugging
//! redundant-state filtering) and to replay a captured pass onto a real
//! backend later.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{bail, Context, Result};

use crate::coords::{ScissorRect, Viewport};

use super::native::{NativeCommandBuffer, NativeRenderPass};
use super::state::{IndexType, PrimitiveType, TriangleFillMode, Winding};

/// Opaque recorded resource, identified by its label in traces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceHandle {
    label: String,
}

impl TraceHandle {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// One native call. Resources are referenced by label.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCommand {
    SetLabel(String),
    PushDebugGroup(String),
    PopDebugGroup,
    InsertDebugSignpost(String),
    SetRenderPipelineState(String),
    SetTriangleFillMode(TriangleFillMode),
    SetFrontFacingWinding(Winding),
    SetViewport(Viewport),
    SetVertexBytes { bytes: Vec<u8>, index: u32 },
    SetFragmentBytes { bytes: Vec<u8>, index: u32 },
    SetStencilReferenceValue(u32),
    SetStencilFrontBackReferenceValues { front: u32, back: u32 },
    SetDepthStencilState(String),
    SetScissorRect(ScissorRect),
    DrawPrimitives {
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
    },
    DrawPrimitivesInstanced {
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
        base_instance: u32,
    },
    DrawPrimitivesIndirect {
        primitive: PrimitiveType,
        indirect_buffer: String,
        indirect_offset: u64,
    },
    DrawIndexedPrimitives {
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: String,
        index_offset: u64,
    },
    DrawIndexedPrimitivesInstanced {
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: String,
        index_offset: u64,
        instance_count: u32,
        base_vertex: i32,
        base_instance: u32,
    },
    DrawIndexedPrimitivesIndirect {
        primitive: PrimitiveType,
        index_type: IndexType,
        index_buffer: String,
        index_offset: u64,
        indirect_buffer: String,
        indirect_offset: u64,
    },
    EndEncoding,
}

/// Maps trace labels back to a backend's resources for replay.
pub trait ResourceProvider<P: NativeRenderPass> {
    fn pipeline(&self, label: &str) -> Option<&P::Pipeline>;
    fn depth_stencil_state(&self, label: &str) -> Option<&P::DepthStencilState>;
    fn buffer(&self, label: &str) -> Option<&P::Buffer>;
}

/// Ordered native calls of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandTrace {
    commands: Vec<NativeCommand>,
}

impl CommandTrace {
    pub fn commands(&self) -> &[NativeCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_ended(&self) -> bool {
        self.commands.last() == Some(&NativeCommand::EndEncoding)
    }

    /// Issues every recorded call, in order, onto `pass`.
    ///
    /// Fails on the first label `resources` cannot resolve; calls before it
    /// have already been issued.
    pub fn replay<P, R>(&self, pass: &mut P, resources: &R) -> Result<()>
    where
        P: NativeRenderPass,
        R: ResourceProvider<P>,
    {
        let buffer = |label: &str| {
            resources
                .buffer(label)
                .with_context(|| format!("replay: unknown buffer {label:?}"))
        };

        for command in &self.commands {
            match command {
                NativeCommand::SetLabel(label) => pass.set_label(label),
                NativeCommand::PushDebugGroup(label) => pass.push_debug_group(label),
                NativeCommand::PopDebugGroup => pass.pop_debug_group(),
                NativeCommand::InsertDebugSignpost(label) => pass.insert_debug_signpost(label),
                NativeCommand::SetRenderPipelineState(label) => {
                    let pipeline = resources
                        .pipeline(label)
                        .with_context(|| format!("replay: unknown pipeline {label:?}"))?;
                    pass.set_render_pipeline_state(pipeline);
                }
                NativeCommand::SetTriangleFillMode(mode) => pass.set_triangle_fill_mode(*mode),
                NativeCommand::SetFrontFacingWinding(winding) => {
                    pass.set_front_facing_winding(*winding)
                }
                NativeCommand::SetViewport(viewport) => pass.set_viewport(viewport),
                NativeCommand::SetVertexBytes { bytes, index } => {
                    pass.set_vertex_bytes(bytes, *index)
                }
                NativeCommand::SetFragmentBytes { bytes, index } => {
                    pass.set_fragment_bytes(bytes, *index)
                }
                NativeCommand::SetStencilReferenceValue(value) => {
                    pass.set_stencil_reference_value(*value)
                }
                NativeCommand::SetStencilFrontBackReferenceValues { front, back } => {
                    pass.set_stencil_front_back_reference_values(*front, *back)
                }
                NativeCommand::SetDepthStencilState(label) => {
                    let state = resources
                        .depth_stencil_state(label)
                        .with_context(|| format!("replay: unknown depth/stencil state {label:?}"))?;
                    pass.set_depth_stencil_state(state);
                }
                NativeCommand::SetScissorRect(rect) => pass.set_scissor_rect(*rect),
                NativeCommand::DrawPrimitives { primitive, vertex_start, vertex_count } => {
                    pass.draw_primitives(*primitive, *vertex_start, *vertex_count)
                }
                NativeCommand::DrawPrimitivesInstanced {
                    primitive,
                    vertex_start,
                    vertex_count,
                    instance_count,
                    base_instance,
                } => pass.draw_primitives_instanced(
                    *primitive,
                    *vertex_start,
                    *vertex_count,
                    *instance_count,
                    *base_instance,
                ),
                NativeCommand::DrawPrimitivesIndirect {
                    primitive,
                    indirect_buffer,
                    indirect_offset,
                } => pass.draw_primitives_indirect(
                    *primitive,
                    buffer(indirect_buffer.as_str())?,
                    *indirect_offset,
                ),
                NativeCommand::DrawIndexedPrimitives {
                    primitive,
                    index_count,
                    index_type,
                    index_buffer,
                    index_offset,
                } => pass.draw_indexed_primitives(
                    *primitive,
                    *index_count,
                    *index_type,
                    buffer(index_buffer.as_str())?,
                    *index_offset,
                ),
                NativeCommand::DrawIndexedPrimitivesInstanced {
                    primitive,
                    index_count,
                    index_type,
                    index_buffer,
                    index_offset,
                    instance_count,
                    base_vertex,
                    base_instance,
                } => pass.draw_indexed_primitives_instanced(
                    *primitive,
                    *index_count,
                    *index_type,
                    buffer(index_buffer.as_str())?,
                    *index_offset,
                    *instance_count,
                    *base_vertex,
                    *base_instance,
                ),
                NativeCommand::DrawIndexedPrimitivesIndirect {
                    primitive,
                    index_type,
                    index_buffer,
                    index_offset,
                    indirect_buffer,
                    indirect_offset,
                } => pass.draw_indexed_primitives_indirect(
                    *primitive,
                    *index_type,
                    buffer(index_buffer.as_str())?,
                    *index_offset,
                    buffer(indirect_buffer.as_str())?,
                    *indirect_offset,
                ),
                NativeCommand::EndEncoding => pass.end_encoding(),
            }
        }
        Ok(())
    }
}

/// Label → handle table for replaying onto a [`RecordingPass`].
#[derive(Debug, Clone, Default)]
pub struct TraceResources {
    handles: HashMap<String, TraceHandle>,
}

impl TraceResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: TraceHandle) {
        self.handles.insert(handle.label.clone(), handle);
    }

    /// Registers a handle for every label referenced by `trace`.
    pub fn from_trace(trace: &CommandTrace) -> Self {
        let mut resources = Self::new();
        for command in trace.commands() {
            match command {
                NativeCommand::SetRenderPipelineState(label)
                | NativeCommand::SetDepthStencilState(label)
                | NativeCommand::DrawPrimitivesIndirect { indirect_buffer: label, .. }
                | NativeCommand::DrawIndexedPrimitives { index_buffer: label, .. }
                | NativeCommand::DrawIndexedPrimitivesInstanced { index_buffer: label, .. } => {
                    resources.insert(TraceHandle::new(label.as_str()));
                }
                NativeCommand::DrawIndexedPrimitivesIndirect {
                    index_buffer, indirect_buffer, ..
                } => {
                    resources.insert(TraceHandle::new(index_buffer.as_str()));
                    resources.insert(TraceHandle::new(indirect_buffer.as_str()));
                }
                _ => {}
            }
        }
        resources
    }
}

impl ResourceProvider<RecordingPass> for TraceResources {
    fn pipeline(&self, label: &str) -> Option<&TraceHandle> {
        self.handles.get(label)
    }

    fn depth_stencil_state(&self, label: &str) -> Option<&TraceHandle> {
        self.handles.get(label)
    }

    fn buffer(&self, label: &str) -> Option<&TraceHandle> {
        self.handles.get(label)
    }
}

/// Attachment summary; recording only checks that something is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingPassDescriptor {
    pub color_attachments: u32,
    pub depth_stencil: bool,
}

impl RecordingPassDescriptor {
    pub fn color(count: u32) -> Self {
        Self { color_attachments: count, depth_stencil: false }
    }
}

/// Begins [`RecordingPass`]es and keeps their traces.
#[derive(Debug, Default)]
pub struct RecordingCommandBuffer {
    passes: Vec<Rc<RefCell<CommandTrace>>>,
}

impl RecordingCommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Snapshot of pass `index`'s trace.
    pub fn trace(&self, index: usize) -> Option<CommandTrace> {
        self.passes.get(index).map(|t| t.borrow().clone())
    }
}

impl NativeCommandBuffer for RecordingCommandBuffer {
    type Pass = RecordingPass;
    type PassDescriptor<'a> = RecordingPassDescriptor;

    fn begin_render_pass(&mut self, descriptor: &RecordingPassDescriptor) -> Result<RecordingPass> {
        if descriptor.color_attachments == 0 && !descriptor.depth_stencil {
            bail!("render pass descriptor has no attachments");
        }
        let trace = Rc::new(RefCell::new(CommandTrace::default()));
        self.passes.push(Rc::clone(&trace));
        log::trace!("recording pass {} begun", self.passes.len() - 1);
        Ok(RecordingPass { trace, ended: false })
    }
}

/// Records native calls into a shared [`CommandTrace`].
#[derive(Debug)]
pub struct RecordingPass {
    trace: Rc<RefCell<CommandTrace>>,
    ended: bool,
}

impl RecordingPass {
    /// A standalone pass not owned by any command buffer.
    pub fn new() -> Self {
        Self { trace: Rc::default(), ended: false }
    }

    pub fn trace(&self) -> CommandTrace {
        self.trace.borrow().clone()
    }

    fn record(&mut self, command: NativeCommand) {
        debug_assert!(!self.ended, "{command:?} recorded after end_encoding");
        self.trace.borrow_mut().commands.push(command);
    }
}

impl Default for RecordingPass {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeRenderPass for RecordingPass {
    type Pipeline = TraceHandle;
    type DepthStencilState = TraceHandle;
    type Buffer = TraceHandle;

    fn set_label(&mut self, label: &str) {
        self.record(NativeCommand::SetLabel(label.to_owned()));
    }

    fn push_debug_group(&mut self, label: &str) {
        self.record(NativeCommand::PushDebugGroup(label.to_owned()));
    }

    fn pop_debug_group(&mut self) {
        self.record(NativeCommand::PopDebugGroup);
    }

    fn insert_debug_signpost(&mut self, label: &str) {
        self.record(NativeCommand::InsertDebugSignpost(label.to_owned()));
    }

    fn set_render_pipeline_state(&mut self, pipeline: &TraceHandle) {
        self.record(NativeCommand::SetRenderPipelineState(pipeline.label.clone()));
    }

    fn set_triangle_fill_mode(&mut self, mode: TriangleFillMode) {
        self.record(NativeCommand::SetTriangleFillMode(mode));
    }

    fn set_front_facing_winding(&mut self, winding: Winding) {
        self.record(NativeCommand::SetFrontFacingWinding(winding));
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.record(NativeCommand::SetViewport(*viewport));
    }

    fn set_vertex_bytes(&mut self, bytes: &[u8], index: u32) {
        self.record(NativeCommand::SetVertexBytes { bytes: bytes.to_vec(), index });
    }

    fn set_fragment_bytes(&mut self, bytes: &[u8], index: u32) {
        self.record(NativeCommand::SetFragmentBytes { bytes: bytes.to_vec(), index });
    }

    fn set_stencil_reference_value(&mut self, value: u32) {
        self.record(NativeCommand::SetStencilReferenceValue(value));
    }

    fn set_stencil_front_back_reference_values(&mut self, front: u32, back: u32) {
        self.record(NativeCommand::SetStencilFrontBackReferenceValues { front, back });
    }

    fn set_depth_stencil_state(&mut self, state: &TraceHandle) {
        self.record(NativeCommand::SetDepthStencilState(state.label.clone()));
    }

    fn set_scissor_rect(&mut self, rect: ScissorRect) {
        self.record(NativeCommand::SetScissorRect(rect));
    }

    fn draw_primitives(&mut self, primitive: PrimitiveType, vertex_start: u32, vertex_count: u32) {
        self.record(NativeCommand::DrawPrimitives { primitive, vertex_start, vertex_count });
    }

    fn draw_primitives_instanced(
        &mut self,
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
        base_instance: u32,
    ) {
        self.record(NativeCommand::DrawPrimitivesInstanced {
            primitive,
            vertex_start,
            vertex_count,
            instance_count,
            base_instance,
        });
    }

    fn draw_primitives_indirect(
        &mut self,
        primitive: PrimitiveType,
        indirect_buffer: &TraceHandle,
        indirect_offset: u64,
    ) {
        self.record(NativeCommand::DrawPrimitivesIndirect {
            primitive,
            indirect_buffer: indirect_buffer.label.clone(),
            indirect_offset,
        });
    }

    fn draw_indexed_primitives(
        &mut self,
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &TraceHandle,
        index_offset: u64,
    ) {
        self.record(NativeCommand::DrawIndexedPrimitives {
            primitive,
            index_count,
            index_type,
            index_buffer: index_buffer.label.clone(),
            index_offset,
        });
    }

    fn draw_indexed_primitives_instanced(
        &mut self,
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &TraceHandle,
        index_offset: u64,
        instance_count: u32,
        base_vertex: i32,
        base_instance: u32,
    ) {
        self.record(NativeCommand::DrawIndexedPrimitivesInstanced {
            primitive,
            index_count,
            index_type,
            index_buffer: index_buffer.label.clone(),
            index_offset,
            instance_count,
            base_vertex,
            base_instance,
        });
    }

    fn draw_indexed_primitives_indirect(
        &mut self,
        primitive: PrimitiveType,
        index_type: IndexType,
        index_buffer: &TraceHandle,
        index_offset: u64,
        indirect_buffer: &TraceHandle,
        indirect_offset: u64,
    ) {
        self.record(NativeCommand::DrawIndexedPrimitivesIndirect {
            primitive,
            index_type,
            index_buffer: index_buffer.label.clone(),
            index_offset,
            indirect_buffer: indirect_buffer.label.clone(),
            indirect_offset,
        });
    }

    fn end_encoding(&mut self) {
        self.record(NativeCommand::EndEncoding);
        self.ended = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trace() -> CommandTrace {
        let mut pass = RecordingPass::new();
        let pipeline = TraceHandle::new("solid");
        let vb = TraceHandle::new("indirect");
        let ib = TraceHandle::new("indices");
        pass.push_debug_group("sample");
        pass.set_render_pipeline_state(&pipeline);
        pass.set_scissor_rect(ScissorRect::new(1, 2, 3, 4));
        pass.draw_primitives_indirect(PrimitiveType::Triangle, &vb, 16);
        pass.draw_indexed_primitives_indirect(
            PrimitiveType::Triangle,
            IndexType::Uint32,
            &ib,
            0,
            &vb,
            32,
        );
        pass.pop_debug_group();
        pass.end_encoding();
        pass.trace()
    }

    #[test]
    fn begin_requires_an_attachment() {
        let mut cb = RecordingCommandBuffer::new();
        assert!(cb.begin_render_pass(&RecordingPassDescriptor::default()).is_err());
        let depth_only = RecordingPassDescriptor { color_attachments: 0, depth_stencil: true };
        assert!(cb.begin_render_pass(&depth_only).is_ok());
        assert_eq!(cb.pass_count(), 1);
    }

    #[test]
    fn trace_is_shared_with_command_buffer() {
        let mut cb = RecordingCommandBuffer::new();
        let mut pass = cb.begin_render_pass(&RecordingPassDescriptor::color(1)).unwrap();
        pass.set_stencil_reference_value(3);
        assert_eq!(cb.trace(0).unwrap().commands(), &[NativeCommand::SetStencilReferenceValue(3)]);
        assert!(cb.trace(1).is_none());
    }

    #[test]
    fn replay_reproduces_trace() {
        let trace = sample_trace();
        assert!(trace.is_ended());

        let resources = TraceResources::from_trace(&trace);
        let mut target = RecordingPass::new();
        trace.replay(&mut target, &resources).unwrap();
        assert_eq!(target.trace(), trace);
    }

    #[test]
    fn replay_fails_on_unknown_resource() {
        let trace = sample_trace();
        let mut resources = TraceResources::new();
        resources.insert(TraceHandle::new("solid"));

        let mut target = RecordingPass::new();
        let err = trace.replay(&mut target, &resources).unwrap_err();
        assert!(err.to_string().contains("indirect"));
        // Calls before the failure were issued.
        assert_eq!(target.trace().len(), 3);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "recorded after end_encoding")]
    fn recording_after_end_is_flagged() {
        let mut pass = RecordingPass::new();
        pass.end_encoding();
        pass.pop_debug_group();
    }
}
