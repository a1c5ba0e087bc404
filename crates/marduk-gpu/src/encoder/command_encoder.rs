use std::sync::Arc;

use anyhow::{Context, Result};
use bytemuck::Pod;

use crate::coords::{ScissorRect, Viewport};

use super::config::{EncoderConfig, EncoderStats};
use super::native::{NativeCommandBuffer, NativeRenderPass};
use super::state::{IndexType, PrimitiveType, TriangleFillMode, Winding};

/// Wraps one native render pass and filters redundant state changes.
///
/// Pipeline, depth/stencil state, fill mode and scissor rect are cached; a
/// setter only reaches the native pass when its value differs from the cached
/// one. Caches start unset, so the first call for each property always goes
/// through. Everything else is forwarded as is.
///
/// Handles are compared by identity (`Arc::ptr_eq`), not by content.
///
/// The pass is ended by [`end`](Self::end), which consumes the encoder. An
/// encoder dropped without `end` still ends its pass, and logs a warning.
pub struct RenderCommandEncoder<P: NativeRenderPass> {
    pass: P,
    ended: bool,
    label: Option<String>,
    report_stats: bool,
    stats: EncoderStats,

    current_pipeline: Option<Arc<P::Pipeline>>,
    current_depth_stencil: Option<Arc<P::DepthStencilState>>,
    current_fill_mode: Option<TriangleFillMode>,
    current_scissor: Option<ScissorRect>,
}

impl<P: NativeRenderPass> RenderCommandEncoder<P> {
    /// Begins a pass on `command_buffer` with default options.
    pub fn begin<C>(command_buffer: &mut C, descriptor: &C::PassDescriptor<'_>) -> Result<Self>
    where
        C: NativeCommandBuffer<Pass = P>,
    {
        Self::begin_with_config(command_buffer, descriptor, EncoderConfig::default())
    }

    pub fn begin_with_config<C>(
        command_buffer: &mut C,
        descriptor: &C::PassDescriptor<'_>,
        config: EncoderConfig,
    ) -> Result<Self>
    where
        C: NativeCommandBuffer<Pass = P>,
    {
        let pass = command_buffer
            .begin_render_pass(descriptor)
            .context("failed to begin native render pass")?;
        Ok(Self::from_pass(pass, config))
    }

    /// Wraps a pass that has already begun.
    pub fn from_pass(mut pass: P, config: EncoderConfig) -> Self {
        if let Some(label) = config.label.as_deref() {
            pass.set_label(label);
        }
        log::debug!("render pass begun: {}", config.label.as_deref().unwrap_or("<unlabeled>"));

        Self {
            pass,
            ended: false,
            label: config.label,
            report_stats: config.report_stats,
            stats: EncoderStats::default(),
            current_pipeline: None,
            current_depth_stencil: None,
            current_fill_mode: None,
            current_scissor: None,
        }
    }

    #[inline]
    fn native(&mut self) -> &mut P {
        debug_assert!(!self.ended, "render command encoder used after end");
        &mut self.pass
    }

    #[inline]
    fn note_state_change(&mut self) {
        self.stats.state_changes += 1;
    }

    #[inline]
    fn note_redundant_set(&mut self) {
        self.stats.redundant_state_sets += 1;
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn stats(&self) -> EncoderStats {
        self.stats
    }

    pub fn current_render_pipeline_state(&self) -> Option<&Arc<P::Pipeline>> {
        self.current_pipeline.as_ref()
    }

    pub fn current_depth_stencil_state(&self) -> Option<&Arc<P::DepthStencilState>> {
        self.current_depth_stencil.as_ref()
    }

    pub fn current_triangle_fill_mode(&self) -> Option<TriangleFillMode> {
        self.current_fill_mode
    }

    pub fn current_scissor_rect(&self) -> Option<ScissorRect> {
        self.current_scissor
    }

    // ── cached state ──────────────────────────────────────────────────────

    pub fn set_render_pipeline_state(&mut self, pipeline: &Arc<P::Pipeline>) {
        if self.current_pipeline.as_ref().is_some_and(|cur| Arc::ptr_eq(cur, pipeline)) {
            self.note_redundant_set();
            return;
        }
        self.native().set_render_pipeline_state(pipeline);
        self.current_pipeline = Some(Arc::clone(pipeline));
        self.note_state_change();
    }

    pub fn set_depth_stencil_state(&mut self, state: &Arc<P::DepthStencilState>) {
        if self.current_depth_stencil.as_ref().is_some_and(|cur| Arc::ptr_eq(cur, state)) {
            self.note_redundant_set();
            return;
        }
        self.native().set_depth_stencil_state(state);
        self.current_depth_stencil = Some(Arc::clone(state));
        self.note_state_change();
    }

    pub fn set_triangle_fill_mode(&mut self, mode: TriangleFillMode) {
        if self.current_fill_mode == Some(mode) {
            self.note_redundant_set();
            return;
        }
        self.native().set_triangle_fill_mode(mode);
        self.current_fill_mode = Some(mode);
        self.note_state_change();
    }

    pub fn set_scissor_rect(&mut self, rect: ScissorRect) {
        if self.current_scissor == Some(rect) {
            self.note_redundant_set();
            return;
        }
        self.native().set_scissor_rect(rect);
        self.current_scissor = Some(rect);
        self.note_state_change();
    }

    // ── forwarded state ───────────────────────────────────────────────────

    pub fn set_label(&mut self, label: &str) {
        self.native().set_label(label);
        self.label = Some(label.to_owned());
    }

    pub fn push_debug_group(&mut self, label: &str) {
        self.native().push_debug_group(label);
    }

    pub fn pop_debug_group(&mut self) {
        self.native().pop_debug_group();
    }

    pub fn insert_debug_signpost(&mut self, label: &str) {
        self.native().insert_debug_signpost(label);
    }

    pub fn set_front_facing_winding(&mut self, winding: Winding) {
        self.native().set_front_facing_winding(winding);
    }

    pub fn set_viewport(&mut self, viewport: &Viewport) {
        debug_assert!(viewport.is_valid(), "invalid viewport {viewport:?}");
        self.native().set_viewport(viewport);
    }

    pub fn set_vertex_bytes(&mut self, bytes: &[u8], index: u32) {
        self.native().set_vertex_bytes(bytes, index);
    }

    pub fn set_fragment_bytes(&mut self, bytes: &[u8], index: u32) {
        self.native().set_fragment_bytes(bytes, index);
    }

    /// Uploads a POD uniform block to vertex slot `index`.
    pub fn set_vertex_value<T: Pod>(&mut self, value: &T, index: u32) {
        self.set_vertex_bytes(bytemuck::bytes_of(value), index);
    }

    /// Uploads a POD uniform block to fragment slot `index`.
    pub fn set_fragment_value<T: Pod>(&mut self, value: &T, index: u32) {
        self.set_fragment_bytes(bytemuck::bytes_of(value), index);
    }

    pub fn set_stencil_reference_value(&mut self, value: u32) {
        self.native().set_stencil_reference_value(value);
    }

    pub fn set_stencil_front_back_reference_values(&mut self, front: u32, back: u32) {
        self.native().set_stencil_front_back_reference_values(front, back);
    }

    // ── draws ─────────────────────────────────────────────────────────────

    pub fn draw_primitives(
        &mut self,
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
    ) {
        self.native().draw_primitives(primitive, vertex_start, vertex_count);
        self.stats.draw_calls += 1;
    }

    pub fn draw_primitives_instanced(
        &mut self,
        primitive: PrimitiveType,
        vertex_start: u32,
        vertex_count: u32,
        instance_count: u32,
        base_instance: u32,
    ) {
        self.native().draw_primitives_instanced(
            primitive,
            vertex_start,
            vertex_count,
            instance_count,
            base_instance,
        );
        self.stats.draw_calls += 1;
    }

    pub fn draw_primitives_indirect(
        &mut self,
        primitive: PrimitiveType,
        indirect_buffer: &P::Buffer,
        indirect_offset: u64,
    ) {
        self.native().draw_primitives_indirect(primitive, indirect_buffer, indirect_offset);
        self.stats.draw_calls += 1;
    }

    pub fn draw_indexed_primitives(
        &mut self,
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &P::Buffer,
        index_offset: u64,
    ) {
        self.native().draw_indexed_primitives(
            primitive,
            index_count,
            index_type,
            index_buffer,
            index_offset,
        );
        self.stats.draw_calls += 1;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_indexed_primitives_instanced(
        &mut self,
        primitive: PrimitiveType,
        index_count: u32,
        index_type: IndexType,
        index_buffer: &P::Buffer,
        index_offset: u64,
        instance_count: u32,
        base_vertex: i32,
        base_instance: u32,
    ) {
        self.native().draw_indexed_primitives_instanced(
            primitive,
            index_count,
            index_type,
            index_buffer,
            index_offset,
            instance_count,
            base_vertex,
            base_instance,
        );
        self.stats.draw_calls += 1;
    }

    pub fn draw_indexed_primitives_indirect(
        &mut self,
        primitive: PrimitiveType,
        index_type: IndexType,
        index_buffer: &P::Buffer,
        index_offset: u64,
        indirect_buffer: &P::Buffer,
        indirect_offset: u64,
    ) {
        self.native().draw_indexed_primitives_indirect(
            primitive,
            index_type,
            index_buffer,
            index_offset,
            indirect_buffer,
            indirect_offset,
        );
        self.stats.draw_calls += 1;
    }

    // ── end ───────────────────────────────────────────────────────────────

    /// Ends the pass and returns its counters.
    ///
    /// The encoder is consumed, so it cannot be used or ended again:
    ///
    /// ```compile_fail
    /// use marduk_gpu::encoder::RenderCommandEncoder;
    /// use marduk_gpu::encoder::recording::{RecordingCommandBuffer, RecordingPassDescriptor};
    ///
    /// let mut cb = RecordingCommandBuffer::new();
    /// let enc = RenderCommandEncoder::begin(&mut cb, &RecordingPassDescriptor::color(1)).unwrap();
    /// enc.end();
    /// enc.set_stencil_reference_value(1);
    /// ```
    pub fn end(mut self) -> EncoderStats {
        self.finish();
        self.stats
    }

    fn finish(&mut self) {
        self.native().end_encoding();
        self.ended = true;

        let label = self.label.as_deref().unwrap_or("<unlabeled>");
        if self.report_stats {
            log::debug!(
                "render pass ended: {label} \
                 (state changes: {}, redundant sets skipped: {}, draws: {})",
                self.stats.state_changes,
                self.stats.redundant_state_sets,
                self.stats.draw_calls,
            );
        } else {
            log::debug!("render pass ended: {label}");
        }
    }
}

impl<P: NativeRenderPass> Drop for RenderCommandEncoder<P> {
    fn drop(&mut self) {
        if !self.ended {
            log::warn!(
                "render command encoder dropped without end(): {}",
                self.label.as_deref().unwrap_or("<unlabeled>")
            );
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::recording::{
        NativeCommand, RecordingCommandBuffer, RecordingPass, RecordingPassDescriptor, TraceHandle,
    };

    fn begin() -> (RecordingCommandBuffer, RenderCommandEncoder<RecordingPass>) {
        let mut cb = RecordingCommandBuffer::new();
        let enc = RenderCommandEncoder::begin(&mut cb, &RecordingPassDescriptor::color(1)).unwrap();
        (cb, enc)
    }

    fn count(cb: &RecordingCommandBuffer, pred: impl Fn(&NativeCommand) -> bool) -> usize {
        cb.trace(0).unwrap().commands().iter().filter(|c| pred(c)).count()
    }

    // ── cached state ──────────────────────────────────────────────────────

    #[test]
    fn first_set_always_reaches_native() {
        let (cb, mut enc) = begin();
        enc.set_scissor_rect(ScissorRect::new(0, 0, 0, 0));
        enc.set_triangle_fill_mode(TriangleFillMode::Fill);
        enc.end();

        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetScissorRect(_))), 1);
        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetTriangleFillMode(_))), 1);
    }

    #[test]
    fn scissor_sets_follow_transitions() {
        let (cb, mut enc) = begin();
        let a = ScissorRect::new(0, 0, 10, 10);
        let b = ScissorRect::new(0, 0, 10, 11);
        for rect in [a, a, b, b, b, a, a] {
            enc.set_scissor_rect(rect);
        }
        assert_eq!(enc.current_scissor_rect(), Some(a));
        let stats = enc.end();

        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetScissorRect(_))), 3);
        assert_eq!(stats.state_changes, 3);
        assert_eq!(stats.redundant_state_sets, 4);
    }

    #[test]
    fn pipeline_compared_by_identity() {
        let (cb, mut enc) = begin();
        let p1 = Arc::new(TraceHandle::new("rect"));
        let p1_twin = Arc::new(TraceHandle::new("rect"));

        enc.set_render_pipeline_state(&p1);
        enc.set_render_pipeline_state(&Arc::clone(&p1));
        enc.set_render_pipeline_state(&p1_twin);
        assert!(Arc::ptr_eq(enc.current_render_pipeline_state().unwrap(), &p1_twin));
        enc.end();

        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetRenderPipelineState(_))), 2);
    }

    #[test]
    fn depth_stencil_and_fill_mode_deduplicate() {
        let (cb, mut enc) = begin();
        let ds = Arc::new(TraceHandle::new("depth-less"));
        enc.set_depth_stencil_state(&ds);
        enc.set_depth_stencil_state(&ds);
        enc.set_triangle_fill_mode(TriangleFillMode::Lines);
        enc.set_triangle_fill_mode(TriangleFillMode::Lines);
        enc.set_triangle_fill_mode(TriangleFillMode::Fill);
        assert_eq!(enc.current_triangle_fill_mode(), Some(TriangleFillMode::Fill));
        assert!(enc.current_depth_stencil_state().is_some());
        enc.end();

        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetDepthStencilState(_))), 1);
        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetTriangleFillMode(_))), 2);
    }

    // ── forwarded state and draws ─────────────────────────────────────────

    #[test]
    fn unconditional_setters_always_forward() {
        let (cb, mut enc) = begin();
        for _ in 0..3 {
            enc.set_stencil_reference_value(7);
            enc.set_front_facing_winding(Winding::Clockwise);
            enc.set_viewport(&Viewport::new(64.0, 64.0));
        }
        enc.end();

        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetStencilReferenceValue(7))), 3);
        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetFrontFacingWinding(_))), 3);
        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::SetViewport(_))), 3);
    }

    #[test]
    fn every_forwarded_call_keeps_its_arguments() {
        let (cb, mut enc) = begin();
        let ib = TraceHandle::new("indices");
        let args = TraceHandle::new("args");

        enc.set_label("main");
        enc.push_debug_group("shapes");
        enc.insert_debug_signpost("rects");
        enc.set_front_facing_winding(Winding::CounterClockwise);
        enc.set_viewport(&Viewport::new(640.0, 480.0));
        enc.set_vertex_bytes(&[1, 2, 3, 4], 2);
        enc.set_fragment_bytes(&[5, 6, 7, 8], 3);
        enc.set_stencil_reference_value(9);
        enc.set_stencil_front_back_reference_values(10, 11);
        enc.draw_primitives(PrimitiveType::TriangleStrip, 4, 8);
        enc.draw_primitives_instanced(PrimitiveType::Triangle, 1, 2, 3, 4);
        enc.draw_primitives_indirect(PrimitiveType::Line, &args, 16);
        enc.draw_indexed_primitives(PrimitiveType::LineStrip, 12, IndexType::Uint32, &ib, 24);
        enc.draw_indexed_primitives_instanced(
            PrimitiveType::Triangle,
            6,
            IndexType::Uint16,
            &ib,
            32,
            10,
            -2,
            5,
        );
        enc.draw_indexed_primitives_indirect(
            PrimitiveType::Point,
            IndexType::Uint16,
            &ib,
            40,
            &args,
            48,
        );
        enc.pop_debug_group();
        let stats = enc.end();

        let expected = [
            NativeCommand::SetLabel("main".to_owned()),
            NativeCommand::PushDebugGroup("shapes".to_owned()),
            NativeCommand::InsertDebugSignpost("rects".to_owned()),
            NativeCommand::SetFrontFacingWinding(Winding::CounterClockwise),
            NativeCommand::SetViewport(Viewport::new(640.0, 480.0)),
            NativeCommand::SetVertexBytes { bytes: vec![1, 2, 3, 4], index: 2 },
            NativeCommand::SetFragmentBytes { bytes: vec![5, 6, 7, 8], index: 3 },
            NativeCommand::SetStencilReferenceValue(9),
            NativeCommand::SetStencilFrontBackReferenceValues { front: 10, back: 11 },
            NativeCommand::DrawPrimitives {
                primitive: PrimitiveType::TriangleStrip,
                vertex_start: 4,
                vertex_count: 8,
            },
            NativeCommand::DrawPrimitivesInstanced {
                primitive: PrimitiveType::Triangle,
                vertex_start: 1,
                vertex_count: 2,
                instance_count: 3,
                base_instance: 4,
            },
            NativeCommand::DrawPrimitivesIndirect {
                primitive: PrimitiveType::Line,
                indirect_buffer: "args".to_owned(),
                indirect_offset: 16,
            },
            NativeCommand::DrawIndexedPrimitives {
                primitive: PrimitiveType::LineStrip,
                index_count: 12,
                index_type: IndexType::Uint32,
                index_buffer: "indices".to_owned(),
                index_offset: 24,
            },
            NativeCommand::DrawIndexedPrimitivesInstanced {
                primitive: PrimitiveType::Triangle,
                index_count: 6,
                index_type: IndexType::Uint16,
                index_buffer: "indices".to_owned(),
                index_offset: 32,
                instance_count: 10,
                base_vertex: -2,
                base_instance: 5,
            },
            NativeCommand::DrawIndexedPrimitivesIndirect {
                primitive: PrimitiveType::Point,
                index_type: IndexType::Uint16,
                index_buffer: "indices".to_owned(),
                index_offset: 40,
                indirect_buffer: "args".to_owned(),
                indirect_offset: 48,
            },
            NativeCommand::PopDebugGroup,
            NativeCommand::EndEncoding,
        ];
        assert_eq!(cb.trace(0).unwrap().commands(), &expected);
        assert_eq!(stats.draw_calls, 6);
        assert_eq!(stats.state_changes, 0);
    }

    #[test]
    fn typed_uniform_upload_uses_pod_bytes() {
        let (cb, mut enc) = begin();
        enc.set_vertex_value(&[1.0f32, 2.0], 1);
        enc.set_fragment_value(&3u32, 0);
        enc.end();

        let trace = cb.trace(0).unwrap();
        assert_eq!(
            trace.commands()[0],
            NativeCommand::SetVertexBytes {
                bytes: bytemuck::bytes_of(&[1.0f32, 2.0]).to_vec(),
                index: 1,
            }
        );
        assert_eq!(
            trace.commands()[1],
            NativeCommand::SetFragmentBytes { bytes: 3u32.to_ne_bytes().to_vec(), index: 0 }
        );
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn config_label_applied_at_begin() {
        let mut cb = RecordingCommandBuffer::new();
        let enc = RenderCommandEncoder::begin_with_config(
            &mut cb,
            &RecordingPassDescriptor::color(1),
            EncoderConfig { label: Some("ui".into()), report_stats: true },
        )
        .unwrap();
        assert_eq!(enc.label(), Some("ui"));
        enc.end();

        let trace = cb.trace(0).unwrap();
        assert_eq!(trace.commands().first(), Some(&NativeCommand::SetLabel("ui".into())));
        assert_eq!(trace.commands().last(), Some(&NativeCommand::EndEncoding));
    }

    #[test]
    fn end_is_recorded_once() {
        let (cb, enc) = begin();
        enc.end();
        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::EndEncoding)), 1);
    }

    #[test]
    fn drop_without_end_still_ends_pass_once() {
        let (cb, mut enc) = begin();
        enc.draw_primitives(PrimitiveType::Point, 0, 1);
        drop(enc);
        let trace = cb.trace(0).unwrap();
        assert!(trace.is_ended());
        assert_eq!(count(&cb, |c| matches!(c, NativeCommand::EndEncoding)), 1);
    }

    #[test]
    fn begin_failure_is_propagated() {
        let mut cb = RecordingCommandBuffer::new();
        let err = RenderCommandEncoder::begin(&mut cb, &RecordingPassDescriptor::default())
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("no attachments"));
        assert_eq!(cb.pass_count(), 0);
    }
}
