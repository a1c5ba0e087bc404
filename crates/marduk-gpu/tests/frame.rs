//! A frame as upstream drawing code builds it: fill a vertex region with the
//! writer, then record the draws through the state-caching encoder.

use std::sync::Arc;

use marduk_gpu::coords::{Point, Quad, Rect, ScissorRect, Viewport};
use marduk_gpu::encoder::recording::{
    NativeCommand, RecordingCommandBuffer, RecordingPass, RecordingPassDescriptor, TraceHandle,
    TraceResources,
};
use marduk_gpu::encoder::{EncoderConfig, PrimitiveType, RenderCommandEncoder, TriangleFillMode};
use marduk_gpu::logging::{init_logging, LoggingConfig};
use marduk_gpu::paint::{Color, VertexColor};
use marduk_gpu::writer::{when, Skip, TriStrip, VertexValue, VertexWriter};

/// Bytes one `write_quad` call produces for `record`.
fn quad_size(record: &impl VertexValue) -> usize {
    4 * record.byte_size()
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

struct RectDraw {
    rect: Rect,
    color: Color,
    coverage: Option<f32>,
}

#[test]
fn rect_batch_fills_exact_region() {
    init_logging(LoggingConfig::for_tests());

    let draws = [
        RectDraw {
            rect: Rect::from_xywh(0.0, 0.0, 10.0, 20.0),
            color: Color::from_premul(1.0, 0.0, 0.0, 1.0),
            coverage: None,
        },
        RectDraw {
            rect: Rect::from_xywh(5.0, 5.0, 1.0, 1.0),
            color: Color::from_premul(1.25, 0.5, 0.0, 1.0),
            coverage: Some(0.5),
        },
    ];

    // Every vertex in a batch shares one layout: position, color, optional coverage.
    let wide = draws.iter().any(|d| !d.color.fits_in_bytes());
    let has_coverage = draws.iter().any(|d| d.coverage.is_some());
    let vertex = (
        Point::zero(),
        VertexColor::new(Color::transparent(), wide),
        when(has_coverage, 0.0f32),
    );
    let stride = vertex.byte_size();
    assert_eq!(stride, 8 + 16 + 4);

    let mut buf = vec![0u8; draws.len() * quad_size(&vertex)];
    let mut w = VertexWriter::new(&mut buf);
    for d in &draws {
        w.write_quad((
            TriStrip::from_rect(d.rect),
            VertexColor::new(d.color, wide),
            when(has_coverage, d.coverage.unwrap_or(1.0)),
        ));
    }
    assert_eq!(w.position(), buf.len());

    // Second quad, third vertex (right-top).
    let v = draws.len() * 4 - 2;
    let base = v * stride;
    assert_eq!(read_f32(&buf, base), 6.0);
    assert_eq!(read_f32(&buf, base + 4), 5.0);
    assert_eq!(read_f32(&buf, base + 8), 1.25);
    assert_eq!(read_f32(&buf, base + 24), 0.5);
}

#[test]
fn interleaved_streams_via_offsets() {
    // Layout: [2 positions | 8 bytes padding | 2 uvs].
    let mut buf = vec![0u8; 2 * 8 + 8 + 2 * 4];
    let mut w = VertexWriter::new(&mut buf);

    w.make_offset(24).write(([1u16, 2], [3u16, 4]));
    w.write((Point::new(1.0, 1.0), Point::new(2.0, 2.0), Skip::<[f32; 2]>::new()));
    assert_eq!(w.position(), 24);
    w.skip(8);
    assert_eq!(w.remaining(), 0);

    assert_eq!(read_f32(&buf, 8), 2.0);
    assert_eq!(u16::from_ne_bytes([buf[28], buf[29]]), 3);
}

#[test]
fn quad_from_points_keeps_corner_order() {
    let q = Quad::new([
        Point::new(0.0, 0.0),
        Point::new(1.0, 9.0),
        Point::new(8.0, 1.0),
        Point::new(9.0, 9.0),
    ]);
    let mut buf = vec![0u8; 4 * (8 + 1)];
    let mut w = VertexWriter::new(&mut buf);
    w.write_quad((q, 7u8));
    assert_eq!(w.position(), 36);
    assert_eq!(read_f32(&buf, 9 * 3), 9.0);
    assert_eq!(buf[9 * 3 + 8], 7);
}

#[test]
fn encoded_pass_skips_redundant_state_and_replays() {
    init_logging(LoggingConfig::for_tests());

    let solid = Arc::new(TraceHandle::new("solid"));
    let textured = Arc::new(TraceHandle::new("textured"));
    let clip = ScissorRect::new(0, 0, 320, 240);

    let mut cb = RecordingCommandBuffer::new();
    let mut enc = RenderCommandEncoder::begin_with_config(
        &mut cb,
        &RecordingPassDescriptor::color(1),
        EncoderConfig { report_stats: true, ..EncoderConfig::labeled("frame") },
    )
    .unwrap();

    enc.set_viewport(&Viewport::new(320.0, 240.0));
    enc.set_triangle_fill_mode(TriangleFillMode::Fill);
    for pipeline in [&solid, &solid, &textured, &textured, &solid] {
        enc.set_render_pipeline_state(pipeline);
        enc.set_scissor_rect(clip);
        enc.set_triangle_fill_mode(TriangleFillMode::Fill);
        enc.draw_primitives(PrimitiveType::TriangleStrip, 0, 4);
    }
    let stats = enc.end();

    assert_eq!(stats.draw_calls, 5);
    // Pipelines: solid, textured, solid. Scissor and fill mode once each.
    assert_eq!(stats.state_changes, 5);
    assert_eq!(stats.redundant_state_sets, 2 + 4 + 5);

    let trace = cb.trace(0).unwrap();
    let pipelines: Vec<&str> = trace
        .commands()
        .iter()
        .filter_map(|c| match c {
            NativeCommand::SetRenderPipelineState(label) => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(pipelines, ["solid", "textured", "solid"]);

    let mut replayed = RecordingPass::new();
    trace.replay(&mut replayed, &TraceResources::from_trace(&trace)).unwrap();
    assert_eq!(replayed.trace(), trace);
}
