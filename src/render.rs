//! The rendering sink consumed by the engine.
//!
//! Drawing is a capability the host provides, not something the engine
//! does: `redraw` pushes circle and line primitives with their paint into a
//! `RenderSink` and never queries geometry back. The WASM wrapper adapts a
//! duck-typed JS object to this trait; tests use a recording sink.

use crate::geom::Vec2;

/// Stroke and fill for a node circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePaint<'a> {
    pub fill: &'a str,
    pub stroke: &'a str,
    pub stroke_width: f64,
}

/// Stroke for an edge line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePaint<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// Something that can draw the graph.
pub trait RenderSink {
    /// The interactive surface changed size.
    fn resize(&mut self, width: f64, height: f64);

    /// Position an edge line between two points.
    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &LinePaint<'_>);

    /// Position a node circle.
    fn draw_circle(&mut self, center: Vec2, radius: f64, paint: &CirclePaint<'_>);
}

/// Sink that draws nothing, for headless ticking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl RenderSink for NoopSink {
    fn resize(&mut self, _width: f64, _height: f64) {}

    fn draw_line(&mut self, _from: Vec2, _to: Vec2, _paint: &LinePaint<'_>) {}

    fn draw_circle(&mut self, _center: Vec2, _radius: f64, _paint: &CirclePaint<'_>) {}
}

/// One recorded sink call.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Resize {
        width: f64,
        height: f64,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: String,
    },
    Circle {
        center: Vec2,
        radius: f64,
        stroke: String,
    },
}

/// Sink that records every call in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> Vec<&SinkCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, SinkCall::Circle { .. }))
            .collect()
    }

    pub fn lines(&self) -> Vec<&SinkCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, SinkCall::Line { .. }))
            .collect()
    }
}

#[cfg(test)]
impl RenderSink for RecordingSink {
    fn resize(&mut self, width: f64, height: f64) {
        self.calls.push(SinkCall::Resize { width, height });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &LinePaint<'_>) {
        self.calls.push(SinkCall::Line {
            from,
            to,
            color: paint.color.to_string(),
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f64, paint: &CirclePaint<'_>) {
        self.calls.push(SinkCall::Circle {
            center,
            radius,
            stroke: paint.stroke.to_string(),
        });
    }
}
