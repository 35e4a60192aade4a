//! NodeGraph - WASM Module
//!
//! Interactive node-graph animation: a lightweight physics model
//! (spring-to-origin, cursor attraction, edge elasticity) driven by a
//! fixed-rate frame loop. Compiled to WebAssembly and exposed through a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `geom`: 2-D vector value type
//! - `graph`: topology, stable ids, and the engine composition root
//! - `physics`: per-tick force model (cursor, origin, edge stretch)
//! - `animate`: behaviors, hover events, tick orchestration
//! - `scheduler`: frame-rate validation and the start/stop state machine
//! - `input`: cursor state and pointer events
//! - `render`: the drawing-sink abstraction
//! - `style`: visual and threshold configuration
//! - `error`: the error taxonomy

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub mod animate;
pub mod error;
pub mod geom;
pub mod graph;
pub mod input;
pub mod physics;
pub mod render;
pub mod scheduler;
pub mod style;

use animate::GraphEvent;
use geom::Vec2;
use graph::{EdgeId, GraphDescription, GraphEngine, NodeId};
use input::PointerEvent;
use physics::StretchPhysics;
use render::{CirclePaint, LinePaint, NoopSink, RenderSink};
use style::StylePatch;

/// Initialize the WASM module: panic messages and log output go to the
/// browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
extern "C" {
    /// Duck-typed drawing surface supplied by the host.
    ///
    /// Expected shape:
    /// `{ resize(w, h), drawLine(x1, y1, x2, y2, color, width),
    ///    drawCircle(x, y, radius, fill, stroke, strokeWidth) }`.
    pub type JsSink;

    #[wasm_bindgen(method, js_name = resize)]
    fn js_resize(this: &JsSink, width: f64, height: f64);

    #[wasm_bindgen(method, js_name = drawLine)]
    fn js_draw_line(this: &JsSink, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64);

    #[wasm_bindgen(method, js_name = drawCircle)]
    fn js_draw_circle(
        this: &JsSink,
        x: f64,
        y: f64,
        radius: f64,
        fill: &str,
        stroke: &str,
        stroke_width: f64,
    );
}

/// Adapts the host's drawing object to the engine's sink trait.
struct SinkAdapter {
    sink: JsSink,
}

impl RenderSink for SinkAdapter {
    fn resize(&mut self, width: f64, height: f64) {
        self.sink.js_resize(width, height);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &LinePaint<'_>) {
        self.sink
            .js_draw_line(from.x, from.y, to.x, to.y, paint.color, paint.width);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f64, paint: &CirclePaint<'_>) {
        self.sink.js_draw_circle(
            center.x,
            center.y,
            radius,
            paint.fill,
            paint.stroke,
            paint.stroke_width,
        );
    }
}

/// Wire form of a [`GraphEvent`] handed to the JS event callback.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    node_id: u32,
}

impl From<GraphEvent> for EventMessage {
    fn from(event: GraphEvent) -> Self {
        match event {
            GraphEvent::HoverStart(id) => Self {
                kind: "hoverStart",
                node_id: id.raw(),
            },
            GraphEvent::HoverEnd(id) => Self {
                kind: "hoverEnd",
                node_id: id.raw(),
            },
        }
    }
}

/// Engine plus host-facing collaborators, shared with the frame closure.
struct App {
    engine: GraphEngine,
    sink: Option<SinkAdapter>,
    on_event: Option<js_sys::Function>,
    /// A frame callback is queued and has not fired yet. Guards against
    /// arming a second callback chain.
    frame_pending: bool,
}

impl App {
    fn new() -> Self {
        Self {
            engine: GraphEngine::new(),
            sink: None,
            on_event: None,
            frame_pending: false,
        }
    }

    /// One pipeline evaluation against the attached sink (or a noop).
    ///
    /// The tick's events come back to the caller rather than being
    /// delivered here: the caller forwards them only after its borrow of
    /// the app ends, so an event handler can call straight back into the
    /// API without tripping the `RefCell`.
    fn tick_once(&mut self) -> Vec<GraphEvent> {
        match &mut self.sink {
            Some(sink) => self.engine.tick(sink),
            None => self.engine.tick(&mut NoopSink),
        }
    }

    fn redraw_once(&mut self) {
        if let Some(sink) = &mut self.sink {
            self.engine.redraw(sink);
        }
    }
}

/// Deliver a tick's events to the host callback, one call per event.
///
/// Callers must not hold a borrow of the app here: the handler may call
/// back into the API synchronously.
fn forward_events(callback: &js_sys::Function, events: &[GraphEvent]) {
    for &event in events {
        let message = EventMessage::from(event);
        if let Ok(value) = serde_wasm_bindgen::to_value(&message) {
            let _ = callback.call1(&JsValue::NULL, &value);
        }
    }
}

/// Queue the next frame callback: requestAnimationFrame when the window
/// offers it, setTimeout at the tick interval otherwise.
fn schedule_frame(frame: &Closure<dyn FnMut()>, interval_ms: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window
        .request_animation_frame(frame.as_ref().unchecked_ref())
        .is_err()
    {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            frame.as_ref().unchecked_ref(),
            interval_ms as i32,
        );
    }
}

/// Main entry point for the node-graph engine.
///
/// This struct wraps the internal GraphEngine and provides the public API
/// exposed to JavaScript, including the frame loop that drives ticks while
/// the pointer is over the interactive surface.
#[wasm_bindgen]
pub struct NodeGraphWasm {
    app: Rc<RefCell<App>>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

#[wasm_bindgen]
impl NodeGraphWasm {
    /// Create a new empty graph.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            app: Rc::new(RefCell::new(App::new())),
            frame: Rc::new(RefCell::new(None)),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the graph contents from a description object:
    /// `{ width, height, nodes: [{x, y}], edges: [{n1, n2}] }`.
    ///
    /// Edge indices are validated before any mutation; a bad description
    /// throws and leaves the current graph intact.
    #[wasm_bindgen(js_name = loadDescription)]
    pub fn load_description(&self, description: JsValue) -> Result<(), JsError> {
        let description: GraphDescription = serde_wasm_bindgen::from_value(description)?;
        let mut app = self.app.borrow_mut();
        app.engine.load_description(&description)?;
        app.redraw_once();
        Ok(())
    }

    /// Remove every node and edge.
    pub fn clear(&self) {
        self.app.borrow_mut().engine.clear();
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the specified position.
    ///
    /// Returns the stable node ID.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&self, x: f64, y: f64) -> u32 {
        self.app.borrow_mut().engine.add_node(x, y).raw()
    }

    /// Remove a node and every edge attached to it.
    ///
    /// Returns true if the node existed and was removed.
    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&self, node_id: u32) -> bool {
        self.app.borrow_mut().engine.remove_node(NodeId::new(node_id))
    }

    /// Get the number of nodes in the graph.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.app.borrow().engine.node_count()
    }

    /// Stable IDs of all live nodes.
    #[wasm_bindgen(js_name = nodeIds)]
    pub fn node_ids(&self) -> Vec<u32> {
        self.app
            .borrow()
            .engine
            .node_ids()
            .into_iter()
            .map(NodeId::raw)
            .collect()
    }

    /// Get a node's current X position.
    #[wasm_bindgen(js_name = nodeX)]
    pub fn node_x(&self, node_id: u32) -> Option<f64> {
        self.app
            .borrow()
            .engine
            .node(NodeId::new(node_id))
            .map(|node| node.position().x)
    }

    /// Get a node's current Y position.
    #[wasm_bindgen(js_name = nodeY)]
    pub fn node_y(&self, node_id: u32) -> Option<f64> {
        self.app
            .borrow()
            .engine
            .node(NodeId::new(node_id))
            .map(|node| node.position().y)
    }

    /// Get a node's current (animated) radius.
    #[wasm_bindgen(js_name = nodeRadius)]
    pub fn node_radius(&self, node_id: u32) -> Option<f64> {
        self.app
            .borrow()
            .engine
            .node(NodeId::new(node_id))
            .map(|node| node.radius())
    }

    /// Move a node. Its origin stays put, so the origin force pulls it
    /// back while physics is enabled.
    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(&self, node_id: u32, x: f64, y: f64) -> bool {
        self.app
            .borrow_mut()
            .engine
            .set_node_position(NodeId::new(node_id), x, y)
    }

    /// Check if a node is currently hovered.
    #[wasm_bindgen(js_name = isNodeHovered)]
    pub fn is_node_hovered(&self, node_id: u32) -> bool {
        self.app.borrow().engine.is_node_hovered(NodeId::new(node_id))
    }

    /// Check if a node is pinned to the cursor.
    #[wasm_bindgen(js_name = isNodePinned)]
    pub fn is_node_pinned(&self, node_id: u32) -> bool {
        self.app.borrow().engine.is_node_pinned(NodeId::new(node_id))
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge between two existing nodes; the rest length is their
    /// current origin distance.
    ///
    /// Returns the edge ID; throws if either node is unknown.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&self, a: u32, b: u32) -> Result<u32, JsError> {
        let id = self
            .app
            .borrow_mut()
            .engine
            .add_edge(NodeId::new(a), NodeId::new(b))?;
        Ok(id.raw())
    }

    /// Remove an edge by ID.
    ///
    /// Returns true if the edge existed and was removed.
    #[wasm_bindgen(js_name = removeEdge)]
    pub fn remove_edge(&self, edge_id: u32) -> bool {
        self.app.borrow_mut().engine.remove_edge(EdgeId::new(edge_id))
    }

    /// Get the number of edges in the graph.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.app.borrow().engine.edge_count()
    }

    // =========================================================================
    // Style & Timing
    // =========================================================================

    /// Merge a partial style object (camelCase keys, unknown keys
    /// tolerated) into the active style.
    ///
    /// The merged result is validated first; a bad patch throws and leaves
    /// the active style untouched.
    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&self, patch: JsValue) -> Result<(), JsError> {
        let patch: StylePatch = serde_wasm_bindgen::from_value(patch)?;
        self.app.borrow_mut().engine.merge_style(patch)?;
        Ok(())
    }

    /// The active style as a plain object.
    pub fn style(&self) -> Result<JsValue, JsError> {
        let value = serde_wasm_bindgen::to_value(self.app.borrow().engine.style())?;
        Ok(value)
    }

    /// Set the tick rate in ticks per second.
    ///
    /// Throws on zero, negative, or non-finite rates.
    #[wasm_bindgen(js_name = setFrameRate)]
    pub fn set_frame_rate(&self, per_second: f64) -> Result<(), JsError> {
        self.app.borrow_mut().engine.set_frame_rate(per_second)?;
        Ok(())
    }

    /// The nominal tick rate in ticks per second.
    #[wasm_bindgen(js_name = frameRate)]
    pub fn frame_rate(&self) -> f64 {
        self.app.borrow().engine.frame_rate().per_second()
    }

    /// Rendering surface width.
    pub fn width(&self) -> f64 {
        self.app.borrow().engine.width()
    }

    /// Rendering surface height.
    pub fn height(&self) -> f64 {
        self.app.borrow().engine.height()
    }

    /// Set the rendering surface dimensions and repaint.
    #[wasm_bindgen(js_name = setSurfaceSize)]
    pub fn set_surface_size(&self, width: f64, height: f64) {
        let mut app = self.app.borrow_mut();
        app.engine.set_surface_size(width, height);
        app.redraw_once();
    }

    // =========================================================================
    // Animation & Physics
    // =========================================================================

    /// Enable a behavior by name (`"hover"`). Unknown names are ignored.
    ///
    /// Returns whether the active set changed.
    #[wasm_bindgen(js_name = enableBehavior)]
    pub fn enable_behavior(&self, name: &str) -> bool {
        self.app.borrow_mut().engine.enable_behavior(name)
    }

    /// Attach the force model with the stock factors.
    #[wasm_bindgen(js_name = enablePhysics)]
    pub fn enable_physics(&self) {
        self.app.borrow_mut().engine.enable_physics();
    }

    /// Attach a force model with caller-supplied factors
    /// (`{ hoverForce, originForce, edgeStretchForce, dragForce }`,
    /// each in (0, 1]; omitted keys keep the stock value).
    #[wasm_bindgen(js_name = enablePhysicsWith)]
    pub fn enable_physics_with(&self, factors: JsValue) -> Result<(), JsError> {
        let physics: StretchPhysics = serde_wasm_bindgen::from_value(factors)?;
        self.app.borrow_mut().engine.enable_physics_with(physics)?;
        Ok(())
    }

    /// Attach the drawing object and paint the current state onto it.
    #[wasm_bindgen(js_name = attachRenderSink)]
    pub fn attach_render_sink(&self, sink: JsSink) {
        let mut app = self.app.borrow_mut();
        app.sink = Some(SinkAdapter { sink });
        app.redraw_once();
    }

    /// Register a callback receiving `{ type, nodeId }` objects for hover
    /// transitions.
    #[wasm_bindgen(js_name = setEventCallback)]
    pub fn set_event_callback(&self, callback: js_sys::Function) {
        self.app.borrow_mut().on_event = Some(callback);
    }

    /// Remove the event callback.
    #[wasm_bindgen(js_name = clearEventCallback)]
    pub fn clear_event_callback(&self) {
        self.app.borrow_mut().on_event = None;
    }

    // =========================================================================
    // Pointer Input & Frame Driving
    // =========================================================================

    /// The pointer moved to surface-local coordinates.
    #[wasm_bindgen(js_name = pointerMoved)]
    pub fn pointer_moved(&self, x: f64, y: f64) {
        self.pointer(PointerEvent::Moved { x, y });
    }

    /// The pointer entered the interactive surface. Starts the frame
    /// stream if animation is enabled.
    #[wasm_bindgen(js_name = pointerEntered)]
    pub fn pointer_entered(&self) {
        self.pointer(PointerEvent::Entered);
    }

    /// The pointer left the interactive surface. Stops the frame stream
    /// and releases the button.
    #[wasm_bindgen(js_name = pointerLeft)]
    pub fn pointer_left(&self) {
        self.pointer(PointerEvent::Left);
    }

    /// The pointer button was pressed.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self) {
        self.pointer(PointerEvent::ButtonDown);
    }

    /// The pointer button was released.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) {
        self.pointer(PointerEvent::ButtonUp);
    }

    /// Run one tick manually and redraw.
    ///
    /// Bypasses the scheduler: hosts driving their own loop call this
    /// directly.
    pub fn tick(&self) {
        let (events, callback) = {
            let mut app = self.app.borrow_mut();
            let events = app.tick_once();
            (events, app.on_event.clone())
        };
        if let Some(callback) = &callback {
            forward_events(callback, &events);
        }
    }

    /// Whether the frame stream is currently running.
    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.app.borrow().engine.is_animating()
    }
}

impl NodeGraphWasm {
    fn pointer(&self, event: PointerEvent) {
        let started = self.app.borrow_mut().engine.apply_pointer(event);
        if started {
            self.arm_frame_loop();
        }
    }

    /// Start the self-rescheduling callback chain, unless one is already
    /// queued.
    fn arm_frame_loop(&self) {
        let interval_ms = {
            let mut app = self.app.borrow_mut();
            if app.frame_pending {
                return;
            }
            app.frame_pending = true;
            app.engine.interval_ms()
        };

        self.ensure_frame_closure();
        if let Some(frame) = self.frame.borrow().as_ref() {
            schedule_frame(frame, interval_ms);
        }
    }

    fn ensure_frame_closure(&self) {
        if self.frame.borrow().is_some() {
            return;
        }

        let app = Rc::clone(&self.app);
        let slot = Rc::clone(&self.frame);
        let closure: Closure<dyn FnMut()> = Closure::new(move || {
            let (events, callback, next_interval) = {
                let mut app = app.borrow_mut();
                app.frame_pending = false;
                // Stopped between frames: an in-flight callback is a no-op.
                if !app.engine.is_animating() {
                    return;
                }
                let events = app.tick_once();
                let next_interval = if app.engine.is_animating() {
                    app.frame_pending = true;
                    Some(app.engine.interval_ms())
                } else {
                    None
                };
                (events, app.on_event.clone(), next_interval)
            };
            if let Some(callback) = &callback {
                forward_events(callback, &events);
            }
            if let Some(interval_ms) = next_interval {
                if let Some(frame) = slot.borrow().as_ref() {
                    schedule_frame(frame, interval_ms);
                }
            }
        });
        *self.frame.borrow_mut() = Some(closure);
    }
}

impl Default for NodeGraphWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::render::{RecordingSink, SinkCall};
    use serde_json::json;

    fn demo_description() -> GraphDescription {
        serde_json::from_value(json!({
            "width": 200,
            "height": 200,
            "nodes": [{"x": 50, "y": 50}, {"x": 150, "y": 50}, {"x": 100, "y": 150}],
            "edges": [{"n1": 0, "n2": 1}, {"n1": 1, "n2": 2}]
        }))
        .unwrap()
    }

    /// Full pipeline without JS types: load, enable hover + physics, move
    /// the pointer onto a node, and tick until the hover transition
    /// completes.
    #[test]
    fn test_load_hover_pipeline() {
        let mut engine = GraphEngine::new();
        engine.load_description(&demo_description()).unwrap();
        engine.enable_behavior("hover");
        engine.enable_physics();

        engine.apply_pointer(PointerEvent::Entered);
        engine.apply_pointer(PointerEvent::Moved { x: 50.0, y: 50.0 });

        let target = NodeId::new(0);
        let mut sink = RecordingSink::new();
        let mut transitions = Vec::new();
        for _ in 0..30 {
            transitions.extend(engine.tick(&mut sink));
        }

        assert_eq!(transitions, vec![GraphEvent::HoverStart(target)]);
        assert!(engine.is_node_hovered(target));
        let node = engine.node(target).unwrap();
        assert_eq!(node.radius(), engine.style().node_hover_radius);

        // Every frame repaints the whole scene: resize, 2 edges, 3 nodes.
        assert_eq!(sink.calls.len(), 30 * 6);
        assert!(matches!(
            sink.calls[0],
            SinkCall::Resize { width: w, .. } if w == 200.0
        ));

        // Moving away shrinks the radius back and ends the hover.
        engine.apply_pointer(PointerEvent::Moved { x: 500.0, y: 500.0 });
        let mut transitions = Vec::new();
        for _ in 0..30 {
            transitions.extend(engine.tick(&mut sink));
        }
        assert_eq!(transitions, vec![GraphEvent::HoverEnd(target)]);
        assert_eq!(
            engine.node(target).unwrap().radius(),
            engine.style().node_radius
        );
    }

    /// A displaced graph relaxes back to its loaded shape once the
    /// pointer is out of reach.
    #[test]
    fn test_layout_relaxes_to_origins() {
        let mut engine = GraphEngine::new();
        engine.load_description(&demo_description()).unwrap();
        engine.enable_physics();

        let ids = engine.node_ids();
        engine.set_node_position(ids[0], 0.0, 0.0);
        engine.set_node_position(ids[1], 300.0, 300.0);

        engine.apply_pointer(PointerEvent::Entered);
        engine.apply_pointer(PointerEvent::Moved { x: 5000.0, y: 5000.0 });

        let mut sink = NoopSink;
        for _ in 0..400 {
            engine.tick(&mut sink);
        }

        for id in ids {
            let node = engine.node(id).unwrap();
            assert!(node.position().distance_to(node.origin()) < 1e-6);
        }
    }

    /// Dragging: press pins the nearby node and pulls it hard toward the
    /// cursor; release and leave let the spring take over.
    #[test]
    fn test_drag_then_release() {
        let mut engine = GraphEngine::new();
        engine.load_description(&demo_description()).unwrap();
        engine.enable_physics();

        let target = NodeId::new(0);
        engine.apply_pointer(PointerEvent::Entered);
        engine.apply_pointer(PointerEvent::Moved { x: 60.0, y: 50.0 });

        let mut sink = NoopSink;
        engine.tick(&mut sink);
        assert!(engine.is_node_pinned(target));

        engine.apply_pointer(PointerEvent::ButtonDown);
        engine.apply_pointer(PointerEvent::Moved { x: 120.0, y: 90.0 });
        let before = engine.node(target).unwrap().position();
        engine.tick(&mut sink);
        let after = engine.node(target).unwrap().position();
        let cursor = Vec2::new(120.0, 90.0);
        assert!(after.distance_to(cursor) < before.distance_to(cursor));

        engine.apply_pointer(PointerEvent::ButtonUp);
        engine.apply_pointer(PointerEvent::Left);
        assert!(!engine.is_animating());
        for _ in 0..400 {
            engine.tick(&mut sink);
        }
        let node = engine.node(target).unwrap();
        assert!(node.position().distance_to(node.origin()) < 1e-3);
    }

    /// A tick hands its events back to the caller instead of delivering
    /// them itself, so the wrapper forwards to the host callback only
    /// after its borrow of the app has ended. A handler that calls back
    /// into the API synchronously then finds the `RefCell` free.
    #[test]
    fn test_tick_returns_events_to_caller() {
        let mut app = App::new();
        app.engine.load_description(&demo_description()).unwrap();
        app.engine.enable_behavior("hover");
        app.engine.apply_pointer(PointerEvent::Entered);
        app.engine.apply_pointer(PointerEvent::Moved { x: 50.0, y: 50.0 });

        let events = app.tick_once();
        assert_eq!(events, vec![GraphEvent::HoverStart(NodeId::new(0))]);

        // No transition on the next tick, so nothing to forward.
        assert!(app.tick_once().is_empty());
    }

    /// The JS-facing event payload shape.
    #[test]
    fn test_event_message_shape() {
        let message = EventMessage::from(GraphEvent::HoverStart(NodeId::new(3)));
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"type": "hoverStart", "nodeId": 3})
        );

        let message = EventMessage::from(GraphEvent::HoverEnd(NodeId::new(7)));
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"type": "hoverEnd", "nodeId": 7})
        );
    }
}
