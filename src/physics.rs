//! The stretch-physics force model.
//!
//! Three forces move nodes, all first-order relaxation steps (direct
//! position deltas, no velocity or mass):
//! - Cursor force: attraction toward the pointer, weak within the hover
//!   physics range, strong while a pinned node is dragged
//! - Origin force: every node relaxes back toward its rest position
//! - Edge stretch force: endpoints of a stretched or compressed edge move
//!   symmetrically toward their rest length
//!
//! Because each factor is a fraction of the remaining distance applied per
//! tick, the system is unconditionally stable at any frame rate: positions
//! decay geometrically toward their targets and never oscillate.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::Node;
use crate::input::Cursor;
use crate::style::Style;

/// Per-tick force factors, each a fraction in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StretchPhysics {
    /// Weak attraction toward the cursor within the hover physics range.
    pub hover_force: f64,
    /// Pull back toward each node's origin.
    pub origin_force: f64,
    /// Restoring pull between edge endpoints, scaled by relative stretch.
    pub edge_stretch_force: f64,
    /// Strong cursor pull on pinned nodes while the button is held.
    pub drag_force: f64,
}

impl Default for StretchPhysics {
    fn default() -> Self {
        Self {
            hover_force: 0.02,
            origin_force: 0.1,
            edge_stretch_force: 0.2,
            drag_force: 0.4,
        }
    }
}

impl StretchPhysics {
    /// Reject factors outside (0, 1] or non-finite.
    ///
    /// A factor above 1 overshoots its target and diverges tick over tick;
    /// zero or below never moves anything toward it.
    pub fn validate(&self) -> Result<(), GraphError> {
        let factors = [
            ("hoverForce", self.hover_force),
            ("originForce", self.origin_force),
            ("edgeStretchForce", self.edge_stretch_force),
            ("dragForce", self.drag_force),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(GraphError::InvalidForceFactor { name, value });
            }
        }
        Ok(())
    }

    /// Pull a node toward the cursor and maintain its pinned flag.
    ///
    /// No-op while the pointer is absent. With the button up, the pinned
    /// flag is reassigned from the hover distance every tick; it decides
    /// which nodes the *next* button-down will drag. With the button down,
    /// pinned nodes follow the cursor at `drag_force` and everything else
    /// within the hover physics range feels the weak pull.
    pub fn apply_cursor_force(
        &self,
        node: &mut Node,
        cursor: &Cursor,
        distance: f64,
        style: &Style,
    ) {
        if !cursor.is_present() {
            return;
        }

        let delta = cursor.position() - node.position();
        if cursor.is_button_down() {
            if node.is_pinned() {
                node.translate(delta * self.drag_force);
            } else if distance < style.node_hover_physics_distance {
                node.translate(delta * self.hover_force);
            }
        } else {
            node.set_pinned(distance < style.node_hover_distance);
            if distance < style.node_hover_physics_distance {
                node.translate(delta * self.hover_force);
            }
        }
    }

    /// Relax a node toward its origin by `origin_force` of the remaining
    /// offset.
    pub fn apply_origin_force(&self, node: &mut Node) {
        let pull = (node.origin() - node.position()) * self.origin_force;
        node.translate(pull);
    }

    /// Move both endpoints of an edge toward its rest length.
    ///
    /// The deltas are equal and opposite, so the pair's midpoint is
    /// conserved. A zero-length edge produces no force this tick (the
    /// direction is undefined and the division would not be finite).
    pub fn apply_edge_stretch_force(&self, n1: &mut Node, n2: &mut Node, rest_length: f64) {
        let length = n1.position().distance_to(n2.position());
        if length == 0.0 {
            return;
        }

        let stretch = length - rest_length;
        let force = (n1.position() - n2.position()) * (self.edge_stretch_force * stretch / length);
        n2.translate(force);
        n1.translate(-force);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec2;
    use crate::graph::NodeId;
    use crate::input::PointerEvent;

    fn node_at(x: f64, y: f64) -> Node {
        Node::new(NodeId::new(0), Vec2::new(x, y), 5.0)
    }

    fn cursor_at(x: f64, y: f64, button_down: bool) -> Cursor {
        let mut cursor = Cursor::new();
        cursor.apply(PointerEvent::Entered);
        cursor.apply(PointerEvent::Moved { x, y });
        if button_down {
            cursor.apply(PointerEvent::ButtonDown);
        }
        cursor
    }

    fn distance(node: &Node, cursor: &Cursor) -> f64 {
        node.position().distance_to(cursor.position())
    }

    #[test]
    fn test_default_factors() {
        let physics = StretchPhysics::default();
        assert_eq!(physics.hover_force, 0.02);
        assert_eq!(physics.origin_force, 0.1);
        assert_eq!(physics.edge_stretch_force, 0.2);
        assert_eq!(physics.drag_force, 0.4);
        assert!(physics.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let zero = StretchPhysics {
            hover_force: 0.0,
            ..Default::default()
        };
        assert_eq!(
            zero.validate(),
            Err(GraphError::InvalidForceFactor {
                name: "hoverForce",
                value: 0.0
            })
        );

        let above_one = StretchPhysics {
            drag_force: 1.5,
            ..Default::default()
        };
        assert!(above_one.validate().is_err());

        let negative = StretchPhysics {
            origin_force: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan = StretchPhysics {
            edge_stretch_force: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_cursor_force_noop_when_absent() {
        let physics = StretchPhysics::default();
        let style = Style::default();
        let mut node = node_at(0.0, 0.0);
        let cursor = Cursor::new();

        physics.apply_cursor_force(&mut node, &cursor, 10.0, &style);
        assert_eq!(node.position(), Vec2::ZERO);
        assert!(!node.is_pinned());
    }

    #[test]
    fn test_button_up_assigns_pin_by_hover_distance() {
        let physics = StretchPhysics::default();
        let style = Style::default();

        let mut near = node_at(0.0, 0.0);
        let cursor = cursor_at(30.0, 0.0, false);
        let d = distance(&near, &cursor);
        physics.apply_cursor_force(&mut near, &cursor, d, &style);
        assert!(near.is_pinned());

        let mut far = node_at(0.0, 0.0);
        let cursor = cursor_at(60.0, 0.0, false);
        let d = distance(&far, &cursor);
        physics.apply_cursor_force(&mut far, &cursor, d, &style);
        assert!(!far.is_pinned());
    }

    #[test]
    fn test_button_up_weak_pull_within_physics_range() {
        let physics = StretchPhysics::default();
        let style = Style::default();
        let mut node = node_at(0.0, 0.0);
        let cursor = cursor_at(80.0, 0.0, false);

        let d = distance(&node, &cursor);
        physics.apply_cursor_force(&mut node, &cursor, d, &style);
        // delta * hover_force = 80 * 0.02
        assert_eq!(node.position(), Vec2::new(1.6, 0.0));
    }

    #[test]
    fn test_no_pull_beyond_physics_range() {
        let physics = StretchPhysics::default();
        let style = Style::default();
        let mut node = node_at(0.0, 0.0);
        let cursor = cursor_at(150.0, 0.0, false);

        let d = distance(&node, &cursor);
        physics.apply_cursor_force(&mut node, &cursor, d, &style);
        assert_eq!(node.position(), Vec2::ZERO);
        assert!(!node.is_pinned());
    }

    #[test]
    fn test_button_down_drags_pinned_node() {
        let physics = StretchPhysics::default();
        let style = Style::default();
        let mut node = node_at(0.0, 0.0);
        node.set_pinned(true);
        let cursor = cursor_at(10.0, 20.0, true);

        let d = distance(&node, &cursor);
        physics.apply_cursor_force(&mut node, &cursor, d, &style);
        // delta * drag_force = (10, 20) * 0.4
        assert_eq!(node.position(), Vec2::new(4.0, 8.0));
        // Dragging does not reassign the pin.
        assert!(node.is_pinned());
    }

    #[test]
    fn test_button_down_weak_pull_on_unpinned_node() {
        let physics = StretchPhysics::default();
        let style = Style::default();
        let mut node = node_at(0.0, 0.0);
        let cursor = cursor_at(50.0, 0.0, true);

        let d = distance(&node, &cursor);
        physics.apply_cursor_force(&mut node, &cursor, d, &style);
        assert_eq!(node.position(), Vec2::new(1.0, 0.0));
        assert!(!node.is_pinned());
    }

    #[test]
    fn test_button_down_ignores_unpinned_node_beyond_physics_range() {
        let physics = StretchPhysics::default();
        let style = Style::default();
        let mut node = node_at(0.0, 0.0);
        let cursor = cursor_at(200.0, 0.0, true);

        let d = distance(&node, &cursor);
        physics.apply_cursor_force(&mut node, &cursor, d, &style);
        assert_eq!(node.position(), Vec2::ZERO);
    }

    #[test]
    fn test_origin_force_single_step() {
        let physics = StretchPhysics::default();
        let mut node = node_at(0.0, 0.0);
        node.set_position(Vec2::new(100.0, 0.0));

        physics.apply_origin_force(&mut node);
        // One step removes origin_force of the offset.
        assert_eq!(node.position(), Vec2::new(90.0, 0.0));
    }

    #[test]
    fn test_origin_force_converges_geometrically() {
        let physics = StretchPhysics::default();
        let mut node = node_at(0.0, 0.0);
        node.set_position(Vec2::new(100.0, -40.0));

        for _ in 0..200 {
            physics.apply_origin_force(&mut node);
        }

        let remaining = node.position().distance_to(node.origin());
        assert!(remaining < 1e-6, "still {remaining} away after 200 ticks");
        assert!(node.position().is_finite());
    }

    #[test]
    fn test_edge_stretch_symmetry() {
        let physics = StretchPhysics::default();
        let mut n1 = node_at(0.0, 0.0);
        let mut n2 = node_at(0.0, 0.0);
        n2.set_position(Vec2::new(30.0, 0.0));
        let before_1 = n1.position();
        let before_2 = n2.position();

        physics.apply_edge_stretch_force(&mut n1, &mut n2, 10.0);

        let delta_1 = n1.position() - before_1;
        let delta_2 = n2.position() - before_2;
        assert_eq!(delta_1, -delta_2);

        // Midpoint is conserved exactly.
        let midpoint = (n1.position() + n2.position()) * 0.5;
        assert_eq!(midpoint, (before_1 + before_2) * 0.5);
    }

    #[test]
    fn test_stretched_edge_contracts() {
        let physics = StretchPhysics::default();
        let mut n1 = node_at(0.0, 0.0);
        let mut n2 = node_at(0.0, 0.0);
        n2.set_position(Vec2::new(30.0, 0.0));

        physics.apply_edge_stretch_force(&mut n1, &mut n2, 10.0);
        // length 30, stretch 20: force = (-30, 0) * (0.2 * 20 / 30) = (-4, 0)
        assert_eq!(n2.position(), Vec2::new(26.0, 0.0));
        assert_eq!(n1.position(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_compressed_edge_expands() {
        let physics = StretchPhysics::default();
        let mut n1 = node_at(0.0, 0.0);
        let mut n2 = node_at(0.0, 0.0);
        n2.set_position(Vec2::new(5.0, 0.0));

        physics.apply_edge_stretch_force(&mut n1, &mut n2, 10.0);
        // length 5, stretch -5: force = (-5, 0) * (0.2 * -5 / 5) = (1, 0)
        assert_eq!(n2.position(), Vec2::new(6.0, 0.0));
        assert_eq!(n1.position(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_zero_length_edge_is_skipped() {
        let physics = StretchPhysics::default();
        let mut n1 = node_at(10.0, 10.0);
        let mut n2 = node_at(10.0, 10.0);

        physics.apply_edge_stretch_force(&mut n1, &mut n2, 10.0);

        assert_eq!(n1.position(), Vec2::new(10.0, 10.0));
        assert_eq!(n2.position(), Vec2::new(10.0, 10.0));
        assert!(n1.position().is_finite());
        assert!(n2.position().is_finite());
    }

    #[test]
    fn test_factors_decode_camel_case() {
        let physics: StretchPhysics =
            serde_json::from_str(r#"{"hoverForce": 0.05, "dragForce": 0.5}"#).unwrap();

        assert_eq!(physics.hover_force, 0.05);
        assert_eq!(physics.drag_force, 0.5);
        // Unnamed factors fall back to the defaults.
        assert_eq!(physics.origin_force, 0.1);
        assert_eq!(physics.edge_stretch_force, 0.2);
    }
}
