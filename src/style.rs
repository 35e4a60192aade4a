//! Visual and threshold configuration.
//!
//! `Style` is the single flat bag of named options the engine reads at tick
//! and draw time: radii, hover distances, the hover transition duration,
//! and the paint applied to circles and lines. The engine owns one `Style`
//! snapshot; hosts change it by merging a `StylePatch`, and the merged
//! result is re-validated before it replaces the active style.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Named options controlling thresholds and visuals.
///
/// Defaults match the stock look: small light-blue circles that double in
/// radius on hover, with the physics attraction reaching twice as far as
/// the hover threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    /// Base node radius, and the radius every node is created with.
    pub node_radius: f64,
    /// Radius a node grows toward while the cursor is within hover range.
    pub node_hover_radius: f64,
    /// Cursor distance below which a node counts as hovered (and becomes
    /// pinned for dragging).
    pub node_hover_distance: f64,
    /// Cursor distance below which the weak cursor attraction applies.
    pub node_hover_physics_distance: f64,
    /// Seconds a full radius transition takes at the nominal frame rate.
    pub node_hover_animation_secs: f64,
    /// Stroke color for idle nodes.
    pub node_stroke_color: String,
    /// Stroke color for hovered nodes.
    pub node_hovered_stroke_color: String,
    /// Node stroke width.
    pub node_stroke_width: f64,
    /// Node fill color.
    pub node_fill_color: String,
    /// Edge stroke color.
    pub edge_color: String,
    /// Edge stroke width.
    pub edge_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            node_radius: 5.0,
            node_hover_radius: 10.0,
            node_hover_distance: 50.0,
            node_hover_physics_distance: 100.0,
            node_hover_animation_secs: 0.2,
            node_stroke_color: "rgba(131, 202, 233, 0.8)".to_string(),
            node_hovered_stroke_color: "rgba(131, 202, 233, 1)".to_string(),
            node_stroke_width: 1.0,
            node_fill_color: "#ffffff".to_string(),
            edge_color: "rgba(131, 202, 233, 0.5)".to_string(),
            edge_width: 1.0,
        }
    }
}

impl Style {
    /// Check every option for values the engine cannot run with.
    ///
    /// Rejected rather than coerced: non-finite numbers, non-positive
    /// radii, a hover radius below the base radius, negative distances or
    /// stroke widths, a non-positive animation duration (the hover step
    /// divides by it), and empty color strings.
    pub fn validate(&self) -> Result<(), GraphError> {
        let numeric = [
            ("nodeRadius", self.node_radius),
            ("nodeHoverRadius", self.node_hover_radius),
            ("nodeHoverDistance", self.node_hover_distance),
            ("nodeHoverPhysicsDistance", self.node_hover_physics_distance),
            ("nodeHoverAnimationSecs", self.node_hover_animation_secs),
            ("nodeStrokeWidth", self.node_stroke_width),
            ("edgeWidth", self.edge_width),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(GraphError::InvalidStyle {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }
        if self.node_radius <= 0.0 {
            return Err(GraphError::InvalidStyle {
                reason: format!("nodeRadius must be positive, got {}", self.node_radius),
            });
        }
        if self.node_hover_radius < self.node_radius {
            return Err(GraphError::InvalidStyle {
                reason: format!(
                    "nodeHoverRadius ({}) must not be below nodeRadius ({})",
                    self.node_hover_radius, self.node_radius
                ),
            });
        }
        if self.node_hover_distance < 0.0 || self.node_hover_physics_distance < 0.0 {
            return Err(GraphError::InvalidStyle {
                reason: "hover distances must not be negative".to_string(),
            });
        }
        if self.node_hover_animation_secs <= 0.0 {
            return Err(GraphError::InvalidStyle {
                reason: format!(
                    "nodeHoverAnimationSecs must be positive, got {}",
                    self.node_hover_animation_secs
                ),
            });
        }
        if self.node_stroke_width < 0.0 || self.edge_width < 0.0 {
            return Err(GraphError::InvalidStyle {
                reason: "stroke widths must not be negative".to_string(),
            });
        }
        let colors = [
            ("nodeStrokeColor", &self.node_stroke_color),
            ("nodeHoveredStrokeColor", &self.node_hovered_stroke_color),
            ("nodeFillColor", &self.node_fill_color),
            ("edgeColor", &self.edge_color),
        ];
        for (name, value) in colors {
            if value.is_empty() {
                return Err(GraphError::InvalidStyle {
                    reason: format!("{name} must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// Overlay every option the patch names, leaving the rest untouched.
    pub fn apply(&mut self, patch: StylePatch) {
        if let Some(v) = patch.node_radius {
            self.node_radius = v;
        }
        if let Some(v) = patch.node_hover_radius {
            self.node_hover_radius = v;
        }
        if let Some(v) = patch.node_hover_distance {
            self.node_hover_distance = v;
        }
        if let Some(v) = patch.node_hover_physics_distance {
            self.node_hover_physics_distance = v;
        }
        if let Some(v) = patch.node_hover_animation_secs {
            self.node_hover_animation_secs = v;
        }
        if let Some(v) = patch.node_stroke_color {
            self.node_stroke_color = v;
        }
        if let Some(v) = patch.node_hovered_stroke_color {
            self.node_hovered_stroke_color = v;
        }
        if let Some(v) = patch.node_stroke_width {
            self.node_stroke_width = v;
        }
        if let Some(v) = patch.node_fill_color {
            self.node_fill_color = v;
        }
        if let Some(v) = patch.edge_color {
            self.edge_color = v;
        }
        if let Some(v) = patch.edge_width {
            self.edge_width = v;
        }
    }
}

/// Partial style overlay; every field optional.
///
/// Unknown keys in the decoded input are tolerated, so hosts can pass a
/// wider options object without tripping the engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    pub node_radius: Option<f64>,
    pub node_hover_radius: Option<f64>,
    pub node_hover_distance: Option<f64>,
    pub node_hover_physics_distance: Option<f64>,
    pub node_hover_animation_secs: Option<f64>,
    pub node_stroke_color: Option<String>,
    pub node_hovered_stroke_color: Option<String>,
    pub node_stroke_width: Option<f64>,
    pub node_fill_color: Option<String>,
    pub edge_color: Option<String>,
    pub edge_width: Option<f64>,
}
