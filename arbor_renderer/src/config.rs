// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer configuration: glyph metrics, canvas size, colors, and input thresholds.

use arbor_layout::LayoutConfig;
use arbor_view::{ClickConfig, NavigatorConfig, ViewTransform};
use kurbo::Size;

/// Space kept around the diagram, in view units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Margins {
    /// Above the diagram.
    pub top: f64,
    /// Right of the diagram.
    pub right: f64,
    /// Below the diagram.
    pub bottom: f64,
    /// Left of the diagram; also the home translation.
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 120.0,
            bottom: 20.0,
            left: 180.0,
        }
    }
}

/// Paint values written onto the surface.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    /// Link stroke color.
    pub link_stroke: String,
    /// Link stroke opacity.
    pub link_opacity: f64,
    /// Link stroke width.
    pub link_width: f64,
    /// Stroke width of the node layer.
    pub node_stroke_width: f64,
    /// Node body fill.
    pub body_fill: String,
    /// Node body outline.
    pub body_stroke: String,
    /// Proportional fill color.
    pub data_fill: String,
    /// Halo drawn under branch labels.
    pub label_halo: String,
    /// Expander fill while the node's children are shown.
    pub expander_open: String,
    /// Expander fill while the node is collapsed.
    pub expander_collapsed: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            link_stroke: "#555".into(),
            link_opacity: 0.4,
            link_width: 1.5,
            node_stroke_width: 3.0,
            body_fill: "white".into(),
            body_stroke: "black".into(),
            data_fill: "teal".into(),
            label_halo: "white".into(),
            expander_open: "#555".into(),
            expander_collapsed: "#999".into(),
        }
    }
}

/// Everything a [`TreeRenderer`](crate::TreeRenderer) needs besides the tree.
///
/// Defaults reproduce the classic look: 100×60 node blocks with a 10-unit
/// expander dot, a 2960×800 outer canvas with margins of 20/120/20/180, and
/// 180 units of depth per level.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    /// Node block width.
    pub block_width: f64,
    /// Node block height; the right corners are rounded by a quarter of it.
    pub block_height: f64,
    /// Expander radius.
    pub dot_size: f64,
    /// Inset of the proportional fill inside the block outline.
    pub stroke_size: f64,
    /// Depth-axis span per tree level, as a multiple of `block_width`.
    pub level_spacing: f64,
    /// Control-point offset of link curves, as a multiple of `block_width`.
    pub link_bend: f64,
    /// Gap between neighbouring nodes before fitting.
    pub separation: f64,
    /// Outer canvas size the margins are taken from.
    pub outer_size: Size,
    /// The canvas width is divided by this and multiplied by the tree depth
    /// to size the SVG horizontally.
    pub width_divisor: f64,
    /// Space around the diagram.
    pub margins: Margins,
    /// Colors and stroke widths.
    pub palette: Palette,
    /// Pan/zoom limits and reset timing. `home` is derived from `margins`.
    pub navigator: NavigatorConfig,
    /// Click, double-click, and drag thresholds.
    pub click: ClickConfig,
    /// Extra hit radius around expanders, in local units.
    pub hit_tolerance: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            block_width: 100.0,
            block_height: 60.0,
            dot_size: 10.0,
            stroke_size: 1.0,
            level_spacing: 1.8,
            link_bend: 1.5,
            separation: 120.0,
            outer_size: Size::new(2960.0, 800.0),
            width_divisor: 8.0,
            margins: Margins::default(),
            palette: Palette::default(),
            navigator: NavigatorConfig::default(),
            click: ClickConfig::default(),
            hit_tolerance: 0.0,
        }
    }
}

impl RenderConfig {
    /// Drawable canvas (outer size minus margins).
    pub fn canvas(&self) -> Size {
        Size::new(
            self.outer_size.width - self.margins.left - self.margins.right,
            self.outer_size.height - self.margins.top - self.margins.bottom,
        )
    }

    /// Depth-axis span of one tree level.
    pub fn level_width(&self) -> f64 {
        self.block_width * self.level_spacing
    }

    /// Layout parameters for a tree of `max_depth` levels.
    pub fn layout_config(&self, max_depth: usize) -> LayoutConfig {
        LayoutConfig {
            separation: self.separation,
            ..LayoutConfig::for_depth(max_depth, self.level_width(), self.canvas().height)
        }
    }

    /// Size of the SVG element for a tree of `max_depth` levels.
    pub fn svg_size(&self, max_depth: usize) -> Size {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tree depths are far below 2^52."
        )]
        let depth = max_depth as f64;
        Size::new(
            depth * self.canvas().width / self.width_divisor
                + self.margins.left
                + self.margins.right,
            self.canvas().height + self.margins.top + self.margins.bottom,
        )
    }

    /// View transform that places the layout origin at the top-left margin.
    pub fn home(&self) -> ViewTransform {
        ViewTransform::translate(self.margins.left, self.margins.top)
    }

    /// Navigator settings with `home` taken from the margins.
    pub fn navigator_config(&self) -> NavigatorConfig {
        NavigatorConfig {
            home: self.home(),
            ..self.navigator
        }
    }

    /// Corner radius of node blocks.
    pub fn corner_radius(&self) -> f64 {
        self.block_height / 4.0
    }
}
