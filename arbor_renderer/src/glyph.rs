// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry of node glyphs and links.
//!
//! Layout points carry the sibling axis in `x` and the depth axis in `y`;
//! everything here swaps them so trees grow left to right.

use std::fmt::Write as _;

use arbor_layout::clamp_data;
use arbor_scene::SvgNumber;
use kurbo::{Affine, BezPath, Circle, Point, Rect};

use crate::config::RenderConfig;

/// Transform of a node group for a layout position.
pub fn node_transform(position: Point, config: &RenderConfig) -> Affine {
    Affine::translate((position.y + config.block_width / 2.0, position.x))
}

/// Transform of the expander group inside a node group.
pub fn expander_transform(config: &RenderConfig) -> Affine {
    Affine::translate((config.block_width / 2.0, 0.0))
}

/// Expander hit circle in the expander group's local space.
pub fn expander_circle(config: &RenderConfig) -> Circle {
    Circle::new(Point::ZERO, config.dot_size + config.hit_tolerance)
}

/// Outline of the node block, centred on the node origin.
pub fn body_rect(config: &RenderConfig) -> Rect {
    let (w, h) = (config.block_width, config.block_height);
    Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0)
}

/// Area of the proportional fill: the block inset by the stroke size.
pub fn fill_rect(config: &RenderConfig) -> Rect {
    body_rect(config).inset(-config.stroke_size)
}

/// SVG path data for `rect` with its two right-hand corners rounded by `radius`.
///
/// ```rust
/// use arbor_renderer::glyph::right_rounded_rect;
/// use kurbo::Rect;
///
/// assert_eq!(
///     right_rounded_rect(Rect::new(-50.0, -30.0, 50.0, 30.0), 15.0),
///     "M-50,-30h85a15,15 0 0 1 15,15v30a15,15 0 0 1 -15,15h-85z"
/// );
/// ```
pub fn right_rounded_rect(rect: Rect, radius: f64) -> String {
    let (w, h, r) = (rect.width(), rect.height(), radius);
    let n = SvgNumber;
    let mut d = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        d,
        "M{},{}h{}a{r},{r} 0 0 1 {r},{r}v{}a{r},{r} 0 0 1 {},{r}h{}z",
        n(rect.x0),
        n(rect.y0),
        n(w - r),
        n(h - 2.0 * r),
        n(-r),
        n(r - w),
        r = n(r),
    );
    d
}

/// Left inset of the fill clip, in percent: `(1 - data) × 100`.
///
/// `data` is clamped first, so the result is always within `0..=100`.
pub fn fill_inset_percent(data: f64) -> f64 {
    (1.0 - clamp_data(data)) * 100.0
}

/// Inline style clipping the fill from the left so `data` of it stays visible.
///
/// ```rust
/// use arbor_renderer::glyph::fill_clip_style;
///
/// assert_eq!(fill_clip_style(0.5), "clip-path: inset(0% 0% 0% 50%);");
/// ```
pub fn fill_clip_style(data: f64) -> String {
    format!(
        "clip-path: inset(0% 0% 0% {}%);",
        SvgNumber(fill_inset_percent(data))
    )
}

/// Link curve from a child back to its parent, in view orientation.
///
/// Starts at the child, leaves horizontally, and enters the parent's block
/// edge horizontally: control points differ from the endpoints only along
/// the depth axis.
pub fn link_path(source: Point, target: Point, config: &RenderConfig) -> BezPath {
    let bend = source.y + config.block_width * config.link_bend;
    let mut path = BezPath::new();
    path.move_to((target.y, target.x));
    path.curve_to(
        (bend, target.x),
        (bend, source.x),
        (source.y + config.block_width, source.x),
    );
    path
}
