// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

/// Parameters of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Space the visible tree is fitted into.
    ///
    /// `height` is the sibling-axis span (node `x` coordinates land in
    /// `0..=height`). `width` is the depth-axis span: the deepest visible
    /// level is placed at `y = width`.
    pub extent: Size,
    /// Gap between neighbouring nodes on the same level, in layout units
    /// before fitting.
    ///
    /// One value is used for every adjacent pair, siblings and cousins
    /// alike. Non-positive or non-finite values fall back to the default.
    pub separation: f64,
}

impl LayoutConfig {
    /// Extent for a tree of `max_depth` levels: `max_depth × level_width`
    /// along the depth axis and `height` along the sibling axis.
    pub fn for_depth(max_depth: usize, level_width: f64, height: f64) -> Self {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tree depths are far below 2^52."
        )]
        let depth = max_depth as f64;
        Self {
            extent: Size::new(depth * level_width, height),
            ..Self::default()
        }
    }

    /// `separation`, or the default when it is not positive and finite.
    pub(crate) fn effective_separation(&self) -> f64 {
        if self.separation.is_finite() && self.separation > 0.0 {
            self.separation
        } else {
            Self::default().separation
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            extent: Size::new(180.0, 760.0),
            separation: 120.0,
        }
    }
}
