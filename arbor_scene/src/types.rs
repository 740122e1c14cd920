// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for surfaces: element identifiers, kinds, flags, and hit shapes.

use core::fmt;

use kurbo::{BezPath, Circle, Rect, RoundedRect};

/// Identifier for an element of a surface (generational).
///
/// A handle goes stale when its element is removed; a later element may reuse
/// the slot but never the generation, so stale handles are always detected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// What an element draws.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementKind {
    /// Container with an optional transform; the only kind that takes children.
    Group,
    /// Path geometry (`d` attribute).
    Path,
    /// Circle (`cx`, `cy`, `r` attributes).
    Circle,
    /// Text run.
    Text,
}

impl ElementKind {
    /// SVG tag name for this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Group => "g",
            Self::Path => "path",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }

    /// Whether elements of this kind may have children.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Group)
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is drawn. Hiding a group hides its subtree.
        const VISIBLE  = 0b0000_0001;
        /// Element takes part in hit testing (requires a hit shape).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Geometry used for precise hit testing, in the element's local space.
#[derive(Clone, Debug, PartialEq)]
pub enum HitShape {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Filled disk.
    Circle(Circle),
    /// Rounded rectangle, possibly with per-corner radii.
    RoundedRect(RoundedRect),
    /// Filled path.
    Path(BezPath),
}

impl From<Rect> for HitShape {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Circle> for HitShape {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<RoundedRect> for HitShape {
    fn from(rect: RoundedRect) -> Self {
        Self::RoundedRect(rect)
    }
}

impl From<BezPath> for HitShape {
    fn from(path: BezPath) -> Self {
        Self::Path(path)
    }
}
