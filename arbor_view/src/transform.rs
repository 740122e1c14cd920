// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Translate + uniform scale applied to the diagram's root group.
///
/// A content point `p` is shown at `p * scale + translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ViewTransform {
    /// Offset in view units, applied after scaling.
    pub translation: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
}

impl ViewTransform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        scale: 1.0,
    };

    /// Pure translation.
    pub const fn translate(x: f64, y: f64) -> Self {
        Self {
            translation: Vec2::new(x, y),
            scale: 1.0,
        }
    }

    /// Build from parts.
    pub const fn new(translation: Vec2, scale: f64) -> Self {
        Self { translation, scale }
    }

    /// The equivalent affine map (`translate * scale`).
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translation) * Affine::scale(self.scale)
    }

    /// Map a content point into view space.
    pub fn apply(self, point: Point) -> Point {
        (point.to_vec2() * self.scale + self.translation).to_point()
    }

    /// Map a view point back into content space.
    pub fn invert(self, point: Point) -> Point {
        ((point.to_vec2() - self.translation) / self.scale).to_point()
    }

    /// Rescale to `scale` while keeping the content under `anchor` (a view
    /// point) in place.
    pub fn scaled_about(self, anchor: Point, scale: f64) -> Self {
        let content = self.invert(anchor);
        Self {
            translation: anchor.to_vec2() - content.to_vec2() * scale,
            scale,
        }
    }

    /// Interpolate towards `to`; `t = 0` is `self` and `t = 1` is exactly `to`.
    ///
    /// Scale moves geometrically and translation linearly.
    pub fn interpolate(self, to: Self, t: f64) -> Self {
        if t >= 1.0 {
            return to;
        }
        if t <= 0.0 {
            return self;
        }
        Self {
            translation: self.translation.lerp(to.translation, t),
            scale: self.scale * (to.scale / self.scale).powf(t),
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < EPS
    }

    #[test]
    fn apply_and_invert_round_trip() {
        let t = ViewTransform::new(Vec2::new(180.0, 20.0), 2.0);
        let p = Point::new(10.0, -4.0);
        assert_eq!(t.apply(p), Point::new(200.0, 12.0));
        assert!(close(t.invert(t.apply(p)), p));
        assert_eq!(t.to_affine() * p, t.apply(p));
    }

    #[test]
    fn scaling_about_anchor_keeps_it_fixed() {
        let t = ViewTransform::translate(180.0, 20.0);
        let anchor = Point::new(400.0, 300.0);
        let before = t.invert(anchor);
        let zoomed = t.scaled_about(anchor, 3.0);
        assert!(close(zoomed.invert(anchor), before));
        assert_eq!(zoomed.scale, 3.0);
    }

    #[test]
    fn interpolation_hits_endpoints() {
        let a = ViewTransform::new(Vec2::new(-50.0, 400.0), 4.0);
        let b = ViewTransform::translate(180.0, 20.0);
        assert_eq!(a.interpolate(b, 0.0), a);
        assert_eq!(a.interpolate(b, 1.0), b);
        let mid = a.interpolate(b, 0.5);
        assert!((mid.scale - 2.0).abs() < EPS);
        assert!((mid.translation.x - 65.0).abs() < EPS);
    }
}
