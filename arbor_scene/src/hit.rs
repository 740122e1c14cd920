// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow-phase hit testing in an element's local coordinates.

use core::cmp::Ordering;

use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape};

use crate::types::HitShape;

/// Parameters controlling precise hit tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HitParams {
    /// Tolerance in local units for near misses.
    ///
    /// Inflates every shape so pointer input slightly outside an expander
    /// still lands. `0.0` means exact containment.
    pub fill_tolerance: f64,
}

/// Score returned from a precise hit; lower distance is a closer hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the shape in local units, `0.0` inside it.
    pub distance: f64,
}

impl HitScore {
    /// A hit inside the shape.
    pub const fn inside() -> Self {
        Self { distance: 0.0 }
    }

    /// Compare two scores, preferring smaller distance.
    pub fn cmp_distance(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance)
    }
}

/// Shapes that can answer "does this local-space point hit me?".
pub trait PreciseHitTest {
    /// Test `pt`, given in the shape's local coordinate space.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}

impl PreciseHitTest for Rect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let inflated = self.inflate(params.fill_tolerance, params.fill_tolerance);
        if !inflated.contains(pt) {
            return None;
        }
        let dx = (self.x0 - pt.x).max(pt.x - self.x1).max(0.0);
        let dy = (self.y0 - pt.y).max(pt.y - self.y1).max(0.0);
        Some(HitScore {
            distance: dx.hypot(dy),
        })
    }
}

impl PreciseHitTest for Circle {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let dist = pt.distance(self.center);
        if dist > self.radius + params.fill_tolerance {
            return None;
        }
        Some(HitScore {
            distance: (dist - self.radius).max(0.0),
        })
    }
}

impl PreciseHitTest for RoundedRect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        hit_test_shape(self, pt, params)
    }
}

impl PreciseHitTest for BezPath {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        hit_test_shape(self, pt, params)
    }
}

impl PreciseHitTest for HitShape {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        match self {
            Self::Rect(r) => r.hit_test_local(pt, params),
            Self::Circle(c) => c.hit_test_local(pt, params),
            Self::RoundedRect(r) => r.hit_test_local(pt, params),
            Self::Path(p) => p.hit_test_local(pt, params),
        }
    }
}

/// Fill hit for any [`Shape`] using its `contains` and `bounding_box`.
///
/// Near misses within the tolerance of the bounding box report the tolerance
/// as their distance; exact distances to curved edges are not computed.
pub fn hit_test_shape<S: Shape>(shape: &S, pt: Point, params: &HitParams) -> Option<HitScore> {
    let tol = params.fill_tolerance;
    if !shape.bounding_box().inflate(tol, tol).contains(pt) {
        return None;
    }
    if shape.contains(pt) {
        Some(HitScore::inside())
    } else if tol > 0.0 {
        Some(HitScore { distance: tol })
    } else {
        None
    }
}
