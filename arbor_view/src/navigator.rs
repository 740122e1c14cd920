// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan/zoom state with an animated reset.

use kurbo::{Point, Vec2};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::transform::ViewTransform;

/// Scroll amount reported by a wheel event, by unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WheelDelta {
    /// Vertical delta in pixels.
    Pixels(f64),
    /// Vertical delta in lines.
    Lines(f64),
    /// Vertical delta in pages.
    Pages(f64),
}

impl WheelDelta {
    /// Zoom factor for this delta: `2^(-delta × k)` with `k` = 0.002 per pixel,
    /// 0.05 per line, and 1 per page. Scrolling down zooms out.
    pub fn zoom_factor(self) -> f64 {
        let exponent = match self {
            Self::Pixels(d) => -d * 0.002,
            Self::Lines(d) => -d * 0.05,
            Self::Pages(d) => -d,
        };
        2_f64.powf(exponent)
    }
}

/// Navigation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigatorConfig {
    /// Transform restored by [`Navigator::reset`].
    pub home: ViewTransform,
    /// Smallest and largest allowed scale.
    ///
    /// The pair is reordered if needed; non-positive or non-finite bounds fall
    /// back to the default extent.
    pub scale_extent: (f64, f64),
    /// Length of the reset animation in milliseconds.
    pub reset_duration_ms: u64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            home: ViewTransform::IDENTITY,
            scale_extent: (0.05, 20.0),
            reset_duration_ms: 750,
        }
    }
}

impl NavigatorConfig {
    /// `scale_extent` ordered as `(min, max)`, or the default extent when a
    /// bound is not positive and finite.
    pub fn normalized_scale_extent(&self) -> (f64, f64) {
        let (a, b) = self.scale_extent;
        if a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0 {
            (a.min(b), a.max(b))
        } else {
            Self::default().scale_extent
        }
    }
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

/// Cubic in-out easing over `0.0..=1.0`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: ViewTransform,
    to: ViewTransform,
    start_ms: u64,
    duration_ms: u64,
}

/// Owns the view transform of one diagram and applies gestures to it.
///
/// Gestures never touch layout; they only change the transform returned by
/// [`Navigator::transform`]. Any pan or zoom interrupts a running reset.
///
/// ```rust
/// use arbor_view::{Navigator, NavigatorConfig, ViewTransform};
/// use kurbo::Vec2;
///
/// let home = ViewTransform::translate(180.0, 20.0);
/// let mut nav = Navigator::new(NavigatorConfig { home, ..Default::default() });
/// nav.pan_by(Vec2::new(30.0, -10.0));
/// assert_eq!(nav.transform(), ViewTransform::translate(210.0, 10.0));
///
/// nav.reset(1_000);
/// nav.tick(1_375);
/// assert!(nav.is_animating());
/// nav.tick(1_750);
/// assert_eq!(nav.transform(), home);
/// assert!(!nav.is_animating());
/// ```
#[derive(Clone, Debug)]
pub struct Navigator {
    config: NavigatorConfig,
    transform: ViewTransform,
    transition: Option<Transition>,
}

impl Navigator {
    /// Start at the configured home transform.
    ///
    /// The scale extent is normalized with
    /// [`NavigatorConfig::normalized_scale_extent`].
    pub fn new(config: NavigatorConfig) -> Self {
        let config = NavigatorConfig {
            scale_extent: config.normalized_scale_extent(),
            ..config
        };
        Self {
            config,
            transform: config.home,
            transition: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Current view transform.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Whether a reset animation is running.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Jump to `transform` (scale clamped), cancelling any animation.
    ///
    /// Returns `false` and changes nothing when the translation is not finite
    /// or the scale is not positive and finite.
    pub fn set_transform(&mut self, transform: ViewTransform) -> bool {
        if !transform.translation.is_finite() || !is_valid_scale(transform.scale) {
            return false;
        }
        self.transition = None;
        self.transform = ViewTransform {
            scale: self.clamp_scale(transform.scale),
            ..transform
        };
        true
    }

    /// Jump to the home transform without animating.
    pub fn reset_now(&mut self) {
        self.transition = None;
        self.transform = self.config.home;
    }

    /// Translate the view by `delta` view units.
    ///
    /// A non-finite `delta` is ignored.
    pub fn pan_by(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.transition = None;
        self.transform.translation += delta;
    }

    /// Multiply the scale by `factor`, keeping the content under `anchor` fixed.
    ///
    /// Returns `false` when the clamped scale did not change, and ignores the
    /// call when `factor` is not positive and finite or `anchor` is not finite.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> bool {
        if !is_valid_scale(factor) || !anchor.is_finite() {
            return false;
        }
        self.transition = None;
        let scale = self.clamp_scale(self.transform.scale * factor);
        if scale == self.transform.scale {
            return false;
        }
        self.transform = self.transform.scaled_about(anchor, scale);
        true
    }

    /// Zoom for a wheel event at `anchor`.
    pub fn wheel(&mut self, anchor: Point, delta: WheelDelta) -> bool {
        self.zoom_about(anchor, delta.zoom_factor())
    }

    /// Start animating back to the home transform at `now_ms`.
    ///
    /// A zero duration jumps immediately.
    pub fn reset(&mut self, now_ms: u64) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?self.transform, "view reset");
        if self.config.reset_duration_ms == 0 {
            self.reset_now();
            return;
        }
        self.transition = Some(Transition {
            from: self.transform,
            to: self.config.home,
            start_ms: now_ms,
            duration_ms: self.config.reset_duration_ms,
        });
    }

    /// Advance a running animation to `now_ms`.
    ///
    /// Returns `true` when the transform changed. The final tick lands exactly
    /// on the target transform and ends the animation.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(tr) = self.transition else {
            return false;
        };
        #[allow(
            clippy::cast_precision_loss,
            reason = "Animation durations are far below 2^52 ms."
        )]
        let t = now_ms.saturating_sub(tr.start_ms) as f64 / tr.duration_ms as f64;
        let next = if t >= 1.0 {
            self.transition = None;
            #[cfg(feature = "tracing")]
            tracing::trace!("view reset finished");
            tr.to
        } else {
            tr.from.interpolate(tr.to, ease_cubic_in_out(t))
        };
        let changed = next != self.transform;
        self.transform = next;
        changed
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        let (min, max) = self.config.scale_extent;
        scale.clamp(min, max)
    }
}
