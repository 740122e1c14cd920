// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click and double-click recognition for a pannable view.
//!
//! A press that stays within [`ClickConfig::move_threshold`] of where it
//! started and is released over the same target is a click. Once the pointer
//! travels further, the gesture is a pan: [`ClickState::on_move`] reports the
//! transition once, and the release produces no click.
//!
//! A click on the same target as the previous click, within
//! [`ClickConfig::double_click_ms`] and [`ClickConfig::double_click_distance`],
//! is reported as a double click instead.
//!
//! ```
//! use arbor_view::{ClickResult, ClickState};
//! use kurbo::Point;
//!
//! let mut state: ClickState<u32> = ClickState::new();
//!
//! state.on_down(42, Point::new(10.0, 20.0), 1000);
//! assert_eq!(state.on_up(&42, Point::new(11.0, 20.0), 1080), ClickResult::Click(42));
//!
//! state.on_down(42, Point::new(11.0, 21.0), 1200);
//! assert_eq!(state.on_up(&42, Point::new(11.0, 21.0), 1260), ClickResult::DoubleClick(42));
//! ```
//!
//! Dragging suppresses the click:
//! ```
//! # use arbor_view::{ClickResult, ClickState};
//! # use kurbo::Point;
//! let mut state: ClickState<u32> = ClickState::new();
//! state.on_down(7, Point::new(0.0, 0.0), 0);
//! assert_eq!(state.on_move(Point::new(40.0, 0.0)), Some(7));
//! assert_eq!(state.on_up(&7, Point::new(40.0, 0.0), 50), ClickResult::Suppressed(Some(7)));
//! ```

use kurbo::Point;

/// Thresholds used by [`ClickState`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClickConfig {
    /// Pointer travel (view units) after which a press becomes a drag.
    pub move_threshold: f64,
    /// Longest gap between two clicks that still forms a double click.
    pub double_click_ms: u64,
    /// Largest distance between two clicks that still forms a double click.
    pub double_click_distance: f64,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            move_threshold: 3.0,
            double_click_ms: 500,
            double_click_distance: 5.0,
        }
    }
}

/// State for an active press.
#[derive(Clone, Debug)]
pub struct Press<K> {
    /// Target under the pointer at press time.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp of the press in milliseconds.
    pub down_time: u64,
    /// True once the pointer travelled beyond the move threshold.
    pub dragged: bool,
}

#[derive(Clone, Debug)]
struct LastClick<K> {
    target: K,
    position: Point,
    time: u64,
}

/// Result of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// A click on the target.
    Click(K),
    /// A second click on the same target in quick succession.
    DoubleClick(K),
    /// No click; carries the press target if there was a press.
    Suppressed(Option<K>),
}

/// Click recognizer for a single pointer.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    config: ClickConfig,
    press: Option<Press<K>>,
    last_click: Option<LastClick<K>>,
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Create a recognizer with [`ClickConfig::default`].
    pub fn new() -> Self {
        Self::with_config(ClickConfig::default())
    }

    /// Create a recognizer with custom thresholds.
    pub fn with_config(config: ClickConfig) -> Self {
        Self {
            config,
            press: None,
            last_click: None,
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Record a press on `target` at `position`. Replaces any active press.
    pub fn on_down(&mut self, target: K, position: Point, timestamp: u64) {
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: timestamp,
            dragged: false,
        });
    }

    /// Track pointer movement during a press.
    ///
    /// Returns the press target the first time the pointer leaves the move
    /// threshold, `None` otherwise.
    pub fn on_move(&mut self, position: Point) -> Option<K> {
        let press = self.press.as_mut()?;
        if press.dragged || press.down_position.distance(position) <= self.config.move_threshold
        {
            return None;
        }
        press.dragged = true;
        Some(press.target.clone())
    }

    /// Process a release over `current_target` and classify it.
    pub fn on_up(&mut self, current_target: &K, position: Point, timestamp: u64) -> ClickResult<K> {
        let Some(press) = self.press.take() else {
            return ClickResult::Suppressed(None);
        };
        if press.dragged
            || press.target != *current_target
            || press.down_position.distance(position) > self.config.move_threshold
        {
            self.last_click = None;
            return ClickResult::Suppressed(Some(press.target));
        }

        let double = self.last_click.take().is_some_and(|last| {
            last.target == press.target
                && timestamp.saturating_sub(last.time) <= self.config.double_click_ms
                && last.position.distance(position) <= self.config.double_click_distance
        });
        if double {
            return ClickResult::DoubleClick(press.target);
        }
        self.last_click = Some(LastClick {
            target: press.target.clone(),
            position,
            time: timestamp,
        });
        ClickResult::Click(press.target)
    }

    /// Drop the active press. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Whether a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the active press has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.dragged)
    }

    /// The active press, if any.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// Forget the active press and the double-click history.
    pub fn clear(&mut self) {
        self.press = None;
        self.last_click = None;
    }
}

impl<K: PartialEq + Clone> Default for ClickState<K> {
    fn default() -> Self {
        Self::new()
    }
}
