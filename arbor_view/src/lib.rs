// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor View: navigation state for a pannable, zoomable diagram.
//!
//! - [`ViewTransform`]: translate + uniform scale applied to the diagram's
//!   root group. Layout coordinates are never touched by navigation.
//! - [`Navigator`]: applies drag pans and wheel zooms (about the pointer) to a
//!   [`ViewTransform`], clamps the scale, and animates a reset to the home
//!   transform with cubic in-out easing. Animation is driven explicitly with
//!   [`Navigator::tick`], so hosts decide where time comes from.
//! - [`ClickState`]: separates clicks, double clicks, and drags for one
//!   pointer.
//!
//! Timestamps are plain milliseconds (`u64`) from any monotonic clock.
//!
//! This crate is `no_std`.

#![no_std]

mod click;
mod navigator;
mod transform;

pub use click::{ClickConfig, ClickResult, ClickState, Press};
pub use navigator::{Navigator, NavigatorConfig, WheelDelta, ease_cubic_in_out};
pub use transform::ViewTransform;
