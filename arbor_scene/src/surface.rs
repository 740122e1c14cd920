// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point};

use crate::error::SceneError;
use crate::types::{ElementFlags, ElementId, ElementKind, HitShape};

/// A retained drawing surface.
///
/// Elements form a tree under [`Surface::root`]; children are drawn after (on
/// top of) their parent and earlier siblings. Every mutating call takes an
/// [`ElementId`] and fails with [`SceneError::StaleElement`] when the handle
/// no longer refers to a live element. Setters that receive the value an
/// element already holds leave it untouched.
pub trait Surface {
    /// The root container.
    fn root(&self) -> ElementId;

    /// Create an element of `kind` as the last child of `parent`.
    fn create(&mut self, parent: ElementId, kind: ElementKind) -> Result<ElementId, SceneError>;

    /// Set (or replace) a presentation attribute.
    fn set_attr(&mut self, id: ElementId, name: &str, value: &str) -> Result<(), SceneError>;

    /// Replace the text content of an element.
    fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), SceneError>;

    /// Set the element's transform relative to its parent.
    fn set_transform(&mut self, id: ElementId, transform: Affine) -> Result<(), SceneError>;

    /// Set visibility and picking flags.
    fn set_flags(&mut self, id: ElementId, flags: ElementFlags) -> Result<(), SceneError>;

    /// Set the local-space geometry used by [`Surface::hit_test`].
    fn set_hit_shape(&mut self, id: ElementId, shape: Option<HitShape>) -> Result<(), SceneError>;

    /// Remove an element and its subtree. Handles to all of them go stale.
    fn remove(&mut self, id: ElementId) -> Result<(), SceneError>;

    /// Whether `id` refers to a live element.
    fn is_alive(&self, id: ElementId) -> bool;

    /// Topmost visible, pickable element whose hit shape contains `point`.
    ///
    /// `point` is in surface (root) coordinates.
    fn hit_test(&self, point: Point) -> Option<ElementId>;
}
