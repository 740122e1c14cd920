// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: a retained drawing surface for tree diagrams.
//!
//! - [`Surface`]: the trait renderers draw through. Elements form a tree of
//!   groups, paths, circles, and text with SVG-style attributes, local
//!   transforms, and [`ElementFlags`].
//! - [`SvgDocument`]: the in-crate implementation. A generational arena of
//!   elements that serializes to SVG markup and answers hit tests.
//! - [`PreciseHitTest`]: narrow-phase hit testing for [`kurbo`] shapes in an
//!   element's local space. Only elements with [`ElementFlags::PICKABLE`] and
//!   a [`HitShape`] take part in [`Surface::hit_test`].
//! - [`SceneIndex`]: key → element bookkeeping for reconciled redraws. A
//!   renderer visits the keys its model currently has and gets back the ones
//!   that disappeared, so unchanged drawables survive a redraw untouched.
//!
//! This crate does not lay anything out; positions arrive from upstream as
//! transforms and attribute values.
//!
//! ```rust
//! use arbor_scene::{ElementFlags, ElementKind, Surface, SvgDocument};
//! use kurbo::{Affine, Circle, Point};
//!
//! let mut doc = SvgDocument::new();
//! let node = doc.create(doc.root(), ElementKind::Group).unwrap();
//! doc.set_transform(node, Affine::translate((100.0, 40.0))).unwrap();
//! let dot = doc.create(node, ElementKind::Circle).unwrap();
//! doc.set_hit_shape(dot, Some(Circle::new((0.0, 0.0), 10.0).into())).unwrap();
//! doc.set_flags(dot, ElementFlags::VISIBLE | ElementFlags::PICKABLE).unwrap();
//!
//! assert_eq!(doc.hit_test(Point::new(104.0, 43.0)), Some(dot));
//! assert_eq!(doc.hit_test(Point::new(0.0, 0.0)), None);
//! ```

mod error;
mod hit;
mod index;
mod surface;
mod svg;
mod types;

pub use error::SceneError;
pub use hit::{HitParams, HitScore, PreciseHitTest, hit_test_shape};
pub use index::{ReconcileStats, SceneIndex};
pub use surface::Surface;
pub use svg::{SvgDocument, SvgNumber, path_data};
pub use types::{ElementFlags, ElementId, ElementKind, HitShape};
