// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Renderer: interactive decision-tree diagrams.
//!
//! [`TreeRenderer`] ties the workspace together. It lays a
//! [`TreeNode`](arbor_tree::TreeNode) out with [`arbor_layout`], draws it
//! through an [`arbor_scene::Surface`] (an [`SvgDocument`](arbor_scene::SvgDocument)
//! by default), and keeps it interactive with [`arbor_view`]:
//!
//! - Nodes are right-rounded blocks with a teal fill clipped to the node's
//!   `data` proportion, a label (branches) or value (leaves), and an expander
//!   dot on branches. Links are horizontal-tangent cubic curves.
//! - Redraws are reconciled: nodes are keyed by [`LayoutId`](arbor_layout::LayoutId)
//!   and links by [`Link`](arbor_layout::Link), so a collapse only removes and
//!   creates the elements whose nodes appeared or disappeared.
//! - Clicking an expander collapses or expands its node; dragging pans, the
//!   wheel zooms about the pointer, and a double click animates back to the
//!   home view.
//!
//! All sizes, colors, and thresholds live in [`RenderConfig`].
//!
//! ## Example
//!
//! ```rust
//! use arbor_renderer::{PickTarget, TreeRenderer};
//! use arbor_view::ClickResult;
//! use kurbo::Point;
//!
//! let mut renderer = TreeRenderer::new();
//! renderer.render_json(r#"{"label":"x>0","data":1.0,"children":[{"value":1,"data":0.3},{"value":2,"data":0.7}]}"#)?;
//!
//! // Empty canvas: a click changes nothing.
//! renderer.pointer_down(Point::new(1.0, 1.0), 0);
//! let result = renderer.pointer_up(Point::new(1.0, 1.0), 20)?;
//! assert_eq!(result, ClickResult::Click(PickTarget::Background));
//!
//! let svg = renderer.surface().to_svg_string();
//! assert!(svg.contains(r#"class="nodeLayer""#));
//! # Ok::<(), arbor_renderer::RenderError>(())
//! ```

mod config;
mod error;
pub mod glyph;
mod renderer;

pub use config::{Margins, Palette, RenderConfig};
pub use error::RenderError;
pub use renderer::{NodeGlyph, PickTarget, TreeRenderer, UpdateStats};
