// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Layout: tidy-tree placement for decision-tree diagrams.
//!
//! This crate turns an [`arbor_tree::TreeNode`] into a [`LayoutTree`]: a
//! renderer-owned working copy with stable ids, per-node collapse state, and
//! coordinates for every visible node.
//!
//! - Ids are assigned once, in depth-first pre-order (the root is
//!   [`LayoutId::ROOT`]), and survive any number of collapse/expand cycles so
//!   a renderer can match old and new drawables by identity.
//! - Collapsing a node parks its child list; expanding restores the same list.
//!   Descendants keep their own state.
//! - Coordinates come from a tidy-tree pass (Buchheim/Walker): parents are
//!   centred over their children and sibling subtrees never overlap. Results
//!   are fitted into [`LayoutConfig::extent`].
//!
//! ## Axes
//!
//! Decision trees are drawn left to right. A node's `x` runs along the
//! sibling axis (drawn vertically) and its `y` along the depth axis (drawn
//! horizontally); renderers swap them when placing glyphs.
//!
//! ```rust
//! use arbor_layout::{LayoutConfig, LayoutId, layout};
//! use arbor_tree::TreeNode;
//!
//! let input = TreeNode::branch("f1>2", 1.0, [TreeNode::leaf(51.0, 0.1), TreeNode::leaf(3.0, 0.9)]);
//! let tree = layout(&input, &LayoutConfig::default());
//!
//! let root = tree.position(LayoutId::ROOT).unwrap();
//! let first = tree.position(LayoutId::new(1)).unwrap();
//! assert_eq!(root.y, 0.0);
//! assert!(first.y > root.y);
//! assert_eq!(tree.links().count(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod tidy;
mod tree;
mod types;

pub use config::LayoutConfig;
pub use tree::{LayoutNode, LayoutTree, clamp_data, layout};
pub use types::{LayoutId, Link, NodeKind};
