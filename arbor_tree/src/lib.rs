// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Tree: the input data model for decision-tree diagrams.
//!
//! A decision tree arrives as a rooted hierarchy of nodes. Each node carries a
//! fill proportion (`data`, nominally in `0.0..=1.0`) and is either
//!
//! - a [`Branch`]: a split with a text label and one or more children, or
//! - a [`Leaf`]: a terminal node showing a scalar value.
//!
//! The variant is decided when the node is constructed (or decoded) rather
//! than inferred from which fields happen to be present when it is drawn.
//! Layout and rendering live in other crates; this one only describes the
//! shape of the input and a few read-only queries over it.
//!
//! ```rust
//! use arbor_tree::TreeNode;
//!
//! let tree = TreeNode::branch(
//!     "f1>2",
//!     1.0,
//!     [
//!         TreeNode::leaf(51.0, 0.1),
//!         TreeNode::branch("f1>2", 0.9, [TreeNode::leaf(1.0, 0.8), TreeNode::leaf(2.0, 0.1)]),
//!     ],
//! );
//!
//! assert_eq!(tree.depth(), 3);
//! assert_eq!(tree.node_count(), 5);
//! assert_eq!(tree.children()[0].display_text(), "51");
//! ```
//!
//! ## Payloads
//!
//! With the `serde` feature, [`TreeNode`] deserializes from the camelCase
//! record `{ label, data, value, children }` that notebook hosts emit. The
//! `json` feature (on by default) adds [`from_json`] and [`from_json_slice`].
//! Decoding never rejects a structurally odd node: a record with a non-empty
//! `children` array is a branch, anything else is a leaf, and missing text
//! fields simply render as empty strings.
//!
//! This crate is `no_std` and uses `alloc` unless the `json` feature is enabled.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "json")]
mod json;
mod node;
#[cfg(feature = "serde")]
mod raw;

#[cfg(feature = "json")]
pub use json::{DecodeError, from_json, from_json_slice};
pub use node::{Branch, Leaf, PreOrder, TreeNode, format_value};
