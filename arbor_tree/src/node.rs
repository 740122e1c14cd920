// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch/leaf node types and read-only tree queries.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use alloc::{format, vec};

/// A node of a decision tree.
///
/// Callers own the tree; renderers only ever read it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(from = "crate::raw::RawNode", into = "crate::raw::RawNode")
)]
pub enum TreeNode {
    /// An internal split, drawn with its label.
    Branch(Branch),
    /// A terminal node, drawn with its value.
    Leaf(Leaf),
}

/// An internal node: a labeled split with ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    /// Text shown for the split (for example `"f1>2"`).
    pub label: String,
    /// Fill proportion, nominally in `0.0..=1.0`.
    pub data: f64,
    /// Ordered children.
    pub children: Vec<TreeNode>,
}

/// A terminal node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaf {
    /// Scalar shown for the leaf; `None` renders as empty text.
    pub value: Option<f64>,
    /// Fill proportion, nominally in `0.0..=1.0`.
    pub data: f64,
}

impl From<Branch> for TreeNode {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

impl From<Leaf> for TreeNode {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl TreeNode {
    /// Create a branch node.
    pub fn branch(
        label: impl Into<String>,
        data: f64,
        children: impl IntoIterator<Item = Self>,
    ) -> Self {
        Self::Branch(Branch {
            label: label.into(),
            data,
            children: children.into_iter().collect(),
        })
    }

    /// Create a leaf node with a value.
    pub fn leaf(value: f64, data: f64) -> Self {
        Self::Leaf(Leaf {
            value: Some(value),
            data,
        })
    }

    /// Fill proportion of this node, exactly as supplied (not clamped).
    pub fn data(&self) -> f64 {
        match self {
            Self::Branch(b) => b.data,
            Self::Leaf(l) => l.data,
        }
    }

    /// Ordered children; empty for leaves.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Branch(b) => &b.children,
            Self::Leaf(_) => &[],
        }
    }

    /// Returns `true` when the node has no children.
    ///
    /// Having children is what makes a node a branch for layout purposes; a
    /// [`Branch`] built with an empty child list lays out as a leaf but keeps
    /// showing its label.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// The branch label, if this is a branch.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Branch(b) => Some(&b.label),
            Self::Leaf(_) => None,
        }
    }

    /// The leaf value, if this is a leaf with a value.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Branch(_) => None,
            Self::Leaf(l) => l.value,
        }
    }

    /// Text drawn for this node: the label of a branch, or the formatted value of a leaf.
    ///
    /// A leaf without a value yields an empty string.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Branch(b) => Cow::Borrowed(&b.label),
            Self::Leaf(Leaf { value: Some(v), .. }) => Cow::Owned(format_value(*v)),
            Self::Leaf(Leaf { value: None, .. }) => Cow::Borrowed(""),
        }
    }

    /// Depth of the subtree rooted here: a leaf is `1`, any other node is
    /// `1 + ` the deepest child.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1_usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children().iter().map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// Total number of nodes in the subtree rooted here.
    pub fn node_count(&self) -> usize {
        self.pre_order().count()
    }

    /// Depth-first pre-order traversal starting at this node.
    ///
    /// This is the order in which layout ids are assigned.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Pre-order iterator over a [`TreeNode`] subtree, created by [`TreeNode::pre_order`].
#[derive(Clone, Debug)]
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the first child is popped next.
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Format a leaf value for display.
///
/// Integral values print without a fractional part (`42.0` → `"42"`); other
/// values use the shortest representation that round-trips.
pub fn format_value(value: f64) -> String {
    format!("{value}")
}
