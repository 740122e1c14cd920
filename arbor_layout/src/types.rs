// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout tree: node identifiers, links, and node kinds.

use core::fmt;

/// Identifier of a node within one [`LayoutTree`](crate::LayoutTree).
///
/// Ids are assigned in depth-first pre-order when the tree is built (the root
/// is `0`) and never change while that tree lives, whatever is collapsed or
/// expanded in the meantime. They are not meaningful across trees.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LayoutId(u32);

impl LayoutId {
    /// The root of every layout tree.
    pub const ROOT: Self = Self(0);

    /// Wrap a raw pre-order index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw pre-order index.
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A visible parent→child edge.
///
/// Links are identified by both endpoints; the [`Display`](fmt::Display) form
/// is `"{source}_{target}"`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Link {
    /// The parent end.
    pub source: LayoutId,
    /// The child end.
    pub target: LayoutId,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.source, self.target)
    }
}

/// Whether a node splits (has children in the full tree) or terminates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Has at least one child, collapsed or not.
    Branch,
    /// Has no children.
    Leaf,
}
