// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout tree: working copy of the input, collapse state, and queries.

use alloc::string::String;
use alloc::{vec, vec::Vec};
use core::mem;

use arbor_tree::TreeNode;
use kurbo::Point;
use smallvec::SmallVec;

use crate::config::LayoutConfig;
use crate::tidy;
use crate::types::{LayoutId, Link, NodeKind};

/// Child list; decision trees are mostly binary.
pub(crate) type ChildIds = SmallVec<[LayoutId; 2]>;

/// One node of a [`LayoutTree`].
#[derive(Clone, Debug)]
pub struct LayoutNode {
    id: LayoutId,
    parent: Option<LayoutId>,
    children: ChildIds,
    hidden_children: ChildIds,
    level: u32,
    position: Option<Point>,
    kind: NodeKind,
    text: String,
    data: f64,
}

impl LayoutNode {
    /// Stable pre-order id.
    pub fn id(&self) -> LayoutId {
        self.id
    }

    /// Parent id, `None` for the root.
    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Visible children, in input order. Empty while collapsed.
    pub fn children(&self) -> &[LayoutId] {
        &self.children
    }

    /// Children parked by a collapse, in input order. Empty while expanded.
    pub fn hidden_children(&self) -> &[LayoutId] {
        &self.hidden_children
    }

    /// Distance from the root (the root is level `0`).
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Position from the last [`LayoutTree::layout`] pass.
    ///
    /// `x` runs along the sibling axis and `y` along the depth axis. `None`
    /// when the node was hidden by a collapsed ancestor during that pass, or
    /// when no pass has run yet.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Branch or leaf, decided by the full (uncollapsed) tree.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Text to draw: the branch label or the formatted leaf value.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fill proportion, clamped to `0.0..=1.0` (NaN becomes `0.0`).
    pub fn data(&self) -> f64 {
        self.data
    }

    /// Whether this node's children are currently parked.
    pub fn is_collapsed(&self) -> bool {
        !self.hidden_children.is_empty()
    }

    /// Whether this node has children, collapsed or not.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty() || !self.hidden_children.is_empty()
    }
}

/// Clamp a fill proportion into `0.0..=1.0`.
///
/// Out-of-range input is not rejected: it is pinned to the nearest bound so
/// the fill never overflows its node.
pub fn clamp_data(data: f64) -> f64 {
    if data.is_nan() {
        0.0
    } else {
        data.clamp(0.0, 1.0)
    }
}

/// Renderer-owned working copy of a [`TreeNode`] hierarchy.
///
/// The tree copies the text and fill of every input node when it is built and
/// never touches the input again. Every node is present for the life of the
/// tree; collapsing only moves child lists between the visible and hidden
/// slots, so ids stay stable and a collapse followed by an expand restores the
/// exact same children.
///
/// Positions are only refreshed by [`LayoutTree::layout`]; call it after
/// changing collapse state and before reading positions.
///
/// ## Example
///
/// ```rust
/// use arbor_layout::{LayoutConfig, LayoutId, LayoutTree};
/// use arbor_tree::TreeNode;
///
/// let tree = TreeNode::branch("x>0", 1.0, [TreeNode::leaf(1.0, 0.5), TreeNode::leaf(2.0, 0.5)]);
/// let mut layout = LayoutTree::build(&tree);
/// layout.layout(&LayoutConfig::default());
/// assert_eq!(layout.visible().count(), 3);
///
/// layout.toggle(LayoutId::ROOT);
/// layout.layout(&LayoutConfig::default());
/// assert_eq!(layout.visible().count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    max_depth: usize,
    max_visible_level: u32,
}

impl LayoutTree {
    /// Copy `root` into a new layout tree, assigning pre-order ids.
    ///
    /// Every node starts expanded and unpositioned.
    pub fn build(root: &TreeNode) -> Self {
        let mut nodes: Vec<LayoutNode> = Vec::new();
        let mut max_depth = 0_usize;
        let mut stack: Vec<(&TreeNode, Option<LayoutId>, u32)> = vec![(root, None, 0)];

        while let Some((input, parent, level)) = stack.pop() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "LayoutId uses 32-bit indices."
            )]
            let id = LayoutId::new(nodes.len() as u32);
            let kind = if input.is_leaf() {
                NodeKind::Leaf
            } else {
                NodeKind::Branch
            };
            nodes.push(LayoutNode {
                id,
                parent,
                children: ChildIds::new(),
                hidden_children: ChildIds::new(),
                level,
                position: None,
                kind,
                text: input.display_text().into_owned(),
                data: clamp_data(input.data()),
            });
            if let Some(p) = parent {
                nodes[p.index()].children.push(id);
            }
            max_depth = max_depth.max(level as usize + 1);
            // Reversed so the first child is taken next and gets the next id.
            for child in input.children().iter().rev() {
                stack.push((child, Some(id), level + 1));
            }
        }

        Self {
            nodes,
            max_depth,
            max_visible_level: 0,
        }
    }

    /// Number of nodes, visible or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a layout tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node.
    pub fn root(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    /// Look up a node; `None` for ids that do not belong to this tree.
    pub fn node(&self, id: LayoutId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    /// All nodes in id (pre-order) order, including hidden ones.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> + '_ {
        self.nodes.iter()
    }

    /// Depth of the full tree: `1` for a lone leaf, `1 +` the deepest child otherwise.
    ///
    /// Collapse state does not affect this value.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Deepest level reached by the visible nodes in the last layout pass.
    pub fn max_visible_level(&self) -> u32 {
        self.max_visible_level
    }

    /// Position of a node from the last layout pass.
    pub fn position(&self, id: LayoutId) -> Option<Point> {
        self.node(id).and_then(LayoutNode::position)
    }

    /// Whether no ancestor of `id` is collapsed.
    pub fn is_visible(&self, id: LayoutId) -> bool {
        let Some(mut node) = self.node(id) else {
            return false;
        };
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.index()];
            if node.is_collapsed() {
                return false;
            }
        }
        true
    }

    /// Ids of visible nodes in pre-order.
    pub fn visible(&self) -> impl Iterator<Item = LayoutId> + '_ {
        let mut stack: Vec<LayoutId> = vec![LayoutId::ROOT];
        core::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
            Some(id)
        })
    }

    /// Visible parent→child edges, ordered by visible pre-order of the child.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.visible().filter_map(|target| {
            let source = self.nodes[target.index()].parent?;
            Some(Link { source, target })
        })
    }

    /// Flip a node between expanded and collapsed.
    ///
    /// Returns `false` (and changes nothing) for leaves and unknown ids.
    /// Descendants keep their own state.
    pub fn toggle(&mut self, id: LayoutId) -> bool {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return false;
        };
        let changed = if !node.children.is_empty() {
            node.hidden_children = mem::take(&mut node.children);
            true
        } else if !node.hidden_children.is_empty() {
            node.children = mem::take(&mut node.hidden_children);
            true
        } else {
            false
        };
        #[cfg(feature = "tracing")]
        {
            if changed {
                tracing::debug!(node = id.get(), collapsed = node.is_collapsed(), "toggled");
            }
        }
        changed
    }

    /// Collapse or expand a node explicitly.
    ///
    /// Returns `true` when the state changed.
    pub fn set_collapsed(&mut self, id: LayoutId, collapsed: bool) -> bool {
        match self.node(id) {
            Some(node) if node.is_collapsed() != collapsed => self.toggle(id),
            _ => false,
        }
    }

    /// Collapse a node and every branch below it.
    pub fn collapse_subtree(&mut self, id: LayoutId) {
        self.set_subtree_collapsed(id, true);
    }

    /// Expand a node and every branch below it.
    pub fn expand_subtree(&mut self, id: LayoutId) {
        self.set_subtree_collapsed(id, false);
    }

    fn set_subtree_collapsed(&mut self, id: LayoutId, collapsed: bool) {
        if self.node(id).is_none() {
            return;
        }
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            self.set_collapsed(id, collapsed);
            let node = &self.nodes[id.index()];
            stack.extend(node.children.iter().chain(&node.hidden_children).copied());
        }
    }

    /// Run a layout pass over the visible nodes.
    ///
    /// Positions of visible nodes are recomputed; hidden nodes lose theirs.
    /// The pass is deterministic: the same tree, collapse state, and config
    /// always yield the same coordinates.
    pub fn layout(&mut self, config: &LayoutConfig) {
        let placed = tidy::place(self, config);
        for node in &mut self.nodes {
            node.position = None;
        }
        let mut max_level = 0;
        for (id, point) in &placed {
            let node = &mut self.nodes[id.index()];
            node.position = Some(*point);
            max_level = max_level.max(node.level);
        }
        self.max_visible_level = max_level;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            visible = placed.len(),
            total = self.nodes.len(),
            max_level,
            "layout pass"
        );
    }
}

/// Build a [`LayoutTree`] for `root` and run one layout pass with `config`.
pub fn layout(root: &TreeNode, config: &LayoutConfig) -> LayoutTree {
    let mut tree = LayoutTree::build(root);
    tree.layout(config);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn scenario() -> TreeNode {
        TreeNode::branch(
            "f1>2",
            1.0,
            [
                TreeNode::leaf(51.0, 0.1),
                TreeNode::branch(
                    "f1>2",
                    0.9,
                    [TreeNode::leaf(1.0, 0.8), TreeNode::leaf(2.0, 0.1)],
                ),
            ],
        )
    }

    fn id(raw: u32) -> LayoutId {
        LayoutId::new(raw)
    }

    #[test]
    fn ids_follow_pre_order() {
        let tree = LayoutTree::build(&scenario());
        let texts: Vec<_> = tree.nodes().map(|n| (n.id().get(), n.text())).collect();
        assert_eq!(
            texts,
            [(0, "f1>2"), (1, "51"), (2, "f1>2"), (3, "1"), (4, "2")]
        );
        assert_eq!(tree.node(id(2)).unwrap().children(), [id(3), id(4)]);
        assert_eq!(tree.node(id(4)).unwrap().parent(), Some(id(2)));
    }

    #[test]
    fn end_to_end_scenario_shape() {
        let tree = layout(&scenario(), &LayoutConfig::default());
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.links().count(), 4);
        assert_eq!(tree.max_depth(), 3);
        let leaves: Vec<_> = tree
            .nodes()
            .filter(|n| n.level() == 2)
            .map(LayoutNode::id)
            .collect();
        assert_eq!(leaves, [id(3), id(4)]);
        assert_eq!(tree.node(id(2)).unwrap().level(), 1);
        assert_eq!(tree.node(id(3)).unwrap().kind(), NodeKind::Leaf);
        assert_eq!(tree.node(id(2)).unwrap().kind(), NodeKind::Branch);
    }

    #[test]
    fn rebuilding_assigns_identical_ids() {
        let input = scenario();
        let a = layout(&input, &LayoutConfig::default());
        let b = layout(&input, &LayoutConfig::default());
        let ids_a: Vec<_> = a.nodes().map(|n| (n.id(), n.parent(), n.position())).collect();
        let ids_b: Vec<_> = b.nodes().map(|n| (n.id(), n.parent(), n.position())).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn collapse_then_expand_restores_children() {
        let mut tree = LayoutTree::build(&scenario());
        let before: Vec<_> = tree.root().children().to_vec();

        assert!(tree.toggle(LayoutId::ROOT));
        assert!(tree.root().is_collapsed());
        assert!(tree.root().children().is_empty());
        assert_eq!(tree.root().hidden_children(), before.as_slice());

        assert!(tree.toggle(LayoutId::ROOT));
        assert!(!tree.root().is_collapsed());
        assert_eq!(tree.root().children(), before.as_slice());
    }

    #[test]
    fn toggling_preserves_descendant_state() {
        let mut tree = LayoutTree::build(&scenario());
        tree.toggle(id(2));
        tree.toggle(LayoutId::ROOT);
        tree.toggle(LayoutId::ROOT);
        assert!(tree.node(id(2)).unwrap().is_collapsed());
        assert!(tree.is_visible(id(2)));
        assert!(!tree.is_visible(id(3)));
        let visible: Vec<_> = tree.visible().collect();
        assert_eq!(visible, [id(0), id(1), id(2)]);
    }

    #[test]
    fn leaves_ignore_toggle() {
        let mut tree = LayoutTree::build(&scenario());
        assert!(!tree.toggle(id(1)));
        assert!(!tree.toggle(id(99)));
        assert!(!tree.node(id(1)).unwrap().has_children());
    }

    #[test]
    fn set_collapsed_is_idempotent() {
        let mut tree = LayoutTree::build(&scenario());
        assert!(tree.set_collapsed(id(2), true));
        assert!(!tree.set_collapsed(id(2), true));
        assert!(tree.set_collapsed(id(2), false));
        assert!(!tree.set_collapsed(id(2), false));
    }

    #[test]
    fn subtree_collapse_and_expand() {
        let mut tree = LayoutTree::build(&scenario());
        tree.collapse_subtree(LayoutId::ROOT);
        assert!(tree.root().is_collapsed());
        assert!(tree.node(id(2)).unwrap().is_collapsed());
        assert_eq!(tree.visible().count(), 1);

        tree.expand_subtree(LayoutId::ROOT);
        assert_eq!(tree.visible().count(), 5);
        assert!(tree.nodes().all(|n| !n.is_collapsed()));
    }

    #[test]
    fn hidden_nodes_lose_positions() {
        let mut tree = layout(&scenario(), &LayoutConfig::default());
        assert!(tree.position(id(3)).is_some());
        tree.toggle(id(2));
        tree.layout(&LayoutConfig::default());
        assert!(tree.position(id(3)).is_none());
        assert!(tree.position(id(2)).is_some());
        assert_eq!(tree.links().count(), 2);
        assert_eq!(tree.max_visible_level(), 1);
    }

    #[test]
    fn data_is_clamped() {
        let tree = LayoutTree::build(&TreeNode::branch(
            "x",
            1.7,
            [TreeNode::leaf(1.0, -0.2), TreeNode::leaf(2.0, f64::NAN)],
        ));
        let data: Vec<_> = tree.nodes().map(LayoutNode::data).collect();
        assert_eq!(data, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn working_copy_outlives_input() {
        let tree = {
            let input = scenario();
            LayoutTree::build(&input)
        };
        assert_eq!(tree.root().text(), "f1>2");
    }
}
