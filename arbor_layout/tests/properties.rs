// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for layout invariants over generated trees.

use arbor_layout::{LayoutConfig, LayoutId, LayoutTree, layout};
use arbor_tree::TreeNode;
use proptest::prelude::*;

fn arb_tree() -> impl Strategy<Value = TreeNode> {
    let leaf = (0.0..100.0_f64, -0.5..1.5_f64).prop_map(|(v, d)| TreeNode::leaf(v.round(), d));
    leaf.prop_recursive(6, 64, 3, |inner| {
        (prop::collection::vec(inner, 1..4), 0.0..1.0_f64)
            .prop_map(|(children, d)| TreeNode::branch("split", d, children))
    })
}

fn subtree_depth(tree: &LayoutTree, id: LayoutId) -> usize {
    let node = tree.node(id).unwrap();
    1 + node
        .children()
        .iter()
        .chain(node.hidden_children())
        .map(|&c| subtree_depth(tree, c))
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn depth_matches_input(input in arb_tree()) {
        let tree = LayoutTree::build(&input);
        prop_assert_eq!(tree.max_depth(), input.depth());
        prop_assert_eq!(subtree_depth(&tree, LayoutId::ROOT), input.depth());
        prop_assert_eq!(tree.len(), input.node_count());
    }

    #[test]
    fn layout_is_repeatable(input in arb_tree()) {
        let config = LayoutConfig::for_depth(input.depth(), 180.0, 760.0);
        let a = layout(&input, &config);
        let b = layout(&input, &config);
        for (x, y) in a.nodes().zip(b.nodes()) {
            prop_assert_eq!(x.id(), y.id());
            prop_assert_eq!(x.parent(), y.parent());
            prop_assert_eq!(x.position(), y.position());
        }
    }

    #[test]
    fn ids_are_pre_order(input in arb_tree()) {
        let tree = LayoutTree::build(&input);
        let visible: Vec<_> = tree.visible().map(LayoutId::get).collect();
        let expected: Vec<u32> = (0..u32::try_from(tree.len()).unwrap()).collect();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn collapse_round_trip(input in arb_tree(), pick in any::<prop::sample::Index>()) {
        let mut tree = LayoutTree::build(&input);
        let branches: Vec<_> = tree.nodes().filter(|n| n.has_children()).map(|n| n.id()).collect();
        prop_assume!(!branches.is_empty());
        let id = branches[pick.index(branches.len())];
        let before = tree.node(id).unwrap().children().to_vec();

        prop_assert!(tree.toggle(id));
        prop_assert!(tree.node(id).unwrap().children().is_empty());
        prop_assert!(tree.toggle(id));
        prop_assert_eq!(tree.node(id).unwrap().children(), before.as_slice());
    }

    #[test]
    fn parents_centred_and_levels_disjoint(input in arb_tree()) {
        let tree = layout(&input, &LayoutConfig::for_depth(input.depth(), 180.0, 760.0));
        for node in tree.nodes() {
            let Some(p) = node.position() else { continue };
            prop_assert!(p.x >= 0.0 && p.x <= 760.0);
            if let (Some(first), Some(last)) = (node.children().first(), node.children().last()) {
                let a = tree.position(*first).unwrap();
                let b = tree.position(*last).unwrap();
                prop_assert!((p.x - (a.x + b.x) / 2.0).abs() < 1e-6);
                prop_assert!(a.y > p.y);
            }
        }
        let mut by_level: Vec<Vec<f64>> = vec![Vec::new(); tree.max_depth()];
        for node in tree.nodes() {
            by_level[node.level() as usize].push(node.position().unwrap().x);
        }
        for xs in &mut by_level {
            xs.sort_by(f64::total_cmp);
            for pair in xs.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }
    }

    #[test]
    fn collapsing_hides_exactly_the_subtree(input in arb_tree(), pick in any::<prop::sample::Index>()) {
        let mut tree = LayoutTree::build(&input);
        let branches: Vec<_> = tree.nodes().filter(|n| n.has_children()).map(|n| n.id()).collect();
        prop_assume!(!branches.is_empty());
        let id = branches[pick.index(branches.len())];
        tree.toggle(id);
        tree.layout(&LayoutConfig::default());
        for node in tree.nodes() {
            prop_assert_eq!(node.position().is_some(), tree.is_visible(node.id()));
        }
        let visible = tree.visible().count();
        prop_assert_eq!(tree.links().count(), visible - 1);
    }
}
