// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tidy-tree placement (Buchheim, Jünger and Leipert's linear-time refinement
//! of Walker's algorithm).
//!
//! 1. First walk (post-order): give every node a preliminary coordinate
//!    relative to its parent, pushing subtrees apart along their contours and
//!    spreading the shift over intermediate siblings.
//! 2. Second walk (pre-order): accumulate modifiers into final coordinates.
//! 3. Fit: translate and scale so the outermost nodes sit half a separation
//!    inside the extent, and spread levels evenly along the depth axis.
//!
//! Walkers are stored in visible pre-order behind a sentinel at index `0`
//! that acts as the parent of the root.

use alloc::{vec, vec::Vec};

use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::config::LayoutConfig;
use crate::tree::LayoutTree;
use crate::types::LayoutId;

const SENTINEL: usize = 0;
const ROOT: usize = 1;

#[derive(Clone, Debug)]
struct Walker {
    id: LayoutId,
    parent: usize,
    children: SmallVec<[usize; 2]>,
    /// Position among siblings.
    number: usize,
    level: u32,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    ancestor: usize,
    default_ancestor: Option<usize>,
    x: f64,
}

impl Walker {
    fn new(index: usize, id: LayoutId, parent: usize, number: usize, level: u32) -> Self {
        Self {
            id,
            parent,
            children: SmallVec::new(),
            number,
            level,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
            ancestor: index,
            default_ancestor: None,
            x: 0.0,
        }
    }
}

struct Tidy {
    walkers: Vec<Walker>,
    separation: f64,
}

/// Place every visible node of `tree`.
pub(crate) fn place(tree: &LayoutTree, config: &LayoutConfig) -> Vec<(LayoutId, Point)> {
    let mut tidy = Tidy::new(tree, config.effective_separation());
    tidy.first_walk_all();
    tidy.second_walk_all();
    tidy.fit(config.extent)
}

impl Tidy {
    fn new(tree: &LayoutTree, separation: f64) -> Self {
        let mut walkers = vec![Walker::new(SENTINEL, LayoutId::ROOT, SENTINEL, 0, 0)];
        let mut stack = vec![(LayoutId::ROOT, SENTINEL, 0_usize)];
        while let Some((id, parent, number)) = stack.pop() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let index = walkers.len();
            walkers.push(Walker::new(index, id, parent, number, node.level()));
            walkers[parent].children.push(index);
            for (n, &child) in node.children().iter().enumerate().rev() {
                stack.push((child, index, n));
            }
        }
        Self {
            walkers,
            separation,
        }
    }

    fn first_walk_all(&mut self) {
        // Mirrored pre-order (last child first), reversed, is a left-to-right post-order.
        let mut order = Vec::with_capacity(self.walkers.len());
        let mut stack = vec![ROOT];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.walkers[v].children.iter().copied());
        }
        for &v in order.iter().rev() {
            self.first_walk(v);
        }
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.walkers[v].parent;
        let number = self.walkers[v].number;
        let left = (number > 0).then(|| self.walkers[parent].children[number - 1]);
        let children = &self.walkers[v].children;
        let span = children.first().copied().zip(children.last().copied());

        if let Some((first, last)) = span {
            self.execute_shifts(v);
            let midpoint = (self.walkers[first].prelim + self.walkers[last].prelim) / 2.0;
            if let Some(left) = left {
                let prelim = self.walkers[left].prelim + self.separation;
                self.walkers[v].prelim = prelim;
                self.walkers[v].modifier = prelim - midpoint;
            } else {
                self.walkers[v].prelim = midpoint;
            }
        } else if let Some(left) = left {
            self.walkers[v].prelim = self.walkers[left].prelim + self.separation;
        }

        let ancestor = self.walkers[parent]
            .default_ancestor
            .unwrap_or(self.walkers[parent].children[0]);
        let ancestor = self.apportion(v, left, ancestor);
        self.walkers[parent].default_ancestor = Some(ancestor);
    }

    fn second_walk_all(&mut self) {
        self.walkers[SENTINEL].modifier = -self.walkers[ROOT].prelim;
        // Walkers are stored in pre-order, so parents are final before their children.
        for v in ROOT..self.walkers.len() {
            let parent_modifier = self.walkers[self.walkers[v].parent].modifier;
            let w = &mut self.walkers[v];
            w.x = w.prelim + parent_modifier;
            w.modifier += parent_modifier;
        }
    }

    fn fit(&self, extent: Size) -> Vec<(LayoutId, Point)> {
        let mut left = ROOT;
        let mut right = ROOT;
        let mut bottom = 0_u32;
        for v in ROOT..self.walkers.len() {
            let w = &self.walkers[v];
            if w.x < self.walkers[left].x {
                left = v;
            }
            if w.x > self.walkers[right].x {
                right = v;
            }
            bottom = bottom.max(w.level);
        }

        let s = if left == right {
            1.0
        } else {
            self.separation / 2.0
        };
        let tx = s - self.walkers[left].x;
        let kx = extent.height / (self.walkers[right].x + s + tx);
        let ky = extent.width / f64::from(bottom.max(1));

        self.walkers[ROOT..]
            .iter()
            .map(|w| (w.id, Point::new((w.x + tx) * kx, f64::from(w.level) * ky)))
            .collect()
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.walkers[v]
            .children
            .first()
            .copied()
            .or(self.walkers[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.walkers[v]
            .children
            .last()
            .copied()
            .or(self.walkers[v].thread)
    }

    fn next_ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.walkers[vim].ancestor;
        if self.walkers[candidate].parent == self.walkers[v].parent {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Sibling counts are far below 2^52."
        )]
        let subtrees = (self.walkers[wp].number - self.walkers[wm].number) as f64;
        let change = shift / subtrees;
        let wp = &mut self.walkers[wp];
        wp.change -= change;
        wp.shift += shift;
        wp.prelim += shift;
        wp.modifier += shift;
        self.walkers[wm].change += change;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.walkers[v].children.len()).rev() {
            let child = self.walkers[v].children[i];
            let w = &mut self.walkers[child];
            w.prelim += shift;
            w.modifier += shift;
            change += w.change;
            shift += w.shift + change;
        }
    }

    /// Push the subtree at `v` clear of the subtrees to its left and return
    /// the new default ancestor.
    fn apportion(&mut self, v: usize, left: Option<usize>, default_ancestor: usize) -> usize {
        let Some(left) = left else {
            return default_ancestor;
        };
        let mut default_ancestor = default_ancestor;
        let parent = self.walkers[v].parent;

        // i/o: inside/outside contour, p/m: right (v) / left subtree side.
        let mut vip = v;
        let mut vop = v;
        let mut vim = left;
        let mut vom = self.walkers[parent].children[0];
        let mut sip = self.walkers[vip].modifier;
        let mut sop = self.walkers[vop].modifier;
        let mut sim = self.walkers[vim].modifier;
        let mut som = self.walkers[vom].modifier;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vom = om;
            vop = op;
            self.walkers[vop].ancestor = v;

            let shift = self.walkers[vim].prelim + sim - self.walkers[vip].prelim - sip
                + self.separation;
            if shift > 0.0 {
                let ancestor = self.next_ancestor(vim, v, default_ancestor);
                self.move_subtree(ancestor, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.walkers[vim].modifier;
            sip += self.walkers[vip].modifier;
            som += self.walkers[vom].modifier;
            sop += self.walkers[vop].modifier;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im
            && self.next_right(vop).is_none()
        {
            self.walkers[vop].thread = Some(im);
            self.walkers[vop].modifier += sim - sop;
        }
        if let Some(ip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.walkers[vom].thread = Some(ip);
            self.walkers[vom].modifier += sip - som;
            default_ancestor = v;
        }
        default_ancestor
    }
}
