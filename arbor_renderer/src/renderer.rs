// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer session: render passes, reconciled updates, and input routing.

use std::fmt;

use arbor_layout::{LayoutId, LayoutNode, LayoutTree, Link, NodeKind};
use arbor_scene::{
    ElementFlags, ElementId, ElementKind, ReconcileStats, SceneIndex, Surface, SvgDocument,
    SvgNumber, path_data,
};
use arbor_tree::TreeNode;
use arbor_view::{ClickResult, ClickState, Navigator, ViewTransform, WheelDelta};
use hashbrown::HashMap;
use kurbo::{Point, Vec2};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::glyph;

/// What the pointer is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickTarget {
    /// Empty canvas, links, or node bodies.
    Background,
    /// The expander of a branch node.
    Expander(LayoutId),
}

/// Elements drawn for one visible node.
///
/// Children of `group` in paint order: `halo`, the expander group, `body`,
/// `fill`, `text`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeGlyph {
    /// Group positioned at the node.
    pub group: ElementId,
    /// White-stroked copy of the label drawn under branch labels.
    pub halo: Option<ElementId>,
    /// Expander group and its circle; only branches have one.
    pub expander: Option<(ElementId, ElementId)>,
    /// Block outline.
    pub body: ElementId,
    /// Proportional fill.
    pub fill: ElementId,
    /// Label or value text.
    pub text: ElementId,
}

/// Element counts of one [`TreeRenderer::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Link elements.
    pub links: ReconcileStats,
    /// Node glyphs.
    pub nodes: ReconcileStats,
}

#[derive(Clone, Copy, Debug)]
struct Scaffold {
    root_transform: ElementId,
    link_layer: ElementId,
    node_layer: ElementId,
}

/// Draws one decision tree onto a [`Surface`] and keeps it interactive.
///
/// A renderer owns its surface, the layout working copy of the last rendered
/// tree, the key → element indices used to reconcile redraws, and the view
/// and click state. Nothing is shared between renderers.
///
/// [`render`](Self::render) starts over with a new tree. Collapse changes go
/// through [`toggle`](Self::toggle) and friends, which re-layout and call
/// [`update`](Self::update); unchanged nodes and links keep their elements.
/// Pointer input is routed with [`pointer_down`](Self::pointer_down),
/// [`pointer_move`](Self::pointer_move), [`pointer_up`](Self::pointer_up),
/// and [`wheel`](Self::wheel); a running view reset advances with
/// [`tick`](Self::tick).
///
/// ```rust
/// use arbor_renderer::TreeRenderer;
/// use arbor_layout::LayoutId;
/// use arbor_tree::TreeNode;
///
/// let tree = TreeNode::branch("x>0", 1.0, [TreeNode::leaf(1.0, 0.25), TreeNode::leaf(2.0, 0.75)]);
/// let mut renderer = TreeRenderer::new();
/// let stats = renderer.render(&tree)?;
/// assert_eq!(stats.nodes.created, 3);
///
/// renderer.toggle(LayoutId::ROOT)?;
/// assert_eq!(renderer.layout().map(|t| t.visible().count()), Some(1));
/// assert!(renderer.surface().to_svg_string().starts_with("<svg"));
/// # Ok::<(), arbor_renderer::RenderError>(())
/// ```
pub struct TreeRenderer<S: Surface = SvgDocument> {
    surface: S,
    config: RenderConfig,
    scaffold: Option<Scaffold>,
    tree: Option<LayoutTree>,
    links: SceneIndex<Link, ElementId>,
    nodes: SceneIndex<LayoutId, NodeGlyph>,
    expanders: HashMap<ElementId, LayoutId>,
    navigator: Navigator,
    clicks: ClickState<PickTarget>,
    last_pointer: Option<Point>,
}

impl<S: Surface + fmt::Debug> fmt::Debug for TreeRenderer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeRenderer")
            .field("surface", &self.surface)
            .field("rendered", &self.tree.is_some())
            .field("links", &self.links.len())
            .field("nodes", &self.nodes.len())
            .field("view", &self.navigator.transform())
            .finish_non_exhaustive()
    }
}

impl TreeRenderer<SvgDocument> {
    /// Renderer drawing into a fresh [`SvgDocument`] with default settings.
    pub fn new() -> Self {
        Self::with_config(SvgDocument::new(), RenderConfig::default())
    }
}

impl Default for TreeRenderer<SvgDocument> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> TreeRenderer<S> {
    /// Renderer drawing into `surface`.
    ///
    /// Nothing is drawn until the first [`render`](Self::render).
    pub fn with_config(surface: S, config: RenderConfig) -> Self {
        let navigator = Navigator::new(config.navigator_config());
        let clicks = ClickState::with_config(config.click);
        Self {
            surface,
            config,
            scaffold: None,
            tree: None,
            links: SceneIndex::new(),
            nodes: SceneIndex::new(),
            expanders: HashMap::new(),
            navigator,
            clicks,
            last_pointer: None,
        }
    }

    /// The surface being drawn into.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    ///
    /// Removing elements the renderer drew makes later updates fail with
    /// [`SceneError::StaleElement`](arbor_scene::SceneError::StaleElement).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give up the renderer and keep the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Settings in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Layout of the last rendered tree.
    pub fn layout(&self) -> Option<&LayoutTree> {
        self.tree.as_ref()
    }

    /// Elements drawn for a visible node.
    pub fn glyph(&self, id: LayoutId) -> Option<&NodeGlyph> {
        self.nodes.get(&id)
    }

    /// Element drawn for a visible link.
    pub fn link_element(&self, link: Link) -> Option<ElementId> {
        self.links.get(&link).copied()
    }

    /// Group carrying the view transform, once the first render has run.
    pub fn root_transform(&self) -> Option<ElementId> {
        self.scaffold.map(|s| s.root_transform)
    }

    /// Current pan/zoom transform.
    pub fn view_transform(&self) -> ViewTransform {
        self.navigator.transform()
    }

    /// Whether a view reset is animating.
    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    /// Replace the displayed tree.
    ///
    /// Everything drawn for the previous tree is removed, layout ids are
    /// reassigned, collapse state starts fully expanded, and the view returns
    /// to its home transform. The layers are created on the first call only.
    pub fn render(&mut self, root: &TreeNode) -> Result<UpdateStats, RenderError> {
        let scaffold = self.scaffold()?;
        self.clear()?;

        let tree = LayoutTree::build(root);
        let size = self.config.svg_size(tree.max_depth());
        let svg = self.surface.root();
        self.surface
            .set_attr(svg, "width", &SvgNumber(size.width).to_string())?;
        self.surface
            .set_attr(svg, "height", &SvgNumber(size.height).to_string())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = tree.len(),
            depth = tree.max_depth(),
            width = size.width,
            "render"
        );
        self.tree = Some(tree);

        self.navigator = Navigator::new(self.config.navigator_config());
        self.clicks = ClickState::with_config(self.config.click);
        self.last_pointer = None;
        self.surface
            .set_transform(scaffold.root_transform, self.navigator.transform().to_affine())?;
        self.update()
    }

    /// Decode a JSON payload with [`arbor_tree::from_json`] and render it.
    pub fn render_json(&mut self, json: &str) -> Result<UpdateStats, RenderError> {
        let root = arbor_tree::from_json(json)?;
        self.render(&root)
    }

    /// Re-layout the current tree and reconcile the surface with it.
    ///
    /// Links are handled first, then nodes. Elements of links and nodes that
    /// are still visible are kept and only have their changing attributes
    /// rewritten; elements of hidden ones are removed; newly visible ones are
    /// created. Calling this twice in a row leaves the surface unchanged.
    pub fn update(&mut self) -> Result<UpdateStats, RenderError> {
        let Self {
            surface,
            config,
            scaffold,
            tree,
            links,
            nodes,
            expanders,
            ..
        } = self;
        let (Some(scaffold), Some(tree)) = (*scaffold, tree.as_mut()) else {
            return Err(RenderError::NotRendered);
        };
        let depth = tree.max_depth();
        tree.layout(&config.layout_config(depth));
        let tree: &LayoutTree = tree;

        links.begin();
        for link in tree.links() {
            let (Some(source), Some(target)) =
                (tree.position(link.source), tree.position(link.target))
            else {
                continue;
            };
            let (&mut element, _) = links.keep_or_create(link, || {
                let element = surface.create(scaffold.link_layer, ElementKind::Path)?;
                surface.set_attr(element, "data-link", &link.to_string())?;
                Ok::<_, RenderError>(element)
            })?;
            let d = path_data(&glyph::link_path(source, target, config));
            surface.set_attr(element, "d", &d)?;
        }
        for (_, element) in links.finish() {
            surface.remove(element)?;
        }

        nodes.begin();
        for id in tree.visible() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let Some(position) = node.position() else {
                continue;
            };
            let (glyph, created) = nodes.keep_or_create(id, || {
                NodeGlyph::create(surface, scaffold.node_layer, node, config)
            })?;
            if created && let Some((_, circle)) = glyph.expander {
                expanders.insert(circle, id);
            }
            glyph.update(surface, node, position, config)?;
        }
        for (_, glyph) in nodes.finish() {
            if let Some((_, circle)) = glyph.expander {
                expanders.remove(&circle);
            }
            surface.remove(glyph.group)?;
        }

        let stats = UpdateStats {
            links: links.stats(),
            nodes: nodes.stats(),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            links = links.len(),
            nodes = nodes.len(),
            created = stats.links.created + stats.nodes.created,
            removed = stats.links.removed + stats.nodes.removed,
            "update"
        );
        Ok(stats)
    }

    /// Collapse an expanded node or expand a collapsed one, then redraw.
    ///
    /// Returns `Ok(false)` for leaves and unknown ids; nothing is redrawn then.
    pub fn toggle(&mut self, id: LayoutId) -> Result<bool, RenderError> {
        let tree = self.tree.as_mut().ok_or(RenderError::NotRendered)?;
        if !tree.toggle(id) {
            return Ok(false);
        }
        self.update()?;
        Ok(true)
    }

    /// Set a node's collapse state explicitly, redrawing if it changed.
    pub fn set_collapsed(&mut self, id: LayoutId, collapsed: bool) -> Result<bool, RenderError> {
        let tree = self.tree.as_mut().ok_or(RenderError::NotRendered)?;
        if !tree.set_collapsed(id, collapsed) {
            return Ok(false);
        }
        self.update()?;
        Ok(true)
    }

    /// Collapse `id` and every branch below it, then redraw.
    pub fn collapse_subtree(&mut self, id: LayoutId) -> Result<UpdateStats, RenderError> {
        self.tree
            .as_mut()
            .ok_or(RenderError::NotRendered)?
            .collapse_subtree(id);
        self.update()
    }

    /// Expand `id` and every branch below it, then redraw.
    pub fn expand_subtree(&mut self, id: LayoutId) -> Result<UpdateStats, RenderError> {
        self.tree
            .as_mut()
            .ok_or(RenderError::NotRendered)?
            .expand_subtree(id);
        self.update()
    }

    /// What lies under `point` (surface coordinates).
    pub fn pick(&self, point: Point) -> PickTarget {
        self.surface
            .hit_test(point)
            .and_then(|element| self.expanders.get(&element))
            .map_or(PickTarget::Background, |&id| PickTarget::Expander(id))
    }

    /// A button went down at `point` at `now_ms`.
    pub fn pointer_down(&mut self, point: Point, now_ms: u64) -> PickTarget {
        let target = self.pick(point);
        self.clicks.on_down(target, point, now_ms);
        self.last_pointer = None;
        target
    }

    /// The pointer moved to `point`.
    ///
    /// Once a press has travelled past the click threshold the view pans with
    /// the pointer. Returns `Ok(true)` when the view moved.
    pub fn pointer_move(&mut self, point: Point) -> Result<bool, RenderError> {
        let Some(down) = self.clicks.press().map(|p| p.down_position) else {
            return Ok(false);
        };
        self.clicks.on_move(point);
        if !self.clicks.is_dragging() {
            return Ok(false);
        }
        let from = self.last_pointer.unwrap_or(down);
        self.last_pointer = Some(point);
        let delta: Vec2 = point - from;
        if delta == Vec2::ZERO {
            return Ok(false);
        }
        self.navigator.pan_by(delta);
        self.apply_view()?;
        Ok(true)
    }

    /// The button was released at `point` at `now_ms`.
    ///
    /// A click on an expander toggles its node. A double click anywhere
    /// starts the animated reset to the home view (the second click of a
    /// double click on an expander toggles it again, like any click).
    pub fn pointer_up(
        &mut self,
        point: Point,
        now_ms: u64,
    ) -> Result<ClickResult<PickTarget>, RenderError> {
        let target = self.pick(point);
        let result = self.clicks.on_up(&target, point, now_ms);
        self.last_pointer = None;
        match result {
            ClickResult::Click(PickTarget::Expander(id)) => {
                self.toggle(id)?;
            }
            ClickResult::DoubleClick(target) => {
                if let PickTarget::Expander(id) = target {
                    self.toggle(id)?;
                }
                self.reset_view(now_ms)?;
            }
            ClickResult::Click(PickTarget::Background) | ClickResult::Suppressed(_) => {}
        }
        Ok(result)
    }

    /// Abandon the current press without a click.
    pub fn pointer_cancel(&mut self) {
        self.clicks.cancel();
        self.last_pointer = None;
    }

    /// Zoom for a wheel event at `point`. Returns `Ok(true)` when the scale changed.
    pub fn wheel(&mut self, point: Point, delta: WheelDelta) -> Result<bool, RenderError> {
        if !self.navigator.wheel(point, delta) {
            return Ok(false);
        }
        self.apply_view()?;
        Ok(true)
    }

    /// Pan the view by `delta` surface units.
    pub fn pan_by(&mut self, delta: Vec2) -> Result<(), RenderError> {
        self.navigator.pan_by(delta);
        self.apply_view()
    }

    /// Multiply the scale by `factor` about `anchor`.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> Result<bool, RenderError> {
        if !self.navigator.zoom_about(anchor, factor) {
            return Ok(false);
        }
        self.apply_view()?;
        Ok(true)
    }

    /// Jump to `transform` (scale clamped).
    ///
    /// Returns `Ok(false)` and leaves the view alone when `transform` is not
    /// finite or its scale is not positive.
    pub fn set_view(&mut self, transform: ViewTransform) -> Result<bool, RenderError> {
        if !self.navigator.set_transform(transform) {
            return Ok(false);
        }
        self.apply_view()?;
        Ok(true)
    }

    /// Start the animated return to the home view at `now_ms`.
    pub fn reset_view(&mut self, now_ms: u64) -> Result<(), RenderError> {
        self.navigator.reset(now_ms);
        self.apply_view()
    }

    /// Advance a running view reset to `now_ms`.
    ///
    /// Returns `Ok(true)` when the view moved; `Ok(false)` once the reset has
    /// finished or when none is running.
    pub fn tick(&mut self, now_ms: u64) -> Result<bool, RenderError> {
        if !self.navigator.tick(now_ms) {
            return Ok(false);
        }
        self.apply_view()?;
        Ok(true)
    }

    fn apply_view(&mut self) -> Result<(), RenderError> {
        let scaffold = self.scaffold.ok_or(RenderError::NotRendered)?;
        self.surface
            .set_transform(scaffold.root_transform, self.navigator.transform().to_affine())?;
        Ok(())
    }

    /// Create the layers on first use.
    fn scaffold(&mut self) -> Result<Scaffold, RenderError> {
        if let Some(scaffold) = self.scaffold {
            return Ok(scaffold);
        }
        let palette = &self.config.palette;
        let surface = &mut self.surface;
        let svg = surface.root();
        let root_transform = surface.create(svg, ElementKind::Group)?;
        surface.set_attr(root_transform, "class", "rootTransform")?;

        let link_layer = surface.create(root_transform, ElementKind::Group)?;
        surface.set_attr(link_layer, "class", "linkLayer")?;
        surface.set_attr(link_layer, "fill", "none")?;
        surface.set_attr(link_layer, "stroke", &palette.link_stroke)?;
        surface.set_attr(
            link_layer,
            "stroke-opacity",
            &SvgNumber(palette.link_opacity).to_string(),
        )?;
        surface.set_attr(
            link_layer,
            "stroke-width",
            &SvgNumber(palette.link_width).to_string(),
        )?;

        let node_layer = surface.create(root_transform, ElementKind::Group)?;
        surface.set_attr(node_layer, "class", "nodeLayer")?;
        surface.set_attr(node_layer, "stroke-linejoin", "round")?;
        surface.set_attr(
            node_layer,
            "stroke-width",
            &SvgNumber(palette.node_stroke_width).to_string(),
        )?;

        let scaffold = Scaffold {
            root_transform,
            link_layer,
            node_layer,
        };
        self.scaffold = Some(scaffold);
        Ok(scaffold)
    }

    /// Remove everything drawn for the current tree.
    fn clear(&mut self) -> Result<(), RenderError> {
        for (_, element) in self.links.drain() {
            self.surface.remove(element)?;
        }
        for (_, glyph) in self.nodes.drain() {
            self.surface.remove(glyph.group)?;
        }
        self.expanders.clear();
        self.tree = None;
        Ok(())
    }
}

impl NodeGlyph {
    /// Build the elements for `node` under `layer` with their fixed attributes.
    fn create<S: Surface>(
        surface: &mut S,
        layer: ElementId,
        node: &LayoutNode,
        config: &RenderConfig,
    ) -> Result<Self, RenderError> {
        let palette = &config.palette;
        let branch = node.kind() == NodeKind::Branch;
        let group = surface.create(layer, ElementKind::Group)?;
        surface.set_attr(group, "data-node", &node.id().to_string())?;

        let halo = if branch {
            let halo = surface.create(group, ElementKind::Text)?;
            label_attrs(surface, halo, node)?;
            surface.set_attr(halo, "stroke", &palette.label_halo)?;
            Some(halo)
        } else {
            None
        };

        let expander = if node.has_children() {
            let dot = surface.create(group, ElementKind::Group)?;
            surface.set_transform(dot, glyph::expander_transform(config))?;
            let circle = surface.create(dot, ElementKind::Circle)?;
            surface.set_attr(circle, "r", &SvgNumber(config.dot_size).to_string())?;
            surface.set_hit_shape(circle, Some(glyph::expander_circle(config).into()))?;
            surface.set_flags(circle, ElementFlags::VISIBLE | ElementFlags::PICKABLE)?;
            Some((dot, circle))
        } else {
            None
        };

        let radius = config.corner_radius();
        let body = surface.create(group, ElementKind::Path)?;
        surface.set_attr(
            body,
            "d",
            &glyph::right_rounded_rect(glyph::body_rect(config), radius),
        )?;
        surface.set_attr(body, "fill", &palette.body_fill)?;
        surface.set_attr(body, "stroke", &palette.body_stroke)?;

        let fill = surface.create(group, ElementKind::Path)?;
        surface.set_attr(
            fill,
            "d",
            &glyph::right_rounded_rect(glyph::fill_rect(config), radius),
        )?;
        surface.set_attr(fill, "fill", &palette.data_fill)?;
        surface.set_attr(fill, "style", &glyph::fill_clip_style(node.data()))?;

        let text = surface.create(group, ElementKind::Text)?;
        label_attrs(surface, text, node)?;

        Ok(Self {
            group,
            halo,
            expander,
            body,
            fill,
            text,
        })
    }

    /// Write the attributes that follow layout and collapse state.
    fn update<S: Surface>(
        &self,
        surface: &mut S,
        node: &LayoutNode,
        position: Point,
        config: &RenderConfig,
    ) -> Result<(), RenderError> {
        surface.set_transform(self.group, glyph::node_transform(position, config))?;
        if let Some((_, circle)) = self.expander {
            let palette = &config.palette;
            let color = if node.is_collapsed() {
                &palette.expander_collapsed
            } else {
                &palette.expander_open
            };
            surface.set_attr(circle, "fill", color)?;
        }
        Ok(())
    }
}

fn label_attrs<S: Surface>(
    surface: &mut S,
    text: ElementId,
    node: &LayoutNode,
) -> Result<(), RenderError> {
    surface.set_attr(text, "class", "nodeText")?;
    surface.set_attr(text, "dy", "0.31em")?;
    surface.set_attr(text, "style", "user-select: none;")?;
    if node.kind() == NodeKind::Branch {
        surface.set_attr(text, "text-anchor", "end")?;
    }
    surface.set_text(text, node.text())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "label": "f1>2", "data": 1.0,
        "children": [
            { "value": 51, "data": 0.1 },
            { "label": "f1>2", "data": 0.9, "children": [
                { "value": 1, "data": 0.8 },
                { "value": 2, "data": 0.1 }
            ] }
        ]
    }"#;

    fn id(raw: u32) -> LayoutId {
        LayoutId::new(raw)
    }

    fn rendered() -> TreeRenderer {
        let mut renderer = TreeRenderer::new();
        renderer.render_json(SCENARIO).unwrap();
        renderer
    }

    /// Surface position of a node's expander centre.
    fn expander_point(renderer: &TreeRenderer, node: LayoutId) -> Point {
        let (_, circle) = renderer.glyph(node).unwrap().expander.unwrap();
        renderer.surface().world_transform(circle).unwrap() * Point::ZERO
    }

    #[test]
    fn end_to_end_scenario() {
        let renderer = rendered();
        let doc = renderer.surface();
        let scaffold = renderer.scaffold.unwrap();

        assert_eq!(doc.children_of(scaffold.node_layer).len(), 5);
        assert_eq!(doc.children_of(scaffold.link_layer).len(), 4);
        assert_eq!(doc.attr(doc.root(), "width"), Some("1297.5"));
        assert_eq!(doc.attr(doc.root(), "height"), Some("800"));
        assert_eq!(
            renderer.view_transform(),
            ViewTransform::translate(180.0, 20.0)
        );

        let tree = renderer.layout().unwrap();
        let link = Link {
            source: id(2),
            target: id(4),
        };
        let element = renderer.link_element(link).unwrap();
        assert_eq!(doc.attr(element, "data-link"), Some("2_4"));
        let expected = path_data(&glyph::link_path(
            tree.position(id(2)).unwrap(),
            tree.position(id(4)).unwrap(),
            renderer.config(),
        ));
        assert_eq!(doc.attr(element, "d"), Some(expected.as_str()));
    }

    #[test]
    fn second_update_changes_nothing() {
        let mut renderer = rendered();
        let revision = renderer.surface().revision();
        let count = renderer.surface().element_count();
        let stats = renderer.update().unwrap();
        assert_eq!(stats.links.created + stats.links.removed, 0);
        assert_eq!(stats.nodes.created + stats.nodes.removed, 0);
        assert_eq!(stats.nodes.kept, 5);
        assert_eq!(renderer.surface().revision(), revision);
        assert_eq!(renderer.surface().element_count(), count);
    }

    #[test]
    fn collapse_and_expand_keep_surviving_elements() {
        let mut renderer = rendered();
        let root = *renderer.glyph(id(0)).unwrap();
        let inner = *renderer.glyph(id(2)).unwrap();

        assert!(renderer.toggle(id(2)).unwrap());
        assert!(renderer.glyph(id(3)).is_none());
        assert!(renderer.glyph(id(4)).is_none());
        assert_eq!(renderer.surface().children_of(renderer.scaffold.unwrap().link_layer).len(), 2);
        assert_eq!(renderer.glyph(id(2)), Some(&inner));

        assert!(renderer.toggle(id(2)).unwrap());
        assert_eq!(renderer.glyph(id(0)), Some(&root));
        assert_eq!(renderer.glyph(id(2)), Some(&inner));
        assert!(renderer.glyph(id(3)).is_some());
        assert_eq!(renderer.layout().unwrap().links().count(), 4);
    }

    #[test]
    fn leaves_do_not_toggle() {
        let mut renderer = rendered();
        let revision = renderer.surface().revision();
        assert!(!renderer.toggle(id(1)).unwrap());
        assert_eq!(renderer.surface().revision(), revision);
        assert!(renderer.glyph(id(1)).unwrap().expander.is_none());
    }

    #[test]
    fn fill_clip_follows_data() {
        let tree = TreeNode::branch(
            "x",
            1.0,
            [
                TreeNode::leaf(1.0, 0.0),
                TreeNode::leaf(2.0, 0.5),
                TreeNode::leaf(3.0, 1.0),
            ],
        );
        let mut renderer = TreeRenderer::new();
        renderer.render(&tree).unwrap();
        let style = |raw| {
            let fill = renderer.glyph(id(raw)).unwrap().fill;
            renderer.surface().attr(fill, "style").map(str::to_owned)
        };
        assert_eq!(style(1).as_deref(), Some("clip-path: inset(0% 0% 0% 100%);"));
        assert_eq!(style(2).as_deref(), Some("clip-path: inset(0% 0% 0% 50%);"));
        assert_eq!(style(3).as_deref(), Some("clip-path: inset(0% 0% 0% 0%);"));
    }

    #[test]
    fn labels_halos_and_anchors() {
        let renderer = rendered();
        let doc = renderer.surface();

        let root = renderer.glyph(id(0)).unwrap();
        assert_eq!(doc.text(root.text), Some("f1>2"));
        assert_eq!(doc.attr(root.text, "text-anchor"), Some("end"));
        let halo = root.halo.unwrap();
        assert_eq!(doc.text(halo), Some("f1>2"));
        assert_eq!(doc.attr(halo, "stroke"), Some("white"));
        assert_eq!(doc.children_of(root.group)[0], halo);

        let leaf = renderer.glyph(id(1)).unwrap();
        assert_eq!(doc.text(leaf.text), Some("51"));
        assert_eq!(doc.attr(leaf.text, "text-anchor"), None);
        assert!(leaf.halo.is_none());
        assert_eq!(
            doc.children_of(leaf.group),
            [leaf.body, leaf.fill, leaf.text]
        );
    }

    #[test]
    fn expander_color_tracks_collapse() {
        let mut renderer = rendered();
        let (_, circle) = renderer.glyph(id(2)).unwrap().expander.unwrap();
        assert_eq!(renderer.surface().attr(circle, "fill"), Some("#555"));
        renderer.set_collapsed(id(2), true).unwrap();
        assert_eq!(renderer.surface().attr(circle, "fill"), Some("#999"));
        assert!(!renderer.set_collapsed(id(2), true).unwrap());
        renderer.set_collapsed(id(2), false).unwrap();
        assert_eq!(renderer.surface().attr(circle, "fill"), Some("#555"));
    }

    #[test]
    fn subtree_collapse_and_expand() {
        let mut renderer = rendered();
        let stats = renderer.collapse_subtree(LayoutId::ROOT).unwrap();
        assert_eq!(stats.nodes.removed, 4);
        assert_eq!(stats.links.removed, 4);
        renderer.toggle(LayoutId::ROOT).unwrap();
        assert!(renderer.glyph(id(3)).is_none(), "node 2 stays collapsed");
        let stats = renderer.expand_subtree(LayoutId::ROOT).unwrap();
        assert_eq!(stats.nodes.created, 2);
        assert_eq!(renderer.layout().unwrap().visible().count(), 5);
    }

    #[test]
    fn clicking_an_expander_toggles_its_node() {
        let mut renderer = rendered();
        let at = expander_point(&renderer, id(2));
        assert_eq!(renderer.pick(at), PickTarget::Expander(id(2)));

        assert_eq!(renderer.pointer_down(at, 1_000), PickTarget::Expander(id(2)));
        let result = renderer.pointer_up(at, 1_050).unwrap();
        assert_eq!(result, ClickResult::Click(PickTarget::Expander(id(2))));
        assert!(renderer.layout().unwrap().node(id(2)).unwrap().is_collapsed());
        assert!(renderer.glyph(id(3)).is_none());
    }

    #[test]
    fn background_click_does_nothing() {
        let mut renderer = rendered();
        let revision = renderer.surface().revision();
        renderer.pointer_down(Point::new(2.0, 2.0), 0);
        let result = renderer.pointer_up(Point::new(2.0, 2.0), 10).unwrap();
        assert_eq!(result, ClickResult::Click(PickTarget::Background));
        assert_eq!(renderer.surface().revision(), revision);
    }

    #[test]
    fn drag_pans_without_touching_layout() {
        let mut renderer = rendered();
        let before: Vec<_> = renderer
            .layout()
            .unwrap()
            .nodes()
            .map(LayoutNode::position)
            .collect();
        let at = expander_point(&renderer, id(0));

        renderer.pointer_down(at, 0);
        assert!(!renderer.pointer_move(at + Vec2::new(1.0, 0.0)).unwrap());
        assert!(renderer.pointer_move(at + Vec2::new(30.0, 0.0)).unwrap());
        assert!(renderer.pointer_move(at + Vec2::new(30.0, 15.0)).unwrap());
        let result = renderer
            .pointer_up(at + Vec2::new(30.0, 15.0), 100)
            .unwrap();
        assert_eq!(
            result,
            ClickResult::Suppressed(Some(PickTarget::Expander(id(0))))
        );

        assert_eq!(
            renderer.view_transform(),
            ViewTransform::translate(210.0, 35.0)
        );
        let root_transform = renderer.root_transform().unwrap();
        assert_eq!(
            renderer.surface().transform(root_transform),
            Some(ViewTransform::translate(210.0, 35.0).to_affine())
        );
        let after: Vec<_> = renderer
            .layout()
            .unwrap()
            .nodes()
            .map(LayoutNode::position)
            .collect();
        assert_eq!(before, after);
        assert!(!renderer.layout().unwrap().root().is_collapsed());
    }

    #[test]
    fn wheel_zooms_about_the_pointer() {
        let mut renderer = rendered();
        let anchor = Point::new(400.0, 300.0);
        let content = renderer.view_transform().invert(anchor);
        assert!(renderer.wheel(anchor, WheelDelta::Lines(-20.0)).unwrap());
        assert_eq!(renderer.view_transform().scale, 2.0);
        let after = renderer.view_transform().invert(anchor);
        assert!((after - content).hypot() < 1e-9);
    }

    #[test]
    fn invalid_zoom_leaves_the_view_alone() {
        let mut renderer = rendered();
        let revision = renderer.surface().revision();
        let anchor = Point::new(400.0, 300.0);
        assert!(!renderer.zoom_about(anchor, f64::NAN).unwrap());
        assert!(!renderer.zoom_about(anchor, -1.0).unwrap());
        assert!(!renderer.wheel(anchor, WheelDelta::Pixels(f64::INFINITY)).unwrap());
        assert!(
            !renderer
                .set_view(ViewTransform::new(Vec2::ZERO, f64::NAN))
                .unwrap()
        );
        assert_eq!(
            renderer.view_transform(),
            ViewTransform::translate(180.0, 20.0)
        );
        assert_eq!(renderer.surface().revision(), revision);
        assert!(!renderer.surface().to_svg_string().contains("NaN"));
    }

    #[test]
    fn inverted_scale_extent_still_zooms() {
        let config = RenderConfig {
            navigator: arbor_view::NavigatorConfig {
                scale_extent: (20.0, 0.05),
                ..Default::default()
            },
            ..RenderConfig::default()
        };
        let mut renderer = TreeRenderer::with_config(SvgDocument::new(), config);
        renderer.render_json(SCENARIO).unwrap();
        assert!(
            renderer
                .wheel(Point::new(10.0, 10.0), WheelDelta::Pages(-10.0))
                .unwrap()
        );
        assert_eq!(renderer.view_transform().scale, 20.0);
        assert!(
            renderer
                .set_view(ViewTransform::new(Vec2::ZERO, 0.001))
                .unwrap()
        );
        assert_eq!(renderer.view_transform().scale, 0.05);
    }

    #[test]
    fn double_click_resets_the_view() {
        let mut renderer = rendered();
        renderer.pan_by(Vec2::new(-200.0, 50.0)).unwrap();
        renderer.zoom_about(Point::new(10.0, 10.0), 2.0).unwrap();

        let at = Point::new(3.0, 3.0);
        renderer.pointer_down(at, 5_000);
        renderer.pointer_up(at, 5_020).unwrap();
        renderer.pointer_down(at, 5_200);
        let result = renderer.pointer_up(at, 5_220).unwrap();
        assert_eq!(result, ClickResult::DoubleClick(PickTarget::Background));
        assert!(renderer.is_animating());

        assert!(renderer.tick(5_600).unwrap());
        assert!(renderer.tick(5_970).unwrap());
        assert_eq!(
            renderer.view_transform(),
            ViewTransform::translate(180.0, 20.0)
        );
        assert!(!renderer.is_animating());
        assert!(!renderer.tick(6_000).unwrap());
    }

    #[test]
    fn render_starts_over() {
        let mut renderer = rendered();
        renderer.toggle(id(2)).unwrap();
        renderer.pan_by(Vec2::new(40.0, 40.0)).unwrap();
        let layers = renderer.scaffold.unwrap();

        let stats = renderer
            .render(&TreeNode::branch("a", 0.5, [TreeNode::leaf(7.0, 0.5)]))
            .unwrap();
        assert_eq!(stats.nodes.created, 2);
        assert_eq!(stats.links.created, 1);
        let scaffold = renderer.scaffold.unwrap();
        assert_eq!(scaffold.root_transform, layers.root_transform);
        assert_eq!(renderer.surface().children_of(scaffold.node_layer).len(), 2);
        assert_eq!(
            renderer.view_transform(),
            ViewTransform::translate(180.0, 20.0)
        );
        let doc = renderer.surface();
        assert_eq!(doc.attr(doc.root(), "width"), Some("965"));
        assert_eq!(doc.children_of(doc.root()), [scaffold.root_transform]);
    }

    #[test]
    fn operations_before_render_fail() {
        let mut renderer = TreeRenderer::new();
        assert!(matches!(renderer.update(), Err(RenderError::NotRendered)));
        assert!(matches!(
            renderer.toggle(LayoutId::ROOT),
            Err(RenderError::NotRendered)
        ));
        assert!(matches!(
            renderer.pan_by(Vec2::new(1.0, 0.0)),
            Err(RenderError::NotRendered)
        ));
        assert_eq!(renderer.pick(Point::ZERO), PickTarget::Background);
        assert!(!renderer.tick(0).unwrap());
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut renderer = TreeRenderer::new();
        assert!(matches!(
            renderer.render_json("{\"label\": "),
            Err(RenderError::Decode(_))
        ));
        assert!(renderer.layout().is_none());
    }

    #[test]
    fn renderers_are_independent() {
        let mut a = rendered();
        let b = rendered();
        a.toggle(LayoutId::ROOT).unwrap();
        a.pan_by(Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(b.layout().unwrap().visible().count(), 5);
        assert_eq!(b.view_transform(), ViewTransform::translate(180.0, 20.0));
        assert_eq!(
            b.surface().to_svg_string(),
            rendered().surface().to_svg_string()
        );
    }

    #[test]
    fn svg_output_has_layers_and_glyphs() {
        let svg = rendered().surface().to_svg_string();
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1297.5" height="800">"#
        ));
        assert!(svg.contains(r#"<g class="rootTransform" transform="translate(180,20)">"#));
        assert!(svg.contains(
            r##"<g class="linkLayer" fill="none" stroke="#555" stroke-opacity="0.4" stroke-width="1.5">"##
        ));
        assert!(svg.contains(
            r#"<path d="M-50,-30h85a15,15 0 0 1 15,15v30a15,15 0 0 1 -15,15h-85z" fill="white" stroke="black"/>"#
        ));
        assert!(svg.contains(r##"<circle r="10" fill="#555"/>"##));
        assert!(svg.contains("f1&gt;2"));
    }
}
