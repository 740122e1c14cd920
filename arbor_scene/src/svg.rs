// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained SVG document: element arena, queries, hit testing, serialization.

use std::fmt::{self, Write as _};

use kurbo::{Affine, BezPath, PathEl, Point};
use smallvec::SmallVec;

use crate::error::SceneError;
use crate::hit::{HitParams, HitScore, PreciseHitTest};
use crate::surface::Surface;
use crate::types::{ElementFlags, ElementId, ElementKind, HitShape};

/// In-memory SVG document implementing [`Surface`].
///
/// Elements live in a generational arena: removing an element frees its slot
/// for reuse, and handles to the removed element go stale. The document keeps
/// a [`revision`](SvgDocument::revision) counter that advances on every
/// mutation that actually changes something, which makes "nothing changed"
/// observable.
///
/// ## Example
///
/// ```rust
/// use arbor_scene::{ElementKind, Surface, SvgDocument};
/// use kurbo::Affine;
///
/// let mut doc = SvgDocument::new();
/// let group = doc.create(doc.root(), ElementKind::Group).unwrap();
/// doc.set_transform(group, Affine::translate((180.0, 20.0))).unwrap();
/// let dot = doc.create(group, ElementKind::Circle).unwrap();
/// doc.set_attr(dot, "r", "10").unwrap();
///
/// assert_eq!(
///     doc.to_svg_string(),
///     r#"<svg xmlns="http://www.w3.org/2000/svg"><g transform="translate(180,20)"><circle r="10"/></g></svg>"#
/// );
/// ```
pub struct SvgDocument {
    /// slots
    elements: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
    revision: u64,
    hit_params: HitParams,
}

impl fmt::Debug for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgDocument")
            .field("elements_total", &self.elements.len())
            .field("elements_alive", &self.element_count())
            .field("free_list", &self.free_list.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    kind: ElementKind,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
    attrs: SmallVec<[(String, String); 4]>,
    text: Option<String>,
    transform: Affine,
    flags: ElementFlags,
    hit_shape: Option<HitShape>,
}

impl Element {
    fn new(generation: u32, kind: ElementKind, parent: Option<ElementId>) -> Self {
        Self {
            generation,
            kind,
            parent,
            children: SmallVec::new(),
            attrs: SmallVec::new(),
            text: None,
            transform: Affine::IDENTITY,
            flags: ElementFlags::default(),
            hit_shape: None,
        }
    }
}

impl SvgDocument {
    /// Create a document holding only its root container.
    pub fn new() -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 1),
            revision: 0,
            hit_params: HitParams::default(),
        };
        doc.root = doc.allocate(ElementKind::Group, None);
        doc.revision = 0;
        doc
    }

    /// Set the parameters used by [`Surface::hit_test`].
    pub fn set_hit_params(&mut self, params: HitParams) {
        self.hit_params = params;
    }

    /// Number of live elements, root included.
    pub fn element_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_some()).count()
    }

    /// Counter advanced by every effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Kind of a live element.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.get(id).map(|e| e.kind)
    }

    /// Value of an attribute of a live element.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Text content of a live element.
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id)?.text.as_deref()
    }

    /// Local transform of a live element.
    pub fn transform(&self, id: ElementId) -> Option<Affine> {
        self.get(id).map(|e| e.transform)
    }

    /// Flags of a live element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.get(id).map(|e| e.flags)
    }

    /// Hit shape of a live element.
    pub fn hit_shape(&self, id: ElementId) -> Option<&HitShape> {
        self.get(id)?.hit_shape.as_ref()
    }

    /// Parent of a live element; `None` for the root and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent
    }

    /// Children of a live element in paint order, or an empty slice.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// Transform from the element's local space to root space.
    pub fn world_transform(&self, id: ElementId) -> Option<Affine> {
        let mut element = self.get(id)?;
        let mut transform = element.transform;
        while let Some(parent) = element.parent {
            element = self.get(parent)?;
            transform = element.transform * transform;
        }
        Some(transform)
    }

    /// Live elements of the subtree rooted at `id`, in paint (pre-)order.
    pub fn descendants(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack: Vec<ElementId> = Vec::new();
        if self.is_alive(id) {
            stack.push(id);
        }
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children_of(id).iter().rev().copied());
            Some(id)
        })
    }

    /// Serialize the document to SVG markup.
    ///
    /// Output is deterministic: attributes appear in the order they were first
    /// set and elements in paint order.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_svg(&mut out);
        out
    }

    /// Write the document's SVG markup into `out`.
    pub fn write_svg(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.write_element(out, self.root, "svg")
    }

    fn write_element(&self, out: &mut impl fmt::Write, id: ElementId, tag: &str) -> fmt::Result {
        let Some(element) = self.get(id) else {
            return Ok(());
        };
        out.write_char('<')?;
        out.write_str(tag)?;
        if id == self.root {
            out.write_str(r#" xmlns="http://www.w3.org/2000/svg""#)?;
        }
        for (name, value) in &element.attrs {
            write!(out, r#" {name}="{}""#, Escaped(value))?;
        }
        if element.transform != Affine::IDENTITY {
            write!(out, r#" transform="{}""#, TransformAttr(element.transform))?;
        }
        if !element.flags.contains(ElementFlags::VISIBLE) {
            out.write_str(r#" display="none""#)?;
        }
        if element.children.is_empty() && element.text.is_none() {
            return out.write_str("/>");
        }
        out.write_char('>')?;
        if let Some(text) = &element.text {
            write!(out, "{}", Escaped(text))?;
        }
        for &child in &element.children {
            let kind = self.get(child).map_or(ElementKind::Group, |c| c.kind);
            self.write_element(out, child, kind.tag())?;
        }
        write!(out, "</{tag}>")
    }

    // --- internals ---

    fn allocate(&mut self, kind: ElementKind, parent: Option<ElementId>) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(Element::new(generation, kind, parent));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(Element::new(generation, kind, parent)));
            self.generations.push(generation);
            (self.elements.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices."
        )]
        let id = ElementId::new(idx as u32, generation);
        self.revision += 1;
        id
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .get(id.idx())?
            .as_ref()
            .filter(|e| e.generation == id.1)
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, SceneError> {
        self.elements
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|e| e.generation == id.1)
            .ok_or(SceneError::StaleElement(id))
    }
}

impl Surface for SvgDocument {
    fn root(&self) -> ElementId {
        self.root
    }

    fn create(&mut self, parent: ElementId, kind: ElementKind) -> Result<ElementId, SceneError> {
        let parent_kind = self.get_mut(parent)?.kind;
        if !parent_kind.is_container() {
            return Err(SceneError::NotAContainer {
                id: parent,
                kind: parent_kind,
            });
        }
        let id = self.allocate(kind, Some(parent));
        self.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn set_attr(&mut self, id: ElementId, name: &str, value: &str) -> Result<(), SceneError> {
        let element = self.get_mut(id)?;
        if let Some(pos) = element.attrs.iter().position(|(n, _)| n == name) {
            let old = &mut element.attrs[pos].1;
            if *old == value {
                return Ok(());
            }
            old.clear();
            old.push_str(value);
        } else {
            element.attrs.push((name.into(), value.into()));
        }
        self.revision += 1;
        Ok(())
    }

    fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), SceneError> {
        let element = self.get_mut(id)?;
        if element.text.as_deref() == Some(text) {
            return Ok(());
        }
        element.text = Some(text.into());
        self.revision += 1;
        Ok(())
    }

    fn set_transform(&mut self, id: ElementId, transform: Affine) -> Result<(), SceneError> {
        let element = self.get_mut(id)?;
        if element.transform != transform {
            element.transform = transform;
            self.revision += 1;
        }
        Ok(())
    }

    fn set_flags(&mut self, id: ElementId, flags: ElementFlags) -> Result<(), SceneError> {
        let element = self.get_mut(id)?;
        if element.flags != flags {
            element.flags = flags;
            self.revision += 1;
        }
        Ok(())
    }

    fn set_hit_shape(&mut self, id: ElementId, shape: Option<HitShape>) -> Result<(), SceneError> {
        let element = self.get_mut(id)?;
        if element.hit_shape != shape {
            element.hit_shape = shape;
            self.revision += 1;
        }
        Ok(())
    }

    fn remove(&mut self, id: ElementId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RemoveRoot);
        }
        let parent = self.get_mut(id)?.parent;
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.elements[id.idx()].take() {
                stack.extend(element.children);
                self.free_list.push(id.idx());
            }
        }
        self.revision += 1;
        Ok(())
    }

    fn is_alive(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Among elements whose shape contains the point, the closest hit wins;
    /// on equal distance the one painted last (topmost) wins.
    fn hit_test(&self, point: Point) -> Option<ElementId> {
        let mut best: Option<(ElementId, HitScore)> = None;
        let mut stack = vec![(self.root, Affine::IDENTITY)];
        while let Some((id, parent_tf)) = stack.pop() {
            let Some(element) = self.get(id) else {
                continue;
            };
            if !element.flags.contains(ElementFlags::VISIBLE) {
                continue;
            }
            let world = parent_tf * element.transform;
            if element.flags.contains(ElementFlags::PICKABLE)
                && let Some(shape) = &element.hit_shape
                && let Some(score) = shape.hit_test_local(world.inverse() * point, &self.hit_params)
                && best.is_none_or(|(_, b)| score.cmp_distance(&b).is_le())
            {
                best = Some((id, score));
            }
            for &child in element.children.iter().rev() {
                stack.push((child, world));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Number formatting used for SVG attributes.
///
/// Rounds to three decimals and prints the shortest form (`180`, `0.5`,
/// `253.333`); negative zero prints as `0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgNumber(pub f64);

impl fmt::Display for SvgNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        if rounded == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{rounded}")
        }
    }
}

/// SVG path data for `path`, numbers formatted with [`SvgNumber`].
///
/// ```rust
/// use arbor_scene::path_data;
/// use kurbo::BezPath;
///
/// let mut path = BezPath::new();
/// path.move_to((540.0, 380.0));
/// path.curve_to((150.0, 380.0), (150.0, 190.0), (100.0, 190.0));
/// assert_eq!(path_data(&path), "M540,380C150,380 150,190 100,190");
/// ```
pub fn path_data(path: &BezPath) -> String {
    fn pt(out: &mut String, p: Point) {
        let _ = write!(out, "{},{}", SvgNumber(p.x), SvgNumber(p.y));
    }
    let mut out = String::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.push('M');
                pt(&mut out, p);
            }
            PathEl::LineTo(p) => {
                out.push('L');
                pt(&mut out, p);
            }
            PathEl::QuadTo(a, b) => {
                out.push('Q');
                pt(&mut out, a);
                out.push(' ');
                pt(&mut out, b);
            }
            PathEl::CurveTo(a, b, c) => {
                out.push('C');
                pt(&mut out, a);
                out.push(' ');
                pt(&mut out, b);
                out.push(' ');
                pt(&mut out, c);
            }
            PathEl::ClosePath => out.push('Z'),
        }
    }
    out
}

struct TransformAttr(Affine);

impl fmt::Display for TransformAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0.as_coeffs();
        if b == 0.0 && c == 0.0 && a == d {
            write!(f, "translate({},{})", SvgNumber(e), SvgNumber(g))?;
            if a != 1.0 {
                write!(f, " scale({})", SvgNumber(a))?;
            }
            Ok(())
        } else {
            write!(
                f,
                "matrix({} {} {} {} {} {})",
                SvgNumber(a),
                SvgNumber(b),
                SvgNumber(c),
                SvgNumber(d),
                SvgNumber(e),
                SvgNumber(g)
            )
        }
    }
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                _ => f.write_char(ch)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Circle, Rect};

    fn pickable() -> ElementFlags {
        ElementFlags::VISIBLE | ElementFlags::PICKABLE
    }

    #[test]
    fn liveness_create_remove_reuse() {
        let mut doc = SvgDocument::new();
        let root = doc.root();
        let a = doc.create(root, ElementKind::Group).unwrap();
        let child = doc.create(a, ElementKind::Path).unwrap();
        assert!(doc.is_alive(a));
        assert_eq!(doc.element_count(), 3);

        doc.remove(a).unwrap();
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(child), "subtree goes stale with its root");
        assert!(doc.children_of(root).is_empty());

        let b = doc.create(root, ElementKind::Text).unwrap();
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn stale_and_structural_errors() {
        let mut doc = SvgDocument::new();
        let root = doc.root();
        let text = doc.create(root, ElementKind::Text).unwrap();
        assert_eq!(
            doc.create(text, ElementKind::Path),
            Err(SceneError::NotAContainer {
                id: text,
                kind: ElementKind::Text
            })
        );
        assert_eq!(doc.remove(root), Err(SceneError::RemoveRoot));
        doc.remove(text).unwrap();
        assert_eq!(
            doc.set_text(text, "x"),
            Err(SceneError::StaleElement(text))
        );
        assert_eq!(doc.remove(text), Err(SceneError::StaleElement(text)));
    }

    #[test]
    fn unchanged_values_do_not_bump_revision() {
        let mut doc = SvgDocument::new();
        let path = doc.create(doc.root(), ElementKind::Path).unwrap();
        doc.set_attr(path, "d", "M0,0").unwrap();
        doc.set_transform(path, Affine::translate((1.0, 2.0))).unwrap();
        let rev = doc.revision();

        doc.set_attr(path, "d", "M0,0").unwrap();
        doc.set_transform(path, Affine::translate((1.0, 2.0))).unwrap();
        doc.set_flags(path, ElementFlags::VISIBLE).unwrap();
        doc.set_hit_shape(path, None).unwrap();
        assert_eq!(doc.revision(), rev);

        doc.set_attr(path, "d", "M1,1").unwrap();
        assert!(doc.revision() > rev);
        assert_eq!(doc.attr(path, "d"), Some("M1,1"));
    }

    #[test]
    fn hit_test_respects_transforms_and_flags() {
        let mut doc = SvgDocument::new();
        let group = doc.create(doc.root(), ElementKind::Group).unwrap();
        doc.set_transform(group, Affine::translate((100.0, 50.0)))
            .unwrap();
        let dot = doc.create(group, ElementKind::Circle).unwrap();
        doc.set_transform(dot, Affine::translate((50.0, 0.0))).unwrap();
        doc.set_hit_shape(dot, Some(Circle::new((0.0, 0.0), 10.0).into()))
            .unwrap();

        // Not pickable yet.
        assert_eq!(doc.hit_test(Point::new(150.0, 50.0)), None);

        doc.set_flags(dot, pickable()).unwrap();
        assert_eq!(doc.hit_test(Point::new(150.0, 50.0)), Some(dot));
        assert_eq!(doc.hit_test(Point::new(155.0, 55.0)), Some(dot));
        assert_eq!(doc.hit_test(Point::new(165.0, 50.0)), None);

        // Hiding an ancestor hides the subtree from picking.
        doc.set_flags(group, ElementFlags::empty()).unwrap();
        assert_eq!(doc.hit_test(Point::new(150.0, 50.0)), None);
    }

    #[test]
    fn topmost_wins_on_overlap() {
        let mut doc = SvgDocument::new();
        let root = doc.root();
        let under = doc.create(root, ElementKind::Path).unwrap();
        let over = doc.create(root, ElementKind::Path).unwrap();
        for id in [under, over] {
            doc.set_hit_shape(id, Some(Rect::new(0.0, 0.0, 10.0, 10.0).into()))
                .unwrap();
            doc.set_flags(id, pickable()).unwrap();
        }
        assert_eq!(doc.hit_test(Point::new(5.0, 5.0)), Some(over));
    }

    #[test]
    fn tolerant_hits_prefer_closest() {
        let mut doc = SvgDocument::new();
        doc.set_hit_params(HitParams {
            fill_tolerance: 5.0,
        });
        let root = doc.root();
        let near = doc.create(root, ElementKind::Circle).unwrap();
        let far = doc.create(root, ElementKind::Circle).unwrap();
        doc.set_hit_shape(near, Some(Circle::new((0.0, 0.0), 10.0).into()))
            .unwrap();
        doc.set_hit_shape(far, Some(Circle::new((22.0, 0.0), 10.0).into()))
            .unwrap();
        doc.set_flags(near, pickable()).unwrap();
        doc.set_flags(far, pickable()).unwrap();
        assert_eq!(doc.hit_test(Point::new(10.5, 0.0)), Some(near));
    }

    #[test]
    fn serialization_is_deterministic_and_escaped() {
        let build = || {
            let mut doc = SvgDocument::new();
            let root = doc.root();
            doc.set_attr(root, "width", "900").unwrap();
            let g = doc.create(root, ElementKind::Group).unwrap();
            doc.set_transform(g, Affine::translate((10.0, 20.0)) * Affine::scale(2.0))
                .unwrap();
            let t = doc.create(g, ElementKind::Text).unwrap();
            doc.set_attr(t, "dy", "0.31em").unwrap();
            doc.set_text(t, "f1<2 & \"x\"").unwrap();
            let hidden = doc.create(g, ElementKind::Path).unwrap();
            doc.set_flags(hidden, ElementFlags::empty()).unwrap();
            doc
        };
        let a = build().to_svg_string();
        assert_eq!(a, build().to_svg_string());
        assert_eq!(
            a,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="900">"#,
                r#"<g transform="translate(10,20) scale(2)">"#,
                r#"<text dy="0.31em">f1&lt;2 &amp; &quot;x&quot;</text>"#,
                r#"<path display="none"/>"#,
                "</g></svg>"
            )
        );
    }

    #[test]
    fn world_transform_and_descendants() {
        let mut doc = SvgDocument::new();
        let root = doc.root();
        let a = doc.create(root, ElementKind::Group).unwrap();
        let b = doc.create(a, ElementKind::Group).unwrap();
        let c = doc.create(root, ElementKind::Circle).unwrap();
        doc.set_transform(a, Affine::translate((1.0, 0.0))).unwrap();
        doc.set_transform(b, Affine::translate((0.0, 2.0))).unwrap();
        assert_eq!(
            doc.world_transform(b),
            Some(Affine::translate((1.0, 2.0)))
        );
        let order: Vec<_> = doc.descendants(root).collect();
        assert_eq!(order, [root, a, b, c]);
        assert_eq!(doc.parent_of(b), Some(a));
        assert_eq!(doc.parent_of(root), None);
    }

    #[test]
    fn numbers_are_rounded_and_trimmed() {
        let s = |v| format!("{}", SvgNumber(v));
        assert_eq!(s(180.0), "180");
        assert_eq!(s(0.5), "0.5");
        assert_eq!(s(-0.0), "0");
        assert_eq!(s(760.0 / 3.0), "253.333");
        assert_eq!(s((1.0 - 0.9) * 100.0), "10");
    }

    #[test]
    fn general_transforms_use_matrix() {
        let tf = Affine::new([0.0, 1.0, -1.0, 0.0, 3.0, 4.0]);
        assert_eq!(
            format!("{}", TransformAttr(tf)),
            "matrix(0 1 -1 0 3 4)"
        );
    }
}
