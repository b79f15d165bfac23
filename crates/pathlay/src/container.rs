//! Container operations: membership, derived geometry, connector partitioning and layout.

use indexmap::IndexMap;
use pathlay_graph::GraphModel;

use crate::content::{
    ConnectorId, Content, ContainerContent, ContainerKind, ContentBody, ContentId, Dirty,
    GeometryCache,
};
use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point, Sides, Vector, vector};
use crate::layout::GraphLayout;
use crate::strategy::{self, ContentStrategy, LayoutFrame, LayoutItem};

impl<G: GraphModel> GraphLayout<G> {
    pub fn content(&self, id: ContentId) -> Option<&Content> {
        self.contents.get(id.0)
    }

    pub fn container_content(&self, id: ContentId) -> Option<&ContainerContent> {
        self.contents.get(id.0).and_then(Content::as_container)
    }

    pub(crate) fn container_content_mut(&mut self, id: ContentId) -> Option<&mut ContainerContent> {
        self.contents.get_mut(id.0).and_then(Content::as_container_mut)
    }

    /// The container `id` is attached to.
    pub fn container_of(&self, id: ContentId) -> Option<ContentId> {
        self.contents.get(id.0).and_then(|c| c.container)
    }

    pub fn children(&self, container: ContentId) -> &[ContentId] {
        self.container_content(container)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn core(&self, container: ContentId) -> Option<ContentId> {
        self.container_content(container).and_then(|c| c.core)
    }

    pub fn strategy(&self, container: ContentId) -> Option<ContentStrategy> {
        self.container_content(container).map(|c| c.strategy)
    }

    pub fn container_kind(&self, container: ContentId) -> Option<ContainerKind> {
        self.container_content(container).map(|c| c.kind)
    }

    /// Creates an empty container attached to `parent`.
    pub fn create_container(
        &mut self,
        parent: ContentId,
        strategy: ContentStrategy,
        label: &str,
    ) -> Result<ContentId> {
        self.check_container(parent)?;
        let anchor = self.position(parent).unwrap_or_default();
        let id = ContentId(self.contents.insert(Content::container_of(ContainerContent::new(
            ContentStrategy::None,
            label.to_string(),
            anchor,
        ))));
        self.set_container(id, Some(parent));
        self.set_strategy(id, strategy)?;
        Ok(id)
    }

    /// Attaches `content` to `container`, detaching it from its previous container first.
    /// Already being a direct child is not an error; `as_core` is still honoured.
    pub fn add(&mut self, container: ContentId, content: ContentId, as_core: bool) -> Result<()> {
        self.check_container(container)?;
        if self.contents.get(content.0).is_none() {
            return Err(Error::UnknownContent(content));
        }
        if content == container || self.is_descendant(container, content) {
            return Err(Error::InvariantViolation(format!(
                "{content} cannot be moved inside itself ({container})"
            )));
        }
        if self.container_of(content) != Some(container) {
            self.set_container(content, Some(container));
        }
        if as_core {
            self.set_core(container, Some(content));
        }
        Ok(())
    }

    /// Detaches `content` from `container`. The content stays alive but unattached; the
    /// caller re-attaches or deletes it. Returns whether it was a child.
    pub fn remove(&mut self, container: ContentId, content: ContentId) -> Result<bool> {
        self.check_container(container)?;
        if self.container_of(content) != Some(container) {
            return Ok(false);
        }
        self.set_container(content, None);
        Ok(true)
    }

    /// The single mutator of container membership: detaches from the old container, then
    /// attaches to the new one (appended).
    pub(crate) fn set_container(&mut self, content: ContentId, new: Option<ContentId>) {
        let old = self.container_of(content);
        if old == new {
            return;
        }
        if let Some(old) = old
            && let Some(c) = self.container_content_mut(old)
        {
            c.children.retain(|&ch| ch != content);
            if c.core == Some(content) {
                c.core = None;
            }
        }
        self.invalidate_from(old, Dirty::ALL);

        if let Some(new) = new
            && let Some(c) = self.container_content_mut(new)
        {
            c.children.push(content);
        }
        if let Some(entry) = self.contents.get_mut(content.0) {
            entry.container = new;
        }
        self.invalidate_from(new, Dirty::ALL);
        // Midget status depends on the container.
        self.invalidate_content(content);
    }

    pub(crate) fn set_core(&mut self, container: ContentId, core: Option<ContentId>) {
        if let Some(c) = self.container_content_mut(container) {
            c.core = core;
        }
        self.invalidate_from(Some(container), Dirty::ALL);
    }

    /// Moves `child` (already attached to `container`) to position `index` among its siblings.
    pub(crate) fn reorder_child(&mut self, container: ContentId, child: ContentId, index: usize) {
        if let Some(c) = self.container_content_mut(container)
            && let Some(at) = c.children.iter().position(|&ch| ch == child)
        {
            c.children.remove(at);
            let index = index.min(c.children.len());
            c.children.insert(index, child);
        }
    }

    /// Replaces the strategy of a container.
    ///
    /// A clone group gets the opposite rotation of the nearest enclosing clone group, and the
    /// container kind follows the strategy unless the container is a compartment.
    pub fn set_strategy(&mut self, container: ContentId, strategy: ContentStrategy) -> Result<()> {
        self.check_container(container)?;
        let strategy = match strategy {
            ContentStrategy::Clone { .. } => {
                if container == self.root {
                    return Err(Error::InvariantViolation(
                        "the root container cannot be a clone group".to_string(),
                    ));
                }
                let outer = self
                    .ancestors(container)
                    .into_iter()
                    .find_map(|a| match self.strategy(a) {
                        Some(ContentStrategy::Clone { rotated }) => Some(rotated),
                        _ => None,
                    });
                ContentStrategy::Clone {
                    rotated: outer.map(|r| !r).unwrap_or(false),
                }
            }
            other => other,
        };
        if let Some(c) = self.container_content_mut(container) {
            c.strategy = strategy;
            if c.kind != ContainerKind::Compartment {
                c.kind = ContainerKind::for_strategy(strategy);
            }
        }
        // Midget shapes depend on whether the parent is a clone group.
        for child in self.children(container).to_vec() {
            self.invalidate_content(child);
        }
        Ok(())
    }

    pub fn set_label(&mut self, container: ContentId, label: &str) -> Result<()> {
        self.check_container(container)?;
        if let Some(c) = self.container_content_mut(container) {
            c.label = label.to_string();
        }
        self.invalidate_from(Some(container), Dirty::ALL);
        Ok(())
    }

    /// Containers enclosing `id`, innermost first.
    pub fn ancestors(&self, id: ContentId) -> Vec<ContentId> {
        let mut out = Vec::new();
        let mut cur = self.container_of(id);
        while let Some(c) = cur {
            out.push(c);
            cur = self.container_of(c);
        }
        out
    }

    /// Whether `id` is `container` or lies somewhere inside it.
    pub fn is_descendant(&self, id: ContentId, container: ContentId) -> bool {
        id == container || self.ancestors(id).contains(&container)
    }

    /// The direct child of `container` that is or contains `id`.
    pub fn resolve_at(&self, id: ContentId, container: ContentId) -> Option<ContentId> {
        let mut cur = id;
        loop {
            let parent = self.container_of(cur)?;
            if parent == container {
                return Some(cur);
            }
            cur = parent;
        }
    }

    /// The innermost container strictly enclosing every content of `ids`.
    pub fn common_ancestor(&self, ids: &[ContentId]) -> Option<ContentId> {
        let (first, rest) = ids.split_first()?;
        let others: Vec<Vec<ContentId>> = rest.iter().map(|&id| self.ancestors(id)).collect();
        self.ancestors(*first)
            .into_iter()
            .find(|a| others.iter().all(|chain| chain.contains(a)))
    }

    /// The container registered for `compartment` that encloses `id`; the root stands for
    /// "no compartment".
    pub(crate) fn compartment_ancestor(
        &self,
        id: ContentId,
        compartment: Option<&str>,
    ) -> Option<ContentId> {
        let Some(name) = compartment else {
            return Some(self.root);
        };
        let registered = self.ref_to_container.get(name).copied()?;
        self.ancestors(id).into_iter().find(|&a| a == registered)
    }

    /// Every clone at or below `id`.
    pub fn clones_under(&self, id: ContentId) -> Vec<ContentId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            match self.contents.get(cur.0).map(|c| &c.body) {
                Some(ContentBody::Clone(_)) => out.push(cur),
                Some(ContentBody::Container(c)) => stack.extend(c.children.iter().rev()),
                None => {}
            }
        }
        out
    }

    // --- geometry -----------------------------------------------------------------------

    pub(crate) fn invalidate_from(&self, container: Option<ContentId>, dirty: Dirty) {
        if !dirty.any() {
            return;
        }
        let mut cur = container;
        while let Some(id) = cur {
            let Some(content) = self.contents.get(id.0) else {
                return;
            };
            if let Some(c) = content.as_container() {
                c.mark_dirty(dirty);
            }
            cur = content.container;
        }
    }

    /// Size of `id` may have changed.
    pub(crate) fn invalidate_content(&self, id: ContentId) {
        if let Some(c) = self.container_content(id) {
            c.mark_dirty(Dirty::ALL);
        }
        self.invalidate_from(self.container_of(id), Dirty::ALL);
    }

    pub(crate) fn invalidate_all(&self) {
        for (_, content) in self.contents.iter() {
            if let Some(c) = content.as_container() {
                c.mark_dirty(Dirty::ALL);
            }
        }
    }

    /// The four sides of `id`, margin included or not.
    pub fn sides(&self, id: ContentId, with_margin: bool) -> Option<Sides> {
        match &self.contents.get(id.0)?.body {
            ContentBody::Clone(c) => {
                let size = self.clone_size(id, with_margin)?;
                Some(Sides::around(c.position, size.width, size.height))
            }
            ContentBody::Container(c) => {
                let sides = self.container_sides(c);
                Some(if with_margin {
                    sides.grow(self.style.container.margin)
                } else {
                    sides
                })
            }
        }
    }

    pub fn left(&self, id: ContentId, with_margin: bool) -> Option<f64> {
        self.sides(id, with_margin).map(|s| s.left)
    }

    pub fn right(&self, id: ContentId, with_margin: bool) -> Option<f64> {
        self.sides(id, with_margin).map(|s| s.right)
    }

    pub fn top(&self, id: ContentId, with_margin: bool) -> Option<f64> {
        self.sides(id, with_margin).map(|s| s.top)
    }

    pub fn bottom(&self, id: ContentId, with_margin: bool) -> Option<f64> {
        self.sides(id, with_margin).map(|s| s.bottom)
    }

    pub fn width(&self, id: ContentId, with_margin: bool) -> Option<f64> {
        self.sides(id, with_margin).map(|s| s.width())
    }

    pub fn height(&self, id: ContentId, with_margin: bool) -> Option<f64> {
        self.sides(id, with_margin).map(|s| s.height())
    }

    /// Box without margin.
    pub fn bounding_rect(&self, id: ContentId) -> Option<Bounds> {
        self.sides(id, false).map(Sides::to_bounds)
    }

    /// Box with margin.
    pub fn full_rect(&self, id: ContentId) -> Option<Bounds> {
        self.sides(id, true).map(Sides::to_bounds)
    }

    /// Recomputes the dirty parts of the cached box, then returns it.
    fn container_sides(&self, c: &ContainerContent) -> Sides {
        let mut cache = c.geometry.get();
        if !cache.dirty.any() {
            return cache.sides;
        }
        let dirty = cache.dirty;
        let children: Vec<Sides> = c
            .children
            .iter()
            .filter_map(|&ch| self.sides(ch, true))
            .collect();
        let pad = self.style.container.padding;
        let (label_w, label_h) = self.style.label_size(&c.label);

        if dirty.horizontal {
            let (mut left, mut right) = if children.is_empty() {
                (c.anchor.x, c.anchor.x)
            } else {
                children.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(l, r), s| {
                    (l.min(s.left), r.max(s.right))
                })
            };
            left -= pad;
            right += pad;
            let min_width = label_w + 2.0 * pad;
            if right - left < min_width {
                let grow = (min_width - (right - left)) / 2.0;
                left -= grow;
                right += grow;
            }
            cache.sides.left = left;
            cache.sides.right = right;
        }
        if dirty.top {
            let top = if children.is_empty() {
                c.anchor.y
            } else {
                children.iter().map(|s| s.top).fold(f64::INFINITY, f64::min)
            };
            cache.sides.top = top - pad - label_h;
        }
        if dirty.bottom || dirty.top {
            let bottom = if children.is_empty() {
                c.anchor.y
            } else {
                children
                    .iter()
                    .map(|s| s.bottom)
                    .fold(f64::NEG_INFINITY, f64::max)
            };
            let min_height = label_h + 2.0 * pad;
            cache.sides.bottom = (bottom + pad).max(cache.sides.top + min_height);
        }
        cache.dirty = Dirty::NONE;
        c.geometry.set(cache);
        cache.sides
    }

    /// Centre of a clone; for a container, the centre of its core unless it is a compartment,
    /// otherwise the centre of its box.
    pub fn position(&self, id: ContentId) -> Option<Point> {
        match &self.contents.get(id.0)?.body {
            ContentBody::Clone(c) => Some(c.position),
            ContentBody::Container(c) => {
                if let Some(core) = c.core
                    && c.kind != ContainerKind::Compartment
                    && let Some(p) = self.position(core)
                {
                    return Some(p);
                }
                Some(self.container_sides(c).center())
            }
        }
    }

    pub fn x(&self, id: ContentId) -> Option<f64> {
        self.position(id).map(|p| p.x)
    }

    pub fn y(&self, id: ContentId) -> Option<f64> {
        self.position(id).map(|p| p.y)
    }

    /// Moves `id` so that its position becomes `to`. Containers move by translating every
    /// descendant.
    pub fn set_position(&mut self, id: ContentId, to: Point) -> Result<()> {
        let from = self.position(id).ok_or(Error::UnknownContent(id))?;
        self.translate(id, to - from);
        Ok(())
    }

    pub fn translate(&mut self, id: ContentId, by: Vector) {
        if by == vector(0.0, 0.0) {
            return;
        }
        let parent = self.container_of(id);
        let children = match self.contents.get_mut(id.0).map(|c| &mut c.body) {
            Some(ContentBody::Clone(c)) => {
                c.position += by;
                Vec::new()
            }
            Some(ContentBody::Container(c)) => {
                c.anchor += by;
                let mut cache: GeometryCache = c.geometry.get();
                if !cache.dirty.any() {
                    cache.sides.left += by.x;
                    cache.sides.right += by.x;
                    cache.sides.top += by.y;
                    cache.sides.bottom += by.y;
                    c.geometry.set(cache);
                }
                c.children.clone()
            }
            None => return,
        };
        for child in children {
            self.translate_inner(child, by);
        }
        self.invalidate_from(parent, Dirty::for_translation(by.x, by.y));
    }

    /// Translation of a descendant whose ancestors move along; their boxes are shifted by the
    /// caller instead of being recomputed.
    fn translate_inner(&mut self, id: ContentId, by: Vector) {
        let children = match self.contents.get_mut(id.0).map(|c| &mut c.body) {
            Some(ContentBody::Clone(c)) => {
                c.position += by;
                return;
            }
            Some(ContentBody::Container(c)) => {
                c.anchor += by;
                let mut cache = c.geometry.get();
                cache.sides.left += by.x;
                cache.sides.right += by.x;
                cache.sides.top += by.y;
                cache.sides.bottom += by.y;
                c.geometry.set(cache);
                c.children.clone()
            }
            None => return,
        };
        for child in children {
            self.translate_inner(child, by);
        }
    }

    // --- connectors ---------------------------------------------------------------------

    /// Connectors leaving `id`: for a clone, its incident connectors; for a container, the
    /// connectors that exactly one of its children leaves through.
    pub fn outer_connectors(&self, id: ContentId) -> Vec<ConnectorId> {
        match self.contents.get(id.0).map(|c| &c.body) {
            Some(ContentBody::Clone(c)) => {
                let mut out: Vec<ConnectorId> = Vec::with_capacity(c.connectors.len());
                for &conn in &c.connectors {
                    if !out.contains(&conn) {
                        out.push(conn);
                    }
                }
                out
            }
            Some(ContentBody::Container(_)) => self.partition_connectors(id, 1),
            None => Vec::new(),
        }
    }

    /// Connectors running between two children of `container`.
    pub fn inner_connectors(&self, container: ContentId) -> Vec<ConnectorId> {
        if self.container_content(container).is_none() {
            return Vec::new();
        }
        self.partition_connectors(container, 2)
    }

    fn partition_connectors(&self, container: ContentId, wanted: usize) -> Vec<ConnectorId> {
        let mut counts: IndexMap<ConnectorId, usize> = IndexMap::new();
        for &child in self.children(container) {
            for conn in self.outer_connectors(child) {
                *counts.entry(conn).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n == wanted)
            .map(|(c, _)| c)
            .collect()
    }

    // --- layout -------------------------------------------------------------------------

    /// Lays out the children of `container` depth-first, then `container` itself.
    pub fn layout_content(&mut self, container: ContentId) -> Result<()> {
        self.check_container(container)?;
        for child in self.children(container).to_vec() {
            if self.container_content(child).is_some() {
                self.layout_content(child)?;
            }
        }
        self.apply_strategy(container)
    }

    fn apply_strategy(&mut self, container: ContentId) -> Result<()> {
        let Some(strategy) = self.strategy(container) else {
            return Ok(());
        };
        if strategy == ContentStrategy::None {
            return Ok(());
        }
        let mut frame = self.layout_frame(container, strategy);
        if frame.items.is_empty() {
            return Ok(());
        }
        if strategy.uses_engine() {
            let before = frame.centroid();
            self.engine.layout(&mut frame).map_err(|e| match e {
                Error::Engine { .. } => e,
                other => Error::Engine {
                    container,
                    message: other.to_string(),
                },
            })?;
            // Keep the container where it was; engines work in their own coordinates.
            if let (Some(before), Some(after)) = (before, frame.centroid()) {
                frame.translate(before - after);
            }
        } else {
            match strategy {
                ContentStrategy::Clone { rotated } => strategy::clone_ring(&mut frame, rotated),
                ContentStrategy::Branch => strategy::branch_fan(&mut frame),
                ContentStrategy::Triangle => strategy::triangle(&mut frame),
                _ => {}
            }
        }
        for item in frame.items {
            self.set_position(item.content, item.position)?;
        }
        tracing::trace!(
            container = %container,
            strategy = strategy.name(),
            "container laid out"
        );
        Ok(())
    }

    fn layout_frame(&self, container: ContentId, strategy: ContentStrategy) -> LayoutFrame {
        let children = self.children(container).to_vec();
        let core = self.core(container);
        let items: Vec<LayoutItem> = children
            .iter()
            .filter_map(|&ch| {
                let sides = self.sides(ch, true)?;
                Some(LayoutItem {
                    content: ch,
                    width: sides.width(),
                    height: sides.height(),
                    position: self.position(ch)?,
                })
            })
            .collect();
        let index_of = |id: ContentId| items.iter().position(|i| i.content == id);

        let mut links = Vec::new();
        for conn in self.inner_connectors(container) {
            let Some(c) = self.connectors.get(conn.0) else {
                continue;
            };
            let (Some(s), Some(t)) = (
                self.resolve_at(c.source, container).and_then(index_of),
                self.resolve_at(c.target, container).and_then(index_of),
            ) else {
                continue;
            };
            links.push((s, t));
        }

        let outward = self.outward_direction(container);
        LayoutFrame {
            container,
            strategy,
            core: core.and_then(index_of),
            items,
            links,
            outward,
            spacing: self.style.spacing.node_spacing,
            ring_spacing: self.style.spacing.ring_spacing,
        }
    }

    /// Mean direction from the container's position to the far ends of its outer connectors.
    fn outward_direction(&self, container: ContentId) -> Option<Vector> {
        let from = self.position(container)?;
        let mut sum = vector(0.0, 0.0);
        let mut n = 0usize;
        for conn in self.outer_connectors(container) {
            let Some(c) = self.connectors.get(conn.0) else {
                continue;
            };
            let far = if self.is_descendant(c.source, container) {
                c.target
            } else {
                c.source
            };
            if let Some(p) = self.position(far) {
                sum += p - from;
                n += 1;
            }
        }
        (n > 0).then(|| sum / n as f64)
    }

    // --- restructuring helpers ----------------------------------------------------------

    /// Wraps `content` in a new container taking its place (and its core role) in the parent.
    pub(crate) fn wrap(&mut self, content: ContentId, strategy: ContentStrategy) -> Result<ContentId> {
        let parent = self.container_of(content).ok_or(Error::Detached(content))?;
        let was_core = self.core(parent) == Some(content);
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == content)
            .unwrap_or(0);
        let wrapper = self.create_container(parent, ContentStrategy::None, "")?;
        self.reorder_child(parent, wrapper, index);
        self.add(wrapper, content, true)?;
        // Set after the move so a clone group sees its final ancestors.
        self.set_strategy(wrapper, strategy)?;
        if was_core {
            self.set_core(parent, Some(wrapper));
        }
        Ok(wrapper)
    }

    /// Dissolves `container`: its children move to its parent (at its place), its core role
    /// is handed to its own core, and the container is deleted.
    pub fn collapse_container(&mut self, container: ContentId) -> Result<()> {
        self.check_container(container)?;
        let parent = self
            .container_of(container)
            .ok_or(Error::Detached(container))?;
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == container)
            .unwrap_or(0);
        let children = self.children(container).to_vec();
        let inner_core = self.core(container);
        let was_core = self.core(parent) == Some(container);

        for (offset, &child) in children.iter().enumerate() {
            self.set_container(child, Some(parent));
            self.reorder_child(parent, child, index + 1 + offset);
        }
        self.set_container(container, None);
        if was_core {
            self.set_core(parent, inner_core);
        }
        self.forget_container(container);
        tracing::trace!(container = %container, parent = %parent, "container collapsed");
        Ok(())
    }

    /// Deletes `id` and everything inside it. Clones go through [`Self::delete_clone`], so their
    /// connectors go too. The root cannot be deleted.
    pub fn delete_content(&mut self, id: ContentId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvariantViolation(
                "the root container cannot be deleted".to_string(),
            ));
        }
        match self.contents.get(id.0).map(Content::is_clone) {
            None => Err(Error::UnknownContent(id)),
            Some(true) => self.delete_clone(id),
            Some(false) => {
                for child in self.children(id).to_vec() {
                    self.delete_content(child)?;
                }
                self.set_container(id, None);
                self.forget_container(id);
                Ok(())
            }
        }
    }

    /// Deletes a container with everything inside it.
    pub fn delete_container(&mut self, container: ContentId) -> Result<()> {
        self.check_container(container)?;
        self.delete_content(container)
    }

    fn forget_container(&mut self, container: ContentId) {
        self.ref_to_container.retain(|_, &mut c| c != container);
        self.contents.remove(container.0);
    }

    /// Collapses `container` and then its ancestors for as long as they have become
    /// meaningless: clone groups and branches without a core or with a single child,
    /// triangles without exactly three children, plain containers without children.
    /// Compartments and the root are never touched.
    pub(crate) fn tidy_container(&mut self, container: ContentId) -> Result<()> {
        let mut current = Some(container);
        while let Some(c) = current {
            if c == self.root {
                break;
            }
            let Some(content) = self.container_content(c) else {
                break;
            };
            if content.kind == ContainerKind::Compartment {
                break;
            }
            let n = content.children.len();
            let meaningless = match content.strategy {
                ContentStrategy::Clone { .. } | ContentStrategy::Branch => {
                    n <= 1 || content.core.is_none()
                }
                ContentStrategy::Triangle => n != 3,
                _ => n == 0,
            };
            if !meaningless {
                break;
            }
            let parent = self.container_of(c);
            self.collapse_container(c)?;
            current = parent;
        }
        Ok(())
    }
}
