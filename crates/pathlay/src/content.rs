//! Contents: the items of the layout tree.
//!
//! Every placeable item is a [`Content`], stored in an arena owned by the
//! [`GraphLayout`](crate::GraphLayout) and addressed by a [`ContentId`]. A content is either a
//! [`CloneContent`] (one on-canvas instance of a graph vertex) or a [`ContainerContent`] (a
//! cluster of other contents). Containers hold the ids of their children; every content holds
//! the id of its container. Both sides are only ever changed together.

use std::cell::Cell;
use std::fmt;

use pathlay_graph::VertexId;

use crate::geometry::{Point, Sides};
use crate::strategy::ContentStrategy;

/// Stable handle of a content. Handles are never reused within one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentId(pub(crate) usize);

/// Stable handle of a connector. Handles are never reused within one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectorId(pub(crate) usize);

impl ContentId {
    /// Rebuilds a handle from [`ContentId::index`].
    pub const fn from_raw(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl ConnectorId {
    /// Rebuilds a handle from [`ConnectorId::index`], e.g. inside a custom router.
    pub const fn from_raw(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content#{}", self.0)
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connector#{}", self.0)
    }
}

/// Slot arena with monotonically growing indices.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> usize {
        let idx = self.slots.len();
        self.slots.push(Some(value));
        self.live += 1;
        idx
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    pub(crate) fn remove(&mut self, idx: usize) -> Option<T> {
        let value = self.slots.get_mut(idx)?.take();
        if value.is_some() {
            self.live -= 1;
        }
        value
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }
}

/// Tag describing what a container is for. Follows the strategy, except for compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Plain,
    /// A compartment (cytosol, nucleus, ...). Its position is always its box centre, and it is
    /// never removed by automatic tidying.
    Compartment,
    CloneGroup,
    Branch,
    Triangle,
    Neighbourhood,
}

impl ContainerKind {
    pub fn for_strategy(strategy: ContentStrategy) -> Self {
        match strategy {
            ContentStrategy::Clone { .. } => Self::CloneGroup,
            ContentStrategy::Branch => Self::Branch,
            ContentStrategy::Triangle => Self::Triangle,
            ContentStrategy::Neighbourhood => Self::Neighbourhood,
            ContentStrategy::None | ContentStrategy::Automatic | ContentStrategy::Hierarchy => {
                Self::Plain
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "container",
            Self::Compartment => "compartment",
            Self::CloneGroup => "clone group",
            Self::Branch => "branch",
            Self::Triangle => "triangle",
            Self::Neighbourhood => "neighbourhood",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Content {
    pub(crate) container: Option<ContentId>,
    pub(crate) body: ContentBody,
}

#[derive(Debug, Clone)]
pub enum ContentBody {
    Clone(CloneContent),
    Container(ContainerContent),
}

impl Content {
    pub(crate) fn clone_of(clone: CloneContent) -> Self {
        Self {
            container: None,
            body: ContentBody::Clone(clone),
        }
    }

    pub(crate) fn container_of(container: ContainerContent) -> Self {
        Self {
            container: None,
            body: ContentBody::Container(container),
        }
    }

    /// The container this content is attached to.
    pub fn container(&self) -> Option<ContentId> {
        self.container
    }

    pub fn body(&self) -> &ContentBody {
        &self.body
    }

    pub fn as_clone(&self) -> Option<&CloneContent> {
        match &self.body {
            ContentBody::Clone(c) => Some(c),
            ContentBody::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerContent> {
        match &self.body {
            ContentBody::Container(c) => Some(c),
            ContentBody::Clone(_) => None,
        }
    }

    pub(crate) fn as_clone_mut(&mut self) -> Option<&mut CloneContent> {
        match &mut self.body {
            ContentBody::Clone(c) => Some(c),
            ContentBody::Container(_) => None,
        }
    }

    pub(crate) fn as_container_mut(&mut self) -> Option<&mut ContainerContent> {
        match &mut self.body {
            ContentBody::Container(c) => Some(c),
            ContentBody::Clone(_) => None,
        }
    }

    pub fn is_clone(&self) -> bool {
        matches!(self.body, ContentBody::Clone(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.body, ContentBody::Container(_))
    }
}

/// One on-canvas instance of a graph vertex.
#[derive(Debug, Clone)]
pub struct CloneContent {
    pub(crate) vertex: VertexId,
    pub(crate) position: Point,
    pub(crate) neighbour_vertices: Vec<VertexId>,
    pub(crate) connectors: Vec<ConnectorId>,
    pub(crate) rotated: bool,
    pub(crate) inverted: bool,
}

impl CloneContent {
    pub(crate) fn new(vertex: VertexId, position: Point, neighbour_vertices: Vec<VertexId>) -> Self {
        Self {
            vertex,
            position,
            neighbour_vertices,
            connectors: Vec::new(),
            rotated: false,
            inverted: false,
        }
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Centre of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The neighbours this clone stands in for. Empty means all neighbours of the vertex.
    pub fn neighbour_vertices(&self) -> &[VertexId] {
        &self.neighbour_vertices
    }

    pub fn is_wired(&self) -> bool {
        !self.neighbour_vertices.is_empty()
    }

    pub fn connectors(&self) -> &[ConnectorId] {
        &self.connectors
    }

    /// Flow runs horizontally rather than vertically.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Flow runs right-to-left (rotated) or bottom-to-top (not rotated).
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

/// Pending recomputation of a container box. Left and right are always recomputed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Dirty {
    pub(crate) horizontal: bool,
    pub(crate) top: bool,
    pub(crate) bottom: bool,
}

impl Dirty {
    pub(crate) const ALL: Self = Self {
        horizontal: true,
        top: true,
        bottom: true,
    };

    pub(crate) const NONE: Self = Self {
        horizontal: false,
        top: false,
        bottom: false,
    };

    pub(crate) fn for_translation(dx: f64, dy: f64) -> Self {
        Self {
            horizontal: dx != 0.0,
            top: dy != 0.0,
            bottom: dy != 0.0,
        }
    }

    pub(crate) fn any(self) -> bool {
        self.horizontal || self.top || self.bottom
    }

    pub(crate) fn union(self, other: Self) -> Self {
        Self {
            horizontal: self.horizontal || other.horizontal,
            top: self.top || other.top,
            bottom: self.bottom || other.bottom,
        }
    }
}

/// Cached bounding box (margin excluded) of a container.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GeometryCache {
    pub(crate) sides: Sides,
    pub(crate) dirty: Dirty,
}

/// A cluster of contents laid out together.
#[derive(Debug, Clone)]
pub struct ContainerContent {
    pub(crate) children: Vec<ContentId>,
    pub(crate) core: Option<ContentId>,
    pub(crate) strategy: ContentStrategy,
    pub(crate) kind: ContainerKind,
    pub(crate) label: String,
    /// Centre used while the container has no children.
    pub(crate) anchor: Point,
    pub(crate) geometry: Cell<GeometryCache>,
}

impl ContainerContent {
    pub(crate) fn new(strategy: ContentStrategy, label: String, anchor: Point) -> Self {
        Self {
            children: Vec::new(),
            core: None,
            strategy,
            kind: ContainerKind::for_strategy(strategy),
            label,
            anchor,
            geometry: Cell::new(GeometryCache {
                sides: Sides::around(anchor, 0.0, 0.0),
                dirty: Dirty::ALL,
            }),
        }
    }

    pub fn children(&self) -> &[ContentId] {
        &self.children
    }

    pub fn core(&self) -> Option<ContentId> {
        self.core
    }

    pub fn strategy(&self) -> ContentStrategy {
        self.strategy
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_compartment(&self) -> bool {
        self.kind == ContainerKind::Compartment
    }

    pub(crate) fn mark_dirty(&self, dirty: Dirty) {
        let mut cache = self.geometry.get();
        cache.dirty = cache.dirty.union(dirty);
        self.geometry.set(cache);
    }
}
