//! One layout instance over a pathway graph.

use indexmap::IndexMap;
use pathlay_graph::{EdgeId, EdgeRole, GraphModel, VertexId, VertexRole};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::connector::Connector;
use crate::content::{
    Arena, ConnectorId, Content, ContainerContent, ContainerKind, ContentId,
};
use crate::error::{Error, Result};
use crate::geometry::{Bounds, ConnectionType, point, vector};
use crate::routing::{ConnectorLayoutManager, EdgeRouter, RouteRequest, RoutingMode};
use crate::strategy::{ContentStrategy, DefaultEngine, LayoutEngine};
use crate::style::StyleSheet;

/// A complete layout of one graph: the content tree, the vertex → clones map and every
/// connector drawn between clones.
///
/// All contents and connectors are owned by the layout and addressed by handle. Handles of
/// deleted items simply stop resolving.
pub struct GraphLayout<G> {
    pub(crate) graph: G,
    pub(crate) style: StyleSheet,

    pub(crate) contents: Arena<Content>,
    pub(crate) connectors: Arena<Connector>,

    pub(crate) clone_map: IndexMap<VertexId, Vec<ContentId>>,
    pub(crate) edge_connectors: FxHashMap<EdgeId, Vec<ConnectorId>>,
    pub(crate) ref_to_container: FxHashMap<String, ContentId>,
    pub(crate) root: ContentId,

    pub(crate) engine: Box<dyn LayoutEngine>,
    pub(crate) connector_layout: ConnectorLayoutManager,

    /// Connectors with both ends in the moving set.
    pub(crate) in_list: Vec<ConnectorId>,
    /// Connectors with exactly one end in the moving set.
    pub(crate) out_list: Vec<ConnectorId>,
}

impl<G> std::fmt::Debug for GraphLayout<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphLayout")
            .field("contents", &self.contents.len())
            .field("connectors", &self.connectors.len())
            .field("root", &self.root)
            .field("connector_layout", &self.connector_layout)
            .finish_non_exhaustive()
    }
}

impl<G: GraphModel> GraphLayout<G> {
    /// An empty layout: a root container and nothing else.
    pub fn new(graph: G, style: StyleSheet) -> Self {
        let mut contents = Arena::default();
        let root = ContentId(contents.insert(Content::container_of(ContainerContent::new(
            ContentStrategy::Automatic,
            String::new(),
            point(0.0, 0.0),
        ))));
        let connector_layout = ConnectorLayoutManager::new(style.routing);
        Self {
            graph,
            style,
            contents,
            connectors: Arena::default(),
            clone_map: IndexMap::new(),
            edge_connectors: FxHashMap::default(),
            ref_to_container: FxHashMap::default(),
            root,
            engine: Box::new(DefaultEngine),
            connector_layout,
            in_list: Vec::new(),
            out_list: Vec::new(),
        }
    }

    /// Full view of the graph: one compartment container per compartment, one clone per
    /// vertex and one connector per edge.
    pub fn from_graph(graph: G, style: StyleSheet) -> Result<Self> {
        let mut layout = Self::new(graph, style);
        let spacing = layout.style.spacing.node_spacing;
        for (i, v) in layout.graph.vertices().into_iter().enumerate() {
            let container = match layout.graph.compartment(v).map(str::to_string) {
                Some(name) => layout.compartment_container(&name)?,
                None => layout.root,
            };
            let at = point(i as f64 * spacing, 0.0);
            layout.create_clone(v, Some(container), Vec::new(), at)?;
        }
        for e in layout.graph.edges() {
            let (Some(s), Some(t)) = (layout.graph.source(e), layout.graph.target(e)) else {
                continue;
            };
            let (Some(&sc), Some(&tc)) = (
                layout.clones_of(s).first(),
                layout.clones_of(t).first(),
            ) else {
                continue;
            };
            layout.create_connector(e, sc, tc)?;
        }
        tracing::debug!(
            vertices = layout.clone_map.len(),
            connectors = layout.connectors.len(),
            compartments = layout.ref_to_container.len(),
            "loaded graph layout"
        );
        Ok(layout)
    }

    /// Neighbourhood view: the given vertices plus everything within `depth` hops, laid out by
    /// the Neighbourhood strategy. Clones on the last hop only stand for the edge that reached
    /// them.
    pub fn neighbourhood(graph: G, style: StyleSheet, roots: &[VertexId], depth: i32) -> Result<Self> {
        let mut layout = Self::new(graph, style);
        let root = layout.root;
        layout.set_strategy(root, ContentStrategy::Neighbourhood)?;
        let spacing = layout.style.spacing.node_spacing;
        let mut root_clones = Vec::new();
        for (i, &v) in roots.iter().enumerate() {
            if !layout.graph.contains_vertex(v) || !layout.clones_of(v).is_empty() {
                continue;
            }
            let at = point(i as f64 * spacing * 4.0, 0.0);
            root_clones.push(layout.create_clone(v, Some(root), Vec::new(), at)?);
        }
        let depth = depth.saturating_sub(1);
        layout.recursive_neighbourhood_building(&root_clones, root, depth)?;
        Ok(layout)
    }

    /// The container registered for `name`, created under the root as a compartment on first
    /// use.
    pub fn compartment_container(&mut self, name: &str) -> Result<ContentId> {
        if let Some(&id) = self.ref_to_container.get(name) {
            return Ok(id);
        }
        let id = self.create_container(self.root, ContentStrategy::Automatic, name)?;
        if let Some(c) = self.container_content_mut(id) {
            c.kind = ContainerKind::Compartment;
        }
        self.ref_to_container.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn with_engine(mut self, engine: Box<dyn LayoutEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn set_engine(&mut self, engine: Box<dyn LayoutEngine>) {
        self.engine = engine;
    }

    pub fn set_router(&mut self, router: Box<dyn EdgeRouter>) {
        self.connector_layout.set_router(router);
    }

    pub fn set_routing_mode(&mut self, mode: RoutingMode) {
        self.connector_layout.set_mode(mode);
    }

    pub fn connector_layout(&self) -> &ConnectorLayoutManager {
        &self.connector_layout
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn style(&self) -> &StyleSheet {
        &self.style
    }

    /// Swaps the style sheet. Every container box is recomputed on next access.
    pub fn set_style(&mut self, style: StyleSheet) {
        self.connector_layout.set_mode(style.routing);
        self.style = style;
        self.invalidate_all();
    }

    pub fn root(&self) -> ContentId {
        self.root
    }

    /// The container registered under `key`, e.g. a compartment name.
    pub fn container_for_ref(&self, key: &str) -> Option<ContentId> {
        self.ref_to_container.get(key).copied()
    }

    pub fn clones_of(&self, vertex: VertexId) -> &[ContentId] {
        self.clone_map.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every vertex with at least one clone, in first-registration order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.clone_map
            .iter()
            .filter(|(_, clones)| !clones.is_empty())
            .map(|(&v, _)| v)
    }

    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    pub fn content_ids(&self) -> Vec<ContentId> {
        self.contents.iter().map(|(i, _)| ContentId(i)).collect()
    }

    /// Runs one update pass.
    ///
    /// 1. unless `edges_only` or `fast`: lays out the whole container tree;
    /// 2. unless `fast`: infers reaction orientations and routes every connector;
    /// 3. if `fast`: only re-points the connectors touching the moving set.
    pub fn update(&mut self, edges_only: bool, fast: bool) -> Result<()> {
        if fast {
            let inside = std::mem::take(&mut self.in_list);
            let crossing = std::mem::take(&mut self.out_list);
            for &c in &inside {
                self.quick_translate(c);
            }
            for &c in &crossing {
                self.quick_update(c);
            }
            tracing::trace!(
                inside = inside.len(),
                crossing = crossing.len(),
                "fast connector update"
            );
            self.in_list = inside;
            self.out_list = crossing;
            return Ok(());
        }

        if !edges_only {
            self.layout_content(self.root)?;
        }
        self.infer_orientations();
        self.route_connectors()?;
        tracing::debug!(
            edges_only,
            contents = self.contents.len(),
            connectors = self.connectors.len(),
            "layout updated"
        );
        Ok(())
    }

    /// Sets `rotated`/`inverted` on every reaction clone from the positions of its reactants
    /// and products, then picks the face each incident connector attaches to.
    pub fn infer_orientations(&mut self) {
        let reactions: Vec<ContentId> = self
            .clone_map
            .iter()
            .filter(|(v, _)| self.graph.vertex_role(**v) == VertexRole::Reaction)
            .flat_map(|(_, clones)| clones.iter().copied())
            .collect();

        for reaction in reactions {
            let Some(clone) = self.clone_content(reaction) else {
                continue;
            };
            let center = clone.position;
            let incident = clone.connectors.clone();

            let mut flow = vector(0.0, 0.0);
            let mut roles = Vec::with_capacity(incident.len());
            for &c in &incident {
                let Some(conn) = self.connectors.get(c.0) else {
                    continue;
                };
                let role = self.graph.edge_role(conn.edge);
                let Some(other) = conn.neighbour(reaction).and_then(|n| self.position(n)) else {
                    continue;
                };
                match role {
                    EdgeRole::Reactant => flow -= other - center,
                    EdgeRole::Product => flow += other - center,
                    EdgeRole::Modifier | EdgeRole::Other => {}
                }
                roles.push((c, role, other));
            }

            let rotated = flow.x.abs() > flow.y.abs();
            let inverted = if rotated { flow.x < 0.0 } else { flow.y < 0.0 };
            if let Some(clone) = self.clone_content_mut(reaction) {
                clone.rotated = rotated;
                clone.inverted = inverted;
            }

            for (c, role, other) in roles {
                let side = match role {
                    EdgeRole::Reactant => ConnectionType::In,
                    EdgeRole::Product => ConnectionType::Out,
                    EdgeRole::Modifier => {
                        let before = if rotated {
                            other.y < center.y
                        } else {
                            other.x < center.x
                        };
                        if before {
                            ConnectionType::Side1
                        } else {
                            ConnectionType::Side2
                        }
                    }
                    EdgeRole::Other => ConnectionType::Neutral,
                };
                if let Some(conn) = self.connectors.get_mut(c.0) {
                    if conn.source == reaction {
                        conn.source_connection = side;
                    }
                    if conn.target == reaction {
                        conn.target_connection = side;
                    }
                }
            }
        }
    }

    /// Routing pass over every connector.
    pub fn route_connectors(&mut self) -> Result<()> {
        let mut requests: Vec<RouteRequest> = Vec::with_capacity(self.connectors.len());
        for (idx, conn) in self.connectors.iter() {
            let id = ConnectorId(idx);
            let (Some(source), Some(target), Some(source_box), Some(target_box)) = (
                self.connector_point(id, true, false),
                self.connector_point(id, false, false),
                self.bounding_rect(conn.source),
                self.bounding_rect(conn.target),
            ) else {
                continue;
            };
            requests.push(RouteRequest {
                connector: id,
                source,
                target,
                source_box,
                target_box,
                points: Vec::new(),
            });
        }

        let node_boxes: Vec<Bounds> = if self.connector_layout.wants_obstacles() {
            self.contents
                .iter()
                .filter(|(_, c)| c.is_clone())
                .filter_map(|(i, _)| self.bounding_rect(ContentId(i)))
                .collect()
        } else {
            Vec::new()
        };

        self.connector_layout.layout(&mut requests, &node_boxes)?;

        for r in requests {
            if let Some(conn) = self.connectors.get_mut(r.connector.0) {
                conn.points = r.points;
            }
        }
        Ok(())
    }

    /// Records the contents being dragged, so that `update(_, true)` only touches the
    /// connectors attached to them.
    pub fn set_moving(&mut self, moving: &[ContentId]) {
        let mut clones: FxHashSet<ContentId> = FxHashSet::default();
        for &m in moving {
            clones.extend(self.clones_under(m));
        }
        let mut inside = Vec::new();
        let mut crossing = Vec::new();
        let mut seen: FxHashSet<ConnectorId> = FxHashSet::default();
        for &clone in &clones {
            let Some(c) = self.clone_content(clone) else {
                continue;
            };
            for &conn in &c.connectors {
                if !seen.insert(conn) {
                    continue;
                }
                let Some(connector) = self.connectors.get(conn.0) else {
                    continue;
                };
                if clones.contains(&connector.source) && clones.contains(&connector.target) {
                    inside.push(conn);
                } else {
                    crossing.push(conn);
                }
            }
        }
        inside.sort();
        crossing.sort();
        self.in_list = inside;
        self.out_list = crossing;
    }

    pub fn clear_moving(&mut self) {
        self.in_list.clear();
        self.out_list.clear();
    }

    /// Connectors with both ends in the moving set.
    pub fn in_list(&self) -> &[ConnectorId] {
        &self.in_list
    }

    /// Connectors with one end in the moving set.
    pub fn out_list(&self) -> &[ConnectorId] {
        &self.out_list
    }

    pub(crate) fn check_container(&self, id: ContentId) -> Result<()> {
        match self.contents.get(id.0) {
            None => Err(Error::UnknownContent(id)),
            Some(c) if !c.is_container() => Err(Error::NotAContainer(id)),
            Some(_) => Ok(()),
        }
    }
}
