use std::f64::consts::TAU;

use pathlay_graph::{GraphModel, VertexId};

use crate::content::ContentId;
use crate::error::Result;
use crate::geometry::vector;
use crate::layout::GraphLayout;

impl<G: GraphModel> GraphLayout<G> {
    /// Grows a neighbourhood view one hop around `roots`, then around the clones that hop
    /// created, until `depth` runs out.
    ///
    /// Edges already drawn at a root are skipped, and a wired root only grows along the
    /// neighbours it stands for. A neighbour that already has a clone inside `neighbourhood` is
    /// reused. New clones on the last hop (`depth == 0`) are boundary clones wired to the root's
    /// vertex only and are not expanded further.
    pub fn recursive_neighbourhood_building(
        &mut self,
        roots: &[ContentId],
        neighbourhood: ContentId,
        depth: i32,
    ) -> Result<()> {
        if depth < 0 || roots.is_empty() {
            return Ok(());
        }
        self.check_container(neighbourhood)?;
        let radius = self.style.spacing.node_spacing * 2.0;
        let mut next = Vec::new();

        for &root in roots {
            let Some(clone) = self.clone_content(root) else {
                continue;
            };
            let vertex = clone.vertex;
            let centre = clone.position;
            let wired = clone.neighbour_vertices.clone();
            let edges = self.graph.incident_edges(vertex);
            let count = edges.len().max(1) as f64;

            for (k, e) in edges.into_iter().enumerate() {
                if self.has_connector(root, e) {
                    continue;
                }
                let Some(other_vertex) = self.graph.opposite(e, vertex) else {
                    continue;
                };
                if !wired.is_empty() && !wired.contains(&other_vertex) {
                    continue;
                }
                let other = if other_vertex == vertex {
                    root
                } else if let Some(existing) = self.clone_in(other_vertex, neighbourhood) {
                    self.extend_wiring(existing, vertex);
                    existing
                } else {
                    let a = TAU * k as f64 / count;
                    let at = centre + vector(radius * a.cos(), radius * a.sin());
                    let wiring = if depth == 0 { vec![vertex] } else { Vec::new() };
                    let created = self.create_clone(other_vertex, Some(neighbourhood), wiring, at)?;
                    next.push(created);
                    created
                };
                if self.graph.source(e) == Some(vertex) {
                    self.create_connector(e, root, other)?;
                } else {
                    self.create_connector(e, other, root)?;
                }
            }
        }

        tracing::trace!(depth, added = next.len(), "neighbourhood hop");
        self.recursive_neighbourhood_building(&next, neighbourhood, depth - 1)
    }

    fn clone_in(&self, vertex: VertexId, container: ContentId) -> Option<ContentId> {
        self.clones_of(vertex)
            .iter()
            .copied()
            .find(|&c| self.is_descendant(c, container))
    }

    /// A boundary clone reached again from another vertex stands for that vertex too.
    fn extend_wiring(&mut self, clone: ContentId, vertex: VertexId) {
        if let Some(c) = self.clone_content_mut(clone)
            && c.is_wired()
            && !c.neighbour_vertices.contains(&vertex)
        {
            c.neighbour_vertices.push(vertex);
        }
    }
}
