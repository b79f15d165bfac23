//! Clone operations: creation, deletion, classification, size and attachment points.

use pathlay_graph::{GraphModel, VertexId};

use crate::content::{CloneContent, ConnectorId, Content, ContentId};
use crate::error::{Error, Result};
use crate::geometry::{ConnectionType, Point, Size, vector};
use crate::layout::GraphLayout;
use crate::style::CloneKind;

impl<G: GraphModel> GraphLayout<G> {
    pub fn clone_content(&self, id: ContentId) -> Option<&CloneContent> {
        self.contents.get(id.0).and_then(Content::as_clone)
    }

    pub(crate) fn clone_content_mut(&mut self, id: ContentId) -> Option<&mut CloneContent> {
        self.contents.get_mut(id.0).and_then(Content::as_clone_mut)
    }

    /// Creates a clone of `vertex` centred at `at` inside `container` (the root if `None`) and
    /// registers it under its vertex.
    pub fn create_clone(
        &mut self,
        vertex: VertexId,
        container: Option<ContentId>,
        neighbour_vertices: Vec<VertexId>,
        at: Point,
    ) -> Result<ContentId> {
        if !self.graph.contains_vertex(vertex) {
            return Err(Error::InvariantViolation(format!(
                "vertex {vertex} is not part of the graph"
            )));
        }
        let container = container.unwrap_or(self.root);
        self.check_container(container)?;

        let id = ContentId(
            self.contents
                .insert(Content::clone_of(CloneContent::new(vertex, at, neighbour_vertices))),
        );
        self.set_container(id, Some(container));
        self.clone_map.entry(vertex).or_default().push(id);
        self.invalidate_clones_of(vertex);
        tracing::trace!(clone = %id, vertex = %vertex, container = %container, "clone created");
        Ok(id)
    }

    /// Deletes a clone together with every connector still attached to it.
    pub fn delete_clone(&mut self, id: ContentId) -> Result<()> {
        let clone = self.clone_content(id).ok_or(Error::NotAClone(id))?;
        let vertex = clone.vertex;
        let mut incident: Vec<ConnectorId> = clone.connectors.clone();
        incident.dedup();

        for conn in incident {
            if self.connectors.get(conn.0).is_some() {
                self.delete_connector(conn)?;
            }
        }

        self.set_container(id, None);
        if let Some(clones) = self.clone_map.get_mut(&vertex) {
            clones.retain(|&c| c != id);
            if clones.is_empty() {
                self.clone_map.shift_remove(&vertex);
            }
        }
        self.contents.remove(id.0);
        self.invalidate_clones_of(vertex);
        tracing::trace!(clone = %id, vertex = %vertex, "clone deleted");
        Ok(())
    }

    /// Every clone of `vertex` changes size when the number of clones changes.
    fn invalidate_clones_of(&self, vertex: VertexId) {
        for &c in self.clones_of(vertex) {
            self.invalidate_content(c);
        }
    }

    pub fn set_neighbour_vertices(&mut self, id: ContentId, vertices: Vec<VertexId>) -> Result<()> {
        let clone = self.clone_content_mut(id).ok_or(Error::NotAClone(id))?;
        clone.neighbour_vertices = vertices;
        Ok(())
    }

    pub fn clone_kind(&self, id: ContentId) -> Option<CloneKind> {
        let clone = self.clone_content(id)?;
        let parent = self.container_of(id);
        let in_group = parent
            .and_then(|p| self.container_content(p))
            .is_some_and(|p| p.strategy.is_clone_group() && p.core != Some(id));
        Some(if in_group {
            CloneKind::IsMidget
        } else if self.clones_of(clone.vertex).len() > 1 {
            CloneKind::IsClone
        } else {
            CloneKind::NotClone
        })
    }

    pub(crate) fn clone_size(&self, id: ContentId, with_margin: bool) -> Option<Size> {
        let clone = self.clone_content(id)?;
        let kind = self.clone_kind(id)?;
        let type_label = self.graph.vertex_type(clone.vertex).unwrap_or_default();
        let shape = self.style.node_shape(type_label, kind);
        let extra = if with_margin { 2.0 * shape.margin } else { 0.0 };
        Some(Size::new(shape.width + extra, shape.height + extra))
    }

    /// The point where a connector attaching on `side` meets the clone. Non-directional nodes
    /// always answer their centre.
    pub fn connection_point(&self, id: ContentId, side: ConnectionType) -> Option<Point> {
        let clone = self.clone_content(id)?;
        let c = clone.position;
        let type_label = self.graph.vertex_type(clone.vertex).unwrap_or_default();
        if !self.style.is_directional(type_label) {
            return Some(c);
        }
        let size = self.clone_size(id, false)?;
        let (hw, hh) = (size.width / 2.0, size.height / 2.0);
        let mut forward = if clone.rotated {
            vector(hw, 0.0)
        } else {
            vector(0.0, hh)
        };
        if clone.inverted {
            forward = -forward;
        }
        let across = if clone.rotated {
            vector(0.0, hh)
        } else {
            vector(hw, 0.0)
        };
        Some(match side {
            ConnectionType::In => c - forward,
            ConnectionType::Out => c + forward,
            ConnectionType::Side1 => c - across,
            ConnectionType::Side2 => c + across,
            ConnectionType::Neutral => c,
        })
    }
}
