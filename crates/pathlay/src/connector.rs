//! Connectors: drawn edges between two clones.

use pathlay_graph::{EdgeId, GraphModel};

use crate::content::{ConnectorId, ContentId};
use crate::error::{Error, Result};
use crate::geometry::{ConnectionType, Point};
use crate::layout::GraphLayout;

/// A drawn instance of a graph edge.
///
/// Endpoints are clone handles. Each endpoint lists the connector among its own connectors;
/// a self-loop is listed once.
#[derive(Debug, Clone)]
pub struct Connector {
    pub(crate) edge: EdgeId,
    pub(crate) source: ContentId,
    pub(crate) target: ContentId,
    pub(crate) source_connection: ConnectionType,
    pub(crate) target_connection: ConnectionType,
    pub(crate) points: Vec<Point>,
}

impl Connector {
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    pub fn source(&self) -> ContentId {
        self.source
    }

    pub fn target(&self) -> ContentId {
        self.target
    }

    pub fn source_connection(&self) -> ConnectionType {
        self.source_connection
    }

    pub fn target_connection(&self) -> ConnectionType {
        self.target_connection
    }

    /// The routed polyline, source first.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// The other endpoint; `None` when `clone` is not an endpoint.
    pub fn neighbour(&self, clone: ContentId) -> Option<ContentId> {
        if clone == self.source {
            Some(self.target)
        } else if clone == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

impl<G: GraphModel> GraphLayout<G> {
    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id.0)
    }

    pub fn connector_ids(&self) -> Vec<ConnectorId> {
        self.connectors.iter().map(|(i, _)| ConnectorId(i)).collect()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn connectors_of_edge(&self, edge: EdgeId) -> &[ConnectorId] {
        self.edge_connectors
            .get(&edge)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `clone` already draws `edge`.
    pub fn has_connector(&self, clone: ContentId, edge: EdgeId) -> bool {
        self.clone_content(clone).is_some_and(|c| {
            c.connectors
                .iter()
                .any(|&conn| self.connectors.get(conn.0).is_some_and(|x| x.edge == edge))
        })
    }

    /// Draws `edge` between two clones and gives it a straight polyline.
    pub fn create_connector(
        &mut self,
        edge: EdgeId,
        source: ContentId,
        target: ContentId,
    ) -> Result<ConnectorId> {
        for end in [source, target] {
            if self.clone_content(end).is_none() {
                return Err(Error::NotAClone(end));
            }
        }
        let id = ConnectorId(self.connectors.insert(Connector {
            edge,
            source,
            target,
            source_connection: ConnectionType::Neutral,
            target_connection: ConnectionType::Neutral,
            points: Vec::new(),
        }));
        self.attach(source, id);
        self.attach(target, id);
        self.edge_connectors.entry(edge).or_default().push(id);
        self.quick_update(id);
        Ok(id)
    }

    /// Unregisters the connector from both endpoints, then drops it.
    pub fn delete_connector(&mut self, id: ConnectorId) -> Result<()> {
        let conn = self
            .connectors
            .remove(id.0)
            .ok_or(Error::UnknownConnector(id))?;
        self.detach(conn.source, id);
        self.detach(conn.target, id);
        if let Some(list) = self.edge_connectors.get_mut(&conn.edge) {
            list.retain(|&c| c != id);
            if list.is_empty() {
                self.edge_connectors.remove(&conn.edge);
            }
        }
        self.in_list.retain(|&c| c != id);
        self.out_list.retain(|&c| c != id);
        Ok(())
    }

    pub fn set_source(&mut self, id: ConnectorId, clone: ContentId) -> Result<()> {
        self.set_endpoint(id, clone, true)
    }

    pub fn set_target(&mut self, id: ConnectorId, clone: ContentId) -> Result<()> {
        self.set_endpoint(id, clone, false)
    }

    fn set_endpoint(&mut self, id: ConnectorId, clone: ContentId, is_source: bool) -> Result<()> {
        if self.clone_content(clone).is_none() {
            return Err(Error::NotAClone(clone));
        }
        let conn = self
            .connectors
            .get_mut(id.0)
            .ok_or(Error::UnknownConnector(id))?;
        let (old, other) = if is_source {
            (std::mem::replace(&mut conn.source, clone), conn.target)
        } else {
            (std::mem::replace(&mut conn.target, clone), conn.source)
        };
        if old == clone {
            return Ok(());
        }
        // The old end keeps the connector while it still is the other end.
        if old != other {
            self.detach(old, id);
        }
        self.attach(clone, id);
        Ok(())
    }

    fn attach(&mut self, clone: ContentId, id: ConnectorId) {
        if let Some(c) = self.clone_content_mut(clone)
            && !c.connectors.contains(&id)
        {
            c.connectors.push(id);
        }
    }

    fn detach(&mut self, clone: ContentId, id: ConnectorId) {
        if let Some(c) = self.clone_content_mut(clone) {
            c.connectors.retain(|&x| x != id);
        }
    }

    /// Where the connector meets one of its ends. With `intersection`, the first point on the
    /// straight line from that end towards the other one that lies outside the end's box.
    pub fn connector_point(
        &self,
        id: ConnectorId,
        is_source: bool,
        intersection: bool,
    ) -> Option<Point> {
        let conn = self.connectors.get(id.0)?;
        let (near, far, side) = if is_source {
            (conn.source, conn.target, conn.source_connection)
        } else {
            (conn.target, conn.source, conn.target_connection)
        };
        let attach = self.connection_point(near, side)?;
        if !intersection {
            return Some(attach);
        }
        let from = self.position(near)?;
        let to = self.position(far)?;
        let sides = self.sides(near, false)?;
        let delta = to - from;
        let length = delta.length();
        if length <= 0.0 {
            return Some(attach);
        }
        let step = delta / length;
        let steps = length.floor() as usize;
        (1..=steps)
            .map(|i| from + step * i as f64)
            .find(|&p| !sides.contains(p))
            .or(Some(attach))
    }

    /// Re-points a connector whose two ends moved together.
    pub fn quick_translate(&mut self, id: ConnectorId) {
        self.quick_update(id);
    }

    /// Replaces the polyline with a straight line between the current attachment points.
    pub fn quick_update(&mut self, id: ConnectorId) {
        let (Some(source), Some(target)) = (
            self.connector_point(id, true, false),
            self.connector_point(id, false, false),
        ) else {
            return;
        };
        if let Some(conn) = self.connectors.get_mut(id.0) {
            conn.points = vec![source, target];
        }
    }
}
