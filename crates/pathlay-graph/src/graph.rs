//! In-memory pathway graph.
//!
//! Vertices are addressed by a unique external name (an SBML id, a database key, ...) and by
//! the dense [`VertexId`] handed out on insertion. Edges are directed and may be parallel.

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

use crate::model::{EdgeId, GraphModel, VertexId};

mod adj_cache;
mod entries;

use adj_cache::IncidenceCache;
use entries::{EdgeEntry, VertexEntry};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexData {
    pub label: String,
    /// Type label, e.g. `"Reaction"` or `"Species"`.
    pub type_label: String,
    pub compartment: Option<String>,
}

impl VertexData {
    pub fn new(type_label: impl Into<String>) -> Self {
        Self {
            type_label: type_label.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn in_compartment(mut self, compartment: impl Into<String>) -> Self {
        self.compartment = Some(compartment.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeData {
    /// Type label, e.g. `"Reactant"`, `"Product"` or `"Modifier"`.
    pub type_label: String,
}

impl EdgeData {
    pub fn new(type_label: impl Into<String>) -> Self {
        Self {
            type_label: type_label.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PathwayGraph {
    vertices: Vec<VertexEntry>,
    vertex_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry>,

    // Incidence queries dominate restructuring; the cache is rebuilt lazily after mutation.
    // Interior mutability keeps the query API on `&self`.
    incidence_gen: u64,
    incidence_cache: RefCell<Option<IncidenceCache>>,
}

impl Clone for PathwayGraph {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            vertex_index: self.vertex_index.clone(),
            edges: self.edges.clone(),
            incidence_gen: self.incidence_gen,
            incidence_cache: RefCell::new(None),
        }
    }
}

impl PathwayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate_incidence(&mut self) {
        self.incidence_gen = self.incidence_gen.wrapping_add(1);
        *self.incidence_cache.get_mut() = None;
    }

    fn with_incidence<R>(&self, f: impl FnOnce(&IncidenceCache) -> R) -> R {
        let generation = self.incidence_gen;
        let mut slot = self.incidence_cache.borrow_mut();
        let cache = match slot.take() {
            Some(c) if c.generation == generation => slot.insert(c),
            _ => {
                let ends: Vec<(usize, usize)> = self
                    .edges
                    .iter()
                    .map(|e| (e.source_ix, e.target_ix))
                    .collect();
                slot.insert(IncidenceCache::build(
                    generation,
                    self.vertices.len(),
                    &ends,
                ))
            }
        };
        f(cache)
    }

    /// Inserts a vertex, or replaces the data of the vertex already registered under `name`.
    pub fn add_vertex(&mut self, name: impl Into<String>, data: VertexData) -> VertexId {
        let name = name.into();
        if let Some(&idx) = self.vertex_index.get(&name) {
            self.vertices[idx].data = data;
            return VertexId(idx);
        }
        self.invalidate_incidence();
        let idx = self.vertices.len();
        self.vertices.push(VertexEntry {
            name: name.clone(),
            data,
        });
        self.vertex_index.insert(name, idx);
        VertexId(idx)
    }

    /// Inserts a directed edge. Returns `None` when either endpoint is unknown.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, data: EdgeData) -> Option<EdgeId> {
        if source.0 >= self.vertices.len() || target.0 >= self.vertices.len() {
            return None;
        }
        self.invalidate_incidence();
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            source_ix: source.0,
            target_ix: target.0,
            data,
        });
        Some(EdgeId(idx))
    }

    pub fn add_species(&mut self, name: &str, compartment: Option<&str>) -> VertexId {
        let mut data = VertexData::new("Species").with_label(name);
        data.compartment = compartment.map(str::to_string);
        self.add_vertex(name, data)
    }

    pub fn add_reaction(&mut self, name: &str, compartment: Option<&str>) -> VertexId {
        let mut data = VertexData::new("Reaction").with_label(name);
        data.compartment = compartment.map(str::to_string);
        self.add_vertex(name, data)
    }

    /// `species -> reaction` edge typed as a reactant.
    pub fn add_reactant(&mut self, species: VertexId, reaction: VertexId) -> Option<EdgeId> {
        self.add_edge(species, reaction, EdgeData::new("Reactant"))
    }

    /// `reaction -> species` edge typed as a product.
    pub fn add_product(&mut self, reaction: VertexId, species: VertexId) -> Option<EdgeId> {
        self.add_edge(reaction, species, EdgeData::new("Product"))
    }

    /// `species -> reaction` edge typed as a modifier.
    pub fn add_modifier(&mut self, species: VertexId, reaction: VertexId) -> Option<EdgeId> {
        self.add_edge(species, reaction, EdgeData::new("Modifier"))
    }

    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.vertex_index.get(name).map(|&idx| VertexId(idx))
    }

    pub fn vertex_name(&self, v: VertexId) -> Option<&str> {
        self.vertices.get(v.0).map(|e| e.name.as_str())
    }

    pub fn vertex(&self, v: VertexId) -> Option<&VertexData> {
        self.vertices.get(v.0).map(|e| &e.data)
    }

    pub fn vertex_mut(&mut self, v: VertexId) -> Option<&mut VertexData> {
        self.vertices.get_mut(v.0).map(|e| &mut e.data)
    }

    pub fn edge(&self, e: EdgeId) -> Option<&EdgeData> {
        self.edges.get(e.0).map(|e| &e.data)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn out_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.incident_edges(v)
            .into_iter()
            .filter(|&e| self.edges[e.0].source_ix == v.0)
            .collect()
    }

    pub fn in_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.incident_edges(v)
            .into_iter()
            .filter(|&e| self.edges[e.0].target_ix == v.0)
            .collect()
    }
}

impl GraphModel for PathwayGraph {
    fn vertices(&self) -> Vec<VertexId> {
        (0..self.vertices.len()).map(VertexId).collect()
    }

    fn edges(&self) -> Vec<EdgeId> {
        (0..self.edges.len()).map(EdgeId).collect()
    }

    fn contains_vertex(&self, v: VertexId) -> bool {
        v.0 < self.vertices.len()
    }

    fn source(&self, e: EdgeId) -> Option<VertexId> {
        self.edges.get(e.0).map(|e| VertexId(e.source_ix))
    }

    fn target(&self, e: EdgeId) -> Option<VertexId> {
        self.edges.get(e.0).map(|e| VertexId(e.target_ix))
    }

    fn incident_edges(&self, v: VertexId) -> Vec<EdgeId> {
        if !self.contains_vertex(v) {
            return Vec::new();
        }
        self.with_incidence(|cache| cache.edges(v.0).iter().copied().map(EdgeId).collect())
    }

    fn vertex_label(&self, v: VertexId) -> Option<&str> {
        self.vertex(v).map(|d| d.label.as_str())
    }

    fn vertex_type(&self, v: VertexId) -> Option<&str> {
        self.vertex(v).map(|d| d.type_label.as_str())
    }

    fn edge_type(&self, e: EdgeId) -> Option<&str> {
        self.edge(e).map(|d| d.type_label.as_str())
    }

    fn compartment(&self, v: VertexId) -> Option<&str> {
        self.vertex(v).and_then(|d| d.compartment.as_deref())
    }
}
