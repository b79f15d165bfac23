//! The read-only graph contract consumed by the layout core.

use std::fmt;
use std::sync::Arc;

/// Stable handle of a graph vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

/// Stable handle of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// What a vertex stands for, derived from its type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRole {
    /// Reaction / process node. These are directional: reactants enter one face, products
    /// leave the opposite one.
    Reaction,
    Species,
}

impl VertexRole {
    pub fn from_type_label(label: &str) -> Self {
        let label = label.trim();
        if ["reaction", "process", "transition"]
            .iter()
            .any(|k| label.eq_ignore_ascii_case(k))
        {
            Self::Reaction
        } else {
            Self::Species
        }
    }
}

/// What an edge stands for, derived from its type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeRole {
    Reactant,
    Product,
    Modifier,
    Other,
}

impl EdgeRole {
    pub fn from_type_label(label: &str) -> Self {
        let label = label.trim();
        let is = |k: &str| label.eq_ignore_ascii_case(k);
        if is("reactant") || is("substrate") {
            Self::Reactant
        } else if is("product") {
            Self::Product
        } else if is("modifier") || is("catalyst") || is("activator") || is("inhibitor") {
            Self::Modifier
        } else {
            Self::Other
        }
    }
}

/// Read access to a pathway graph.
///
/// Lookups of unknown handles return `None` / empty collections; callers routinely query
/// vertices a partial view does not display.
pub trait GraphModel {
    fn vertices(&self) -> Vec<VertexId>;

    fn edges(&self) -> Vec<EdgeId>;

    fn contains_vertex(&self, v: VertexId) -> bool;

    fn source(&self, e: EdgeId) -> Option<VertexId>;

    fn target(&self, e: EdgeId) -> Option<VertexId>;

    /// All edges having `v` as source or target, in insertion order. A self-loop is listed once.
    fn incident_edges(&self, v: VertexId) -> Vec<EdgeId>;

    fn vertex_label(&self, v: VertexId) -> Option<&str>;

    fn vertex_type(&self, v: VertexId) -> Option<&str>;

    fn edge_type(&self, e: EdgeId) -> Option<&str>;

    fn compartment(&self, v: VertexId) -> Option<&str>;

    fn opposite(&self, e: EdgeId, v: VertexId) -> Option<VertexId> {
        let s = self.source(e)?;
        let t = self.target(e)?;
        if s == v {
            Some(t)
        } else if t == v {
            Some(s)
        } else {
            None
        }
    }

    fn degree(&self, v: VertexId) -> usize {
        self.incident_edges(v).len()
    }

    /// Distinct neighbours of `v`, in the order their first edge was inserted.
    fn neighbours(&self, v: VertexId) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = Vec::new();
        for e in self.incident_edges(v) {
            if let Some(w) = self.opposite(e, v)
                && !out.contains(&w)
            {
                out.push(w);
            }
        }
        out
    }

    fn vertex_role(&self, v: VertexId) -> VertexRole {
        self.vertex_type(v)
            .map(VertexRole::from_type_label)
            .unwrap_or(VertexRole::Species)
    }

    fn edge_role(&self, e: EdgeId) -> EdgeRole {
        self.edge_type(e)
            .map(EdgeRole::from_type_label)
            .unwrap_or(EdgeRole::Other)
    }
}

macro_rules! forward_graph_model {
    ($($wrapper:ty),*) => {
        $(
            impl<G: GraphModel + ?Sized> GraphModel for $wrapper {
                fn vertices(&self) -> Vec<VertexId> {
                    (**self).vertices()
                }
                fn edges(&self) -> Vec<EdgeId> {
                    (**self).edges()
                }
                fn contains_vertex(&self, v: VertexId) -> bool {
                    (**self).contains_vertex(v)
                }
                fn source(&self, e: EdgeId) -> Option<VertexId> {
                    (**self).source(e)
                }
                fn target(&self, e: EdgeId) -> Option<VertexId> {
                    (**self).target(e)
                }
                fn incident_edges(&self, v: VertexId) -> Vec<EdgeId> {
                    (**self).incident_edges(v)
                }
                fn vertex_label(&self, v: VertexId) -> Option<&str> {
                    (**self).vertex_label(v)
                }
                fn vertex_type(&self, v: VertexId) -> Option<&str> {
                    (**self).vertex_type(v)
                }
                fn edge_type(&self, e: EdgeId) -> Option<&str> {
                    (**self).edge_type(e)
                }
                fn compartment(&self, v: VertexId) -> Option<&str> {
                    (**self).compartment(v)
                }
            }
        )*
    };
}

forward_graph_model!(&G, Arc<G>);
