//! Pathway graph model used by `pathlay`.
//!
//! The layout core only ever reads a graph: vertices, edges, their type labels and the
//! compartment each vertex lives in. [`GraphModel`] captures that read contract and
//! [`PathwayGraph`] is the in-memory implementation used by tests and embedders that do not
//! bring their own graph store.

mod graph;
mod model;

pub use graph::{EdgeData, PathwayGraph, VertexData};
pub use model::{EdgeId, EdgeRole, GraphModel, VertexId, VertexRole};
