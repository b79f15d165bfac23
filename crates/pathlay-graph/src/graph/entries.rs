//! Internal storage entries for [`PathwayGraph`](super::PathwayGraph).

use super::{EdgeData, VertexData};

#[derive(Debug, Clone)]
pub(in crate::graph) struct VertexEntry {
    pub(in crate::graph) name: String,
    pub(in crate::graph) data: VertexData,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry {
    pub(in crate::graph) source_ix: usize,
    pub(in crate::graph) target_ix: usize,
    pub(in crate::graph) data: EdgeData,
}
