//! Incidence cache used by [`PathwayGraph`](super::PathwayGraph).
//!
//! Orientation inference and restructuring query the incident edges of the same vertices
//! over and over; scanning every edge per query is O(E).

#[derive(Debug, Clone)]
pub(in crate::graph) struct IncidenceCache {
    pub(in crate::graph) generation: u64,
    pub(in crate::graph) offsets: Vec<usize>,
    pub(in crate::graph) edges: Vec<usize>,
}

impl IncidenceCache {
    pub(in crate::graph) fn build(generation: u64, vertex_count: usize, ends: &[(usize, usize)]) -> Self {
        let mut counts = vec![0usize; vertex_count + 1];
        for &(s, t) in ends {
            counts[s + 1] += 1;
            if t != s {
                counts[t + 1] += 1;
            }
        }
        for i in 1..counts.len() {
            counts[i] += counts[i - 1];
        }
        let offsets = counts.clone();
        let mut cursor = counts;
        let mut edges = vec![0usize; offsets[vertex_count]];
        for (edge_ix, &(s, t)) in ends.iter().enumerate() {
            edges[cursor[s]] = edge_ix;
            cursor[s] += 1;
            if t != s {
                edges[cursor[t]] = edge_ix;
                cursor[t] += 1;
            }
        }
        Self {
            generation,
            offsets,
            edges,
        }
    }

    pub(in crate::graph) fn edges(&self, v_ix: usize) -> &[usize] {
        let start = self.offsets[v_ix];
        let end = self.offsets[v_ix + 1];
        &self.edges[start..end]
    }
}
