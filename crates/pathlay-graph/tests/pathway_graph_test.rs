use pathlay_graph::{EdgeData, EdgeRole, GraphModel, PathwayGraph, VertexData, VertexRole};

#[test]
fn re_adding_a_vertex_replaces_its_data_and_keeps_the_handle() {
    let mut g = PathwayGraph::new();
    let a = g.add_vertex("a", VertexData::new("Species"));
    let again = g.add_vertex("a", VertexData::new("Species").in_compartment("cytosol"));

    assert_eq!(a, again);
    assert_eq!(g.vertex_count(), 1);
    assert_eq!(g.compartment(a), Some("cytosol"));
    assert_eq!(g.vertex_by_name("a"), Some(a));
    assert_eq!(g.vertex_by_name("missing"), None);
}

#[test]
fn edges_to_unknown_vertices_are_refused() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    assert!(
        g.add_edge(a, pathlay_graph::VertexId(7), EdgeData::new("Reactant"))
            .is_none()
    );
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn incident_edges_follow_insertion_order_and_track_mutation() {
    let mut g = PathwayGraph::new();
    let glc = g.add_species("glc", None);
    let g6p = g.add_species("g6p", None);
    let atp = g.add_species("atp", None);
    let hk = g.add_reaction("hexokinase", None);

    let e1 = g.add_reactant(glc, hk).unwrap();
    let e2 = g.add_reactant(atp, hk).unwrap();
    assert_eq!(g.incident_edges(hk), vec![e1, e2]);

    // The cache must be rebuilt after another edge lands.
    let e3 = g.add_product(hk, g6p).unwrap();
    assert_eq!(g.incident_edges(hk), vec![e1, e2, e3]);
    assert_eq!(g.degree(hk), 3);
    assert_eq!(g.in_edges(hk), vec![e1, e2]);
    assert_eq!(g.out_edges(hk), vec![e3]);
    assert_eq!(g.neighbours(hk), vec![glc, atp, g6p]);
    assert_eq!(g.opposite(e3, hk), Some(g6p));
    assert_eq!(g.opposite(e3, glc), None);
}

#[test]
fn self_loops_are_incident_once() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let e = g.add_edge(a, a, EdgeData::new("Other")).unwrap();
    assert_eq!(g.incident_edges(a), vec![e]);
    assert_eq!(g.neighbours(a), vec![a]);
}

#[test]
fn roles_are_derived_from_type_labels() {
    let mut g = PathwayGraph::new();
    let s = g.add_species("s", None);
    let r = g.add_reaction("r", None);
    let m = g.add_species("m", None);
    let reactant = g.add_reactant(s, r).unwrap();
    let modifier = g.add_modifier(m, r).unwrap();
    let product = g.add_product(r, s).unwrap();
    let other = g.add_edge(s, m, EdgeData::new("binding")).unwrap();

    assert_eq!(g.vertex_role(r), VertexRole::Reaction);
    assert_eq!(g.vertex_role(s), VertexRole::Species);
    assert_eq!(g.edge_role(reactant), EdgeRole::Reactant);
    assert_eq!(g.edge_role(product), EdgeRole::Product);
    assert_eq!(g.edge_role(modifier), EdgeRole::Modifier);
    assert_eq!(g.edge_role(other), EdgeRole::Other);

    assert_eq!(VertexRole::from_type_label(" process "), VertexRole::Reaction);
    assert_eq!(EdgeRole::from_type_label("SUBSTRATE"), EdgeRole::Reactant);
    assert_eq!(EdgeRole::from_type_label("Catalyst"), EdgeRole::Modifier);
}

#[test]
fn shared_references_forward_the_model() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", Some("cytosol"));
    let shared = std::sync::Arc::new(g);
    let by_ref: &PathwayGraph = &shared;

    assert_eq!(shared.compartment(a), Some("cytosol"));
    assert_eq!(GraphModel::vertices(&by_ref), vec![a]);
}
