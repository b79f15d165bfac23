use pathlay::graph::{PathwayGraph, VertexId};
use pathlay::{ContainerKind, ContentStrategy, GraphLayout, Outcome, StyleSheet};

/// a -> r1 -> b -> r2 -> c
fn chain() -> (PathwayGraph, [VertexId; 5]) {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let r1 = g.add_reaction("r1", None);
    let b = g.add_species("b", None);
    let r2 = g.add_reaction("r2", None);
    let c = g.add_species("c", None);
    g.add_reactant(a, r1).unwrap();
    g.add_product(r1, b).unwrap();
    g.add_reactant(b, r2).unwrap();
    g.add_product(r2, c).unwrap();
    (g, [a, r1, b, r2, c])
}

#[test]
fn depth_zero_shows_only_the_roots() {
    let (g, [_, _, b, _, _]) = chain();
    let layout = GraphLayout::neighbourhood(g, StyleSheet::default(), &[b], 0).unwrap();
    assert_eq!(layout.clones_of(b).len(), 1);
    assert_eq!(layout.content_count(), 2);
    assert_eq!(layout.connector_count(), 0);
    assert_eq!(
        layout.strategy(layout.root()),
        Some(ContentStrategy::Neighbourhood)
    );
    assert_eq!(
        layout.container_kind(layout.root()),
        Some(ContainerKind::Neighbourhood)
    );
}

#[test]
fn negative_depths_show_only_the_roots() {
    for depth in [-1, i32::MIN] {
        let (g, [_, _, b, _, _]) = chain();
        let layout = GraphLayout::neighbourhood(g, StyleSheet::default(), &[b], depth).unwrap();
        assert_eq!(layout.content_count(), 2);
        assert_eq!(layout.connector_count(), 0);
    }
}

#[test]
fn last_hop_clones_are_wired_to_the_vertex_that_reached_them() {
    let (g, [a, r1, b, r2, c]) = chain();
    let layout = GraphLayout::neighbourhood(g, StyleSheet::default(), &[b], 1).unwrap();

    assert_eq!(layout.connector_count(), 2);
    for v in [r1, r2] {
        let clone = layout.clone_content(layout.clones_of(v)[0]).unwrap();
        assert_eq!(clone.neighbour_vertices(), &[b]);
    }
    assert!(layout.clones_of(a).is_empty());
    assert!(layout.clones_of(c).is_empty());
    let root_clone = layout.clone_content(layout.clones_of(b)[0]).unwrap();
    assert!(!root_clone.is_wired());
    assert_eq!(root_clone.connectors().len(), 2);
}

#[test]
fn deeper_views_expand_inner_clones_and_follow_edge_direction() {
    let (g, [a, r1, b, r2, c]) = chain();
    let mut layout = GraphLayout::neighbourhood(g, StyleSheet::default(), &[b], 2).unwrap();

    assert_eq!(layout.vertices().count(), 5);
    assert_eq!(layout.connector_count(), 4);
    for v in [r1, r2] {
        let clone = layout.clone_content(layout.clones_of(v)[0]).unwrap();
        assert!(!clone.is_wired());
        assert_eq!(clone.connectors().len(), 2);
    }
    let ca = layout.clones_of(a)[0];
    let cr1 = layout.clones_of(r1)[0];
    assert_eq!(layout.clone_content(ca).unwrap().neighbour_vertices(), &[r1]);
    assert_eq!(layout.clone_content(layout.clones_of(c)[0]).unwrap().neighbour_vertices(), &[r2]);

    // a -> r1 keeps its direction.
    let k = layout.clone_content(ca).unwrap().connectors()[0];
    let conn = layout.connector(k).unwrap();
    assert_eq!((conn.source(), conn.target()), (ca, cr1));

    layout.update(false, false).unwrap();
}

#[test]
fn shared_neighbours_are_reused_and_stand_for_every_root() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let r = g.add_reaction("r", None);
    g.add_reactant(a, r).unwrap();
    g.add_reactant(b, r).unwrap();

    let layout = GraphLayout::neighbourhood(g, StyleSheet::default(), &[a, b], 1).unwrap();
    assert_eq!(layout.clones_of(r).len(), 1);
    assert_eq!(layout.connector_count(), 2);
    let cr = layout.clones_of(r)[0];
    assert_eq!(layout.clone_content(cr).unwrap().neighbour_vertices(), &[a, b]);
}

#[test]
fn cloning_inside_a_neighbourhood_places_clones_next_to_their_neighbours() {
    let mut g = PathwayGraph::new();
    let atp = g.add_species("atp", None);
    let r1 = g.add_reaction("r1", None);
    let r2 = g.add_reaction("r2", None);
    g.add_reactant(atp, r1).unwrap();
    g.add_reactant(atp, r2).unwrap();

    let mut layout = GraphLayout::neighbourhood(g, StyleSheet::default(), &[atp], 1).unwrap();
    let root = layout.root();
    assert_eq!(layout.clone_vertex(atp).unwrap(), Outcome::Applied);
    assert_eq!(layout.clones_of(atp).len(), 2);
    for &c in layout.clones_of(atp) {
        assert_eq!(layout.container_of(c), Some(root));
    }
    assert_eq!(layout.content_count(), 5);
}
