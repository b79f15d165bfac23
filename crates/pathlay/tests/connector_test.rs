use pathlay::graph::{EdgeData, PathwayGraph};
use pathlay::{ConnectorId, ContentId, GraphLayout, StyleSheet, point};

fn occurrences(layout: &GraphLayout<PathwayGraph>, clone: ContentId, k: ConnectorId) -> usize {
    layout
        .clone_content(clone)
        .map(|c| c.connectors().iter().filter(|&&x| x == k).count())
        .unwrap_or(0)
}

#[test]
fn endpoints_list_each_connector_exactly_once() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let ab = g.add_edge(a, b, EdgeData::new("Other")).unwrap();
    let aa = g.add_edge(a, a, EdgeData::new("Other")).unwrap();
    let mut layout = GraphLayout::new(g, StyleSheet::default());

    let ca = layout
        .create_clone(a, None, Vec::new(), point(0.0, 0.0))
        .unwrap();
    let cb = layout
        .create_clone(b, None, Vec::new(), point(100.0, 0.0))
        .unwrap();
    let k = layout.create_connector(ab, ca, cb).unwrap();
    let self_loop = layout.create_connector(aa, ca, ca).unwrap();

    assert_eq!(occurrences(&layout, ca, k), 1);
    assert_eq!(occurrences(&layout, cb, k), 1);
    assert_eq!(occurrences(&layout, ca, self_loop), 1);
    assert!(layout.connector(self_loop).unwrap().is_self_loop());
    assert!(layout.has_connector(ca, ab));
    assert!(layout.has_connector(cb, ab));
    assert!(!layout.has_connector(cb, aa));
    assert_eq!(layout.connectors_of_edge(ab), &[k]);

    let conn = layout.connector(k).unwrap();
    assert_eq!(conn.neighbour(ca), Some(cb));
    assert_eq!(conn.neighbour(cb), Some(ca));
    assert_eq!(conn.neighbour(layout.root()), None);
}

#[test]
fn rewiring_moves_the_connector_between_endpoint_lists() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let ab = g.add_edge(a, b, EdgeData::new("Other")).unwrap();
    let mut layout = GraphLayout::new(g, StyleSheet::default());

    let ca = layout
        .create_clone(a, None, Vec::new(), point(0.0, 0.0))
        .unwrap();
    let ca2 = layout
        .create_clone(a, None, Vec::new(), point(0.0, 80.0))
        .unwrap();
    let cb = layout
        .create_clone(b, None, Vec::new(), point(100.0, 0.0))
        .unwrap();
    let k = layout.create_connector(ab, ca, cb).unwrap();

    layout.set_source(k, ca2).unwrap();
    assert_eq!(occurrences(&layout, ca, k), 0);
    assert_eq!(occurrences(&layout, ca2, k), 1);
    assert_eq!(layout.connector(k).unwrap().source(), ca2);

    // Turning the connector into a self-loop and back keeps a single entry.
    layout.set_target(k, ca2).unwrap();
    assert_eq!(occurrences(&layout, ca2, k), 1);
    assert_eq!(occurrences(&layout, cb, k), 0);
    layout.set_target(k, cb).unwrap();
    assert_eq!(occurrences(&layout, ca2, k), 1);
    assert_eq!(occurrences(&layout, cb, k), 1);
}

#[test]
fn deleting_a_clone_deletes_its_connectors_everywhere() {
    let mut g = PathwayGraph::new();
    let hub = g.add_species("hub", None);
    let r1 = g.add_reaction("r1", None);
    let r2 = g.add_reaction("r2", None);
    let e1 = g.add_reactant(hub, r1).unwrap();
    let e2 = g.add_reactant(hub, r2).unwrap();
    let mut layout = GraphLayout::from_graph(g, StyleSheet::default()).unwrap();

    let c_hub = layout.clones_of(hub)[0];
    let c_r1 = layout.clones_of(r1)[0];
    let c_r2 = layout.clones_of(r2)[0];
    assert_eq!(layout.connector_count(), 2);

    layout.delete_clone(c_hub).unwrap();
    assert_eq!(layout.connector_count(), 0);
    assert!(layout.connectors_of_edge(e1).is_empty());
    assert!(layout.connectors_of_edge(e2).is_empty());
    assert!(layout.clone_content(c_r1).unwrap().connectors().is_empty());
    assert!(layout.clone_content(c_r2).unwrap().connectors().is_empty());
    assert!(layout.clones_of(hub).is_empty());
    assert!(layout.content(c_hub).is_none());
    assert!(!layout.children(layout.root()).contains(&c_hub));
}

#[test]
fn intersection_detection_stops_at_the_node_border() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let ab = g.add_edge(a, b, EdgeData::new("Other")).unwrap();
    let mut layout = GraphLayout::new(g, StyleSheet::default());
    let ca = layout
        .create_clone(a, None, Vec::new(), point(0.0, 0.0))
        .unwrap();
    let cb = layout
        .create_clone(b, None, Vec::new(), point(100.0, 0.0))
        .unwrap();
    let k = layout.create_connector(ab, ca, cb).unwrap();

    assert_eq!(layout.connector_point(k, true, false), Some(point(0.0, 0.0)));
    // Species boxes are 60 wide without margin.
    assert_eq!(layout.connector_point(k, true, true), Some(point(30.0, 0.0)));
    assert_eq!(layout.connector_point(k, false, true), Some(point(70.0, 0.0)));
}

#[test]
fn quick_update_and_quick_translate_agree() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let ab = g.add_edge(a, b, EdgeData::new("Other")).unwrap();
    let mut layout = GraphLayout::new(g, StyleSheet::default());
    let ca = layout
        .create_clone(a, None, Vec::new(), point(0.0, 0.0))
        .unwrap();
    let cb = layout
        .create_clone(b, None, Vec::new(), point(100.0, 0.0))
        .unwrap();
    let k = layout.create_connector(ab, ca, cb).unwrap();
    assert_eq!(
        layout.connector(k).unwrap().points(),
        &[point(0.0, 0.0), point(100.0, 0.0)]
    );

    layout.set_position(ca, point(0.0, 40.0)).unwrap();
    layout.quick_translate(k);
    let translated = layout.connector(k).unwrap().points().to_vec();
    layout.quick_update(k);
    assert_eq!(layout.connector(k).unwrap().points(), translated.as_slice());
    assert_eq!(translated, vec![point(0.0, 40.0), point(100.0, 0.0)]);
}

#[test]
fn moving_set_splits_connectors_into_inside_and_crossing() {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let c = g.add_species("c", None);
    let ab = g.add_edge(a, b, EdgeData::new("Other")).unwrap();
    let bc = g.add_edge(b, c, EdgeData::new("Other")).unwrap();
    let mut layout = GraphLayout::from_graph(g, StyleSheet::default()).unwrap();
    let (ca, cb) = (layout.clones_of(a)[0], layout.clones_of(b)[0]);
    let k_ab = layout.connectors_of_edge(ab)[0];
    let k_bc = layout.connectors_of_edge(bc)[0];

    layout.set_moving(&[ca, cb]);
    assert_eq!(layout.in_list(), &[k_ab]);
    assert_eq!(layout.out_list(), &[k_bc]);

    layout.set_position(cb, point(500.0, 500.0)).unwrap();
    layout.update(false, true).unwrap();
    assert_eq!(
        layout.connector(k_bc).unwrap().points()[0],
        point(500.0, 500.0)
    );
    assert_eq!(
        layout.connector(k_ab).unwrap().points()[1],
        point(500.0, 500.0)
    );

    layout.clear_moving();
    assert!(layout.in_list().is_empty());
    assert!(layout.out_list().is_empty());
}
