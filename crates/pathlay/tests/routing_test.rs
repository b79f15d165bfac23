use std::cell::Cell;
use std::rc::Rc;

use pathlay::geometry::segment_crosses;
use pathlay::graph::{EdgeData, PathwayGraph};
use pathlay::{
    Bounds, ConnectorId, ConnectorLayoutManager, ContentStrategy, EdgeRouter, Error, GraphLayout,
    RouteRequest, RoutingMode, StyleSheet, bounds, point,
};

fn request(source: (f64, f64), target: (f64, f64)) -> RouteRequest {
    let (s, t) = (point(source.0, source.1), point(target.0, target.1));
    RouteRequest {
        connector: ConnectorId::from_raw(0),
        source: s,
        target: t,
        source_box: bounds(s.x - 5.0, s.y - 5.0, s.x + 5.0, s.y + 5.0),
        target_box: bounds(t.x - 5.0, t.y - 5.0, t.x + 5.0, t.y + 5.0),
        points: Vec::new(),
    }
}

struct Recording {
    calls: Rc<Cell<usize>>,
    points: usize,
}

impl EdgeRouter for Recording {
    fn route(&self, _obstacles: &[Bounds], requests: &mut [RouteRequest]) -> pathlay::Result<()> {
        self.calls.set(self.calls.get() + 1);
        for r in requests.iter_mut() {
            r.points = std::iter::repeat_n(r.source, self.points).collect();
        }
        Ok(())
    }
}

struct Broken;

impl EdgeRouter for Broken {
    fn route(&self, _obstacles: &[Bounds], _requests: &mut [RouteRequest]) -> pathlay::Result<()> {
        Err(Error::Routing("router crashed".to_string()))
    }
}

#[test]
fn without_node_boxes_every_connector_is_straight() {
    let calls = Rc::new(Cell::new(0));
    let manager = ConnectorLayoutManager::with_router(
        RoutingMode::Avoid,
        Box::new(Recording {
            calls: calls.clone(),
            points: 3,
        }),
    );
    let mut requests = vec![request((0.0, 0.0), (10.0, 20.0))];
    manager.layout(&mut requests, &[]).unwrap();
    assert_eq!(requests[0].points, vec![point(0.0, 0.0), point(10.0, 20.0)]);
    assert_eq!(calls.get(), 0);
}

#[test]
fn degenerate_router_output_falls_back_to_a_straight_line() {
    let calls = Rc::new(Cell::new(0));
    let manager = ConnectorLayoutManager::with_router(
        RoutingMode::Avoid,
        Box::new(Recording {
            calls: calls.clone(),
            points: 1,
        }),
    );
    let mut requests = vec![request((0.0, 0.0), (10.0, 20.0))];
    let boxes = [requests[0].source_box, requests[0].target_box];
    manager.layout(&mut requests, &boxes).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(requests[0].points, vec![point(0.0, 0.0), point(10.0, 20.0)]);
}

#[test]
fn router_errors_are_returned() {
    let manager = ConnectorLayoutManager::with_router(RoutingMode::Avoid, Box::new(Broken));
    let mut requests = vec![request((0.0, 0.0), (10.0, 20.0))];
    let boxes = [requests[0].source_box];
    assert!(matches!(
        manager.layout(&mut requests, &boxes),
        Err(Error::Routing(_))
    ));
}

fn three_in_a_row() -> (GraphLayout<PathwayGraph>, ConnectorId, Bounds) {
    let mut g = PathwayGraph::new();
    let a = g.add_species("a", None);
    let b = g.add_species("b", None);
    let blocker = g.add_species("blocker", None);
    let ab = g.add_edge(a, b, EdgeData::new("Other")).unwrap();
    let mut layout = GraphLayout::new(g, StyleSheet::default());
    let root = layout.root();
    layout.set_strategy(root, ContentStrategy::None).unwrap();
    let ca = layout
        .create_clone(a, None, Vec::new(), point(0.0, 0.0))
        .unwrap();
    let cb = layout
        .create_clone(b, None, Vec::new(), point(200.0, 100.0))
        .unwrap();
    let cx = layout
        .create_clone(blocker, None, Vec::new(), point(100.0, 50.0))
        .unwrap();
    let k = layout.create_connector(ab, ca, cb).unwrap();
    let blocker_box = layout.bounding_rect(cx).unwrap();
    (layout, k, blocker_box)
}

#[test]
fn avoid_mode_routes_around_other_nodes() {
    let (mut layout, k, blocker_box) = three_in_a_row();
    layout.set_routing_mode(RoutingMode::Avoid);
    layout.update(true, false).unwrap();

    let points = layout.connector(k).unwrap().points().to_vec();
    assert!(points.len() >= 3);
    assert_eq!(points.first(), Some(&point(0.0, 0.0)));
    assert_eq!(points.last(), Some(&point(200.0, 100.0)));
    for segment in points.windows(2) {
        assert!(!segment_crosses(segment[0], segment[1], &blocker_box));
    }
}

#[test]
fn straight_mode_never_calls_the_router() {
    let (mut layout, k, _) = three_in_a_row();
    let calls = Rc::new(Cell::new(0));
    layout.set_router(Box::new(Recording {
        calls: calls.clone(),
        points: 4,
    }));
    assert_eq!(layout.connector_layout().mode(), RoutingMode::Straight);
    layout.update(true, false).unwrap();
    assert_eq!(calls.get(), 0);
    assert_eq!(layout.connector(k).unwrap().points().len(), 2);

    layout.set_routing_mode(RoutingMode::Avoid);
    layout.update(true, false).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(layout.connector(k).unwrap().points().len(), 4);
}
