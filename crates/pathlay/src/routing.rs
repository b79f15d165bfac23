//! Connector routing.
//!
//! [`ConnectorLayoutManager`] decides per update pass whether connectors are drawn as
//! straight two-point lines or handed to an obstacle-avoiding [`EdgeRouter`]. Routers are
//! stateless from the manager's point of view: every call receives the complete set of
//! obstacles and requests and builds whatever it needs from scratch.

use serde::{Deserialize, Serialize};

use crate::content::ConnectorId;
use crate::error::Result;
use crate::geometry::{Bounds, Point, point, segment_crosses};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoutingMode {
    /// Every connector is a straight line between its attachment points.
    #[default]
    Straight,
    /// Connectors are routed around node boxes.
    Avoid,
}

/// One connector to route.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub connector: ConnectorId,
    /// Attachment point on the source node.
    pub source: Point,
    /// Attachment point on the target node.
    pub target: Point,
    /// Bounding boxes of the two endpoint nodes; routers must not treat them as obstacles.
    pub source_box: Bounds,
    pub target_box: Bounds,
    /// Output polyline, from `source` to `target`.
    pub points: Vec<Point>,
}

impl RouteRequest {
    pub fn straight(&self) -> Vec<Point> {
        vec![self.source, self.target]
    }
}

/// Obstacle-avoiding router.
pub trait EdgeRouter {
    /// Sets `points` on every request. Must not keep state between calls.
    fn route(&self, obstacles: &[Bounds], requests: &mut [RouteRequest]) -> Result<()>;
}

pub struct ConnectorLayoutManager {
    mode: RoutingMode,
    router: Box<dyn EdgeRouter>,
}

impl std::fmt::Debug for ConnectorLayoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorLayoutManager")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Default for ConnectorLayoutManager {
    fn default() -> Self {
        Self::new(RoutingMode::default())
    }
}

impl ConnectorLayoutManager {
    pub fn new(mode: RoutingMode) -> Self {
        Self {
            mode,
            router: Box::new(ElbowRouter),
        }
    }

    pub fn with_router(mode: RoutingMode, router: Box<dyn EdgeRouter>) -> Self {
        Self { mode, router }
    }

    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RoutingMode) {
        self.mode = mode;
    }

    pub fn set_router(&mut self, router: Box<dyn EdgeRouter>) {
        self.router = router;
    }

    /// Whether the next pass needs node boxes at all.
    pub fn wants_obstacles(&self) -> bool {
        self.mode == RoutingMode::Avoid
    }

    /// Routes every request. With no node boxes all connectors become straight lines.
    pub fn layout(&self, requests: &mut [RouteRequest], node_boxes: &[Bounds]) -> Result<()> {
        if node_boxes.is_empty() {
            for r in requests.iter_mut() {
                r.points = r.straight();
            }
            return Ok(());
        }

        self.router.route(node_boxes, requests)?;

        for r in requests.iter_mut() {
            if r.points.len() < 2 {
                tracing::warn!(
                    connector = %r.connector,
                    points = r.points.len(),
                    "router returned a degenerate polyline; using a straight line"
                );
                r.points = r.straight();
            }
        }
        Ok(())
    }
}

/// Orthogonal router trying straight, L-shaped and Z-shaped candidates and keeping the one
/// crossing the fewest obstacles (then the fewest bends, then the shortest).
#[derive(Debug, Clone, Copy, Default)]
pub struct ElbowRouter;

impl EdgeRouter for ElbowRouter {
    fn route(&self, obstacles: &[Bounds], requests: &mut [RouteRequest]) -> Result<()> {
        for r in requests.iter_mut() {
            let (s, t) = (r.source, r.target);
            let mid_x = (s.x + t.x) / 2.0;
            let mid_y = (s.y + t.y) / 2.0;
            let candidates = [
                vec![s, t],
                vec![s, point(t.x, s.y), t],
                vec![s, point(s.x, t.y), t],
                vec![s, point(mid_x, s.y), point(mid_x, t.y), t],
                vec![s, point(s.x, mid_y), point(t.x, mid_y), t],
            ];
            let mut best: Option<((usize, usize, f64), Vec<Point>)> = None;
            for candidate in candidates {
                let path = compress_path(&candidate);
                let score = (
                    crossings(&path, obstacles, &r.source_box, &r.target_box),
                    path.len() - 1,
                    path_length(&path),
                );
                let better = match &best {
                    None => true,
                    Some((b, _)) => {
                        (score.0, score.1) < (b.0, b.1)
                            || ((score.0, score.1) == (b.0, b.1) && score.2 < b.2)
                    }
                };
                if better {
                    best = Some((score, path));
                }
            }
            r.points = best.map(|(_, p)| p).unwrap_or_else(|| r.straight());
        }
        Ok(())
    }
}

fn crossings(path: &[Point], obstacles: &[Bounds], from: &Bounds, to: &Bounds) -> usize {
    let mut count = 0usize;
    for segment in path.windows(2) {
        for obstacle in obstacles {
            if obstacle == from || obstacle == to {
                continue;
            }
            if segment_crosses(segment[0], segment[1], obstacle) {
                count += 1;
            }
        }
    }
    count
}

fn path_length(path: &[Point]) -> f64 {
    path.windows(2).map(|s| (s[1] - s[0]).length()).sum()
}

/// Drops repeated points and interior points lying on a straight run.
fn compress_path(points: &[Point]) -> Vec<Point> {
    const EPS: f64 = 1e-6;
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if let Some(&last) = out.last()
            && (p - last).length() <= EPS
        {
            continue;
        }
        if out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            let cross = (b.x - a.x) * (p.y - b.y) - (b.y - a.y) * (p.x - b.x);
            if cross.abs() <= EPS {
                out.pop();
            }
        }
        out.push(p);
    }
    if out.len() == 1 {
        out.push(out[0]);
    }
    out
}
