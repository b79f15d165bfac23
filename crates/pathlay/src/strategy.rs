//! Container layout strategies.
//!
//! Clone groups, branches and triangles are placed by the small geometric layouts in this
//! module. Automatic, hierarchical and neighbourhood containers go through a replaceable
//! [`LayoutEngine`]; [`DefaultEngine`] is a dependency-free stand-in for a real graph layout
//! library.

use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};

use crate::content::ContentId;
use crate::error::Result;
use crate::geometry::{Point, Vector, point, vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentStrategy {
    /// Children keep whatever positions they have.
    #[default]
    None,
    Automatic,
    Hierarchy,
    /// Midgets on a ring around the core. Nested clone groups alternate `rotated`.
    Clone { rotated: bool },
    /// Leaves fanned out around the core, away from the trunk.
    Branch,
    /// Core and two trunks on a triangle.
    Triangle,
    Neighbourhood,
}

impl ContentStrategy {
    pub fn is_clone_group(self) -> bool {
        matches!(self, Self::Clone { .. })
    }

    /// Whether the children are placed by the [`LayoutEngine`] rather than by a built-in layout.
    pub fn uses_engine(self) -> bool {
        matches!(self, Self::Automatic | Self::Hierarchy | Self::Neighbourhood)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Automatic => "automatic",
            Self::Hierarchy => "hierarchy",
            Self::Clone { .. } => "clone",
            Self::Branch => "branch",
            Self::Triangle => "triangle",
            Self::Neighbourhood => "neighbourhood",
        }
    }
}

/// One child of the container being laid out.
#[derive(Debug, Clone)]
pub struct LayoutItem {
    pub content: ContentId,
    /// Full (margin-inclusive) size.
    pub width: f64,
    pub height: f64,
    /// Centre. Holds the current position on entry and the new one on exit.
    pub position: Point,
}

impl LayoutItem {
    fn radius(&self) -> f64 {
        (self.width * self.width + self.height * self.height).sqrt() / 2.0
    }
}

/// Everything a strategy may look at while placing the children of one container.
///
/// Strategies only move items; the set of children is fixed.
#[derive(Debug, Clone)]
pub struct LayoutFrame {
    pub container: ContentId,
    pub strategy: ContentStrategy,
    pub items: Vec<LayoutItem>,
    /// Index of the core item, if the container has one.
    pub core: Option<usize>,
    /// Connections between items, as `(source, target)` item indices.
    pub links: Vec<(usize, usize)>,
    /// Mean direction from the container towards the contents it connects to outside.
    pub outward: Option<Vector>,
    pub spacing: f64,
    pub ring_spacing: f64,
}

impl LayoutFrame {
    pub fn centroid(&self) -> Option<Point> {
        if self.items.is_empty() {
            return None;
        }
        let n = self.items.len() as f64;
        let (sx, sy) = self
            .items
            .iter()
            .fold((0.0, 0.0), |(x, y), i| (x + i.position.x, y + i.position.y));
        Some(point(sx / n, sy / n))
    }

    pub fn translate(&mut self, by: Vector) {
        for item in &mut self.items {
            item.position += by;
        }
    }

    fn cell(&self) -> (f64, f64) {
        let w = self.items.iter().map(|i| i.width).fold(0.0, f64::max);
        let h = self.items.iter().map(|i| i.height).fold(0.0, f64::max);
        (w + self.spacing, h + self.spacing)
    }
}

/// Places the children of Automatic, Hierarchy and Neighbourhood containers.
pub trait LayoutEngine {
    fn layout(&mut self, frame: &mut LayoutFrame) -> Result<()>;
}

/// Grid for Automatic, longest-path layering for Hierarchy, concentric rings for
/// Neighbourhood.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEngine;

impl LayoutEngine for DefaultEngine {
    fn layout(&mut self, frame: &mut LayoutFrame) -> Result<()> {
        match frame.strategy {
            ContentStrategy::Hierarchy => layered(frame),
            ContentStrategy::Neighbourhood => concentric(frame),
            _ => grid(frame),
        }
        Ok(())
    }
}

fn grid(frame: &mut LayoutFrame) {
    let n = frame.items.len();
    if n == 0 {
        return;
    }
    let cols = (n as f64).sqrt().ceil().max(1.0) as usize;
    let (cw, ch) = frame.cell();
    for (i, item) in frame.items.iter_mut().enumerate() {
        let (row, col) = (i / cols, i % cols);
        item.position = point(col as f64 * cw, row as f64 * ch);
    }
}

fn layered(frame: &mut LayoutFrame) {
    let n = frame.items.len();
    if n == 0 {
        return;
    }
    // Longest path from the sources; at most `n` relaxation rounds so cycles terminate.
    let mut rank = vec![0usize; n];
    for _ in 0..n {
        let mut changed = false;
        for &(s, t) in &frame.links {
            if s != t && rank[t] < rank[s] + 1 && rank[s] + 1 < n {
                rank[t] = rank[s] + 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let layers = rank.iter().copied().max().unwrap_or(0) + 1;
    let mut per_layer: Vec<Vec<usize>> = vec![Vec::new(); layers];
    for (i, &r) in rank.iter().enumerate() {
        per_layer[r].push(i);
    }
    let (cw, ch) = frame.cell();
    for (r, members) in per_layer.iter().enumerate() {
        let offset = (members.len() as f64 - 1.0) * cw / 2.0;
        for (slot, &i) in members.iter().enumerate() {
            frame.items[i].position = point(slot as f64 * cw - offset, r as f64 * ch);
        }
    }
}

fn concentric(frame: &mut LayoutFrame) {
    let n = frame.items.len();
    if n == 0 {
        return;
    }
    let start = frame.core.unwrap_or(0);
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(s, t) in &frame.links {
        if s != t {
            adjacency[s].push(t);
            adjacency[t].push(s);
        }
    }
    let mut depth: Vec<Option<usize>> = vec![None; n];
    depth[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(v) = queue.pop_front() {
        let d = depth[v].unwrap_or(0);
        for &w in &adjacency[v] {
            if depth[w].is_none() {
                depth[w] = Some(d + 1);
                queue.push_back(w);
            }
        }
    }
    // Disconnected items go on an outer ring.
    let max_depth = depth.iter().flatten().copied().max().unwrap_or(0);
    let depth: Vec<usize> = depth
        .into_iter()
        .map(|d| d.unwrap_or(max_depth + 1))
        .collect();

    let (cw, ch) = frame.cell();
    let step = cw.max(ch);
    let rings = depth.iter().copied().max().unwrap_or(0) + 1;
    for ring in 0..rings {
        let members: Vec<usize> = (0..n).filter(|&i| depth[i] == ring).collect();
        if ring == 0 {
            for &i in &members {
                frame.items[i].position = point(0.0, 0.0);
            }
            continue;
        }
        let radius = ring as f64 * step;
        let count = members.len().max(1) as f64;
        for (k, &i) in members.iter().enumerate() {
            let a = TAU * k as f64 / count;
            frame.items[i].position = point(radius * a.cos(), radius * a.sin());
        }
    }
}

/// Midgets evenly spread on a ring around the core; the core does not move.
pub(crate) fn clone_ring(frame: &mut LayoutFrame, rotated: bool) {
    let Some(core) = frame.core else {
        grid(frame);
        return;
    };
    let center = frame.items[core].position;
    let midgets: Vec<usize> = (0..frame.items.len()).filter(|&i| i != core).collect();
    if midgets.is_empty() {
        return;
    }
    let widest = midgets
        .iter()
        .map(|&i| frame.items[i].radius())
        .fold(0.0, f64::max);
    let radius = frame.items[core].radius() + widest + frame.ring_spacing;
    let step = TAU / midgets.len() as f64;
    // Alternate nesting levels start half a step apart so stacked rings interleave.
    let start = if rotated { step / 2.0 } else { 0.0 } - PI / 2.0;
    for (k, &i) in midgets.iter().enumerate() {
        let a = start + step * k as f64;
        frame.items[i].position = center + vector(radius * a.cos(), radius * a.sin());
    }
}

/// Leaves fanned out on the side of the core facing away from the trunk.
pub(crate) fn branch_fan(frame: &mut LayoutFrame) {
    let Some(core) = frame.core else {
        grid(frame);
        return;
    };
    let center = frame.items[core].position;
    let leaves: Vec<usize> = (0..frame.items.len()).filter(|&i| i != core).collect();
    if leaves.is_empty() {
        return;
    }
    let away = frame
        .outward
        .filter(|v| v.square_length() > 0.0)
        .map(|v| -v)
        .unwrap_or(vector(0.0, 1.0));
    let base = away.y.atan2(away.x);
    let widest = leaves
        .iter()
        .map(|&i| frame.items[i].radius())
        .fold(0.0, f64::max);
    let radius = frame.items[core].radius() + widest + frame.ring_spacing;
    let n = leaves.len();
    let step = if n > 1 {
        (PI / 4.0).min((4.0 * PI / 3.0) / (n as f64 - 1.0))
    } else {
        0.0
    };
    let first = base - step * (n as f64 - 1.0) / 2.0;
    for (k, &i) in leaves.iter().enumerate() {
        let a = first + step * k as f64;
        frame.items[i].position = center + vector(radius * a.cos(), radius * a.sin());
    }
}

/// Core on the apex, the two other items on the base; the centroid does not move.
pub(crate) fn triangle(frame: &mut LayoutFrame) {
    if frame.items.len() != 3 {
        clone_ring(frame, false);
        return;
    }
    let Some(center) = frame.centroid() else {
        return;
    };
    let core = frame.core.unwrap_or(0);
    let side = frame
        .items
        .iter()
        .map(LayoutItem::radius)
        .fold(0.0, f64::max)
        * 2.0
        + frame.spacing;
    let h = side * 3f64.sqrt() / 2.0;
    let mut base = [
        point(center.x - side / 2.0, center.y + h / 3.0),
        point(center.x + side / 2.0, center.y + h / 3.0),
    ]
    .into_iter();
    for i in 0..3 {
        if i == core {
            frame.items[i].position = point(center.x, center.y - 2.0 * h / 3.0);
        } else if let Some(p) = base.next() {
            frame.items[i].position = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(strategy: ContentStrategy, n: usize) -> LayoutFrame {
        LayoutFrame {
            container: ContentId(0),
            strategy,
            items: (0..n)
                .map(|i| LayoutItem {
                    content: ContentId(i + 1),
                    width: 20.0,
                    height: 10.0,
                    position: point(0.0, 0.0),
                })
                .collect(),
            core: None,
            links: Vec::new(),
            outward: None,
            spacing: 10.0,
            ring_spacing: 5.0,
        }
    }

    #[test]
    fn only_graph_strategies_go_through_the_engine() {
        assert!(ContentStrategy::Automatic.uses_engine());
        assert!(ContentStrategy::Hierarchy.uses_engine());
        assert!(ContentStrategy::Neighbourhood.uses_engine());
        assert!(!ContentStrategy::None.uses_engine());
        assert!(!ContentStrategy::Clone { rotated: true }.uses_engine());
        assert!(!ContentStrategy::Branch.uses_engine());
        assert!(!ContentStrategy::Triangle.uses_engine());
    }

    #[test]
    fn layered_puts_targets_below_sources() {
        let mut f = frame(ContentStrategy::Hierarchy, 3);
        f.links = vec![(0, 1), (1, 2)];
        layered(&mut f);
        assert!(f.items[0].position.y < f.items[1].position.y);
        assert!(f.items[1].position.y < f.items[2].position.y);
    }

    #[test]
    fn layered_terminates_on_cycles() {
        let mut f = frame(ContentStrategy::Hierarchy, 2);
        f.links = vec![(0, 1), (1, 0)];
        layered(&mut f);
        assert!(f.items.iter().all(|i| i.position.y.is_finite()));
    }

    #[test]
    fn clone_ring_keeps_the_core_and_surrounds_it() {
        let mut f = frame(ContentStrategy::Clone { rotated: false }, 4);
        f.core = Some(0);
        f.items[0].position = point(100.0, 100.0);
        clone_ring(&mut f, false);
        assert_eq!(f.items[0].position, point(100.0, 100.0));
        for item in &f.items[1..] {
            let d = (item.position - point(100.0, 100.0)).length();
            assert!(d > 20.0);
        }
    }

    #[test]
    fn triangle_keeps_the_centroid() {
        let mut f = frame(ContentStrategy::Triangle, 3);
        f.core = Some(1);
        f.items[0].position = point(0.0, 0.0);
        f.items[1].position = point(30.0, 0.0);
        f.items[2].position = point(60.0, 30.0);
        let before = f.centroid().unwrap();
        triangle(&mut f);
        let after = f.centroid().unwrap();
        assert!((before - after).length() < 1e-9);
        assert!(f.items[1].position.y < f.items[0].position.y);
    }
}
