//! Splitting a vertex into one clone per connector, and merging the clones back.

use pathlay_graph::{GraphModel, VertexId};

use super::{Outcome, Planned, Rejection, settle};
use crate::content::{ConnectorId, ContainerKind, ContentId};
use crate::error::{Error, Result};
use crate::geometry::{Point, point, vector};
use crate::layout::GraphLayout;
use crate::strategy::ContentStrategy;

/// Where the clone drawn for one connector goes.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Into the clone group anchored on this neighbour, created if needed.
    Group(ContentId),
    /// Straight into this container.
    Direct(ContentId),
}

#[derive(Debug)]
struct SplitStep {
    connector: ConnectorId,
    neighbour_vertex: VertexId,
    placement: Placement,
    at: Point,
}

#[derive(Debug)]
struct SplitPlan {
    old: ContentId,
    /// Containers to dissolve before placing the new clones.
    collapse: Vec<ContentId>,
    steps: Vec<SplitStep>,
}

#[derive(Debug)]
enum MergePlan {
    /// A lone wired clone only drops its wiring.
    Unwire(ContentId),
    Merge {
        clones: Vec<ContentId>,
        target: ContentId,
        at: Point,
    },
}

impl<G: GraphModel> GraphLayout<G> {
    /// Replaces the single clone of `vertex` by one clone per connector, each wired to the
    /// neighbour at the other end and grouped with it.
    pub fn clone_vertex(&mut self, vertex: VertexId) -> Result<Outcome> {
        let planned = self
            .plan_split(vertex)
            .and_then(|plan| Ok(self.apply_split(vertex, plan)?));
        settle("clone", vertex, planned)
    }

    fn plan_split(&self, vertex: VertexId) -> Planned<SplitPlan> {
        let old = match self.clones_of(vertex) {
            [] => return Err(Rejection::NoClone.into()),
            [only] => *only,
            many => {
                return Err(Rejection::NotSingleClone { count: many.len() }.into());
            }
        };
        let clone = self.clone_content(old).ok_or(Error::NotAClone(old))?;
        if clone.is_wired() {
            return Err(Rejection::AlreadyWired.into());
        }
        if clone.connectors.len() < 2 {
            return Err(Rejection::TooFewConnections.into());
        }
        let parent = self.container_of(old).ok_or(Rejection::Detached)?;
        let origin = clone.position;
        let own_compartment = self.graph.compartment(vertex);

        let mut steps = Vec::with_capacity(clone.connectors.len());
        for &id in &clone.connectors {
            let conn = self.connectors.get(id.0).ok_or(Error::UnknownConnector(id))?;
            if conn.is_self_loop() {
                return Err(Rejection::SelfLoop.into());
            }
            let neighbour = conn.neighbour(old).ok_or_else(|| {
                Error::InvariantViolation(format!("{id} is listed by {old} but does not touch it"))
            })?;
            let neighbour_clone = self
                .clone_content(neighbour)
                .ok_or(Error::NotAClone(neighbour))?;
            let neighbour_vertex = neighbour_clone.vertex;
            let neighbour_at = neighbour_clone.position;

            let placement = match self.container_of(neighbour) {
                Some(c) if self.container_kind(c) == Some(ContainerKind::Neighbourhood) => {
                    Placement::Direct(c)
                }
                _ if self.graph.compartment(neighbour_vertex) != own_compartment => {
                    let home = self
                        .compartment_ancestor(old, own_compartment)
                        .ok_or_else(|| Error::CompartmentNotFound {
                            vertex,
                            compartment: own_compartment.unwrap_or_default().to_string(),
                        })?;
                    Placement::Direct(home)
                }
                _ => Placement::Group(neighbour),
            };

            let away = origin - neighbour_at;
            let dir = if away.square_length() > 0.0 {
                away / away.length()
            } else {
                vector(0.0, -1.0)
            };
            steps.push(SplitStep {
                connector: id,
                neighbour_vertex,
                placement,
                at: neighbour_at + dir * self.style.spacing.clone_distance,
            });
        }

        let mut collapse = Vec::new();
        if self.strategy(parent) == Some(ContentStrategy::Triangle) {
            collapse.push(parent);
        } else if self.strategy(parent).is_some_and(ContentStrategy::is_clone_group)
            && self.core(parent) == Some(old)
        {
            collapse.push(parent);
        }
        Ok(SplitPlan {
            old,
            collapse,
            steps,
        })
    }

    fn apply_split(&mut self, vertex: VertexId, plan: SplitPlan) -> Result<()> {
        for container in plan.collapse {
            self.collapse_container(container)?;
        }
        let old_parent = self.container_of(plan.old);
        for step in plan.steps {
            let container = match step.placement {
                Placement::Direct(c) => c,
                Placement::Group(neighbour) => self.ensure_clone_group(neighbour)?,
            };
            let new = self.create_clone(vertex, Some(container), vec![step.neighbour_vertex], step.at)?;
            self.replace_endpoint(step.connector, plan.old, new)?;
        }
        self.delete_clone(plan.old)?;
        if let Some(parent) = old_parent {
            self.tidy_container(parent)?;
        }
        Ok(())
    }

    /// The clone group anchored on `core`, wrapping it into a new one if needed.
    fn ensure_clone_group(&mut self, core: ContentId) -> Result<ContentId> {
        if let Some(parent) = self.container_of(core)
            && self.strategy(parent).is_some_and(ContentStrategy::is_clone_group)
            && self.core(parent) == Some(core)
        {
            return Ok(parent);
        }
        self.wrap(core, ContentStrategy::Clone { rotated: false })
    }

    fn replace_endpoint(&mut self, id: ConnectorId, old: ContentId, new: ContentId) -> Result<()> {
        let conn = self.connectors.get(id.0).ok_or(Error::UnknownConnector(id))?;
        let (at_source, at_target) = (conn.source == old, conn.target == old);
        if at_source {
            self.set_source(id, new)?;
        }
        if at_target {
            self.set_target(id, new)?;
        }
        Ok(())
    }

    /// Merges every clone of `vertex` into one, placed in the innermost container holding all
    /// of them, at `preferred`'s position or else at the clones' centroid. A single wired clone
    /// becomes un-wired in place.
    pub fn unclone(&mut self, vertex: VertexId, preferred: Option<ContentId>) -> Result<Outcome> {
        let planned = self
            .plan_merge(vertex, preferred)
            .and_then(|plan| Ok(self.apply_merge(vertex, plan)?));
        settle("unclone", vertex, planned)
    }

    fn plan_merge(&self, vertex: VertexId, preferred: Option<ContentId>) -> Planned<MergePlan> {
        let clones = self.clones_of(vertex).to_vec();
        match clones.as_slice() {
            [] => return Err(Rejection::NoClone.into()),
            [only] => {
                let clone = self.clone_content(*only).ok_or(Error::NotAClone(*only))?;
                return if clone.is_wired() {
                    Ok(MergePlan::Unwire(*only))
                } else {
                    Err(Rejection::NotCloned.into())
                };
            }
            _ => {}
        }
        if let Some(p) = preferred
            && !clones.contains(&p)
        {
            return Err(Error::InvariantViolation(format!("{p} is not a clone of vertex {vertex}")).into());
        }

        // A midget is represented by its clone group when looking for the common container.
        let mut units: Vec<ContentId> = Vec::with_capacity(clones.len());
        for &c in &clones {
            let parent = self.container_of(c).ok_or(Rejection::Detached)?;
            let in_group = self.strategy(parent).is_some_and(ContentStrategy::is_clone_group)
                && self.core(parent) != Some(c);
            let unit = if in_group {
                if parent == self.root {
                    return Err(Error::InvariantViolation(
                        "the clone group of a midget is the root container".to_string(),
                    )
                    .into());
                }
                parent
            } else {
                c
            };
            if !units.contains(&unit) {
                units.push(unit);
            }
        }
        let target = self.common_ancestor(&units).ok_or_else(|| {
            Error::InvariantViolation(format!("the clones of vertex {vertex} share no container"))
        })?;

        let at = match preferred.and_then(|p| self.position(p)) {
            Some(p) => p,
            None => {
                let (sx, sy, n) = clones
                    .iter()
                    .filter_map(|&c| self.position(c))
                    .fold((0.0, 0.0, 0usize), |(x, y, n), p| (x + p.x, y + p.y, n + 1));
                if n == 0 {
                    point(0.0, 0.0)
                } else {
                    point(sx / n as f64, sy / n as f64)
                }
            }
        };
        Ok(MergePlan::Merge { clones, target, at })
    }

    fn apply_merge(&mut self, vertex: VertexId, plan: MergePlan) -> Result<()> {
        let (clones, target, at) = match plan {
            MergePlan::Unwire(clone) => return self.set_neighbour_vertices(clone, Vec::new()),
            MergePlan::Merge { clones, target, at } => (clones, target, at),
        };
        let merged = self.create_clone(vertex, Some(target), Vec::new(), at)?;
        let mut parents = Vec::with_capacity(clones.len());
        for &old in &clones {
            let incident: Vec<ConnectorId> = self
                .clone_content(old)
                .map(|c| c.connectors.clone())
                .unwrap_or_default();
            for id in incident {
                self.replace_endpoint(id, old, merged)?;
            }
            if let Some(parent) = self.container_of(old) {
                parents.push(parent);
            }
        }
        for &old in &clones {
            self.delete_clone(old)?;
        }
        for parent in parents {
            self.tidy_container(parent)?;
        }
        Ok(())
    }
}
