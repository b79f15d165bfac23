//! Branches (a core with its leaves fanned out away from a single trunk) and triangles (a core
//! between two trunks).

use pathlay_graph::GraphModel;

use super::{Outcome, Planned, Rejection, settle};
use crate::content::ContentId;
use crate::error::{Error, Result};
use crate::layout::GraphLayout;
use crate::strategy::ContentStrategy;

#[derive(Debug)]
enum BranchPlan {
    Branch { unit: ContentId, leaves: Vec<ContentId> },
    Triangle { unit: ContentId, trunks: [ContentId; 2] },
}

/// A neighbour of the unit being branched, as seen from the unit's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighbour {
    /// A sibling of the unit (or the sibling container holding the neighbour).
    Sibling(ContentId),
    /// A clone outside the unit's container.
    Outside(ContentId),
}

impl<G: GraphModel> GraphLayout<G> {
    /// What moves along with `clone`: the clone group it anchors, or the clone itself.
    pub(crate) fn clone_unit(&self, clone: ContentId) -> ContentId {
        match self.container_of(clone) {
            Some(parent)
                if parent != self.root
                    && self.strategy(parent).is_some_and(ContentStrategy::is_clone_group)
                    && self.core(parent) == Some(clone) =>
            {
                parent
            }
            _ => clone,
        }
    }

    /// The branch or triangle holding `clone`, looking past the clone group it sits in. The
    /// clone may be the core, a leaf or a trunk.
    pub fn branch_container(&self, clone: ContentId) -> Option<ContentId> {
        let mut parent = self.container_of(clone)?;
        if parent != self.root && self.strategy(parent).is_some_and(ContentStrategy::is_clone_group)
        {
            parent = self.container_of(parent)?;
        }
        let strategy = self.strategy(parent)?;
        matches!(strategy, ContentStrategy::Branch | ContentStrategy::Triangle).then_some(parent)
    }

    /// Gathers the leaves around `clone` into a branch, or closes a triangle over its two
    /// trunks.
    pub fn branch(&mut self, clone: ContentId) -> Result<Outcome> {
        let planned = self
            .plan_branch(clone)
            .and_then(|plan| Ok(self.apply_branch(plan)?));
        settle("branch", clone, planned)
    }

    fn plan_branch(&self, clone: ContentId) -> Planned<BranchPlan> {
        let own_vertex = self.clone_content(clone).ok_or(Error::NotAClone(clone))?.vertex;
        let unit = self.clone_unit(clone);
        let parent = self.container_of(unit).ok_or(Rejection::Detached)?;
        if self.strategy(parent) == Some(ContentStrategy::Triangle) {
            return Err(Rejection::ConflictingTriangle.into());
        }
        let own_compartment = self.graph.compartment(own_vertex);

        let mut neighbours: Vec<Neighbour> = Vec::new();
        for id in self.outer_connectors(unit) {
            let Some(conn) = self.connectors.get(id.0) else {
                continue;
            };
            let far = if self.is_descendant(conn.source, unit) {
                conn.target
            } else {
                conn.source
            };
            if let Some(c) = self.clone_content(far)
                && self.graph.compartment(c.vertex) != own_compartment
            {
                return Err(Rejection::CompartmentSpanning.into());
            }
            let n = match self.resolve_at(far, parent) {
                Some(sibling) => Neighbour::Sibling(sibling),
                None => Neighbour::Outside(far),
            };
            if !neighbours.contains(&n) {
                neighbours.push(n);
            }
        }

        let mut leaves = Vec::new();
        let mut trunks = Vec::new();
        for n in neighbours {
            match n {
                Neighbour::Sibling(s) if self.leads_only_into(s, unit) => leaves.push(s),
                other => trunks.push(other),
            }
        }

        match (trunks.as_slice(), leaves.len()) {
            ([], _) => Err(Rejection::NoTrunk.into()),
            ([_], 0) => Err(Rejection::NoLeaves.into()),
            ([_], _) => {
                if leaves
                    .iter()
                    .any(|&l| self.strategy(l) == Some(ContentStrategy::Triangle))
                {
                    return Err(Rejection::ConflictingTriangle.into());
                }
                Ok(BranchPlan::Branch { unit, leaves })
            }
            ([a, b], 0) => {
                let (Neighbour::Sibling(a), Neighbour::Sibling(b)) = (*a, *b) else {
                    return Err(Rejection::NoCommonAncestor.into());
                };
                if [a, b]
                    .iter()
                    .any(|&t| self.strategy(t) == Some(ContentStrategy::Triangle))
                {
                    return Err(Rejection::ConflictingTriangle.into());
                }
                Ok(BranchPlan::Triangle {
                    unit,
                    trunks: [a, b],
                })
            }
            ([_, _], _) => Err(Rejection::LeavesWithTwoTrunks.into()),
            (many, _) => Err(Rejection::TooManyTrunks { count: many.len() }.into()),
        }
    }

    /// Whether every connector leaving `content` ends inside `unit`.
    fn leads_only_into(&self, content: ContentId, unit: ContentId) -> bool {
        self.outer_connectors(content).iter().all(|id| {
            self.connectors.get(id.0).is_some_and(|conn| {
                self.is_descendant(conn.source, unit) || self.is_descendant(conn.target, unit)
            })
        })
    }

    fn apply_branch(&mut self, plan: BranchPlan) -> Result<()> {
        match plan {
            BranchPlan::Branch { unit, leaves } => {
                let branch = self.wrap(unit, ContentStrategy::Branch)?;
                for leaf in leaves {
                    self.add(branch, leaf, false)?;
                }
            }
            BranchPlan::Triangle { unit, trunks } => {
                let triangle = self.wrap(unit, ContentStrategy::Triangle)?;
                for trunk in trunks {
                    self.add(triangle, trunk, false)?;
                }
            }
        }
        Ok(())
    }

    /// Dissolves the branch or triangle `clone` belongs to, whatever its role in it.
    pub fn unbranch(&mut self, clone: ContentId) -> Result<Outcome> {
        if self.clone_content(clone).is_none() {
            return Err(Error::NotAClone(clone));
        }
        let planned: Planned<()> = match self.branch_container(clone) {
            None => Err(Rejection::NotBranched.into()),
            Some(container) => self.collapse_container(container).map_err(Into::into),
        };
        settle("unbranch", clone, planned)
    }
}
