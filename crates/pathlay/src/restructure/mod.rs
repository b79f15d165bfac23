//! Restructuring of the content tree in response to user actions.
//!
//! Every operation first builds a complete plan from the current tree and only then mutates
//! it. A request that does not make sense for the current structure is answered with
//! [`Outcome::Rejected`] and leaves the layout untouched; [`Error`] is reserved for broken
//! invariants.

mod branching;
mod cloning;
mod neighbourhood;

use std::fmt;

use pathlay_graph::{GraphModel, VertexId};

use crate::content::ContentId;
use crate::error::{Error, Result};
use crate::layout::GraphLayout;

/// Result of a restructuring request.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied => None,
            Self::Rejected(r) => Some(r),
        }
    }
}

/// Why a restructuring request was turned down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the vertex has no clone in this layout")]
    NoClone,
    #[error("the vertex must have exactly one clone to be split, it has {count}")]
    NotSingleClone { count: usize },
    #[error("the clone already stands for a subset of its neighbours")]
    AlreadyWired,
    #[error("a clone needs at least two connectors to be split")]
    TooFewConnections,
    #[error("a connector loops back onto the clone being split")]
    SelfLoop,
    #[error("the vertex has a single clone")]
    NotCloned,
    #[error("the clone is not attached to a container")]
    Detached,
    #[error("every neighbour lies inside the branch")]
    NoTrunk,
    #[error("{count} trunks; a branch has one and a triangle two")]
    TooManyTrunks { count: usize },
    #[error("leaves next to two trunks")]
    LeavesWithTwoTrunks,
    #[error("a single trunk and no leaves")]
    NoLeaves,
    #[error("the two trunks do not share the clone's container")]
    NoCommonAncestor,
    #[error("a neighbour already belongs to a triangle")]
    ConflictingTriangle,
    #[error("the neighbourhood spans several compartments")]
    CompartmentSpanning,
    #[error("the clone is not the core of a branch or triangle")]
    NotBranched,
}

/// Internal result of planning: either the request is turned down or something is broken.
#[derive(Debug)]
pub(crate) enum Check {
    Reject(Rejection),
    Fail(Error),
}

impl From<Rejection> for Check {
    fn from(r: Rejection) -> Self {
        Self::Reject(r)
    }
}

impl From<Error> for Check {
    fn from(e: Error) -> Self {
        Self::Fail(e)
    }
}

pub(crate) type Planned<T> = std::result::Result<T, Check>;

/// Turns a planning result into an [`Outcome`], logging the decision.
pub(crate) fn settle<S: fmt::Display>(
    operation: &'static str,
    subject: S,
    planned: Planned<()>,
) -> Result<Outcome> {
    match planned {
        Ok(()) => {
            tracing::debug!(operation, subject = %subject, "restructuring applied");
            Ok(Outcome::Applied)
        }
        Err(Check::Reject(reason)) => {
            tracing::debug!(operation, subject = %subject, %reason, "restructuring rejected");
            Ok(Outcome::Rejected(reason))
        }
        Err(Check::Fail(e)) => Err(e),
    }
}

impl<G: GraphModel> GraphLayout<G> {
    /// Splits the clone of `vertex` when it has exactly one un-wired clone; otherwise merges
    /// its clones into one un-wired clone.
    pub fn toggle_cloning(&mut self, vertex: VertexId) -> Result<Outcome> {
        let single_unwired = match self.clones_of(vertex) {
            [only] => self.clone_content(*only).is_some_and(|c| !c.is_wired()),
            _ => false,
        };
        if single_unwired || self.clones_of(vertex).is_empty() {
            self.clone_vertex(vertex)
        } else {
            self.unclone(vertex, None)
        }
    }

    /// Dissolves the branch or triangle `clone` belongs to, or tries to build one around it.
    pub fn toggle_branching(&mut self, clone: ContentId) -> Result<Outcome> {
        if self.clone_content(clone).is_none() {
            return Err(Error::NotAClone(clone));
        }
        if self.branch_container(clone).is_some() {
            self.unbranch(clone)
        } else {
            self.branch(clone)
        }
    }
}
