#![forbid(unsafe_code)]

//! Headless layout core for metabolic pathway maps.
//!
//! A [`GraphLayout`] arranges the vertices of a pathway graph as a tree of nested containers
//! holding clones (on-canvas instances of a vertex; one vertex may be drawn several times to
//! cut edge crossings) joined by connectors. Container geometry is derived from the children
//! and recomputed lazily. The restructuring operations (clone/unclone, branch/unbranch) rewrite
//! that tree and either apply completely or are rejected without touching it.
//!
//! Placement of children and routing of connectors are pluggable through [`LayoutEngine`] and
//! [`EdgeRouter`].

mod clone;
mod connector;
mod container;
pub mod content;
pub mod error;
pub mod geometry;
mod layout;
pub mod restructure;
pub mod routing;
pub mod strategy;
pub mod style;

pub use pathlay_graph as graph;

pub use connector::Connector;
pub use content::{
    CloneContent, ConnectorId, ContainerContent, ContainerKind, Content, ContentBody, ContentId,
};
pub use error::{Error, Result};
pub use geometry::{Bounds, ConnectionType, Point, Sides, Size, Vector, bounds, point, vector};
pub use layout::GraphLayout;
pub use restructure::{Outcome, Rejection};
pub use routing::{ConnectorLayoutManager, EdgeRouter, ElbowRouter, RouteRequest, RoutingMode};
pub use strategy::{ContentStrategy, DefaultEngine, LayoutEngine, LayoutFrame, LayoutItem};
pub use style::{CloneKind, ContainerStyle, NodeShape, NodeStyle, SpacingStyle, StyleSheet};
