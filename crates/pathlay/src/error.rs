use crate::content::{ConnectorId, ContentId};
use pathlay_graph::VertexId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown content: {0}")]
    UnknownContent(ContentId),

    #[error("unknown connector: {0}")]
    UnknownConnector(ConnectorId),

    #[error("content {0} is not a clone")]
    NotAClone(ContentId),

    #[error("content {0} is not a container")]
    NotAContainer(ContentId),

    #[error("content {0} is not attached to a container")]
    Detached(ContentId),

    #[error("no container for compartment `{compartment}` encloses the clone of vertex {vertex}")]
    CompartmentNotFound {
        vertex: VertexId,
        compartment: String,
    },

    #[error("layout invariant violated: {0}")]
    InvariantViolation(String),

    #[error("layout engine failed on container {container}: {message}")]
    Engine { container: ContentId, message: String },

    #[error("edge router failed: {0}")]
    Routing(String),

    #[error("invalid style sheet: {0}")]
    StyleSheet(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
