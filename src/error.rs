use std::path::PathBuf;

use crate::diagram_ast::{ClusterId, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown cluster: {0}")]
    UnknownCluster(ClusterId),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("syntax error in attribute list: unexpected `{context}`")]
    AttrSyntax { context: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("diagram has no root cluster")]
    MissingRoot,

    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate cluster id: {0}")]
    DuplicateCluster(ClusterId),

    #[error("cluster {cluster} has unknown parent {parent}")]
    UnknownParent { cluster: ClusterId, parent: ClusterId },

    #[error("cluster {0} is its own ancestor")]
    ClusterCycle(ClusterId),

    #[error("cluster {cluster} is listed {count} times as a member (expected {expected})")]
    MisplacedCluster {
        cluster: ClusterId,
        count: usize,
        expected: usize,
    },

    #[error("node {node} belongs to unknown cluster {cluster}")]
    OrphanNode { node: NodeId, cluster: ClusterId },

    #[error("node {node} is listed {count} times across clusters (expected once, in {parent})")]
    Misplaced {
        node: NodeId,
        parent: ClusterId,
        count: usize,
    },

    #[error("edge #{index} references missing node {node}")]
    DanglingEdge { index: usize, node: NodeId },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rendering engine `{engine}` is not available: {source}")]
    EngineUnavailable {
        engine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rendering engine `{engine}` failed ({status}): {stderr}")]
    EngineFailed {
        engine: String,
        status: String,
        stderr: String,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to render an invalid diagram: {0}")]
    InvalidDiagram(#[from] ValidationError),
}
