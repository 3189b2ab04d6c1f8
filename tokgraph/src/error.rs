use thiserror::Error;

/// Graph construction error.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("link source {index:?} is out of bounds for graph with {vertex_count:?} vertices")]
    SourceOutOfBounds { index: usize, vertex_count: usize },

    #[error("link target {index:?} is out of bounds for graph with {vertex_count:?} vertices")]
    TargetOutOfBounds { index: usize, vertex_count: usize },
}
