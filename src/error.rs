use thiserror::Error;

/// Errors that can occur when configuring or running a search
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("No legal move available")]
    NoLegalMove,

    #[error("Board has zero width")]
    ZeroWidth,

    #[error("Search depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge { depth: usize, max: usize },

    #[error("Invalid search depth: {0}")]
    InvalidDepth(String),
}
