use crate::portfolio::Position;
use thiserror::Error;

/// A cycle failure the loop cannot recover from
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("position invariant violated: {0:?}")]
    InconsistentPosition(Position),
}
