use crate::core::forcefield::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Coordinate buffer holds {actual} values but {expected} were expected")]
    CoordinateMismatch { expected: usize, actual: usize },

    #[error("Energy model error: {0}")]
    Model(#[from] ModelError),
}
