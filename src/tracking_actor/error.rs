use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TrackingError {
    #[error("No tracking for order {0}")]
    NotFound(String),
    #[error("Tracking already exists for order {0}")]
    DuplicateOrder(String),
    #[error("Tracking store unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<FrameworkError<TrackingError>> for TrackingError {
    fn from(err: FrameworkError<TrackingError>) -> Self {
        match err {
            FrameworkError::Rejected(err) => err,
            FrameworkError::NotFound(id) => TrackingError::NotFound(id),
            FrameworkError::AlreadyExists(id) => TrackingError::DuplicateOrder(id),
            other => TrackingError::StorageUnavailable(other.to_string()),
        }
    }
}
