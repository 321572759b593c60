//! Service-level errors

use linkshard_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller supplied bad input
    #[error("{0}")]
    Validation(String),

    /// Shard access failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
