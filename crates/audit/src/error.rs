use thiserror::Error;

use bastion_core::{DomainError, InfraError, PublicFailure, ToPublicFailure};

/// Failure of an audit log write.
///
/// Validation failures happen before any write is attempted. Store failures
/// are passed through unchanged; the recorder never swallows them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] InfraError),
}

impl ToPublicFailure for AuditError {
    fn to_public_failure(&self) -> PublicFailure {
        match self {
            AuditError::Validation(e) => e.to_public_failure(),
            AuditError::Store(e) => e.to_public_failure(),
        }
    }
}
