//! Error model shared by the permission and audit crates.

use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures. Storage concerns are
/// reported through [`InfraError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a required field was blank).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Infrastructure failure raised by a storage collaborator.
///
/// Components that touch storage propagate this unmodified; only the
/// permission guard converts it into a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InfraError {
    /// The backing store could not be reached or the query failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A referential-integrity rule of the store was violated.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// A stored row could not be decoded into its domain shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl InfraError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Externally visible failure shape.
///
/// Carries a status code and fixed texts only. Nothing from the underlying
/// error (messages, identifiers, resource names) ends up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PublicFailure {
    pub status: u16,
    pub code: &'static str,
    pub message: &'static str,
}

impl PublicFailure {
    pub const FORBIDDEN: Self = Self {
        status: 403,
        code: "forbidden",
        message: "Forbidden",
    };

    pub const BAD_REQUEST: Self = Self {
        status: 400,
        code: "bad_request",
        message: "Bad Request",
    };

    pub const INTERNAL: Self = Self {
        status: 500,
        code: "internal_error",
        message: "Internal Server Error",
    };

    /// JSON body for transports that answer with `{ "error", "message" }`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.code,
            "message": self.message,
        })
    }
}

/// Conversion of an internal error into its generic public shape.
pub trait ToPublicFailure {
    fn to_public_failure(&self) -> PublicFailure;
}

impl ToPublicFailure for DomainError {
    fn to_public_failure(&self) -> PublicFailure {
        PublicFailure::BAD_REQUEST
    }
}

impl ToPublicFailure for InfraError {
    fn to_public_failure(&self) -> PublicFailure {
        PublicFailure::INTERNAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_failures_do_not_carry_internal_messages() {
        let err = InfraError::storage("connection refused to db-primary:5432");
        let public = err.to_public_failure();
        assert_eq!(public, PublicFailure::INTERNAL);
        assert!(!public.to_json().to_string().contains("db-primary"));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let public = DomainError::validation("entity_id is required").to_public_failure();
        assert_eq!(public.status, 400);
        assert_eq!(public.message, "Bad Request");
    }
}
