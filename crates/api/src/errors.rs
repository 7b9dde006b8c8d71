use common::HttpMethod;
use store::StoreError;
use thiserror::Error;

/// Request-time failures raised by handlers. The dispatcher owns the mapping
/// to HTTP statuses; nothing else converts these.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::StoreUnavailable(_) | ApiError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ApiError::StoreUnavailable(msg),
            StoreError::Conflict(id) => ApiError::Conflict(format!("identifier already exists: {id}")),
            StoreError::Invalid(msg) => ApiError::Validation(msg),
        }
    }
}

/// Startup-time registration failures. These abort application assembly;
/// none of them can surface at request time.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("route conflict: {method} {pattern} is ambiguous with {existing}")]
    RouteConflict {
        method: HttpMethod,
        pattern: String,
        existing: String,
    },
    #[error("resource type already registered: {0}")]
    DuplicateType(String),
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), 400);
        assert_eq!(ApiError::not_found("Service").status(), 404);
        assert_eq!(ApiError::Conflict("x".into()).status(), 409);
        assert_eq!(ApiError::StoreUnavailable("x".into()).status(), 500);
        assert_eq!(ApiError::Internal("x".into()).status(), 500);
    }

    #[test]
    fn store_errors_translate() {
        assert_eq!(ApiError::from(StoreError::Conflict("a".into())).status(), 409);
        assert_eq!(ApiError::from(StoreError::Unavailable("down".into())).status(), 500);
        assert_eq!(ApiError::from(StoreError::Invalid("bad token".into())).status(), 400);
    }
}
