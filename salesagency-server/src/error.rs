//! Resolver-facing error type
//!
//! Every failure a resolver can hit is mapped onto one of three codes which
//! clients read from `extensions.code`.

use async_graphql::ErrorExtensions;
use uuid::Uuid;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with a stable `code` extension
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input rejected before reaching storage
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Update target missing
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: Uuid },

    /// Storage failure, surfaced verbatim
    #[error("{0}")]
    Database(DbError),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        if let Self::Database(e) = self {
            tracing::error!(error = %e, "database error");
        }
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

/// Convert any error that maps onto `ApiError` into a coded GraphQL error.
pub trait ResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    fn code_of(err: async_graphql::Error) -> Option<Value> {
        err.extensions.and_then(|ext| ext.get("code").cloned())
    }

    #[test]
    fn validation_is_coded() {
        let err: Result<(), _> = Err(ValidationError::Empty { field: "name" });
        let err = err.gql().unwrap_err();
        assert_eq!(err.message, "name cannot be empty");
        assert_eq!(code_of(err), Some(Value::from("VALIDATION_ERROR")));
    }

    #[test]
    fn db_not_found_becomes_not_found() {
        let id = Uuid::nil();
        let api: ApiError = DbError::not_found("lead", id).into();
        assert!(matches!(api, ApiError::NotFound { resource: "lead", .. }));
        assert_eq!(api.code(), "NOT_FOUND");
    }

    #[test]
    fn database_message_is_verbatim() {
        let db = DbError::Unreachable {
            reason: "connection refused".into(),
        };
        let expected = db.to_string();
        let err: Result<(), DbError> = Err(db);
        let err = err.gql().unwrap_err();
        assert_eq!(err.message, expected);
        assert_eq!(code_of(err), Some(Value::from("DATABASE_ERROR")));
    }
}
