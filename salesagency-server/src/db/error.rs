use uuid::Uuid;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Driver failure, tagged with the operation that hit it
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("database unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }
}

/// Attach the failing operation to a driver error.
pub(crate) trait QueryContext<T> {
    fn context(self, context: &'static str) -> Result<T, DbError>;
}

impl<T> QueryContext<T> for Result<T, sqlx::Error> {
    fn context(self, context: &'static str) -> Result<T, DbError> {
        self.map_err(|source| DbError::Query { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_names_operation() {
        let err: Result<(), _> = Err(sqlx::Error::RowNotFound);
        let err = err.context("update lead").unwrap_err();
        assert!(err.to_string().starts_with("update lead: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn not_found_display() {
        let id = Uuid::nil();
        assert_eq!(
            DbError::not_found("lead", id).to_string(),
            format!("not found: lead '{}'", id)
        );
    }
}
