/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors surfaced by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `uq_*` unique constraint rejected the write.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    /// Unique violations on constraints named `uq_*` are lifted into
    /// [`StoreError::UniqueViolation`]; everything else passes through.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.starts_with("uq_") {
                        return Self::UniqueViolation {
                            constraint: constraint.to_string(),
                        };
                    }
                }
            }
        }
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, StoreError::Database(sqlx::Error::RowNotFound));
    }

    #[test]
    fn unique_violation_display_names_constraint() {
        let err = StoreError::UniqueViolation {
            constraint: "uq_merchants_mobile".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate value violates unique constraint: uq_merchants_mobile"
        );
    }
}
