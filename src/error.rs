use sea_orm::{DbErr, SqlErr};

/// Failure of a directory operation, classified by what the caller can do about it.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(DbErr),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl BookingError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Stable identifier used in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::NotFound { .. } => "not_found",
            BookingError::Validation(_) => "validation",
            BookingError::ConstraintViolation(_) => "constraint_violation",
            BookingError::Connection(_) => "connection",
            BookingError::Database(_) => "internal",
        }
    }
}

impl From<DbErr> for BookingError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(reason))
            | Some(SqlErr::UniqueConstraintViolation(reason)) => {
                return Self::ConstraintViolation(reason);
            }
            _ => {}
        }

        match err {
            DbErr::Conn(e) => Self::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::Connection(e.to_string()),
            // SQLite reports some constraint failures without an extended code
            other if other.to_string().contains("constraint failed") => {
                Self::ConstraintViolation(other.to_string())
            }
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(BookingError::not_found("Venue", 1).kind(), "not_found");
        assert_eq!(
            BookingError::Validation("name".into()).kind(),
            "validation"
        );
        assert_eq!(
            BookingError::ConstraintViolation("fk".into()).kind(),
            "constraint_violation"
        );
        assert_eq!(BookingError::Connection("down".into()).kind(), "connection");
    }

    #[test]
    fn test_not_found_message() {
        let err = BookingError::not_found("Artist", 42);
        assert_eq!(err.to_string(), "Artist with ID 42 not found");
    }

    #[test]
    fn test_custom_db_error_is_internal() {
        let err: BookingError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, BookingError::Database(_)));
        assert_eq!(err.kind(), "internal");
    }

    #[test]
    fn test_record_not_found_is_internal() {
        let err: BookingError = DbErr::RecordNotFound("venue".into()).into();
        assert!(matches!(err, BookingError::Database(_)));
    }
}
