//! Shared translation of pool and Diesel failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through a repository's connection constructor.
pub(crate) fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Whether `error` is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Map a Diesel failure through a repository's query and connection
/// constructors. `operation` names the failing call in the message.
///
/// Driver detail is logged at debug level and kept out of the message.
pub(crate) fn map_basic_diesel_error<E>(
    error: DieselError,
    operation: &'static str,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection(format!("{operation}: database connection error"))
        }
        DieselError::NotFound => query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => query(format!("{operation}: database query error")),
        DieselError::DeserializationError(_) => {
            query(format!("{operation}: unreadable database row"))
        }
        _ => query(format!("{operation}: database error")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    enum Probe {
        Query(String),
        Connection(String),
    }

    fn map(error: DieselError) -> Probe {
        map_basic_diesel_error(error, "load probe", Probe::Query, Probe::Connection)
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            map(DieselError::NotFound),
            Probe::Query("load probe: record not found".to_owned())
        );
    }

    #[rstest]
    fn rollback_is_a_generic_query_failure() {
        assert_eq!(
            map(DieselError::RollbackTransaction),
            Probe::Query("load probe: database error".to_owned())
        );
    }

    #[rstest]
    fn pool_checkout_maps_to_connection() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), Probe::Connection);
        assert_eq!(mapped, Probe::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn only_unique_violations_are_flagged() {
        assert!(!is_unique_violation(&DieselError::NotFound));
    }
}
