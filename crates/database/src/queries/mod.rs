use charging::database::DatabaseError;
use sqlx::postgres::PgQueryResult;

pub mod company;
pub mod station;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(ref error) if error.is_foreign_key_violation() => {
            DatabaseError::MissingReference
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}

/// Fails with [`DatabaseError::NotFound`] if the statement touched no row.
pub(crate) fn expect_affected(
    result: Result<PgQueryResult, sqlx::Error>,
) -> Result<(), DatabaseError> {
    match result.map_err(convert_error)?.rows_affected() {
        0 => Err(DatabaseError::NotFound),
        _ => Ok(()),
    }
}
