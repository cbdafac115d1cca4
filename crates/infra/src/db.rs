//! Postgres connection pool and SQLx error mapping.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | InfraError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Integrity` |
//! | Database (foreign key violation) | `23503` | `Integrity` |
//! | Database (check constraint violation) | `23514` | `Integrity` |
//! | Database (other) | any other | `Storage` |
//! | ColumnDecode / Decode | N/A | `Decode` |
//! | PoolClosed, PoolTimedOut, Io, other | N/A | `Storage` |

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use bastion_core::InfraError;

/// Open a pool with the configured size.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, InfraError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Map SQLx errors to InfraError.
pub fn map_sqlx_error(operation: &str, err: sqlx::Error) -> InfraError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") | Some("23514") => InfraError::Integrity(msg),
                _ => InfraError::Storage(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            InfraError::Decode(format!("decode error in {}: {}", operation, err))
        }
        sqlx::Error::PoolClosed => {
            InfraError::Storage(format!("connection pool closed in {}", operation))
        }
        _ => InfraError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
