pub mod batch;
pub mod config;
pub mod connection;
pub mod parameters;
pub mod result;
pub mod runner;
#[cfg(feature = "postgresql")]
pub mod runner_postgresql;
#[cfg(feature = "sqlite")]
pub mod runner_sqlite;
pub mod str_utils;

// Re-export types for convenience
pub use batch::{SqlStatement, StatementBatch};
#[cfg(feature = "postgresql")]
pub use connection::connect_postgresql;
pub use connection::ConnectionParams;
#[cfg(feature = "sqlite")]
pub use connection::{DatabaseConnection, open_sqlite};
pub use parameters::SqlValue;
pub use result::{BatchError, ExecutionOutcome, Result};
pub use runner::BatchRunner;
#[cfg(feature = "postgresql")]
pub use runner_postgresql::{batch_run_postgresql, query_rows_postgresql};
#[cfg(feature = "sqlite")]
pub use runner_sqlite::{batch_run_sqlite, query_rows_sqlite};

// Re-export third-party types used in the public API to provide fallback for dependency conflicts
pub use serde_json::Value as JsonValue;

#[cfg(feature = "sqlite")]
pub use rusqlite::Connection as SqliteConnection;

#[cfg(feature = "postgresql")]
pub use tokio_postgres::Client as PostgresClient;
