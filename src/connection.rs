use crate::result::{BatchError, Result};
use serde::Deserialize;

/// Resolved connection values, immutable for the duration of one run.
///
/// `url` is a SQLite path (or `:memory:`) for the SQLite backend and a
/// libpq-style connection string or `postgresql://` URL for PostgreSQL.
/// SQLite ignores `user` and `password`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionParams {
    pub url: String,
    pub user: String,
    pub password: String,
}

fn connection_failed(url: &str, cause: &dyn std::fmt::Display) -> BatchError {
    BatchError::ConnectionFailed {
        url: url.to_string(),
        cause: cause.to_string(),
    }
}

/// Open a SQLite connection. Failures surface as the distinct
/// connection-stage error, never as a statement error.
#[cfg(feature = "sqlite")]
pub fn open_sqlite(params: &ConnectionParams) -> Result<rusqlite::Connection> {
    rusqlite::Connection::open(&params.url).map_err(|e| connection_failed(&params.url, &e))
}

/// Connect to PostgreSQL and spawn the connection driver task.
/// `user` and `password` from the params override anything in the url.
/// The returned handle finishes when the connection closes.
#[cfg(feature = "postgresql")]
pub async fn connect_postgresql(
    params: &ConnectionParams,
) -> Result<(tokio_postgres::Client, tokio::task::JoinHandle<()>)> {
    let mut config: tokio_postgres::Config = params
        .url
        .parse()
        .map_err(|e: tokio_postgres::Error| connection_failed(&params.url, &e))?;
    config.user(params.user.as_str());
    config.password(params.password.as_str());

    let (client, connection) = config
        .connect(tokio_postgres::NoTls)
        .await
        .map_err(|e| connection_failed(&params.url, &e))?;

    let driver = tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });

    Ok((client, driver))
}

/// Database connection enum that holds different database backends
#[cfg(feature = "sqlite")]
pub enum DatabaseConnection {
    /// SQLite connection
    SQLite(rusqlite::Connection),
}

#[cfg(feature = "sqlite")]
impl crate::runner::BatchRunner for DatabaseConnection {
    fn batch_run(
        &mut self,
        batch: crate::batch::StatementBatch,
    ) -> anyhow::Result<crate::result::ExecutionOutcome> {
        match self {
            DatabaseConnection::SQLite(conn) => crate::runner_sqlite::batch_run_sqlite(conn, batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_open_sqlite_in_memory() {
        let params = ConnectionParams {
            url: ":memory:".to_string(),
            user: String::new(),
            password: String::new(),
        };
        assert!(open_sqlite(&params).is_ok());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_open_sqlite_bad_path_is_connection_error() {
        let params = ConnectionParams {
            url: "/nonexistent-dir/deeper/db.sqlite".to_string(),
            user: String::new(),
            password: String::new(),
        };
        match open_sqlite(&params) {
            Err(BatchError::ConnectionFailed { url, .. }) => {
                assert_eq!(url, "/nonexistent-dir/deeper/db.sqlite");
            }
            Err(other) => panic!("expected ConnectionFailed, got {other:?}"),
            Ok(_) => panic!("expected ConnectionFailed, got a connection"),
        }
    }

    #[cfg(feature = "postgresql")]
    #[test]
    fn test_postgresql_config_parse_failure_is_connection_error() {
        let params = ConnectionParams {
            url: "not a valid connection string %%%".to_string(),
            user: "postgres".to_string(),
            password: "secret".to_string(),
        };
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime.block_on(connect_postgresql(&params));
        match result {
            Err(BatchError::ConnectionFailed { cause, .. }) => {
                // the password must never leak into the message
                assert!(!cause.contains("secret"));
            }
            Err(other) => panic!("expected ConnectionFailed, got {other:?}"),
            Ok(_) => panic!("expected ConnectionFailed, got a connection"),
        }
    }
}
