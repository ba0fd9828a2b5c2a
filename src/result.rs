use thiserror::Error;

/// Main error type for the txbatch library
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[cfg(feature = "postgresql")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("connection to {url} failed: {cause}")]
    ConnectionFailed { url: String, cause: String },
    #[error("batch is empty: at least one statement is required")]
    EmptyBatch,
    #[error("statement {index} has {expected} placeholder(s) but {got} bind value(s)")]
    PlaceholderMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("statement {index} contains transaction control keywords; the runner owns the transaction boundary")]
    TransactionKeyword { index: usize },
    #[error("batch definition invalid: expected {expected}, got {got}")]
    BatchDefinition { expected: String, got: String },
    #[error("config key missing: {0}")]
    MissingConfigKey(String),
    #[error("config line {line} is not a key=value pair: {content}")]
    MalformedConfigLine { line: usize, content: String },
}

/// Type alias for Results using BatchError
pub type Result<T> = std::result::Result<T, BatchError>;

/// Terminal result of running a statement batch.
///
/// Every batch ends in exactly one of these states. `RolledBack` means the
/// database was restored to its pre-batch state; `RollbackFailed` means the
/// transaction's final state is unknown and both causes are surfaced.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// All statements succeeded and the transaction committed.
    /// Affected-row counts are in declared statement order.
    Committed { rows_affected: Vec<u64> },
    /// A statement failed and the transaction was rolled back cleanly.
    RolledBack {
        failing_index: usize,
        cause: BatchError,
    },
    /// A statement failed and the rollback itself also failed.
    RollbackFailed {
        cause: BatchError,
        rollback_cause: BatchError,
    },
}

impl ExecutionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ExecutionOutcome::Committed { .. })
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, ExecutionOutcome::RolledBack { .. })
    }

    pub fn is_rollback_failed(&self) -> bool {
        matches!(self, ExecutionOutcome::RollbackFailed { .. })
    }
}
