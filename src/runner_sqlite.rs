use crate::{
    batch::{SqlStatement, StatementBatch},
    parameters::SqlValue,
    result::{BatchError, ExecutionOutcome, Result},
    runner::resolve_failure,
};
use rusqlite::Connection;

// Implement trait for converting generic SqlValue to SQLite-specific ToSql
impl From<SqlValue> for Box<dyn rusqlite::ToSql> {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Box::new(rusqlite::types::Null),
            SqlValue::Boolean(b) => Box::new(b as i32), // SQLite represents booleans as integers
            SqlValue::Integer(i) => Box::new(i),
            SqlValue::Float(f) => Box::new(f),
            SqlValue::Text(s) => Box::new(s),
            SqlValue::Blob(bytes) => Box::new(bytes),
        }
    }
}

fn bind_values(params: Vec<SqlValue>) -> Vec<Box<dyn rusqlite::ToSql>> {
    params.into_iter().map(Into::into).collect()
}

/// Execute a single statement inside the transaction, returning its
/// affected-row count
fn execute_single_statement(tx: &rusqlite::Transaction, statement: SqlStatement) -> Result<u64> {
    let values = bind_values(statement.params);
    let mut stmt = tx.prepare(&statement.sql)?;
    let rows = stmt.execute(rusqlite::params_from_iter(values))?;
    Ok(rows as u64)
}

/// Execute a statement batch atomically against a SQLite connection.
///
/// Opens one transaction, runs the statements in declared order, and commits
/// only if every statement succeeds. On a statement failure the transaction
/// is rolled back on this same connection; the returned outcome carries the
/// zero-based index of the failing statement. If the rollback itself fails,
/// the outcome escalates to `RollbackFailed` with both causes.
///
/// Failure to begin or commit the transaction is an error at the batch
/// boundary, not an outcome.
pub fn batch_run_sqlite(
    conn: &mut Connection,
    batch: StatementBatch,
) -> anyhow::Result<ExecutionOutcome> {
    let tx = conn.transaction().map_err(BatchError::Sqlite)?;

    let mut rows_affected = Vec::with_capacity(batch.len());

    for (index, statement) in batch.into_statements().into_iter().enumerate() {
        match execute_single_statement(&tx, statement) {
            Ok(rows) => rows_affected.push(rows),
            Err(cause) => {
                let rollback_result = tx.rollback().map_err(BatchError::Sqlite);
                return Ok(resolve_failure(index, cause, rollback_result));
            }
        }
    }

    tx.commit().map_err(BatchError::Sqlite)?;
    Ok(ExecutionOutcome::Committed { rows_affected })
}

/// Run a single SELECT outside any batch and map the rows to JSON objects
/// keyed by column name. Reads run in auto-commit mode.
pub fn query_rows_sqlite(
    conn: &Connection,
    sql: &str,
    params: Vec<SqlValue>,
) -> anyhow::Result<Vec<serde_json::Value>> {
    let values = bind_values(params);
    let mut stmt = conn.prepare(sql)?;

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let rows = stmt.query_map(rusqlite::params_from_iter(values), |row| {
        let mut obj = serde_json::Map::new();
        for (idx, column_name) in column_names.iter().enumerate() {
            let value = match row.get_ref(idx)? {
                rusqlite::types::ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
                rusqlite::types::ValueRef::Real(r) => serde_json::Value::from(r),
                rusqlite::types::ValueRef::Text(s) => {
                    serde_json::Value::String(String::from_utf8_lossy(s).to_string())
                }
                rusqlite::types::ValueRef::Blob(b) => serde_json::Value::Array(
                    b.iter()
                        .map(|&byte| serde_json::Value::Number(byte.into()))
                        .collect(),
                ),
                rusqlite::types::ValueRef::Null => serde_json::Value::Null,
            };
            obj.insert(column_name.clone(), value);
        }
        Ok(serde_json::Value::Object(obj))
    })?;

    let result = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(result)
}
