use crate::{
    batch::{SqlStatement, StatementBatch},
    parameters::SqlValue,
    result::{BatchError, ExecutionOutcome, Result},
    runner::resolve_failure,
    str_utils,
};
use tokio_postgres::Client;

// PostgreSQL type OIDs for the column types the row reader understands
const POSTGRES_TYPE_OID_BOOL: u32 = 16;
const POSTGRES_TYPE_OID_BYTEA: u32 = 17;
const POSTGRES_TYPE_OID_INT2: u32 = 21;
const POSTGRES_TYPE_OID_INT4: u32 = 23;
const POSTGRES_TYPE_OID_INT8: u32 = 20;
const POSTGRES_TYPE_OID_FLOAT4: u32 = 700;
const POSTGRES_TYPE_OID_FLOAT8: u32 = 701;
const POSTGRES_TYPE_OID_TEXT: u32 = 25;
const POSTGRES_TYPE_OID_VARCHAR: u32 = 1043;
const POSTGRES_TYPE_OID_BPCHAR: u32 = 1042;
const POSTGRES_TYPE_OID_JSON: u32 = 114;
const POSTGRES_TYPE_OID_JSONB: u32 = 3802;

/// Convert a generic SqlValue directly to a PostgreSQL ToSql trait object
fn sql_value_to_postgresql_tosql(value: SqlValue) -> Box<dyn tokio_postgres::types::ToSql + Sync> {
    match value {
        SqlValue::Null => Box::new(Option::<String>::None),
        SqlValue::Boolean(b) => Box::new(b),
        SqlValue::Integer(i) => Box::new(i as i32), // PostgreSQL typically uses i32 for integers
        SqlValue::Float(f) => Box::new(f),
        SqlValue::Text(s) => Box::new(s),
        SqlValue::Blob(bytes) => Box::new(bytes),
    }
}

/// Rewrite `?` placeholders to `$1..$n` and box the bind values
fn prepare_positional(statement: SqlStatement) -> (String, Vec<Box<dyn tokio_postgres::types::ToSql + Sync>>) {
    let positional_sql = str_utils::number_placeholders(&statement.sql, &|idx| format!("${idx}"));
    let values = statement
        .params
        .into_iter()
        .map(sql_value_to_postgresql_tosql)
        .collect();
    (positional_sql, values)
}

/// Execute a single statement inside the transaction, returning its
/// affected-row count
async fn execute_single_statement(
    transaction: &tokio_postgres::Transaction<'_>,
    statement: SqlStatement,
) -> Result<u64> {
    let (positional_sql, values) = prepare_positional(statement);
    let params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> =
        values.iter().map(|v| v.as_ref()).collect();

    let rows = transaction.execute(&positional_sql, &params).await?;
    Ok(rows)
}

/// Execute a statement batch atomically against a PostgreSQL client.
///
/// Same contract as the SQLite runner: one transaction per batch, statements
/// in declared order, commit only when every statement succeeds, rollback on
/// the same connection otherwise. Statements are written with `?`
/// placeholders and rewritten to `$1..$n` before execution.
pub async fn batch_run_postgresql(
    client: &mut Client,
    batch: StatementBatch,
) -> anyhow::Result<ExecutionOutcome> {
    let transaction = client.transaction().await.map_err(BatchError::Postgres)?;

    let mut rows_affected = Vec::with_capacity(batch.len());

    for (index, statement) in batch.into_statements().into_iter().enumerate() {
        match execute_single_statement(&transaction, statement).await {
            Ok(rows) => rows_affected.push(rows),
            Err(cause) => {
                let rollback_result = transaction.rollback().await.map_err(BatchError::Postgres);
                return Ok(resolve_failure(index, cause, rollback_result));
            }
        }
    }

    transaction.commit().await.map_err(BatchError::Postgres)?;
    Ok(ExecutionOutcome::Committed { rows_affected })
}

fn to_json_value<T: serde::Serialize>(value: T) -> anyhow::Result<serde_json::Value> {
    serde_json::to_value(value).map_err(Into::into)
}

/// Convert a PostgreSQL column value to JSON using OID-based type detection
fn postgres_value_to_json(
    column_type: &tokio_postgres::types::Type,
    row: &tokio_postgres::Row,
    idx: usize,
) -> anyhow::Result<serde_json::Value> {
    let oid = column_type.oid();
    match oid {
        POSTGRES_TYPE_OID_BOOL => {
            let val: bool = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_INT2 => {
            let val: i16 = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_INT4 => {
            let val: i32 = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_INT8 => {
            let val: i64 = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_FLOAT4 => {
            let val: f32 = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_FLOAT8 => {
            let val: f64 = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_TEXT | POSTGRES_TYPE_OID_VARCHAR | POSTGRES_TYPE_OID_BPCHAR => {
            let val: String = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_BYTEA => {
            let val: Vec<u8> = row.try_get(idx)?;
            to_json_value(val)
        }
        POSTGRES_TYPE_OID_JSON | POSTGRES_TYPE_OID_JSONB => {
            let val: serde_json::Value = row.try_get(idx)?;
            to_json_value(val)
        }
        _ => {
            // Fall back to a marker string for types the reader does not map
            let val = format!("Unsupported PostgreSQL type OID: {oid}");
            to_json_value(val)
        }
    }
}

/// Convert a single PostgreSQL row to a JSON object keyed by column name
fn row_to_json_object(
    row: &tokio_postgres::Row,
) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    let mut obj = serde_json::Map::new();

    for (idx, column) in row.columns().iter().enumerate() {
        let value = postgres_value_to_json(column.type_(), row, idx)?;
        obj.insert(column.name().to_string(), value);
    }

    Ok(obj)
}

/// Map PostgreSQL rows to JSON objects keyed by column name
pub fn map_rows_to_json(rows: Vec<tokio_postgres::Row>) -> anyhow::Result<Vec<serde_json::Value>> {
    let mut result = Vec::with_capacity(rows.len());

    for row in rows {
        let obj = row_to_json_object(&row)?;
        result.push(serde_json::Value::Object(obj));
    }

    Ok(result)
}

/// Run a single SELECT outside any batch and map the rows to JSON objects.
/// Reads run in auto-commit mode.
pub async fn query_rows_postgresql(
    client: &Client,
    sql: &str,
    params: Vec<SqlValue>,
) -> anyhow::Result<Vec<serde_json::Value>> {
    let (positional_sql, values) = prepare_positional(SqlStatement::with_params(sql, params));
    let param_refs: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> =
        values.iter().map(|v| v.as_ref()).collect();

    let rows = client
        .query(&positional_sql, &param_refs)
        .await
        .map_err(BatchError::Postgres)?;

    map_rows_to_json(rows)
}
