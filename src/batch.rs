use crate::{
    parameters::SqlValue,
    result::{BatchError, Result},
    str_utils,
};
use serde::{Deserialize, Serialize};
use std::fs;

/// One SQL statement with positional `?` placeholders and its bind values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlStatement {
    pub sql: String,
    #[serde(default)]
    pub params: Vec<SqlValue>,
}

impl SqlStatement {
    /// A statement without bind values
    pub fn new(sql: impl Into<String>) -> Self {
        SqlStatement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// A statement with positional bind values, one per `?` placeholder
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        SqlStatement {
            sql: sql.into(),
            params,
        }
    }
}

/// An ordered, validated sequence of SQL statements executed as one atomic
/// unit. All invariants are checked at construction, before any connection
/// work happens:
///
/// - the batch is non-empty
/// - each statement's `?` placeholder count matches its bind value count
/// - no statement carries its own transaction control keywords
#[derive(Debug, Clone)]
pub struct StatementBatch {
    statements: Vec<SqlStatement>,
}

impl StatementBatch {
    pub fn new(statements: Vec<SqlStatement>) -> Result<Self> {
        if statements.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        for (index, statement) in statements.iter().enumerate() {
            if str_utils::contains_transaction_keywords(&statement.sql) {
                return Err(BatchError::TransactionKeyword { index });
            }
            let expected = str_utils::count_placeholders(&statement.sql);
            let got = statement.params.len();
            if expected != got {
                return Err(BatchError::PlaceholderMismatch {
                    index,
                    expected,
                    got,
                });
            }
        }

        Ok(StatementBatch { statements })
    }

    /// Build a batch from a multi-statement SQL script, splitting on `;`
    /// outside string literals. Script statements carry no bind values.
    pub fn from_script(script: &str) -> Result<Self> {
        let statements = str_utils::split_sql_statements(script)
            .into_iter()
            .map(SqlStatement::new)
            .collect();
        Self::new(statements)
    }

    /// Load a batch from a serde_json::Value: an array of
    /// `{"sql": "...", "params": [...]}` objects
    pub fn from_json(json: serde_json::Value) -> anyhow::Result<Self> {
        if !json.is_array() {
            let err = BatchError::BatchDefinition {
                expected: "array of statement objects".to_string(),
                got: json.to_string(),
            };
            return Err(err.into());
        }

        let statements: Vec<SqlStatement> =
            serde_json::from_value(json).map_err(BatchError::Json)?;
        Ok(Self::new(statements)?)
    }

    /// Load a batch from a JSON file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).map_err(BatchError::Io)?;
        let json: serde_json::Value = serde_json::from_str(&content).map_err(BatchError::Json)?;
        Self::from_json(json)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Always false: the non-empty invariant is enforced at construction
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[SqlStatement] {
        &self.statements
    }

    pub(crate) fn into_statements(self) -> Vec<SqlStatement> {
        self.statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_rejected() {
        let result = StatementBatch::new(vec![]);
        assert!(matches!(result, Err(BatchError::EmptyBatch)));
    }

    #[test]
    fn test_placeholder_arity_checked_per_statement() {
        let statements = vec![
            SqlStatement::with_params("INSERT INTO t VALUES (?)", vec![SqlValue::from(1_i64)]),
            SqlStatement::new("INSERT INTO t VALUES (?, ?)"),
        ];
        match StatementBatch::new(statements) {
            Err(BatchError::PlaceholderMismatch {
                index,
                expected,
                got,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, 2);
                assert_eq!(got, 0);
            }
            other => panic!("expected PlaceholderMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_transaction_control_rejected() {
        let statements = vec![SqlStatement::new("COMMIT")];
        assert!(matches!(
            StatementBatch::new(statements),
            Err(BatchError::TransactionKeyword { index: 0 })
        ));
    }

    #[test]
    fn test_quoted_placeholder_not_counted() {
        let statements = vec![SqlStatement::with_params(
            "INSERT INTO t (a, b) VALUES (?, 'literal?')",
            vec![SqlValue::from("x")],
        )];
        assert!(StatementBatch::new(statements).is_ok());
    }

    #[test]
    fn test_from_script_splits_statements() {
        let batch =
            StatementBatch::from_script("DELETE FROM t; INSERT INTO t (name) VALUES ('a;b')")
                .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.statements()[0].sql, "DELETE FROM t");
    }

    #[test]
    fn test_from_script_empty_rejected() {
        assert!(matches!(
            StatementBatch::from_script("   ; ;"),
            Err(BatchError::EmptyBatch)
        ));
    }
}
