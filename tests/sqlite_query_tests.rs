use rusqlite::Connection;
use txbatch::{SqlValue, query_rows_sqlite};

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute(
        "CREATE TABLE students (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, age INTEGER, score REAL, photo BLOB)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO students (name, age, score, photo) VALUES ('Alice', 21, 91.5, X'0102'), ('Bob', 23, NULL, NULL)",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn test_rows_keyed_by_column_name() {
    let conn = setup_db();

    let rows = query_rows_sqlite(
        &conn,
        "SELECT id, name, age FROM students ORDER BY id",
        vec![],
    )
    .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], serde_json::json!({"id": 1, "name": "Alice", "age": 21}));
    assert_eq!(rows[1], serde_json::json!({"id": 2, "name": "Bob", "age": 23}));
}

#[test]
fn test_value_mapping_covers_real_blob_and_null() {
    let conn = setup_db();

    let rows = query_rows_sqlite(
        &conn,
        "SELECT score, photo FROM students ORDER BY id",
        vec![],
    )
    .unwrap();

    assert_eq!(rows[0]["score"], serde_json::json!(91.5));
    assert_eq!(rows[0]["photo"], serde_json::json!([1, 2]));
    assert_eq!(rows[1]["score"], serde_json::Value::Null);
    assert_eq!(rows[1]["photo"], serde_json::Value::Null);
}

#[test]
fn test_positional_binds_in_reads() {
    let conn = setup_db();

    let rows = query_rows_sqlite(
        &conn,
        "SELECT name FROM students WHERE age > ? AND name != ?",
        vec![SqlValue::from(20_i64), SqlValue::from("Alice")],
    )
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], serde_json::json!("Bob"));
}

#[test]
fn test_read_of_missing_table_errors() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(query_rows_sqlite(&conn, "SELECT * FROM nobody", vec![]).is_err());
}

#[test]
fn test_empty_result_set_is_empty_vec() {
    let conn = setup_db();
    let rows = query_rows_sqlite(
        &conn,
        "SELECT * FROM students WHERE age > ?",
        vec![SqlValue::from(100_i64)],
    )
    .unwrap();
    assert!(rows.is_empty());
}
