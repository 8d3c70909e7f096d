//! Tests for the lexical query classifier

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_statement_types() {
    assert_eq!(classify("SELECT 1").query_type, QueryType::Select);
    assert_eq!(classify("insert into t values (1)").query_type, QueryType::Insert);
    assert_eq!(classify("Update t SET a = 1").query_type, QueryType::Update);
    assert_eq!(classify("DELETE FROM t").query_type, QueryType::Delete);
    assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x").query_type, QueryType::Unknown);
    assert_eq!(classify("").query_type, QueryType::Unknown);
}

#[test]
fn test_prefix_match_does_not_skip_whitespace() {
    assert_eq!(classify("  SELECT 1").query_type, QueryType::Unknown);
}

#[test]
fn test_tables_from_select_with_join() {
    let info = classify("SELECT * FROM orders o JOIN customers c ON o.customer_id = c.id");
    assert_eq!(info.tables, vec!["ORDERS".to_string(), "CUSTOMERS".to_string()]);
}

#[test]
fn test_tables_deduplicated() {
    let info = classify("SELECT * FROM a JOIN b ON a.id = b.id JOIN a ON a.x = b.x");
    assert_eq!(info.tables, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_tables_from_insert_and_update() {
    assert_eq!(classify("INSERT INTO logs (msg) VALUES ('x')").tables, vec!["LOGS"]);
    assert_eq!(classify("UPDATE users SET name = 'x'").tables, vec!["USERS"]);
}

#[test]
fn test_schema_qualified_names_keep_only_schema() {
    // \w stops at the dot
    assert_eq!(classify("SELECT * FROM public.users").tables, vec!["PUBLIC"]);
}

#[test]
fn test_subquery_is_not_a_table() {
    let info = classify("SELECT * FROM (SELECT id FROM users) s");
    assert_eq!(info.tables, vec!["USERS"]);
}

#[test]
fn test_keyword_inside_string_literal_over_matches() {
    // Keywords inside string literals still count
    let info = classify("SELECT 'DELETE FROM ghosts' AS note FROM audit");
    assert_eq!(info.tables, vec!["GHOSTS".to_string(), "AUDIT".to_string()]);
}

#[test]
fn test_operation_flags() {
    let info = classify(
        "SELECT status, count(*) FROM orders o JOIN users u ON u.id = o.user_id \
         WHERE o.total > 10 GROUP BY status ORDER BY status",
    );
    assert_eq!(
        info.operations,
        vec![
            OperationFlag::Filter,
            OperationFlag::Sort,
            OperationFlag::Aggregate,
            OperationFlag::Join
        ]
    );
    assert!(info.has_operation(OperationFlag::Join));
}

#[test]
fn test_no_operation_flags() {
    let info = classify("SELECT * FROM users");
    assert!(info.operations.is_empty());
    assert!(!info.has_operation(OperationFlag::Filter));
}

#[test]
fn test_serialization() {
    assert_eq!(serde_json::to_string(&QueryType::Select).unwrap(), "\"SELECT\"");
    assert_eq!(serde_json::to_string(&OperationFlag::Aggregate).unwrap(), "\"AGGREGATE\"");
    assert_eq!(QueryType::Unknown.to_string(), "UNKNOWN");
}
