// tests/cli_tests.rs
#![cfg(feature = "cli")]

use odata_sql::FieldMap;
use odata_sql::cli::{
    CheckOptions, CheckResult, CliError, CompileOptions, Target, execute_check, execute_compile,
    load_field_map, rendered_to_json,
};

const FIELDS: &str = r#"{
    "__system/deletedAt": "entities.deletedAt",
    "age": "entity_defs.age"
}"#;

fn options(expr: &str, target: Target) -> CompileOptions {
    CompileOptions {
        expr: expr.to_string(),
        field_map: load_field_map(FIELDS).unwrap(),
        target,
        max_length: 4096,
    }
}

#[test]
fn test_check_prints_canonical_form() {
    let result = execute_check(&CheckOptions {
        expr: "age  gt 5 and(age lt 10)".to_string(),
        max_length: 4096,
    })
    .unwrap();

    match result {
        CheckResult::SyntaxValid(canonical) => {
            assert_eq!(canonical, "age gt 5 and (age lt 10)")
        }
    }
}

#[test]
fn test_check_syntax_error_exit_code() {
    let err = execute_check(&CheckOptions {
        expr: "age gt".to_string(),
        max_length: 4096,
    })
    .unwrap_err();

    assert!(matches!(err, CliError::Parse(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_length_limit() {
    let err = execute_check(&CheckOptions {
        expr: "age gt 5".to_string(),
        max_length: 3,
    })
    .unwrap_err();

    assert!(matches!(err, CliError::TooLong { length: 8, max: 3 }));
}

#[test]
fn test_compile_filter_to_json() {
    let rendered = execute_compile(&options("age eq 5", Target::Filter)).unwrap();
    assert_eq!(
        rendered_to_json(&rendered),
        serde_json::json!({
            "sql": r#"("entity_defs"."age" IS NOT DISTINCT FROM $1) AND "entities"."deletedAt" IS NULL"#,
            "params": [5],
        })
    );
}

#[test]
fn test_compile_order_by_with_stable_column() {
    let target = Target::OrderBy {
        stable: Some("entities.id".to_string()),
    };
    let rendered = execute_compile(&options("age desc", target)).unwrap();
    assert_eq!(
        rendered.sql,
        r#"ORDER BY "entity_defs"."age" DESC NULLS LAST, "entities"."id" DESC NULLS LAST"#
    );
}

#[test]
fn test_unsupported_field_exit_code() {
    let err = execute_compile(&options("height eq 5", Target::Filter)).unwrap_err();
    assert!(matches!(err, CliError::Compile(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_filter_syntax_error_exit_code() {
    let err = execute_compile(&options("age eq (", Target::Filter)).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_deleted_at_is_config_error() {
    let mut opts = options("age eq 5", Target::Filter);
    opts.field_map = FieldMap::from_pairs([("age", "t.age")]).unwrap();

    let err = execute_compile(&opts).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn test_invalid_field_map_json() {
    assert!(matches!(
        load_field_map("{ not json"),
        Err(CliError::Config(_))
    ));
    assert!(matches!(
        load_field_map(r#"{"age": "entity_defs."}"#),
        Err(CliError::Config(_))
    ));
}

#[test]
fn test_missing_field_map_file() {
    assert!(matches!(
        load_field_map("/nonexistent/fields.json"),
        Err(CliError::Io(_))
    ));
}
