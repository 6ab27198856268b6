//! Tests for routine catalogs and descriptors

use super::*;
use crate::{CallError, Direction};
use dbcall_core::{DeclaredType, ValueType};
use pretty_assertions::assert_eq;

const CATALOG: &str = r#"
[routines.getBalance]
mapped_name = "GETBAL"
composable = true

[[routines.getBalance.parameters]]
name = "acct"
declared_type = "Int32"

[routines.archiveAccount]
mapped_name = "ARCHIVE_ACCT"
returns = "result_set"

[[routines.archiveAccount.parameters]]
name = "account"
declared_type = "int"
bind_name = "acct"

[[routines.archiveAccount.parameters]]
name = "status"
declared_type = "Int32&"
output_only = true
"#;

// ============================================================================
// Descriptor Tests
// ============================================================================

#[test]
fn test_parameter_descriptor_defaults_bind_name() {
    let param = ParameterDescriptor::new("acct", ValueType::Int32);

    assert_eq!(param.bind_name.as_deref(), Some("acct"));
    assert!(!param.output_only);
    assert!(param.direction.is_none());
    assert_eq!(param.declared_type, DeclaredType::new(ValueType::Int32));
}

#[test]
fn test_parameter_descriptor_builders() {
    let param = ParameterDescriptor::new("status", DeclaredType::by_ref(ValueType::Int16))
        .with_bind_name("st")
        .output_only()
        .with_direction(Direction::Out);

    assert_eq!(param.bind_name.as_deref(), Some("st"));
    assert!(param.output_only);
    assert_eq!(param.direction, Some(Direction::Out));
}

#[test]
fn test_routine_descriptor_constructors() {
    let procedure = RoutineDescriptor::procedure("ARCHIVE_ACCT");
    assert!(!procedure.composable);
    assert_eq!(procedure.returns, ReturnShape::Scalar);

    let function = RoutineDescriptor::function("GETBAL").returning(ReturnShape::ResultSet);
    assert!(function.composable);
    assert_eq!(function.returns, ReturnShape::ResultSet);
}

#[test]
fn test_routine_descriptor_json_shape() {
    let routine = RoutineDescriptor::function("GETBAL")
        .with_parameter(ParameterDescriptor::new("acct", ValueType::Int32));

    let json = serde_json::to_value(&routine).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "mapped_name": "GETBAL",
            "composable": true,
            "returns": "scalar",
            "parameters": [
                {
                    "name": "acct",
                    "declared_type": "Int32",
                    "output_only": false,
                    "bind_name": "acct"
                }
            ]
        })
    );
}

// ============================================================================
// StaticCatalog Tests
// ============================================================================

#[test]
fn test_static_catalog_resolve() {
    let catalog = StaticCatalog::new()
        .with_routine("getBalance", RoutineDescriptor::function("GETBAL"));

    assert_eq!(catalog.len(), 1);
    assert_eq!(
        catalog.resolve("getBalance").map(|r| r.mapped_name.clone()),
        Some("GETBAL".to_string())
    );
    assert!(catalog.resolve("missing").is_none());
}

#[test]
fn test_static_catalog_from_toml() {
    let catalog = StaticCatalog::from_toml_str(CATALOG).unwrap();

    assert_eq!(catalog.call_ids(), vec!["archiveAccount", "getBalance"]);

    let archive = catalog.resolve("archiveAccount").unwrap();
    assert_eq!(archive.mapped_name, "ARCHIVE_ACCT");
    assert!(!archive.composable);
    assert_eq!(archive.returns, ReturnShape::ResultSet);
    assert_eq!(archive.parameters[0].bind_name.as_deref(), Some("acct"));
    assert_eq!(archive.parameters[1].bind_name.as_deref(), Some("status"));
    assert!(archive.parameters[1].output_only);
    assert!(archive.parameters[1].declared_type.is_by_ref());
}

#[test]
fn test_static_catalog_rejects_unknown_type() {
    let source = r#"
[routines.bad]
mapped_name = "BAD"

[[routines.bad.parameters]]
name = "x"
declared_type = "Widget"
"#;
    let err = StaticCatalog::from_toml_str(source).unwrap_err();
    assert!(matches!(err, CallError::Configuration(_)));
}

#[test]
fn test_static_catalog_rejects_empty_names() {
    let err = StaticCatalog::from_toml_str("[routines.bad]\nmapped_name = \" \"\n").unwrap_err();
    assert!(err.to_string().contains("empty mapped_name"));

    let source = r#"
[routines.bad]
mapped_name = "BAD"

[[routines.bad.parameters]]
name = "x"
declared_type = "Int32"
bind_name = ""
"#;
    let err = StaticCatalog::from_toml_str(source).unwrap_err();
    assert!(err.to_string().contains("empty bind_name"));
}

#[test]
fn test_static_catalog_empty_document() {
    let catalog = StaticCatalog::from_toml_str("").unwrap();
    assert!(catalog.is_empty());
}
