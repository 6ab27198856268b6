//! Tests for the invocation pipeline and output extraction

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbcall_core::{
    DbcallError, DeclaredType, QueryResult, Result as CoreResult, StandardConverter, Value,
    ValueType,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::{
    BackendParameter, CallError, CommandExecutor, CommandKind, ConversionPolicy, Direction,
    InvokerConfig, ParameterDescriptor, ReturnShape, RoutineCommand, RoutineDescriptor,
    StaticCatalog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Fill,
    Scalar,
}

/// Executor that records the command it receives and writes scripted outputs
struct ScriptedExecutor {
    writes: Vec<(&'static str, Value)>,
    table: QueryResult,
    scalar: Value,
    failure: Option<&'static str>,
    seen: Mutex<Vec<(Path, RoutineCommand)>>,
}

impl ScriptedExecutor {
    fn new() -> Self {
        Self {
            writes: Vec::new(),
            table: QueryResult::empty(),
            scalar: Value::Null,
            failure: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn writing(mut self, bind_name: &'static str, value: Value) -> Self {
        self.writes.push((bind_name, value));
        self
    }

    fn returning_scalar(mut self, value: Value) -> Self {
        self.scalar = value;
        self
    }

    fn returning_table(mut self, table: QueryResult) -> Self {
        self.table = table;
        self
    }

    fn failing(mut self, message: &'static str) -> Self {
        self.failure = Some(message);
        self
    }

    fn seen(&self) -> Vec<(Path, RoutineCommand)> {
        self.seen.lock().unwrap().clone()
    }

    fn run(&self, path: Path, command: &mut RoutineCommand) -> CoreResult<()> {
        self.seen.lock().unwrap().push((path, command.clone()));
        if let Some(message) = self.failure {
            return Err(DbcallError::Query(message.to_string()));
        }
        for (bind_name, value) in &self.writes {
            if let Some(parameter) = command
                .parameters
                .iter_mut()
                .find(|p| p.bind_name == *bind_name)
            {
                parameter.value = value.clone();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn fill(&self, command: &mut RoutineCommand) -> CoreResult<QueryResult> {
        self.run(Path::Fill, command)?;
        Ok(self.table.clone())
    }

    async fn execute_scalar(&self, command: &mut RoutineCommand) -> CoreResult<Value> {
        self.run(Path::Scalar, command)?;
        Ok(self.scalar.clone())
    }
}

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_routine(
            "getBalance",
            RoutineDescriptor::function("GETBAL")
                .with_parameter(ParameterDescriptor::new("acct", ValueType::Int32)),
        )
        .with_routine(
            "archiveAccount",
            RoutineDescriptor::procedure("ARCHIVE_ACCT")
                .with_parameter(ParameterDescriptor::new("acct", ValueType::Int32))
                .with_parameter(ParameterDescriptor::new("status", ValueType::Int32).output_only()),
        )
        .with_routine(
            "bumpCounter",
            RoutineDescriptor::function("BUMP")
                .with_parameter(ParameterDescriptor::new("step", ValueType::Int32))
                .with_parameter(ParameterDescriptor::new(
                    "counter",
                    DeclaredType::by_ref(ValueType::Int64),
                )),
        )
        .with_routine(
            "listAccounts",
            RoutineDescriptor::function("LIST_ACCTS")
                .returning(ReturnShape::ResultSet)
                .with_parameter(ParameterDescriptor::new("owner", ValueType::String))
                .with_parameter(ParameterDescriptor::new("total", ValueType::Int64).output_only())
                .with_parameter(ParameterDescriptor::new("active", ValueType::Bool)),
        )
}

fn invoker_with(config: InvokerConfig) -> RoutineInvoker {
    RoutineInvoker::new(Arc::new(catalog()), Arc::new(StandardConverter), config)
}

fn invoker() -> RoutineInvoker {
    invoker_with(InvokerConfig::default())
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_get_balance_scenario() {
    let executor = ScriptedExecutor::new().returning_scalar(Value::Decimal("120.50".into()));

    let result = invoker()
        .invoke(&executor, "getBalance", &[Value::Int32(42)])
        .await
        .unwrap();

    let seen = executor.seen();
    assert_eq!(seen.len(), 1);
    let (path, command) = &seen[0];
    assert_eq!(*path, Path::Scalar);
    assert_eq!(command.text, "SELECT * FROM GETBAL(@acct)");
    assert_eq!(command.kind, CommandKind::Query);
    assert_eq!(
        command.parameters,
        vec![BackendParameter {
            bind_name: "@acct".to_string(),
            direction: Direction::In,
            value: Value::Int32(42),
        }]
    );

    assert_eq!(result.scalar(), Some(&Value::Decimal("120.50".into())));
    assert_eq!(result.outputs(), &[OutputValue::Unused]);
    assert_eq!(result.outputs()[0].to_string(), "unused");
}

#[tokio::test]
async fn test_archive_account_scenario_coerces_output() {
    let executor = ScriptedExecutor::new().writing("@status", Value::Decimal("3".into()));

    let result = invoker()
        .invoke(&executor, "archiveAccount", &[Value::Int32(42)])
        .await
        .unwrap();

    let seen = executor.seen();
    let (_, command) = &seen[0];
    assert_eq!(command.text, "ARCHIVE_ACCT");
    assert_eq!(command.kind, CommandKind::StoredProcedure);
    assert_eq!(command.parameters[1].value, Value::Null);

    assert_eq!(
        result.outputs(),
        &[OutputValue::Unused, OutputValue::Value(Value::Int32(3))]
    );
}

#[tokio::test]
async fn test_archive_account_scenario_tags_conversion_failure() {
    let executor = ScriptedExecutor::new().writing("@status", Value::String("closed".into()));

    let result = invoker()
        .invoke(&executor, "archiveAccount", &[Value::Int32(42)])
        .await
        .unwrap();

    assert_eq!(result.outputs().len(), 2);
    assert!(result.outputs()[0].is_unused());
    match &result.outputs()[1] {
        OutputValue::ConversionFailed { raw, target, .. } => {
            assert_eq!(raw, &Value::String("closed".into()));
            assert_eq!(*target, ValueType::Int32);
        }
        other => panic!("expected a conversion failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_conversion_failure_aborts_with_fail_policy() {
    let executor = ScriptedExecutor::new().writing("@status", Value::String("closed".into()));
    let config = InvokerConfig::new().with_conversion_policy(ConversionPolicy::Fail);

    let err = invoker_with(config)
        .invoke(&executor, "archiveAccount", &[Value::Int32(42)])
        .await
        .unwrap_err();

    match err {
        CallError::Conversion { parameter, source } => {
            assert_eq!(parameter, "status");
            assert_eq!(source.target, ValueType::Int32);
        }
        other => panic!("expected a conversion error, got {:?}", other),
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_inout_round_trip() {
    let executor = ScriptedExecutor::new()
        .writing("@counter", Value::Int32(8))
        .returning_scalar(Value::Int32(8));

    let result = invoker()
        .invoke(&executor, "bumpCounter", &[Value::Int32(1), Value::Int64(7)])
        .await
        .unwrap();

    let seen = executor.seen();
    let (_, command) = &seen[0];
    assert_eq!(command.text, "SELECT * FROM BUMP(@step,@counter)");
    assert_eq!(command.parameters[1].direction, Direction::InOut);
    assert_eq!(command.parameters[1].value, Value::Int64(7));

    assert_eq!(
        result.outputs(),
        &[OutputValue::Unused, OutputValue::Value(Value::Int64(8))]
    );
}

#[tokio::test]
async fn test_result_set_uses_fill_path() {
    let table = QueryResult::from_rows(&["id"], vec![vec![Value::Int32(1)], vec![Value::Int32(2)]]);
    let executor = ScriptedExecutor::new()
        .writing("@total", Value::Int32(2))
        .returning_table(table);

    let result = invoker()
        .invoke(
            &executor,
            "listAccounts",
            &[Value::String("ada".into()), Value::Bool(true)],
        )
        .await
        .unwrap();

    let seen = executor.seen();
    let (path, command) = &seen[0];
    assert_eq!(*path, Path::Fill);
    assert_eq!(command.text, "SELECT * FROM LIST_ACCTS(@owner,@total,@active)");
    assert_eq!(command.parameters[0].value, Value::String("ada".into()));
    assert_eq!(command.parameters[2].value, Value::Bool(true));

    assert_eq!(result.table().map(|t| t.row_count()), Some(2));
    assert!(result.scalar().is_none());
    assert_eq!(
        result.into_outputs(),
        vec![
            OutputValue::Unused,
            OutputValue::Value(Value::Int64(2)),
            OutputValue::Unused,
        ]
    );
}

#[tokio::test]
async fn test_outputs_align_with_parameters() {
    let invoker = invoker();
    let cases: [(&str, Vec<Value>, usize); 4] = [
        ("getBalance", vec![Value::Int32(1)], 1),
        ("archiveAccount", vec![Value::Int32(1)], 2),
        ("bumpCounter", vec![Value::Int32(1), Value::Int64(1)], 2),
        ("listAccounts", vec![Value::String("a".into()), Value::Bool(false)], 3),
    ];

    for (call_id, inputs, expected) in cases {
        let executor = ScriptedExecutor::new();
        let result = invoker.invoke(&executor, call_id, &inputs).await.unwrap();
        assert_eq!(result.outputs().len(), expected, "call {}", call_id);
    }
}

#[tokio::test]
async fn test_out_parameter_left_null_stays_null() {
    let executor = ScriptedExecutor::new();

    let result = invoker()
        .invoke(&executor, "archiveAccount", &[Value::Int32(42)])
        .await
        .unwrap();

    assert_eq!(result.output(1), Some(&OutputValue::Value(Value::Null)));
}

#[tokio::test]
async fn test_unresolved_routine_never_executes() {
    let executor = ScriptedExecutor::new();

    let err = invoker()
        .invoke(&executor, "missing", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::UnresolvedRoutine(ref id) if id == "missing"));
    assert!(err.is_invalid_call());
    assert!(executor.seen().is_empty());
}

#[tokio::test]
async fn test_too_few_inputs_never_executes() {
    let executor = ScriptedExecutor::new();

    let err = invoker()
        .invoke(&executor, "bumpCounter", &[Value::Int32(1)])
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::InvalidCall(_)));
    assert!(executor.seen().is_empty());
}

#[tokio::test]
async fn test_backend_error_is_propagated_once() {
    let executor = ScriptedExecutor::new().failing("deadlock detected");

    let err = invoker()
        .invoke(&executor, "getBalance", &[Value::Int32(42)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CallError::BackendExecution(DbcallError::Query(ref message)) if message == "deadlock detected"
    ));
    assert_eq!(err.to_string(), "Query error: deadlock detected");
    assert_eq!(executor.seen().len(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let invoker = invoker();
    let first = ScriptedExecutor::new().writing("@status", Value::Int32(1));
    let second = ScriptedExecutor::new().writing("@status", Value::Int32(2));

    let (a, b) = tokio::join!(
        invoker.invoke(&first, "archiveAccount", &[Value::Int32(10)]),
        invoker.invoke(&second, "archiveAccount", &[Value::Int32(20)]),
    );

    assert_eq!(a.unwrap().output(1), Some(&OutputValue::Value(Value::Int32(1))));
    assert_eq!(b.unwrap().output(1), Some(&OutputValue::Value(Value::Int32(2))));
    assert_eq!(first.seen()[0].1.parameters[0].value, Value::Int32(10));
    assert_eq!(second.seen()[0].1.parameters[0].value, Value::Int32(20));
}

#[test]
fn test_prepare_builds_without_executing() {
    let prepared = invoker().prepare("getBalance", &[Value::Int32(42)]).unwrap();
    assert_eq!(prepared.routine.mapped_name, "GETBAL");
    assert_eq!(prepared.command.text, "SELECT * FROM GETBAL(@acct)");
}

// ============================================================================
// extract_outputs Tests
// ============================================================================

#[test]
fn test_extract_outputs_rejects_misaligned_parameters() {
    let descriptors = vec![ParameterDescriptor::new("a", ValueType::Int32)];
    let err = extract_outputs(&descriptors, &[], &StandardConverter, ConversionPolicy::Tag)
        .unwrap_err();
    assert!(matches!(err, CallError::InvalidCall(_)));
}

#[test]
fn test_extract_outputs_strips_by_ref_marker() {
    let descriptors = vec![ParameterDescriptor::new(
        "total",
        DeclaredType::by_ref(ValueType::Int16),
    )];
    let backend = vec![BackendParameter {
        bind_name: "@total".to_string(),
        direction: Direction::InOut,
        value: Value::Int64(12),
    }];

    let outputs =
        extract_outputs(&descriptors, &backend, &StandardConverter, ConversionPolicy::Tag).unwrap();
    assert_eq!(outputs, vec![OutputValue::Value(Value::Int16(12))]);
    assert_eq!(outputs[0].value(), Some(&Value::Int16(12)));
}

#[test]
fn test_output_value_display() {
    let failed = OutputValue::ConversionFailed {
        raw: Value::String("x".into()),
        target: ValueType::Int32,
        reason: "`x` is not an integer".into(),
    };
    assert_eq!(failed.to_string(), "<x not convertible to Int32>");
    assert!(failed.clone().into_value().is_none());
    assert_eq!(OutputValue::Value(Value::Int32(1)).to_string(), "1");
}
