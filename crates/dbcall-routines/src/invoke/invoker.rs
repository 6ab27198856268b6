//! Routine invocation pipeline

use dbcall_core::{Value, ValueConverter};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    extract_outputs, CallBuilder, CallError, CallResult, CommandExecutor, InvokerConfig,
    OutputValue, Result, ReturnShape, RoutineCatalog, RoutineCommand, RoutineDescriptor,
};

/// A built call that has not been executed
#[derive(Debug, Clone)]
pub struct PreparedCall {
    /// Descriptor the call was built from
    pub routine: Arc<RoutineDescriptor>,
    /// Command ready for execution
    pub command: RoutineCommand,
}

/// Invokes routines by call identifier
///
/// The invoker holds only immutable state, so one instance can serve
/// concurrent calls as long as each call brings its own executor.
pub struct RoutineInvoker {
    catalog: Arc<dyn RoutineCatalog>,
    converter: Arc<dyn ValueConverter>,
    config: InvokerConfig,
    builder: CallBuilder,
}

impl RoutineInvoker {
    /// Create an invoker
    pub fn new(
        catalog: Arc<dyn RoutineCatalog>,
        converter: Arc<dyn ValueConverter>,
        config: InvokerConfig,
    ) -> Self {
        let builder = CallBuilder::from_config(&config);
        Self {
            catalog,
            converter,
            config,
            builder,
        }
    }

    /// Get the invoker configuration
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Resolve `call_id` and build its command without executing it
    pub fn prepare(&self, call_id: &str, inputs: &[Value]) -> Result<PreparedCall> {
        let routine = self
            .catalog
            .resolve(call_id)
            .ok_or_else(|| CallError::UnresolvedRoutine(call_id.to_string()))?;
        let command = self.builder.build(&routine, inputs)?;
        Ok(PreparedCall { routine, command })
    }

    /// Invoke the routine mapped to `call_id`
    ///
    /// The command is executed exactly once on `executor`, through the
    /// tabular path when the routine returns a result set and the scalar
    /// path otherwise. Output values are read after execution and hold one
    /// entry per routine parameter.
    #[tracing::instrument(skip(self, executor, inputs), fields(inputs = inputs.len()))]
    pub async fn invoke(
        &self,
        executor: &dyn CommandExecutor,
        call_id: &str,
        inputs: &[Value],
    ) -> Result<CallResult> {
        let PreparedCall {
            routine,
            mut command,
        } = self.prepare(call_id, inputs)?;

        let start = Instant::now();
        let result = match routine.returns {
            ReturnShape::ResultSet => {
                let data = executor.fill(&mut command).await?;
                let outputs = self.extract(&routine, &command)?;
                CallResult::Tabular { data, outputs }
            }
            ReturnShape::Scalar => {
                let value = executor.execute_scalar(&mut command).await?;
                let outputs = self.extract(&routine, &command)?;
                CallResult::Scalar { value, outputs }
            }
        };

        tracing::debug!(
            routine = %routine.mapped_name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "routine call completed"
        );
        Ok(result)
    }

    fn extract(
        &self,
        routine: &RoutineDescriptor,
        command: &RoutineCommand,
    ) -> Result<Vec<OutputValue>> {
        extract_outputs(
            &routine.parameters,
            &command.parameters,
            self.converter.as_ref(),
            self.config.conversion_policy(),
        )
    }
}
