//! Tool definition and typed dispatch.
//!
//! A [`Tool`] pairs a name and description with an input type, an output
//! type, and a handler. The concrete types are erased at construction time
//! into a single dispatch closure that runs:
//!
//! 1. the input gate (schema check + deserialize + [`Validate`]),
//! 2. the handler, using the calling convention chosen at construction,
//! 3. the output gate ([`Validate`] + serialize).
//!
//! Blocking handlers are moved onto tokio's blocking pool so that a slow
//! handler never stalls other in-flight requests. Suspending handlers are
//! awaited in place.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::error::ToolError;
use super::validation::{FieldViolation, Validate, schema_violations};

/// Result type returned by tool handlers.
pub type ToolResult<T> = Result<T, ToolError>;

type DispatchFn = dyn Fn(Value) -> BoxFuture<'static, ToolResult<Value>> + Send + Sync;

/// How a tool's handler must be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallingConvention {
    /// Plain function; runs on the blocking thread pool.
    Blocking,
    /// Returns a future; awaited on the async executor.
    Suspending,
}

/// A named, schema-validated procedure. Immutable once built.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    input_schema: Arc<Value>,
    output_schema: Value,
    convention: CallingConvention,
    dispatch: Arc<DispatchFn>,
}

impl Tool {
    /// Build a tool around a synchronous handler.
    pub fn blocking<I, O, F>(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + Validate + JsonSchema + Send + 'static,
        O: Serialize + Validate + JsonSchema + Send + 'static,
        F: Fn(I) -> ToolResult<O> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let input_schema = schema_of::<I>();
        let schema = Arc::clone(&input_schema);
        let dispatch = move |raw: Value| -> BoxFuture<'static, ToolResult<Value>> {
            let handler = Arc::clone(&handler);
            let schema = Arc::clone(&schema);
            async move {
                let input = input_gate::<I>(raw, &schema)?;
                let output = tokio::task::spawn_blocking(move || handler(input))
                    .await
                    .map_err(|e| ToolError::internal(format!("Handler task failed: {}", e)))??;
                output_gate(&output)
            }
            .boxed()
        };

        Self::from_parts::<O>(
            name,
            description,
            input_schema,
            CallingConvention::Blocking,
            Arc::new(dispatch),
        )
    }

    /// Build a tool around an asynchronous handler.
    pub fn suspending<I, O, F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        I: DeserializeOwned + Validate + JsonSchema + Send + 'static,
        O: Serialize + Validate + JsonSchema + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<O>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let input_schema = schema_of::<I>();
        let schema = Arc::clone(&input_schema);
        let dispatch = move |raw: Value| -> BoxFuture<'static, ToolResult<Value>> {
            let handler = Arc::clone(&handler);
            let schema = Arc::clone(&schema);
            async move {
                let input = input_gate::<I>(raw, &schema)?;
                let output = handler(input).await?;
                output_gate(&output)
            }
            .boxed()
        };

        Self::from_parts::<O>(
            name,
            description,
            input_schema,
            CallingConvention::Suspending,
            Arc::new(dispatch),
        )
    }

    fn from_parts<O: JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Arc<Value>,
        convention: CallingConvention,
        dispatch: Arc<DispatchFn>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            output_schema: schemars::schema_for!(O).to_value(),
            convention,
            dispatch,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn convention(&self) -> CallingConvention {
        self.convention
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &Value {
        &self.output_schema
    }

    /// Run the full gate/handler/gate pipeline on raw JSON arguments.
    pub fn call(&self, arguments: Value) -> BoxFuture<'static, ToolResult<Value>> {
        (self.dispatch)(arguments)
    }

    /// Metadata for tool listings.
    pub fn descriptor(&self) -> Value {
        let input_schema: &Value = &self.input_schema;
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "callingConvention": self.convention,
            "inputSchema": input_schema,
            "outputSchema": self.output_schema,
        })
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}

fn schema_of<T: JsonSchema>() -> Arc<Value> {
    Arc::new(schemars::schema_for!(T).to_value())
}

/// Check raw arguments against the input schema, then deserialize and
/// validate them.
fn input_gate<I>(raw: Value, schema: &Value) -> ToolResult<I>
where
    I: DeserializeOwned + Validate,
{
    let violations = schema_violations(&raw, schema);
    if !violations.is_empty() {
        return Err(ToolError::InvalidArguments(violations));
    }

    let input: I = serde_json::from_value(raw)
        .map_err(|e| ToolError::InvalidArguments(vec![FieldViolation::from_serde(&e)]))?;

    let violations = input.validate();
    if violations.is_empty() {
        Ok(input)
    } else {
        Err(ToolError::InvalidArguments(violations))
    }
}

/// Validate and serialize a handler's return value.
fn output_gate<O>(output: &O) -> ToolResult<Value>
where
    O: Serialize + Validate,
{
    let violations = output.validate();
    if !violations.is_empty() {
        let reasons = violations
            .iter()
            .map(|v| format!("{}: {}", v.loc.join("."), v.msg))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ToolError::invalid_output(reasons));
    }

    serde_json::to_value(output).map_err(|e| ToolError::invalid_output(e.to_string()))
}
