use crate::Document;
use crate::Variables;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// The root operation type of a delegated request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}
impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}
impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an [`Executor`] needs to send one delegated operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionRequest {
    /// The outgoing document: exactly one operation, plus the fragment
    /// definitions it spreads.
    pub document: Document,
    /// Name of the root field being delegated to. The delegated value is
    /// read from `data.<field_name>` of the response.
    pub field_name: String,
    pub operation: OperationKind,
    pub operation_name: Option<String>,
    pub variables: Variables,
}

/// A GraphQL response as returned by a remote service.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct ExecutionResponse {
    #[serde(default)]
    pub data: Option<JsonValue>,
    #[serde(default)]
    pub errors: Vec<GraphQLResponseError>,
}
impl ExecutionResponse {
    pub fn from_data(data: JsonValue) -> Self {
        Self {
            data: Some(data),
            errors: vec![],
        }
    }
}

/// One entry of a GraphQL response's `errors` list.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphQLResponseError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<JsonValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, JsonValue>>,
}
impl fmt::Display for GraphQLResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(path) = &self.path {
            let path = path.iter()
                .map(|segment| match segment {
                    JsonValue::String(key) => key.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".");
            write!(f, " (at `{path}`)")?;
        }
        Ok(())
    }
}

/// A failed delegation. The executor's own error is passed through without
/// interpretation.
#[derive(Clone, Debug, Error)]
pub enum DelegationError {
    #[error("{0}")]
    Executor(Arc<dyn StdError + Send + Sync>),

    #[error("{}", format_response_errors(.0))]
    Response(Vec<GraphQLResponseError>),
}
impl DelegationError {
    pub fn executor(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Executor(Arc::new(err))
    }
}

fn format_response_errors(errors: &[GraphQLResponseError]) -> String {
    let mut formatted = String::from("The delegated operation returned errors:");
    for error in errors {
        formatted.push_str("\n  * ");
        formatted.push_str(&error.to_string());
    }
    formatted
}

/// Sends delegated operations to a remote (or local) GraphQL service.
///
/// The transport is entirely up to the implementor; an executor is awaited
/// exactly once per delegation and nothing is retried.
pub trait Executor: Send + Sync {
    fn execute(
        &self,
        request: ExecutionRequest,
    ) -> impl Future<Output = Result<ExecutionResponse, DelegationError>> + Send;
}
