use crate::delegated_operation::DelegatedOperation;
use crate::stitch_error::Result;
use crate::DelegationError;
use crate::Document;
use crate::ExecutionResponse;
use crate::Executor;
use crate::FieldPath;
use crate::FragmentRegistry;
use crate::OperationKind;
use crate::ResultMapper;
use crate::StitchQuery;
use crate::StitchQueryOptions;
use crate::StitchSpec;
use crate::Transform;
use crate::TransformedOperation;
use crate::Variables;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// What a resolver knows about the field it is resolving.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveInfo {
    pub document: Document,
    /// Response names leading from the operation root to the field being
    /// resolved.
    pub field_path: FieldPath,
    pub fragments: Arc<FragmentRegistry>,
    pub operation_name: Option<String>,
    pub variables: Variables,
}
impl ResolveInfo {
    /// Builds resolve info whose fragments are collected from `document` and
    /// that carries no variables.
    pub fn new(document: Document, field_path: impl Into<FieldPath>) -> Self {
        Self {
            fragments: Arc::new(FragmentRegistry::from_document(&document)),
            document,
            field_path: field_path.into(),
            operation_name: None,
            variables: Variables::default(),
        }
    }

    pub fn with_fragments(mut self, fragments: Arc<FragmentRegistry>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }
}

/// The remote root field a [`StitcherHandle`] delegates to.
#[derive(Clone, Debug, PartialEq)]
pub struct DelegationTarget {
    pub args: IndexMap<String, JsonValue>,
    pub field_name: String,
    pub operation: OperationKind,
}
impl DelegationTarget {
    pub fn new(operation: OperationKind, field_name: impl Into<String>) -> Self {
        Self {
            args: IndexMap::new(),
            field_name: field_name.into(),
            operation,
        }
    }

    pub fn query(field_name: impl Into<String>) -> Self {
        Self::new(OperationKind::Query, field_name)
    }

    pub fn mutation(field_name: impl Into<String>) -> Self {
        Self::new(OperationKind::Mutation, field_name)
    }

    pub fn subscription(field_name: impl Into<String>) -> Self {
        Self::new(OperationKind::Subscription, field_name)
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

/// Delegates resolver fields to a remote service through an [`Executor`].
///
/// A `Stitcher` is shared by all resolvers delegating to the same service.
/// Each resolver call starts its own [`StitcherHandle`] with
/// [`Stitcher::from_info`].
#[derive(Debug)]
pub struct Stitcher<E: Executor> {
    executor: Arc<E>,
}
impl<E: Executor> Stitcher<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    pub fn from_info(&self, info: ResolveInfo) -> StitcherHandle<E> {
        StitcherHandle {
            executor: self.executor.clone(),
            info: Arc::new(info),
            transforms: vec![],
        }
    }
}
impl<E: Executor> Clone for Stitcher<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

/// An ordered pipeline of [`Transform`]s bound to one resolver call.
///
/// Request rewrites run in registration order and result rewrites in the
/// reverse order, so every transform sees the result in the shape its own
/// request rewrite produced.
#[derive(Debug)]
pub struct StitcherHandle<E: Executor> {
    executor: Arc<E>,
    info: Arc<ResolveInfo>,
    transforms: Vec<Arc<dyn Transform>>,
}
impl<E: Executor> StitcherHandle<E> {
    pub fn info(&self) -> &ResolveInfo {
        &self.info
    }

    pub fn transforms(&self) -> &[Arc<dyn Transform>] {
        &self.transforms
    }

    /// Appends a [`StitchQuery`] with `spec` as its `fromStitch` option,
    /// based at the resolved field.
    pub fn transform(&self, spec: StitchSpec) -> Result<Self> {
        self.stitch_query(StitchQueryOptions::default().from_stitch(spec))
    }

    /// Appends a [`StitchQuery`] with `spec` as its `toStitch` option,
    /// based at the resolved field.
    pub fn to_stitch(&self, spec: StitchSpec) -> Result<Self> {
        self.stitch_query(StitchQueryOptions::default().to_stitch(spec))
    }

    /// Appends a function applied to the delegated result.
    pub fn map_result(
        &self,
        map: impl Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    ) -> Self {
        let label = format!("map_result#{}", self.transforms.len());
        self.with_transform(Arc::new(ResultMapper::new(label, map)))
    }

    pub fn with_transform(&self, transform: Arc<dyn Transform>) -> Self {
        let mut transforms = self.transforms.clone();
        transforms.push(transform);
        Self {
            executor: self.executor.clone(),
            info: self.info.clone(),
            transforms,
        }
    }

    fn stitch_query(&self, options: StitchQueryOptions) -> Result<Self> {
        let options = StitchQueryOptions {
            path: self.info.field_path.clone(),
            fragments: self.info.fragments.clone(),
            ..options
        };
        let stitch_query = StitchQuery::new(options)?
            .with_operation_name(self.info.operation_name.clone());
        Ok(self.with_transform(Arc::new(stitch_query)))
    }

    /// Rewrites the resolver's selection through every transform, sends it
    /// as `target` through the executor and maps the delegated value back
    /// through every transform.
    ///
    /// Nothing is sent if any request rewrite fails.
    pub async fn delegate_to(&self, target: DelegationTarget) -> Result<JsonValue> {
        let info = self.info.as_ref();
        let mut operation = TransformedOperation::new(
            info.document.clone(),
            info.variables.clone(),
        );
        for transform in &self.transforms {
            operation = transform.transform_request(operation)?;
        }

        let request = DelegatedOperation {
            args: &target.args,
            field_name: &target.field_name,
            field_path: &info.field_path,
            fragments: &info.fragments,
            operation: target.operation,
            operation_name: info.operation_name.as_deref(),
        }.build_request(operation)?;

        tracing::debug!(
            field_path = %info.field_path,
            field_name = target.field_name.as_str(),
            operation = %target.operation,
            transforms = self.transforms.len(),
            "delegating",
        );
        let response = self.executor.execute(request).await?;
        let value = delegated_value(response, &target.field_name)?;

        Ok(self.transforms.iter().rev().fold(value, |value, transform| {
            transform.transform_result(value)
        }))
    }
}
impl<E: Executor> Clone for StitcherHandle<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            info: self.info.clone(),
            transforms: self.transforms.clone(),
        }
    }
}

/// Picks `data.<field_name>` out of a response. Errors fail the delegation
/// only when they left the field without a value.
fn delegated_value(response: ExecutionResponse, field_name: &str) -> Result<JsonValue> {
    let value = match response.data {
        Some(JsonValue::Object(mut data)) => data.shift_remove(field_name).unwrap_or(JsonValue::Null),
        _ => JsonValue::Null,
    };

    if response.errors.is_empty() {
        return Ok(value);
    }
    if value.is_null() {
        return Err(DelegationError::Response(response.errors).into());
    }
    for error in &response.errors {
        tracing::warn!(
            field_name,
            error = %error,
            "delegated operation returned a partial result",
        );
    }
    Ok(value)
}
