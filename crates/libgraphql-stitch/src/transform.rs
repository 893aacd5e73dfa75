use crate::stitch_error::Result;
use crate::Document;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Operation-scoped variable values.
///
/// Transforms hand variables along by cloning the [`Arc`], so non-primitive
/// values keep their identity across a whole pipeline.
pub type Variables = Arc<serde_json::Map<String, JsonValue>>;

/// The `(document, variables)` pair a [`Transform`] consumes and produces.
///
/// Each value is used for exactly one delegated call and is moved through
/// the pipeline rather than shared.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformedOperation {
    pub document: Document,
    pub variables: Variables,
}
impl TransformedOperation {
    pub fn new(document: Document, variables: Variables) -> Self {
        Self {
            document,
            variables,
        }
    }

    pub fn without_variables(document: Document) -> Self {
        Self::new(document, Variables::default())
    }
}

/// One stage of a delegation pipeline.
///
/// `transform_result` must undo the reshaping done by `transform_request`:
/// given the delegated value produced for the rewritten request, it returns
/// the value in the shape the un-rewritten request asked for. It never fails;
/// missing data is `null`.
pub trait Transform: fmt::Debug + Send + Sync {
    fn transform_request(&self, operation: TransformedOperation) -> Result<TransformedOperation>;

    fn transform_result(&self, result: JsonValue) -> JsonValue;
}

/// A [`Transform`] that leaves requests untouched and post-processes
/// delegated results with a function.
pub struct ResultMapper {
    label: String,
    map: Box<dyn Fn(JsonValue) -> JsonValue + Send + Sync>,
}
impl ResultMapper {
    pub fn new(
        label: impl Into<String>,
        map: impl Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            map: Box::new(map),
        }
    }
}
impl Transform for ResultMapper {
    fn transform_request(&self, operation: TransformedOperation) -> Result<TransformedOperation> {
        Ok(operation)
    }

    fn transform_result(&self, result: JsonValue) -> JsonValue {
        (self.map)(result)
    }
}
impl fmt::Debug for ResultMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultMapper")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
