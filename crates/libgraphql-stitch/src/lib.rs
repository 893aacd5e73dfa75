//! Path-scoped selection-set transforms and a delegation pipeline for
//! GraphQL schema stitching.
//!
//! A resolver that delegates its field to a remote service describes how the
//! outgoing selection must be reshaped with [`StitchQuery`] transforms, and
//! a [`Stitcher`] runs them forward over the request and backward over the
//! delegated result.

pub mod ast;
mod delegated_operation;
mod document;
mod executor;
mod extraction_marker;
mod field_path;
pub mod file_reader;
mod fragment_registry;
mod path_locator;
mod response_value;
mod selection;
mod selection_merger;
mod stitch_error;
mod stitch_query;
mod stitch_spec;
mod stitcher;
mod transform;

pub use document::Document;
pub use document::DocumentParseError;
pub use executor::DelegationError;
pub use executor::ExecutionRequest;
pub use executor::ExecutionResponse;
pub use executor::Executor;
pub use executor::GraphQLResponseError;
pub use executor::OperationKind;
pub use extraction_marker::ExtractionMarker;
pub use extraction_marker::EXTRACT_DIRECTIVE_NAME;
pub use extraction_marker::EXTRACT_PATH_ARG;
pub use extraction_marker::EXTRACTION_MARKER_NAME;
pub use field_path::FieldPath;
pub use file_reader::ReadContentError;
pub use fragment_registry::FragmentRegistry;
pub use path_locator::PathLocator;
pub use path_locator::RouteOwner;
pub use path_locator::SelectionContext;
pub use path_locator::SelectionRoute;
pub use selection::FieldSelection;
pub use selection::InlineFragmentSelection;
pub use selection::Selection;
pub use selection::SelectionSet;
pub use selection_merger::SelectionMerger;
pub use stitch_error::Result;
pub use stitch_error::SelectionSetParseReason;
pub use stitch_error::StitchError;
pub use stitch_query::StitchQuery;
pub use stitch_spec::ConfigLoadError;
pub use stitch_spec::StitchPipelineConfig;
pub use stitch_spec::StitchQueryOptions;
pub use stitch_spec::StitchSpec;
pub use stitch_spec::StitchSpecError;
pub use stitcher::DelegationTarget;
pub use stitcher::ResolveInfo;
pub use stitcher::Stitcher;
pub use stitcher::StitcherHandle;
pub use transform::ResultMapper;
pub use transform::Transform;
pub use transform::TransformedOperation;
pub use transform::Variables;

#[cfg(test)]
mod tests;
