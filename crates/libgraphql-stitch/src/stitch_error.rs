use crate::ast;
use crate::DelegationError;
use crate::FieldPath;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StitchError>;

/// Everything that can go wrong while rewriting a request or delegating it.
///
/// All variants except [`StitchError::Delegation`] are configuration errors
/// that are raised while building the outgoing request, before any executor
/// is invoked. None of them are retried.
#[derive(Clone, Debug, Error)]
pub enum StitchError {
    #[error("Delegated execution failed: {0}")]
    Delegation(#[from] DelegationError),

    #[error("Invalid stitch spec for `{option}`: {reason}")]
    InvalidStitchSpec {
        option: &'static str,
        reason: String,
    },

    #[error(
        "Fragment `{fragment_name}` is spread along the path but has no \
        definition"
    )]
    MissingFragmentDefinition {
        fragment_name: String,
    },

    #[error("{}", format_operation_not_found(.operation_name))]
    OperationNotFound {
        operation_name: Option<String>,
    },

    #[error(
        "No field named `{segment}` found while resolving path `{path}`"
    )]
    PathNotFound {
        path: FieldPath,
        segment: String,
    },

    #[error("Failed to parse selection set literal `{literal}`: {reason}")]
    SelectionSetParse {
        literal: String,
        reason: SelectionSetParseReason,
    },
}

fn format_operation_not_found(operation_name: &Option<String>) -> String {
    match operation_name {
        Some(name) => format!("No operation named `{name}` in the document"),
        None => "The document does not contain an operation".to_string(),
    }
}

#[derive(Clone, Debug, Error)]
pub enum SelectionSetParseReason {
    #[error("{0}")]
    Syntax(Arc<ast::operation::ParseError>),

    #[error("expected exactly one bare selection set (`{{ ... }}`)")]
    NotASelectionSet,

    #[error("`@extract` expects `path` to be a list of strings")]
    MalformedExtractPath,
}
