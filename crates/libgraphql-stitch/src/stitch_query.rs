use crate::ast;
use crate::extraction_marker;
use crate::response_value;
use crate::stitch_error::Result;
use crate::ExtractionMarker;
use crate::FieldPath;
use crate::FragmentRegistry;
use crate::PathLocator;
use crate::SelectionContext;
use crate::SelectionMerger;
use crate::SelectionSet;
use crate::StitchError;
use crate::StitchQueryOptions;
use crate::StitchSpec;
use crate::Transform;
use crate::TransformedOperation;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// The path-scoped selection-set transform.
///
/// A `StitchQuery` targets the selection set at `path` and, depending on its
/// options, either re-roots it at a deeper position (`fromStitch.path`) or
/// merges a selection set literal into it (`fromStitch.selectionSet`,
/// `toStitch.selectionSet`). [`Transform::transform_result`] undoes the
/// reshaping on the delegated value.
///
/// ```
/// use libgraphql_stitch::{Document, StitchQuery, StitchQueryOptions, StitchSpec};
/// use libgraphql_stitch::{Transform, TransformedOperation};
///
/// let document = Document::parse(
///     "query { customerById(id: 1) { id address { planet } } }",
/// ).unwrap();
/// let transform = StitchQuery::new(
///     StitchQueryOptions::new(["customerById"])
///         .from_stitch(StitchSpec::path(["address"])),
/// ).unwrap();
///
/// let transformed = transform
///     .transform_request(TransformedOperation::without_variables(document))
///     .unwrap();
/// assert_eq!(
///     transformed.document.to_string(),
///     Document::parse("query { customerById(id: 1) { planet } }")
///         .unwrap()
///         .to_string(),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct StitchQuery {
    fragments: Arc<FragmentRegistry>,
    from_stitch: ParsedStitchSpec,
    operation_name: Option<String>,
    path: FieldPath,
    to_stitch: ParsedStitchSpec,
}

#[derive(Clone, Debug)]
enum ParsedStitchSpec {
    Noop,
    Path(FieldPath),
    SelectionSet(SelectionSet),
}
impl ParsedStitchSpec {
    fn parse(spec: StitchSpec) -> Result<Self> {
        Ok(match spec {
            StitchSpec::Noop => Self::Noop,
            StitchSpec::Path(path) => Self::Path(path),
            StitchSpec::SelectionSet(literal) =>
                Self::SelectionSet(SelectionSet::parse_literal(&literal)?),
        })
    }

    fn markers(&self) -> Vec<&ExtractionMarker> {
        match self {
            Self::SelectionSet(selection_set) => selection_set.markers(),
            Self::Noop | Self::Path(_) => vec![],
        }
    }
}

impl StitchQuery {
    /// Builds a transform, parsing any selection set literals up front.
    pub fn new(options: StitchQueryOptions) -> Result<Self> {
        if let StitchSpec::Path(path) = &options.to_stitch {
            return Err(StitchError::InvalidStitchSpec {
                option: "toStitch",
                reason: format!(
                    "only `selectionSet` is supported, got path `{path}`",
                ),
            });
        }

        Ok(Self {
            fragments: options.fragments,
            from_stitch: ParsedStitchSpec::parse(options.from_stitch)?,
            operation_name: None,
            path: options.path,
            to_stitch: ParsedStitchSpec::parse(options.to_stitch)?,
        })
    }

    /// Selects which operation of a multi-operation document is rewritten.
    pub fn with_operation_name(mut self, operation_name: Option<String>) -> Self {
        self.operation_name = operation_name;
        self
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    fn is_noop(&self) -> bool {
        matches!(
            (&self.from_stitch, &self.to_stitch),
            (ParsedStitchSpec::Noop, ParsedStitchSpec::Noop),
        )
    }

    /// Fragments of the document being rewritten take precedence over the
    /// registry, so earlier rewrites of a fragment body stay visible.
    fn locator<'a>(&self, fragments: &'a FragmentRegistry) -> PathLocator<'a> {
        PathLocator::new(fragments)
            .with_operation_name(self.operation_name.clone())
    }

    fn merge_literal(
        &self,
        operation: TransformedOperation,
        literal: &SelectionSet,
    ) -> Result<TransformedOperation> {
        let fragments = self.fragments.overlaid_by(&operation.document);
        let locator = self.locator(&fragments);
        let base = locator.locate(&operation.document, &self.path)?;

        let markers = literal.markers();
        let extracting = markers.iter().any(|marker| marker.extract_path.is_some());
        let merged = if extracting {
            let fills = collect_marker_fills(&locator, &base, &markers)?;
            SelectionMerger::with_marker_fill(|marker: &ExtractionMarker| {
                marker.extract_path.as_ref()
                    .and_then(|path| fills.get(path))
                    .cloned()
            }).merge(literal, &SelectionSet::empty())
        } else {
            let existing = SelectionSet::from_ast(base.selection_set());
            SelectionMerger::new().merge(literal, &existing)
        };

        tracing::debug!(
            path = %self.path,
            extracting,
            "merging stitch selection set",
        );
        let mut merged = merged.into_ast();
        if merged.items.is_empty() && !base.selection_set().items.is_empty() {
            // Every selection of the literal was an unfilled marker.
            tracing::debug!(path = %self.path, "selecting `__typename` in place of elided markers");
            merged.items.push(typename_selection());
        }
        let document = base.replace(&operation.document, merged)?;
        Ok(TransformedOperation {
            document,
            variables: operation.variables,
        })
    }

    fn zoom(
        &self,
        operation: TransformedOperation,
        sub_path: &FieldPath,
    ) -> Result<TransformedOperation> {
        let fragments = self.fragments.overlaid_by(&operation.document);
        let locator = self.locator(&fragments);
        let base = locator.locate(&operation.document, &self.path)?;
        let target = locator.locate_from(&base, sub_path)?;

        tracing::debug!(
            path = %self.path,
            sub_path = %sub_path,
            "re-rooting selection set",
        );
        let document = base.replace(&operation.document, target.selection_set().clone())?;
        Ok(TransformedOperation {
            document,
            variables: operation.variables,
        })
    }
}

impl Transform for StitchQuery {
    fn transform_request(&self, operation: TransformedOperation) -> Result<TransformedOperation> {
        // Surface a bad base path even when there's nothing else to do.
        let fragments = self.fragments.overlaid_by(&operation.document);
        self.locator(&fragments).locate(&operation.document, &self.path)?;
        if self.is_noop() {
            return Ok(operation);
        }

        let mut operation = operation;
        if let ParsedStitchSpec::Path(sub_path) = &self.from_stitch {
            operation = self.zoom(operation, sub_path)?;
        }
        for spec in [&self.from_stitch, &self.to_stitch] {
            if let ParsedStitchSpec::SelectionSet(literal) = spec {
                operation = self.merge_literal(operation, literal)?;
            }
        }
        Ok(operation)
    }

    fn transform_result(&self, result: JsonValue) -> JsonValue {
        let mut result = result;
        for spec in [&self.to_stitch, &self.from_stitch] {
            let markers: Vec<ExtractionMarker> =
                spec.markers().into_iter().cloned().collect();
            result = extraction_marker::hoist_all(result, &markers);
        }

        if let ParsedStitchSpec::Path(sub_path) = &self.from_stitch
            && !sub_path.is_empty() {
            result = response_value::map_non_null(result, &mut |value| {
                response_value::wrap_in_path(value, sub_path.segments())
            });
        }
        result
    }
}

fn typename_selection() -> ast::operation::Selection {
    ast::operation::Selection::Field(ast::operation::Field {
        alias: None,
        arguments: vec![],
        directives: vec![],
        name: "__typename".to_string(),
        position: ast::synthetic_pos(),
        selection_set: ast::operation::SelectionSet {
            items: vec![],
            span: (ast::synthetic_pos(), ast::synthetic_pos()),
        },
    })
}

/// Finds, for each extract path named by a marker, the caller's
/// selection set at that path below the base selection set. Paths the
/// caller did not select yield no fill.
fn collect_marker_fills(
    locator: &PathLocator<'_>,
    base: &SelectionContext,
    markers: &[&ExtractionMarker],
) -> Result<HashMap<FieldPath, SelectionSet>> {
    let mut fills = HashMap::new();
    for extract_path in markers.iter().filter_map(|marker| marker.extract_path.as_ref()) {
        if fills.contains_key(extract_path) {
            continue;
        }
        match locator.locate_from(base, extract_path) {
            Ok(context) => {
                fills.insert(
                    extract_path.clone(),
                    SelectionSet::from_ast(context.selection_set()),
                );
            },
            Err(StitchError::PathNotFound { .. }) => {
                tracing::debug!(
                    path = %base.path().join(extract_path),
                    "caller did not select the extracted path; eliding marker",
                );
            },
            Err(err) => return Err(err),
        }
    }
    Ok(fills)
}
