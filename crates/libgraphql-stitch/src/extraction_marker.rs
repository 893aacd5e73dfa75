//! The extraction-marker protocol shared by every stage of a stitching
//! pipeline.
//!
//! Inside a `selectionSet` literal, the fragment spread
//! `...PreStitch` marks a position that a later stage may fill with more
//! selections. Annotated as `...PreStitch @extract(path: ["a", "b"])`, the
//! marker additionally names the caller's selection (relative to the
//! transform's base path) that fills it on the way out, and where the data
//! found at the marker's position is spliced back on the way in.

use crate::ast;
use crate::response_value;
use crate::stitch_error::SelectionSetParseReason;
use crate::FieldPath;
use serde_json::Value as JsonValue;

/// Reserved fragment name of the extraction marker.
pub const EXTRACTION_MARKER_NAME: &str = "PreStitch";

/// Directive that attaches an extract path to an extraction marker.
pub const EXTRACT_DIRECTIVE_NAME: &str = "extract";

/// Argument of [`EXTRACT_DIRECTIVE_NAME`] holding the path (`[String]`).
pub const EXTRACT_PATH_ARG: &str = "path";

/// A pending insertion/extraction point in a stitch selection set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractionMarker {
    pub(crate) extract_path: Option<FieldPath>,
    pub(crate) location: FieldPath,
}
impl ExtractionMarker {
    /// The path named by `@extract(path: ...)`, if the marker carried one.
    pub fn extract_path(&self) -> Option<&FieldPath> {
        self.extract_path.as_ref()
    }

    /// Response names of the fields enclosing this marker within the literal
    /// it was parsed from.
    pub fn location(&self) -> &FieldPath {
        &self.location
    }

    /// Recognizes a fragment spread as an extraction marker.
    ///
    /// Returns `Ok(None)` for any spread not named
    /// [`EXTRACTION_MARKER_NAME`].
    pub(crate) fn from_spread(
        spread: &ast::operation::FragmentSpread,
        location: &FieldPath,
    ) -> Result<Option<Self>, SelectionSetParseReason> {
        if spread.fragment_name != EXTRACTION_MARKER_NAME {
            return Ok(None);
        }

        let extract_directive = spread.directives.iter()
            .find(|directive| directive.name == EXTRACT_DIRECTIVE_NAME);
        let extract_path = match extract_directive {
            Some(directive) => Some(parse_extract_path(directive)?),
            None => None,
        };

        Ok(Some(Self {
            extract_path,
            location: location.clone(),
        }))
    }

    /// Applies this marker's result-side rewrite to one delegated value.
    ///
    /// Markers without an extract path leave the value untouched.
    pub fn hoist(&self, value: JsonValue) -> JsonValue {
        hoist_all(value, std::slice::from_ref(self))
    }
}

fn parse_extract_path(
    directive: &ast::operation::Directive,
) -> Result<FieldPath, SelectionSetParseReason> {
    let Some((_, value)) = directive.arguments.iter()
        .find(|(name, _)| name == EXTRACT_PATH_ARG) else {
        return Ok(FieldPath::root());
    };

    match value {
        ast::Value::List(items) => items.iter()
            .map(|item| match item {
                ast::Value::String(segment) => Ok(segment.clone()),
                _ => Err(SelectionSetParseReason::MalformedExtractPath),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldPath::from),

        // Input coercion allows a single item where a list is expected.
        ast::Value::String(segment) => Ok(FieldPath::new([segment.clone()])),

        _ => Err(SelectionSetParseReason::MalformedExtractPath),
    }
}

/// Hoists the data found at each extracting marker's location up into the
/// caller's shape.
///
/// For a marker at location `[l0, l1, ...]` extracting `[p0, p1, ...]`, the
/// value at `l0.l1...` is read (absent or `null` along the way reads as
/// `null`), the wrapping key `l0` is removed, and the value is spliced back
/// under `p0.p1...`. A marker with an empty location reads the whole object,
/// so nothing of the original object is kept. An empty extract path makes the hoisted value replace
/// the whole object. Lists are rewritten element-wise and `null` is returned
/// unchanged.
pub(crate) fn hoist_all(value: JsonValue, markers: &[ExtractionMarker]) -> JsonValue {
    let extracting: Vec<(&FieldPath, &FieldPath)> = markers.iter()
        .filter_map(|marker| {
            marker.extract_path.as_ref().map(|path| (&marker.location, path))
        })
        .collect();
    if extracting.is_empty() {
        return value;
    }

    response_value::map_objects(value, &mut |mut object| {
        let hoisted: Vec<(&FieldPath, JsonValue)> = extracting.iter()
            .map(|(location, extract_path)| {
                let value = response_value::value_in_object(
                    &object,
                    location.segments(),
                );
                (*extract_path, value)
            })
            .collect();

        for (location, _) in &extracting {
            match location.segments().first() {
                Some(wrapper) => {
                    object.shift_remove(wrapper);
                },
                // A marker at the top of the literal read the whole object.
                None => object.clear(),
            }
        }

        let mut result = JsonValue::Object(object);
        for (extract_path, value) in hoisted {
            match extract_path.segments().split_first() {
                None => result = value,
                Some((key, rest)) => {
                    let wrapped = response_value::wrap_in_path(value, rest);
                    response_value::merge_at_key(&mut result, key, wrapped);
                },
            }
        }
        result
    })
}
