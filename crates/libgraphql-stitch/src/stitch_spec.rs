use crate::file_reader;
use crate::FieldPath;
use crate::FragmentRegistry;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// What a `fromStitch` / `toStitch` option asks for.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "RawStitchSpec", into = "RawStitchSpec")]
pub enum StitchSpec {
    /// Neither a path nor a selection set was given; nothing to do.
    #[default]
    Noop,

    /// A path below the transform's base path. The outgoing selection set is
    /// re-rooted at this path and results are re-wrapped under it.
    Path(FieldPath),

    /// A selection set literal (`"{ id ...PreStitch }"`) merged into the
    /// selection set at the transform's base path.
    SelectionSet(String),
}
impl StitchSpec {
    pub fn path(path: impl Into<FieldPath>) -> Self {
        Self::Path(path.into())
    }

    pub fn selection_set(literal: impl Into<String>) -> Self {
        Self::SelectionSet(literal.into())
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawStitchSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<FieldPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection_set: Option<String>,
}
impl TryFrom<RawStitchSpec> for StitchSpec {
    type Error = StitchSpecError;

    fn try_from(raw: RawStitchSpec) -> Result<Self, Self::Error> {
        match (raw.path, raw.selection_set) {
            (Some(_), Some(_)) => Err(StitchSpecError::PathAndSelectionSet),
            (Some(path), None) => Ok(Self::Path(path)),
            (None, Some(selection_set)) => Ok(Self::SelectionSet(selection_set)),
            (None, None) => Ok(Self::Noop),
        }
    }
}
impl From<StitchSpec> for RawStitchSpec {
    fn from(spec: StitchSpec) -> Self {
        match spec {
            StitchSpec::Noop => Self::default(),
            StitchSpec::Path(path) => Self {
                path: Some(path),
                selection_set: None,
            },
            StitchSpec::SelectionSet(selection_set) => Self {
                path: None,
                selection_set: Some(selection_set),
            },
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum StitchSpecError {
    #[error("a stitch spec takes either `path` or `selectionSet`, not both")]
    PathAndSelectionSet,
}

/// Construction options of a [`StitchQuery`](crate::StitchQuery).
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchQueryOptions {
    /// Base path of the transform. Empty means the operation root.
    #[serde(default)]
    pub path: FieldPath,

    #[serde(default)]
    pub from_stitch: StitchSpec,

    #[serde(default)]
    pub to_stitch: StitchSpec,

    /// Only needed when `path` (or `fromStitch.path`) crosses a fragment
    /// spread. Not part of serialized configs; fragments come from the
    /// document being transformed.
    #[serde(skip)]
    pub fragments: Arc<FragmentRegistry>,
}
impl StitchQueryOptions {
    pub fn new(path: impl Into<FieldPath>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_stitch(mut self, spec: StitchSpec) -> Self {
        self.from_stitch = spec;
        self
    }

    pub fn to_stitch(mut self, spec: StitchSpec) -> Self {
        self.to_stitch = spec;
        self
    }

    pub fn fragments(mut self, fragments: impl Into<Arc<FragmentRegistry>>) -> Self {
        self.fragments = fragments.into();
        self
    }
}

/// An ordered list of [`StitchQueryOptions`], as stored in a JSON config
/// file:
///
/// ```json
/// {
///   "transforms": [
///     { "path": ["customerById"], "fromStitch": { "path": ["address"] } }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchPipelineConfig {
    #[serde(default)]
    pub operation_name: Option<String>,
    pub transforms: Vec<StitchQueryOptions>,
}
impl StitchPipelineConfig {
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = file_reader::read_content(file_path.as_ref())
            .map_err(ConfigLoadError::FileReadError)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigLoadError> {
        serde_json::from_str(content)
            .map_err(|e| ConfigLoadError::ParseError(Arc::new(e)))
    }
}

#[derive(Clone, Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failure while trying to read a stitch config file from disk: {0}")]
    FileReadError(file_reader::ReadContentError),

    #[error("Error parsing stitch config: {0}")]
    ParseError(Arc<serde_json::Error>),
}
