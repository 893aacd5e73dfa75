use std::fmt;

/// An ordered sequence of response names (alias if present, otherwise field
/// name) identifying a nested position in an operation, starting from the
/// operation's root selection set.
///
/// Paths are purely name-based: they never distinguish between two fields
/// that share a response name but differ in arguments.
#[derive(
    Clone,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);
impl FieldPath {
    /// The empty path, which addresses the operation's root selection set.
    pub fn root() -> Self {
        Self(vec![])
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns a new path with `other`'s segments appended after this path's
    /// segments.
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Parses a dot-separated path (`"customerById.address"`). An empty
    /// string yields [`FieldPath::root()`].
    pub fn from_dotted(dotted: &str) -> Self {
        Self::new(
            dotted.split('.')
                .map(str::trim)
                .filter(|segment| !segment.is_empty()),
        )
    }
}
impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}
impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
impl<S: Into<String>, const N: usize> From<[S; N]> for FieldPath {
    fn from(segments: [S; N]) -> Self {
        Self::new(segments)
    }
}
impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}
