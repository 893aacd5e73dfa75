use crate::ast;
use crate::file_reader;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// An executable GraphQL document whose definitions are shared by reference.
///
/// Rewrites never mutate a definition in place. Replacing a selection set
/// produces a new [`Document`] that holds a fresh copy of the single
/// definition owning that selection set and shares every other definition
/// with the original (see [`Document::with_definition`]). Untouched
/// definitions therefore print exactly as they did in the source document,
/// and one source document can be transformed concurrently by many
/// delegations.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    definitions: Vec<Arc<ast::operation::Definition>>,
}
impl Document {
    pub fn definitions(&self) -> &[Arc<ast::operation::Definition>] {
        &self.definitions
    }

    pub fn from_ast(ast: ast::operation::Document) -> Self {
        Self {
            definitions: ast.definitions.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_definitions(
        definitions: Vec<Arc<ast::operation::Definition>>,
    ) -> Self {
        Self { definitions }
    }

    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, DocumentParseError> {
        let content = file_reader::read_content(file_path.as_ref())
            .map_err(DocumentParseError::FileReadError)?;
        Self::parse(content)
    }

    /// Finds a fragment definition by name, returning its index among this
    /// document's definitions.
    pub fn fragment_definition(
        &self,
        name: &str,
    ) -> Option<(usize, &ast::operation::FragmentDefinition)> {
        self.definitions.iter().enumerate().find_map(|(idx, def)| {
            match def.as_ref() {
                ast::operation::Definition::Fragment(frag)
                    if frag.name == name => Some((idx, frag)),
                _ => None,
            }
        })
    }

    /// Finds an operation definition, returning its index among this
    /// document's definitions.
    ///
    /// With `name == None` the first operation in the document is returned.
    pub fn operation(
        &self,
        name: Option<&str>,
    ) -> Option<(usize, &ast::operation::OperationDefinition)> {
        self.definitions.iter().enumerate().find_map(|(idx, def)| {
            let ast::operation::Definition::Operation(op) = def.as_ref() else {
                return None;
            };
            match name {
                None => Some((idx, op)),
                Some(name) if operation_name(op) == Some(name) => Some((idx, op)),
                Some(_) => None,
            }
        })
    }

    pub fn parse(content: impl AsRef<str>) -> Result<Self, DocumentParseError> {
        let ast = ast::operation::parse(content.as_ref())
            .map_err(|e| DocumentParseError::ParseError(Arc::new(e)))?;
        Ok(Self::from_ast(ast))
    }

    pub fn to_ast(&self) -> ast::operation::Document {
        ast::operation::Document {
            definitions: self.definitions.iter()
                .map(|def| def.as_ref().clone())
                .collect(),
        }
    }

    /// Returns a copy of this document with the definition at `index`
    /// replaced. All other definitions are shared with `self`.
    pub fn with_definition(
        &self,
        index: usize,
        definition: ast::operation::Definition,
    ) -> Self {
        let mut definitions = self.definitions.clone();
        definitions[index] = Arc::new(definition);
        Self { definitions }
    }
}
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ast())
    }
}
impl From<ast::operation::Document> for Document {
    fn from(ast: ast::operation::Document) -> Self {
        Self::from_ast(ast)
    }
}

pub(crate) fn operation_name(
    op: &ast::operation::OperationDefinition,
) -> Option<&str> {
    use ast::operation::OperationDefinition as OpDef;
    match op {
        OpDef::Query(query) => query.name.as_deref(),
        OpDef::Mutation(mutation) => mutation.name.as_deref(),
        OpDef::Subscription(subscription) => subscription.name.as_deref(),
        OpDef::SelectionSet(_) => None,
    }
}

pub(crate) fn operation_selection_set(
    op: &ast::operation::OperationDefinition,
) -> &ast::operation::SelectionSet {
    use ast::operation::OperationDefinition as OpDef;
    match op {
        OpDef::Query(query) => &query.selection_set,
        OpDef::Mutation(mutation) => &mutation.selection_set,
        OpDef::Subscription(subscription) => &subscription.selection_set,
        OpDef::SelectionSet(selection_set) => selection_set,
    }
}

pub(crate) fn operation_selection_set_mut(
    op: &mut ast::operation::OperationDefinition,
) -> &mut ast::operation::SelectionSet {
    use ast::operation::OperationDefinition as OpDef;
    match op {
        OpDef::Query(query) => &mut query.selection_set,
        OpDef::Mutation(mutation) => &mut mutation.selection_set,
        OpDef::Subscription(subscription) => &mut subscription.selection_set,
        OpDef::SelectionSet(selection_set) => selection_set,
    }
}

#[derive(Clone, Debug, Error)]
pub enum DocumentParseError {
    #[error("Failure while trying to read a document file from disk: {0}")]
    FileReadError(file_reader::ReadContentError),

    #[error("Error parsing executable document: {0}")]
    ParseError(Arc<ast::operation::ParseError>),
}
