use crate::ast;
use crate::stitch_error::SelectionSetParseReason;
use crate::ExtractionMarker;
use crate::FieldPath;
use crate::StitchError;
use std::sync::Arc;

/// A selection set in the form the [`SelectionMerger`](crate::SelectionMerger)
/// operates on.
///
/// Unlike the parser's AST, this model represents extraction markers as a
/// dedicated [`Selection::PendingMarker`] variant. Markers can only be
/// introduced by [`SelectionSet::parse_literal`]; selection sets converted
/// from a caller's document with [`SelectionSet::from_ast`] keep every
/// fragment spread as a plain [`Selection::FragmentSpread`], whatever its
/// name.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSet {
    pub(crate) selections: Vec<Selection>,
    pub(crate) span: (ast::AstPos, ast::AstPos),
}
impl SelectionSet {
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn new(selections: Vec<Selection>) -> Self {
        Self {
            selections,
            span: (ast::synthetic_pos(), ast::synthetic_pos()),
        }
    }

    pub fn from_ast(ast: &ast::operation::SelectionSet) -> Self {
        Self {
            selections: ast.items.iter().map(Selection::from_ast).collect(),
            span: ast.span,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Converts back to the parser's AST.
    ///
    /// Any [`Selection::PendingMarker`] still present at this point has no
    /// stage left to fill it and is dropped, so the resulting AST never
    /// contains an extraction marker.
    pub fn into_ast(self) -> ast::operation::SelectionSet {
        ast::operation::SelectionSet {
            span: self.span,
            items: self.selections.into_iter()
                .filter_map(Selection::into_ast)
                .collect(),
        }
    }

    /// Like [`SelectionSet::into_ast`], but yields `None` when a non-empty
    /// selection set converts to an empty one. A leaf stays a leaf.
    fn into_pruned_ast(self) -> Option<ast::operation::SelectionSet> {
        let was_empty = self.is_empty();
        let ast = self.into_ast();
        (was_empty || !ast.items.is_empty()).then_some(ast)
    }

    /// Every extraction marker in this selection set, in document order.
    pub fn markers(&self) -> Vec<&ExtractionMarker> {
        let mut markers = vec![];
        let mut stack: Vec<&Selection> = self.selections.iter().rev().collect();
        while let Some(selection) = stack.pop() {
            match selection {
                Selection::Field(field) =>
                    stack.extend(field.selection_set.selections.iter().rev()),
                Selection::InlineFragment(inline) =>
                    stack.extend(inline.selection_set.selections.iter().rev()),
                Selection::PendingMarker(marker) => markers.push(marker),
                Selection::FragmentSpread(_) => (),
            }
        }
        markers
    }

    /// Parses a stitch `selectionSet` literal such as
    /// `{ id ...PreStitch }`.
    ///
    /// Spreads of the reserved marker fragment become
    /// [`Selection::PendingMarker`]s annotated with their location in the
    /// literal.
    pub fn parse_literal(literal: &str) -> Result<Self, StitchError> {
        let parse_error = |reason| StitchError::SelectionSetParse {
            literal: literal.to_string(),
            reason,
        };

        let mut doc = ast::operation::parse(literal)
            .map_err(|e| parse_error(SelectionSetParseReason::Syntax(Arc::new(e))))?;
        if doc.definitions.len() != 1 {
            return Err(parse_error(SelectionSetParseReason::NotASelectionSet));
        }
        let ast_selection_set = match doc.definitions.remove(0) {
            ast::operation::Definition::Operation(
                ast::operation::OperationDefinition::SelectionSet(selection_set),
            ) => selection_set,
            _ => return Err(parse_error(SelectionSetParseReason::NotASelectionSet)),
        };

        Self::from_literal_ast(&ast_selection_set, &FieldPath::root())
            .map_err(parse_error)
    }

    fn from_literal_ast(
        ast: &ast::operation::SelectionSet,
        location: &FieldPath,
    ) -> Result<Self, SelectionSetParseReason> {
        let mut selections = Vec::with_capacity(ast.items.len());
        for item in &ast.items {
            let selection = match item {
                ast::operation::Selection::Field(field) => {
                    let child_location =
                        location.join(&FieldPath::new([response_name(field)]));
                    Selection::Field(FieldSelection {
                        selection_set: Self::from_literal_ast(
                            &field.selection_set,
                            &child_location,
                        )?,
                        ..FieldSelection::from_ast_shallow(field)
                    })
                },

                ast::operation::Selection::FragmentSpread(spread) => {
                    match ExtractionMarker::from_spread(spread, location)? {
                        Some(marker) => Selection::PendingMarker(marker),
                        None => Selection::FragmentSpread(spread.clone()),
                    }
                },

                ast::operation::Selection::InlineFragment(inline) => {
                    Selection::InlineFragment(InlineFragmentSelection {
                        directives: inline.directives.clone(),
                        position: inline.position,
                        selection_set: Self::from_literal_ast(
                            &inline.selection_set,
                            location,
                        )?,
                        type_condition: inline.type_condition.clone(),
                    })
                },
            };
            selections.push(selection);
        }

        Ok(Self {
            selections,
            span: ast.span,
        })
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }
}
impl Default for SelectionSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(FieldSelection),
    FragmentSpread(ast::operation::FragmentSpread),
    InlineFragment(InlineFragmentSelection),
    PendingMarker(ExtractionMarker),
}
impl Selection {
    pub fn from_ast(ast: &ast::operation::Selection) -> Self {
        match ast {
            ast::operation::Selection::Field(field) =>
                Selection::Field(FieldSelection {
                    selection_set: SelectionSet::from_ast(&field.selection_set),
                    ..FieldSelection::from_ast_shallow(field)
                }),

            ast::operation::Selection::FragmentSpread(spread) =>
                Selection::FragmentSpread(spread.clone()),

            ast::operation::Selection::InlineFragment(inline) =>
                Selection::InlineFragment(InlineFragmentSelection {
                    directives: inline.directives.clone(),
                    position: inline.position,
                    selection_set: SelectionSet::from_ast(&inline.selection_set),
                    type_condition: inline.type_condition.clone(),
                }),
        }
    }

    /// Returns `None` for unfilled markers, and for fields or inline
    /// fragments left with nothing selected once their markers are dropped.
    fn into_ast(self) -> Option<ast::operation::Selection> {
        Some(match self {
            Selection::Field(field) => {
                let selection_set = field.selection_set.into_pruned_ast()?;
                ast::operation::Selection::Field(ast::operation::Field {
                    alias: field.alias,
                    arguments: field.arguments,
                    directives: field.directives,
                    name: field.name,
                    position: field.position,
                    selection_set,
                })
            },

            Selection::FragmentSpread(spread) =>
                ast::operation::Selection::FragmentSpread(spread),

            Selection::InlineFragment(inline) => {
                let selection_set = inline.selection_set.into_pruned_ast()?;
                ast::operation::Selection::InlineFragment(ast::operation::InlineFragment {
                    directives: inline.directives,
                    position: inline.position,
                    selection_set,
                    type_condition: inline.type_condition,
                })
            },

            Selection::PendingMarker(marker) => {
                tracing::trace!(
                    location = %marker.location,
                    "dropping unfilled extraction marker",
                );
                return None;
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSelection {
    pub(crate) alias: Option<String>,
    pub(crate) arguments: Vec<(String, ast::Value)>,
    pub(crate) directives: Vec<ast::operation::Directive>,
    pub(crate) name: String,
    pub(crate) position: ast::AstPos,
    pub(crate) selection_set: SelectionSet,
}
impl FieldSelection {
    fn from_ast_shallow(field: &ast::operation::Field) -> Self {
        Self {
            alias: field.alias.clone(),
            arguments: field.arguments.clone(),
            directives: field.directives.clone(),
            name: field.name.clone(),
            position: field.position,
            selection_set: SelectionSet::empty(),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn arguments(&self) -> &[(String, ast::Value)] {
        &self.arguments
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// If an alias was specified for this selection, return the alias.
    /// Otherwise return the name of the field.
    pub fn response_name(&self) -> &str {
        self.alias().unwrap_or(self.name())
    }

    pub fn selection_set(&self) -> &SelectionSet {
        &self.selection_set
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragmentSelection {
    pub(crate) directives: Vec<ast::operation::Directive>,
    pub(crate) position: ast::AstPos,
    pub(crate) selection_set: SelectionSet,
    pub(crate) type_condition: Option<ast::operation::TypeCondition>,
}
impl InlineFragmentSelection {
    pub fn selection_set(&self) -> &SelectionSet {
        &self.selection_set
    }

    pub fn type_condition(&self) -> Option<&ast::operation::TypeCondition> {
        self.type_condition.as_ref()
    }
}

/// The key under which `field`'s value appears in a response.
pub(crate) fn response_name(field: &ast::operation::Field) -> &str {
    field.alias.as_deref().unwrap_or(field.name.as_str())
}
