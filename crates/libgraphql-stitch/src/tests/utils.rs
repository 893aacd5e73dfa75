//! Helpers shared by the unit tests.

use crate::ast;
use crate::Document;
use crate::SelectionSet;
use crate::Transform;
use crate::TransformedOperation;

pub fn parse_document(src: &str) -> Document {
    Document::parse(src).unwrap()
}

/// Prints `src` the way a [`Document`] built from it would print, so tests
/// can compare documents regardless of source whitespace.
pub fn normalized(src: &str) -> String {
    parse_document(src).to_string()
}

pub fn assert_prints_as(actual: &Document, expected_src: &str) {
    assert_eq!(actual.to_string(), normalized(expected_src));
}

pub fn literal(src: &str) -> SelectionSet {
    SelectionSet::parse_literal(src).unwrap()
}

pub fn print_selection_set(selection_set: SelectionSet) -> String {
    let document = ast::operation::Document {
        definitions: vec![ast::operation::Definition::Operation(
            ast::operation::OperationDefinition::SelectionSet(selection_set.into_ast()),
        )],
    };
    document.to_string()
}

pub fn transform_document(transform: &dyn Transform, document: &Document) -> Document {
    transform
        .transform_request(TransformedOperation::without_variables(document.clone()))
        .unwrap()
        .document
}
