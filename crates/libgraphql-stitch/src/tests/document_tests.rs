use crate::tests::utils::parse_document;
use crate::Document;
use crate::DocumentParseError;
use crate::ReadContentError;
use std::sync::Arc;

#[test]
fn operation_without_name_is_the_first_operation() {
    let document = parse_document(r#"
        fragment F on T { id }
        query First { a }
        query Second { b }
    "#);

    let (idx, _) = document.operation(None).unwrap();
    assert_eq!(idx, 1);

    let (idx, _) = document.operation(Some("Second")).unwrap();
    assert_eq!(idx, 2);

    assert!(document.operation(Some("Third")).is_none());
}

#[test]
fn fragment_definition_lookup() {
    let document = parse_document(r#"
        query { a { ...F } }
        fragment F on T { id }
    "#);

    let (idx, frag) = document.fragment_definition("F").unwrap();
    assert_eq!(idx, 1);
    assert_eq!(frag.name, "F");
    assert!(document.fragment_definition("G").is_none());
}

#[test]
fn with_definition_shares_untouched_definitions() {
    let document = parse_document(r#"
        query { a }
        fragment F on T { id }
    "#);
    let replacement = parse_document("query { b }").definitions()[0].as_ref().clone();

    let rewritten = document.with_definition(0, replacement);

    assert!(Arc::ptr_eq(&rewritten.definitions()[1], &document.definitions()[1]));
    assert!(!Arc::ptr_eq(&rewritten.definitions()[0], &document.definitions()[0]));
    // The source document is left alone.
    assert_eq!(document.to_string(), parse_document(r#"
        query { a }
        fragment F on T { id }
    "#).to_string());
}

#[test]
fn parse_error_is_reported() {
    let result = Document::parse("query { a ");
    assert!(matches!(result, Err(DocumentParseError::ParseError(_))));
}

#[test]
fn from_file_on_missing_path() {
    let path = std::env::temp_dir().join("libgraphql-stitch-does-not-exist.graphql");
    let result = Document::from_file(&path);
    assert!(matches!(
        result,
        Err(DocumentParseError::FileReadError(ReadContentError::PathIsNotAFile(p))) if p == path,
    ));
}

#[test]
fn from_file_reads_document() {
    let path = std::env::temp_dir().join(format!(
        "libgraphql-stitch-document-{}.graphql",
        std::process::id(),
    ));
    std::fs::write(&path, "query Q { a { b } }").unwrap();

    let document = Document::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(document.to_string(), parse_document("query Q { a { b } }").to_string());
}
