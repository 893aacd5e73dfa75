use crate::ast;
use crate::tests::utils::assert_prints_as;
use crate::tests::utils::parse_document;
use crate::FieldPath;
use crate::FragmentRegistry;
use crate::PathLocator;
use crate::RouteOwner;
use crate::StitchError;
use std::sync::Arc;

const CUSTOMER_QUERY: &str = r#"
    query customerQuery($id: ID!) {
      customerById(id: $id) {
        id
        name
        address {
          planet
        }
      }
    }
"#;

fn field_names(selection_set: &ast::operation::SelectionSet) -> Vec<&str> {
    selection_set.items.iter()
        .filter_map(|item| match item {
            ast::operation::Selection::Field(field) => Some(field.name.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_path_locates_operation_root() {
    let document = parse_document(CUSTOMER_QUERY);
    let context = PathLocator::new(FragmentRegistry::empty())
        .locate(&document, &FieldPath::root())
        .unwrap();

    assert_eq!(field_names(context.selection_set()), vec!["customerById"]);
    assert_eq!(context.route().owner, RouteOwner::Operation(0));
    assert!(context.route().steps.is_empty());
    assert!(context.path().is_empty());
}

#[test]
fn nested_path_records_route() {
    let document = parse_document(CUSTOMER_QUERY);
    let context = PathLocator::new(FragmentRegistry::empty())
        .locate(&document, &FieldPath::from(["customerById", "address"]))
        .unwrap();

    assert_eq!(field_names(context.selection_set()), vec!["planet"]);
    assert_eq!(context.route().owner, RouteOwner::Operation(0));
    assert_eq!(context.route().steps, vec![0, 2]);
    assert_eq!(context.path(), &FieldPath::from(["customerById", "address"]));
}

#[test]
fn segments_match_response_names() {
    let document = parse_document("{ customer: customerById(id: 1) { id } }");
    let locator = PathLocator::new(FragmentRegistry::empty());

    assert!(locator.locate(&document, &FieldPath::from(["customer"])).is_ok());

    let err = locator
        .locate(&document, &FieldPath::from(["customerById"]))
        .unwrap_err();
    assert!(matches!(
        err,
        StitchError::PathNotFound { segment, .. } if segment == "customerById",
    ));
}

#[test]
fn missing_segment_reports_full_path() {
    let document = parse_document(CUSTOMER_QUERY);
    let err = PathLocator::new(FragmentRegistry::empty())
        .locate(&document, &FieldPath::from(["customerById", "phone"]))
        .unwrap_err();

    match err {
        StitchError::PathNotFound { path, segment } => {
            assert_eq!(path, FieldPath::from(["customerById", "phone"]));
            assert_eq!(segment, "phone");
        },
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[test]
fn path_through_fragment_spread() {
    let document = parse_document(r#"
        query customerQuery($id: ID!) {
          customerById(id: $id) {
            ...CustomerFragment
          }
        }
        fragment CustomerFragment on Customer {
          id
          address {
            planet
          }
        }
    "#);
    let fragments = FragmentRegistry::from_document(&document);
    let context = PathLocator::new(&fragments)
        .locate(&document, &FieldPath::from(["customerById", "address"]))
        .unwrap();

    assert_eq!(field_names(context.selection_set()), vec!["planet"]);
    assert_eq!(
        context.route().owner,
        RouteOwner::Fragment("CustomerFragment".to_string()),
    );
    assert_eq!(context.route().steps, vec![1]);
    assert_eq!(context.fragments_entered(), ["CustomerFragment".to_string()]);
}

#[test]
fn path_through_inline_fragment() {
    let document = parse_document(r#"
        {
          node(id: 1) {
            id
            ... on Customer {
              address { planet }
            }
          }
        }
    "#);
    let context = PathLocator::new(FragmentRegistry::empty())
        .locate(&document, &FieldPath::from(["node", "address"]))
        .unwrap();

    assert_eq!(field_names(context.selection_set()), vec!["planet"]);
    assert_eq!(context.route().steps, vec![0, 1, 0]);
}

#[test]
fn spread_without_definition_is_an_error() {
    let document = parse_document(r#"
        query { customerById(id: 1) { ...CustomerFragment } }
    "#);
    let err = PathLocator::new(FragmentRegistry::empty())
        .locate(&document, &FieldPath::from(["customerById", "address"]))
        .unwrap_err();

    assert!(matches!(
        err,
        StitchError::MissingFragmentDefinition { fragment_name }
            if fragment_name == "CustomerFragment",
    ));
}

#[test]
fn cyclic_fragments_terminate() {
    let document = parse_document(r#"
        query { customer { ...A } }
        fragment A on Customer { id ...B }
        fragment B on Customer { name ...A }
    "#);
    let fragments = FragmentRegistry::from_document(&document);
    let err = PathLocator::new(&fragments)
        .locate(&document, &FieldPath::from(["customer", "address"]))
        .unwrap_err();

    assert!(matches!(err, StitchError::PathNotFound { .. }));
}

#[test]
fn first_match_in_document_order_wins() {
    let document = parse_document(r#"
        query {
          customer { ...WithName }
          customer { id }
        }
        fragment WithName on Customer { name }
    "#);
    let fragments = FragmentRegistry::from_document(&document);
    let context = PathLocator::new(&fragments)
        .locate(&document, &FieldPath::from(["customer"]))
        .unwrap();

    assert_eq!(context.route().steps, vec![0]);
    assert!(field_names(context.selection_set()).is_empty());
}

#[test]
fn named_operation_selection() {
    let document = parse_document(r#"
        query First { a { x } }
        query Second { b { y } }
    "#);
    let fragments = FragmentRegistry::default();

    let context = PathLocator::new(&fragments)
        .with_operation_name(Some("Second".to_string()))
        .locate(&document, &FieldPath::from(["b"]))
        .unwrap();
    assert_eq!(context.route().owner, RouteOwner::Operation(1));
    assert_eq!(field_names(context.selection_set()), vec!["y"]);

    let err = PathLocator::new(&fragments)
        .with_operation_name(Some("Third".to_string()))
        .locate(&document, &FieldPath::from(["b"]))
        .unwrap_err();
    assert!(matches!(
        err,
        StitchError::OperationNotFound { operation_name: Some(name) } if name == "Third",
    ));
}

#[test]
fn locate_from_continues_relative_to_context() {
    let document = parse_document(CUSTOMER_QUERY);
    let locator = PathLocator::new(FragmentRegistry::empty());
    let base = locator.locate(&document, &FieldPath::from(["customerById"])).unwrap();
    let target = locator.locate_from(&base, &FieldPath::from(["address"])).unwrap();

    assert_eq!(target.path(), &FieldPath::from(["customerById", "address"]));
    assert_eq!(field_names(target.selection_set()), vec!["planet"]);
}

#[test]
fn replace_rewrites_only_the_owning_fragment() {
    let document = parse_document(r#"
        query customerQuery($id: ID!) {
          customerById(id: $id) { ...CustomerFragment }
        }
        fragment CustomerFragment on Customer {
          id
          address { planet }
        }
        fragment Unrelated on Planet { name }
    "#);
    let fragments = FragmentRegistry::from_document(&document);
    let context = PathLocator::new(&fragments)
        .locate(&document, &FieldPath::from(["customerById", "address"]))
        .unwrap();
    let replacement = parse_document("{ planet moons }");
    let replacement = match replacement.definitions()[0].as_ref() {
        ast::operation::Definition::Operation(
            ast::operation::OperationDefinition::SelectionSet(selection_set),
        ) => selection_set.clone(),
        other => panic!("Unexpected definition: {other:?}"),
    };

    let rewritten = context.replace(&document, replacement).unwrap();

    assert_prints_as(&rewritten, r#"
        query customerQuery($id: ID!) {
          customerById(id: $id) { ...CustomerFragment }
        }
        fragment CustomerFragment on Customer {
          id
          address { planet moons }
        }
        fragment Unrelated on Planet { name }
    "#);
    assert!(Arc::ptr_eq(&rewritten.definitions()[0], &document.definitions()[0]));
    assert!(Arc::ptr_eq(&rewritten.definitions()[2], &document.definitions()[2]));
}
