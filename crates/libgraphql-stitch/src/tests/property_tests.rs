//! Property-based tests over generated selection trees.

use crate::tests::utils::literal;
use crate::tests::utils::parse_document;
use crate::tests::utils::print_selection_set;
use crate::tests::utils::transform_document;
use crate::FieldPath;
use crate::SelectionMerger;
use crate::StitchQuery;
use crate::StitchQueryOptions;
use crate::StitchSpec;
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct FieldTree {
    name: String,
    children: Vec<FieldTree>,
}

fn field_name() -> impl Strategy<Value = String> {
    "f_[a-z]{1,2}"
}

fn selection_trees() -> impl Strategy<Value = Vec<FieldTree>> {
    let leaf = field_name().prop_map(|name| FieldTree { name, children: vec![] });
    let tree = leaf.prop_recursive(3, 24, 4, |inner| {
        (field_name(), prop::collection::vec(inner, 1..4))
            .prop_map(|(name, children)| FieldTree { name, children })
    });
    prop::collection::vec(tree, 1..4)
}

fn render(fields: &[FieldTree]) -> String {
    let items = fields.iter()
        .map(|field| match field.children.as_slice() {
            [] => field.name.clone(),
            children => format!("{} {}", field.name, render(children)),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{{ {items} }}")
}

/// Follows the first field at each level for at most `depth` levels.
fn first_field_path(fields: &[FieldTree], depth: usize) -> FieldPath {
    let mut segments = vec![];
    let mut current = fields;
    while segments.len() < depth {
        let Some(field) = current.first() else {
            break;
        };
        segments.push(field.name.clone());
        current = &field.children;
    }
    FieldPath::from(segments)
}

proptest! {
    #[test]
    fn transform_without_stitch_spec_is_identity(
        fields in selection_trees(),
        depth in 0usize..4,
    ) {
        let document = parse_document(&format!("query Generated {}", render(&fields)));
        let path = first_field_path(&fields, depth);
        let transform = StitchQuery::new(StitchQueryOptions::new(path)).unwrap();

        let transformed = transform_document(&transform, &document);
        prop_assert_eq!(transformed.to_string(), document.to_string());
    }

    #[test]
    fn merging_twice_equals_merging_once(
        base in selection_trees(),
        incoming in selection_trees(),
    ) {
        let merger = SelectionMerger::new();
        let incoming = literal(&render(&incoming));
        let once = merger.merge(&literal(&render(&base)), &incoming);
        let twice = merger.merge(&once, &incoming);

        prop_assert_eq!(print_selection_set(once), print_selection_set(twice));
    }

    #[test]
    fn applying_a_selection_set_transform_twice_equals_once(
        fields in selection_trees(),
        added in selection_trees(),
    ) {
        let document = parse_document(&format!("query Generated {}", render(&fields)));
        let transform = StitchQuery::new(
            StitchQueryOptions::new(FieldPath::root())
                .to_stitch(StitchSpec::selection_set(render(&added))),
        ).unwrap();

        let once = transform_document(&transform, &document);
        let twice = transform_document(&transform, &once);
        prop_assert_eq!(once.to_string(), twice.to_string());
    }
}
