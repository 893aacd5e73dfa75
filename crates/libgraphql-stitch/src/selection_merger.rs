use crate::ast;
use crate::ExtractionMarker;
use crate::FieldSelection;
use crate::InlineFragmentSelection;
use crate::Selection;
use crate::SelectionSet;
use std::collections::HashMap;

type MarkerFill<'a> = dyn Fn(&ExtractionMarker) -> Option<SelectionSet> + 'a;

/// Merges two [`SelectionSet`]s into a newly constructed one.
///
/// * Fields are keyed by alias, name and their arguments sorted by argument
///   name. Fields sharing a key are merged into one entry whose
///   sub-selections are merged recursively.
/// * Inline fragments are keyed by type condition and directives and merged
///   the same way.
/// * Fragment spreads are opaque and only deduplicated.
/// * Extraction markers are dropped, unless a fill was registered with
///   [`SelectionMerger::with_marker_fill`] and it yields selections for that
///   marker, in which case those selections are merged in at the marker's
///   position. A field or inline fragment whose only selections were
///   dropped markers is dropped with them.
/// * Directives are not part of a field's key. Merged fields keep the
///   directives of their first-seen entry.
///
/// Entries keep their first-seen order: base entries first, then whatever
/// `incoming` adds.
pub struct SelectionMerger<'a> {
    marker_fill: Option<Box<MarkerFill<'a>>>,
}
impl<'a> SelectionMerger<'a> {
    pub fn new() -> Self {
        Self {
            marker_fill: None,
        }
    }

    pub fn with_marker_fill(
        fill: impl Fn(&ExtractionMarker) -> Option<SelectionSet> + 'a,
    ) -> Self {
        Self {
            marker_fill: Some(Box::new(fill)),
        }
    }

    pub fn merge(&self, base: &SelectionSet, incoming: &SelectionSet) -> SelectionSet {
        let mut merged = MergedSelections::default();
        self.merge_into(&mut merged, &base.selections);
        self.merge_into(&mut merged, &incoming.selections);
        SelectionSet {
            selections: merged.selections,
            span: base.span,
        }
    }

    fn merge_into(&self, merged: &mut MergedSelections, selections: &[Selection]) {
        for selection in selections {
            if let Selection::PendingMarker(marker) = selection {
                let fill = self.marker_fill.as_ref().and_then(|fill| fill(marker));
                match fill {
                    Some(fill) => self.merge_into(merged, &fill.selections),
                    None => tracing::trace!(
                        location = %marker.location,
                        "eliding extraction marker without a fill",
                    ),
                }
                continue;
            }

            let key = MergeKey::of(selection);
            match merged.index_by_key.get(&key) {
                Some(&idx) => self.merge_existing(&mut merged.selections[idx], selection),
                None => {
                    let Some(normalized) = self.normalize(selection) else {
                        tracing::trace!(?key, "pruning selection emptied by marker elision");
                        continue;
                    };
                    merged.index_by_key.insert(key, merged.selections.len());
                    merged.selections.push(normalized);
                },
            }
        }
    }

    fn merge_existing(&self, existing: &mut Selection, incoming: &Selection) {
        match (existing, incoming) {
            (Selection::Field(existing), Selection::Field(incoming)) => {
                existing.selection_set = self.merge(
                    &existing.selection_set,
                    &incoming.selection_set,
                );
            },

            (Selection::InlineFragment(existing), Selection::InlineFragment(incoming)) => {
                existing.selection_set = self.merge(
                    &existing.selection_set,
                    &incoming.selection_set,
                );
            },

            // Fragment spreads with equal keys are identical.
            _ => (),
        }
    }

    /// Resolves any markers nested inside a selection that is being added
    /// without a merge partner.
    ///
    /// Returns `None` when a field or inline fragment selected something but
    /// nothing is left once its markers are resolved. Printing it as a leaf
    /// would select an object-typed field without a sub-selection.
    fn normalize(&self, selection: &Selection) -> Option<Selection> {
        match selection {
            Selection::Field(field) => {
                let selection_set = self.resolve_nested(&field.selection_set)?;
                Some(Selection::Field(FieldSelection {
                    selection_set,
                    ..field.clone()
                }))
            },

            Selection::InlineFragment(inline) => {
                let selection_set = self.resolve_nested(&inline.selection_set)?;
                Some(Selection::InlineFragment(InlineFragmentSelection {
                    selection_set,
                    ..inline.clone()
                }))
            },

            other => Some(other.clone()),
        }
    }

    fn resolve_nested(&self, selection_set: &SelectionSet) -> Option<SelectionSet> {
        let resolved = self.merge(selection_set, &SelectionSet::empty());
        (selection_set.is_empty() || !resolved.is_empty()).then_some(resolved)
    }
}
impl Default for SelectionMerger<'_> {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Debug for SelectionMerger<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionMerger")
            .field("has_marker_fill", &self.marker_fill.is_some())
            .finish()
    }
}

#[derive(Default)]
struct MergedSelections {
    index_by_key: HashMap<MergeKey, usize>,
    selections: Vec<Selection>,
}

#[derive(Debug, Eq, Hash, PartialEq)]
enum MergeKey {
    Field {
        alias: Option<String>,
        arguments: Vec<(String, String)>,
        name: String,
    },
    FragmentSpread {
        directives: String,
        name: String,
    },
    InlineFragment {
        directives: String,
        type_condition: Option<String>,
    },
    PendingMarker,
}
impl MergeKey {
    fn of(selection: &Selection) -> Self {
        match selection {
            Selection::Field(field) => {
                // `ast::Value` is neither `Hash` nor `Ord`, so key on its
                // debug rendering.
                let mut arguments: Vec<(String, String)> = field.arguments.iter()
                    .map(|(name, value)| (name.clone(), format!("{value:?}")))
                    .collect();
                arguments.sort();
                MergeKey::Field {
                    alias: field.alias.clone(),
                    arguments,
                    name: field.name.clone(),
                }
            },

            Selection::FragmentSpread(spread) => MergeKey::FragmentSpread {
                directives: directives_key(&spread.directives),
                name: spread.fragment_name.clone(),
            },

            Selection::InlineFragment(inline) => MergeKey::InlineFragment {
                directives: directives_key(&inline.directives),
                type_condition: inline.type_condition.as_ref().map(|cond| {
                    let ast::operation::TypeCondition::On(type_name) = cond;
                    type_name.clone()
                }),
            },

            Selection::PendingMarker(_) => MergeKey::PendingMarker,
        }
    }
}

fn directives_key(directives: &[ast::operation::Directive]) -> String {
    directives.iter()
        .map(|directive| format!("@{}{:?}", directive.name, directive.arguments))
        .collect::<Vec<_>>()
        .join(" ")
}
