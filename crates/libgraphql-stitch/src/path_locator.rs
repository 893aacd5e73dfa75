use crate::ast;
use crate::document;
use crate::selection::response_name;
use crate::stitch_error::Result;
use crate::Document;
use crate::FieldPath;
use crate::FragmentRegistry;
use crate::StitchError;
use std::collections::HashSet;

/// Identifies the definition that owns a located selection set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouteOwner {
    /// The operation definition at this index of the document.
    Operation(usize),
    /// The fragment definition with this name.
    Fragment(String),
}

/// Where a located selection set lives: the owning definition plus the
/// index of each field or inline fragment entered from that definition's
/// top-level selection set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectionRoute {
    pub owner: RouteOwner,
    pub steps: Vec<usize>,
}
impl SelectionRoute {
    fn child(&self, idx: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(idx);
        Self {
            owner: self.owner.clone(),
            steps,
        }
    }
}

/// A selection set found by [`PathLocator`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionContext {
    fragments_entered: Vec<String>,
    path: FieldPath,
    route: SelectionRoute,
    selection_set: ast::operation::SelectionSet,
}
impl SelectionContext {
    /// Names of the fragment spreads expanded on the way to this selection
    /// set, in the order they were entered.
    pub fn fragments_entered(&self) -> &[String] {
        &self.fragments_entered
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn route(&self) -> &SelectionRoute {
        &self.route
    }

    pub fn selection_set(&self) -> &ast::operation::SelectionSet {
        &self.selection_set
    }

    /// Produces a copy of `document` in which exactly the selection set this
    /// context was located at is replaced by `selection_set`.
    ///
    /// Only the owning definition is rebuilt; every other definition is
    /// shared with `document`. When the selection set lives inside a
    /// fragment, the body of that fragment's definition in `document` is
    /// rewritten while its name, type condition and directives are kept.
    pub fn replace(
        &self,
        document: &Document,
        selection_set: ast::operation::SelectionSet,
    ) -> Result<Document> {
        let (def_idx, mut definition) = match &self.route.owner {
            RouteOwner::Operation(idx) => {
                let definition = document.definitions().get(*idx).ok_or_else(|| {
                    StitchError::OperationNotFound {
                        operation_name: None,
                    }
                })?;
                (*idx, definition.as_ref().clone())
            },
            RouteOwner::Fragment(name) => {
                let (idx, _) = document.fragment_definition(name).ok_or_else(|| {
                    StitchError::MissingFragmentDefinition {
                        fragment_name: name.clone(),
                    }
                })?;
                (idx, document.definitions()[idx].as_ref().clone())
            },
        };

        let mut target = match &mut definition {
            ast::operation::Definition::Operation(op) =>
                document::operation_selection_set_mut(op),
            ast::operation::Definition::Fragment(frag) => &mut frag.selection_set,
        };
        for &step in &self.route.steps {
            let not_found = || StitchError::PathNotFound {
                path: self.path.clone(),
                segment: self.path.segments().last().cloned().unwrap_or_default(),
            };
            target = match target.items.get_mut(step).ok_or_else(not_found)? {
                ast::operation::Selection::Field(field) => &mut field.selection_set,
                ast::operation::Selection::InlineFragment(inline) => &mut inline.selection_set,
                ast::operation::Selection::FragmentSpread(_) => return Err(not_found()),
            };
        }
        *target = selection_set;

        tracing::trace!(
            path = %self.path,
            definition = def_idx,
            "replaced selection set",
        );
        Ok(document.with_definition(def_idx, definition))
    }
}

/// Walks an operation down a [`FieldPath`], entering fragment spreads and
/// inline fragments transparently.
///
/// At every path segment the current selection set is scanned in document
/// order. Fields match on response name. Fragment spreads (resolved through
/// the supplied [`FragmentRegistry`]) and inline fragments are searched in
/// place, depth-first, without consuming a segment. The first match wins.
#[derive(Clone, Debug)]
pub struct PathLocator<'fragreg> {
    fragments: &'fragreg FragmentRegistry,
    operation_name: Option<String>,
}
impl<'fragreg> PathLocator<'fragreg> {
    pub fn new(fragments: &'fragreg FragmentRegistry) -> Self {
        Self {
            fragments,
            operation_name: None,
        }
    }

    /// Selects the operation to start from by name. Without a name, the
    /// document's first operation is used.
    pub fn with_operation_name(mut self, operation_name: Option<String>) -> Self {
        self.operation_name = operation_name;
        self
    }

    /// Locates the selection set at `path`, starting from the operation's
    /// root selection set.
    pub fn locate(&self, document: &Document, path: &FieldPath) -> Result<SelectionContext> {
        let (op_idx, op) = document.operation(self.operation_name.as_deref())
            .ok_or_else(|| StitchError::OperationNotFound {
                operation_name: self.operation_name.clone(),
            })?;

        let root = SelectionContext {
            fragments_entered: vec![],
            path: FieldPath::root(),
            route: SelectionRoute {
                owner: RouteOwner::Operation(op_idx),
                steps: vec![],
            },
            selection_set: document::operation_selection_set(op).clone(),
        };
        self.locate_from(&root, path)
    }

    /// Continues a walk from an already located selection set. The returned
    /// context's path is `from.path()` followed by `path`.
    pub fn locate_from(
        &self,
        from: &SelectionContext,
        path: &FieldPath,
    ) -> Result<SelectionContext> {
        let mut current = from.clone();
        let full_path = from.path.join(path);
        for segment in path.segments() {
            current = self.find_field(&current, segment, &full_path)?;
        }
        current.path = full_path;
        Ok(current)
    }

    fn find_field(
        &self,
        from: &SelectionContext,
        segment: &str,
        full_path: &FieldPath,
    ) -> Result<SelectionContext> {
        struct Frame<'a> {
            fragments_entered: Vec<String>,
            items: &'a [ast::operation::Selection],
            next: usize,
            route: SelectionRoute,
        }

        let mut visited_fragments: HashSet<&str> = HashSet::new();
        let mut stack = vec![Frame {
            fragments_entered: from.fragments_entered.clone(),
            items: &from.selection_set.items,
            next: 0,
            route: from.route.clone(),
        }];

        while let Some(frame) = stack.last_mut() {
            let items = frame.items;
            let Some(item) = items.get(frame.next) else {
                stack.pop();
                continue;
            };
            let idx = frame.next;
            frame.next += 1;

            match item {
                ast::operation::Selection::Field(field) => {
                    if response_name(field) == segment {
                        return Ok(SelectionContext {
                            fragments_entered: frame.fragments_entered.clone(),
                            path: from.path.join(&FieldPath::new([segment])),
                            route: frame.route.child(idx),
                            selection_set: field.selection_set.clone(),
                        });
                    }
                },

                ast::operation::Selection::InlineFragment(inline) => {
                    let child = Frame {
                        fragments_entered: frame.fragments_entered.clone(),
                        items: &inline.selection_set.items,
                        next: 0,
                        route: frame.route.child(idx),
                    };
                    stack.push(child);
                },

                ast::operation::Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    let fragment = self.fragments.get(name).ok_or_else(|| {
                        StitchError::MissingFragmentDefinition {
                            fragment_name: name.to_string(),
                        }
                    })?;
                    // A fragment spread more than once (or cyclically) can't
                    // offer a match the first visit didn't.
                    if !visited_fragments.insert(name) {
                        continue;
                    }
                    let mut fragments_entered = frame.fragments_entered.clone();
                    fragments_entered.push(name.to_string());
                    let child = Frame {
                        fragments_entered,
                        items: &fragment.selection_set.items,
                        next: 0,
                        route: SelectionRoute {
                            owner: RouteOwner::Fragment(name.to_string()),
                            steps: vec![],
                        },
                    };
                    stack.push(child);
                },
            }
        }

        Err(StitchError::PathNotFound {
            path: full_path.clone(),
            segment: segment.to_string(),
        })
    }
}
