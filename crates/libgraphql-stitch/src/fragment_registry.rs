use crate::ast;
use crate::Document;
use indexmap::IndexMap;
use std::sync::Arc;
use std::sync::OnceLock;

fn empty_fragment_registry() -> &'static FragmentRegistry {
    static EMPTY_FRAGMENT_REGISTRY: OnceLock<FragmentRegistry> = OnceLock::new();
    EMPTY_FRAGMENT_REGISTRY.get_or_init(FragmentRegistry::default)
}

/// A caller-supplied lookup of fragment definitions keyed by fragment name.
///
/// [`PathLocator`](crate::PathLocator) expands fragment spreads exclusively
/// through a `FragmentRegistry`; there is no implicit or global fragment
/// lookup. Registries are usually built from the document being transformed
/// via [`FragmentRegistry::from_document`], but may also carry definitions
/// that live outside of that document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentRegistry {
    fragments: IndexMap<String, Arc<ast::operation::FragmentDefinition>>,
}

impl FragmentRegistry {
    pub fn empty() -> &'static FragmentRegistry {
        empty_fragment_registry()
    }

    pub fn fragments(&self) -> &IndexMap<String, Arc<ast::operation::FragmentDefinition>> {
        &self.fragments
    }

    /// Collects every fragment definition in `document`, in document order.
    ///
    /// If a fragment name is defined more than once, the first definition
    /// wins.
    pub fn from_document(document: &Document) -> Self {
        let mut fragments = IndexMap::new();
        for def in document.definitions() {
            if let ast::operation::Definition::Fragment(frag) = def.as_ref()
                && !fragments.contains_key(&frag.name) {
                fragments.insert(frag.name.clone(), Arc::new(frag.clone()));
            }
        }
        Self { fragments }
    }

    /// Returns a registry holding every fragment defined in `document`,
    /// plus this registry's fragments for names `document` doesn't define.
    pub fn overlaid_by(&self, document: &Document) -> Self {
        let mut fragments = Self::from_document(document).fragments;
        for (name, frag) in &self.fragments {
            fragments.entry(name.clone()).or_insert_with(|| frag.clone());
        }
        Self { fragments }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ast::operation::FragmentDefinition>> {
        self.fragments.get(name)
    }

    /// Adds (or replaces) a fragment definition.
    pub fn insert(&mut self, fragment: ast::operation::FragmentDefinition) {
        self.fragments.insert(fragment.name.clone(), Arc::new(fragment));
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}
