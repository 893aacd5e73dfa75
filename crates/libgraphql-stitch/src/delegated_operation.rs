//! Builds the single-field operation a [`Stitcher`](crate::Stitcher) sends to
//! its executor.

use crate::ast;
use crate::document;
use crate::stitch_error::Result;
use crate::Document;
use crate::ExecutionRequest;
use crate::FieldPath;
use crate::FragmentRegistry;
use crate::OperationKind;
use crate::PathLocator;
use crate::StitchError;
use crate::TransformedOperation;
use indexmap::IndexMap;
use indexmap::IndexSet;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;

pub(crate) struct DelegatedOperation<'a> {
    pub args: &'a IndexMap<String, JsonValue>,
    pub field_name: &'a str,
    pub field_path: &'a FieldPath,
    pub fragments: &'a FragmentRegistry,
    pub operation: OperationKind,
    pub operation_name: Option<&'a str>,
}
impl DelegatedOperation<'_> {
    /// Wraps the selection set found at `field_path` of the transformed
    /// document in `<operation> <Name>($vars) { <field_name>(<args>) { ... } }`,
    /// keeping only the variable definitions and fragment definitions that
    /// the new operation references.
    pub fn build_request(&self, transformed: TransformedOperation) -> Result<ExecutionRequest> {
        let document = &transformed.document;
        let fragments = self.fragments.overlaid_by(document);
        let locator = PathLocator::new(&fragments)
            .with_operation_name(self.operation_name.map(str::to_string));
        let selection_set = locator.locate(document, self.field_path)?
            .selection_set()
            .clone();

        let field = ast::operation::Field {
            position: ast::synthetic_pos(),
            alias: None,
            name: self.field_name.to_string(),
            arguments: self.args.iter()
                .map(|(name, value)| (name.clone(), json_to_ast_value(value)))
                .collect(),
            directives: vec![],
            selection_set,
        };
        let root_selection_set = ast::operation::SelectionSet {
            span: (ast::synthetic_pos(), ast::synthetic_pos()),
            items: vec![ast::operation::Selection::Field(field)],
        };

        let references = References::collect(&root_selection_set, &fragments)?;
        let (operation_name, source_variable_definitions) = self.source_operation(document)?;
        let operation_name = operation_name.map(str::to_string);
        let variable_definitions = source_variable_definitions
            .iter()
            .filter(|var_def| references.variables.contains(&var_def.name))
            .cloned()
            .collect::<Vec<_>>();

        let operation = build_operation_definition(
            self.operation,
            operation_name.clone(),
            variable_definitions,
            root_selection_set,
        );

        let mut definitions = vec![Arc::new(ast::operation::Definition::Operation(operation))];
        definitions.extend(
            references.fragment_definitions(document, &fragments)?
                .into_iter()
                .map(|frag| Arc::new(ast::operation::Definition::Fragment(frag))),
        );

        tracing::debug!(
            operation = %self.operation,
            field_name = self.field_name,
            fragments = references.fragments.len(),
            variables = references.variables.len(),
            "built delegated operation",
        );
        Ok(ExecutionRequest {
            document: Document::from_definitions(definitions),
            field_name: self.field_name.to_string(),
            operation: self.operation,
            operation_name,
            variables: transformed.variables,
        })
    }

    /// Name and variable definitions of the operation being resolved.
    fn source_operation<'doc>(
        &self,
        document: &'doc Document,
    ) -> Result<(Option<&'doc str>, &'doc [ast::operation::VariableDefinition])> {
        use ast::operation::OperationDefinition as OpDef;

        let (_, op) = document.operation(self.operation_name).ok_or_else(|| {
            StitchError::OperationNotFound {
                operation_name: self.operation_name.map(str::to_string),
            }
        })?;
        let variable_definitions = match op {
            OpDef::Query(query) => query.variable_definitions.as_slice(),
            OpDef::Mutation(mutation) => mutation.variable_definitions.as_slice(),
            OpDef::Subscription(subscription) => subscription.variable_definitions.as_slice(),
            OpDef::SelectionSet(_) => &[],
        };
        Ok((document::operation_name(op), variable_definitions))
    }
}

fn build_operation_definition(
    kind: OperationKind,
    name: Option<String>,
    variable_definitions: Vec<ast::operation::VariableDefinition>,
    selection_set: ast::operation::SelectionSet,
) -> ast::operation::OperationDefinition {
    use ast::operation::OperationDefinition as OpDef;

    let position = ast::synthetic_pos();
    match kind {
        OperationKind::Query => OpDef::Query(ast::operation::Query {
            position,
            name,
            variable_definitions,
            directives: vec![],
            selection_set,
        }),
        OperationKind::Mutation => OpDef::Mutation(ast::operation::Mutation {
            position,
            name,
            variable_definitions,
            directives: vec![],
            selection_set,
        }),
        OperationKind::Subscription => OpDef::Subscription(ast::operation::Subscription {
            position,
            name,
            variable_definitions,
            directives: vec![],
            selection_set,
        }),
    }
}

/// Variables and fragments referenced by a selection set, following
/// fragment spreads transitively.
#[derive(Debug, Default)]
struct References {
    fragments: IndexSet<String>,
    variables: HashSet<String>,
}
impl References {
    fn collect(
        selection_set: &ast::operation::SelectionSet,
        fragments: &FragmentRegistry,
    ) -> Result<Self> {
        let mut references = Self::default();
        let mut stack: Vec<&ast::operation::Selection> =
            selection_set.items.iter().rev().collect();

        while let Some(selection) = stack.pop() {
            match selection {
                ast::operation::Selection::Field(field) => {
                    for (_, value) in &field.arguments {
                        references.add_value(value);
                    }
                    references.add_directives(&field.directives);
                    stack.extend(field.selection_set.items.iter().rev());
                },

                ast::operation::Selection::InlineFragment(inline) => {
                    references.add_directives(&inline.directives);
                    stack.extend(inline.selection_set.items.iter().rev());
                },

                ast::operation::Selection::FragmentSpread(spread) => {
                    references.add_directives(&spread.directives);
                    let name = &spread.fragment_name;
                    if !references.fragments.insert(name.clone()) {
                        continue;
                    }
                    let fragment = fragments.get(name).ok_or_else(|| {
                        StitchError::MissingFragmentDefinition {
                            fragment_name: name.clone(),
                        }
                    })?;
                    references.add_directives(&fragment.directives);
                    stack.extend(fragment.selection_set.items.iter().rev());
                },
            }
        }

        Ok(references)
    }

    fn add_directives(&mut self, directives: &[ast::operation::Directive]) {
        for directive in directives {
            for (_, value) in &directive.arguments {
                self.add_value(value);
            }
        }
    }

    fn add_value(&mut self, value: &ast::Value) {
        match value {
            ast::Value::Variable(name) => {
                self.variables.insert(name.clone());
            },
            ast::Value::List(items) => items.iter().for_each(|item| self.add_value(item)),
            ast::Value::Object(fields) => fields.values().for_each(|item| self.add_value(item)),
            _ => (),
        }
    }

    /// Definitions of every referenced fragment: those the document defines
    /// first (in document order), then those only the registry knows about.
    fn fragment_definitions(
        &self,
        document: &Document,
        fragments: &FragmentRegistry,
    ) -> Result<Vec<ast::operation::FragmentDefinition>> {
        let mut from_document = vec![];
        let mut in_document = HashSet::new();
        for def in document.definitions() {
            if let ast::operation::Definition::Fragment(frag) = def.as_ref()
                && self.fragments.contains(&frag.name)
                && in_document.insert(frag.name.as_str()) {
                from_document.push(frag.clone());
            }
        }

        let mut from_registry = vec![];
        for name in &self.fragments {
            if in_document.contains(name.as_str()) {
                continue;
            }
            let frag = fragments.get(name).ok_or_else(|| {
                StitchError::MissingFragmentDefinition {
                    fragment_name: name.clone(),
                }
            })?;
            from_registry.push(frag.as_ref().clone());
        }

        from_document.extend(from_registry);
        Ok(from_document)
    }
}

/// Converts a JSON argument value into a GraphQL literal.
///
/// Integers outside of GraphQL's 32-bit `Int` range are sent as `Float`s.
pub(crate) fn json_to_ast_value(value: &JsonValue) -> ast::Value {
    match value {
        JsonValue::Null => ast::Value::Null,
        JsonValue::Bool(b) => ast::Value::Boolean(*b),
        JsonValue::Number(num) => match num.as_i64().and_then(|i| i32::try_from(i).ok()) {
            Some(int) => ast::Value::Int(ast::Number::from(int)),
            None => ast::Value::Float(num.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => ast::Value::String(s.clone()),
        JsonValue::Array(items) => ast::Value::List(
            items.iter().map(json_to_ast_value).collect(),
        ),
        JsonValue::Object(fields) => ast::Value::Object(
            fields.iter()
                .map(|(key, value)| (key.clone(), json_to_ast_value(value)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}
