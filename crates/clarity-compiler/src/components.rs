//! Component collection pass.
//!
//! Runs once before emission and produces a read-only table of every
//! component definition in the tree, wherever it appears.

use std::collections::HashMap;

use clarity_ast::{ComponentDefinition, Document, ElementBody, Node};
use clarity_common::warning::Diagnostics;

const COMPONENT: &str = "Components";

/// Component definitions by name, borrowed from the document.
#[derive(Debug, Default)]
pub struct ComponentTable<'a> {
    definitions: HashMap<&'a str, &'a ComponentDefinition>,
}

impl<'a> ComponentTable<'a> {
    /// Collect every definition in `document`, descending into element
    /// children, loop and conditional bodies and component bodies.
    ///
    /// A later definition of a name replaces an earlier one; each
    /// replacement is reported to `diagnostics`.
    #[must_use]
    pub fn collect(document: &'a Document, diagnostics: &mut Diagnostics) -> Self {
        let mut table = Self::default();
        table.visit(&document.children, diagnostics);
        table
    }

    fn visit(&mut self, nodes: &'a [Node], diagnostics: &mut Diagnostics) {
        for node in nodes {
            match node {
                Node::ComponentDefinition(definition) => {
                    let previous = self
                        .definitions
                        .insert(definition.name.as_str(), definition);
                    if previous.is_some() {
                        diagnostics.warn(
                            COMPONENT,
                            format!("Component {} is defined more than once", definition.name),
                        );
                    }
                    self.visit(&definition.body, diagnostics);
                }
                Node::Element(element) => {
                    if let ElementBody::Children(children) = &element.body {
                        self.visit(children, diagnostics);
                    }
                }
                Node::ForLoop(for_loop) => self.visit(&for_loop.body, diagnostics),
                Node::Conditional(conditional) => {
                    self.visit(&conditional.if_body, diagnostics);
                    if let Some(else_body) = &conditional.else_body {
                        self.visit(else_body, diagnostics);
                    }
                }
                Node::Text(_)
                | Node::VariableDeclaration(_)
                | Node::VariableReference(_)
                | Node::ComponentUse(_) => {}
            }
        }
    }

    /// Definition registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a ComponentDefinition> {
        self.definitions.get(name).copied()
    }

    /// Number of distinct component names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when the document defines no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
