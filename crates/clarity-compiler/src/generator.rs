use clarity_ast::{
    AttributeValue, Attributes, ComponentUse, Conditional, DOCUMENT_ROOT, Document, Element,
    ElementBody, ForLoop, Inline, Node, TextContent, TextKind, VariableReference,
};
use clarity_common::warning::Diagnostics;

use crate::components::ComponentTable;
use crate::condition;
use crate::environment::Environment;
use crate::iterable::parse_list_literal;

/// Component name used when reporting through the warning channel.
const COMPONENT: &str = "Generator";

/// Spaces per nesting level in the output.
const INDENT_WIDTH: usize = 2;

/// Elements whose body is copied verbatim from a triple-quoted block.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["style", "script"];

/// Walks a [`Document`] and produces HTML text.
///
/// Generation runs in two passes: every component definition is collected
/// into a [`ComponentTable`], then the tree is emitted depth-first with an
/// explicit [`Environment`].
///
/// # Example
/// ```
/// use clarity_compiler::HtmlGenerator;
/// use clarity_syntax::{Parser, Tokenizer};
///
/// let tokens = Tokenizer::tokenize("p: \"Hi\"").unwrap();
/// let document = Parser::new(tokens).run();
/// assert_eq!(HtmlGenerator::new(&document).generate(), "<p>Hi</p>");
/// ```
pub struct HtmlGenerator<'a> {
    document: &'a Document,
    diagnostics: Diagnostics,
}

impl<'a> HtmlGenerator<'a> {
    /// Create a generator for `document`.
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Report warnings into `diagnostics` instead of a fresh echoing sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Produce the HTML for the whole document, lines joined with `\n`.
    pub fn generate(&mut self) -> String {
        let document = self.document;
        let components = ComponentTable::collect(document, &mut self.diagnostics);
        let mut emitter = Emitter {
            components: &components,
            diagnostics: &mut self.diagnostics,
            lines: Vec::new(),
            depth: 0,
            expanding: Vec::new(),
        };
        let mut env = Environment::new();
        emitter.emit_nodes(&document.children, &mut env);
        emitter.lines.join("\n")
    }

    /// Hand back the warning sink.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

/// Output state for one generation run.
struct Emitter<'a> {
    components: &'a ComponentTable<'a>,
    diagnostics: &'a mut Diagnostics,
    lines: Vec<String>,
    /// Current nesting level.
    depth: usize,
    /// Components currently being expanded, innermost last.
    expanding: Vec<&'a str>,
}

impl<'a> Emitter<'a> {
    fn push_line(&mut self, text: &str) {
        let indent = " ".repeat(self.depth * INDENT_WIDTH);
        self.lines.push(format!("{indent}{text}"));
    }

    fn nested(&mut self, nodes: &'a [Node], env: &mut Environment) {
        self.depth += 1;
        self.emit_nodes(nodes, env);
        self.depth -= 1;
    }

    fn emit_nodes(&mut self, nodes: &'a [Node], env: &mut Environment) {
        for node in nodes {
            self.emit_node(node, env);
        }
    }

    fn emit_node(&mut self, node: &'a Node, env: &mut Environment) {
        match node {
            Node::Element(element) => self.emit_element(element, env),
            Node::Text(text) => self.emit_text(text, env),
            Node::VariableDeclaration(decl) => env.bind(decl.name.as_str(), decl.value.as_str()),
            Node::VariableReference(var) => {
                let value = resolve(var, env);
                self.push_line(&value);
            }
            Node::ForLoop(for_loop) => self.emit_for_loop(for_loop, env),
            Node::Conditional(conditional) => self.emit_conditional(conditional, env),
            Node::ComponentDefinition(_) => {}
            Node::ComponentUse(component_use) => self.emit_component_use(component_use, env),
        }
    }

    fn emit_text(&mut self, text: &TextContent, env: &Environment) {
        match text.kind {
            TextKind::Literal => self.push_line(&env.substitute(&text.value)),
            TextKind::Multiline => {
                for line in block_lines(&text.value) {
                    self.push_line(&env.substitute(line));
                }
            }
        }
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn emit_element(&mut self, element: &'a Element, env: &mut Environment) {
        if element.name == DOCUMENT_ROOT {
            self.emit_document(element, env);
        } else if RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            self.emit_raw_text_element(element, env);
        } else {
            self.emit_ordinary_element(element, env);
        }
    }

    fn emit_document(&mut self, element: &'a Element, env: &mut Environment) {
        self.lines.push("<!DOCTYPE html>".to_string());
        self.lines.push("<html>".to_string());
        match &element.body {
            ElementBody::Children(children) => self.nested(children, env),
            ElementBody::Inline(inline) => {
                self.depth += 1;
                match inline {
                    Inline::Text(text) => self.emit_text(text, env),
                    Inline::Variable(var) => self.push_line(&resolve(var, env)),
                }
                self.depth -= 1;
            }
        }
        self.lines.push("</html>".to_string());
    }

    fn emit_ordinary_element(&mut self, element: &'a Element, env: &mut Environment) {
        let open = open_tag(element, env);
        match &element.body {
            ElementBody::Inline(Inline::Text(text)) if text.kind == TextKind::Multiline => {
                self.push_line(&open);
                self.depth += 1;
                self.emit_text(text, env);
                self.depth -= 1;
                self.push_line(&format!("</{}>", element.name));
            }
            ElementBody::Inline(inline) => {
                let content = inline_text(inline, env);
                self.push_line(&format!("{open}{content}</{}>", element.name));
            }
            ElementBody::Children(children) => {
                self.push_line(&open);
                self.nested(children, env);
                self.push_line(&format!("</{}>", element.name));
            }
        }
    }

    /// `style` and `script`: the first triple-quoted block found is copied
    /// one level deeper without substitution.
    fn emit_raw_text_element(&mut self, element: &'a Element, env: &Environment) {
        self.push_line(&open_tag(element, env));
        if let Some(block) = raw_text_block(element) {
            self.depth += 1;
            for line in block_lines(block) {
                self.push_line(line);
            }
            self.depth -= 1;
        }
        self.push_line(&format!("</{}>", element.name));
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn emit_for_loop(&mut self, for_loop: &'a ForLoop, env: &mut Environment) {
        let iterable = for_loop.iterable.trim();
        let Some(name) = iterable.strip_prefix('$') else {
            self.diagnostics.warn(
                COMPONENT,
                format!("Direct iterables are not supported in for loop: {iterable}"),
            );
            return;
        };
        let Some(raw) = env.get(name) else {
            self.diagnostics
                .warn(COMPONENT, format!("Unknown variable {iterable} in for loop"));
            return;
        };
        let Some(items) = parse_list_literal(raw) else {
            self.diagnostics.warn(
                COMPONENT,
                format!("Variable {iterable} is not a list in for loop: {raw}"),
            );
            return;
        };

        for item in items {
            env.bind(for_loop.iterator.as_str(), item);
            self.emit_nodes(&for_loop.body, env);
            let _ = env.unbind(&for_loop.iterator);
        }
    }

    fn emit_conditional(&mut self, conditional: &'a Conditional, env: &mut Environment) {
        let condition = env.substitute_quoted(&conditional.condition);
        let holds = condition::evaluate(&condition).unwrap_or_else(|err| {
            self.diagnostics.warn(
                COMPONENT,
                format!("Failed to evaluate condition {condition}: {err}"),
            );
            false
        });

        if holds {
            self.emit_nodes(&conditional.if_body, env);
        } else if let Some(else_body) = &conditional.else_body {
            self.emit_nodes(else_body, env);
        }
    }

    fn emit_component_use(&mut self, component_use: &ComponentUse, env: &mut Environment) {
        let Some(definition) = self.components.get(&component_use.name) else {
            self.diagnostics.warn(
                COMPONENT,
                format!("Unknown component: {}", component_use.name),
            );
            return;
        };
        if self.expanding.contains(&definition.name.as_str()) {
            self.diagnostics.warn(
                COMPONENT,
                format!("Recursive use of component {} skipped", definition.name),
            );
            return;
        }

        let snapshot = env.clone();
        for (name, default) in definition.defaults() {
            env.bind(name, default);
        }
        for (name, value) in component_use.arguments.iter() {
            env.bind(name, value.as_str());
        }

        self.expanding.push(&definition.name);
        self.emit_nodes(&definition.body, env);
        let _ = self.expanding.pop();
        *env = snapshot;
    }
}

/// `<name attrs>` with attribute values substituted.
fn open_tag(element: &Element, env: &Environment) -> String {
    let attributes = render_attributes(&element.attributes, env);
    if attributes.is_empty() {
        format!("<{}>", element.name)
    } else {
        format!("<{} {attributes}>", element.name)
    }
}

fn render_attributes(attributes: &Attributes, env: &Environment) -> String {
    attributes
        .iter()
        .map(|(key, value)| match value {
            AttributeValue::Text(text) => format!("{key}=\"{}\"", env.substitute(text)),
            AttributeValue::Flag => key.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn inline_text(inline: &Inline, env: &Environment) -> String {
    match inline {
        Inline::Text(text) => env.substitute(&text.value),
        Inline::Variable(var) => resolve(var, env),
    }
}

/// Bound value of a reference, or the reference as written when unbound.
fn resolve(var: &VariableReference, env: &Environment) -> String {
    env.get(&var.name)
        .map_or_else(|| var.source_text(), str::to_string)
}

/// Payload of the first triple-quoted block belonging to a raw text element:
/// its own inline content, a direct multiline text child, or the inline
/// content of a child element, in that order.
fn raw_text_block(element: &Element) -> Option<&str> {
    if let Some(Inline::Text(text)) = element.inline()
        && text.kind == TextKind::Multiline
    {
        return Some(text.value.as_str());
    }

    let children = element.children();
    children
        .iter()
        .find_map(|child| match child {
            Node::Text(text) if text.kind == TextKind::Multiline => Some(text.value.as_str()),
            _ => None,
        })
        .or_else(|| {
            children.iter().find_map(|child| match child {
                Node::Element(inner) => match inner.inline() {
                    Some(Inline::Text(text)) if text.kind == TextKind::Multiline => {
                        Some(text.value.as_str())
                    }
                    _ => None,
                },
                _ => None,
            })
        })
}

/// Lines of a multiline payload. A blank first or last line is the
/// remainder of a delimiter line and is dropped.
fn block_lines(payload: &str) -> impl Iterator<Item = &str> {
    let mut lines: Vec<&str> = payload.split('\n').collect();
    if lines.len() > 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        let _ = lines.pop();
    }
    if lines.len() > 1 && lines.first().is_some_and(|l| l.trim().is_empty()) {
        let _ = lines.remove(0);
    }
    lines.into_iter()
}
