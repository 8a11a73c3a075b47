//! Syntax tree for Clarity documents.
//!
//! The parser builds one [`Document`] per compilation and the generator only
//! ever reads it. Every construct is a variant of the closed [`Node`] enum so
//! stages dispatch with exhaustive `match`es.
//!
//! # Scope
//!
//! - **Markup** - [`Element`] with ordered [`Attributes`] and either inline
//!   content or children
//! - **Text** - literal and multiline [`TextContent`]
//! - **Variables** - [`VariableDeclaration`] and [`VariableReference`]
//! - **Control flow** - [`ForLoop`] and [`Conditional`]
//! - **Components** - [`ComponentDefinition`] and [`ComponentUse`]

use serde::Serialize;

/// Insertion-ordered map used for attributes, arguments and environments.
pub mod map;
/// Indented outline rendering of a tree, for debugging.
pub mod print;

pub use map::OrderedMap;
pub use print::{format_tree, print_tree};

/// Name of the element that becomes the `<!DOCTYPE html>` / `<html>` wrapper.
pub const DOCUMENT_ROOT: &str = "document";

/// Root of a parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Top-level statements in source order.
    pub children: Vec<Node>,
}

impl Document {
    /// Wrap a list of top-level nodes.
    #[must_use]
    pub const fn new(children: Vec<Node>) -> Self {
        Self { children }
    }
}

/// One statement of the source language.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Node {
    /// An HTML element.
    Element(Element),
    /// A piece of text emitted on its own line.
    Text(TextContent),
    /// `$name = value`
    VariableDeclaration(VariableDeclaration),
    /// `$name` standing alone as a statement.
    VariableReference(VariableReference),
    /// `for item in $list:`
    ForLoop(ForLoop),
    /// `if condition:` with an optional `else:`
    Conditional(Conditional),
    /// `@component Name(params):`
    ComponentDefinition(ComponentDefinition),
    /// `@Name(args)`
    ComponentUse(ComponentUse),
}

/// Attribute value: either text or a bare flag such as `disabled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `key=value`
    Text(String),
    /// `key` with no value.
    Flag,
}

/// Text serializes as a string, a flag as `true`.
impl Serialize for AttributeValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Flag => serializer.serialize_bool(true),
        }
    }
}

/// Element attributes in source order with unique names.
pub type Attributes = OrderedMap<AttributeValue>;

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes as written in the header.
    pub attributes: Attributes,
    /// Inline content or child block.
    pub body: ElementBody,
}

impl Element {
    /// An element with no attributes and no children.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            body: ElementBody::Children(Vec::new()),
        }
    }

    /// Child nodes, empty for inline elements.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.body {
            ElementBody::Children(children) => children,
            ElementBody::Inline(_) => &[],
        }
    }

    /// Inline content, if the element has any.
    #[must_use]
    pub const fn inline(&self) -> Option<&Inline> {
        match &self.body {
            ElementBody::Inline(inline) => Some(inline),
            ElementBody::Children(_) => None,
        }
    }
}

/// The two mutually exclusive shapes of an element body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementBody {
    /// `p: "text"` - content on the header line.
    Inline(Inline),
    /// An indented block of child statements (possibly empty).
    Children(Vec<Node>),
}

/// Inline content after an element's colon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    /// A string, bare word or multiline block.
    Text(TextContent),
    /// `li: $item`
    Variable(VariableReference),
}

/// How a piece of text was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// `"..."`, `'...'` or a bare word.
    Literal,
    /// `"""..."""` or `'''...'''`.
    Multiline,
}

/// Text payload with delimiters removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    /// The text between the delimiters.
    pub value: String,
    /// Literal or multiline.
    pub kind: TextKind,
}

impl TextContent {
    /// A literal (single line) text node.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TextKind::Literal,
        }
    }

    /// A multiline text node.
    #[must_use]
    pub fn multiline(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TextKind::Multiline,
        }
    }
}

/// `$name = value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDeclaration {
    /// Name without the `$`.
    pub name: String,
    /// Value text, quotes stripped when it was a quoted string.
    pub value: String,
}

/// `$name`, resolved when the generator reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableReference {
    /// Name without the `$`.
    pub name: String,
}

impl VariableReference {
    /// The reference as written in source, `$name`.
    #[must_use]
    pub fn source_text(&self) -> String {
        format!("${}", self.name)
    }
}

/// `for iterator in iterable:`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForLoop {
    /// Loop variable name.
    pub iterator: String,
    /// Iterable expression text, e.g. `$items`.
    pub iterable: String,
    /// Statements repeated per item.
    pub body: Vec<Node>,
}

/// `if condition:` / `else:`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditional {
    /// Condition expression text.
    pub condition: String,
    /// Statements emitted when the condition holds.
    pub if_body: Vec<Node>,
    /// Statements emitted otherwise.
    pub else_body: Option<Vec<Node>>,
}

/// One declared component parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Default value, quotes stripped.
    pub default: Option<String>,
}

/// `@component Name(a, b="x"):`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDefinition {
    /// Component name.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Statements inlined at every use.
    pub body: Vec<Node>,
}

impl ComponentDefinition {
    /// Parameter names in declaration order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// `(name, default)` for every parameter that has a default.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .filter_map(|p| p.default.as_deref().map(|d| (p.name.as_str(), d)))
    }
}

/// `@Name(key=value, ...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentUse {
    /// Name of the component to inline.
    pub name: String,
    /// Keyword arguments, quotes stripped.
    pub arguments: OrderedMap<String>,
}
