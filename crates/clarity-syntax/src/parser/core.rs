use std::collections::BTreeMap;

use clarity_ast::{
    AttributeValue, Attributes, ComponentDefinition, ComponentUse, Conditional, Document,
    Element, ElementBody, ForLoop, Inline, Node, OrderedMap, TextContent, VariableDeclaration,
    VariableReference,
};
use clarity_common::text::{
    substitute, triple_quoted_inner, unescape_quote, unquote, QUOTE_CHARS,
};
use clarity_common::warning::Diagnostics;

use super::headers::{
    split_arguments, split_attribute_text, split_component_definition, split_component_use,
    split_for_header, split_if_header, split_variable_declaration,
};
use crate::tokenizer::{Token, TokenKind};

/// Component name used when reporting through the warning channel.
const COMPONENT: &str = "Parser";

/// A recoverable parse problem.
///
/// The parser never stops on these: it records the issue, produces no node
/// (or an empty one) for the offending construct and carries on with the
/// next statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the problem.
    pub message: String,
    /// Source line of the token being looked at.
    pub line: usize,
    /// Index into the token stream where the problem was found.
    pub token_index: usize,
}

/// Recursive-descent parser from tokens to a [`Document`].
///
/// Blocks are sequences of statements closed by `DEDENT`; the top level is
/// closed by `EOF`.
pub struct Parser {
    /// Input tokens, always terminated by `EOF`.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,

    /// Variables declared so far, used to resolve `$name` inside attribute
    /// values. Forward only: a declaration is visible to attributes that
    /// follow it in the source, never to earlier ones.
    variables: OrderedMap<String>,

    /// Component definitions seen so far, by name.
    components: BTreeMap<String, ComponentDefinition>,

    /// Parse issues encountered during parsing.
    issues: Vec<ParseIssue>,

    /// Where issues are reported.
    diagnostics: Diagnostics,
}

impl Parser {
    /// Create a parser from a token stream.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| !t.is_eof()) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(TokenKind::Eof, "", line, 1));
        }
        Self {
            tokens,
            position: 0,
            variables: OrderedMap::new(),
            components: BTreeMap::new(),
            issues: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Report issues into `diagnostics` instead of a fresh echoing sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Parse issues encountered so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Component definitions registered while parsing.
    #[must_use]
    pub const fn components(&self) -> &BTreeMap<String, ComponentDefinition> {
        &self.components
    }

    /// Hand the warning sink to the next stage.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Parse the whole token stream and return the tree.
    #[must_use]
    pub fn run(mut self) -> Document {
        self.parse()
    }

    /// Parse the remaining tokens into a [`Document`].
    pub fn parse(&mut self) -> Document {
        let mut children = Vec::new();
        while !self.is_at_end() {
            if let Some(node) = self.parse_statement() {
                children.push(node);
            }
        }
        Document::new(children)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Option<Node> {
        match self.peek().kind {
            TokenKind::VariableDecl => self.parse_variable_declaration(),
            TokenKind::ComponentDef => self.parse_component_definition(),
            TokenKind::Element => Some(self.parse_element()),
            TokenKind::ForLoop => self.parse_for_loop(),
            TokenKind::IfStatement => self.parse_conditional(),
            TokenKind::ComponentUse => self.parse_component_use(),
            TokenKind::String | TokenKind::Content | TokenKind::MultilineString => {
                let token = self.advance();
                Some(Node::Text(text_from_token(&token)))
            }
            TokenKind::VariableRef => {
                let token = self.advance();
                Some(Node::VariableReference(reference_from_token(&token)))
            }
            TokenKind::Newline | TokenKind::Comment => {
                let _ = self.advance();
                None
            }
            TokenKind::Attribute
            | TokenKind::Colon
            | TokenKind::ElseStatement
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::Eof => {
                let token = self.advance();
                self.error(format!("Unexpected token: {token}"));
                None
            }
        }
    }

    /// Statements up to (not including) the closing `DEDENT`.
    fn parse_block(&mut self) -> Vec<Node> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::Dedent) {
            if let Some(node) = self.parse_statement() {
                statements.push(node);
            }
        }
        statements
    }

    /// `NEWLINE INDENT block DEDENT`, tolerating blank and comment lines
    /// before the indent.
    fn parse_indented_block(&mut self) -> Vec<Node> {
        self.skip_trivia();
        if self.expect(TokenKind::Indent).is_none() {
            return Vec::new();
        }
        let body = self.parse_block();
        let _ = self.expect(TokenKind::Dedent);
        body
    }

    fn parse_variable_declaration(&mut self) -> Option<Node> {
        let token = self.advance();
        let Some((name, value)) = split_variable_declaration(&token.lexeme) else {
            self.error_at(&token, format!("Invalid variable declaration: {}", token.lexeme));
            return None;
        };

        let value = unquote(value).to_string();
        let _ = self.variables.insert(name, value.clone());

        Some(Node::VariableDeclaration(VariableDeclaration {
            name: name.to_string(),
            value,
        }))
    }

    fn parse_element(&mut self) -> Node {
        let name = self.advance().lexeme;

        let attributes = if self.check(TokenKind::Attribute) {
            let raw = self.advance().lexeme;
            self.parse_attributes(&raw)
        } else {
            Attributes::new()
        };

        let _ = self.expect(TokenKind::Colon);

        let body = match self.peek().kind {
            TokenKind::String | TokenKind::Content | TokenKind::MultilineString => {
                let token = self.advance();
                ElementBody::Inline(Inline::Text(text_from_token(&token)))
            }
            TokenKind::VariableRef => {
                let token = self.advance();
                ElementBody::Inline(Inline::Variable(reference_from_token(&token)))
            }
            _ => {
                self.skip_trivia();
                if self.check(TokenKind::Indent) {
                    let _ = self.advance();
                    let children = self.parse_block();
                    let _ = self.expect(TokenKind::Dedent);
                    ElementBody::Children(children)
                } else {
                    ElementBody::Children(Vec::new())
                }
            }
        };

        Node::Element(Element {
            name,
            attributes,
            body,
        })
    }

    /// `key` is a boolean attribute, `key=value` has its value unquoted and
    /// every already-declared `$name` substituted.
    fn parse_attributes(&mut self, raw: &str) -> Attributes {
        let mut attributes = Attributes::new();
        for piece in split_attribute_text(raw) {
            match piece.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim();
                    if key.is_empty() {
                        self.error(format!("Attribute without a name: {piece}"));
                        continue;
                    }
                    let value = substitute(unquote(value.trim()), self.variables.iter());
                    let _ = attributes.insert(key, AttributeValue::Text(value));
                }
                None => {
                    let _ = attributes.insert(piece, AttributeValue::Flag);
                }
            }
        }
        attributes
    }

    fn parse_for_loop(&mut self) -> Option<Node> {
        let token = self.advance();
        let Some((iterator, iterable)) = split_for_header(&token.lexeme) else {
            self.error_at(&token, format!("Invalid for loop syntax: {}", token.lexeme));
            return None;
        };
        let (iterator, iterable) = (iterator.to_string(), iterable.to_string());

        let _ = self.expect(TokenKind::Colon);
        let body = self.parse_indented_block();

        Some(Node::ForLoop(ForLoop {
            iterator,
            iterable,
            body,
        }))
    }

    fn parse_conditional(&mut self) -> Option<Node> {
        let token = self.advance();
        let Some(condition) = split_if_header(&token.lexeme) else {
            self.error_at(&token, format!("Invalid if statement syntax: {}", token.lexeme));
            return None;
        };
        let condition = condition.to_string();

        let _ = self.expect(TokenKind::Colon);
        let if_body = self.parse_indented_block();

        let else_body = if self.check(TokenKind::ElseStatement) {
            let else_token = self.advance();
            if !else_token.lexeme.ends_with(':') {
                let _ = self.expect(TokenKind::Colon);
            }
            Some(self.parse_indented_block())
        } else {
            None
        };

        Some(Node::Conditional(Conditional {
            condition,
            if_body,
            else_body,
        }))
    }

    fn parse_component_definition(&mut self) -> Option<Node> {
        let token = self.advance();
        let Some((name, parameters)) = split_component_definition(&token.lexeme) else {
            self.error_at(&token, format!("Invalid component definition: {}", token.lexeme));
            return None;
        };
        let name = name.to_string();

        if !token.lexeme.ends_with(':') {
            let _ = self.expect(TokenKind::Colon);
        }
        let body = self.parse_indented_block();

        let definition = ComponentDefinition {
            name,
            parameters,
            body,
        };
        let _ = self
            .components
            .insert(definition.name.clone(), definition.clone());
        Some(Node::ComponentDefinition(definition))
    }

    fn parse_component_use(&mut self) -> Option<Node> {
        let token = self.advance();
        let Some((name, args)) = split_component_use(&token.lexeme) else {
            self.error_at(&token, format!("Invalid component use: {}", token.lexeme));
            return None;
        };

        let mut arguments = OrderedMap::new();
        for arg in split_arguments(args.unwrap_or_default()) {
            match arg {
                Ok((key, value)) => {
                    let _ = arguments.insert(key, value.to_string());
                }
                Err(positional) => self.error_at(
                    &token,
                    format!("Positional arguments not supported: {positional}"),
                ),
            }
        }

        Some(Node::ComponentUse(ComponentUse {
            name: name.to_string(),
            arguments,
        }))
    }

    // =========================================================================
    // Token stream helpers
    // =========================================================================

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len() || self.peek().is_eof()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consume the current token and return it. At `EOF` the cursor stays
    /// put and the `EOF` token is returned.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    /// Consume a token of `kind`, or record an issue and consume nothing.
    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            return Some(self.advance());
        }
        let found = self.peek().clone();
        self.error(format!(
            "Expected {kind} but got {} at line {}",
            found.kind, found.line
        ));
        None
    }

    fn skip_trivia(&mut self) {
        while self.check(TokenKind::Newline) || self.check(TokenKind::Comment) {
            let _ = self.advance();
        }
    }

    fn error(&mut self, message: String) {
        let line = self.peek().line;
        self.record_issue(line, message);
    }

    fn error_at(&mut self, token: &Token, message: String) {
        self.record_issue(token.line, message);
    }

    fn record_issue(&mut self, line: usize, message: String) {
        self.diagnostics.warn_at(COMPONENT, line, message.clone());
        self.issues.push(ParseIssue {
            message,
            line,
            token_index: self.position,
        });
    }
}

/// STRING, CONTENT and MULTILINE_STRING tokens as text nodes, delimiters
/// removed.
fn text_from_token(token: &Token) -> TextContent {
    match token.kind {
        TokenKind::MultilineString => {
            let inner = triple_quoted_inner(&token.lexeme).unwrap_or(token.lexeme.as_str());
            TextContent::multiline(inner)
        }
        TokenKind::String => {
            let quote = token.lexeme.chars().next().filter(|c| QUOTE_CHARS.contains(c));
            let inner = unquote(&token.lexeme);
            match quote {
                Some(q) => TextContent::literal(unescape_quote(inner, q)),
                None => TextContent::literal(inner),
            }
        }
        _ => TextContent::literal(token.lexeme.as_str()),
    }
}

fn reference_from_token(token: &Token) -> VariableReference {
    VariableReference {
        name: token.lexeme.trim_start_matches('$').to_string(),
    }
}
