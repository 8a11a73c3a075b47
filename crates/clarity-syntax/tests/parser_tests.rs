//! Integration tests for the Clarity parser.

use clarity_ast::{AttributeValue, Document, ElementBody, Inline, Node, TextKind};
use clarity_common::warning::Diagnostics;
use clarity_syntax::{ParseIssue, Parser, Tokenizer};

/// Helper to parse a string and return the document with its issues
fn parse_with_issues(input: &str) -> (Document, Vec<ParseIssue>) {
    let tokens = Tokenizer::tokenize(input).expect("input should tokenize");
    let mut parser = Parser::new(tokens).with_diagnostics(Diagnostics::silent());
    let document = parser.parse();
    (document, parser.issues().to_vec())
}

fn parse(input: &str) -> Document {
    let (document, issues) = parse_with_issues(input);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    document
}

#[test]
fn test_nested_elements() {
    let doc = parse("document:\n  div:\n    \"Hello\"\n");
    assert_eq!(doc.children.len(), 1);
    let Node::Element(root) = &doc.children[0] else {
        panic!("Expected element");
    };
    assert_eq!(root.name, "document");
    let Node::Element(div) = &root.children()[0] else {
        panic!("Expected div");
    };
    assert_eq!(div.name, "div");
    match &div.children()[0] {
        Node::Text(text) => {
            assert_eq!(text.value, "Hello");
            assert_eq!(text.kind, TextKind::Literal);
        }
        other => panic!("Expected text, got {other:?}"),
    }
}

#[test]
fn test_inline_content_kinds() {
    let doc = parse("p: \"Hi\"\nli: $item\nh1: Title\n");
    let inlines: Vec<&Inline> = doc
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Element(e) => e.inline(),
            _ => None,
        })
        .collect();
    assert_eq!(inlines.len(), 3);
    assert!(matches!(inlines[0], Inline::Text(t) if t.value == "Hi"));
    assert!(matches!(inlines[1], Inline::Variable(v) if v.name == "item"));
    assert!(matches!(inlines[2], Inline::Text(t) if t.value == "Title"));
}

#[test]
fn test_attributes_in_order() {
    let doc = parse("input type=\"text\" disabled name='q':\n");
    let Node::Element(input) = &doc.children[0] else {
        panic!("Expected element");
    };
    let attrs: Vec<(&str, &AttributeValue)> = input.attributes.iter().collect();
    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs[0], ("type", &AttributeValue::Text("text".into())));
    assert_eq!(attrs[1], ("disabled", &AttributeValue::Flag));
    assert_eq!(attrs[2], ("name", &AttributeValue::Text("q".into())));
    assert!(matches!(&input.body, ElementBody::Children(c) if c.is_empty()));
}

#[test]
fn test_attribute_uses_earlier_declarations_only() {
    let doc = parse("a href=\"$url\": \"early\"\n$url = \"/home\"\na href=\"$url\": \"late\"\n");
    let hrefs: Vec<&AttributeValue> = doc
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Element(e) => e.attributes.get("href"),
            _ => None,
        })
        .collect();
    assert_eq!(hrefs[0], &AttributeValue::Text("$url".into()));
    assert_eq!(hrefs[1], &AttributeValue::Text("/home".into()));
}

#[test]
fn test_variable_declaration_unquotes() {
    let doc = parse("$name = \"World\"\n$count = 3\n");
    let decls: Vec<(&str, &str)> = doc
        .children
        .iter()
        .filter_map(|n| match n {
            Node::VariableDeclaration(d) => Some((d.name.as_str(), d.value.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(decls, [("name", "World"), ("count", "3")]);
}

#[test]
fn test_for_loop() {
    let doc = parse("ul:\n  for x in $items:\n    li: $x\n");
    let Node::Element(ul) = &doc.children[0] else {
        panic!("Expected element");
    };
    let Node::ForLoop(for_loop) = &ul.children()[0] else {
        panic!("Expected for loop");
    };
    assert_eq!(for_loop.iterator, "x");
    assert_eq!(for_loop.iterable, "$items");
    assert_eq!(for_loop.body.len(), 1);
}

#[test]
fn test_conditional_with_else() {
    let doc = parse("if $a == \"b\":\n  p: \"yes\"\nelse:\n  p: \"no\"\np: \"after\"\n");
    assert_eq!(doc.children.len(), 2);
    let Node::Conditional(cond) = &doc.children[0] else {
        panic!("Expected conditional");
    };
    assert_eq!(cond.condition, "$a == \"b\"");
    assert_eq!(cond.if_body.len(), 1);
    assert_eq!(cond.else_body.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_conditional_without_else() {
    let doc = parse("if true:\n  p: \"yes\"\n");
    let Node::Conditional(cond) = &doc.children[0] else {
        panic!("Expected conditional");
    };
    assert!(cond.else_body.is_none());
}

#[test]
fn test_component_definition_is_registered() {
    let tokens =
        Tokenizer::tokenize("@component Button(text, color=\"blue\"):\n  button: $text\n")
            .unwrap();
    let mut parser = Parser::new(tokens).with_diagnostics(Diagnostics::silent());
    let doc = parser.parse();
    assert!(parser.issues().is_empty());

    let Node::ComponentDefinition(def) = &doc.children[0] else {
        panic!("Expected component definition");
    };
    assert_eq!(def.name, "Button");
    assert_eq!(def.parameter_names().collect::<Vec<_>>(), ["text", "color"]);
    assert_eq!(def.defaults().collect::<Vec<_>>(), [("color", "blue")]);
    assert_eq!(parser.components().get("Button"), Some(def));
}

#[test]
fn test_component_use_arguments() {
    let doc = parse("@Card(title=\"Hi\", tone='warm')\n@Divider\n");
    let uses: Vec<_> = doc
        .children
        .iter()
        .filter_map(|n| match n {
            Node::ComponentUse(u) => Some(u),
            _ => None,
        })
        .collect();
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[0].name, "Card");
    assert_eq!(uses[0].arguments.get("title").map(String::as_str), Some("Hi"));
    assert_eq!(uses[0].arguments.get("tone").map(String::as_str), Some("warm"));
    assert_eq!(uses[1].name, "Divider");
    assert!(uses[1].arguments.is_empty());
}

#[test]
fn test_positional_argument_is_reported_and_dropped() {
    let (doc, issues) = parse_with_issues("@Card(\"Hi\", title=\"x\")\n");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("Positional"));
    let Node::ComponentUse(card) = &doc.children[0] else {
        panic!("Expected component use");
    };
    assert_eq!(card.arguments.len(), 1);
}

#[test]
fn test_statement_level_text_and_reference() {
    let doc = parse("\"Hello, $name!\"\n$name\n\"\"\"\nline one\nline two\n\"\"\"\n");
    assert!(matches!(&doc.children[0], Node::Text(t) if t.value == "Hello, $name!"));
    assert!(matches!(&doc.children[1], Node::VariableReference(v) if v.name == "name"));
    match &doc.children[2] {
        Node::Text(text) => {
            assert_eq!(text.kind, TextKind::Multiline);
            assert_eq!(text.value, "\nline one\nline two\n");
        }
        other => panic!("Expected multiline text, got {other:?}"),
    }
}

#[test]
fn test_escaped_quotes_are_unescaped() {
    let doc = parse(r#"p: "say \"hi\"""#);
    let Node::Element(p) = &doc.children[0] else {
        panic!("Expected element");
    };
    assert!(matches!(p.inline(), Some(Inline::Text(t)) if t.value == r#"say "hi""#));
}

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let doc = parse("# heading\n\ndiv:\n\n  # inside\n  p: \"x\"\n");
    assert_eq!(doc.children.len(), 1);
    let Node::Element(div) = &doc.children[0] else {
        panic!("Expected element");
    };
    assert_eq!(div.children().len(), 1);
}

#[test]
fn test_malformed_for_header_produces_no_node() {
    let (doc, issues) = parse_with_issues("for x of $items:\n  li: $x\np: \"after\"\n");
    assert!(issues[0].message.contains("for loop"));
    assert_eq!(issues[0].line, 1);
    // The orphaned body still parses; the sibling after it survives.
    assert!(doc.children.iter().any(
        |n| matches!(n, Node::Element(e) if e.name == "p")
    ));
    assert!(!doc.children.iter().any(|n| matches!(n, Node::ForLoop(_))));
}

#[test]
fn test_missing_block_after_for_header() {
    let (doc, issues) = parse_with_issues("for x in $items:\np: \"sibling\"\n");
    assert!(!issues.is_empty());
    let Node::ForLoop(for_loop) = &doc.children[0] else {
        panic!("Expected for loop");
    };
    assert!(for_loop.body.is_empty());
    assert!(matches!(&doc.children[1], Node::Element(e) if e.name == "p"));
}

#[test]
fn test_parse_is_lenient_about_unexpected_tokens() {
    let (doc, issues) = parse_with_issues(": \"x\"\n");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.starts_with("Unexpected token"));
    assert!(matches!(&doc.children[0], Node::Text(_)));
}

#[test]
fn test_issues_reach_the_diagnostics_sink() {
    let tokens = Tokenizer::tokenize("@component Broken:\n").unwrap();
    let mut parser = Parser::new(tokens).with_diagnostics(Diagnostics::silent());
    let _ = parser.parse();
    let diagnostics = parser.into_diagnostics();
    assert_eq!(diagnostics.warnings().len(), 1);
    assert_eq!(diagnostics.warnings()[0].component, "Parser");
}

#[test]
fn test_parser_appends_missing_eof() {
    let document = Parser::new(Vec::new()).run();
    assert!(document.children.is_empty());
}
