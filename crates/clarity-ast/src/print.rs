use std::fmt::Write;

use crate::{AttributeValue, Document, ElementBody, Inline, Node, TextKind};

/// Print an indented outline of `document` to stdout.
pub fn print_tree(document: &Document) {
    print!("{}", format_tree(document));
}

/// Render an indented outline of `document`, one node per line.
#[must_use]
pub fn format_tree(document: &Document) -> String {
    let mut out = String::from("Document\n");
    for node in &document.children {
        format_node(&mut out, node, 1);
    }
    out
}

fn format_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for node in nodes {
        format_node(out, node, depth);
    }
}

fn format_node(out: &mut String, node: &Node, depth: usize) {
    let prefix = "  ".repeat(depth);
    match node {
        Node::Element(element) => {
            let attrs: Vec<String> = element
                .attributes
                .iter()
                .map(|(k, v)| match v {
                    AttributeValue::Text(text) => format!("{k}=\"{text}\""),
                    AttributeValue::Flag => k.to_string(),
                })
                .collect();
            if attrs.is_empty() {
                let _ = write!(out, "{prefix}<{}>", element.name);
            } else {
                let _ = write!(out, "{prefix}<{} {}>", element.name, attrs.join(" "));
            }
            match &element.body {
                ElementBody::Inline(Inline::Text(text)) => {
                    let _ = writeln!(out, " {}", quote_text(&text.value, text.kind));
                }
                ElementBody::Inline(Inline::Variable(var)) => {
                    let _ = writeln!(out, " {}", var.source_text());
                }
                ElementBody::Children(children) => {
                    out.push('\n');
                    format_nodes(out, children, depth + 1);
                }
            }
        }
        Node::Text(text) => {
            let _ = writeln!(out, "{prefix}{}", quote_text(&text.value, text.kind));
        }
        Node::VariableDeclaration(decl) => {
            let _ = writeln!(out, "{prefix}${} = {}", decl.name, decl.value);
        }
        Node::VariableReference(var) => {
            let _ = writeln!(out, "{prefix}{}", var.source_text());
        }
        Node::ForLoop(for_loop) => {
            let _ = writeln!(
                out,
                "{prefix}for {} in {}",
                for_loop.iterator, for_loop.iterable
            );
            format_nodes(out, &for_loop.body, depth + 1);
        }
        Node::Conditional(cond) => {
            let _ = writeln!(out, "{prefix}if {}", cond.condition);
            format_nodes(out, &cond.if_body, depth + 1);
            if let Some(else_body) = &cond.else_body {
                let _ = writeln!(out, "{prefix}else");
                format_nodes(out, else_body, depth + 1);
            }
        }
        Node::ComponentDefinition(def) => {
            let params: Vec<String> = def
                .parameters
                .iter()
                .map(|p| match &p.default {
                    Some(default) => format!("{}=\"{default}\"", p.name),
                    None => p.name.clone(),
                })
                .collect();
            let _ = writeln!(out, "{prefix}@component {}({})", def.name, params.join(", "));
            format_nodes(out, &def.body, depth + 1);
        }
        Node::ComponentUse(use_) => {
            let args: Vec<String> = use_
                .arguments
                .iter()
                .map(|(k, v)| format!("{k}=\"{v}\""))
                .collect();
            let _ = writeln!(out, "{prefix}@{}({})", use_.name, args.join(", "));
        }
    }
}

fn quote_text(value: &str, kind: TextKind) -> String {
    let display = value.replace('\n', "\\n");
    match kind {
        TextKind::Literal => format!("\"{display}\""),
        TextKind::Multiline => format!("\"\"\"{display}\"\"\""),
    }
}
