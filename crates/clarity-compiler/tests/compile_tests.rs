//! End-to-end tests: Clarity source in, HTML out.

use clarity_compiler::{
    CompileError, CompileOptions, Compilation, Stage, compile, compile_with, compile_with_progress,
};
use clarity_syntax::LexError;

/// Helper to compile without echoing warnings
fn compile_quiet(source: &str) -> Compilation {
    compile_with(source, &CompileOptions::new().quiet()).expect("source should compile")
}

fn html(source: &str) -> String {
    compile_quiet(source).html
}

// =============================================================================
// Documents and elements
// =============================================================================

#[test]
fn test_document_wrapper() {
    let out = compile("document:\n  div:\n    \"Hello\"").unwrap();
    assert_eq!(
        out,
        "<!DOCTYPE html>\n<html>\n  <div>\n    Hello\n  </div>\n</html>"
    );
}

#[test]
fn test_no_wrapper_without_document() {
    assert_eq!(html("p: \"Hi\""), "<p>Hi</p>");
}

#[test]
fn test_empty_element_still_closes() {
    assert_eq!(html("div:\n"), "<div>\n</div>");
}

#[test]
fn test_attributes_render_in_order() {
    assert_eq!(
        html("input type=\"checkbox\" checked name='agree':\n"),
        "<input type=\"checkbox\" checked name=\"agree\">\n</input>"
    );
}

#[test]
fn test_bare_word_content() {
    assert_eq!(html("h1: Welcome"), "<h1>Welcome</h1>");
}

#[test]
fn test_comments_produce_nothing() {
    assert_eq!(html("# header\np: \"x\" # trailing\n"), "<p>x</p>");
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn test_variable_substitution_in_text() {
    assert_eq!(html("$name = \"World\"\n\"Hello, $name!\""), "Hello, World!");
}

#[test]
fn test_variable_reference_statement() {
    assert_eq!(html("$name = \"World\"\ndiv:\n  $name\n"), "<div>\n  World\n</div>");
}

#[test]
fn test_unbound_reference_is_left_as_written() {
    assert_eq!(html("p: $missing"), "<p>$missing</p>");
}

#[test]
fn test_attribute_substitution() {
    assert_eq!(
        html("$url = \"/home\"\na href=\"$url\": \"Home\""),
        "<a href=\"/home\">Home</a>"
    );
}

#[test]
fn test_later_declaration_overrides() {
    assert_eq!(
        html("$x = \"one\"\np: $x\n$x = \"two\"\np: $x"),
        "<p>one</p>\n<p>two</p>"
    );
}

// =============================================================================
// Loops
// =============================================================================

#[test]
fn test_for_loop_over_list() {
    let source = "$items = [\"a\", \"b\", \"c\"]\nul:\n  for x in $items:\n    li: $x\n";
    assert_eq!(
        html(source),
        "<ul>\n  <li>a</li>\n  <li>b</li>\n  <li>c</li>\n</ul>"
    );
}

#[test]
fn test_mixed_quoting_keeps_items_as_written() {
    let source = "$items = [1, \"b\"]\nfor x in $items:\n  p: $x\n";
    assert_eq!(html(source), "<p>1</p>\n<p>\"b\"</p>");
}

#[test]
fn test_loop_binding_is_removed_afterwards() {
    let source = "$xs = [\"a\"]\nfor x in $xs:\n  p: $x\np: $x\n";
    assert_eq!(html(source), "<p>a</p>\n<p>$x</p>");
}

#[test]
fn test_undefined_loop_variable_emits_nothing() {
    let result = compile_quiet("for x in $nothing:\n  li: $x\np: \"after\"\n");
    assert_eq!(result.html, "<p>after</p>");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("$nothing"));
}

#[test]
fn test_non_list_loop_variable_emits_nothing() {
    let result = compile_quiet("$items = \"abc\"\np: \"before\"\nfor x in $items:\n  li: $x\np: \"after\"\n");
    assert_eq!(result.html, "<p>before</p>\n<p>after</p>");
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_direct_iterable_is_rejected() {
    let result = compile_quiet("for x in [1, 2]:\n  li: $x\n");
    assert_eq!(result.html, "");
    assert_eq!(result.warnings.len(), 1);
}

// =============================================================================
// Conditionals
// =============================================================================

#[test]
fn test_if_branch_taken() {
    let source = "$flag = \"yes\"\nif $flag == \"yes\":\n  p: \"on\"\nelse:\n  p: \"off\"\n";
    assert_eq!(html(source), "<p>on</p>");
}

#[test]
fn test_else_branch_taken() {
    let source = "$flag = \"no\"\nif $flag == \"yes\":\n  p: \"on\"\nelse:\n  p: \"off\"\n";
    assert_eq!(html(source), "<p>off</p>");
}

#[test]
fn test_false_condition_without_else() {
    assert_eq!(html("if 1 > 2:\n  p: \"never\"\np: \"x\""), "<p>x</p>");
}

#[test]
fn test_failed_condition_counts_as_false() {
    let result = compile_quiet("if $unset == \"x\":\n  p: \"on\"\nelse:\n  p: \"off\"\n");
    assert_eq!(result.html, "<p>off</p>");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].component, "Generator");
}

#[test]
fn test_deeply_nested_condition_counts_as_false() {
    let source = format!(
        "if {}1{}:\n  p: \"on\"\nelse:\n  p: \"off\"\n",
        "(".repeat(3000),
        ")".repeat(3000)
    );
    let result = compile_quiet(&source);
    assert_eq!(result.html, "<p>off</p>");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("nested deeper"));
}

#[test]
fn test_condition_with_boolean_operators() {
    let source = "$a = \"1\"\n$b = \"2\"\nif $a == \"1\" and not $b == \"3\":\n  p: \"ok\"\n";
    assert_eq!(html(source), "<p>ok</p>");
}

// =============================================================================
// Components
// =============================================================================

const BUTTON: &str = "@component Button(text, color=\"blue\"):\n  button class=\"$color\": $text\n";

#[test]
fn test_component_default_applies() {
    let source = format!("{BUTTON}@Button(text=\"Go\")\n");
    assert_eq!(html(&source), "<button class=\"blue\">Go</button>");
}

#[test]
fn test_component_argument_overrides_default() {
    let source = format!("{BUTTON}@Button(text=\"Stop\", color=\"red\")\n");
    assert_eq!(html(&source), "<button class=\"red\">Stop</button>");
}

#[test]
fn test_component_restores_environment() {
    let source = "$text = \"outer\"\n@component Show(text):\n  p: $text\n@Show(text=\"inner\")\np: $text\n";
    assert_eq!(html(source), "<p>inner</p>\n<p>outer</p>");
}

#[test]
fn test_component_defaults_do_not_leak() {
    let source = "@component C(color=\"blue\"):\n  p: $color\n@C\np: $color\n";
    assert_eq!(html(source), "<p>blue</p>\n<p>$color</p>");
}

#[test]
fn test_component_body_declarations_do_not_leak() {
    let source = "@component C():\n  $tmp = \"in\"\n  p: $tmp\n@C\np: $tmp";
    assert_eq!(html(source), "<p>in</p>\n<p>$tmp</p>");
}

#[test]
fn test_component_default_shadows_outer_variable_only_inside() {
    let source = "$color = \"red\"\n@component C(color=\"blue\"):\n  p: $color\np: $color\n@C\np: $color\n";
    assert_eq!(html(source), "<p>red</p>\n<p>blue</p>\n<p>red</p>");
}

#[test]
fn test_component_used_before_definition() {
    let source = "@Hello\n@component Hello():\n  p: \"hi\"\n";
    assert_eq!(html(source), "<p>hi</p>");
}

#[test]
fn test_unknown_component_leaves_siblings() {
    let result = compile_quiet("p: \"a\"\n@Missing\np: \"b\"\n");
    assert_eq!(result.html, "<p>a</p>\n<p>b</p>");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("Missing"));
}

#[test]
fn test_recursive_component_is_skipped() {
    let result = compile_quiet("@component Loop():\n  p: \"once\"\n  @Loop\n@Loop\n");
    assert_eq!(result.html, "<p>once</p>");
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_components_inside_loop() {
    let source = "@component Item(label):\n  li: $label\n$xs = [\"a\", \"b\"]\nul:\n  for x in $xs:\n    @Item(label=\"item\")\n";
    assert_eq!(html(source), "<ul>\n  <li>item</li>\n  <li>item</li>\n</ul>");
}

// =============================================================================
// Raw text and multiline blocks
// =============================================================================

#[test]
fn test_style_block_child() {
    let source = "style:\n  \"\"\"\nbody { color: red; }\n  \"\"\"\n";
    assert_eq!(html(source), "<style>\n  body { color: red; }\n</style>");
}

#[test]
fn test_script_inline_block_is_not_substituted() {
    let source = "$x = \"1\"\nscript: '''\nlet y = $x;\n'''\n";
    assert_eq!(html(source), "<script>\n  let y = $x;\n</script>");
}

#[test]
fn test_style_without_block_emits_tags_only() {
    assert_eq!(html("style:\n"), "<style>\n</style>");
}

#[test]
fn test_multiline_inline_content_is_indented_as_children() {
    let source = "$who = \"you\"\ndiv:\n  p: \"\"\"\nhello\nto $who\n\"\"\"\n";
    assert_eq!(
        html(source),
        "<div>\n  <p>\n    hello\n    to you\n  </p>\n</div>"
    );
}

#[test]
fn test_multiline_text_is_substituted_per_line() {
    let source = "$who = \"you\"\ndiv:\n  \"\"\"\nhello\nto $who\n\"\"\"\n";
    assert_eq!(html(source), "<div>\n  hello\n  to you\n</div>");
}

// =============================================================================
// Errors and options
// =============================================================================

#[test]
fn test_lex_error_is_fatal() {
    let err = compile("p: \"oops").unwrap_err();
    assert_eq!(
        err,
        CompileError::Lex(LexError::UnterminatedString { line: 1 })
    );
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_inconsistent_indentation_is_fatal() {
    let err = compile("a:\n    b: x\n  c: y").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Lex(LexError::InconsistentIndentation { line: 3 })
    ));
}

#[test]
fn test_lenient_mode_keeps_going() {
    let result = compile_quiet("for x of $y:\n  li: \"a\"\np: \"b\"\n");
    assert!(result.html.ends_with("<p>b</p>"));
    assert!(!result.warnings.is_empty());
    assert_eq!(result.warnings[0].component, "Parser");
}

#[test]
fn test_strict_mode_rejects_parse_issues() {
    let options = CompileOptions::new().with_strict_mode().quiet();
    let err = compile_with("for x of $y:\n  li: \"a\"\n", &options).unwrap_err();
    match &err {
        CompileError::Parse { issues } => {
            assert_eq!(issues[0].line, 1);
        }
        CompileError::Lex(_) => panic!("Expected parse error"),
    }
    assert!(err.to_string().starts_with("parse error at line 1"));
}

#[test]
fn test_strict_mode_keeps_every_issue() {
    let options = CompileOptions::new().with_strict_mode().quiet();
    let source = "for x of $y:\n  li: \"a\"\nfor z of $w:\n  li: \"b\"\n";
    let err = compile_with(source, &options).unwrap_err();
    let CompileError::Parse { issues } = &err else {
        panic!("Expected parse error");
    };
    assert!(issues.len() >= 2);
    assert!(issues.windows(2).all(|pair| pair[0].line <= pair[1].line));
    assert_eq!(err.line(), Some(1));
    assert!(err.to_string().contains("more)"));
}

#[test]
fn test_strict_mode_accepts_clean_source() {
    let options = CompileOptions::new().with_strict_mode().quiet();
    let result = compile_with("p: \"fine\"", &options).unwrap();
    assert_eq!(result.html, "<p>fine</p>");
    assert!(result.warnings.is_empty());
}

#[test]
fn test_stages_reported_in_order() {
    let mut stages = Vec::new();
    let result = compile_with_progress("p: \"x\"", &CompileOptions::new().quiet(), |stage| {
        stages.push(stage);
    });
    assert!(result.is_ok());
    assert_eq!(stages, [Stage::Tokenize, Stage::Parse, Stage::Generate]);
}

#[test]
fn test_stages_stop_at_failure() {
    let mut stages = Vec::new();
    let result = compile_with_progress("p: \"oops", &CompileOptions::new().quiet(), |stage| {
        stages.push(stage);
    });
    assert!(result.is_err());
    assert_eq!(stages, [Stage::Tokenize]);
}

#[test]
fn test_empty_source() {
    assert_eq!(html(""), "");
}
