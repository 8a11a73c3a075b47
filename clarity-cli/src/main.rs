//! Clarity CLI
//!
//! Compiles a Clarity source file to HTML.
//!
//! Inspection modes:
//! - `--tokens`: print the token stream
//! - `--ast`: print the syntax tree as JSON
//! - `--tree`: print the syntax tree as an indented outline

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clarity_ast::{Document, print_tree};
use clarity_common::warning::{Diagnostics, Warning};
use clarity_compiler::{CompileOptions, Stage, compile_with_progress};
use clarity_syntax::Tokenizer;
use owo_colors::OwoColorize;

/// Clarity: compile indentation-based markup to HTML
#[derive(Parser, Debug)]
#[command(name = "clarity")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Compile page.clar to page.html
    clarity page.clar

    # Choose the output file
    clarity page.clar out/index.html

    # Print the HTML instead of writing a file
    clarity --stdout page.clar

    # Fail on any structural problem
    clarity --strict page.clar

    # Inspect the token stream or the syntax tree
    clarity --tokens page.clar
    clarity --ast page.clar
"#)]
struct Cli {
    /// Clarity source file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: INPUT with an .html extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Print the HTML to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Print the token stream and exit
    #[arg(long, conflicts_with_all = ["ast", "tree"])]
    tokens: bool,

    /// Print the syntax tree as JSON and exit
    #[arg(long, conflicts_with = "tree")]
    ast: bool,

    /// Print the syntax tree as an outline and exit
    #[arg(long)]
    tree: bool,

    /// Treat parse problems as errors
    #[arg(long)]
    strict: bool,

    /// Only print errors: no banner, progress, warnings or summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    if cli.tokens {
        return print_tokens(&source);
    }
    if cli.ast || cli.tree {
        let document = parse(&source, cli.quiet)?;
        if cli.ast {
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            print_tree(&document);
        }
        return Ok(());
    }

    if !cli.quiet {
        print_banner();
        eprintln!("{} {}", "Compiling".green().bold(), cli.input.display());
    }

    let mut options = CompileOptions::new().quiet();
    if cli.strict {
        options = options.with_strict_mode();
    }
    let compilation = compile_with_progress(&source, &options, |stage| {
        if !cli.quiet {
            report_stage(stage);
        }
    })
    .with_context(|| format!("failed to compile {}", cli.input.display()))?;

    if !cli.quiet {
        report_warnings(&compilation.warnings);
    }

    if cli.stdout {
        println!("{}", compilation.html);
    } else {
        let output = output_path(&cli.input, cli.output.as_deref());
        fs::write(&output, &compilation.html)
            .with_context(|| format!("failed to write {}", output.display()))?;
        if !cli.quiet {
            eprintln!("{} {}", "Wrote".green().bold(), output.display());
        }
    }

    if !cli.quiet {
        eprintln!("{}", size_summary(source.len(), compilation.html.len()).dimmed());
    }
    Ok(())
}

/// `OUTPUT` when given, otherwise `INPUT` with its extension replaced.
fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    output.map_or_else(|| input.with_extension("html"), Path::to_path_buf)
}

fn print_tokens(source: &str) -> Result<()> {
    let tokens = Tokenizer::tokenize(source)?;
    for token in &tokens {
        println!("{token}");
    }
    Ok(())
}

fn parse(source: &str, quiet: bool) -> Result<Document> {
    let tokens = Tokenizer::tokenize(source)?;
    let diagnostics = if quiet {
        Diagnostics::silent()
    } else {
        Diagnostics::new()
    };
    Ok(clarity_syntax::Parser::new(tokens)
        .with_diagnostics(diagnostics)
        .run())
}

/// Status output goes to stderr so `--stdout` carries only HTML.
fn print_banner() {
    eprintln!(
        "{} {}",
        "Clarity".cyan().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}

fn report_stage(stage: Stage) {
    eprintln!("  {} {stage}...", "-".dimmed());
}

fn size_summary(input_bytes: usize, output_bytes: usize) -> String {
    format!("  Input: {input_bytes} bytes\n  Output: {output_bytes} bytes")
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
}
