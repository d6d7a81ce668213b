//! The Spyre programming language compiler.
//!
//! Spyre is a small statically-typed imperative language. This crate reads
//! a Spyre source file and emits a textual bytecode listing for a separate
//! virtual machine — there is no linking step and no execution here.
//!
//! # Modules
//!
//! - [`token`] - token kinds and source spans
//! - [`lexer`] - tokenization
//! - [`parser`] - builds the AST arena, struct table, and function registry
//! - [`ast`] - the AST arena and data model
//! - [`codegen`] - walks the AST and emits the bytecode listing
//! - [`diagnostics`] - renders a [`CompileError`] with `ariadne`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! spyre::compile(Path::new("hello.spy"), Path::new("hello.asm")).expect("compile error");
//! ```

pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token;

mod error;

pub use error::CompileError;

use ast::Program;
use codegen::Codegen;
use lexer::Lexer;
use parser::Parser;
use std::io::Write;
use std::path::Path;

/// Reads `input_path`, runs the full pipeline, and writes the resulting
/// bytecode listing to `output_path`.
pub fn compile(input_path: &Path, output_path: &Path) -> Result<(), CompileError> {
    let source =
        std::fs::read_to_string(input_path).map_err(|e| CompileError::input_read(input_path, e))?;
    let program = parse(&source)?;
    let listing = Codegen::new(program).generate()?;
    write_listing(output_path, &listing)
}

/// Runs lexing and parsing only, returning the built [`Program`].
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    let program = Parser::new(tokens)?.parse()?;
    Ok(program)
}

/// Runs the full pipeline — lexing, parsing, and code generation — but
/// discards the resulting listing. Used by the CLI's `check` subcommand to
/// surface every diagnostic (including type/resolve errors only code
/// generation can find) without writing an output file.
pub fn check(source: &str) -> Result<(), CompileError> {
    let program = parse(source)?;
    Codegen::new(program).generate()?;
    Ok(())
}

fn write_listing(output_path: &Path, listing: &[String]) -> Result<(), CompileError> {
    let mut file = std::fs::File::create(output_path)
        .map_err(|e| CompileError::output_write(output_path, e))?;
    for line in listing {
        writeln!(file, "{line}").map_err(|e| CompileError::output_write(output_path, e))?;
    }
    Ok(())
}
