//! Unifies errors from every compiler phase so `?` composes end to end
//! through lexer → parser → codegen → driver.

use crate::codegen::CodegenError;
use crate::lexer::LexError;
use crate::parser::ParseError;
use std::path::Path;

/// A compilation error from any phase, carrying enough context for
/// [`crate::diagnostics::report_error`] to point at the offending source.
#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Codegen(CodegenError),
    /// Failed to read the input source file.
    InputRead { path: String, source: std::io::Error },
    /// Failed to open or write the output bytecode listing ("couldn't
    /// open output file '<path>' for writing").
    OutputWrite { path: String, source: std::io::Error },
}

impl CompileError {
    pub(crate) fn input_read(path: &Path, source: std::io::Error) -> Self {
        CompileError::InputRead {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn output_write(path: &Path, source: std::io::Error) -> Self {
        CompileError::OutputWrite {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        CompileError::Codegen(e)
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{e}"),
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Codegen(e) => write!(f, "{e}"),
            CompileError::InputRead { path, source } => {
                write!(f, "couldn't read input file '{path}': {source}")
            }
            CompileError::OutputWrite { path, .. } => {
                write!(f, "couldn't open output file '{path}' for writing")
            }
        }
    }
}

impl std::error::Error for CompileError {}
