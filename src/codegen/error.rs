//! Code generation error types: `TypeError`, `ResolveError`, `InternalError`.

/// Which of the three code-generation error kinds this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodegenErrorKind {
    /// Mismatched types across assignment/call/return, `.` on a non-struct
    /// or on a pointer-to-struct, `&` on a literal, `^` on a non-pointer,
    /// wrong argument count.
    Type,
    /// Undeclared identifier, unknown function, unknown field.
    Resolve,
    /// The type-stack's shape didn't match what the evaluator expected
    /// (e.g. a non-`Datatype` entry where one was required) — a bug in the
    /// compiler itself rather than in the Spyre source being compiled.
    Internal,
}

/// An error raised while walking the AST to emit bytecode.
#[derive(Debug)]
pub struct CodegenError {
    pub kind: CodegenErrorKind,
    pub message: String,
    pub line: usize,
}

impl CodegenError {
    pub fn type_error(message: impl Into<String>, line: usize) -> Self {
        CodegenError {
            kind: CodegenErrorKind::Type,
            message: message.into(),
            line,
        }
    }

    pub fn resolve_error(message: impl Into<String>, line: usize) -> Self {
        CodegenError {
            kind: CodegenErrorKind::Resolve,
            message: message.into(),
            line,
        }
    }

    pub fn internal(message: impl Into<String>, line: usize) -> Self {
        CodegenError {
            kind: CodegenErrorKind::Internal,
            message: message.into(),
            line,
        }
    }
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            CodegenErrorKind::Type => "type error",
            CodegenErrorKind::Resolve => "resolve error",
            CodegenErrorKind::Internal => "internal error",
        };
        write!(f, "line {}: {}: {}", self.line, kind, self.message)
    }
}

impl std::error::Error for CodegenError {}
