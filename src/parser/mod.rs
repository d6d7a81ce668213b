//! Parser for the Spyre programming language.
//!
//! Single forward pass over the token sequence with a focus pointer and a
//! "current block" pointer. Builds the AST arena ([`crate::ast::Ast`]),
//! the struct registry, and the global function table in one walk — there is
//! no separate name-resolution pass. Unlike a typical recursive-descent
//! expression parser, `Parser` never builds an expression tree: it carves
//! detached token ranges (see [`expr_capture`]) and hands them untouched to
//! the code generator, which runs the shunting-yard/postfix pipeline over
//! them. This is a deliberate divergence, not an oversight — codegen needs
//! raw token ranges for its own operator-precedence pass.
//!
//! # Module structure
//!
//! - [`error`] - `ParseError`
//! - `helpers` - token navigation primitives
//! - `comments` - `/* ... */` block-comment stripping, run once up front
//! - `types` - datatype parsing (modifiers → base → pointer level)
//! - `struct_decl` - `Name : struct ...` forward declarations and definitions
//! - `function_decl` - `Name : (args) -> type { ... }` and `Name : cfunc(...) -> type;`
//! - `stmt` - statement parsing inside function bodies
//! - `expr_capture` - detached token sub-sequence capture for expressions
//!
//! # See Also
//!
//! * [`crate::lexer`] - produces the token stream consumed here
//! * [`crate::ast`] - the AST arena and struct registry built here
//! * [`crate::codegen`] - consumes `Program` to emit bytecode

mod comments;
mod error;
mod expr_capture;
mod function_decl;
mod helpers;
mod stmt;
mod struct_decl;
mod types;

#[cfg(test)]
mod tests;

pub use error::ParseError;

use crate::ast::{Ast, BlockId, NodeId, Program};
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

/// A single forward-pass parser over a token stream.
pub struct Parser {
    ast: Ast,
    structs: crate::ast::StructTable,
    functions: HashMap<String, NodeId>,
    pos: usize,
    /// Open blocks, innermost last. Always non-empty; the root block sits
    /// at the bottom as a placeholder between top-level declarations.
    block_stack: Vec<BlockId>,
    /// The function whose body is currently being parsed, for local
    /// declaration slot assignment. `None` between top-level declarations.
    current_function: Option<NodeId>,
}

impl Parser {
    /// Creates a parser over `tokens`, first stripping `/* ... */` block
    /// comments from the stream.
    pub fn new(tokens: Vec<Token>) -> Result<Self, ParseError> {
        let tokens = comments::strip_block_comments(tokens)?;
        let ast = Ast::new(tokens);
        let root_block = ast
            .node(ast.root)
            .own_block()
            .expect("the root node always owns a block");
        Ok(Parser {
            ast,
            structs: crate::ast::StructTable::default(),
            functions: HashMap::new(),
            pos: 0,
            block_stack: vec![root_block],
            current_function: None,
        })
    }

    /// Parses the entire token stream into a [`Program`]: the AST, the
    /// struct registry, and the name → definition function table.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        while !self.is_eof() {
            self.parse_top_level_item()?;
        }
        Ok(Program {
            ast: self.ast,
            structs: self.structs,
            functions: self.functions,
        })
    }

    fn root_block(&self) -> BlockId {
        self.ast
            .node(self.ast.root)
            .own_block()
            .expect("the root node always owns a block")
    }

    fn current_block(&self) -> BlockId {
        *self
            .block_stack
            .last()
            .expect("block_stack is never empty")
    }

    /// `Name : struct ...` / `Name : cfunc ...` / `Name : (args) -> type { ... }`.
    fn parse_top_level_item(&mut self) -> Result<(), ParseError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        match self.current_kind().clone() {
            TokenKind::Struct => self.parse_struct(name),
            TokenKind::Cfunc => {
                self.advance();
                self.parse_cfunc(name)
            }
            TokenKind::LParen => self.parse_function_def(name),
            other => Err(ParseError::new(
                format!(
                    "expected 'struct', 'cfunc', or '(' after '{name} :' but found {}",
                    other.describe()
                ),
                self.current_line(),
            )),
        }
    }
}
