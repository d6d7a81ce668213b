//! Code generator for the Spyre language.
//!
//! Turns a parsed [`Program`] into a textual bytecode listing for an
//! external VM. There is no optimization pass and no linking step: this
//! module's only job is to walk the AST in source order and print
//! instructions, one per line.
//!
//! # Module structure
//!
//! - [`error`] - `CodegenError`
//! - [`deferred`] - the deferred-instruction stack
//! - [`shunting_yard`] - infix → postfix expression conversion
//! - [`expr`] - postfix → bytecode evaluation with a type-stack
//!
//! # See Also
//!
//! * [`crate::ast`] - the `Program` consumed here
//! * [`crate::parser`] - produces the `Program`

mod deferred;
mod error;
mod expr;
mod literals;
mod shunting_yard;
mod stmt;

#[cfg(test)]
mod tests;

pub use error::{CodegenError, CodegenErrorKind};

use crate::ast::{AstNode, BlockId, NodeId, Program};
use deferred::DeferredStack;

/// Walks a [`Program`]'s AST and emits its bytecode listing, one instruction
/// string per output line.
pub struct Codegen {
    program: Program,
    output: Vec<String>,
    deferred: DeferredStack,
    label_counter: u32,
    /// The block whose locals are in scope for the expression currently
    /// being evaluated; `None` before code generation enters a function body.
    current_block: Option<BlockId>,
    /// The `Function` node currently being generated, and its return label.
    current_function: Option<(NodeId, u32)>,
    /// `(top, bot)` labels of the innermost enclosing loop, for
    /// `continue`/`break`.
    loop_stack: Vec<(u32, u32)>,
    /// The chain label shared by a `Reg`-if and its trailing `elif`/`else`
    /// siblings.
    if_chain_label: Option<u32>,
    /// Token index → `__STR__<k>` index, assigned during Pass 1.
    string_literal_labels: std::collections::HashMap<usize, u32>,
    next_string_index: u32,
}

impl Codegen {
    pub fn new(program: Program) -> Self {
        Codegen {
            program,
            output: Vec::new(),
            deferred: DeferredStack::new(),
            label_counter: 0,
            current_block: None,
            current_function: None,
            loop_stack: Vec::new(),
            if_chain_label: None,
            string_literal_labels: std::collections::HashMap::new(),
            next_string_index: 0,
        }
    }

    /// Runs both passes and returns the finished listing, one instruction
    /// (or `let`/label line) per entry.
    pub fn generate(mut self) -> Result<Vec<String>, CodegenError> {
        self.run_pass1();
        self.run_pass2()?;
        debug_assert!(
            self.deferred.is_empty(),
            "deferred-instruction stack must be empty at process end"
        );
        Ok(self.output)
    }

    fn emit_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::trace!(target: "spyre::codegen", "{line}");
        self.output.push(line);
    }

    fn fresh_label(&mut self) -> u32 {
        let l = self.label_counter;
        self.label_counter += 1;
        l
    }

    /// Runs `f` with `self.output` redirected to a fresh buffer, returning
    /// whatever `f` produced alongside the lines it emitted. Used both as a
    /// side-effect-free type probe (discarding the captured lines) and to
    /// emit the `for`-loop post-statement into the deferred stack instead of
    /// directly into the listing.
    fn capture<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenError>,
    ) -> Result<(T, Vec<String>), CodegenError> {
        let previous = std::mem::take(&mut self.output);
        let result = f(self);
        let captured = std::mem::replace(&mut self.output, previous);
        result.map(|v| (v, captured))
    }

    fn root_block(&self) -> BlockId {
        self.program
            .ast
            .node(self.program.ast.root)
            .own_block()
            .expect("the root node always owns a block")
    }

    fn current_function_return_type(&self) -> Result<crate::ast::Datatype, CodegenError> {
        let (function_id, _) = self
            .current_function
            .ok_or_else(|| CodegenError::internal("expression outside any function", 0))?;
        match self.program.ast.node(function_id) {
            AstNode::Function { info, .. } => Ok(info.return_type.clone()),
            _ => unreachable!("current_function always refers to a Function node"),
        }
    }
}
