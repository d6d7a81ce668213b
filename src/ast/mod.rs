//! The Spyre abstract syntax tree.
//!
//! - [`node`] - the arena (`Ast`, `NodeId`, `BlockId`, `AstNode`, `Block`,
//!   `TokenRange`)
//! - [`types`] - `Datatype`, `Decl`, `StructDef`, `StructTable`

mod node;
mod types;

#[cfg(test)]
mod tests;

pub use node::{Ast, AstNode, Block, BlockId, FunctionInfo, IfKind, NodeId, TokenRange};
pub use types::{slot_size, Base, Datatype, Decl, Modifiers, StructDef, StructTable, SLOT_BYTES};

use std::collections::HashMap;

/// The parser's complete output (`parse(tokens) ->
/// ParseState { root_ast, struct_table }`), extended with the global
/// function registry the code generator's `FuncCall` resolution needs
/// (resolving the named function in the global function table).
pub struct Program {
    pub ast: Ast,
    pub structs: StructTable,
    /// Name → the `AstNode::Function` node defining it (func or cfunc).
    pub functions: HashMap<String, NodeId>,
}
