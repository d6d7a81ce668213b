//! Infix → postfix expression conversion.
//!
//! Operates directly on a `Token` slice carved out by the parser; never
//! builds an expression tree. `&`, `^`, and `!` are always unary in Spyre
//! (there is no binary use of any of the three), so the scan never needs to
//! disambiguate them by position the way a general-purpose shunting-yard
//! would.

use super::error::CodegenError;
use crate::ast::NodeId;
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

/// One node of the postfix (reverse-Polish) expression stream.
#[derive(Debug, Clone)]
pub enum ExpNode {
    /// Index into the AST's token vector of an `Int`/`Float`/`String` literal.
    Literal(usize),
    /// Index into the AST's token vector of an `Identifier` token — either a
    /// local variable or, once evaluation finds no local of that name, a
    /// pending struct field name consumed by the following `.`.
    Identifier(usize),
    Operator(TokenKind),
    FuncCall {
        name: String,
        callee: NodeId,
        /// A single flat postfix sub-sequence for the whole, possibly
        /// comma-separated, argument list.
        args: Vec<ExpNode>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

fn precedence(op: &TokenKind) -> Option<(u8, Assoc)> {
    use TokenKind::*;
    Some(match op {
        Comma => (1, Assoc::Left),
        Assign | AndAnd | OrOr => (3, Assoc::Left),
        EqEq | NotEq => (4, Assoc::Left),
        Gt | Ge | Lt | Le => (6, Assoc::Left),
        Pipe | Shl | Shr => (7, Assoc::Left),
        Plus | Minus => (8, Assoc::Left),
        Star | Slash | Percent => (9, Assoc::Left),
        Amp | Caret | Bang => (10, Assoc::Right),
        Dot => (11, Assoc::Left),
        _ => return None,
    })
}

enum StackOp {
    LParen,
    Op(TokenKind),
}

/// Converts the token sub-sequence `tokens` (whose absolute position in the
/// AST's token vector starts at `base_index`) into a postfix `ExpNode`
/// stream.
pub fn infix_to_postfix(
    tokens: &[Token],
    base_index: usize,
    functions: &HashMap<String, NodeId>,
) -> Result<Vec<ExpNode>, CodegenError> {
    let mut output = Vec::new();
    let mut op_stack: Vec<StackOp> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i].kind {
            TokenKind::IntLiteral(_) | TokenKind::FloatLiteral(_) | TokenKind::StringLiteral(_) => {
                output.push(ExpNode::Literal(base_index + i));
                i += 1;
            }
            TokenKind::Identifier(name)
                if matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::LParen)) =>
            {
                let callee = *functions.get(name).ok_or_else(|| {
                    CodegenError::resolve_error(
                        format!("call to unknown function '{name}'"),
                        tokens[i].span.line,
                    )
                })?;
                let (arg_tokens, args_base, end) = extract_call_args(tokens, i)?;
                let args = if arg_tokens.is_empty() {
                    Vec::new()
                } else {
                    infix_to_postfix(arg_tokens, base_index + args_base, functions)?
                };
                output.push(ExpNode::FuncCall {
                    name: name.clone(),
                    callee,
                    args,
                });
                i = end;
            }
            TokenKind::Identifier(_) => {
                output.push(ExpNode::Identifier(base_index + i));
                i += 1;
            }
            TokenKind::LParen => {
                op_stack.push(StackOp::LParen);
                i += 1;
            }
            TokenKind::RParen => {
                loop {
                    match op_stack.pop() {
                        Some(StackOp::LParen) => break,
                        Some(StackOp::Op(op)) => output.push(ExpNode::Operator(op)),
                        None => {
                            return Err(CodegenError::internal(
                                "unbalanced parentheses in expression",
                                tokens[i].span.line,
                            ))
                        }
                    }
                }
                i += 1;
            }
            kind if precedence(kind).is_some() => {
                let (prec, assoc) = precedence(kind).unwrap();
                loop {
                    let should_pop = match op_stack.last() {
                        Some(StackOp::Op(top)) => {
                            let (top_prec, _) = precedence(top).expect("pushed operators always have a precedence");
                            match assoc {
                                Assoc::Left => top_prec >= prec,
                                Assoc::Right => top_prec > prec,
                            }
                        }
                        _ => false,
                    };
                    if !should_pop {
                        break;
                    }
                    if let Some(StackOp::Op(op)) = op_stack.pop() {
                        output.push(ExpNode::Operator(op));
                    }
                }
                op_stack.push(StackOp::Op(kind.clone()));
                i += 1;
            }
            other => {
                return Err(CodegenError::internal(
                    format!("unexpected token {} in expression", other.describe()),
                    tokens[i].span.line,
                ))
            }
        }
    }

    while let Some(item) = op_stack.pop() {
        match item {
            StackOp::Op(op) => output.push(ExpNode::Operator(op)),
            StackOp::LParen => {
                return Err(CodegenError::internal(
                    "unbalanced parentheses in expression",
                    tokens.last().map(|t| t.span.line).unwrap_or(0),
                ))
            }
        }
    }

    Ok(output)
}

/// Given `tokens[call_start]` an `Identifier` immediately followed by `(`,
/// scans ahead counting parens to find the matching `)`. Returns the
/// argument tokens (without the parens), their relative base index, and the
/// index just past the matching `)`.
fn extract_call_args(
    tokens: &[Token],
    call_start: usize,
) -> Result<(&[Token], usize, usize), CodegenError> {
    let open = call_start + 1;
    let mut depth = 0i32;
    let mut j = open;
    loop {
        if j >= tokens.len() {
            return Err(CodegenError::internal(
                "unterminated function call argument list",
                tokens[call_start].span.line,
            ));
        }
        match tokens[j].kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        j += 1;
    }
    Ok((&tokens[open + 1..j], open + 1, j + 1))
}
