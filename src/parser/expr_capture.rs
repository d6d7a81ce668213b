//! Captures detached token sub-sequences for expressions.
//!
//! The parser never builds an expression tree itself — it only carves out
//! the token range between the current position and a terminator, leaving
//! the infix→postfix shunting-yard conversion to the code generator.
//! A reserved keyword or bare `{`/`}` seen before the terminator (outside
//! parens) is reported as "did you forget a semicolon?", matching the
//! original compiler's `parse_until` diagnostic.

use super::{ParseError, Parser};
use crate::ast::{AstNode, NodeId, TokenRange};
use crate::token::TokenKind;

const MISSING_SEMICOLON: &str = "did you forget a semicolon?";

impl Parser {
    /// Captures tokens from the current position up to (not including) the
    /// first `terminator` seen at paren-depth 0. Leaves the cursor
    /// positioned on the terminator.
    pub(super) fn capture_expr_until(
        &mut self,
        terminator: &TokenKind,
    ) -> Result<TokenRange, ParseError> {
        let start = self.pos;
        let mut depth = 0i32;
        loop {
            if self.is_eof() {
                return Err(ParseError::new(
                    "unexpected end of file while parsing an expression",
                    self.current_line(),
                ));
            }
            if depth == 0 && self.check(terminator) {
                break;
            }
            match self.current_kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                TokenKind::LBrace | TokenKind::RBrace if depth == 0 => {
                    return Err(ParseError::new(MISSING_SEMICOLON, self.current_line()));
                }
                other if other.is_keyword() && depth == 0 => {
                    return Err(ParseError::new(MISSING_SEMICOLON, self.current_line()));
                }
                _ => {}
            }
            self.advance();
        }
        Ok(TokenRange::new(start, self.pos))
    }

    /// Parses one `expr;` statement or one `expr = expr;` assignment,
    /// scanning for a top-level (paren-depth 0) `=` before the terminator.
    /// Used both for ordinary block statements and for a `for` loop's init
    /// and post clauses, which use different terminators and may or may not
    /// consume it (the post clause is immediately followed by `{`, which the
    /// `for` handler itself expects next).
    pub(super) fn parse_assign_or_statement_node(
        &mut self,
        parent_block: crate::ast::BlockId,
        terminator: &TokenKind,
        consume_terminator: bool,
    ) -> Result<NodeId, ParseError> {
        let line = self.current_line();
        let start = self.pos;
        let mut depth = 0i32;
        loop {
            if self.is_eof() {
                return Err(ParseError::new(
                    "unexpected end of file while parsing a statement",
                    self.current_line(),
                ));
            }
            if depth == 0 && self.check(terminator) {
                let expr = TokenRange::new(start, self.pos);
                if consume_terminator {
                    self.advance();
                }
                return Ok(self.ast.push_node(AstNode::Statement {
                    expr,
                    parent_block,
                    line,
                }));
            }
            match self.current_kind() {
                TokenKind::LParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RParen => {
                    depth -= 1;
                    self.advance();
                }
                TokenKind::Assign if depth == 0 => {
                    let lhs = TokenRange::new(start, self.pos);
                    self.advance(); // consume '='
                    let rhs = self.capture_expr_until(terminator)?;
                    if consume_terminator {
                        self.advance();
                    }
                    return Ok(self.ast.push_node(AstNode::Assign {
                        lhs,
                        rhs,
                        parent_block,
                        line,
                    }));
                }
                TokenKind::LBrace | TokenKind::RBrace if depth == 0 => {
                    return Err(ParseError::new(MISSING_SEMICOLON, self.current_line()));
                }
                other if other.is_keyword() && depth == 0 => {
                    return Err(ParseError::new(MISSING_SEMICOLON, self.current_line()));
                }
                _ => self.advance(),
            }
        }
    }
}
