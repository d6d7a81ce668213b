//! Function and foreign-function (`cfunc`) declaration parsing.

use super::{ParseError, Parser};
use crate::ast::{AstNode, Block, Decl, FunctionInfo};
use crate::token::TokenKind;

impl Parser {
    fn parse_arg_list(&mut self) -> Result<(Vec<Decl>, bool), ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut is_variadic = false;
        if !self.check(&TokenKind::RParen) {
            loop {
                if self.check(&TokenKind::Ellipsis) {
                    self.advance();
                    is_variadic = true;
                    break;
                }
                let arg_name = self.expect_identifier()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_datatype()?;
                let slot = args.len() as u32;
                args.push(Decl {
                    name: arg_name,
                    datatype: ty,
                    slot,
                });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok((args, is_variadic))
    }

    /// `Name : cfunc ( args ) -> type ;`. The `cfunc` keyword has already
    /// been consumed by the caller. Only foreign functions may be
    /// variadic (`...` as the last argument).
    pub(super) fn parse_cfunc(&mut self, name: String) -> Result<(), ParseError> {
        let line = self.current_line();
        let (args, is_variadic) = self.parse_arg_list()?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_datatype()?;
        self.expect(TokenKind::Semicolon)?;

        let nargs = args.len() as u32;
        let root_block = self.root_block();
        let info = FunctionInfo {
            name: name.clone(),
            args,
            return_type,
            is_foreign: true,
            is_variadic,
            nargs,
            reserve_slots: nargs,
            block: None,
        };
        let node_id = self.ast.push_node(AstNode::Function {
            info,
            parent_block: root_block,
            line,
        });
        self.ast.append_child(root_block, node_id);
        tracing::debug!("registered foreign function '{name}' (nargs={nargs}, variadic={is_variadic})");
        self.functions.insert(name, node_id);
        Ok(())
    }

    /// `Name : ( args ) -> type { body }`.
    pub(super) fn parse_function_def(&mut self, name: String) -> Result<(), ParseError> {
        let line = self.current_line();
        let (args, _is_variadic) = self.parse_arg_list()?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_datatype()?;
        self.expect(TokenKind::LBrace)?;

        let nargs = args.len() as u32;
        let root_block = self.root_block();
        let body_block = self.ast.push_block(Block::default());
        let info = FunctionInfo {
            name: name.clone(),
            args,
            return_type,
            is_foreign: false,
            is_variadic: false,
            nargs,
            reserve_slots: nargs,
            block: Some(body_block),
        };
        let node_id = self.ast.push_node(AstNode::Function {
            info,
            parent_block: root_block,
            line,
        });
        self.ast.block_mut(body_block).parent_node = Some(node_id);
        self.ast.append_child(root_block, node_id);
        tracing::debug!("registered function '{name}' (nargs={nargs})");
        self.functions.insert(name, node_id);

        self.current_function = Some(node_id);
        self.block_stack.push(body_block);
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            self.parse_block_statement()?;
        }
        self.expect(TokenKind::RBrace)?;
        self.block_stack.pop();
        self.current_function = None;
        Ok(())
    }
}
