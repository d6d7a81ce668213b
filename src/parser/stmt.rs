//! Statement parsing inside function bodies.

use super::{ParseError, Parser};
use crate::ast::{slot_size, AstNode, Block, Decl, IfKind};
use crate::token::TokenKind;

impl Parser {
    /// Dispatches one statement at the current position: control flow,
    /// a local declaration (`name : type;`, recognized by two-token
    /// lookahead), or an expression statement/assignment.
    pub(super) fn parse_block_statement(&mut self) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::If => self.parse_if_like(IfKind::Reg),
            TokenKind::Elif => self.parse_if_like(IfKind::Elif),
            TokenKind::Else => self.parse_if_like(IfKind::Else),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Continue => self.parse_continue(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Identifier(_) if matches!(self.peek_kind(1), TokenKind::Colon) => {
                self.parse_local_decl()
            }
            _ => self.parse_assign_or_statement_stmt(),
        }
    }

    fn parse_block_body(&mut self) -> Result<(), ParseError> {
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            self.parse_block_statement()?;
        }
        self.expect(TokenKind::RBrace)
    }

    fn parse_if_like(&mut self, kind: IfKind) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // 'if' / 'elif' / 'else'
        let condition = if matches!(kind, IfKind::Else) {
            None
        } else {
            Some(self.capture_expr_until(&TokenKind::LBrace)?)
        };
        self.expect(TokenKind::LBrace)?;

        let parent_block = self.current_block();
        let block_id = self.ast.push_block(Block::default());
        let node_id = self.ast.push_node(AstNode::If {
            kind,
            condition,
            block: block_id,
            parent_block,
            line,
        });
        self.ast.block_mut(block_id).parent_node = Some(node_id);
        self.ast.append_child(parent_block, node_id);

        self.block_stack.push(block_id);
        self.parse_block_body()?;
        self.block_stack.pop();
        Ok(())
    }

    fn parse_while(&mut self) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // 'while'
        let condition = self.capture_expr_until(&TokenKind::LBrace)?;
        self.expect(TokenKind::LBrace)?;

        let parent_block = self.current_block();
        let block_id = self.ast.push_block(Block::default());
        let node_id = self.ast.push_node(AstNode::While {
            condition,
            block: block_id,
            parent_block,
            line,
        });
        self.ast.block_mut(block_id).parent_node = Some(node_id);
        self.ast.append_child(parent_block, node_id);

        self.block_stack.push(block_id);
        self.parse_block_body()?;
        self.block_stack.pop();
        Ok(())
    }

    /// `for init; cond; post { body }`. The init and post clauses are
    /// parsed as free-standing `Assign`/`Statement` nodes, referenced
    /// directly by the `For` node's `init`/`post` fields rather than being
    /// appended as children of any block — the code generator visits them
    /// explicitly rather than through the ordinary sibling walk.
    fn parse_for(&mut self) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // 'for'
        let parent_block = self.current_block();

        let init = self.parse_assign_or_statement_node(parent_block, &TokenKind::Semicolon, true)?;
        let condition = self.capture_expr_until(&TokenKind::Semicolon)?;
        self.expect(TokenKind::Semicolon)?;
        let post = self.parse_assign_or_statement_node(parent_block, &TokenKind::LBrace, false)?;
        self.expect(TokenKind::LBrace)?;

        let block_id = self.ast.push_block(Block::default());
        let node_id = self.ast.push_node(AstNode::For {
            init,
            condition,
            post,
            block: block_id,
            parent_block,
            line,
        });
        self.ast.block_mut(block_id).parent_node = Some(node_id);
        self.ast.append_child(parent_block, node_id);

        self.block_stack.push(block_id);
        self.parse_block_body()?;
        self.block_stack.pop();
        Ok(())
    }

    fn parse_return(&mut self) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // 'return'
        let parent_block = self.current_block();
        let expr = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.capture_expr_until(&TokenKind::Semicolon)?)
        };
        self.expect(TokenKind::Semicolon)?;
        let node_id = self.ast.push_node(AstNode::Return {
            expr,
            parent_block,
            line,
        });
        self.ast.append_child(parent_block, node_id);
        Ok(())
    }

    fn parse_continue(&mut self) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // 'continue'
        self.expect(TokenKind::Semicolon)?;
        let parent_block = self.current_block();
        let node_id = self.ast.push_node(AstNode::Continue { parent_block, line });
        self.ast.append_child(parent_block, node_id);
        Ok(())
    }

    fn parse_break(&mut self) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // 'break'
        self.expect(TokenKind::Semicolon)?;
        let parent_block = self.current_block();
        let node_id = self.ast.push_node(AstNode::Break { parent_block, line });
        self.ast.append_child(parent_block, node_id);
        Ok(())
    }

    fn parse_local_decl(&mut self) -> Result<(), ParseError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_datatype()?;
        self.expect(TokenKind::Semicolon)?;
        self.register_local(name, ty);
        Ok(())
    }

    fn parse_assign_or_statement_stmt(&mut self) -> Result<(), ParseError> {
        let parent_block = self.current_block();
        let node_id =
            self.parse_assign_or_statement_node(parent_block, &TokenKind::Semicolon, true)?;
        self.ast.append_child(parent_block, node_id);
        Ok(())
    }

    /// Registers a local declaration (`name : type;`) in the innermost open
    /// block and reserves its slot(s) in the owning function's frame. Local
    /// declarations are never `AstNode`s — there is no code to emit for one
    /// (a `Decl` lives only in `Block::locals`).
    fn register_local(&mut self, name: String, datatype: crate::ast::Datatype) {
        let function_id = self
            .current_function
            .expect("local declarations only occur inside a function body");
        let size = slot_size(&datatype, &self.structs);
        let extra = if datatype.is_struct_value() { 1 } else { 0 };
        let slot = match self.ast.node_mut(function_id) {
            AstNode::Function { info, .. } => {
                let slot = info.reserve_slots;
                info.reserve_slots += size + extra;
                slot
            }
            _ => unreachable!("current_function always refers to a Function node"),
        };
        let decl = Decl {
            name,
            datatype,
            slot,
        };
        let block_id = self.current_block();
        self.ast.block_mut(block_id).locals.push(decl);
    }
}
