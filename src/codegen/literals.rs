//! Pass 1 — literal/foreign table emission.
//!
//! One full advance-walk over the AST, visiting every node the way Pass 2
//! will. `cfunc` declarations emit their `let __CFUNC__` line here rather
//! than at the point Pass 2 would otherwise skip them; every string literal
//! found in any statement/condition/initializer expression is assigned a
//! fresh `__STR__<k>` index, recorded in `string_literal_labels` for
//! [`super::expr`] to look up when it reaches the literal during Pass 2.

use super::Codegen;
use crate::ast::{AstNode, BlockId, NodeId, TokenRange};
use crate::token::TokenKind;

impl Codegen {
    pub(super) fn run_pass1(&mut self) {
        let root = self.root_block();
        self.pass1_walk_block(root);
    }

    fn pass1_walk_block(&mut self, block: BlockId) {
        let children = self.program.ast.block(block).children.clone();
        for node_id in children {
            self.pass1_visit_node(node_id);
        }
    }

    fn pass1_visit_node(&mut self, node_id: NodeId) {
        match self.program.ast.node(node_id).clone() {
            AstNode::Function { info, .. } => {
                if info.is_foreign {
                    let name = info.name;
                    self.emit_line(format!("let __CFUNC__{name} \"{name}\""));
                } else if let Some(block) = info.block {
                    self.pass1_walk_block(block);
                }
            }
            AstNode::If { condition, block, .. } => {
                if let Some(range) = condition {
                    self.pass1_collect_range(range);
                }
                self.pass1_walk_block(block);
            }
            AstNode::While { condition, block, .. } => {
                self.pass1_collect_range(condition);
                self.pass1_walk_block(block);
            }
            AstNode::For {
                init,
                condition,
                post,
                block,
                ..
            } => {
                self.pass1_visit_node(init);
                self.pass1_collect_range(condition);
                self.pass1_visit_node(post);
                self.pass1_walk_block(block);
            }
            AstNode::Assign { lhs, rhs, .. } => {
                self.pass1_collect_range(lhs);
                self.pass1_collect_range(rhs);
            }
            AstNode::Statement { expr, .. } => self.pass1_collect_range(expr),
            AstNode::Return { expr: Some(range), .. } => self.pass1_collect_range(range),
            AstNode::Return { expr: None, .. }
            | AstNode::Continue { .. }
            | AstNode::Break { .. }
            | AstNode::Root { .. } => {}
        }
    }

    fn pass1_collect_range(&mut self, range: TokenRange) {
        for idx in range.start..range.end {
            if let TokenKind::StringLiteral(bytes) = &self.program.ast.tokens[idx].kind {
                let bytes = bytes.clone();
                let k = self.next_string_index;
                self.next_string_index += 1;
                self.string_literal_labels.insert(idx, k);
                self.emit_line(format!("let __STR__{k} \"{bytes}\""));
            }
        }
    }
}
