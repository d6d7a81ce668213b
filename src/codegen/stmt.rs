//! Pass 2 — entry jump, AST walk, per-node bytecode emission.
//!
//! The "advance" operation (descend into a non-empty block, else move to
//! the next sibling, else ascend and retry) falls out
//! naturally from ordinary recursive descent: [`Codegen::walk_block`] visits
//! each child in order, and any node owning a nested block recurses into it
//! before returning. The deferred-instruction stack stands in for the
//! "retry after ascending" step — whatever a construct pushed before
//! descending is popped and emitted the moment its block's walk returns.

use super::expr::describe_datatype;
use super::error::CodegenError;
use super::Codegen;
use crate::ast::{AstNode, BlockId, IfKind, NodeId, TokenRange};

impl Codegen {
    pub(super) fn run_pass2(&mut self) -> Result<(), CodegenError> {
        self.emit_line("jmp __ENTRY_POINT__");
        let root = self.root_block();
        self.walk_block(root, 0)?;
        self.emit_line("__ENTRY_POINT__:");
        self.emit_line("call __FUNC__main, 0");
        Ok(())
    }

    fn walk_block(&mut self, block: BlockId, depth: u32) -> Result<(), CodegenError> {
        let children = self.program.ast.block(block).children.clone();
        for (i, node_id) in children.iter().enumerate() {
            let next_sibling = children.get(i + 1).copied();
            self.emit_node(*node_id, next_sibling, depth)?;
        }
        Ok(())
    }

    /// Runs `self.walk_block(child_block, depth + 1)`, having first pushed
    /// `epilogue` onto the deferred stack at `depth + 1` so it reaches the
    /// output right after the block's own body, in order. `current_block` is
    /// set to `child_block` for the duration of the walk so that locals
    /// declared directly inside it (and not just in some enclosing function
    /// body) are visible to `find_local`, then restored on the way back out.
    fn emit_construct_body(
        &mut self,
        child_block: BlockId,
        depth: u32,
        epilogue: Vec<String>,
    ) -> Result<(), CodegenError> {
        for line in epilogue {
            self.deferred.push(depth + 1, line);
        }
        let previous_block = self.current_block.replace(child_block);
        let result = self.walk_block(child_block, depth + 1);
        self.current_block = previous_block;
        result?;
        for line in self.deferred.pop(depth + 1) {
            self.emit_line(line);
        }
        Ok(())
    }

    fn emit_node(
        &mut self,
        node_id: NodeId,
        next_sibling: Option<NodeId>,
        depth: u32,
    ) -> Result<(), CodegenError> {
        match self.program.ast.node(node_id).clone() {
            AstNode::Root { .. } => unreachable!("Root is never a child of a block"),
            AstNode::Function { .. } => self.emit_function(node_id, depth),
            AstNode::If { kind, condition, block, line, .. } => match kind {
                IfKind::Reg | IfKind::Elif => {
                    self.emit_if_or_elif(kind, condition, block, next_sibling, depth, line)
                }
                IfKind::Else => self.emit_else(block, depth, line),
            },
            AstNode::While { condition, block, line, .. } => {
                self.emit_while(condition, block, depth, line)
            }
            AstNode::For { init, condition, post, block, line, .. } => {
                self.emit_for(init, condition, post, block, depth, line)
            }
            AstNode::Assign { lhs, rhs, line, .. } => self.emit_assign(lhs, rhs, line),
            AstNode::Statement { expr, line, .. } => self.emit_statement(expr, line),
            AstNode::Return { expr, line, .. } => self.emit_return(expr, line),
            AstNode::Continue { line, .. } => self.emit_continue(line),
            AstNode::Break { line, .. } => self.emit_break(line),
        }
    }

    /// A `for` loop's init/post clause: a free-standing `Assign` or
    /// `Statement` node that was never appended as a block child.
    fn emit_statement_like(&mut self, node_id: NodeId) -> Result<(), CodegenError> {
        match self.program.ast.node(node_id).clone() {
            AstNode::Assign { lhs, rhs, line, .. } => self.emit_assign(lhs, rhs, line),
            AstNode::Statement { expr, line, .. } => self.emit_statement(expr, line),
            other => Err(CodegenError::internal(
                format!("a for-loop's init/post clause must be an assignment or expression, found {other:?}"),
                0,
            )),
        }
    }

    fn emit_function(&mut self, node_id: NodeId, depth: u32) -> Result<(), CodegenError> {
        let (name, body_block, nargs, reserve_slots, is_foreign) = match self.program.ast.node(node_id) {
            AstNode::Function { info, .. } => (
                info.name.clone(),
                info.block,
                info.nargs,
                info.reserve_slots,
                info.is_foreign,
            ),
            _ => unreachable!("emit_function always receives a Function node"),
        };
        if is_foreign {
            return Ok(());
        }
        let body_block = body_block.expect("a non-foreign function always owns a body block");

        self.emit_line(format!("__FUNC__{name}:"));
        let ret_label = self.fresh_label();
        let previous_function = self.current_function.replace((node_id, ret_label));
        let previous_block = self.current_block.replace(body_block);
        let previous_loops = std::mem::take(&mut self.loop_stack);
        let previous_chain = self.if_chain_label.take();

        self.emit_line(format!("res {reserve_slots}"));
        for i in 0..nargs {
            self.emit_line(format!("iarg {i}"));
            self.emit_line(format!("ilsave {i}"));
        }

        if self.program.ast.block(body_block).children.is_empty() {
            self.emit_line(format!("__LABEL__{ret_label}:"));
            self.emit_line("iret");
        } else {
            for slot in self.collect_struct_handle_locals(body_block) {
                self.emit_line(format!("lea {}", slot + 1));
                self.emit_line(format!("ilsave {slot}"));
            }
            self.emit_construct_body(
                body_block,
                depth,
                vec![format!("__LABEL__{ret_label}:"), "iret".to_string()],
            )?;
        }

        self.current_function = previous_function;
        self.current_block = previous_block;
        self.loop_stack = previous_loops;
        self.if_chain_label = previous_chain;
        Ok(())
    }

    /// Collects the stack slot of every by-value struct local declared
    /// anywhere inside `block`, transitively through nested `if`/`while`/
    /// `for` blocks, so their handles can be initialized in the function
    /// prologue.
    fn collect_struct_handle_locals(&self, block: BlockId) -> Vec<u32> {
        let mut slots = Vec::new();
        self.collect_struct_handle_locals_into(block, &mut slots);
        slots
    }

    fn collect_struct_handle_locals_into(&self, block: BlockId, out: &mut Vec<u32>) {
        let b = self.program.ast.block(block);
        for decl in &b.locals {
            if decl.datatype.is_struct_value() {
                out.push(decl.slot);
            }
        }
        for &child in &b.children {
            if let Some(sub) = self.program.ast.node(child).own_block() {
                self.collect_struct_handle_locals_into(sub, out);
            }
        }
    }

    fn next_continues_if_chain(&self, next_sibling: Option<NodeId>) -> bool {
        match next_sibling.map(|id| self.program.ast.node(id)) {
            Some(AstNode::If { kind: IfKind::Elif | IfKind::Else, .. }) => true,
            _ => false,
        }
    }

    fn emit_if_or_elif(
        &mut self,
        kind: IfKind,
        condition: Option<TokenRange>,
        block: BlockId,
        next_sibling: Option<NodeId>,
        depth: u32,
        line: usize,
    ) -> Result<(), CodegenError> {
        let chain_label = match kind {
            IfKind::Reg => {
                let l = self.fresh_label();
                self.if_chain_label = Some(l);
                l
            }
            IfKind::Elif => self
                .if_chain_label
                .expect("an elif always follows a Reg-if in the same chain"),
            IfKind::Else => unreachable!("Else is handled by emit_else"),
        };
        let branch_label = self.fresh_label();
        let condition = condition.ok_or_else(|| {
            CodegenError::internal("if/elif always carries a condition", line)
        })?;
        self.gen_condition(condition)?;
        self.emit_line(format!("jz __LABEL__{branch_label}"));

        let continues = self.next_continues_if_chain(next_sibling);
        let mut epilogue = Vec::new();
        if continues {
            epilogue.push(format!("jmp __LABEL__{chain_label}"));
        } else {
            self.if_chain_label = None;
        }
        epilogue.push(format!("__LABEL__{branch_label}:"));

        self.emit_construct_body(block, depth, epilogue)
    }

    fn emit_else(&mut self, block: BlockId, depth: u32, line: usize) -> Result<(), CodegenError> {
        let chain_label = self
            .if_chain_label
            .take()
            .ok_or_else(|| CodegenError::internal("else without a preceding if/elif chain", line))?;
        self.emit_construct_body(block, depth, vec![format!("__LABEL__{chain_label}:")])
    }

    fn emit_while(
        &mut self,
        condition: TokenRange,
        block: BlockId,
        depth: u32,
        _line: usize,
    ) -> Result<(), CodegenError> {
        let top = self.fresh_label();
        let bot = self.fresh_label();
        self.loop_stack.push((top, bot));
        self.emit_line(format!("__LABEL__{top}:"));
        self.gen_condition(condition)?;
        self.emit_line(format!("jz __LABEL__{bot}"));
        let result = self.emit_construct_body(
            block,
            depth,
            vec![format!("jmp __LABEL__{top}"), format!("__LABEL__{bot}:")],
        );
        self.loop_stack.pop();
        result
    }

    fn emit_for(
        &mut self,
        init: NodeId,
        condition: TokenRange,
        post: NodeId,
        block: BlockId,
        depth: u32,
        _line: usize,
    ) -> Result<(), CodegenError> {
        self.emit_statement_like(init)?;

        let top = self.fresh_label();
        let bot = self.fresh_label();
        self.loop_stack.push((top, bot));
        self.emit_line(format!("__LABEL__{top}:"));
        self.gen_condition(condition)?;
        self.emit_line(format!("jz __LABEL__{bot}"));

        let (_, post_lines) = self.capture(|gen| gen.emit_statement_like(post))?;
        let mut epilogue = post_lines;
        epilogue.push(format!("jmp __LABEL__{top}"));
        epilogue.push(format!("__LABEL__{bot}:"));

        let result = self.emit_construct_body(block, depth, epilogue);
        self.loop_stack.pop();
        result
    }

    fn emit_return(&mut self, expr: Option<TokenRange>, line: usize) -> Result<(), CodegenError> {
        let ret_label = self
            .current_function
            .map(|(_, label)| label)
            .ok_or_else(|| CodegenError::internal("return outside of any function", line))?;
        if let Some(range) = expr {
            let actual = self.gen_expr(range, false)?;
            let expected = self.current_function_return_type()?;
            if expected.is_int_like() && actual.is_float() {
                self.emit_line("ftoi 0");
            } else if expected.is_float() && actual.is_int_like() {
                self.emit_line("itof 0");
            } else if !expected.identical_to(&actual) {
                return Err(CodegenError::type_error(
                    format!(
                        "function returns '{}' but this expression has type '{}'",
                        describe_datatype(&expected),
                        describe_datatype(&actual),
                    ),
                    line,
                ));
            }
        }
        self.emit_line(format!("jmp __LABEL__{ret_label}"));
        Ok(())
    }

    fn emit_continue(&mut self, line: usize) -> Result<(), CodegenError> {
        let (top, _) = self
            .loop_stack
            .last()
            .copied()
            .ok_or_else(|| CodegenError::internal("continue outside of any loop", line))?;
        self.emit_line(format!("jmp __LABEL__{top}"));
        Ok(())
    }

    fn emit_break(&mut self, line: usize) -> Result<(), CodegenError> {
        let (_, bot) = self
            .loop_stack
            .last()
            .copied()
            .ok_or_else(|| CodegenError::internal("break outside of any loop", line))?;
        self.emit_line(format!("jmp __LABEL__{bot}"));
        Ok(())
    }

    /// Both sides are probed first (discarding their emitted lines) purely
    /// to learn their types for the coercion check; the real emission order
    /// is the L-value address, then the R-value expression, then the store
    /// — the VM's `isave`/`fsave` expects the address below the value on
    /// the operand stack.
    fn emit_assign(&mut self, lhs: TokenRange, rhs: TokenRange, line: usize) -> Result<(), CodegenError> {
        let (lhs_ty, _) = self.capture(|gen| gen.gen_expr(lhs, true))?;
        let (rhs_ty, _) = self.capture(|gen| gen.gen_expr(rhs, false))?;
        self.gen_expr(lhs, true)?;
        self.gen_expr(rhs, false)?;
        if lhs_ty.is_int_like() && rhs_ty.is_float() {
            self.emit_line("ftoi 0");
        } else if lhs_ty.is_float() && rhs_ty.is_int_like() {
            self.emit_line("itof 0");
        } else if !lhs_ty.identical_to(&rhs_ty) {
            return Err(CodegenError::type_error(
                format!(
                    "cannot assign a value of type '{}' to a destination of type '{}'",
                    describe_datatype(&rhs_ty),
                    describe_datatype(&lhs_ty),
                ),
                line,
            ));
        }
        if lhs_ty.is_float() {
            self.emit_line("fsave");
        } else {
            self.emit_line("isave");
        }
        Ok(())
    }

    fn emit_statement(&mut self, expr: TokenRange, _line: usize) -> Result<(), CodegenError> {
        self.gen_expr(expr, false)?;
        Ok(())
    }

    fn gen_condition(&mut self, condition: TokenRange) -> Result<(), CodegenError> {
        self.gen_expr(condition, false)?;
        Ok(())
    }
}
