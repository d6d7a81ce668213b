//! Postfix → bytecode evaluation with a type-stack.

use super::error::CodegenError;
use super::shunting_yard::ExpNode;
use super::Codegen;
use crate::ast::{Base, Datatype, Decl, SLOT_BYTES};
use crate::token::TokenKind;

/// An entry on the evaluator's type-stack. Most entries are a fully-resolved
/// `Datatype` already sitting on the VM operand stack; an identifier that
/// didn't resolve as a local is carried as a pending field name until the
/// following `.` consumes it.
enum StackEntry {
    Value(Datatype),
    PendingField(String),
}

pub fn describe_datatype(ty: &Datatype) -> String {
    format!("{}{}", ty.base, "^".repeat(ty.ptr_level as usize))
}

fn ends_in_deref(postfix: &[ExpNode]) -> bool {
    matches!(postfix.last(), Some(ExpNode::Operator(TokenKind::Caret)))
}

impl Codegen {
    /// Converts `range` to postfix and evaluates it, returning the
    /// expression's resulting type. `is_lhs` is `true` when this expression
    /// is being generated as an assignment target (an L-value).
    pub(super) fn gen_expr(
        &mut self,
        range: crate::ast::TokenRange,
        is_lhs: bool,
    ) -> Result<Datatype, CodegenError> {
        let postfix = self.to_postfix(range)?;
        let last_is_deref = ends_in_deref(&postfix);
        self.eval_postfix(&postfix, is_lhs, last_is_deref)
    }

    pub(super) fn to_postfix(
        &self,
        range: crate::ast::TokenRange,
    ) -> Result<Vec<ExpNode>, CodegenError> {
        let tokens = &self.program.ast.tokens[range.start..range.end];
        super::shunting_yard::infix_to_postfix(tokens, range.start, &self.program.functions)
    }

    pub(super) fn eval_postfix(
        &mut self,
        postfix: &[ExpNode],
        is_lhs: bool,
        last_is_deref: bool,
    ) -> Result<Datatype, CodegenError> {
        let mut stack = self.eval_postfix_stack(postfix, is_lhs, last_is_deref)?;
        match stack.pop() {
            Some(StackEntry::Value(ty)) => Ok(ty),
            Some(StackEntry::PendingField(name)) => Err(CodegenError::resolve_error(
                format!("'{name}' does not name a local variable"),
                0,
            )),
            None => Err(CodegenError::internal("empty expression", 0)),
        }
    }

    /// Like [`Self::eval_postfix`], but returns the evaluator's whole final
    /// type-stack instead of popping just the top entry. A function call's
    /// comma-separated argument list is one flat postfix sub-sequence in
    /// which `,` is a no-op on the type-stack, so evaluating it once
    /// here leaves one stack entry per argument, in order.
    fn eval_postfix_stack(
        &mut self,
        postfix: &[ExpNode],
        is_lhs: bool,
        last_is_deref: bool,
    ) -> Result<Vec<StackEntry>, CodegenError> {
        let mut stack: Vec<StackEntry> = Vec::new();
        for idx in 0..postfix.len() {
            let is_last = idx + 1 == postfix.len();
            match &postfix[idx] {
                ExpNode::Literal(tok_idx) => {
                    let ty = self.eval_literal(*tok_idx)?;
                    stack.push(StackEntry::Value(ty));
                }
                ExpNode::Identifier(tok_idx) => {
                    let name = self.identifier_name(*tok_idx);
                    let next_is_amp = matches!(
                        postfix.get(idx + 1),
                        Some(ExpNode::Operator(TokenKind::Amp))
                    );
                    if let Some(decl) = self.find_local(&name) {
                        self.emit_identifier_load(&decl, is_lhs, next_is_amp, last_is_deref && is_last);
                        stack.push(StackEntry::Value(decl.datatype));
                    } else {
                        stack.push(StackEntry::PendingField(name));
                    }
                }
                ExpNode::FuncCall { name, callee, args } => {
                    let ty = self.eval_funccall(name, *callee, args)?;
                    stack.push(StackEntry::Value(ty));
                }
                ExpNode::Operator(op) => {
                    let next_is_amp = matches!(
                        postfix.get(idx + 1),
                        Some(ExpNode::Operator(TokenKind::Amp))
                    );
                    self.eval_operator(op, &mut stack, is_lhs, last_is_deref, is_last, next_is_amp)?;
                }
            }
        }
        Ok(stack)
    }

    fn eval_literal(&mut self, tok_idx: usize) -> Result<Datatype, CodegenError> {
        match &self.program.ast.tokens[tok_idx].kind {
            TokenKind::IntLiteral(n) => {
                let n = *n;
                self.emit_line(format!("ipush {n}"));
                Ok(Datatype::new(Base::Int, 0))
            }
            TokenKind::FloatLiteral(f) => {
                let f = *f;
                self.emit_line(format!("fpush {f}"));
                Ok(Datatype::new(Base::Float, 0))
            }
            TokenKind::StringLiteral(_) => {
                let k = *self.string_literal_labels.get(&tok_idx).ok_or_else(|| {
                    CodegenError::internal(
                        "string literal missing its Pass 1 table entry",
                        self.program.ast.tokens[tok_idx].span.line,
                    )
                })?;
                self.emit_line(format!("ipush __STR__{k}"));
                Ok(Datatype::new(Base::Byte, 1))
            }
            other => Err(CodegenError::internal(
                format!("{} is not a literal", other.describe()),
                self.program.ast.tokens[tok_idx].span.line,
            )),
        }
    }

    fn identifier_name(&self, tok_idx: usize) -> String {
        match &self.program.ast.tokens[tok_idx].kind {
            TokenKind::Identifier(name) => name.clone(),
            other => unreachable!("ExpNode::Identifier always indexes an Identifier token, found {other:?}"),
        }
    }

    /// Searches enclosing blocks outward from the current block, then
    /// finally the current function's argument list.
    pub(super) fn find_local(&self, name: &str) -> Option<Decl> {
        let mut block = self.current_block?;
        loop {
            if let Some(decl) = self
                .program
                .ast
                .block(block)
                .locals
                .iter()
                .find(|d| d.name == name)
            {
                return Some(decl.clone());
            }
            let owner = self.program.ast.block(block).parent_node?;
            match self.program.ast.node(owner) {
                crate::ast::AstNode::Function { info, .. } => {
                    return info.args.iter().find(|d| d.name == name).cloned();
                }
                other => block = other.parent_block()?,
            }
        }
    }

    fn emit_identifier_load(&mut self, decl: &Decl, is_lhs: bool, next_is_amp: bool, last_is_deref: bool) {
        let ty = &decl.datatype;
        if ty.is_struct_value() {
            if (is_lhs && ty.ptr_level >= 1) || next_is_amp {
                self.emit_line(format!("lea {}", decl.slot));
            } else {
                self.emit_line(format!("ilload {}", decl.slot));
            }
            return;
        }
        if next_is_amp && ty.ptr_level == 0 {
            self.emit_line(format!("lea {}", decl.slot));
            return;
        }
        match ty.base {
            Base::Float if ty.ptr_level == 0 => {
                if is_lhs && !last_is_deref {
                    self.emit_line(format!("lea {}", decl.slot));
                } else {
                    self.emit_line(format!("flload {}", decl.slot));
                }
            }
            Base::Byte if ty.ptr_level == 0 => {
                if is_lhs {
                    self.emit_line(format!("lea {}", decl.slot));
                } else {
                    self.emit_line(format!("ilload {}", decl.slot));
                }
            }
            _ => {
                if is_lhs && ty.ptr_level == 0 && !last_is_deref {
                    self.emit_line(format!("lea {}", decl.slot));
                } else {
                    self.emit_line(format!("ilload {}", decl.slot));
                }
            }
        }
    }

    fn eval_funccall(
        &mut self,
        name: &str,
        callee: crate::ast::NodeId,
        args: &[ExpNode],
    ) -> Result<Datatype, CodegenError> {
        let (params, return_type, is_foreign, is_variadic, required) = match self.program.ast.node(callee) {
            crate::ast::AstNode::Function { info, .. } => (
                info.args.clone(),
                info.return_type.clone(),
                info.is_foreign,
                info.is_variadic,
                info.nargs as usize,
            ),
            _ => {
                return Err(CodegenError::internal(
                    format!("'{name}' does not name a function"),
                    0,
                ))
            }
        };

        let arg_types = if args.is_empty() {
            Vec::new()
        } else {
            let stack = self.eval_postfix_stack(args, false, false)?;
            stack
                .into_iter()
                .map(|entry| match entry {
                    StackEntry::Value(ty) => Ok(ty),
                    StackEntry::PendingField(field) => Err(CodegenError::resolve_error(
                        format!("'{field}' does not name a local variable"),
                        0,
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let argc = arg_types.len();
        if is_variadic {
            if argc < required {
                return Err(CodegenError::type_error(
                    format!("'{name}' expects at least {required} argument(s), found {argc}"),
                    0,
                ));
            }
        } else if argc != required {
            return Err(CodegenError::type_error(
                format!("'{name}' expects {required} argument(s), found {argc}"),
                0,
            ));
        }

        for (i, param) in params.iter().enumerate() {
            let actual = &arg_types[i];
            let k = argc - 1 - i;
            if param.datatype.is_int_like() && actual.is_float() {
                self.emit_line(format!("ftoi {k}"));
            } else if param.datatype.is_float() && actual.is_int_like() {
                self.emit_line(format!("itof {k}"));
            } else if !param.datatype.identical_to(actual) {
                return Err(CodegenError::type_error(
                    format!(
                        "argument {} to '{name}' has type '{}' but '{}' was expected",
                        i + 1,
                        describe_datatype(actual),
                        describe_datatype(&param.datatype),
                    ),
                    0,
                ));
            }
        }

        if is_foreign {
            self.emit_line(format!("ccall __CFUNC__{name}, {argc}"));
        } else {
            self.emit_line(format!("call __FUNC__{name}, {argc}"));
        }
        Ok(return_type)
    }

    fn eval_operator(
        &mut self,
        op: &TokenKind,
        stack: &mut Vec<StackEntry>,
        is_lhs: bool,
        last_is_deref: bool,
        is_last: bool,
        next_is_amp: bool,
    ) -> Result<(), CodegenError> {
        match op {
            TokenKind::Comma => Ok(()),
            TokenKind::Dot => self.eval_dot(stack, is_lhs, next_is_amp),
            TokenKind::Amp => self.eval_addr_of(stack),
            TokenKind::Caret => self.eval_deref(stack, is_lhs, last_is_deref, is_last),
            TokenKind::Bang => self.eval_not(stack),
            _ => self.eval_binary(op, stack),
        }
    }

    fn eval_dot(&mut self, stack: &mut Vec<StackEntry>, is_lhs: bool, next_is_amp: bool) -> Result<(), CodegenError> {
        let field_name = match stack.pop() {
            Some(StackEntry::PendingField(name)) => name,
            _ => return Err(CodegenError::internal("'.' expects a field name operand", 0)),
        };
        let parent_ty = match stack.pop() {
            Some(StackEntry::Value(ty)) => ty,
            _ => return Err(CodegenError::internal("'.' expects a struct operand", 0)),
        };
        if parent_ty.is_pointer() {
            return Err(CodegenError::type_error(
                "'.' cannot be applied to a pointer to struct (dereference with '^' first)",
                0,
            ));
        }
        let struct_name = parent_ty
            .struct_name()
            .ok_or_else(|| CodegenError::type_error("'.' requires a struct operand", 0))?
            .to_string();
        let def = self
            .program
            .structs
            .get(&struct_name)
            .ok_or_else(|| CodegenError::internal(format!("unknown struct '{struct_name}'"), 0))?;
        if !def.complete {
            return Err(CodegenError::resolve_error(
                format!("'{struct_name}' is an incomplete type"),
                0,
            ));
        }
        let field = def
            .field(&field_name)
            .ok_or_else(|| CodegenError::resolve_error(
                format!("struct '{struct_name}' has no field '{field_name}'"),
                0,
            ))?
            .clone();
        self.emit_line(format!("icinc {}", field.slot * SLOT_BYTES));
        if !field.datatype.is_struct_value() && !is_lhs && !next_is_amp {
            match field.datatype.base {
                Base::Byte if field.datatype.ptr_level == 0 => self.emit_line("cder"),
                Base::Float if field.datatype.ptr_level == 0 => self.emit_line("fder"),
                _ => self.emit_line("ider"),
            }
        }
        stack.push(StackEntry::Value(field.datatype));
        Ok(())
    }

    fn eval_addr_of(&mut self, stack: &mut Vec<StackEntry>) -> Result<(), CodegenError> {
        match stack.pop() {
            Some(StackEntry::Value(ty)) => {
                stack.push(StackEntry::Value(ty.addr_of()));
                Ok(())
            }
            _ => Err(CodegenError::type_error("'&' cannot be applied to a literal or field name", 0)),
        }
    }

    fn eval_deref(
        &mut self,
        stack: &mut Vec<StackEntry>,
        is_lhs: bool,
        last_is_deref: bool,
        is_last: bool,
    ) -> Result<(), CodegenError> {
        let ty = match stack.pop() {
            Some(StackEntry::Value(ty)) => ty,
            _ => return Err(CodegenError::internal("'^' expects a value operand", 0)),
        };
        if !ty.is_pointer() {
            return Err(CodegenError::type_error(
                format!("'^' cannot be applied to non-pointer type '{}'", describe_datatype(&ty)),
                0,
            ));
        }
        let result = ty.pointee();
        if is_lhs && is_last && last_is_deref {
            // leave the address on the operand stack for the surrounding isave/fsave
        } else if result.is_struct_value() && is_lhs {
            self.emit_line("ider");
            self.emit_line("ider");
        } else {
            match result.base {
                Base::Byte if result.ptr_level == 0 => self.emit_line("cder"),
                Base::Float if result.ptr_level == 0 => self.emit_line("fder"),
                _ => self.emit_line("ider"),
            }
        }
        stack.push(StackEntry::Value(result));
        Ok(())
    }

    fn eval_not(&mut self, stack: &mut Vec<StackEntry>) -> Result<(), CodegenError> {
        stack.pop();
        self.emit_line("lnot");
        stack.push(StackEntry::Value(Datatype::new(Base::Int, 0)));
        Ok(())
    }

    fn eval_binary(&mut self, op: &TokenKind, stack: &mut Vec<StackEntry>) -> Result<(), CodegenError> {
        if matches!(
            op,
            TokenKind::Percent | TokenKind::Pipe | TokenKind::Shl | TokenKind::Shr
        ) {
            return Err(CodegenError::type_error(
                format!("'{}' is not supported by the code generator", op.describe()),
                0,
            ));
        }

        let b = match stack.pop() {
            Some(StackEntry::Value(ty)) => ty,
            _ => return Err(CodegenError::internal("binary operator expects a value operand", 0)),
        };
        let a = match stack.pop() {
            Some(StackEntry::Value(ty)) => ty,
            _ => return Err(CodegenError::internal("binary operator expects a value operand", 0)),
        };

        if let Some(scale) = self.pointer_arith_scale(op, &a, &b) {
            self.emit_line(format!("ipush {scale}"));
            self.emit_line("imul");
        }

        let both_float = a.is_float() && b.is_float();
        if a.is_int_like() && b.is_float() {
            self.emit_line("itof 0");
        } else if a.is_float() && b.is_int_like() {
            self.emit_line("itof 1");
        } else if !both_float && !a.identical_to(&b) && !(a.is_pointer() && b.is_int_like()) && !(a.is_int_like() && b.is_pointer()) {
            return Err(CodegenError::type_error(
                format!(
                    "incompatible operand types '{}' and '{}'",
                    describe_datatype(&a),
                    describe_datatype(&b)
                ),
                0,
            ));
        }

        let prefix = if both_float { "f" } else { "i" };
        let (mnemonic, result) = match op {
            TokenKind::Plus => (format!("{prefix}add"), self.arith_result(&a, &b)),
            TokenKind::Minus => (format!("{prefix}sub"), self.arith_result(&a, &b)),
            TokenKind::Star => (format!("{prefix}mul"), self.arith_result(&a, &b)),
            TokenKind::Slash => (format!("{prefix}div"), self.arith_result(&a, &b)),
            TokenKind::Gt => (format!("{prefix}gt"), Datatype::new(Base::Int, 0)),
            TokenKind::Ge => (format!("{prefix}ge"), Datatype::new(Base::Int, 0)),
            TokenKind::Lt => (format!("{prefix}lt"), Datatype::new(Base::Int, 0)),
            TokenKind::Le => (format!("{prefix}le"), Datatype::new(Base::Int, 0)),
            TokenKind::EqEq | TokenKind::NotEq => (format!("{prefix}cmp"), Datatype::new(Base::Int, 0)),
            TokenKind::AndAnd => ("land".to_string(), Datatype::new(Base::Int, 0)),
            TokenKind::OrOr => ("lor".to_string(), Datatype::new(Base::Int, 0)),
            TokenKind::Assign => {
                return Err(CodegenError::internal(
                    "'=' is only supported as a top-level statement, not nested inside an expression",
                    0,
                ))
            }
            other => {
                return Err(CodegenError::internal(
                    format!("{} is not a binary operator", other.describe()),
                    0,
                ))
            }
        };
        self.emit_line(mnemonic);
        stack.push(StackEntry::Value(result));
        Ok(())
    }

    fn arith_result(&self, a: &Datatype, b: &Datatype) -> Datatype {
        if a.is_pointer() {
            a.clone()
        } else if b.is_pointer() {
            b.clone()
        } else if a.is_float() || b.is_float() {
            Datatype::new(Base::Float, 0)
        } else {
            Datatype::new(Base::Int, 0)
        }
    }

    /// For `+`/`-` where one operand is a pointer and the other an int,
    /// returns the byte scale factor to multiply the integer operand by
    /// before the add/sub.
    fn pointer_arith_scale(&self, op: &TokenKind, a: &Datatype, b: &Datatype) -> Option<u32> {
        if !matches!(op, TokenKind::Plus | TokenKind::Minus) {
            return None;
        }
        let pointer = if a.is_pointer() && b.is_int_like() {
            a
        } else if b.is_pointer() && a.is_int_like() {
            b
        } else {
            return None;
        };
        if matches!(pointer.base, Base::Byte) && pointer.ptr_level == 1 {
            return None;
        }
        let pointee = pointer.pointee();
        if pointee.is_struct_value() {
            let name = pointee.struct_name().expect("struct pointee always names a struct");
            let size = self.program.structs.get(name).map(|s| s.size).unwrap_or(1);
            Some(SLOT_BYTES * size)
        } else {
            Some(SLOT_BYTES)
        }
    }
}
