//! Statement lowering.

use stackharv_core::isa::{Opcode, PORT_CH, PORT_D, PORT_L};

use super::{Codegen, CodegenError, STRING_CAPACITY};
use crate::parser::{BinOpKind, Expr, Stmt, VarType};

impl Codegen {
    pub(crate) fn gen_stmt(&mut self, s: &Stmt) -> Result<(), CodegenError> {
        match s {
            Stmt::Break => {
                if self.break_stack.is_empty() {
                    return Err(CodegenError::BreakOutsideLoop);
                }
                let hole = self.jump_hole(Opcode::Jmp);
                let level = self.break_stack.len() - 1;
                self.break_stack[level].push(hole);
                Ok(())
            }
            Stmt::VarDecl { vtype, name } => {
                self.declare_var(name, *vtype);
                if *vtype == VarType::String {
                    // a string variable is a pointer to its own buffer
                    let base = self.alloc_buffer(STRING_CAPACITY);
                    let var_addr = self.alloc_var(name);
                    self.emit(Opcode::Pushi, base as i32);
                    self.emit(Opcode::Pushi, var_addr as i32);
                    self.emit_op(Opcode::Store);
                }
                Ok(())
            }
            Stmt::Assign { name, expr } => self.gen_assign(name, expr),
            Stmt::While { cond, body } => {
                let start = self.here();
                self.gen_expr(cond)?;
                let exit = self.jump_hole(Opcode::Jz);
                self.break_stack.push(Vec::new());
                let result = body.iter().try_for_each(|st| self.gen_stmt(st));
                let breaks = self.break_stack.pop().unwrap_or_default();
                result?;
                self.emit(Opcode::Jmp, start as i32);
                let end = self.here();
                self.seal(exit, end);
                for hole in breaks {
                    self.seal(hole, end);
                }
                Ok(())
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                self.gen_expr(cond)?;
                let to_else = self.jump_hole(Opcode::Jz);
                for st in then_body {
                    self.gen_stmt(st)?;
                }
                match else_body {
                    Some(else_body) => {
                        let to_end = self.jump_hole(Opcode::Jmp);
                        let else_start = self.here();
                        self.seal(to_else, else_start);
                        for st in else_body {
                            self.gen_stmt(st)?;
                        }
                        let end = self.here();
                        self.seal(to_end, end);
                    }
                    None => {
                        let end = self.here();
                        self.seal(to_else, end);
                    }
                }
                Ok(())
            }
            Stmt::Call { name, args } => self.gen_call_stmt(name, args),
            Stmt::PrintInt(e) => {
                self.gen_expr(e)?;
                self.emit(Opcode::Out, PORT_D as i32);
                self.emit(Opcode::Pushi, i32::from(b'\n'));
                self.emit(Opcode::Out, PORT_CH as i32);
                Ok(())
            }
            Stmt::PrintStr(text) => {
                let var_addr = self.ensure_cstr_literal(text);
                self.emit_print_cstr(var_addr);
                Ok(())
            }
            Stmt::PrintChar(e) => {
                // printing a string variable prints the whole C-string
                if let Expr::Var(name) = e {
                    if self.var_type(name) == Some(VarType::String) {
                        let addr = self.alloc_var(name);
                        self.emit_print_cstr(addr);
                        return Ok(());
                    }
                }
                self.gen_expr(e)?;
                self.emit(Opcode::Out, PORT_CH as i32);
                Ok(())
            }
        }
    }

    fn gen_assign(&mut self, name: &str, expr: &Expr) -> Result<(), CodegenError> {
        if let Expr::Call { name: cname, args } = expr {
            if cname == "readString" && args.is_empty() {
                self.gen_read_string(name);
                return Ok(());
            }
        }
        if self.var_type(name) == Some(VarType::Long) {
            let base = self.alloc_var(name);
            if let Expr::Call { name: cname, args } = expr {
                if cname == "readLong" && args.is_empty() {
                    self.gen_read_long(base);
                    return Ok(());
                }
            }
            if let Expr::BinOp {
                op: BinOpKind::Add,
                a,
                b,
            } = expr
            {
                if let (Expr::Var(a_name), Expr::Var(b_name)) = (a.as_ref(), b.as_ref()) {
                    self.gen_long_add(base, a_name, b_name);
                    return Ok(());
                }
            }
            // fallback: low word from the expression, high word zero
            self.gen_expr(expr)?;
            self.emit(Opcode::Pushi, base as i32);
            self.emit_op(Opcode::Store);
            self.emit(Opcode::Pushi, 0);
            self.emit(Opcode::Pushi, (base + 1) as i32);
            self.emit_op(Opcode::Store);
            return Ok(());
        }
        self.gen_expr(expr)?;
        let addr = self.alloc_var(name);
        self.emit(Opcode::Pushi, addr as i32);
        self.emit_op(Opcode::Store);
        Ok(())
    }

    fn gen_call_stmt(&mut self, name: &str, args: &[Expr]) -> Result<(), CodegenError> {
        match (name, args) {
            ("ei", []) => {
                self.emit_op(Opcode::Ei);
                Ok(())
            }
            ("di", []) => {
                self.emit_op(Opcode::Di);
                Ok(())
            }
            ("printChar", [e]) => {
                self.gen_expr(e)?;
                self.emit(Opcode::Out, PORT_CH as i32);
                Ok(())
            }
            ("readChar", []) => {
                self.emit(Opcode::In, PORT_CH as i32);
                Ok(())
            }
            ("printLong", [Expr::Var(v)]) => {
                let base = self.alloc_var(v);
                self.emit(Opcode::Pushi, base as i32);
                self.emit_op(Opcode::Load);
                self.emit(Opcode::Out, PORT_L as i32);
                self.emit(Opcode::Pushi, (base + 1) as i32);
                self.emit_op(Opcode::Load);
                self.emit(Opcode::Out, PORT_L as i32);
                Ok(())
            }
            ("set", [Expr::Var(arr), idx, value]) => {
                self.ensure_array_initialized(arr);
                let base_addr = self.alloc_var(arr);
                // value first: STORE pops the address, then the value
                self.gen_expr(value)?;
                self.emit(Opcode::Pushi, base_addr as i32);
                self.emit_op(Opcode::Load);
                self.gen_expr(idx)?;
                self.emit_op(Opcode::Add);
                self.emit_op(Opcode::Store);
                Ok(())
            }
            _ => Err(CodegenError::UnsupportedCallStmt(name.to_string())),
        }
    }
}
