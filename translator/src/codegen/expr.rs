//! Expression lowering. Every expression leaves exactly one value on the
//! operand stack.

use stackharv_core::isa::{Opcode, PORT_CH};

use super::{Codegen, CodegenError};
use crate::parser::{BinOpKind, Expr};

impl Codegen {
    pub(crate) fn gen_expr(&mut self, e: &Expr) -> Result<(), CodegenError> {
        match e {
            Expr::IntLit(v) => {
                self.emit(Opcode::Pushi, (*v & 0x00FF_FFFF) as i32);
                Ok(())
            }
            Expr::Var(name) => {
                let addr = self.alloc_var(name);
                self.emit(Opcode::Pushi, addr as i32);
                self.emit_op(Opcode::Load);
                Ok(())
            }
            Expr::Call { name, args } => self.gen_call_expr(name, args),
            Expr::BinOp { op, a, b } => self.gen_binop(*op, a, b),
        }
    }

    fn gen_binop(&mut self, op: BinOpKind, a: &Expr, b: &Expr) -> Result<(), CodegenError> {
        self.gen_expr(a)?;
        self.gen_expr(b)?;
        match op {
            BinOpKind::Add => self.emit_op(Opcode::Add),
            BinOpKind::Sub => self.emit_op(Opcode::Sub),
            BinOpKind::Mul => self.emit_op(Opcode::Mul),
            BinOpKind::Le => self.emit_op(Opcode::Le),
            BinOpKind::Eq => {
                // a == b becomes (a - b) with a branch materializing 1/0
                self.emit_op(Opcode::Sub);
                let to_true = self.jump_hole(Opcode::Jz);
                self.emit(Opcode::Pushi, 0);
                let to_end = self.jump_hole(Opcode::Jmp);
                let true_path = self.here();
                self.seal(to_true, true_path);
                self.emit(Opcode::Pushi, 1);
                let end = self.here();
                self.seal(to_end, end);
            }
        }
        Ok(())
    }

    fn gen_call_expr(&mut self, name: &str, args: &[Expr]) -> Result<(), CodegenError> {
        match (name, args) {
            ("readInt", []) => {
                self.gen_read_int();
                Ok(())
            }
            ("readChar", []) => {
                self.emit(Opcode::In, PORT_CH as i32);
                Ok(())
            }
            ("get", [Expr::Var(arr), idx]) => {
                self.ensure_array_initialized(arr);
                let base_addr = self.alloc_var(arr);
                // element address is (*base) + idx
                self.emit(Opcode::Pushi, base_addr as i32);
                self.emit_op(Opcode::Load);
                self.gen_expr(idx)?;
                self.emit_op(Opcode::Add);
                self.emit_op(Opcode::Load);
                Ok(())
            }
            _ => Err(CodegenError::UnsupportedCall(name.to_string())),
        }
    }
}
