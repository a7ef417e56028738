//! Emitted runtime sequences: decimal input, string input/output,
//! string-literal initialization and 64-bit addition.

use stackharv_core::isa::{Opcode, PORT_CH, PORT_L};

use super::{ARRAY_CAPACITY, Codegen};

impl Codegen {
    /// Decimal input: read characters from the CH port, accumulating
    /// digits into a temporary until newline, then leave the value on the
    /// stack.
    pub(crate) fn gen_read_int(&mut self) {
        let tmp = self.alloc_var("__tmp__");
        let ch = self.alloc_var("__ch__");
        // tmp = 0
        self.emit(Opcode::Pushi, 0);
        self.emit(Opcode::Pushi, tmp as i32);
        self.emit_op(Opcode::Store);
        let loop_start = self.here();
        // ch = IN CH
        self.emit(Opcode::In, PORT_CH as i32);
        self.emit(Opcode::Pushi, ch as i32);
        self.emit_op(Opcode::Store);
        // newline ends the number
        self.emit(Opcode::Pushi, ch as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, i32::from(b'\n'));
        self.emit_op(Opcode::Sub);
        let done = self.jump_hole(Opcode::Jz);
        // tmp = tmp * 10 + (ch - '0')
        self.emit(Opcode::Pushi, tmp as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, 10);
        self.emit_op(Opcode::Mul);
        self.emit(Opcode::Pushi, ch as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, i32::from(b'0'));
        self.emit_op(Opcode::Sub);
        self.emit_op(Opcode::Add);
        self.emit(Opcode::Pushi, tmp as i32);
        self.emit_op(Opcode::Store);
        self.emit(Opcode::Jmp, loop_start as i32);
        let end = self.here();
        self.seal(done, end);
        // result
        self.emit(Opcode::Pushi, tmp as i32);
        self.emit_op(Opcode::Load);
    }

    /// Character input into a string variable's buffer until newline,
    /// then a terminating 0.
    pub(crate) fn gen_read_string(&mut self, name: &str) {
        let base = self.alloc_var(name);
        let ptr = self.alloc_var("__ptr__");
        // ptr = *base (string variables hold a pointer to their buffer)
        self.emit(Opcode::Pushi, base as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Store);
        let loop_start = self.here();
        self.emit(Opcode::In, PORT_CH as i32);
        self.emit_op(Opcode::Dup);
        self.emit(Opcode::Pushi, i32::from(b'\n'));
        self.emit_op(Opcode::Sub);
        let done = self.jump_hole(Opcode::Jz);
        // *ptr = ch
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Load);
        self.emit_op(Opcode::Store);
        // ptr = ptr + 1
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, 1);
        self.emit_op(Opcode::Add);
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Store);
        self.emit(Opcode::Jmp, loop_start as i32);
        let end = self.here();
        self.seal(done, end);
        // terminating 0
        self.emit(Opcode::Pushi, 0);
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Load);
        self.emit_op(Opcode::Store);
    }

    /// Two reads from the L port into the low then high word.
    pub(crate) fn gen_read_long(&mut self, base: u32) {
        self.emit(Opcode::In, PORT_L as i32);
        self.emit(Opcode::Pushi, base as i32);
        self.emit_op(Opcode::Store);
        self.emit(Opcode::In, PORT_L as i32);
        self.emit(Opcode::Pushi, (base + 1) as i32);
        self.emit_op(Opcode::Store);
    }

    /// 64-bit `dst = a + b`. Operands are reloaded from memory for each
    /// partial sum. Carry out of the low words holds exactly when the
    /// addition wrapped, detected as `lo_sum <= a_lo - 1` with the
    /// unsigned LE.
    pub(crate) fn gen_long_add(&mut self, base: u32, a: &str, b: &str) {
        let tmp_lo = self.alloc_var("__tmp_lo__");
        let tmp_hi = self.alloc_var("__tmp_hi__");
        let a_addr = self.alloc_var(a);
        let b_addr = self.alloc_var(b);
        // tmp_lo = a_lo + b_lo
        self.emit(Opcode::Pushi, a_addr as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, b_addr as i32);
        self.emit_op(Opcode::Load);
        self.emit_op(Opcode::Add);
        self.emit(Opcode::Pushi, tmp_lo as i32);
        self.emit_op(Opcode::Store);
        // carry = tmp_lo <= a_lo - 1
        self.emit(Opcode::Pushi, tmp_lo as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, a_addr as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, 1);
        self.emit_op(Opcode::Sub);
        self.emit_op(Opcode::Le);
        // tmp_hi = a_hi + b_hi
        self.emit(Opcode::Pushi, (a_addr + 1) as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, (b_addr + 1) as i32);
        self.emit_op(Opcode::Load);
        self.emit_op(Opcode::Add);
        self.emit(Opcode::Pushi, tmp_hi as i32);
        self.emit_op(Opcode::Store);
        // carry propagates into the high word
        let no_carry = self.jump_hole(Opcode::Jz);
        self.emit(Opcode::Pushi, tmp_hi as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, 1);
        self.emit_op(Opcode::Add);
        self.emit(Opcode::Pushi, tmp_hi as i32);
        self.emit_op(Opcode::Store);
        let done = self.jump_hole(Opcode::Jmp);
        let end = self.here();
        self.seal(no_carry, end);
        self.seal(done, end);
        // dst = (tmp_lo, tmp_hi)
        self.emit(Opcode::Pushi, tmp_lo as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, base as i32);
        self.emit_op(Opcode::Store);
        self.emit(Opcode::Pushi, tmp_hi as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, (base + 1) as i32);
        self.emit_op(Opcode::Store);
    }

    /// Allocate and runtime-initialize a C-string literal once, leaving a
    /// pointer cell that later prints reuse. Returns the pointer cell's
    /// address.
    pub(crate) fn ensure_cstr_literal(&mut self, text: &str) -> u32 {
        if let Some(&addr) = self.string_bases.get(text) {
            return addr;
        }
        let base = self.alloc_buffer(text.len() as u32 + 1);
        for (i, byte) in text.bytes().enumerate() {
            self.emit(Opcode::Pushi, i32::from(byte));
            self.emit(Opcode::Pushi, (base + i as u32) as i32);
            self.emit_op(Opcode::Store);
        }
        self.emit(Opcode::Pushi, 0);
        self.emit(Opcode::Pushi, (base + text.len() as u32) as i32);
        self.emit_op(Opcode::Store);
        let var_name = format!("__strlit_{}", self.string_bases.len());
        let var_addr = self.alloc_var(&var_name);
        self.emit(Opcode::Pushi, base as i32);
        self.emit(Opcode::Pushi, var_addr as i32);
        self.emit_op(Opcode::Store);
        self.string_bases.insert(text.to_string(), var_addr);
        var_addr
    }

    /// Print the C-string whose buffer pointer lives in `var_addr`:
    /// load a character through an advancing pointer, stop on 0.
    pub(crate) fn emit_print_cstr(&mut self, var_addr: u32) {
        let ptr = self.alloc_var("__ptr__");
        self.emit(Opcode::Pushi, var_addr as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Store);
        let loop_start = self.here();
        // ch = **ptr
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Load);
        self.emit_op(Opcode::Load);
        self.emit_op(Opcode::Dup);
        let done = self.jump_hole(Opcode::Jz);
        self.emit(Opcode::Out, PORT_CH as i32);
        // ptr = ptr + 1
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Load);
        self.emit(Opcode::Pushi, 1);
        self.emit_op(Opcode::Add);
        self.emit(Opcode::Pushi, ptr as i32);
        self.emit_op(Opcode::Store);
        self.emit(Opcode::Jmp, loop_start as i32);
        let end = self.here();
        self.seal(done, end);
    }

    /// Allocate an array's backing buffer on first use and emit the code
    /// storing its base into the variable cell.
    pub(crate) fn ensure_array_initialized(&mut self, name: &str) {
        if self.array_bases.contains_key(name) {
            return;
        }
        let base = self.alloc_buffer(ARRAY_CAPACITY);
        self.array_bases.insert(name.to_string(), base);
        let var_addr = self.alloc_var(name);
        self.emit(Opcode::Pushi, base as i32);
        self.emit(Opcode::Pushi, var_addr as i32);
        self.emit_op(Opcode::Store);
    }
}
