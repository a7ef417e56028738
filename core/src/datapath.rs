//! Datapath: operand stack, address register, single-port data memory,
//! ALU and the I/O latch register.

use crate::io::IoController;
use crate::isa::Opcode;

/// Which access the single-port data memory served this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MemAccess {
    Read,
    Write,
}

/// Source feeding the top-of-stack on a latched push.
#[derive(Copy, Clone, Debug)]
pub enum PushSource {
    /// Immediate value from the instruction word.
    Lit(u32),
    /// The last memory-read latch.
    Mem,
    /// The ALU result latch.
    Alu,
    /// The I/O register.
    Io,
}

pub struct Datapath {
    mem: Vec<u32>,
    pub stack: Vec<u32>,
    /// Mirror of the top of stack.
    pub t: u32,
    /// Mirror of the second of stack.
    pub s: u32,
    /// Address register indexing data memory.
    pub ar: u32,
    /// Latch between the datapath and a port.
    pub io_reg: u32,
    pub zero: bool,
    pub sign: bool,
    last_mem_read: u32,
    last_alu: u32,
    mem_access: Option<MemAccess>,
}

impl Datapath {
    pub fn new(data_words: usize) -> Self {
        Self {
            mem: vec![0; data_words.max(1)],
            stack: Vec::new(),
            t: 0,
            s: 0,
            ar: 0,
            io_reg: 0,
            zero: true,
            sign: false,
            last_mem_read: 0,
            last_alu: 0,
            mem_access: None,
        }
    }

    /// Re-arm the single-port memory for a new tick.
    pub fn tick_begin(&mut self) {
        self.mem_access = None;
    }

    fn refresh_ts(&mut self) {
        self.t = self.stack.last().copied().unwrap_or(0);
        self.s = if self.stack.len() >= 2 {
            self.stack[self.stack.len() - 2]
        } else {
            0
        };
        self.zero = self.t == 0;
        self.sign = self.t & 0x8000_0000 != 0;
    }

    pub fn push(&mut self, value: u32) {
        self.stack.push(value);
        self.refresh_ts();
    }

    /// Pop the top of stack; an empty stack yields 0.
    pub fn pop(&mut self) -> u32 {
        let v = self.stack.pop().unwrap_or(0);
        self.refresh_ts();
        v
    }

    pub fn latch_push(&mut self, source: PushSource) {
        let v = match source {
            PushSource::Lit(v) => v,
            PushSource::Mem => self.last_mem_read,
            PushSource::Alu => self.last_alu,
            PushSource::Io => self.io_reg,
        };
        self.push(v);
    }

    pub fn latch_ar_from_t(&mut self) {
        self.ar = self.t;
    }

    pub fn latch_ar(&mut self, addr: u32) {
        self.ar = addr;
    }

    fn index_ar(&mut self) -> usize {
        let idx = self.ar as usize;
        if idx >= self.mem.len() {
            self.mem.resize(idx + 1, 0);
        }
        idx
    }

    /// Read `mem[ar]` into the memory latch. At most one memory access
    /// per tick; a second access is an invariant violation.
    pub fn mem_read(&mut self) {
        assert!(
            self.mem_access.is_none(),
            "second data-memory access in one tick"
        );
        let idx = self.index_ar();
        self.last_mem_read = self.mem[idx];
        self.mem_access = Some(MemAccess::Read);
    }

    /// Write `value` to `mem[ar]`, extending the memory with zeros when
    /// `ar` is past the end.
    pub fn mem_write(&mut self, value: u32) {
        assert!(
            self.mem_access.is_none(),
            "second data-memory access in one tick"
        );
        let idx = self.index_ar();
        self.mem[idx] = value;
        self.mem_access = Some(MemAccess::Write);
    }

    pub fn io_read(&mut self, io: &mut IoController, port: u32) {
        self.io_reg = io.read_port(port);
    }

    pub fn io_write_prepare(&mut self, value: u32) {
        self.io_reg = value;
    }

    pub fn io_write_commit(&self, io: &mut IoController, port: u32) {
        io.write_port(port, self.io_reg);
    }

    /// Compute `S op T` into the ALU latch and refresh the flags from the
    /// result. Division by zero yields 0; `LE` compares unsigned.
    pub fn alu_compute(&mut self, op: Opcode) {
        let a = self.s;
        let b = self.t;
        let r = match op {
            Opcode::Add => a.wrapping_add(b),
            Opcode::Sub => a.wrapping_sub(b),
            Opcode::Mul => a.wrapping_mul(b),
            Opcode::Div => {
                if b == 0 {
                    0
                } else {
                    a / b
                }
            }
            Opcode::Le => (a <= b) as u32,
            _ => unreachable!("not an ALU opcode: {op:?}"),
        };
        self.last_alu = r;
        self.zero = r == 0;
        self.sign = r & 0x8000_0000 != 0;
    }
}
