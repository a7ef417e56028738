//! Code generator: walks the AST and produces a flat instruction list
//! with the interrupt vector table in front.
//!
//! Data memory is handed out by a bump allocator: scalar variables get
//! one word (`long` gets two), string variables and arrays get a backing
//! buffer plus a pointer cell. Forward jumps are emitted as holes and
//! sealed once the target address is known.

mod expr;
mod runtime;
mod stmt;

use std::collections::HashMap;
use std::fmt;

use stackharv_core::isa::{Instr, NUM_VECTORS, Opcode};

use crate::parser::{Func, Program, VarType};

/// Backing buffer size for a `string` variable, in words.
const STRING_CAPACITY: u32 = 64;
/// Backing buffer size for an array, in words.
const ARRAY_CAPACITY: u32 = 128;

#[derive(Debug)]
pub enum CodegenError {
    BreakOutsideLoop,
    /// A call expression whose name (or argument shape) is not recognized.
    UnsupportedCall(String),
    /// A call statement whose name (or argument shape) is not recognized.
    UnsupportedCallStmt(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BreakOutsideLoop => write!(f, "break outside of loop"),
            Self::UnsupportedCall(name) => write!(f, "call not supported: {name}"),
            Self::UnsupportedCallStmt(name) => {
                write!(f, "call statement not supported: {name}")
            }
        }
    }
}

impl std::error::Error for CodegenError {}

/// Position of an emitted jump whose target is not yet known.
#[must_use]
pub(crate) struct JumpHole(usize);

pub struct Codegen {
    code: Vec<Instr>,
    labels: HashMap<String, usize>,
    /// Variable name to static data-memory address.
    vars: HashMap<String, u32>,
    var_types: HashMap<String, VarType>,
    data_next: u32,
    /// One list of unsealed break jumps per enclosing loop.
    break_stack: Vec<Vec<JumpHole>>,
    array_bases: HashMap<String, u32>,
    string_bases: HashMap<String, u32>,
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            labels: HashMap::new(),
            vars: HashMap::new(),
            var_types: HashMap::new(),
            data_next: 0,
            break_stack: Vec::new(),
            array_bases: HashMap::new(),
            string_bases: HashMap::new(),
        }
    }

    /// Generate the full program image: the vector table, then every
    /// function in source order with code-internal jump targets relocated
    /// past the table.
    pub fn generate(mut self, prog: &Program) -> Result<Vec<Instr>, CodegenError> {
        let mut vectors: Vec<Instr> = (0..NUM_VECTORS)
            .map(|_| Instr::new(Opcode::Jmp, 0))
            .collect();
        let base = NUM_VECTORS;

        for f in &prog.functions {
            self.gen_func(f)?;
        }

        // Account for the leading vector table in every emitted jump.
        for ins in &mut self.code {
            if matches!(ins.opcode, Opcode::Jmp | Opcode::Jz | Opcode::Call) {
                ins.arg += base as i32;
            }
        }

        // Vector 0 is the reset entry; vectors 1.. point at the irqN
        // handler of the matching number when one exists. Unused vectors
        // keep their default JMP 0, which lands back on the reset vector.
        if let Some(&main) = self.labels.get("main") {
            vectors[0].arg = (base + main) as i32;
        }
        for (n, vector) in vectors.iter_mut().enumerate().skip(1) {
            if let Some(&handler) = self.labels.get(&format!("irq{n}")) {
                vector.arg = (base + handler) as i32;
            }
        }

        vectors.append(&mut self.code);
        Ok(vectors)
    }

    fn gen_func(&mut self, f: &Func) -> Result<(), CodegenError> {
        self.labels.insert(f.name.clone(), self.here());
        for st in &f.body {
            self.gen_stmt(st)?;
        }
        if f.name == "main" {
            self.emit_op(Opcode::Halt);
        } else if irq_number(&f.name).is_some() {
            self.emit_op(Opcode::Iret);
        } else {
            self.emit_op(Opcode::Ret);
        }
        Ok(())
    }

    // ---- Emission helpers ----

    pub(crate) fn emit(&mut self, opcode: Opcode, arg: i32) {
        self.code.push(Instr::new(opcode, arg));
    }

    pub(crate) fn emit_op(&mut self, opcode: Opcode) {
        self.emit(opcode, 0);
    }

    pub(crate) fn here(&self) -> usize {
        self.code.len()
    }

    pub(crate) fn jump_hole(&mut self, opcode: Opcode) -> JumpHole {
        let pos = self.here();
        self.emit(opcode, 0);
        JumpHole(pos)
    }

    pub(crate) fn seal(&mut self, hole: JumpHole, target: usize) {
        self.code[hole.0].arg = target as i32;
    }

    // ---- Data-memory allocation ----

    /// Address of `name`, allocating it on first use. A variable whose
    /// declared type is `long` takes two words, everything else one.
    pub(crate) fn alloc_var(&mut self, name: &str) -> u32 {
        if let Some(&addr) = self.vars.get(name) {
            return addr;
        }
        let addr = self.data_next;
        self.vars.insert(name.to_string(), addr);
        let words = match self.var_types.get(name) {
            Some(VarType::Long) => 2,
            _ => 1,
        };
        self.data_next += words;
        addr
    }

    /// Record the declared type before allocating, so a `long` reserves
    /// both of its words.
    pub(crate) fn declare_var(&mut self, name: &str, vtype: VarType) -> u32 {
        self.var_types.insert(name.to_string(), vtype);
        self.alloc_var(name)
    }

    pub(crate) fn alloc_buffer(&mut self, words: u32) -> u32 {
        let base = self.data_next;
        self.data_next += words;
        base
    }

    pub(crate) fn var_type(&self, name: &str) -> Option<VarType> {
        self.var_types.get(name).copied()
    }
}

/// `irqN` handler number, when the name has that shape.
fn irq_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("irq")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
