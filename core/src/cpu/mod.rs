//! Control unit: a three-phase micro-sequencer over the datapath and the
//! port controller. Every call to [`Cpu::step_tick`] executes exactly one
//! phase-step and advances the tick counter by one.

mod alu;
mod branch;
mod io;
mod memory;
mod stack;

use crate::datapath::Datapath;
use crate::io::IoController;
use crate::isa::{Instr, Opcode};

/// Coarse control-unit state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    FetchIr,
    LatchPc,
    Exec,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::FetchIr => "FETCH_IR",
            Phase::LatchPc => "LATCH_PC",
            Phase::Exec => "EXEC",
        }
    }
}

pub struct Cpu {
    /// Instruction memory, immutable after load.
    pub imem: Vec<Instr>,
    pub dp: Datapath,
    pub io: IoController,
    /// Return stack for CALL/RET/IRET.
    pub rs: Vec<usize>,
    pub pc: usize,
    /// Current instruction latch.
    pub ir: Instr,
    pub tick: u64,
    pub tick_limit: u64,
    pub int_enabled: bool,
    pub in_isr: bool,
    pub phase: Phase,
    /// Sub-step counter within [`Phase::Exec`].
    pub step: u8,
    halted: bool,
    pub(crate) tmp_addr: u32,
    pub(crate) tmp_val: u32,
}

impl Cpu {
    pub fn new(imem: Vec<Instr>, data_words: usize, io: IoController, tick_limit: u64) -> Self {
        Self {
            imem,
            dp: Datapath::new(data_words),
            io,
            rs: Vec::new(),
            pc: 0,
            ir: Instr::op(Opcode::Nop),
            tick: 0,
            tick_limit,
            int_enabled: true,
            in_isr: false,
            phase: Phase::FetchIr,
            step: 0,
            halted: false,
            tmp_addr: 0,
            tmp_val: 0,
        }
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Vectored dispatch: the latched port number is the vector index, so
    /// the handler entry is reached by setting `pc` to the port directly.
    fn maybe_take_irq(&mut self) -> bool {
        if !self.int_enabled || self.in_isr {
            return false;
        }
        let Some(vector) = self.io.irq_pending() else {
            return false;
        };
        self.rs.push(self.pc);
        self.pc = vector as usize;
        self.in_isr = true;
        self.io.ack_irq();
        true
    }

    /// One phase-step: deliver scheduled input, then run either the IRQ
    /// dispatch, an instruction fetch, the PC latch, or one EXEC step.
    pub fn step_tick(&mut self) {
        if self.halted {
            return;
        }
        self.dp.tick_begin();
        self.io.on_tick(self.tick);

        match self.phase {
            Phase::FetchIr => {
                if self.maybe_take_irq() {
                    self.tick += 1;
                    return;
                }
                self.ir = self.imem[self.pc];
                self.phase = Phase::LatchPc;
                self.tick += 1;
            }
            Phase::LatchPc => {
                self.pc += 1;
                self.phase = Phase::Exec;
                self.step = 0;
                self.tick += 1;
            }
            Phase::Exec => self.exec_step(),
        }
    }

    fn exec_step(&mut self) {
        let ir = self.ir;
        let step = self.step;
        match ir.opcode {
            Opcode::Nop => self.op_nop(),
            Opcode::Pushi => self.op_pushi(ir.arg),
            Opcode::Dup => self.op_dup(),
            Opcode::Drop => self.op_drop(),
            Opcode::Swap => self.op_swap(),
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Le => {
                self.op_alu(ir.opcode, step)
            }
            Opcode::Load => self.op_load(step),
            Opcode::Store => self.op_store(step),
            Opcode::Jmp => self.op_jmp(ir.arg),
            Opcode::Jz => self.op_jz(ir.arg),
            Opcode::Call => self.op_call(ir.arg),
            Opcode::Ret => self.op_ret(),
            Opcode::Iret => self.op_iret(),
            Opcode::Ei => self.op_ei(),
            Opcode::Di => self.op_di(),
            Opcode::In => self.op_in(ir.arg, step),
            Opcode::Out => self.op_out(ir.arg, step),
            Opcode::Halt => self.op_halt(),
        }
    }

    /// Advance to the next EXEC step of the current instruction.
    pub(crate) fn next_step(&mut self) {
        self.step += 1;
        self.tick += 1;
    }

    /// Last step of an instruction: back to fetch.
    pub(crate) fn finish_instr(&mut self) {
        self.phase = Phase::FetchIr;
        self.step = 0;
        self.tick += 1;
    }

    pub(crate) fn halt(&mut self) {
        self.halted = true;
        self.tick += 1;
    }
}
