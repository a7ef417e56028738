//! Run loop: drives the control unit until HALT or the tick limit and
//! optionally emits a per-tick trace.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::cpu::Cpu;
use crate::io::{IoController, IoEvent};
use crate::isa::Instr;

/// Drive a loaded machine and return the output-queue snapshot. When a
/// trace writer is given, one line of pre-step machine state is written
/// for every executed tick (the first line is always tick 0).
pub fn run_machine(
    code: Vec<Instr>,
    schedule: &[IoEvent],
    data_words: usize,
    tick_limit: u64,
    mut trace: Option<&mut dyn Write>,
) -> io::Result<BTreeMap<u32, Vec<u32>>> {
    let io = IoController::new(schedule);
    let mut cpu = Cpu::new(code, data_words, io, tick_limit);
    while cpu.tick < cpu.tick_limit && !cpu.halted() {
        if let Some(w) = trace.as_deref_mut() {
            writeln!(w, "{}", trace_line(&cpu))?;
        }
        cpu.step_tick();
    }
    Ok(cpu.io.out_dump())
}

/// Single trace line for the machine state at the start of a tick.
pub fn trace_line(cpu: &Cpu) -> String {
    format!(
        "t={} pc={} phase={} T={} S={} AR={} zero={} sign={} in_isr={}",
        cpu.tick,
        cpu.pc,
        cpu.phase.as_str(),
        cpu.dp.t,
        cpu.dp.s,
        cpu.dp.ar,
        cpu.dp.zero as u8,
        cpu.dp.sign as u8,
        cpu.in_isr as u8,
    )
}
