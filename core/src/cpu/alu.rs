use super::Cpu;
use crate::datapath::PushSource;
use crate::isa::Opcode;

impl Cpu {
    /// ADD/SUB/MUL/DIV/LE - 3 steps. Compute on (S, T) first, then pop
    /// both operands, then push the ALU latch.
    pub(crate) fn op_alu(&mut self, op: Opcode, step: u8) {
        match step {
            0 => {
                self.dp.alu_compute(op);
                self.next_step();
            }
            1 => {
                self.dp.pop();
                self.next_step();
            }
            _ => {
                self.dp.pop();
                self.dp.latch_push(PushSource::Alu);
                self.finish_instr();
            }
        }
    }
}
