use super::Cpu;
use crate::datapath::PushSource;

impl Cpu {
    // ---- Stack instructions, one EXEC step each ----

    pub(crate) fn op_nop(&mut self) {
        self.finish_instr();
    }

    /// PUSHI: push the sign-extended 24-bit immediate.
    pub(crate) fn op_pushi(&mut self, arg: i32) {
        self.dp.latch_push(PushSource::Lit(arg as u32));
        self.finish_instr();
    }

    pub(crate) fn op_dup(&mut self) {
        let t = self.dp.t;
        self.dp.push(t);
        self.finish_instr();
    }

    pub(crate) fn op_drop(&mut self) {
        self.dp.pop();
        self.finish_instr();
    }

    pub(crate) fn op_swap(&mut self) {
        let a = self.dp.pop();
        let b = self.dp.pop();
        self.dp.push(a);
        self.dp.push(b);
        self.finish_instr();
    }
}
