use super::Cpu;
use crate::datapath::PushSource;

impl Cpu {
    /// IN - 2 steps. Latch one value from the port's input queue into the
    /// I/O register, then push it.
    pub(crate) fn op_in(&mut self, arg: i32, step: u8) {
        match step {
            0 => {
                self.dp.io_read(&mut self.io, arg as u32);
                self.next_step();
            }
            _ => {
                self.dp.latch_push(PushSource::Io);
                self.finish_instr();
            }
        }
    }

    /// OUT - 2 steps. Pop the value into the I/O register, then commit it
    /// to the port's output queue.
    pub(crate) fn op_out(&mut self, arg: i32, step: u8) {
        match step {
            0 => {
                let v = self.dp.pop();
                self.dp.io_write_prepare(v);
                self.next_step();
            }
            _ => {
                self.dp.io_write_commit(&mut self.io, arg as u32);
                self.finish_instr();
            }
        }
    }
}
