mod arith;
mod bit;
mod branch;
mod mov;
mod shift;
mod system;

use super::Cpu;
use crate::bus::Bus;
use crate::error::Result;
use crate::instruction::{Instruction, Op};

impl Cpu {
    /// Execute a decoded instruction.
    ///
    /// PC is advanced past the instruction before the handler runs, so
    /// handlers see the return address in `regs.pc` and branches simply
    /// overwrite it. Internal cycles are charged after the handler.
    pub fn execute<B: Bus + ?Sized>(&mut self, bus: &mut B, insn: &Instruction) -> Result<()> {
        self.regs.pc = insn.next_pc();
        match insn.op {
            Op::Nop => {}
            Op::Sleep => self.exec_sleep(),
            Op::Mov { size, src, dst } => self.exec_mov(bus, size, src, dst)?,
            Op::Alu { op, size, src, dst } => self.exec_alu(bus, op, size, src, dst)?,
            Op::Adds { amount, dst } => {
                let value = self.regs.read_long(dst).wrapping_add(amount as u32);
                self.regs.write_long(dst, value);
            }
            Op::Subs { amount, dst } => {
                let value = self.regs.read_long(dst).wrapping_sub(amount as u32);
                self.regs.write_long(dst, value);
            }
            Op::Inc { size, amount, dst } => self.exec_step(size, amount, dst, true),
            Op::Dec { size, amount, dst } => self.exec_step(size, amount, dst, false),
            Op::Unary { op, size, dst } => self.exec_unary(op, size, dst),
            Op::Daa(reg) => self.exec_daa(reg),
            Op::Das(reg) => self.exec_das(reg),
            Op::MulDiv { op, size, src, dst } => self.exec_muldiv(op, size, src, dst),
            Op::Shift {
                op,
                size,
                count,
                dst,
            } => self.exec_shift(op, size, count, dst),
            Op::Bit { op, bit, target } => self.exec_bit(bus, op, bit, target)?,
            Op::Bcc { cond, target, .. } => {
                if self.condition(cond) {
                    self.set_pc(target);
                }
            }
            Op::Bsr { target, .. } => self.exec_call(bus, target)?,
            Op::Jmp(target) => {
                let target = self.jump_address(bus, target)?;
                self.set_pc(target);
            }
            Op::Jsr(target) => {
                let target = self.jump_address(bus, target)?;
                self.exec_call(bus, target)?;
            }
            Op::Rts => self.exec_rts(bus)?,
            Op::Rte => self.exec_rte(bus)?,
            Op::Trapa(n) => self.exec_trapa(bus, n)?,
            Op::Ldc { src, dst } => self.exec_ldc(bus, src, dst)?,
            Op::Stc { src, dst } => self.exec_stc(bus, src, dst)?,
            Op::ControlLogic { op, imm, dst } => self.exec_control_logic(op, imm, dst),
            Op::Ldm { last, count } => self.exec_ldm(bus, last, count)?,
            Op::Stm { first, count } => self.exec_stm(bus, first, count)?,
            Op::Tas(reg) => self.exec_tas(bus, reg)?,
            Op::Eepmov(size) => self.exec_eepmov(bus, size)?,
        }
        self.clock_internal(insn.op.internal_cycles());
        Ok(())
    }
}
