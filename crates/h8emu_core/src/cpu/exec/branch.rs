use crate::bus::Bus;
use crate::cpu::{Ccr, Cpu, TRAP_VECTOR_BASE};
use crate::error::Result;
use crate::instruction::{Cond, JumpTarget};
use crate::memory::ADDRESS_MASK;

impl Cpu {
    /// Evaluate a branch condition against CCR.
    pub(crate) fn condition(&self, cond: Cond) -> bool {
        let c = self.regs.flag(Ccr::C);
        let v = self.regs.flag(Ccr::V);
        let z = self.regs.flag(Ccr::Z);
        let n = self.regs.flag(Ccr::N);
        match cond {
            Cond::Always => true,
            Cond::Never => false,
            Cond::Hi => !(c || z),
            Cond::Ls => c || z,
            Cond::Cc => !c,
            Cond::Cs => c,
            Cond::Ne => !z,
            Cond::Eq => z,
            Cond::Vc => !v,
            Cond::Vs => v,
            Cond::Pl => !n,
            Cond::Mi => n,
            Cond::Ge => n == v,
            Cond::Lt => n != v,
            Cond::Gt => !z && n == v,
            Cond::Le => z || n != v,
        }
    }

    pub(super) fn jump_address<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        target: JumpTarget,
    ) -> Result<u32> {
        match target {
            JumpTarget::Reg(r) => Ok(self.regs.read_long(r) & ADDRESS_MASK),
            JumpTarget::Abs(addr) => Ok(addr),
            JumpTarget::MemIndirect(aa) => self.read32(bus, aa as u32 & !1),
        }
    }

    /// BSR/JSR: push the return address and jump.
    pub(super) fn exec_call<B: Bus + ?Sized>(&mut self, bus: &mut B, target: u32) -> Result<()> {
        let ret = self.regs.pc;
        self.push32(bus, ret)?;
        self.set_pc(target);
        self.enter_call();
        Ok(())
    }

    pub(super) fn exec_rts<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        let ret = self.pop32(bus)?;
        self.set_pc(ret);
        self.leave_call();
        Ok(())
    }

    /// RTE: pop `PC | CCR << 24` as pushed by exception entry.
    pub(super) fn exec_rte<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        let frame = self.pop32(bus)?;
        self.regs.ccr = Ccr::from_bits_retain((frame >> 24) as u8);
        self.set_pc(frame);
        self.leave_call();
        Ok(())
    }

    /// TRAPA #n: enter the trap vector regardless of the interrupt mask.
    pub(super) fn exec_trapa<B: Bus + ?Sized>(&mut self, bus: &mut B, n: u8) -> Result<()> {
        log::debug!("TRAPA #{} at PC=0x{:06X}", n, self.regs.pc);
        self.push_pc_ccr(bus)?;
        let user_enable = self.user_enable(bus)?;
        self.mask_interrupts(user_enable);
        self.jump_through(bus, TRAP_VECTOR_BASE + 4 * n as u32)?;
        self.enter_call();
        Ok(())
    }
}
