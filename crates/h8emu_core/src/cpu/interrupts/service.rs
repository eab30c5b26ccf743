use super::super::{Ccr, Cpu, INTERRUPT_ENTRY_CYCLES};
use crate::bus::Bus;
use crate::error::Result;

impl Cpu {
    /// Enter the highest-priority pending interrupt if the mask allows it.
    ///
    /// The lowest-numbered pending interrupt wins. Its bit is cleared before
    /// the vector is fetched. Returns whether an interrupt was entered.
    pub(in crate::cpu) fn service_interrupt<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
    ) -> Result<bool> {
        if self.pending == 0 || self.regs.ccr.contains(Ccr::I) {
            return Ok(false);
        }

        let user_enable = self.user_enable(bus)?;
        let which = self.pending.trailing_zeros();
        self.pending &= !(1 << which);
        self.sleeping = false;

        log::debug!(
            "Interrupt {}: PC=0x{:06X} CCR=0x{:02X} pending=0x{:016X}",
            which,
            self.regs.pc,
            self.regs.ccr.bits(),
            self.pending
        );

        self.push_pc_ccr(bus)?;
        self.clock_internal(INTERRUPT_ENTRY_CYCLES);
        self.mask_interrupts(user_enable);
        let vector = self.config.vector_base.wrapping_add(which * 4);
        self.jump_through(bus, vector)?;
        self.enter_call();
        Ok(true)
    }

    /// Exception entry masking shared by interrupts and TRAPA: set I, and
    /// also U unless SYSCR.UE is set.
    pub(in crate::cpu) fn mask_interrupts(&mut self, user_enable: bool) {
        self.regs.ccr.insert(Ccr::I);
        if !user_enable {
            self.regs.ccr.insert(Ccr::U);
        }
    }
}
