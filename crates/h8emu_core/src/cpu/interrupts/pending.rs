use super::super::{Cpu, GATED_IRQ_COUNT, GATED_IRQ_FIRST, GATED_IRQ_MASK};
use crate::bus::Bus;
use crate::error::Result;

impl Cpu {
    /// Request interrupt `irq` (0–63).
    ///
    /// Interrupts 12–17 are gated by the enable register: raising one whose
    /// enable bit is clear drops it instead of queueing it.
    pub fn raise<B: Bus + ?Sized>(&mut self, bus: &mut B, irq: u8) -> Result<()> {
        if irq >= 64 {
            log::warn!("Ignoring out-of-range interrupt {}", irq);
            return Ok(());
        }
        if (GATED_IRQ_FIRST..GATED_IRQ_FIRST + GATED_IRQ_COUNT).contains(&irq) {
            if let Some(ier_address) = self.config.ier_address {
                let ier = self.read8(bus, ier_address)?;
                if ier & (1 << (irq - GATED_IRQ_FIRST)) == 0 {
                    log::trace!("Interrupt {} dropped: IER=0x{:02X}", irq, ier);
                    return Ok(());
                }
            }
        }
        self.pending |= 1 << irq;
        Ok(())
    }

    /// Interrupt status register view of the gated interrupts.
    pub(crate) fn isr_bits(&self) -> u8 {
        ((self.pending & GATED_IRQ_MASK) >> GATED_IRQ_FIRST) as u8
    }

    /// Writing 0 to an ISR bit acknowledges that pending interrupt; writing
    /// 1 leaves it unchanged.
    pub(crate) fn write_isr(&mut self, value: u8) {
        let keep = ((value as u64) << GATED_IRQ_FIRST) & GATED_IRQ_MASK;
        self.pending &= !GATED_IRQ_MASK | keep;
    }

    /// Drop every pending interrupt.
    pub fn clear_pending(&mut self) {
        self.pending = 0;
    }
}
