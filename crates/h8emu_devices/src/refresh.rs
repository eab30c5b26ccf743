//! DRAM refresh controller, used by firmware as a periodic tick source.

use h8emu_core::{Device, TickContext};

/// Compare-match interrupt.
pub const CMI_IRQ: u8 = 21;

const RFSHCR: usize = 0;
const RTMCSR: usize = 1;
const RTCNT: usize = 2;
const RTCOR: usize = 3;

/// RTMCSR compare match flag.
const CMF: u8 = 0x80;
/// RTMCSR compare match interrupt enable.
const CMIE: u8 = 0x40;

/// Prescaler shifts selected by RTMCSR bits 3–5. Zero stops the counter.
const PRESCALER_SHIFTS: [u32; 8] = [0, 1, 3, 5, 7, 9, 11, 12];

/// RFSHCR, RTMCSR, RTCNT and RTCOR.
#[derive(Clone, Debug)]
pub struct RefreshController {
    regs: [u8; 4],
    shift: u32,
    last_cycles: u64,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self {
            regs: [0x02, 0x07, 0x00, 0xFF],
            shift: 0,
            last_cycles: 0,
        }
    }
}

impl RefreshController {
    fn interrupt_enabled(&self) -> bool {
        self.regs[RTMCSR] & CMIE != 0
    }
}

impl Device for RefreshController {
    fn read8(&mut self, addr: u32) -> u8 {
        let index = (addr & 3) as usize;
        let forced = match index {
            RFSHCR => 0x02,
            RTMCSR => 0x07,
            _ => 0,
        };
        self.regs[index] | forced
    }

    fn write8(&mut self, addr: u32, value: u8) {
        let index = (addr & 3) as usize;
        let value = match index {
            RFSHCR => {
                log::debug!("RFSHCR = 0x{:02X}", value);
                value
            }
            RTMCSR => {
                let value = value & 0x7F;
                self.shift = PRESCALER_SHIFTS[((value >> 3) & 7) as usize];
                value
            }
            _ => value,
        };
        self.regs[index] = value;
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> h8emu_core::Result<()> {
        let now = ctx.cycles();
        if self.shift != 0 {
            let steps = (now >> self.shift).saturating_sub(self.last_cycles >> self.shift);
            for _ in 0..steps {
                self.regs[RTCNT] = self.regs[RTCNT].wrapping_add(1);
                if self.regs[RTCNT] != self.regs[RTCOR] {
                    continue;
                }
                self.regs[RTCNT] = 0;
                self.regs[RTMCSR] |= CMF;
                if self.interrupt_enabled() {
                    ctx.raise(CMI_IRQ);
                }
            }
        }
        self.last_cycles = now;
        Ok(())
    }
}
