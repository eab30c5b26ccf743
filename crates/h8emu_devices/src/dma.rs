//! DMA controller, full-address mode only.
//!
//! Register layout (16 bytes): MARAR MARAE MARAH MARAL ETCRAH ETCRAL IOARA
//! DTCRA, then the same eight for channel B.

use h8emu_core::{Device, TickContext};

/// Transfer-end interrupt of channel A; channel B follows it.
const DEND_IRQ: u8 = 44;

const DTCRA: usize = 7;
const DTCRB: usize = 15;

/// DTCR bits.
const DTE: u8 = 0x80;
const DTSZ: u8 = 0x40;
const DTIE: u8 = 0x08;

/// DTCRA mode bits for a normal full-address transfer.
const FULL_ADDRESS_NORMAL: u8 = 6;

/// A block copy waiting for the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Transfer {
    from: u32,
    to: u32,
    count: u32,
    step_from: i32,
    step_to: i32,
    irq_a: bool,
    irq_b: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Dma {
    regs: [u8; 16],
    irq_offset: u8,
    armed: Option<Transfer>,
}

/// Address stride selected by the SAI bits of a DTCR.
fn stride(dtcr: u8) -> i32 {
    match (dtcr >> 4) & 3 {
        1 => 1,
        3 => -1,
        _ => 0,
    }
}

impl Dma {
    pub fn new(irq_offset: u8) -> Self {
        Self {
            irq_offset,
            ..Self::default()
        }
    }

    /// Whether a transfer is waiting for the next tick.
    pub fn is_busy(&self) -> bool {
        self.armed.is_some()
    }

    fn address(&self, at: usize) -> u32 {
        u32::from_be_bytes([0, self.regs[at + 1], self.regs[at + 2], self.regs[at + 3]])
    }

    fn start(&mut self, dtcra: u8) {
        if dtcra & DTE == 0 {
            return;
        }
        if dtcra & 7 != FULL_ADDRESS_NORMAL || dtcra & DTSZ != 0 {
            log::warn!("Unsupported DMA mode DTCRA=0x{:02X}", dtcra);
            return;
        }
        let dtcrb = self.regs[DTCRB];
        if dtcrb & DTE == 0 {
            return;
        }
        if dtcrb & 7 != 0 {
            log::warn!("Unsupported DMA request source DTCRB=0x{:02X}", dtcrb);
            return;
        }
        let transfer = Transfer {
            from: self.address(0),
            to: self.address(8),
            count: u16::from_be_bytes([self.regs[4], self.regs[5]]) as u32,
            step_from: stride(dtcra),
            step_to: stride(dtcrb),
            irq_a: dtcra & DTIE != 0,
            irq_b: dtcrb & DTIE != 0,
        };
        log::debug!(
            "DMA 0x{:06X} -> 0x{:06X}, {} bytes",
            transfer.from,
            transfer.to,
            transfer.count
        );
        self.armed = Some(transfer);
    }
}

impl Device for Dma {
    fn read8(&mut self, addr: u32) -> u8 {
        self.regs[(addr & 15) as usize]
    }

    fn write8(&mut self, addr: u32, value: u8) {
        let index = (addr & 15) as usize;
        self.regs[index] = value;
        if index == DTCRA {
            self.start(value);
        }
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> h8emu_core::Result<()> {
        let Some(transfer) = self.armed.take() else {
            return Ok(());
        };
        let (mut from, mut to) = (transfer.from, transfer.to);
        for _ in 0..transfer.count {
            let value = ctx.read8(from)?;
            ctx.write8(to, value)?;
            from = from.wrapping_add_signed(transfer.step_from);
            to = to.wrapping_add_signed(transfer.step_to);
        }
        if transfer.irq_a {
            ctx.raise(DEND_IRQ + self.irq_offset);
        }
        if transfer.irq_b {
            ctx.raise(DEND_IRQ + 1 + self.irq_offset);
        }
        Ok(())
    }
}
