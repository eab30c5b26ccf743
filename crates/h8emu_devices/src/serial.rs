//! Asynchronous serial channel carrying MIDI.
//!
//! Output bytes are collected for the host instead of being clocked out on
//! a pin; input bytes queued by the host are delivered to RDR one at a time.

use std::collections::VecDeque;

use h8emu_core::{Device, TickContext};

/// Cycles needed to shift out one byte: ten bits at 31250 baud on a
/// 16 MHz clock.
pub const BYTE_CYCLES: i64 = (16_000_000 / 31_250) * 10;

/// Receive-data-full interrupt of channel 0.
const RXI: u8 = 53;
/// Transmit-data-empty interrupt of channel 0.
const TXI: u8 = 54;
/// Transmit-end interrupt of channel 0.
const TEI: u8 = 55;

const SCR: u32 = 2;
const TDR: u32 = 3;
const SSR: u32 = 4;
const RDR: u32 = 5;

/// SCR bits.
const SCR_TIE: u8 = 0x80;
const SCR_TE: u8 = 0x20;
const SCR_TEIE: u8 = 0x04;

/// SSR bits.
const SSR_TDRE: u8 = 0x80;
const SSR_RDRF: u8 = 0x40;
const SSR_TEND: u8 = 0x04;

/// MIDI active sensing; never forwarded to the host.
const ACTIVE_SENSING: u8 = 0xFE;

/// One SCI channel (SMR, BRR, SCR, TDR, SSR, RDR and two spare bytes).
#[derive(Clone, Debug)]
pub struct Serial {
    irq_offset: u8,
    data: [u8; 8],
    scr: u8,
    tdr: u8,
    ssr: u8,
    rdr: u8,
    /// Cycles left until the byte in flight has been sent; zero when idle.
    tx_timer: i64,
    last_cycles: u64,
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl Default for Serial {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Serial {
    /// A channel whose interrupts are shifted by `irq_offset` from those of
    /// channel 0.
    pub fn new(irq_offset: u8) -> Self {
        Self {
            irq_offset,
            data: [0; 8],
            scr: 0,
            tdr: 0xFF,
            ssr: SSR_TDRE,
            rdr: 0,
            tx_timer: 0,
            last_cycles: 0,
            input: VecDeque::new(),
            output: Vec::new(),
        }
    }

    /// Queue bytes for the firmware to receive.
    pub fn provide_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Bytes the firmware sent since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    fn write_scr(&mut self, value: u8) {
        let enabling = value & SCR_TE != 0 && self.scr & SCR_TE == 0;
        let disabling = value & SCR_TE == 0 && self.scr & SCR_TE != 0;
        if enabling {
            // Fires on the next tick.
            self.tx_timer = 1;
        } else if disabling {
            self.tx_timer = 0;
        }
        self.scr = value;
    }

    fn write_tdr(&mut self, value: u8) {
        self.tdr = value;
        if value != ACTIVE_SENSING {
            log::debug!("MIDI out: [{:02X}]", value);
            self.output.push(value);
        }
        self.tx_timer = BYTE_CYCLES;
        self.ssr &= !(SSR_TDRE | SSR_TEND);
    }
}

impl Device for Serial {
    fn read8(&mut self, addr: u32) -> u8 {
        match addr & 7 {
            SCR => self.scr,
            TDR => self.tdr,
            SSR => self.ssr,
            RDR => self.rdr,
            reg => self.data[reg as usize],
        }
    }

    fn write8(&mut self, addr: u32, value: u8) {
        match addr & 7 {
            SCR => self.write_scr(value),
            TDR => self.write_tdr(value),
            SSR => self.ssr = value,
            RDR => {}
            reg => self.data[reg as usize] = value,
        }
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> h8emu_core::Result<()> {
        let now = ctx.cycles();
        let elapsed = now.saturating_sub(self.last_cycles) as i64;
        self.last_cycles = now;

        if self.tx_timer > 0 {
            self.tx_timer -= elapsed;
            if self.tx_timer <= 0 {
                self.tx_timer = BYTE_CYCLES;
                if self.scr & SCR_TIE != 0 {
                    ctx.raise(TXI + self.irq_offset);
                }
                if self.scr & SCR_TEIE != 0 {
                    ctx.raise(TEI + self.irq_offset);
                }
                self.ssr |= SSR_TDRE | SSR_TEND;
            }
        }

        if self.ssr & SSR_RDRF == 0 {
            if let Some(byte) = self.input.pop_front() {
                self.ssr |= SSR_RDRF;
                self.rdr = byte;
                ctx.raise(RXI + self.irq_offset);
            }
        }
        Ok(())
    }
}
