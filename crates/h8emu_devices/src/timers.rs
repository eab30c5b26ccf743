//! 16-bit integrated timer unit: five channels sharing one register block.

use h8emu_core::{Device, TickContext};

/// First address of the timer register block.
pub const TIMER_BASE: u32 = 0xFF_FF60;
/// Size of the register block.
pub const TIMER_LEN: u32 = 0x40;

pub const CHANNELS: usize = 5;

/// IMIA of channel 0; each channel owns four vectors from here.
const IRQ_BASE: u8 = 24;

/// TSR / TIER bits.
const IMFA: u8 = 0x01;
const IMFB: u8 = 0x02;
const OVF: u8 = 0x04;

/// TCR bit selecting an external clock input.
const TCR_EXTERNAL: u8 = 0x04;

/// Offset of each channel's register group inside the block.
const CHANNEL_OFFSETS: [u32; CHANNELS] = [0x04, 0x0E, 0x18, 0x22, 0x32];
const CHANNEL_LEN: u32 = 10;

#[derive(Clone, Copy, Debug)]
struct Channel {
    tcr: u8,
    tier: u8,
    tsr: u8,
    tcnt: u16,
    gra: u16,
    grb: u16,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            tcr: 0x80,
            tier: 0xF8,
            tsr: 0xF8,
            tcnt: 0,
            gra: 0xFFFF,
            grb: 0xFFFF,
        }
    }
}

impl Channel {
    /// Advance TCNT by one count, returning the interrupts it requests
    /// as bits 0–2 (IMIA, IMIB, OVI).
    fn count(&mut self) -> u8 {
        let mut raised = 0;
        let mut next = self.tcnt.wrapping_add(1);
        if self.tcnt == self.gra {
            self.tsr |= IMFA;
            if self.tcr & 0x60 == 0x20 {
                next = 0;
            }
            raised |= self.tier & IMFA;
        }
        if self.tcnt == self.grb {
            self.tsr |= IMFB;
            if self.tcr & 0x60 == 0x40 {
                next = 0;
            }
            raised |= self.tier & IMFB;
        }
        if self.tcnt == 0 {
            self.tsr |= OVF;
            raised |= self.tier & OVF;
        }
        self.tcnt = next;
        raised
    }

    fn read(&self, reg: u32) -> u8 {
        match reg {
            0 => self.tcr,
            // TIOR is not modelled.
            1 => 0,
            2 => self.tier,
            3 => self.tsr,
            4 => (self.tcnt >> 8) as u8,
            5 => self.tcnt as u8,
            6 => (self.gra >> 8) as u8,
            7 => self.gra as u8,
            8 => (self.grb >> 8) as u8,
            _ => self.grb as u8,
        }
    }

    fn write(&mut self, reg: u32, value: u8) {
        match reg {
            0 => self.tcr = value,
            1 => {}
            2 => self.tier = value,
            3 => self.tsr = value,
            4 => set_high(&mut self.tcnt, value),
            5 => set_low(&mut self.tcnt, value),
            6 => set_high(&mut self.gra, value),
            7 => set_low(&mut self.gra, value),
            8 => set_high(&mut self.grb, value),
            _ => set_low(&mut self.grb, value),
        }
    }
}

#[inline]
fn set_high(reg: &mut u16, value: u8) {
    *reg = (*reg & 0x00FF) | (value as u16) << 8;
}

#[inline]
fn set_low(reg: &mut u16, value: u8) {
    *reg = (*reg & 0xFF00) | value as u16;
}

/// TSTR, TSNC, TMDR, TFCR and the five channels.
///
/// Registers outside any channel group read back what was last written.
#[derive(Clone, Debug)]
pub struct Timers {
    tstr: u8,
    tsnc: u8,
    tmdr: u8,
    tfcr: u8,
    channels: [Channel; CHANNELS],
    space: [u8; TIMER_LEN as usize],
    last_cycles: u64,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            tstr: 0xC0,
            tsnc: 0xC0,
            tmdr: 0x80,
            tfcr: 0xC0,
            channels: [Channel::default(); CHANNELS],
            space: [0; TIMER_LEN as usize],
            last_cycles: 0,
        }
    }
}

impl Timers {
    /// One pulse on the external clock input of `channel`.
    pub fn tick_external(&mut self, channel: usize) {
        match self.channels.get_mut(channel) {
            Some(c) => c.gra = c.gra.wrapping_add(1),
            None => log::warn!("No timer channel {}", channel),
        }
    }

    pub fn tcnt(&self, channel: usize) -> Option<u16> {
        self.channels.get(channel).map(|c| c.tcnt)
    }

    fn running(&self, i: usize) -> bool {
        self.tstr & (1 << i) != 0
            && self.tmdr & (1 << i) == 0
            && self.channels[i].tcr & TCR_EXTERNAL == 0
    }

    /// Map a block offset to `(channel, register)`.
    fn locate(offset: u32) -> Option<(usize, u32)> {
        CHANNEL_OFFSETS
            .iter()
            .position(|&start| (start..start + CHANNEL_LEN).contains(&offset))
            .map(|i| (i, offset - CHANNEL_OFFSETS[i]))
    }
}

impl Device for Timers {
    fn read8(&mut self, addr: u32) -> u8 {
        let offset = addr.wrapping_sub(TIMER_BASE);
        if offset >= TIMER_LEN {
            return 0;
        }
        match offset {
            0 => self.tstr,
            1 => self.tsnc,
            2 => self.tmdr,
            3 => self.tfcr,
            _ => match Self::locate(offset) {
                Some((i, reg)) => self.channels[i].read(reg),
                None => self.space[offset as usize],
            },
        }
    }

    fn write8(&mut self, addr: u32, value: u8) {
        let offset = addr.wrapping_sub(TIMER_BASE);
        if offset >= TIMER_LEN {
            return;
        }
        match offset {
            0 => self.tstr = value,
            1 => self.tsnc = value,
            2 => self.tmdr = value,
            3 => self.tfcr = value,
            _ => match Self::locate(offset) {
                Some((i, reg)) => self.channels[i].write(reg, value),
                None => self.space[offset as usize] = value,
            },
        }
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> h8emu_core::Result<()> {
        let now = ctx.cycles();
        for i in 0..CHANNELS {
            if !self.running(i) {
                continue;
            }
            let shift = (self.channels[i].tcr & 3) as u32;
            let steps = (now >> shift).saturating_sub(self.last_cycles >> shift);
            for _ in 0..steps {
                let raised = self.channels[i].count();
                for bit in 0..3 {
                    if raised & (1 << bit) != 0 {
                        ctx.raise(IRQ_BASE + 4 * i as u8 + bit);
                    }
                }
            }
        }
        self.last_cycles = now;
        Ok(())
    }
}
