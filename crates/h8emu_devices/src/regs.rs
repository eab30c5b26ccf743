//! Register-only devices: no timing, no interrupts.

use h8emu_core::Device;

/// Interrupt enable register for IRQ 12–17.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ier {
    value: u8,
}

impl Ier {
    pub fn value(&self) -> u8 {
        self.value
    }
}

impl Device for Ier {
    fn read8(&mut self, _addr: u32) -> u8 {
        self.value
    }

    fn write8(&mut self, _addr: u32, value: u8) {
        self.value = value;
    }
}

/// A/D converter data registers returning a fixed conversion result.
///
/// Even addresses read the high byte, odd addresses the low byte.
#[derive(Clone, Copy, Debug, Default)]
pub struct Adc {
    value: u16,
}

impl Adc {
    pub fn new(value: u16) -> Self {
        Self { value }
    }

    pub fn set_value(&mut self, value: u16) {
        self.value = value;
    }
}

impl Device for Adc {
    fn read8(&mut self, addr: u32) -> u8 {
        let [hi, lo] = self.value.to_be_bytes();
        if addr & 1 == 0 {
            hi
        } else {
            lo
        }
    }

    fn write8(&mut self, addr: u32, value: u8) {
        log::trace!("ADC write 0x{:02X} to 0x{:06X} ignored", value, addr);
    }
}

/// Plain storage for on-chip registers nobody models, indexed by the low
/// address byte.
#[derive(Clone, Debug)]
pub struct HwRegs {
    data: [u8; 256],
}

impl Default for HwRegs {
    fn default() -> Self {
        Self { data: [0; 256] }
    }
}

impl Device for HwRegs {
    fn read8(&mut self, addr: u32) -> u8 {
        self.data[(addr & 0xFF) as usize]
    }

    fn write8(&mut self, addr: u32, value: u8) {
        self.data[(addr & 0xFF) as usize] = value;
    }
}

/// Fills holes in the memory map. Every access is reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatchAll;

impl Device for CatchAll {
    fn read8(&mut self, addr: u32) -> u8 {
        log::warn!("Uncaught read 0x{:06X}", addr);
        0
    }

    fn write8(&mut self, addr: u32, value: u8) {
        log::warn!("Uncaught write 0x{:06X}, 0x{:02X}", addr, value);
    }
}
