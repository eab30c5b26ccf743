use bitflags::bitflags;

use crate::instruction::Size;

bitflags! {
    /// Condition-code register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Ccr: u8 {
        const C = 0x01;
        const V = 0x02;
        const Z = 0x04;
        const N = 0x08;
        const U = 0x10;
        const H = 0x20;
        const UI = 0x40;
        const I = 0x80;
    }
}

bitflags! {
    /// Extended control register: interrupt mask level and trace bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Exr: u8 {
        const I0 = 0x01;
        const I1 = 0x02;
        const I2 = 0x04;
        const T = 0x80;
    }
}

/// General registers ER0–ER7 plus PC, CCR and EXR.
///
/// Register ids follow the instruction encoding:
/// - byte ids 0–7 are R0H–R7H, 8–15 are R0L–R7L;
/// - word ids 0–7 are R0–R7 (low halves), 8–15 are E0–E7 (high halves);
/// - long ids 0–7 are ER0–ER7 (bit 3 is ignored).
///
/// Every narrow view is a masked read-modify-write of the single 32-bit
/// cell, so the bits outside the view are always preserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub er: [u32; 8],
    /// Always even and within the 24-bit address space.
    pub pc: u32,
    pub ccr: Ccr,
    pub exr: Exr,
}

impl Registers {
    #[inline]
    fn cell(id: u8) -> usize {
        (id & 7) as usize
    }

    #[inline]
    pub fn read_byte(&self, id: u8) -> u8 {
        let value = self.er[Self::cell(id)];
        if id & 8 != 0 {
            value as u8
        } else {
            (value >> 8) as u8
        }
    }

    #[inline]
    pub fn write_byte(&mut self, id: u8, value: u8) {
        let cell = &mut self.er[Self::cell(id)];
        if id & 8 != 0 {
            *cell = (*cell & !0x0000_00FF) | value as u32;
        } else {
            *cell = (*cell & !0x0000_FF00) | (value as u32) << 8;
        }
    }

    #[inline]
    pub fn read_word(&self, id: u8) -> u16 {
        let value = self.er[Self::cell(id)];
        if id & 8 != 0 {
            (value >> 16) as u16
        } else {
            value as u16
        }
    }

    #[inline]
    pub fn write_word(&mut self, id: u8, value: u16) {
        let cell = &mut self.er[Self::cell(id)];
        if id & 8 != 0 {
            *cell = (*cell & 0x0000_FFFF) | (value as u32) << 16;
        } else {
            *cell = (*cell & 0xFFFF_0000) | value as u32;
        }
    }

    #[inline]
    pub fn read_long(&self, id: u8) -> u32 {
        self.er[Self::cell(id)]
    }

    #[inline]
    pub fn write_long(&mut self, id: u8, value: u32) {
        self.er[Self::cell(id)] = value;
    }

    /// Read the view of register `id` selected by `size`, zero-extended.
    pub fn read(&self, size: Size, id: u8) -> u32 {
        match size {
            Size::Byte => self.read_byte(id) as u32,
            Size::Word => self.read_word(id) as u32,
            Size::Long => self.read_long(id),
        }
    }

    /// Write the low `size` bits of `value` to the view of register `id`.
    pub fn write(&mut self, size: Size, id: u8, value: u32) {
        match size {
            Size::Byte => self.write_byte(id, value as u8),
            Size::Word => self.write_word(id, value as u16),
            Size::Long => self.write_long(id, value),
        }
    }

    /// ER7 doubles as the stack pointer.
    #[inline]
    pub fn sp(&self) -> u32 {
        self.er[7]
    }

    #[inline]
    pub fn set_sp(&mut self, value: u32) {
        self.er[7] = value;
    }

    #[inline]
    pub fn flag(&self, flag: Ccr) -> bool {
        self.ccr.contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Ccr, value: bool) {
        self.ccr.set(flag, value);
    }
}
