use super::{Ccr, Cpu};
use crate::instruction::Size;

impl Cpu {
    /// `a + b + carry` at width `size`, setting H/N/Z/V/C.
    ///
    /// With `keep_z` a zero result leaves Z as it was, so Z accumulates
    /// across an ADDX chain.
    pub(crate) fn add(&mut self, size: Size, a: u32, b: u32, carry: bool, keep_z: bool) -> u32 {
        let mask = size.mask();
        let (a, b) = (a & mask, b & mask);
        let res = a.wrapping_add(b).wrapping_add(carry as u32) & mask;
        let carries = (a & b) | (a & !res) | (b & !res);
        let overflow = (a & b & !res) | (!a & !b & res);
        self.set_arith_flags(size, res, carries, overflow, keep_z);
        res
    }

    /// `a - b - borrow` at width `size`, setting H/N/Z/V/C.
    pub(crate) fn sub(&mut self, size: Size, a: u32, b: u32, borrow: bool, keep_z: bool) -> u32 {
        let mask = size.mask();
        let (a, b) = (a & mask, b & mask);
        let res = a.wrapping_sub(b).wrapping_sub(borrow as u32) & mask;
        let borrows = (!a & b) | (!a & res) | (b & res);
        let overflow = (a & !b & !res) | (!a & b & res);
        self.set_arith_flags(size, res, borrows, overflow, keep_z);
        res
    }

    fn set_arith_flags(&mut self, size: Size, res: u32, carries: u32, overflow: u32, keep_z: bool) {
        let ccr = &mut self.regs.ccr;
        if res != 0 {
            ccr.remove(Ccr::Z);
        } else if !keep_z {
            ccr.insert(Ccr::Z);
        }
        ccr.set(Ccr::N, res & size.sign_bit() != 0);
        ccr.set(Ccr::C, carries & size.sign_bit() != 0);
        ccr.set(Ccr::H, carries & size.half_bit() != 0);
        ccr.set(Ccr::V, overflow & size.sign_bit() != 0);
    }

    /// N and Z from `value` at width `size`.
    #[inline]
    pub(crate) fn set_nz(&mut self, size: Size, value: u32) {
        let value = value & size.mask();
        self.regs.ccr.set(Ccr::N, value & size.sign_bit() != 0);
        self.regs.ccr.set(Ccr::Z, value == 0);
    }

    /// Flags of a data move or logical op: N/Z from the value, V cleared,
    /// C untouched.
    #[inline]
    pub(crate) fn set_move_flags(&mut self, size: Size, value: u32) {
        self.set_nz(size, value);
        self.regs.ccr.remove(Ccr::V);
    }

    /// INC/DEC: N/Z from the result and V on signed overflow; C and H are
    /// left alone.
    pub(crate) fn step_value(&mut self, size: Size, value: u32, amount: u32, up: bool) -> u32 {
        let mask = size.mask();
        let value = value & mask;
        let res = if up {
            value.wrapping_add(amount)
        } else {
            value.wrapping_sub(amount)
        } & mask;
        let overflow = if up { !value & res } else { value & !res };
        self.set_nz(size, res);
        self.regs
            .ccr
            .set(Ccr::V, overflow & size.sign_bit() != 0);
        res
    }
}
