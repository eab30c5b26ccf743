use crate::cpu::{Ccr, Cpu};
use crate::instruction::{ShiftOp, Size};

impl Cpu {
    /// Shift or rotate register `dst` by `count` (1 or 2) positions.
    ///
    /// C receives the last bit shifted out. SHAL sets V when the bits
    /// shifted through the sign position were not all equal; every other
    /// form clears V.
    pub(super) fn exec_shift(&mut self, op: ShiftOp, size: Size, count: u8, dst: u8) {
        let bits = size.bits();
        let mask = size.mask();
        let n = count as u32;
        let value = self.regs.read(size, dst) & mask;

        let (result, carry) = match op {
            ShiftOp::Shal | ShiftOp::Shll => ((value << n) & mask, value >> (bits - n) & 1),
            ShiftOp::Shar => {
                let signed = size.sign_extend(value) as i32;
                ((signed >> n) as u32 & mask, value >> (n - 1) & 1)
            }
            ShiftOp::Shlr => (value >> n, value >> (n - 1) & 1),
            ShiftOp::Rotl => {
                let result = (value << n | value >> (bits - n)) & mask;
                (result, result & 1)
            }
            ShiftOp::Rotr => {
                let result = (value >> n | value << (bits - n)) & mask;
                (result, value >> (n - 1) & 1)
            }
            ShiftOp::Rotxl => {
                let mut result = value;
                let mut carry = self.regs.flag(Ccr::C) as u32;
                for _ in 0..n {
                    let out = result >> (bits - 1) & 1;
                    result = (result << 1 | carry) & mask;
                    carry = out;
                }
                (result, carry)
            }
            ShiftOp::Rotxr => {
                let mut result = value;
                let mut carry = self.regs.flag(Ccr::C) as u32;
                for _ in 0..n {
                    let out = result & 1;
                    result = result >> 1 | carry << (bits - 1);
                    carry = out;
                }
                (result, carry)
            }
        };

        let overflow = op == ShiftOp::Shal && {
            let top = value >> (bits - 1 - n);
            top != 0 && top != (1 << (n + 1)) - 1
        };

        self.regs.set_flag(Ccr::C, carry != 0);
        self.regs.set_flag(Ccr::V, overflow);
        self.set_nz(size, result);
        self.regs.write(size, dst, result);
    }
}
