use crate::bus::Bus;
use crate::cpu::{Ccr, Cpu};
use crate::error::Result;
use crate::instruction::{AluOp, MulDivOp, Operand, Size, UnaryOp};

impl Cpu {
    pub(super) fn exec_alu<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        op: AluOp,
        size: Size,
        src: Operand,
        dst: u8,
    ) -> Result<()> {
        let b = self.read_operand(bus, size, src)?;
        let a = self.regs.read(size, dst);
        let carry = self.regs.flag(Ccr::C);
        let result = match op {
            AluOp::Add => self.add(size, a, b, false, false),
            AluOp::Addx => self.add(size, a, b, carry, true),
            AluOp::Sub => self.sub(size, a, b, false, false),
            AluOp::Subx => self.sub(size, a, b, carry, true),
            AluOp::Cmp => {
                self.sub(size, a, b, false, false);
                return Ok(());
            }
            AluOp::And | AluOp::Or | AluOp::Xor => {
                let value = match op {
                    AluOp::And => a & b,
                    AluOp::Or => a | b,
                    _ => a ^ b,
                };
                self.set_move_flags(size, value);
                value
            }
        };
        self.regs.write(size, dst, result);
        Ok(())
    }

    pub(super) fn exec_step(&mut self, size: Size, amount: u8, dst: u8, up: bool) {
        let value = self.regs.read(size, dst);
        let result = self.step_value(size, value, amount as u32, up);
        self.regs.write(size, dst, result);
    }

    pub(super) fn exec_unary(&mut self, op: UnaryOp, size: Size, dst: u8) {
        let value = self.regs.read(size, dst);
        let result = match op {
            UnaryOp::Neg => self.sub(size, 0, value, false, false),
            UnaryOp::Not => {
                let result = !value & size.mask();
                self.set_move_flags(size, result);
                result
            }
            UnaryOp::Extu | UnaryOp::Exts => {
                let half = match size {
                    Size::Long => Size::Word,
                    _ => Size::Byte,
                };
                let low = value & half.mask();
                let result = if op == UnaryOp::Exts {
                    half.sign_extend(low) & size.mask()
                } else {
                    low
                };
                self.set_move_flags(size, result);
                result
            }
        };
        self.regs.write(size, dst, result);
    }

    /// Decimal adjust after addition.
    pub(super) fn exec_daa(&mut self, reg: u8) {
        let value = self.regs.read_byte(reg);
        let (hi, lo) = (value >> 4, value & 0x0F);
        let carry = self.regs.flag(Ccr::C);
        let half = self.regs.flag(Ccr::H);
        let adjust: u8 = match (carry, half) {
            (true, true) => {
                if hi <= 3 && lo <= 3 {
                    0x66
                } else {
                    0x00
                }
            }
            (true, false) => match (hi <= 2, lo <= 9) {
                (true, true) => 0x60,
                (true, false) => 0x66,
                (false, _) => 0x00,
            },
            (false, true) => match (lo <= 3, hi <= 9) {
                (true, true) => 0x06,
                (true, false) => 0x66,
                (false, _) => 0x00,
            },
            (false, false) => match (lo <= 9, hi) {
                (true, 0..=9) => 0x00,
                (true, _) => 0x60,
                (false, 0..=8) => 0x06,
                (false, _) => 0x66,
            },
        };
        let result = value.wrapping_add(adjust);
        self.regs.write_byte(reg, result);
        self.set_move_flags(Size::Byte, result as u32);
        if adjust > 0x06 {
            self.regs.set_flag(Ccr::C, true);
        }
    }

    /// Decimal adjust after subtraction.
    pub(super) fn exec_das(&mut self, reg: u8) {
        let value = self.regs.read_byte(reg);
        let (hi, lo) = (value >> 4, value & 0x0F);
        let carry = self.regs.flag(Ccr::C);
        let half = self.regs.flag(Ccr::H);
        let adjust: u8 = match (carry, half) {
            (true, true) if hi >= 6 && lo >= 6 => 0x9A,
            (true, false) if hi >= 7 && lo <= 9 => 0xA0,
            (false, true) if hi <= 8 && lo >= 6 => 0xFA,
            _ => 0x00,
        };
        let result = self.add(Size::Byte, value as u32, adjust as u32, false, false);
        self.regs.write_byte(reg, result as u8);
    }

    /// MULXU/MULXS/DIVXU/DIVXS.
    ///
    /// `size` is the source width. Byte forms work on the word view of
    /// `dst`: the product fills the whole word, a quotient goes to bits 0–7
    /// and the remainder to bits 8–15. Word forms work on ERd: the quotient
    /// goes to Rd and the remainder to Ed. Division by zero sets the flags
    /// but leaves the destination untouched.
    pub(super) fn exec_muldiv(&mut self, op: MulDivOp, size: Size, src: u8, dst: u8) {
        let wide = match size {
            Size::Byte => Size::Word,
            _ => Size::Long,
        };
        let source = self.regs.read(size, src);
        let target = self.regs.read(wide, dst);

        match op {
            MulDivOp::Mulxu => {
                let product = source * (target & size.mask());
                self.regs.write(wide, dst, product);
            }
            MulDivOp::Mulxs => {
                let a = size.sign_extend(source) as i32;
                let b = size.sign_extend(target) as i32;
                let product = a.wrapping_mul(b) as u32 & wide.mask();
                self.set_nz(wide, product);
                self.regs.write(wide, dst, product);
            }
            MulDivOp::Divxu => {
                self.regs.set_flag(Ccr::N, source & size.sign_bit() != 0);
                self.regs.set_flag(Ccr::Z, source == 0);
                if source == 0 {
                    log::warn!("DIVXU by zero at PC=0x{:06X}", self.regs.pc);
                    return;
                }
                let quotient = target / source;
                let remainder = target % source;
                self.write_quotient(size, dst, quotient, remainder);
            }
            MulDivOp::Divxs => {
                let a = size.sign_extend(source) as i32;
                let b = wide.sign_extend(target) as i32;
                self.regs.set_flag(Ccr::N, (a < 0) != (b < 0));
                self.regs.set_flag(Ccr::Z, a == 0);
                if a == 0 {
                    log::warn!("DIVXS by zero at PC=0x{:06X}", self.regs.pc);
                    return;
                }
                let quotient = b.wrapping_div(a) as u32;
                let remainder = b.wrapping_rem(a) as u32;
                self.write_quotient(size, dst, quotient, remainder);
            }
        }
    }

    fn write_quotient(&mut self, size: Size, dst: u8, quotient: u32, remainder: u32) {
        match size {
            Size::Byte => {
                let word = (remainder & 0xFF) << 8 | (quotient & 0xFF);
                self.regs.write_word(dst, word as u16);
            }
            _ => {
                self.regs.write_word(dst & 7, quotient as u16);
                self.regs.write_word((dst & 7) | 8, remainder as u16);
            }
        }
    }
}
