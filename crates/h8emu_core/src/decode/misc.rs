//! Opcodes 0x00–0x1F: register ALU forms, shifts, control registers and
//! the 0x01 prefix page.

use super::{Decoder, Fetch};
use crate::error::Result;
use crate::instruction::{
    AluOp, ControlReg, Ea, LogicOp, MulDivOp, Op, Operand, ShiftOp, Size, UnaryOp,
};

impl<F: Fetch + ?Sized> Decoder<'_, F> {
    pub(super) fn decode_group0(&mut self, lo: u8) -> Result<Op> {
        match lo {
            0x0 => {
                let b = self.byte()?;
                self.expect(b == 0)?;
                Ok(Op::Nop)
            }
            0x1 => self.decode_prefix01(),
            // STC.B CCR/EXR,Rd and LDC.B Rs,CCR/EXR
            0x2 | 0x3 => {
                let b = self.byte()?;
                let cr = match b >> 4 {
                    0 => ControlReg::Ccr,
                    1 => ControlReg::Exr,
                    _ => return self.illegal(),
                };
                let reg = Operand::Reg(b & 0x0F);
                Ok(if lo == 0x2 {
                    Op::Stc { src: cr, dst: reg }
                } else {
                    Op::Ldc { src: reg, dst: cr }
                })
            }
            0x4 | 0x5 | 0x6 => {
                let imm = self.byte()?;
                let op = match lo {
                    0x4 => LogicOp::Or,
                    0x5 => LogicOp::Xor,
                    _ => LogicOp::And,
                };
                Ok(Op::ControlLogic {
                    op,
                    imm,
                    dst: ControlReg::Ccr,
                })
            }
            0x7 => {
                let imm = self.byte()?;
                Ok(Op::Ldc {
                    src: Operand::Imm(imm as u32),
                    dst: ControlReg::Ccr,
                })
            }
            0x8 => self.alu_rr(AluOp::Add, Size::Byte),
            0x9 => self.alu_rr(AluOp::Add, Size::Word),
            0xA => {
                let b = self.byte()?;
                match b >> 4 {
                    0x0 => Ok(Op::Inc {
                        size: Size::Byte,
                        amount: 1,
                        dst: b & 0x0F,
                    }),
                    0x8..=0xF => {
                        let (src, dst) = self.long_pair(b)?;
                        Ok(Op::Alu {
                            op: AluOp::Add,
                            size: Size::Long,
                            src: Operand::Reg(src),
                            dst,
                        })
                    }
                    _ => self.illegal(),
                }
            }
            0xB => self.decode_step(true),
            0xC | 0xD => {
                let regs = self.byte()?;
                Ok(Op::Mov {
                    size: if lo == 0xC { Size::Byte } else { Size::Word },
                    src: Operand::Reg(regs >> 4),
                    dst: Operand::Reg(regs & 0x0F),
                })
            }
            0xE => self.alu_rr(AluOp::Addx, Size::Byte),
            _ => {
                let b = self.byte()?;
                match b >> 4 {
                    0x0 => Ok(Op::Daa(b & 0x0F)),
                    0x8..=0xF => {
                        let (src, dst) = self.long_pair(b)?;
                        Ok(Op::Mov {
                            size: Size::Long,
                            src: Operand::Reg(src),
                            dst: Operand::Reg(dst),
                        })
                    }
                    _ => self.illegal(),
                }
            }
        }
    }

    pub(super) fn decode_group1(&mut self, lo: u8) -> Result<Op> {
        match lo {
            0x0..=0x3 => self.decode_shift(lo),
            0x4 => self.alu_rr(AluOp::Or, Size::Byte),
            0x5 => self.alu_rr(AluOp::Xor, Size::Byte),
            0x6 => self.alu_rr(AluOp::And, Size::Byte),
            0x7 => {
                let b = self.byte()?;
                let dst = b & 0x0F;
                let (op, size) = match b >> 4 {
                    0x0 => (UnaryOp::Not, Size::Byte),
                    0x1 => (UnaryOp::Not, Size::Word),
                    0x3 => (UnaryOp::Not, Size::Long),
                    0x5 => (UnaryOp::Extu, Size::Word),
                    0x7 => (UnaryOp::Extu, Size::Long),
                    0x8 => (UnaryOp::Neg, Size::Byte),
                    0x9 => (UnaryOp::Neg, Size::Word),
                    0xB => (UnaryOp::Neg, Size::Long),
                    0xD => (UnaryOp::Exts, Size::Word),
                    0xF => (UnaryOp::Exts, Size::Long),
                    _ => return self.illegal(),
                };
                if size == Size::Long {
                    self.expect(dst < 8)?;
                }
                Ok(Op::Unary { op, size, dst })
            }
            0x8 => self.alu_rr(AluOp::Sub, Size::Byte),
            0x9 => self.alu_rr(AluOp::Sub, Size::Word),
            0xA | 0xF => {
                let b = self.byte()?;
                if b & 0x80 != 0 {
                    let (src, dst) = self.long_pair(b)?;
                    Ok(Op::Alu {
                        op: if lo == 0xA { AluOp::Sub } else { AluOp::Cmp },
                        size: Size::Long,
                        src: Operand::Reg(src),
                        dst,
                    })
                } else if b >> 4 == 0 {
                    Ok(if lo == 0xA {
                        Op::Dec {
                            size: Size::Byte,
                            amount: 1,
                            dst: b & 0x0F,
                        }
                    } else {
                        Op::Das(b & 0x0F)
                    })
                } else {
                    self.illegal()
                }
            }
            0xB => self.decode_step(false),
            0xC => self.alu_rr(AluOp::Cmp, Size::Byte),
            0xD => self.alu_rr(AluOp::Cmp, Size::Word),
            _ => self.alu_rr(AluOp::Subx, Size::Byte),
        }
    }

    /// 0x0B / 0x1B: ADDS/SUBS and word/long INC/DEC.
    fn decode_step(&mut self, up: bool) -> Result<Op> {
        let b = self.byte()?;
        let reg = b & 0x0F;
        let (size, amount) = match b >> 4 {
            0x0 => (None, 1),
            0x8 => (None, 2),
            0x9 => (None, 4),
            0x5 => (Some(Size::Word), 1),
            0xD => (Some(Size::Word), 2),
            0x7 => (Some(Size::Long), 1),
            0xF => (Some(Size::Long), 2),
            _ => return self.illegal(),
        };
        match size {
            Some(Size::Word) => Ok(if up {
                Op::Inc {
                    size: Size::Word,
                    amount,
                    dst: reg,
                }
            } else {
                Op::Dec {
                    size: Size::Word,
                    amount,
                    dst: reg,
                }
            }),
            Some(size) => {
                self.expect(reg < 8)?;
                Ok(if up {
                    Op::Inc {
                        size,
                        amount,
                        dst: reg,
                    }
                } else {
                    Op::Dec {
                        size,
                        amount,
                        dst: reg,
                    }
                })
            }
            None => {
                self.expect(reg < 8)?;
                Ok(if up {
                    Op::Adds { amount, dst: reg }
                } else {
                    Op::Subs { amount, dst: reg }
                })
            }
        }
    }

    /// 0x10–0x13: one- and two-bit shifts and rotates.
    fn decode_shift(&mut self, lo: u8) -> Result<Op> {
        let b = self.byte()?;
        let size = match (b >> 4) & 3 {
            0 => Size::Byte,
            1 => Size::Word,
            3 => Size::Long,
            _ => return self.illegal(),
        };
        let dst = b & 0x0F;
        if size == Size::Long {
            self.expect(dst < 8)?;
        }
        let high = b & 0x80 != 0;
        let op = match (lo, high) {
            (0x0, true) => ShiftOp::Shal,
            (0x0, false) => ShiftOp::Shll,
            (0x1, true) => ShiftOp::Shar,
            (0x1, false) => ShiftOp::Shlr,
            (0x2, true) => ShiftOp::Rotl,
            (0x2, false) => ShiftOp::Rotxl,
            (_, true) => ShiftOp::Rotr,
            (_, false) => ShiftOp::Rotxr,
        };
        let count = if b & 0x40 != 0 { 2 } else { 1 };
        Ok(Op::Shift {
            op,
            size,
            count,
            dst,
        })
    }

    /// Second byte after 0x01.
    fn decode_prefix01(&mut self) -> Result<Op> {
        let b = self.byte()?;
        match b >> 4 {
            0x0 => {
                self.expect(b == 0)?;
                self.decode_mov_long()
            }
            0x1..=0x3 => self.decode_ldm_stm(b),
            0x4 => match b & 0x0F {
                0 => self.decode_control_mem(ControlReg::Ccr),
                1 => self.decode_control_mem(ControlReg::Exr),
                _ => self.illegal(),
            },
            0x8 => {
                self.expect(b == 0x80)?;
                Ok(Op::Sleep)
            }
            0xC | 0xD => {
                self.expect(b & 0x0F == 0)?;
                let c = self.byte()?;
                let regs = self.byte()?;
                let (src, dst) = (regs >> 4, regs & 0x0F);
                let (op, size) = match (b >> 4, c) {
                    (0xC, 0x50) => (MulDivOp::Mulxs, Size::Byte),
                    (0xC, 0x52) => (MulDivOp::Mulxs, Size::Word),
                    (0xD, 0x51) => (MulDivOp::Divxs, Size::Byte),
                    (0xD, 0x53) => (MulDivOp::Divxs, Size::Word),
                    _ => return self.illegal(),
                };
                if size == Size::Word {
                    self.expect(dst < 8)?;
                }
                Ok(Op::MulDiv { op, size, src, dst })
            }
            0xE => {
                self.expect(b == 0xE0)?;
                let c = self.byte()?;
                let d = self.byte()?;
                self.expect(c == 0x7B && d & 0x8F == 0x0C)?;
                Ok(Op::Tas((d >> 4) & 7))
            }
            0xF => {
                self.expect(b == 0xF0)?;
                let c = self.byte()?;
                let d = self.byte()?;
                self.expect(d & 0x88 == 0)?;
                let op = match c {
                    0x64 => AluOp::Or,
                    0x65 => AluOp::Xor,
                    0x66 => AluOp::And,
                    _ => return self.illegal(),
                };
                Ok(Op::Alu {
                    op,
                    size: Size::Long,
                    src: Operand::Reg(d >> 4),
                    dst: d & 7,
                })
            }
            _ => self.illegal(),
        }
    }

    /// 01 n0 6D xx: STM.L / LDM.L of two to four registers.
    fn decode_ldm_stm(&mut self, b: u8) -> Result<Op> {
        self.expect(b & 0x0F == 0)?;
        let c = self.byte()?;
        let d = self.byte()?;
        self.expect(c == 0x6D && d & 0x78 == 0x70)?;
        let reg = d & 7;
        let extra = (b >> 4) & 3;
        let count = extra + 1;
        if d & 0x80 != 0 {
            self.expect(reg + extra < 8)?;
            Ok(Op::Stm { first: reg, count })
        } else {
            self.expect(reg >= extra)?;
            Ok(Op::Ldm { last: reg, count })
        }
    }

    /// 01 40 / 01 41 page: LDC/STC with memory operands, plus the EXR
    /// immediate forms.
    fn decode_control_mem(&mut self, cr: ControlReg) -> Result<Op> {
        let c = self.byte()?;
        let d = self.byte()?;
        if cr == ControlReg::Exr {
            let imm_op = match c {
                0x04 => Some(LogicOp::Or),
                0x05 => Some(LogicOp::Xor),
                0x06 => Some(LogicOp::And),
                _ => None,
            };
            if let Some(op) = imm_op {
                return Ok(Op::ControlLogic {
                    op,
                    imm: d,
                    dst: cr,
                });
            }
            if c == 0x07 {
                return Ok(Op::Ldc {
                    src: Operand::Imm(d as u32),
                    dst: cr,
                });
            }
        }

        let store = d & 0x80 != 0;
        let ea = match c {
            0x6B => {
                self.expect(d & 0x5F == 0)?;
                let addr = if d & 0x20 != 0 {
                    self.abs32()?
                } else {
                    self.abs16()?
                };
                Ea::Abs(addr)
            }
            0x6D => {
                self.expect(d & 0x0F == 0)?;
                let reg = (d >> 4) & 7;
                if store {
                    Ea::PreDec(reg)
                } else {
                    Ea::PostInc(reg)
                }
            }
            0x69 => {
                self.expect(d & 0x0F == 0)?;
                Ea::Indirect((d >> 4) & 7)
            }
            0x6F => {
                self.expect(d & 0x0F == 0)?;
                let disp = Size::Word.sign_extend(self.word()? as u32);
                Ea::Disp {
                    base: (d >> 4) & 7,
                    disp,
                }
            }
            0x78 => {
                self.expect(d & 0x0F == 0)?;
                let e = self.byte()?;
                let f = self.byte()?;
                self.expect(e == 0x6B && f & 0x7F == 0x20)?;
                let disp = self.long()?;
                return Ok(control_transfer(
                    cr,
                    f & 0x80 != 0,
                    Ea::Disp {
                        base: (d >> 4) & 7,
                        disp,
                    },
                ));
            }
            _ => return self.illegal(),
        };
        Ok(control_transfer(cr, store, ea))
    }
}

fn control_transfer(cr: ControlReg, store: bool, ea: Ea) -> Op {
    if store {
        Op::Stc {
            src: cr,
            dst: Operand::Mem(ea),
        }
    } else {
        Op::Ldc {
            src: Operand::Mem(ea),
            dst: cr,
        }
    }
}
