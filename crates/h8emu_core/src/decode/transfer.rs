//! Data transfer encodings: the 0x6x / 0x7x pages, immediates and MOV.L.

use super::{Decoder, Fetch};
use crate::error::Result;
use crate::instruction::{AluOp, BitNum, BitOp, BitTarget, Ea, Op, Operand, Size};

/// Load or store between a register and a memory operand.
fn transfer(size: Size, store: bool, reg: u8, ea: Ea) -> Op {
    let (src, dst) = if store {
        (Operand::Reg(reg), Operand::Mem(ea))
    } else {
        (Operand::Mem(ea), Operand::Reg(reg))
    };
    Op::Mov { size, src, dst }
}

impl<F: Fetch + ?Sized> Decoder<'_, F> {
    pub(super) fn decode_group6(&mut self, lo: u8) -> Result<Op> {
        match lo {
            0x0..=0x3 => {
                let regs = self.byte()?;
                let op = match lo {
                    0x0 => BitOp::Bset,
                    0x1 => BitOp::Bnot,
                    0x2 => BitOp::Bclr,
                    _ => BitOp::Btst,
                };
                Ok(Op::Bit {
                    op,
                    bit: BitNum::Reg(regs >> 4),
                    target: BitTarget::Reg(regs & 0x0F),
                })
            }
            0x4 => self.alu_rr(AluOp::Or, Size::Word),
            0x5 => self.alu_rr(AluOp::Xor, Size::Word),
            0x6 => self.alu_rr(AluOp::And, Size::Word),
            0x7 => {
                let b = self.byte()?;
                let op = if b & 0x80 != 0 {
                    BitOp::Bist
                } else {
                    BitOp::Bst
                };
                Ok(Op::Bit {
                    op,
                    bit: BitNum::Imm((b >> 4) & 7),
                    target: BitTarget::Reg(b & 0x0F),
                })
            }
            0xA => self.decode_page6a(),
            0xB => {
                let b = self.byte()?;
                let addr = match b >> 4 {
                    0x0 | 0x8 => self.abs16()?,
                    0x2 | 0xA => self.abs32()?,
                    _ => return self.illegal(),
                };
                Ok(transfer(Size::Word, b & 0x80 != 0, b & 0x0F, Ea::Abs(addr)))
            }
            // 0x68/0x69 @ERn, 0x6C/0x6D @ERn+ / @-ERn, 0x6E/0x6F @(d:16,ERn)
            _ => {
                let size = if lo & 1 == 0 { Size::Byte } else { Size::Word };
                let r = self.byte()?;
                let (pointer, store, data) = ((r >> 4) & 7, r & 0x80 != 0, r & 0x0F);
                let ea = match lo {
                    0x8 | 0x9 => Ea::Indirect(pointer),
                    0xC | 0xD if store => Ea::PreDec(pointer),
                    0xC | 0xD => Ea::PostInc(pointer),
                    _ => Ea::Disp {
                        base: pointer,
                        disp: Size::Word.sign_extend(self.word()? as u32),
                    },
                };
                Ok(transfer(size, store, data, ea))
            }
        }
    }

    /// 0x6A: MOV.B with absolute addresses, and bit ops on @aa:16/@aa:32.
    fn decode_page6a(&mut self) -> Result<Op> {
        let b = self.byte()?;
        match b >> 4 {
            0x0 | 0x8 => {
                let addr = self.abs16()?;
                Ok(transfer(Size::Byte, b & 0x80 != 0, b & 0x0F, Ea::Abs(addr)))
            }
            0x2 | 0xA => {
                let addr = self.abs32()?;
                Ok(transfer(Size::Byte, b & 0x80 != 0, b & 0x0F, Ea::Abs(addr)))
            }
            0x1 | 0x3 => {
                self.expect(b & 7 == 0)?;
                let addr = if b >> 4 == 0x1 {
                    self.abs16()?
                } else {
                    self.abs32()?
                };
                self.decode_memory_bit_op(Ea::Abs(addr), b & 8 != 0)
            }
            _ => self.illegal(),
        }
    }

    pub(super) fn decode_group7(&mut self, lo: u8) -> Result<Op> {
        match lo {
            0x0..=0x7 => self.decode_register_bit_op(lo),
            0x8 => self.decode_mov_disp32(),
            0x9 | 0xA => {
                let b = self.byte()?;
                let size = if lo == 0x9 { Size::Word } else { Size::Long };
                let dst = b & 0x0F;
                if size == Size::Long {
                    self.expect(dst < 8)?;
                }
                let alu = match b >> 4 {
                    0x0 => None,
                    0x1 => Some(AluOp::Add),
                    0x2 => Some(AluOp::Cmp),
                    0x3 => Some(AluOp::Sub),
                    0x4 => Some(AluOp::Or),
                    0x5 => Some(AluOp::Xor),
                    0x6 => Some(AluOp::And),
                    _ => return self.illegal(),
                };
                let imm = match size {
                    Size::Long => self.long()?,
                    _ => self.word()? as u32,
                };
                Ok(match alu {
                    None => Op::Mov {
                        size,
                        src: Operand::Imm(imm),
                        dst: Operand::Reg(dst),
                    },
                    Some(op) => Op::Alu {
                        op,
                        size,
                        src: Operand::Imm(imm),
                        dst,
                    },
                })
            }
            0xB => {
                let size = match self.byte()? {
                    0x5C => Size::Byte,
                    0xD4 => Size::Word,
                    _ => return self.illegal(),
                };
                let tail = self.word()?;
                self.expect(tail == 0x598F)?;
                Ok(Op::Eepmov(size))
            }
            // 0x7C/0x7D @ERn, 0x7E/0x7F @aa:8
            _ => {
                let b = self.byte()?;
                let ea = if lo >= 0xE {
                    Ea::Abs(0xFF_FF00 | b as u32)
                } else {
                    self.expect(b & 0x8F == 0)?;
                    Ea::Indirect(b >> 4)
                };
                self.decode_memory_bit_op(ea, lo & 1 != 0)
            }
        }
    }

    /// 0x78: MOV.B / MOV.W with a 32-bit displacement.
    fn decode_mov_disp32(&mut self) -> Result<Op> {
        let r = self.byte()?;
        self.expect(r & 0x8F == 0)?;
        let x = self.byte()?;
        self.expect(x & 0xFE == 0x6A)?;
        let size = if x & 1 != 0 { Size::Word } else { Size::Byte };
        let y = self.byte()?;
        self.expect((y >> 4) & 7 == 2)?;
        let disp = self.long()?;
        Ok(transfer(
            size,
            y & 0x80 != 0,
            y & 0x0F,
            Ea::Disp { base: r >> 4, disp },
        ))
    }

    /// `01 00` prefixed MOV.L forms.
    pub(super) fn decode_mov_long(&mut self) -> Result<Op> {
        let c = self.byte()?;
        let d = self.byte()?;
        if c == 0x6B {
            self.expect(d & 0x58 == 0)?;
            let addr = if d & 0x20 != 0 {
                self.abs32()?
            } else {
                self.abs16()?
            };
            return Ok(transfer(Size::Long, d & 0x80 != 0, d & 7, Ea::Abs(addr)));
        }
        self.expect(d & 0x08 == 0)?;
        let (pointer, store, data) = ((d >> 4) & 7, d & 0x80 != 0, d & 7);
        let ea = match c {
            0x69 => Ea::Indirect(pointer),
            0x6D if store => Ea::PreDec(pointer),
            0x6D => Ea::PostInc(pointer),
            0x6F => Ea::Disp {
                base: pointer,
                disp: Size::Word.sign_extend(self.word()? as u32),
            },
            0x78 => {
                self.expect(d & 0x8F == 0)?;
                let e = self.byte()?;
                let f = self.byte()?;
                self.expect(e == 0x6B && f & 0x58 == 0 && f & 0x20 != 0)?;
                let disp = self.long()?;
                return Ok(transfer(
                    Size::Long,
                    f & 0x80 != 0,
                    f & 7,
                    Ea::Disp {
                        base: pointer,
                        disp,
                    },
                ));
            }
            _ => return self.illegal(),
        };
        Ok(transfer(Size::Long, store, data, ea))
    }
}
