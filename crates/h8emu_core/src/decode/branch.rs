//! Opcodes 0x50–0x5F: unsigned multiply/divide and control flow.

use super::{Decoder, Fetch};
use crate::error::Result;
use crate::instruction::{Cond, JumpTarget, MulDivOp, Op, Size};

impl<F: Fetch + ?Sized> Decoder<'_, F> {
    pub(super) fn decode_group5(&mut self, lo: u8) -> Result<Op> {
        match lo {
            0x0..=0x3 => {
                let regs = self.byte()?;
                let (src, dst) = (regs >> 4, regs & 0x0F);
                let op = if lo & 1 == 0 {
                    MulDivOp::Mulxu
                } else {
                    MulDivOp::Divxu
                };
                let size = if lo < 0x2 { Size::Byte } else { Size::Word };
                if size == Size::Word {
                    self.expect(dst < 8)?;
                }
                Ok(Op::MulDiv { op, size, src, dst })
            }
            0x4 | 0x6 => {
                let b = self.byte()?;
                self.expect(b == 0x70)?;
                Ok(if lo == 0x4 { Op::Rts } else { Op::Rte })
            }
            0x5 => {
                let disp = Size::Byte.sign_extend(self.byte()? as u32);
                Ok(Op::Bsr {
                    target: self.branch_target(disp),
                    wide: false,
                })
            }
            0x7 => {
                let b = self.byte()?;
                self.expect(b & 0xCF == 0)?;
                Ok(Op::Trapa(b >> 4))
            }
            0x8 => {
                let b = self.byte()?;
                self.expect(b & 0x0F == 0)?;
                let disp = Size::Word.sign_extend(self.word()? as u32);
                Ok(Op::Bcc {
                    cond: Cond::from_bits(b >> 4),
                    target: self.branch_target(disp),
                    wide: true,
                })
            }
            0xC => {
                let b = self.byte()?;
                self.expect(b == 0)?;
                let disp = Size::Word.sign_extend(self.word()? as u32);
                Ok(Op::Bsr {
                    target: self.branch_target(disp),
                    wide: true,
                })
            }
            // 0x59–0x5B JMP, 0x5D–0x5F JSR
            _ => {
                let target = self.jump_target(lo & 3)?;
                Ok(if lo < 0xC {
                    Op::Jmp(target)
                } else {
                    Op::Jsr(target)
                })
            }
        }
    }

    fn jump_target(&mut self, mode: u8) -> Result<JumpTarget> {
        match mode {
            1 => {
                let b = self.byte()?;
                self.expect(b & 0x8F == 0)?;
                Ok(JumpTarget::Reg(b >> 4))
            }
            2 => {
                let hi = self.byte()? as u32;
                let mid = self.byte()? as u32;
                let lo = self.byte()? as u32;
                Ok(JumpTarget::Abs(hi << 16 | mid << 8 | lo))
            }
            _ => Ok(JumpTarget::MemIndirect(self.byte()?)),
        }
    }
}
