//! Instruction decoder.
//!
//! Decoding walks a fixed dispatch tree keyed on the high nibble of the
//! first opcode byte and then on successive bytes. Each leaf knows how many
//! extension bytes it consumes and produces a value-typed [`Instruction`].
//! No register, flag or memory state is modified here; the only side effect
//! is whatever the [`Fetch`] implementation does to read bytes.

mod bits;
mod branch;
mod misc;
mod transfer;
#[cfg(test)]
mod tests;

use crate::bus::Bus;
use crate::error::{Access, CpuError, Result};
use crate::instruction::{
    AluOp, Cond, Ea, Instruction, Op, Operand, Size, MAX_INSTRUCTION_LEN,
};
use crate::memory::ADDRESS_MASK;

/// Source of instruction bytes.
pub trait Fetch {
    fn fetch8(&mut self, addr: u32) -> Result<u8>;
}

/// Fetches through [`Bus::peek8`], leaving the machine untouched.
pub struct PeekFetch<'a, B: ?Sized>(pub &'a B);

impl<B: Bus + ?Sized> Fetch for PeekFetch<'_, B> {
    fn fetch8(&mut self, addr: u32) -> Result<u8> {
        self.0.peek8(addr)
    }
}

/// Fetches from a byte slice mapped at address 0.
impl Fetch for [u8] {
    fn fetch8(&mut self, addr: u32) -> Result<u8> {
        self.get(addr as usize)
            .copied()
            .ok_or(CpuError::OutOfRange {
                addr,
                access: Access::read(8),
            })
    }
}

/// Decode the instruction at `pc`. The low bit of `pc` is ignored.
pub fn decode<F: Fetch + ?Sized>(fetch: &mut F, pc: u32) -> Result<Instruction> {
    let mut decoder = Decoder::new(fetch, pc & ADDRESS_MASK & !1);
    let op = decoder.decode_op()?;
    Ok(Instruction::new(decoder.start, op, decoder.consumed()))
}

pub(crate) struct Decoder<'f, F: ?Sized> {
    fetch: &'f mut F,
    start: u32,
    raw: [u8; MAX_INSTRUCTION_LEN],
    len: usize,
}

impl<'f, F: Fetch + ?Sized> Decoder<'f, F> {
    fn new(fetch: &'f mut F, start: u32) -> Self {
        Self {
            fetch,
            start,
            raw: [0; MAX_INSTRUCTION_LEN],
            len: 0,
        }
    }

    fn consumed(&self) -> &[u8] {
        &self.raw[..self.len]
    }

    /// Address just past the bytes consumed so far.
    #[inline]
    fn pc(&self) -> u32 {
        self.start.wrapping_add(self.len as u32)
    }

    fn byte(&mut self) -> Result<u8> {
        if self.len == MAX_INSTRUCTION_LEN {
            return self.illegal();
        }
        let value = self.fetch.fetch8(self.pc())?;
        self.raw[self.len] = value;
        self.len += 1;
        Ok(value)
    }

    fn word(&mut self) -> Result<u16> {
        let hi = self.byte()?;
        let lo = self.byte()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn long(&mut self) -> Result<u32> {
        let hi = self.word()? as u32;
        let lo = self.word()? as u32;
        Ok(hi << 16 | lo)
    }

    /// 16-bit absolute address, sign-extended into the 24-bit space.
    fn abs16(&mut self) -> Result<u32> {
        Ok(Size::Word.sign_extend(self.word()? as u32) & ADDRESS_MASK)
    }

    fn abs32(&mut self) -> Result<u32> {
        Ok(self.long()? & ADDRESS_MASK)
    }

    /// Resolve a PC-relative branch target against the end of the
    /// instruction.
    fn branch_target(&self, disp: u32) -> u32 {
        self.pc().wrapping_add(disp) & ADDRESS_MASK
    }

    fn illegal<T>(&self) -> Result<T> {
        Err(CpuError::IllegalInstruction {
            pc: self.start,
            bytes: self.consumed().to_vec(),
        })
    }

    /// Fail unless `ok` holds.
    #[inline]
    fn expect(&self, ok: bool) -> Result<()> {
        if ok {
            Ok(())
        } else {
            self.illegal()
        }
    }

    fn decode_op(&mut self) -> Result<Op> {
        let op = self.byte()?;
        let lo = op & 0x0F;
        match op >> 4 {
            0x0 => self.decode_group0(lo),
            0x1 => self.decode_group1(lo),
            // MOV.B @aa:8,Rd / MOV.B Rs,@aa:8
            0x2 | 0x3 => {
                let addr = 0xFF_FF00 | self.byte()? as u32;
                let mem = Operand::Mem(Ea::Abs(addr));
                let reg = Operand::Reg(lo);
                let (src, dst) = if op >> 4 == 0x2 {
                    (mem, reg)
                } else {
                    (reg, mem)
                };
                Ok(Op::Mov {
                    size: Size::Byte,
                    src,
                    dst,
                })
            }
            // Bcc d:8
            0x4 => {
                let disp = self.byte()? as i8 as i32 as u32;
                Ok(Op::Bcc {
                    cond: Cond::from_bits(lo),
                    target: self.branch_target(disp),
                    wide: false,
                })
            }
            0x5 => self.decode_group5(lo),
            0x6 => self.decode_group6(lo),
            0x7 => self.decode_group7(lo),
            0xF => {
                let imm = self.byte()? as u32;
                Ok(Op::Mov {
                    size: Size::Byte,
                    src: Operand::Imm(imm),
                    dst: Operand::Reg(lo),
                })
            }
            hi => {
                let alu = match hi {
                    0x8 => AluOp::Add,
                    0x9 => AluOp::Addx,
                    0xA => AluOp::Cmp,
                    0xB => AluOp::Subx,
                    0xC => AluOp::Or,
                    0xD => AluOp::Xor,
                    _ => AluOp::And,
                };
                let imm = self.byte()? as u32;
                Ok(Op::Alu {
                    op: alu,
                    size: Size::Byte,
                    src: Operand::Imm(imm),
                    dst: lo,
                })
            }
        }
    }

    /// Register-to-register ALU op with both indices packed in one byte.
    fn alu_rr(&mut self, op: AluOp, size: Size) -> Result<Op> {
        let regs = self.byte()?;
        Ok(Op::Alu {
            op,
            size,
            src: Operand::Reg(regs >> 4),
            dst: regs & 0x0F,
        })
    }

    /// `1sss 0ddd` register pair of a long operation.
    fn long_pair(&self, regs: u8) -> Result<(u8, u8)> {
        self.expect(regs & 0x88 == 0x80)?;
        Ok(((regs >> 4) & 7, regs & 7))
    }
}
