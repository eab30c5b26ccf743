use crate::bus::Bus;
use crate::cpu::{Ccr, Cpu};
use crate::error::Result;
use crate::instruction::{BitNum, BitOp, BitTarget, Size};

impl Cpu {
    /// Single-bit operations on a byte register or a byte in memory.
    ///
    /// BTST reports the inverted bit in Z; the load and logic forms work on
    /// C; BSET/BCLR/BNOT/BST/BIST write the byte back and leave the flags
    /// alone.
    pub(super) fn exec_bit<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        op: BitOp,
        bit: BitNum,
        target: BitTarget,
    ) -> Result<()> {
        let index = match bit {
            BitNum::Imm(n) => n & 7,
            BitNum::Reg(r) => self.regs.read_byte(r) & 7,
        };
        let mask = 1u8 << index;

        // Memory operands are resolved once; the write-back reuses the address.
        let location = match target {
            BitTarget::Reg(r) => Location::Reg(r),
            BitTarget::Mem(ea) => Location::Mem(self.resolve(ea, Size::Byte)),
        };
        let byte = match location {
            Location::Reg(r) => self.regs.read_byte(r),
            Location::Mem(addr) => self.read8(bus, addr)?,
        };
        let set = byte & mask != 0;
        let carry = self.regs.flag(Ccr::C);

        let updated = match op {
            BitOp::Bset => byte | mask,
            BitOp::Bclr => byte & !mask,
            BitOp::Bnot => byte ^ mask,
            BitOp::Bst => store_bit(byte, mask, carry),
            BitOp::Bist => store_bit(byte, mask, !carry),
            BitOp::Btst => {
                self.regs.set_flag(Ccr::Z, !set);
                return Ok(());
            }
            _ => {
                let result = match op {
                    BitOp::Bld => set,
                    BitOp::Bild => !set,
                    BitOp::Bor => carry | set,
                    BitOp::Bior => carry | !set,
                    BitOp::Bxor => carry ^ set,
                    BitOp::Bixor => carry ^ !set,
                    BitOp::Band => carry & set,
                    _ => carry & !set,
                };
                self.regs.set_flag(Ccr::C, result);
                return Ok(());
            }
        };

        match location {
            Location::Reg(r) => {
                self.regs.write_byte(r, updated);
                Ok(())
            }
            Location::Mem(addr) => self.write8(bus, addr, updated),
        }
    }
}

#[derive(Clone, Copy)]
enum Location {
    Reg(u8),
    Mem(u32),
}

#[inline]
fn store_bit(byte: u8, mask: u8, value: bool) -> u8 {
    if value {
        byte | mask
    } else {
        byte & !mask
    }
}
