//! Bit manipulation encodings.

use super::{Decoder, Fetch};
use crate::error::Result;
use crate::instruction::{BitNum, BitOp, BitTarget, Ea, Op};

/// Pick the plain or inverted form of a carry-flag bit op.
fn carry_op(code: u8, inverted: bool) -> Option<BitOp> {
    Some(match (code, inverted) {
        (0x4, false) => BitOp::Bor,
        (0x4, true) => BitOp::Bior,
        (0x5, false) => BitOp::Bxor,
        (0x5, true) => BitOp::Bixor,
        (0x6, false) => BitOp::Band,
        (0x6, true) => BitOp::Biand,
        (0x7, false) => BitOp::Bld,
        (0x7, true) => BitOp::Bild,
        _ => return None,
    })
}

impl<F: Fetch + ?Sized> Decoder<'_, F> {
    /// 0x70–0x77: `#imm,Rd` forms.
    pub(super) fn decode_register_bit_op(&mut self, lo: u8) -> Result<Op> {
        let b = self.byte()?;
        let target = BitTarget::Reg(b & 0x0F);
        let op = match lo {
            0x0..=0x3 => {
                self.expect(b & 0x80 == 0)?;
                match lo {
                    0x0 => BitOp::Bset,
                    0x1 => BitOp::Bnot,
                    0x2 => BitOp::Bclr,
                    _ => BitOp::Btst,
                }
            }
            _ => match carry_op(lo, b & 0x80 != 0) {
                Some(op) => op,
                None => return self.illegal(),
            },
        };
        Ok(Op::Bit {
            op,
            bit: BitNum::Imm((b >> 4) & 7),
            target,
        })
    }

    /// The trailing two bytes of a memory bit op. `modify` selects the
    /// write-back group (BSET/BNOT/BCLR/BST/BIST) over the test group.
    pub(super) fn decode_memory_bit_op(&mut self, ea: Ea, modify: bool) -> Result<Op> {
        let c = self.byte()?;
        let d = self.byte()?;
        self.expect(d & 0x0F == 0)?;
        let inverted = d & 0x80 != 0;
        let imm = BitNum::Imm((d >> 4) & 7);
        let reg = BitNum::Reg(d >> 4);
        let (op, bit) = if modify {
            match c {
                0x60 => (BitOp::Bset, reg),
                0x61 => (BitOp::Bnot, reg),
                0x62 => (BitOp::Bclr, reg),
                0x67 if inverted => (BitOp::Bist, imm),
                0x67 => (BitOp::Bst, imm),
                0x70 if !inverted => (BitOp::Bset, imm),
                0x71 if !inverted => (BitOp::Bnot, imm),
                0x72 if !inverted => (BitOp::Bclr, imm),
                _ => return self.illegal(),
            }
        } else {
            match c {
                0x63 => (BitOp::Btst, reg),
                0x73 if !inverted => (BitOp::Btst, imm),
                0x74..=0x77 => match carry_op(c & 0x0F, inverted) {
                    Some(op) => (op, imm),
                    None => return self.illegal(),
                },
                _ => return self.illegal(),
            }
        };
        Ok(Op::Bit {
            op,
            bit,
            target: BitTarget::Mem(ea),
        })
    }
}
