//! Value description of a decoded instruction.
//!
//! The decoder produces an [`Instruction`]; the executor and the
//! disassembler both consume the same value, so a single decode path feeds
//! every consumer.

/// Longest encoding in the instruction set (`MOV.L` / `LDC` with a 32-bit
/// displacement).
pub const MAX_INSTRUCTION_LEN: usize = 10;

/// Operand width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Size {
    Byte,
    Word,
    Long,
}

impl Size {
    #[inline]
    pub const fn bytes(self) -> u32 {
        match self {
            Size::Byte => 1,
            Size::Word => 2,
            Size::Long => 4,
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.bytes() * 8
    }

    #[inline]
    pub const fn mask(self) -> u32 {
        match self {
            Size::Byte => 0xFF,
            Size::Word => 0xFFFF,
            Size::Long => 0xFFFF_FFFF,
        }
    }

    #[inline]
    pub const fn sign_bit(self) -> u32 {
        1 << (self.bits() - 1)
    }

    /// Bit whose carry-out is reported as the half-carry flag.
    #[inline]
    pub const fn half_bit(self) -> u32 {
        match self {
            Size::Byte => 0x08,
            Size::Word => 0x0800,
            Size::Long => 0x0800_0000,
        }
    }

    /// Sign-extend the low `bits()` of `value` to 32 bits.
    #[inline]
    pub const fn sign_extend(self, value: u32) -> u32 {
        match self {
            Size::Byte => value as u8 as i8 as i32 as u32,
            Size::Word => value as u16 as i16 as i32 as u32,
            Size::Long => value,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Size::Byte => "B",
            Size::Word => "W",
            Size::Long => "L",
        }
    }
}

/// Memory addressing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ea {
    /// `@ERn`
    Indirect(u8),
    /// `@ERn+`
    PostInc(u8),
    /// `@-ERn`
    PreDec(u8),
    /// `@(d,ERn)`; 16-bit displacements are already sign-extended.
    Disp { base: u8, disp: u32 },
    /// `@aa:8`, `@aa:16` or `@aa:32`, resolved to a 24-bit address.
    Abs(u32),
}

/// A data operand. Register indices select the byte, word or long view
/// according to the instruction's [`Size`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(u8),
    Imm(u32),
    Mem(Ea),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Addx,
    Sub,
    Subx,
    Cmp,
    And,
    Or,
    Xor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Extu,
    Exts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulDivOp {
    Mulxu,
    Mulxs,
    Divxu,
    Divxs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Shal,
    Shll,
    Shar,
    Shlr,
    Rotl,
    Rotxl,
    Rotr,
    Rotxr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOp {
    Bset,
    Bnot,
    Bclr,
    Btst,
    Bst,
    Bist,
    Bor,
    Bior,
    Bxor,
    Bixor,
    Band,
    Biand,
    Bld,
    Bild,
}

impl BitOp {
    /// Whether the operation writes the target byte back.
    pub const fn modifies(self) -> bool {
        matches!(
            self,
            BitOp::Bset | BitOp::Bnot | BitOp::Bclr | BitOp::Bst | BitOp::Bist
        )
    }
}

/// Bit number of a bit instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitNum {
    Imm(u8),
    /// Byte register whose low three bits give the bit number.
    Reg(u8),
}

/// Byte operand of a bit instruction: a byte register, `@ERn` or an
/// absolute address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitTarget {
    Reg(u8),
    Mem(Ea),
}

/// Branch condition, in encoding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Always,
    Never,
    Hi,
    Ls,
    Cc,
    Cs,
    Ne,
    Eq,
    Vc,
    Vs,
    Pl,
    Mi,
    Ge,
    Lt,
    Gt,
    Le,
}

impl Cond {
    pub const fn from_bits(cc: u8) -> Self {
        match cc & 0x0F {
            0x0 => Cond::Always,
            0x1 => Cond::Never,
            0x2 => Cond::Hi,
            0x3 => Cond::Ls,
            0x4 => Cond::Cc,
            0x5 => Cond::Cs,
            0x6 => Cond::Ne,
            0x7 => Cond::Eq,
            0x8 => Cond::Vc,
            0x9 => Cond::Vs,
            0xA => Cond::Pl,
            0xB => Cond::Mi,
            0xC => Cond::Ge,
            0xD => Cond::Lt,
            0xE => Cond::Gt,
            _ => Cond::Le,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpTarget {
    /// `@ERn`
    Reg(u8),
    /// `@aa:24`
    Abs(u32),
    /// `@@aa:8`: the target is the long word stored at this address.
    MemIndirect(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlReg {
    Ccr,
    Exr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

/// Operation and resolved operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    Sleep,
    /// Data transfer. `src` is a register, immediate or memory operand,
    /// `dst` a register or memory operand.
    Mov {
        size: Size,
        src: Operand,
        dst: Operand,
    },
    /// Two-operand arithmetic/logic with a register destination.
    Alu {
        op: AluOp,
        size: Size,
        src: Operand,
        dst: u8,
    },
    Adds {
        amount: u8,
        dst: u8,
    },
    Subs {
        amount: u8,
        dst: u8,
    },
    Inc {
        size: Size,
        amount: u8,
        dst: u8,
    },
    Dec {
        size: Size,
        amount: u8,
        dst: u8,
    },
    Unary {
        op: UnaryOp,
        size: Size,
        dst: u8,
    },
    Daa(u8),
    Das(u8),
    /// `size` is the width of the source register (byte or word).
    MulDiv {
        op: MulDivOp,
        size: Size,
        src: u8,
        dst: u8,
    },
    Shift {
        op: ShiftOp,
        size: Size,
        count: u8,
        dst: u8,
    },
    Bit {
        op: BitOp,
        bit: BitNum,
        target: BitTarget,
    },
    /// `wide` marks the 16-bit displacement form.
    Bcc {
        cond: Cond,
        target: u32,
        wide: bool,
    },
    Bsr {
        target: u32,
        wide: bool,
    },
    Jmp(JumpTarget),
    Jsr(JumpTarget),
    Rts,
    Rte,
    Trapa(u8),
    /// Load a control register from a byte register, immediate or word in
    /// memory.
    Ldc {
        src: Operand,
        dst: ControlReg,
    },
    Stc {
        src: ControlReg,
        dst: Operand,
    },
    /// ANDC / ORC / XORC.
    ControlLogic {
        op: LogicOp,
        imm: u8,
        dst: ControlReg,
    },
    /// Pop `count` registers ending at `last`.
    Ldm {
        last: u8,
        count: u8,
    },
    /// Push `count` registers starting at `first`.
    Stm {
        first: u8,
        count: u8,
    },
    Tas(u8),
    Eepmov(Size),
}

impl Op {
    /// Internal cycles charged on top of the memory access costs.
    pub fn internal_cycles(&self) -> u32 {
        match *self {
            Op::MulDiv { size, .. } => match size {
                Size::Byte => 12,
                _ => 20,
            },
            Op::Mov { src, dst, .. } => {
                let stepped = |o: Operand| {
                    matches!(o, Operand::Mem(Ea::PostInc(_)) | Operand::Mem(Ea::PreDec(_)))
                };
                if stepped(src) || stepped(dst) {
                    2
                } else {
                    0
                }
            }
            Op::Ldc {
                src: Operand::Mem(Ea::PostInc(_)),
                ..
            }
            | Op::Stc {
                dst: Operand::Mem(Ea::PreDec(_)),
                ..
            } => 2,
            Op::Ldm { .. } | Op::Stm { .. } => 1,
            Op::Bcc { wide: true, .. } | Op::Bsr { wide: true, .. } => 2,
            Op::Rts | Op::Rte => 2,
            Op::Jmp(JumpTarget::Abs(_)) | Op::Jmp(JumpTarget::MemIndirect(_)) => 2,
            Op::Jsr(JumpTarget::Abs(_)) => 2,
            Op::Trapa(_) => 4,
            _ => 0,
        }
    }
}

/// A fully decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the first opcode byte.
    pub addr: u32,
    pub op: Op,
    len: u8,
    raw: [u8; MAX_INSTRUCTION_LEN],
}

impl Instruction {
    pub(crate) fn new(addr: u32, op: Op, raw: &[u8]) -> Self {
        let mut bytes = [0; MAX_INSTRUCTION_LEN];
        let len = raw.len().min(MAX_INSTRUCTION_LEN);
        bytes[..len].copy_from_slice(&raw[..len]);
        Self {
            addr,
            op,
            len: len as u8,
            raw: bytes,
        }
    }

    /// Encoded length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The raw encoding.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.raw[..self.len as usize]
    }

    /// Address of the following instruction.
    #[inline]
    pub fn next_pc(&self) -> u32 {
        self.addr.wrapping_add(self.len as u32)
    }
}
