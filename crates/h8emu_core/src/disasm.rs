//! Text rendering of decoded instructions.
//!
//! The disassembler only ever sees [`Instruction`] values, so tracing and
//! listings share the decoder with the executor instead of re-deriving
//! operands on their own.

mod symbols;
#[cfg(test)]
mod tests;

pub use symbols::{register_name, REGISTER_PAGE};

use std::fmt::Write;

use crate::config::DisasmConfig;
use crate::instruction::{
    AluOp, BitNum, BitOp, BitTarget, Cond, ControlReg, Ea, Instruction, JumpTarget, LogicOp,
    MulDivOp, Op, Operand, ShiftOp, Size, UnaryOp,
};

const STACK_POINTER: u8 = 7;

/// Width of the raw-bytes column when bytes are shown.
const BYTES_COLUMN: usize = 21;

/// Instruction formatter configured once at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Disassembler {
    config: DisasmConfig,
}

impl Disassembler {
    pub fn new(config: DisasmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DisasmConfig {
        &self.config
    }

    /// Mnemonic and operands, e.g. `MOV.B R0L,@-ER7`.
    pub fn format(&self, insn: &Instruction) -> String {
        let (mnemonic, operands) = self.render(&insn.op);
        if operands.is_empty() {
            mnemonic
        } else {
            format!("{} {}", mnemonic, operands)
        }
    }

    /// A listing line: address, optional raw bytes, text.
    pub fn format_line(&self, insn: &Instruction) -> String {
        self.line(insn, 0)
    }

    /// A listing line indented by call depth when configured to.
    pub fn trace_line(&self, insn: &Instruction, depth: i32) -> String {
        let depth = if self.config.indent_calls {
            depth.max(0) as usize
        } else {
            0
        };
        self.line(insn, depth)
    }

    fn line(&self, insn: &Instruction, depth: usize) -> String {
        let mut line = format!("{:06X}: ", insn.addr);
        for _ in 0..depth {
            line.push_str("  ");
        }
        if self.config.show_bytes {
            let mut bytes = String::new();
            for b in insn.bytes() {
                let _ = write!(bytes, "{:02X} ", b);
            }
            let _ = write!(line, "{:<width$}", bytes, width = BYTES_COLUMN);
        }
        line.push_str(&self.format(insn));
        line
    }

    fn render(&self, op: &Op) -> (String, String) {
        match *op {
            Op::Nop => ("NOP".into(), String::new()),
            Op::Sleep => ("SLEEP".into(), String::new()),
            Op::Rts => ("RTS".into(), String::new()),
            Op::Rte => ("RTE".into(), String::new()),
            Op::Mov { size, src, dst } => self.render_mov(size, src, dst),
            Op::Alu { op, size, src, dst } => (
                sized(alu_name(op), size),
                format!("{},{}", self.operand(size, src), reg_name(size, dst)),
            ),
            Op::Adds { amount, dst } => ("ADDS".into(), format!("#{},{}", amount, long_reg(dst))),
            Op::Subs { amount, dst } => ("SUBS".into(), format!("#{},{}", amount, long_reg(dst))),
            Op::Inc { size, amount, dst } => (sized("INC", size), stepped(size, amount, dst)),
            Op::Dec { size, amount, dst } => (sized("DEC", size), stepped(size, amount, dst)),
            Op::Unary { op, size, dst } => (sized(unary_name(op), size), reg_name(size, dst)),
            Op::Daa(r) => ("DAA".into(), byte_reg(r).into()),
            Op::Das(r) => ("DAS".into(), byte_reg(r).into()),
            Op::MulDiv { op, size, src, dst } => {
                let wide = match size {
                    Size::Byte => Size::Word,
                    _ => Size::Long,
                };
                (
                    sized(muldiv_name(op), size),
                    format!("{},{}", reg_name(size, src), reg_name(wide, dst)),
                )
            }
            Op::Shift {
                op,
                size,
                count,
                dst,
            } => {
                let operands = if count == 1 {
                    reg_name(size, dst)
                } else {
                    format!("#{},{}", count, reg_name(size, dst))
                };
                (sized(shift_name(op), size), operands)
            }
            Op::Bit { op, bit, target } => {
                let bit = match bit {
                    BitNum::Imm(n) => format!("#{}", n),
                    BitNum::Reg(r) => byte_reg(r).into(),
                };
                let target = match target {
                    BitTarget::Reg(r) => byte_reg(r).into(),
                    BitTarget::Mem(ea) => self.ea(ea),
                };
                (bit_name(op).into(), format!("{},{}", bit, target))
            }
            Op::Bcc { cond, target, .. } => (cond_name(cond).into(), format!("0x{:06X}", target)),
            Op::Bsr { target, .. } => ("BSR".into(), format!("0x{:06X}", target)),
            Op::Jmp(target) => ("JMP".into(), jump_target(target)),
            Op::Jsr(target) => ("JSR".into(), jump_target(target)),
            Op::Trapa(n) => ("TRAPA".into(), format!("#{}", n)),
            Op::Ldc { src, dst } => {
                let (mnemonic, src) = match src {
                    Operand::Reg(r) => ("LDC.B", byte_reg(r).to_string()),
                    Operand::Imm(imm) => ("LDC", format!("#0x{:02X}", imm as u8)),
                    Operand::Mem(ea) => ("LDC.W", self.ea(ea)),
                };
                (mnemonic.into(), format!("{},{}", src, control_name(dst)))
            }
            Op::Stc { src, dst } => {
                let (mnemonic, dst) = match dst {
                    Operand::Mem(ea) => ("STC.W", self.ea(ea)),
                    other => ("STC.B", self.operand(Size::Byte, other)),
                };
                (mnemonic.into(), format!("{},{}", control_name(src), dst))
            }
            Op::ControlLogic { op, imm, dst } => {
                let mnemonic = match op {
                    LogicOp::And => "ANDC",
                    LogicOp::Or => "ORC",
                    LogicOp::Xor => "XORC",
                };
                (mnemonic.into(), format!("#0x{:02X},{}", imm, control_name(dst)))
            }
            Op::Ldm { last, count } => (
                "LDM.L".into(),
                format!("@SP+,{}", reg_list(last + 1 - count, last)),
            ),
            Op::Stm { first, count } => (
                "STM.L".into(),
                format!("{},@-SP", reg_list(first, first + count - 1)),
            ),
            Op::Tas(r) => ("TAS".into(), format!("@{}", long_reg(r))),
            Op::Eepmov(size) => (sized("EEPMOV", size), String::new()),
        }
    }

    fn render_mov(&self, size: Size, src: Operand, dst: Operand) -> (String, String) {
        match (size, src, dst) {
            (Size::Word | Size::Long, Operand::Reg(r), Operand::Mem(Ea::PreDec(STACK_POINTER))) => {
                (sized("PUSH", size), reg_name(size, r))
            }
            (Size::Word | Size::Long, Operand::Mem(Ea::PostInc(STACK_POINTER)), Operand::Reg(r)) => {
                (sized("POP", size), reg_name(size, r))
            }
            _ => (
                sized("MOV", size),
                format!("{},{}", self.operand(size, src), self.operand(size, dst)),
            ),
        }
    }

    fn operand(&self, size: Size, operand: Operand) -> String {
        match operand {
            Operand::Reg(r) => reg_name(size, r),
            Operand::Imm(imm) => match size {
                Size::Byte => format!("#0x{:02X}", imm & 0xFF),
                Size::Word => format!("#0x{:04X}", imm & 0xFFFF),
                Size::Long => format!("#0x{:08X}", imm),
            },
            Operand::Mem(ea) => self.ea(ea),
        }
    }

    fn ea(&self, ea: Ea) -> String {
        match ea {
            Ea::Indirect(r) => format!("@{}", long_reg(r)),
            Ea::PostInc(r) => format!("@{}+", long_reg(r)),
            Ea::PreDec(r) => format!("@-{}", long_reg(r)),
            Ea::Disp { base, disp } => {
                let disp = disp as i32;
                if disp < 0 {
                    format!("@(-0x{:X},{})", disp.unsigned_abs(), long_reg(base))
                } else {
                    format!("@(0x{:X},{})", disp, long_reg(base))
                }
            }
            Ea::Abs(addr) => match self.symbol(addr) {
                Some(name) => format!("@{}", name),
                None => format!("@0x{:06X}", addr),
            },
        }
    }

    fn symbol(&self, addr: u32) -> Option<&'static str> {
        if self.config.symbolic_names {
            register_name(addr)
        } else {
            None
        }
    }
}

fn sized(mnemonic: &str, size: Size) -> String {
    format!("{}.{}", mnemonic, size.suffix())
}

fn stepped(size: Size, amount: u8, dst: u8) -> String {
    if size == Size::Byte {
        reg_name(size, dst)
    } else {
        format!("#{},{}", amount, reg_name(size, dst))
    }
}

fn jump_target(target: JumpTarget) -> String {
    match target {
        JumpTarget::Reg(r) => format!("@{}", long_reg(r)),
        JumpTarget::Abs(addr) => format!("@0x{:06X}", addr),
        JumpTarget::MemIndirect(aa) => format!("@@0x{:X}", aa),
    }
}

fn reg_list(first: u8, last: u8) -> String {
    format!("({}-{})", long_reg(first), long_reg(last))
}

pub fn byte_reg(id: u8) -> &'static str {
    const NAMES: [&str; 16] = [
        "R0H", "R1H", "R2H", "R3H", "R4H", "R5H", "R6H", "R7H", "R0L", "R1L", "R2L", "R3L",
        "R4L", "R5L", "R6L", "R7L",
    ];
    NAMES[(id & 15) as usize]
}

pub fn word_reg(id: u8) -> &'static str {
    const NAMES: [&str; 16] = [
        "R0", "R1", "R2", "R3", "R4", "R5", "R6", "R7", "E0", "E1", "E2", "E3", "E4", "E5", "E6",
        "E7",
    ];
    NAMES[(id & 15) as usize]
}

pub fn long_reg(id: u8) -> &'static str {
    const NAMES: [&str; 8] = ["ER0", "ER1", "ER2", "ER3", "ER4", "ER5", "ER6", "ER7"];
    NAMES[(id & 7) as usize]
}

fn reg_name(size: Size, id: u8) -> String {
    match size {
        Size::Byte => byte_reg(id),
        Size::Word => word_reg(id),
        Size::Long => long_reg(id),
    }
    .to_string()
}

fn control_name(cr: ControlReg) -> &'static str {
    match cr {
        ControlReg::Ccr => "CCR",
        ControlReg::Exr => "EXR",
    }
}

fn alu_name(op: AluOp) -> &'static str {
    match op {
        AluOp::Add => "ADD",
        AluOp::Addx => "ADDX",
        AluOp::Sub => "SUB",
        AluOp::Subx => "SUBX",
        AluOp::Cmp => "CMP",
        AluOp::And => "AND",
        AluOp::Or => "OR",
        AluOp::Xor => "XOR",
    }
}

fn unary_name(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "NEG",
        UnaryOp::Not => "NOT",
        UnaryOp::Extu => "EXTU",
        UnaryOp::Exts => "EXTS",
    }
}

fn muldiv_name(op: MulDivOp) -> &'static str {
    match op {
        MulDivOp::Mulxu => "MULXU",
        MulDivOp::Mulxs => "MULXS",
        MulDivOp::Divxu => "DIVXU",
        MulDivOp::Divxs => "DIVXS",
    }
}

fn shift_name(op: ShiftOp) -> &'static str {
    match op {
        ShiftOp::Shal => "SHAL",
        ShiftOp::Shll => "SHLL",
        ShiftOp::Shar => "SHAR",
        ShiftOp::Shlr => "SHLR",
        ShiftOp::Rotl => "ROTL",
        ShiftOp::Rotxl => "ROTXL",
        ShiftOp::Rotr => "ROTR",
        ShiftOp::Rotxr => "ROTXR",
    }
}

fn bit_name(op: BitOp) -> &'static str {
    match op {
        BitOp::Bset => "BSET",
        BitOp::Bnot => "BNOT",
        BitOp::Bclr => "BCLR",
        BitOp::Btst => "BTST",
        BitOp::Bst => "BST",
        BitOp::Bist => "BIST",
        BitOp::Bor => "BOR",
        BitOp::Bior => "BIOR",
        BitOp::Bxor => "BXOR",
        BitOp::Bixor => "BIXOR",
        BitOp::Band => "BAND",
        BitOp::Biand => "BIAND",
        BitOp::Bld => "BLD",
        BitOp::Bild => "BILD",
    }
}

fn cond_name(cond: Cond) -> &'static str {
    match cond {
        Cond::Always => "BRA",
        Cond::Never => "BRN",
        Cond::Hi => "BHI",
        Cond::Ls => "BLS",
        Cond::Cc => "BCC",
        Cond::Cs => "BCS",
        Cond::Ne => "BNE",
        Cond::Eq => "BEQ",
        Cond::Vc => "BVC",
        Cond::Vs => "BVS",
        Cond::Pl => "BPL",
        Cond::Mi => "BMI",
        Cond::Ge => "BGE",
        Cond::Lt => "BLT",
        Cond::Gt => "BGT",
        Cond::Le => "BLE",
    }
}
