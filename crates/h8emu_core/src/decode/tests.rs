use super::*;
use crate::instruction::{BitNum, BitOp, BitTarget, ControlReg, JumpTarget, MulDivOp, ShiftOp};

/// Decode `bytes` placed at `addr`.
fn decode_at(addr: u32, bytes: &[u8]) -> Result<Instruction> {
    let mut image = vec![0u8; addr as usize + bytes.len()];
    image[addr as usize..].copy_from_slice(bytes);
    decode(&mut image[..], addr)
}

fn op(bytes: &[u8]) -> Op {
    decode_at(0, bytes).unwrap().op
}

fn is_illegal(bytes: &[u8]) -> bool {
    matches!(
        decode_at(0, bytes),
        Err(CpuError::IllegalInstruction { .. })
    )
}

#[test]
fn byte_immediate_load() {
    let insn = decode_at(0x100, &[0xF8, 0x10]).unwrap();
    assert_eq!(insn.addr, 0x100);
    assert_eq!(insn.len(), 2);
    assert_eq!(insn.next_pc(), 0x102);
    assert_eq!(
        insn.op,
        Op::Mov {
            size: Size::Byte,
            src: Operand::Imm(0x10),
            dst: Operand::Reg(8),
        }
    );
}

#[test]
fn odd_pc_fetches_from_even_address() {
    let mut image = vec![0u8; 0x104];
    let insn = decode(&mut image[..], 0x101).unwrap();
    assert_eq!(insn.addr, 0x100);
    assert_eq!(insn.op, Op::Nop);
}

#[test]
fn long_move_with_32_bit_displacement() {
    let insn = decode_at(
        0,
        &[0x01, 0x00, 0x78, 0x10, 0x6B, 0xA2, 0x00, 0x00, 0x12, 0x34],
    )
    .unwrap();
    assert_eq!(insn.len(), 10);
    assert_eq!(
        insn.op,
        Op::Mov {
            size: Size::Long,
            src: Operand::Reg(2),
            dst: Operand::Mem(Ea::Disp {
                base: 1,
                disp: 0x1234,
            }),
        }
    );
}

#[test]
fn sixteen_bit_addresses_are_sign_extended() {
    assert_eq!(
        op(&[0x6A, 0x08, 0x80, 0x00]),
        Op::Mov {
            size: Size::Byte,
            src: Operand::Mem(Ea::Abs(0xFF_8000)),
            dst: Operand::Reg(8),
        }
    );
    assert_eq!(
        op(&[0x6E, 0x18, 0xFF, 0xFC]),
        Op::Mov {
            size: Size::Byte,
            src: Operand::Mem(Ea::Disp {
                base: 1,
                disp: 0xFFFF_FFFC,
            }),
            dst: Operand::Reg(8),
        }
    );
}

#[test]
fn eight_bit_addresses_hit_register_page() {
    assert_eq!(
        op(&[0x38, 0xF5]),
        Op::Mov {
            size: Size::Byte,
            src: Operand::Reg(8),
            dst: Operand::Mem(Ea::Abs(0xFF_FFF5)),
        }
    );
}

#[test]
fn branch_targets_are_relative_to_next_instruction() {
    let insn = decode_at(0x200, &[0x58, 0x60, 0xFF, 0xFC]).unwrap();
    assert_eq!(
        insn.op,
        Op::Bcc {
            cond: Cond::Ne,
            target: 0x200,
            wide: true,
        }
    );
    let insn = decode_at(0x200, &[0x40, 0xFE]).unwrap();
    assert_eq!(
        insn.op,
        Op::Bcc {
            cond: Cond::Always,
            target: 0x200,
            wide: false,
        }
    );
}

#[test]
fn jumps_and_traps() {
    assert_eq!(op(&[0x5D, 0x30]), Op::Jsr(JumpTarget::Reg(3)));
    assert_eq!(
        op(&[0x5A, 0x01, 0x23, 0x46]),
        Op::Jmp(JumpTarget::Abs(0x01_2346))
    );
    assert_eq!(op(&[0x5F, 0x10]), Op::Jsr(JumpTarget::MemIndirect(0x10)));
    assert_eq!(op(&[0x57, 0x30]), Op::Trapa(3));
    assert!(is_illegal(&[0x57, 0x31]));
}

#[test]
fn multiply_divide_forms() {
    assert_eq!(
        op(&[0x01, 0xC0, 0x50, 0x81]),
        Op::MulDiv {
            op: MulDivOp::Mulxs,
            size: Size::Byte,
            src: 8,
            dst: 1,
        }
    );
    assert_eq!(
        op(&[0x53, 0x02]),
        Op::MulDiv {
            op: MulDivOp::Divxu,
            size: Size::Word,
            src: 0,
            dst: 2,
        }
    );
    // Word forms name a long register.
    assert!(is_illegal(&[0x53, 0x0A]));
}

#[test]
fn shift_sizes_and_counts() {
    assert_eq!(
        op(&[0x11, 0xF3]),
        Op::Shift {
            op: ShiftOp::Shar,
            size: Size::Long,
            count: 2,
            dst: 3,
        }
    );
    assert!(is_illegal(&[0x10, 0x38]));
    assert!(is_illegal(&[0x10, 0x20]));
}

#[test]
fn bit_operations_on_memory() {
    assert_eq!(
        op(&[0x7D, 0x10, 0x70, 0x20]),
        Op::Bit {
            op: BitOp::Bset,
            bit: BitNum::Imm(2),
            target: BitTarget::Mem(Ea::Indirect(1)),
        }
    );
    assert_eq!(
        op(&[0x7E, 0xC7, 0x74, 0x90]),
        Op::Bit {
            op: BitOp::Bior,
            bit: BitNum::Imm(1),
            target: BitTarget::Mem(Ea::Abs(0xFF_FFC7)),
        }
    );
    assert_eq!(
        op(&[0x6A, 0x10, 0x12, 0x34, 0x63, 0x90]),
        Op::Bit {
            op: BitOp::Btst,
            bit: BitNum::Reg(9),
            target: BitTarget::Mem(Ea::Abs(0x1234)),
        }
    );
    // No inverted BSET.
    assert!(is_illegal(&[0x7D, 0x10, 0x70, 0xA0]));
    assert!(is_illegal(&[0x70, 0xA8]));
}

#[test]
fn block_and_multiple_register_transfers() {
    assert_eq!(op(&[0x7B, 0xD4, 0x59, 0x8F]), Op::Eepmov(Size::Word));
    assert!(is_illegal(&[0x7B, 0xD4, 0x59, 0x8E]));
    assert_eq!(op(&[0x01, 0x30, 0x6D, 0xF4]), Op::Stm { first: 4, count: 4 });
    assert_eq!(op(&[0x01, 0x10, 0x6D, 0x77]), Op::Ldm { last: 7, count: 2 });
    assert!(is_illegal(&[0x01, 0x30, 0x6D, 0xF6]));
}

#[test]
fn control_register_forms() {
    assert_eq!(
        op(&[0x01, 0x41, 0x07, 0x03]),
        Op::Ldc {
            src: Operand::Imm(3),
            dst: ControlReg::Exr,
        }
    );
    assert_eq!(
        op(&[0x01, 0x40, 0x6B, 0xA0, 0x00, 0xFF, 0xFF, 0x00]),
        Op::Stc {
            src: ControlReg::Ccr,
            dst: Operand::Mem(Ea::Abs(0xFF_FF00)),
        }
    );
    assert_eq!(
        op(&[0x02, 0x18]),
        Op::Stc {
            src: ControlReg::Exr,
            dst: Operand::Reg(8),
        }
    );
}

#[test]
fn long_move_displacement_register_byte_is_checked() {
    for reg in [0x90, 0x11, 0x14] {
        assert!(
            is_illegal(&[0x01, 0x00, 0x78, reg, 0x6B, 0xA2, 0x00, 0x00, 0x12, 0x34]),
            "0x{:02X} accepted",
            reg
        );
    }
    assert!(!is_illegal(&[0x01, 0x00, 0x78, 0x70, 0x6B, 0x22, 0x00, 0x00, 0x12, 0x34]));
}

#[test]
fn unsupported_patterns_are_illegal() {
    // CLRMAC / MAC page.
    assert!(is_illegal(&[0x01, 0xA0]));
    // NOP with a non-zero second byte.
    assert!(is_illegal(&[0x00, 0x01]));
    // MOVFPE lives on the 6A page.
    assert!(is_illegal(&[0x6A, 0x40, 0x00, 0x00]));
    // RTS needs its fixed second byte.
    assert!(is_illegal(&[0x54, 0x71]));
}

#[test]
fn illegal_reports_consumed_bytes() {
    let err = decode_at(0x40, &[0x01, 0xF0, 0x67, 0x00]).unwrap_err();
    assert_eq!(
        err,
        CpuError::IllegalInstruction {
            pc: 0x40,
            bytes: vec![0x01, 0xF0, 0x67, 0x00],
        }
    );
}

#[test]
fn truncated_fetch_is_out_of_range() {
    assert!(matches!(
        decode_at(0, &[0x79, 0x01]),
        Err(CpuError::OutOfRange { addr: 2, .. })
    ));
}
