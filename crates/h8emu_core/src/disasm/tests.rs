use super::*;
use crate::decode::decode;

fn insn_at(addr: u32, bytes: &[u8]) -> Instruction {
    let mut image = vec![0u8; addr as usize + bytes.len()];
    image[addr as usize..].copy_from_slice(bytes);
    decode(&mut image[..], addr).unwrap()
}

fn text(bytes: &[u8]) -> String {
    Disassembler::default().format(&insn_at(0, bytes))
}

#[test]
fn moves_and_immediates() {
    assert_eq!(text(&[0x6C, 0xF8]), "MOV.B R0L,@-ER7");
    assert_eq!(text(&[0xF8, 0x10]), "MOV.B #0x10,R0L");
    assert_eq!(text(&[0x79, 0x11, 0x12, 0x34]), "ADD.W #0x1234,R1");
    assert_eq!(
        text(&[0x7A, 0x00, 0x00, 0xFF, 0xFF, 0x00]),
        "MOV.L #0x00FFFF00,ER0"
    );
    assert_eq!(text(&[0x6E, 0x18, 0xFF, 0xFC]), "MOV.B @(-0x4,ER1),R0L");
}

#[test]
fn stack_moves_render_as_push_and_pop() {
    assert_eq!(text(&[0x01, 0x00, 0x6D, 0xF6]), "PUSH.L ER6");
    assert_eq!(text(&[0x6D, 0x71]), "POP.W R1");
    assert_eq!(text(&[0x01, 0x20, 0x6D, 0xF4]), "STM.L (ER4-ER6),@-SP");
    assert_eq!(text(&[0x01, 0x20, 0x6D, 0x76]), "LDM.L @SP+,(ER4-ER6)");
}

#[test]
fn branch_and_jump_targets() {
    let insn = insn_at(0x100, &[0x46, 0x1E]);
    assert_eq!(Disassembler::default().format(&insn), "BNE 0x000120");
    assert_eq!(text(&[0x5F, 0x10]), "JSR @@0x10");
    assert_eq!(text(&[0x5A, 0x00, 0x12, 0x34]), "JMP @0x001234");
    assert_eq!(text(&[0x5D, 0x30]), "JSR @ER3");
    assert_eq!(text(&[0x57, 0x20]), "TRAPA #2");
}

#[test]
fn register_page_addresses_use_names() {
    assert_eq!(text(&[0x38, 0xF5]), "MOV.B R0L,@IER");

    let plain = Disassembler::new(DisasmConfig::builder().symbolic_names(false).build());
    assert_eq!(plain.format(&insn_at(0, &[0x38, 0xF5])), "MOV.B R0L,@0xFFFFF5");
}

#[test]
fn bit_and_control_operations() {
    assert_eq!(text(&[0x7D, 0x10, 0x70, 0x20]), "BSET #2,@ER1");
    assert_eq!(text(&[0x06, 0x7F]), "ANDC #0x7F,CCR");
    assert_eq!(text(&[0x03, 0x08]), "LDC.B R0L,CCR");
    assert_eq!(text(&[0x7B, 0x5C, 0x59, 0x8F]), "EEPMOV.B");
    assert_eq!(text(&[0x0B, 0x97]), "ADDS #4,ER7");
}

#[test]
fn shift_counts_only_when_two() {
    assert_eq!(text(&[0x10, 0x08]), "SHLL.B R0L");
    assert_eq!(text(&[0x10, 0x48]), "SHLL.B #2,R0L");
}

#[test]
fn listing_lines() {
    let insn = insn_at(0x100, &[0x00, 0x00]);
    let disasm = Disassembler::default();
    assert_eq!(disasm.format_line(&insn), "000100: NOP");
    assert_eq!(disasm.trace_line(&insn, 2), "000100:     NOP");
    assert_eq!(disasm.trace_line(&insn, -1), "000100: NOP");

    let flat = Disassembler::new(DisasmConfig::builder().indent_calls(false).build());
    assert_eq!(flat.trace_line(&insn, 2), "000100: NOP");

    let bytes = Disassembler::new(DisasmConfig::builder().show_bytes(true).build());
    let line = bytes.format_line(&insn_at(0x100, &[0x79, 0x11, 0x12, 0x34]));
    assert_eq!(line, format!("000100: {:<21}ADD.W #0x1234,R1", "79 11 12 34 "));
}
