use crate::bus::Bus;
use crate::cpu::{Ccr, Cpu, Exr};
use crate::error::Result;
use crate::instruction::{ControlReg, LogicOp, Operand, Size};
use crate::memory::ADDRESS_MASK;

impl Cpu {
    pub(super) fn exec_sleep(&mut self) {
        log::debug!("SLEEP, resume at 0x{:06X}", self.regs.pc);
        self.sleeping = true;
    }

    fn control(&self, cr: ControlReg) -> u8 {
        match cr {
            ControlReg::Ccr => self.regs.ccr.bits(),
            ControlReg::Exr => self.regs.exr.bits(),
        }
    }

    fn set_control(&mut self, cr: ControlReg, value: u8) {
        match cr {
            ControlReg::Ccr => self.regs.ccr = Ccr::from_bits_retain(value),
            ControlReg::Exr => self.regs.exr = Exr::from_bits_retain(value),
        }
    }

    /// LDC from a byte register, an immediate or the low byte of a word in
    /// memory.
    pub(super) fn exec_ldc<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        src: Operand,
        dst: ControlReg,
    ) -> Result<()> {
        let value = match src {
            Operand::Reg(r) => self.regs.read_byte(r),
            Operand::Imm(imm) => imm as u8,
            Operand::Mem(ea) => self.read_operand(bus, Size::Word, Operand::Mem(ea))? as u8,
        };
        self.set_control(dst, value);
        Ok(())
    }

    pub(super) fn exec_stc<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        src: ControlReg,
        dst: Operand,
    ) -> Result<()> {
        let value = self.control(src);
        match dst {
            Operand::Reg(r) => self.regs.write_byte(r, value),
            Operand::Mem(ea) => {
                let addr = self.resolve(ea, Size::Word);
                self.write16(bus, addr, value as u16)?;
            }
            Operand::Imm(_) => log::warn!("STC to an immediate operand ignored"),
        }
        Ok(())
    }

    /// ANDC/ORC/XORC.
    pub(super) fn exec_control_logic(&mut self, op: LogicOp, imm: u8, dst: ControlReg) {
        let value = self.control(dst);
        let result = match op {
            LogicOp::And => value & imm,
            LogicOp::Or => value | imm,
            LogicOp::Xor => value ^ imm,
        };
        self.set_control(dst, result);
    }

    /// TAS @ERn: test the byte, then set its bit 7.
    pub(super) fn exec_tas<B: Bus + ?Sized>(&mut self, bus: &mut B, reg: u8) -> Result<()> {
        let addr = self.regs.read_long(reg) & ADDRESS_MASK;
        let value = self.read8(bus, addr)?;
        self.set_move_flags(Size::Byte, value as u32);
        self.write8(bus, addr, value | 0x80)
    }
}
