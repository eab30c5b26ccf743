use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::Result;
use crate::instruction::{Operand, Size};
use crate::memory::ADDRESS_MASK;

impl Cpu {
    /// MOV in every addressing mode. N/Z follow the moved value, V is
    /// cleared.
    ///
    /// A pre-decremented destination is resolved before the source register
    /// is read, and a post-incremented source pointer moves only after the
    /// destination register is written, so `MOV.L ER7,@-ER7` stores the
    /// decremented pointer and `MOV.L @ER7+,ER7` leaves the loaded value
    /// plus four.
    pub(super) fn exec_mov<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        size: Size,
        src: Operand,
        dst: Operand,
    ) -> Result<()> {
        let dst_addr = match dst {
            Operand::Mem(ea) => Some(self.resolve(ea, size)),
            _ => None,
        };

        let value = match src {
            Operand::Mem(ea) => {
                let addr = self.resolve(ea, size);
                self.read_sized(bus, size, addr)?
            }
            Operand::Reg(r) => self.regs.read(size, r),
            Operand::Imm(imm) => imm & size.mask(),
        };
        self.set_move_flags(size, value);

        match (dst, dst_addr) {
            (_, Some(addr)) => self.write_sized(bus, size, addr, value)?,
            (Operand::Reg(r), None) => self.regs.write(size, r, value),
            _ => log::warn!("MOV to an immediate operand ignored"),
        }

        if let Operand::Mem(ea) = src {
            self.post_increment(ea, size);
        }
        Ok(())
    }

    /// STM.L: push `count` registers from `first` upwards.
    pub(super) fn exec_stm<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        first: u8,
        count: u8,
    ) -> Result<()> {
        for reg in first..first + count {
            let value = self.regs.read_long(reg);
            self.push32(bus, value)?;
        }
        Ok(())
    }

    /// LDM.L: pop `count` registers from `last` downwards.
    pub(super) fn exec_ldm<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        last: u8,
        count: u8,
    ) -> Result<()> {
        for reg in (last + 1 - count..=last).rev() {
            let value = self.pop32(bus)?;
            self.regs.write_long(reg, value);
        }
        Ok(())
    }

    /// EEPMOV: copy R4L (byte form) or R4 (word form) bytes from @ER5+ to
    /// @ER6+, counting the register down to zero.
    pub(super) fn exec_eepmov<B: Bus + ?Sized>(&mut self, bus: &mut B, size: Size) -> Result<()> {
        const COUNT: u8 = 4;
        const COUNT_LOW: u8 = 4 | 8;
        const SRC: u8 = 5;
        const DST: u8 = 6;

        let count_reg = match size {
            Size::Byte => COUNT_LOW,
            _ => COUNT,
        };
        let mut remaining = self.regs.read(size, count_reg);
        while remaining != 0 {
            let src = self.regs.read_long(SRC);
            let dst = self.regs.read_long(DST);
            let byte = self.read8(bus, src & ADDRESS_MASK)?;
            self.write8(bus, dst & ADDRESS_MASK, byte)?;
            self.regs.write_long(SRC, src.wrapping_add(1));
            self.regs.write_long(DST, dst.wrapping_add(1));
            remaining -= 1;
            self.regs.write(size, count_reg, remaining);
        }
        Ok(())
    }
}
