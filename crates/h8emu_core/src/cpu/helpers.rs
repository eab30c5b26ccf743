use super::Cpu;
use crate::bus::Bus;
use crate::error::{AccessKind, Result};
use crate::instruction::{Ea, Operand, Size};
use crate::memory::ADDRESS_MASK;

impl Cpu {
    #[inline]
    fn charge(&mut self, kind: AccessKind, addr: u32) {
        self.cycles += self.timer.charge(kind, addr) as u64;
    }

    #[inline]
    fn is_isr(&self, addr: u32) -> bool {
        self.config.isr_address == Some(addr)
    }

    fn covers_isr(&self, addr: u32, len: u32) -> bool {
        self.config
            .isr_address
            .is_some_and(|isr| isr >= addr && isr - addr < len)
    }

    /// Untimed byte read with the interrupt status register intercepted.
    fn load8<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u32) -> Result<u8> {
        if self.is_isr(addr) {
            Ok(self.isr_bits())
        } else {
            bus.read8(addr)
        }
    }

    fn store8<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u32, value: u8) -> Result<()> {
        if self.is_isr(addr) {
            self.write_isr(value);
            Ok(())
        } else {
            bus.write8(addr, value)
        }
    }

    pub(crate) fn read8<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u32) -> Result<u8> {
        self.charge(AccessKind::Read, addr);
        self.load8(bus, addr)
    }

    pub(crate) fn write8<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        addr: u32,
        value: u8,
    ) -> Result<()> {
        self.charge(AccessKind::Write, addr);
        self.store8(bus, addr, value)
    }

    /// Big-endian word read. Timing is charged per byte; the data moves as
    /// a single word when no intercepted register is involved.
    pub(crate) fn read16<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u32) -> Result<u16> {
        let second = addr.wrapping_add(1);
        self.charge(AccessKind::Read, addr);
        self.charge(AccessKind::Read, second);
        let value = if self.covers_isr(addr, 2) {
            let hi = self.load8(bus, addr)?;
            let lo = self.load8(bus, second)?;
            Ok(u16::from_be_bytes([hi, lo]))
        } else {
            bus.read16(addr)
        };
        value.map_err(|e| e.widened(16))
    }

    pub(crate) fn write16<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        addr: u32,
        value: u16,
    ) -> Result<()> {
        let second = addr.wrapping_add(1);
        self.charge(AccessKind::Write, addr);
        self.charge(AccessKind::Write, second);
        let result = if self.covers_isr(addr, 2) {
            let [hi, lo] = value.to_be_bytes();
            self.store8(bus, addr, hi)
                .and_then(|()| self.store8(bus, second, lo))
        } else {
            bus.write16(addr, value)
        };
        result.map_err(|e| e.widened(16))
    }

    pub(crate) fn read32<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u32) -> Result<u32> {
        let read = |cpu: &mut Self, bus: &mut B| -> Result<u32> {
            let hi = cpu.read16(bus, addr)? as u32;
            let lo = cpu.read16(bus, addr.wrapping_add(2))? as u32;
            Ok(hi << 16 | lo)
        };
        read(self, bus).map_err(|e| e.widened(32))
    }

    pub(crate) fn write32<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        addr: u32,
        value: u32,
    ) -> Result<()> {
        self.write16(bus, addr, (value >> 16) as u16)
            .and_then(|()| self.write16(bus, addr.wrapping_add(2), value as u16))
            .map_err(|e| e.widened(32))
    }

    pub(crate) fn read_sized<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        size: Size,
        addr: u32,
    ) -> Result<u32> {
        match size {
            Size::Byte => self.read8(bus, addr).map(u32::from),
            Size::Word => self.read16(bus, addr).map(u32::from),
            Size::Long => self.read32(bus, addr),
        }
    }

    pub(crate) fn write_sized<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        size: Size,
        addr: u32,
        value: u32,
    ) -> Result<()> {
        match size {
            Size::Byte => self.write8(bus, addr, value as u8),
            Size::Word => self.write16(bus, addr, value as u16),
            Size::Long => self.write32(bus, addr, value),
        }
    }

    /// Compute the address of a memory operand.
    ///
    /// Pre-decrement is applied here; post-increment is left to
    /// [`Cpu::post_increment`] so a load can write its destination before
    /// the pointer moves.
    pub(crate) fn resolve(&mut self, ea: Ea, size: Size) -> u32 {
        let addr = match ea {
            Ea::Indirect(r) | Ea::PostInc(r) => self.regs.read_long(r),
            Ea::PreDec(r) => {
                let addr = self.regs.read_long(r).wrapping_sub(size.bytes());
                self.regs.write_long(r, addr);
                addr
            }
            Ea::Disp { base, disp } => self.regs.read_long(base).wrapping_add(disp),
            Ea::Abs(addr) => addr,
        };
        addr & ADDRESS_MASK
    }

    pub(crate) fn post_increment(&mut self, ea: Ea, size: Size) {
        if let Ea::PostInc(r) = ea {
            let next = self.regs.read_long(r).wrapping_add(size.bytes());
            self.regs.write_long(r, next);
        }
    }

    /// Read a source operand of width `size`.
    pub(crate) fn read_operand<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        size: Size,
        operand: Operand,
    ) -> Result<u32> {
        match operand {
            Operand::Reg(r) => Ok(self.regs.read(size, r)),
            Operand::Imm(value) => Ok(value & size.mask()),
            Operand::Mem(ea) => {
                let addr = self.resolve(ea, size);
                let value = self.read_sized(bus, size, addr)?;
                self.post_increment(ea, size);
                Ok(value)
            }
        }
    }

    pub(crate) fn push32<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u32) -> Result<()> {
        let sp = self.regs.sp().wrapping_sub(4);
        self.regs.set_sp(sp);
        self.write32(bus, sp & ADDRESS_MASK, value)
    }

    pub(crate) fn pop32<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<u32> {
        let sp = self.regs.sp();
        let value = self.read32(bus, sp & ADDRESS_MASK)?;
        self.regs.set_sp(sp.wrapping_add(4));
        Ok(value)
    }

    /// Push the return address together with CCR in the top byte.
    pub(crate) fn push_pc_ccr<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        let frame = self.regs.pc | (self.regs.ccr.bits() as u32) << 24;
        self.push32(bus, frame)
    }

    /// Load PC from the long word at `addr`.
    pub(crate) fn jump_through<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u32) -> Result<()> {
        let target = self.read32(bus, addr & ADDRESS_MASK)?;
        self.set_pc(target);
        Ok(())
    }

    #[inline]
    pub(crate) fn set_pc(&mut self, target: u32) {
        self.regs.pc = target & ADDRESS_MASK & !1;
    }
}
