use super::{Ccr, Cpu, Exr, Registers};
use crate::bus::Bus;
use crate::config::CpuConfig;
use crate::disasm::Disassembler;
use crate::error::Result;
use crate::memory::ADDRESS_MASK;
use crate::timing::AccessTimer;

impl Cpu {
    pub fn new(config: CpuConfig) -> Self {
        let tracer = config.trace.map(Disassembler::new);
        Self {
            regs: Registers::default(),
            pending: 0,
            cycles: 0,
            timer: AccessTimer::new(),
            sleeping: false,
            depth: 0,
            config,
            tracer,
        }
    }

    /// Reset the core and fetch the initial PC from the reset vector.
    ///
    /// CCR comes up with only the interrupt mask set. The vector fetch is
    /// not charged: the cycle counter starts from zero afterwards.
    pub fn boot<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        self.regs = Registers::default();
        self.regs.ccr = Ccr::I;
        self.regs.exr = Exr::empty();
        self.pending = 0;
        self.sleeping = false;
        self.depth = 0;

        let vector = self.read32(bus, self.config.vector_base)?;
        self.regs.pc = vector & ADDRESS_MASK & !1;

        self.cycles = 0;
        self.timer.reset();
        log::debug!("Boot: PC=0x{:06X}", self.regs.pc);
        Ok(())
    }
}
