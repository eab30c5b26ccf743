//! The interpreter facade: CPU, bus and run control in one value.

mod dump;
mod halt;
#[cfg(test)]
mod tests;

pub use dump::RegisterDump;
pub use halt::HaltHandle;

use crate::bus::{Bus, Device, DeviceBus};
use crate::config::CpuConfig;
use crate::cpu::{Cpu, Registers};
use crate::decode::{decode, PeekFetch};
use crate::disasm::Disassembler;
use crate::error::{ConfigError, CpuError, Result};
use crate::memory::{MemoryImage, ADDRESS_MASK};

/// Why [`Machine::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least the requested number of cycles elapsed.
    BudgetExhausted { cycles: u64 },
    /// A halt was requested through a [`HaltHandle`].
    Halted { cycles: u64 },
}

/// An H8S interpreter instance.
///
/// Owns the CPU and the device bus with its memory image. A fault stops the
/// machine: the error is recorded, and every later `step`/`run` returns it
/// until the next [`Machine::boot`].
pub struct Machine {
    cpu: Cpu,
    bus: DeviceBus,
    disasm: Disassembler,
    fault: Option<CpuError>,
    halt: HaltHandle,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(CpuConfig::default())
    }
}

impl Machine {
    pub fn new(config: CpuConfig) -> Self {
        let disasm = Disassembler::new(config.trace.unwrap_or_default());
        let memory = MemoryImage::new(config.memory_size);
        Self {
            cpu: Cpu::new(config),
            bus: DeviceBus::new(memory),
            disasm,
            fault: None,
            halt: HaltHandle::default(),
        }
    }

    /// Copy a raw firmware image into memory at `offset`.
    pub fn load(&mut self, offset: u32, image: &[u8]) -> std::result::Result<(), ConfigError> {
        self.bus.memory_mut().load(offset, image)
    }

    /// Map `device` at `[base, base + len)`. Devices receive absolute
    /// addresses.
    pub fn register_device<D: Device + 'static>(
        &mut self,
        base: u32,
        len: u32,
        device: D,
    ) -> std::result::Result<(), ConfigError> {
        self.bus.register(base, len, device)
    }

    /// Reset the CPU and start from the reset vector.
    pub fn boot(&mut self) -> Result<()> {
        self.fault = None;
        let result = self.cpu.boot(&mut self.bus);
        self.record(result)
    }

    /// Execute one step and return the cycles it consumed.
    pub fn step(&mut self) -> Result<u32> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        let result = self.cpu.step(&mut self.bus);
        self.record(result)
    }

    /// Run until `budget` more cycles have elapsed or a halt is requested.
    pub fn run(&mut self, budget: u64) -> Result<RunOutcome> {
        self.run_loop(budget, false)
    }

    /// Like [`Machine::run`], ticking the devices after every step.
    pub fn run_with_devices(&mut self, budget: u64) -> Result<RunOutcome> {
        self.run_loop(budget, true)
    }

    fn run_loop(&mut self, budget: u64, tick: bool) -> Result<RunOutcome> {
        let start = self.cpu.cycles();
        let target = start.saturating_add(budget);
        while self.cpu.cycles() < target {
            if self.halt.is_halted() {
                let cycles = self.cpu.cycles() - start;
                log::debug!("Halted at PC=0x{:06X} after {} cycles", self.pc(), cycles);
                return Ok(RunOutcome::Halted { cycles });
            }
            self.step()?;
            if tick {
                self.tick_devices()?;
            }
        }
        Ok(RunOutcome::BudgetExhausted {
            cycles: self.cpu.cycles() - start,
        })
    }

    /// Let every device catch up with the cycle counter, then raise the
    /// interrupts they requested.
    pub fn tick_devices(&mut self) -> Result<()> {
        let result = self.bus.tick(self.cpu.cycles());
        let mut raised = self.record(result)?;
        while raised != 0 {
            let irq = raised.trailing_zeros() as u8;
            raised &= raised - 1;
            self.raise(irq)?;
        }
        Ok(())
    }

    /// Request interrupt `irq`, subject to the enable register.
    pub fn raise(&mut self, irq: u8) -> Result<()> {
        let result = self.cpu.raise(&mut self.bus, irq);
        self.record(result)
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            log::error!("Fault at PC=0x{:06X}: {}", self.cpu.regs.pc, err);
            self.fault = Some(err.clone());
        }
        result
    }

    #[inline]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    #[inline]
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    #[inline]
    pub fn bus(&self) -> &DeviceBus {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut DeviceBus {
        &mut self.bus
    }

    #[inline]
    pub fn regs(&self) -> &Registers {
        &self.cpu.regs
    }

    #[inline]
    pub fn pc(&self) -> u32 {
        self.cpu.regs.pc
    }

    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    /// The fault that stopped the machine, if any.
    pub fn fault(&self) -> Option<&CpuError> {
        self.fault.as_ref()
    }

    pub fn halt_handle(&self) -> HaltHandle {
        self.halt.clone()
    }

    /// Cycle counter converted to seconds of emulated time.
    pub fn real_time_secs(&self) -> f64 {
        self.cpu.cycles() as f64 / self.cpu.config().clock_hz as f64
    }

    pub fn dump(&self) -> RegisterDump {
        RegisterDump::from_cpu(&self.cpu)
    }

    /// Disassemble the instruction at `addr` without touching machine
    /// state. Returns the text and the instruction length.
    pub fn disassemble(&self, addr: u32) -> Result<(String, u32)> {
        let insn = decode(&mut PeekFetch(&self.bus), addr)?;
        Ok((self.disasm.format(&insn), insn.len()))
    }

    /// List `count` consecutive instructions starting at `addr`.
    ///
    /// Undecodable words are listed as `.word` and skipped.
    pub fn disassemble_range(&self, addr: u32, count: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(count);
        let mut pc = addr & ADDRESS_MASK & !1;
        for _ in 0..count {
            match decode(&mut PeekFetch(&self.bus), pc) {
                Ok(insn) => {
                    lines.push(self.disasm.format_line(&insn));
                    pc = insn.next_pc();
                }
                Err(CpuError::IllegalInstruction { .. }) => {
                    let hi = self.bus.peek8(pc).unwrap_or(0);
                    let lo = self.bus.peek8(pc + 1).unwrap_or(0);
                    lines.push(format!("{:06X}: .word 0x{:02X}{:02X}", pc, hi, lo));
                    pc += 2;
                }
                Err(_) => break,
            }
        }
        lines
    }

    /// Long words around the stack pointer: four below SP and `words`
    /// from SP upwards, as `(address, value)` pairs.
    pub fn stack_dump(&self, words: usize) -> Vec<(u32, u32)> {
        let sp = self.cpu.regs.sp() & ADDRESS_MASK;
        let start = sp.saturating_sub(16);
        // Stops at the end of memory.
        (0..words.saturating_add(4))
            .map_while(|i| {
                let addr = u32::try_from(i).ok()?.checked_mul(4)?.checked_add(start)?;
                let mut value = 0u32;
                for offset in 0..4 {
                    let byte = self.bus.peek8(addr.checked_add(offset)?).ok()?;
                    value = value << 8 | byte as u32;
                }
                Some((addr, value))
            })
            .collect()
    }
}
