use super::{Cpu, SLEEP_CYCLES};
use crate::bus::Bus;
use crate::decode::{decode, Fetch};
use crate::error::Result;

/// Instruction fetch through the timed, device-routed read path.
struct TimedFetch<'a, B: ?Sized> {
    cpu: &'a mut Cpu,
    bus: &'a mut B,
}

impl<B: Bus + ?Sized> Fetch for TimedFetch<'_, B> {
    fn fetch8(&mut self, addr: u32) -> Result<u8> {
        self.cpu.read8(self.bus, addr)
    }
}

impl Cpu {
    /// Run one step and return the number of cycles it took.
    ///
    /// A step is either an interrupt entry, one idle period while asleep,
    /// or one instruction. An error leaves PC at the faulting instruction.
    pub fn step<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<u32> {
        let start = self.cycles;

        if self.service_interrupt(bus)? {
            return Ok((self.cycles - start) as u32);
        }

        if self.sleeping {
            self.clock_internal(SLEEP_CYCLES);
            return Ok(SLEEP_CYCLES);
        }

        let pc = self.regs.pc;
        let insn = decode(
            &mut TimedFetch {
                cpu: self,
                bus: &mut *bus,
            },
            pc,
        )?;

        if log::log_enabled!(log::Level::Trace) {
            if let Some(tracer) = &self.tracer {
                log::trace!("{}", tracer.trace_line(&insn, self.depth));
            }
        }

        if let Err(err) = self.execute(bus, &insn) {
            self.regs.pc = pc;
            return Err(err);
        }
        Ok((self.cycles - start) as u32)
    }
}
