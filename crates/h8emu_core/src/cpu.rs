//! The H8S/2000 CPU core.
//!
//! `Cpu` owns the architectural state (registers, pending interrupts, cycle
//! counter and access-coalescing state). All memory traffic goes through a
//! [`Bus`] passed into each call, so the core never holds a reference to the
//! devices it talks to.

mod alu;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;

pub use regs::{Ccr, Exr, Registers};

use crate::bus::Bus;
use crate::config::CpuConfig;
use crate::disasm::Disassembler;
use crate::timing::AccessTimer;

/// Idle cycles charged for each step spent asleep.
pub const SLEEP_CYCLES: u32 = 2;

/// Internal cycles of the interrupt entry sequence.
pub const INTERRUPT_ENTRY_CYCLES: u32 = 4;

/// Trap vectors start here: TRAPA #n jumps through `TRAP_VECTOR_BASE + 4n`.
pub const TRAP_VECTOR_BASE: u32 = 0x20;

/// UE bit of SYSCR.
const SYSCR_UE: u8 = 0x08;

/// First interrupt gated by the enable register and mirrored in ISR.
const GATED_IRQ_FIRST: u8 = 12;
/// Number of gated interrupts (12–17).
const GATED_IRQ_COUNT: u8 = 6;
const GATED_IRQ_MASK: u64 = ((1 << GATED_IRQ_COUNT) - 1) << GATED_IRQ_FIRST;

pub struct Cpu {
    pub regs: Registers,
    /// Raised, not yet serviced interrupts; bit n is interrupt n.
    pending: u64,
    cycles: u64,
    timer: AccessTimer,
    sleeping: bool,
    /// Nesting of subroutine calls and interrupt entries, for traces.
    depth: i32,
    config: CpuConfig,
    tracer: Option<Disassembler>,
}

impl Cpu {
    /// Total cycles consumed since the last boot.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Pending interrupt mask.
    #[inline]
    pub fn pending(&self) -> u64 {
        self.pending
    }

    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    #[inline]
    pub fn call_depth(&self) -> i32 {
        self.depth
    }

    #[inline]
    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Charge `cycles` of internal (non-bus) work.
    #[inline]
    pub(crate) fn clock_internal(&mut self, cycles: u32) {
        self.cycles += cycles as u64;
    }

    /// Update the call depth used to indent traces.
    #[inline]
    fn enter_call(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    #[inline]
    fn leave_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Read the UE bit of SYSCR with a timed access.
    fn user_enable<B: Bus + ?Sized>(&mut self, bus: &mut B) -> crate::Result<bool> {
        let syscr = self.read8(bus, self.config.syscr_address)?;
        Ok(syscr & SYSCR_UE != 0)
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("pending", &format_args!("0x{:016X}", self.pending))
            .field("cycles", &self.cycles)
            .field("sleeping", &self.sleeping)
            .finish()
    }
}
