//! Per-access cycle accounting.
//!
//! The external bus is 16 bits wide: two byte accesses that together form
//! one aligned word are serviced in a single bus cycle, so the second one
//! is free. On-chip RAM and the wide register block follow the same rule
//! at one cycle per access, while the 8-bit register page at the very top
//! of the address space is charged per byte and breaks any pairing.

use crate::error::AccessKind;

/// End (exclusive) of the external ROM/RAM area with 3-state accesses.
pub const EXTERNAL_END: u32 = 0x40_0000;
/// Start of on-chip RAM.
pub const ON_CHIP_START: u32 = 0xFF_FD10;
/// Start of the 8-bit on-chip register page.
pub const BYTE_REGISTER_START: u32 = 0xFF_FFA0;

const EXTERNAL_CYCLES: u32 = 3;
const ON_CHIP_CYCLES: u32 = 1;
const BYTE_REGISTER_CYCLES: u32 = 1;
const OTHER_CYCLES: u32 = 3;

/// Timing class of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessClass {
    /// Low memory (ROM and external RAM), coalesced, 3 cycles.
    External,
    /// On-chip RAM and 16-bit registers, coalesced, 1 cycle.
    OnChip,
    /// 8-bit on-chip registers, never coalesced, 1 cycle.
    ByteRegister,
    /// Everything else (memory-mapped external chips), never coalesced, 3 cycles.
    Other,
}

impl AccessClass {
    pub fn of(addr: u32) -> Self {
        if addr < EXTERNAL_END {
            AccessClass::External
        } else if (ON_CHIP_START..BYTE_REGISTER_START).contains(&addr) {
            AccessClass::OnChip
        } else if addr >= BYTE_REGISTER_START {
            AccessClass::ByteRegister
        } else {
            AccessClass::Other
        }
    }

    fn cost(self) -> u32 {
        match self {
            AccessClass::External => EXTERNAL_CYCLES,
            AccessClass::OnChip => ON_CHIP_CYCLES,
            AccessClass::ByteRegister => BYTE_REGISTER_CYCLES,
            AccessClass::Other => OTHER_CYCLES,
        }
    }
}

/// Coalescing state, tracked independently for reads and writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessTimer {
    last_read: Option<u32>,
    last_write: Option<u32>,
}

impl AccessTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_read = None;
        self.last_write = None;
    }

    /// Return the cycle cost of a byte access and update the pairing state.
    pub fn charge(&mut self, kind: AccessKind, addr: u32) -> u32 {
        let last = match kind {
            AccessKind::Read => &mut self.last_read,
            AccessKind::Write => &mut self.last_write,
        };
        let class = AccessClass::of(addr);
        match class {
            AccessClass::External | AccessClass::OnChip => {
                // The odd half of a word whose even half was just accessed
                // rides along on the same bus cycle.
                let paired = matches!(*last, Some(prev) if prev & 1 == 0 && addr == prev | 1);
                *last = Some(addr);
                if paired {
                    0
                } else {
                    class.cost()
                }
            }
            AccessClass::ByteRegister | AccessClass::Other => {
                *last = None;
                class.cost()
            }
        }
    }
}
