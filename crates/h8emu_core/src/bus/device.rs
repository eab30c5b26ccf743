use std::sync::Arc;

use parking_lot::Mutex;

use super::{Bus, DeviceBus};
use crate::error::Result;

/// A memory-mapped peripheral.
///
/// Devices see the absolute bus address of every access. They never hold
/// a reference back to the interpreter: anything a device needs from the
/// rest of the system (the cycle counter, interrupt requests, bus-master
/// access to memory) is handed to it explicitly through [`TickContext`].
pub trait Device: Send {
    fn read8(&mut self, addr: u32) -> u8;
    fn write8(&mut self, addr: u32, value: u8);

    /// Word read, big-endian. Defaults to two byte reads.
    fn read16(&mut self, addr: u32) -> u16 {
        let hi = self.read8(addr);
        let lo = self.read8(addr.saturating_add(1));
        u16::from_be_bytes([hi, lo])
    }

    /// Word write, big-endian. Defaults to two byte writes.
    fn write16(&mut self, addr: u32, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write8(addr, hi);
        self.write8(addr.saturating_add(1), lo);
    }

    /// Advance the device to the cycle count in `ctx`.
    ///
    /// Called by the owner of the bus between instructions; the default
    /// implementation does nothing.
    fn tick(&mut self, _ctx: &mut TickContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// A device shared between the bus and an outside owner, e.g. a serial
/// port that a host thread feeds with input.
pub type SharedDevice<D> = Arc<Mutex<D>>;

/// Wrap a device so it can be registered on the bus while the caller keeps
/// a handle to it.
pub fn shared<D: Device>(device: D) -> SharedDevice<D> {
    Arc::new(Mutex::new(device))
}

// The lock is only held for the duration of a single access.
impl<D: Device> Device for Arc<Mutex<D>> {
    fn read8(&mut self, addr: u32) -> u8 {
        self.lock().read8(addr)
    }

    fn write8(&mut self, addr: u32, value: u8) {
        self.lock().write8(addr, value)
    }

    fn read16(&mut self, addr: u32) -> u16 {
        self.lock().read16(addr)
    }

    fn write16(&mut self, addr: u32, value: u16) {
        self.lock().write16(addr, value)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.lock().tick(ctx)
    }
}

/// Capabilities handed to a device while it is being ticked.
pub struct TickContext<'a> {
    cycles: u64,
    raised: u64,
    bus: &'a mut DeviceBus,
}

impl<'a> TickContext<'a> {
    pub(super) fn new(cycles: u64, bus: &'a mut DeviceBus) -> Self {
        Self {
            cycles,
            raised: 0,
            bus,
        }
    }

    /// Current value of the interpreter's cycle counter.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Request interrupt `irq`. Requests are applied through the regular
    /// raise path once the tick completes, so enable-register masking
    /// still applies.
    pub fn raise(&mut self, irq: u8) {
        if irq < 64 {
            self.raised |= 1 << irq;
        } else {
            log::warn!("Ignoring request for out-of-range interrupt {}", irq);
        }
    }

    pub(super) fn raised(&self) -> u64 {
        self.raised
    }

    /// Untimed bus-master read (memory image or another device).
    pub fn read8(&mut self, addr: u32) -> Result<u8> {
        self.bus.read8(addr)
    }

    /// Untimed bus-master write (memory image or another device).
    pub fn write8(&mut self, addr: u32, value: u8) -> Result<()> {
        self.bus.write8(addr, value)
    }
}
