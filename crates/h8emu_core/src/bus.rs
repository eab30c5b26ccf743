//! Address decoding in front of the flat memory image.

mod device;
#[cfg(test)]
mod tests;

pub use device::{shared, Device, SharedDevice, TickContext};

use crate::error::{ConfigError, Result};
use crate::memory::{MemoryImage, ADDRESS_SPACE};

/// Abstraction over the system bus as seen by the CPU core.
///
/// Accesses are untimed here; the CPU charges cycles through its own
/// timing model before forwarding to the bus.
pub trait Bus {
    fn read8(&mut self, addr: u32) -> Result<u8>;
    fn write8(&mut self, addr: u32, value: u8) -> Result<()>;

    /// Big-endian word read. Defaults to two byte reads.
    fn read16(&mut self, addr: u32) -> Result<u16> {
        let hi = self.read8(addr)?;
        let lo = self.read8(addr.saturating_add(1))?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Big-endian word write. Defaults to two byte writes.
    fn write16(&mut self, addr: u32, value: u16) -> Result<()> {
        let [hi, lo] = value.to_be_bytes();
        self.write8(addr, hi)?;
        self.write8(addr.saturating_add(1), lo)
    }

    /// Side-effect-free read used by the disassembler and debug views.
    fn peek8(&self, addr: u32) -> Result<u8>;
}

struct Mapping {
    base: u32,
    /// Exclusive end address.
    end: u32,
    name: &'static str,
    /// `None` only while the device is being ticked.
    device: Option<Box<dyn Device>>,
}

impl Mapping {
    #[inline]
    fn contains(&self, addr: u32) -> bool {
        addr >= self.base && addr < self.end
    }
}

/// The system bus: registered devices in front of a [`MemoryImage`].
///
/// Mappings are kept sorted by base address and never overlap, so a lookup
/// is a binary search. An address inside a mapping is served exclusively by
/// its device; every other address goes to the memory image.
pub struct DeviceBus {
    memory: MemoryImage,
    mappings: Vec<Mapping>,
}

impl DeviceBus {
    pub fn new(memory: MemoryImage) -> Self {
        Self {
            memory,
            mappings: Vec::new(),
        }
    }

    #[inline]
    pub fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.memory
    }

    /// Map `device` at `[base, base + len)`.
    ///
    /// Overlapping an existing mapping is a configuration error; the bus is
    /// left unchanged in that case.
    pub fn register<D: Device + 'static>(
        &mut self,
        base: u32,
        len: u32,
        device: D,
    ) -> std::result::Result<(), ConfigError> {
        self.register_boxed(base, len, std::any::type_name::<D>(), Box::new(device))
    }

    pub fn register_boxed(
        &mut self,
        base: u32,
        len: u32,
        name: &'static str,
        device: Box<dyn Device>,
    ) -> std::result::Result<(), ConfigError> {
        if len == 0 {
            return Err(ConfigError::EmptyRange { base });
        }
        let end = base
            .checked_add(len)
            .filter(|&end| end as usize <= ADDRESS_SPACE)
            .ok_or(ConfigError::RangeOutOfBounds {
                base,
                len,
                size: ADDRESS_SPACE,
            })?;

        let index = self.mappings.partition_point(|m| m.base < base);
        let neighbours = [index.checked_sub(1), Some(index)];
        for other in neighbours.into_iter().flatten() {
            if let Some(m) = self.mappings.get(other) {
                if m.base < end && base < m.end {
                    return Err(ConfigError::OverlappingDevice {
                        base,
                        end,
                        other_base: m.base,
                        other_end: m.end,
                    });
                }
            }
        }

        log::debug!("Mapped {} at 0x{:06X}..0x{:06X}", name, base, end);
        self.mappings.insert(
            index,
            Mapping {
                base,
                end,
                name,
                device: Some(device),
            },
        );
        Ok(())
    }

    pub fn device_count(&self) -> usize {
        self.mappings.len()
    }

    /// Whether `addr` is claimed by a registered device.
    pub fn is_mapped(&self, addr: u32) -> bool {
        self.find(addr).is_some()
    }

    fn find(&self, addr: u32) -> Option<usize> {
        let index = self.mappings.partition_point(|m| m.base <= addr);
        let index = index.checked_sub(1)?;
        self.mappings[index].contains(addr).then_some(index)
    }

    /// Advance every device to `cycles`, returning the mask of interrupts
    /// the devices requested.
    pub fn tick(&mut self, cycles: u64) -> Result<u64> {
        let mut raised = 0;
        for index in 0..self.mappings.len() {
            // Take the device out so it can be handed the rest of the bus.
            let Some(mut device) = self.mappings[index].device.take() else {
                continue;
            };
            let result = {
                let mut ctx = TickContext::new(cycles, self);
                device.tick(&mut ctx).map(|()| ctx.raised())
            };
            self.mappings[index].device = Some(device);
            raised |= result?;
        }
        Ok(raised)
    }
}

impl Bus for DeviceBus {
    fn read8(&mut self, addr: u32) -> Result<u8> {
        match self.find(addr) {
            Some(index) => {
                let mapping = &mut self.mappings[index];
                match mapping.device.as_mut() {
                    Some(device) => Ok(device.read8(addr)),
                    None => {
                        log::warn!(
                            "Read of 0x{:06X} from {} while it is busy",
                            addr,
                            mapping.name
                        );
                        Ok(0xFF)
                    }
                }
            }
            None => self.memory.read8(addr),
        }
    }

    fn write8(&mut self, addr: u32, value: u8) -> Result<()> {
        match self.find(addr) {
            Some(index) => {
                let mapping = &mut self.mappings[index];
                match mapping.device.as_mut() {
                    Some(device) => device.write8(addr, value),
                    None => log::warn!(
                        "Dropped write 0x{:02X} to 0x{:06X}: {} is busy",
                        value,
                        addr,
                        mapping.name
                    ),
                }
                Ok(())
            }
            None => self.memory.write8(addr, value),
        }
    }

    fn read16(&mut self, addr: u32) -> Result<u16> {
        let second = addr.saturating_add(1);
        match (self.find(addr), self.find(second)) {
            (Some(a), Some(b)) if a == b => match self.mappings[a].device.as_mut() {
                Some(device) => Ok(device.read16(addr)),
                None => Ok(0xFFFF),
            },
            _ => {
                let hi = self.read8(addr)?;
                let lo = self.read8(second)?;
                Ok(u16::from_be_bytes([hi, lo]))
            }
        }
    }

    fn write16(&mut self, addr: u32, value: u16) -> Result<()> {
        let second = addr.saturating_add(1);
        match (self.find(addr), self.find(second)) {
            (Some(a), Some(b)) if a == b => {
                if let Some(device) = self.mappings[a].device.as_mut() {
                    device.write16(addr, value);
                }
                Ok(())
            }
            _ => {
                let [hi, lo] = value.to_be_bytes();
                self.write8(addr, hi)?;
                self.write8(second, lo)
            }
        }
    }

    /// Reads the backing image even where a device is mapped, so that
    /// inspecting memory never triggers device side effects.
    fn peek8(&self, addr: u32) -> Result<u8> {
        self.memory.read8(addr)
    }
}
