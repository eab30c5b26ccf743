use crate::error::{Access, ConfigError, CpuError, Result};

/// Size of the full 24-bit address space.
pub const ADDRESS_SPACE: usize = 1 << 24;

/// Mask applied to effective addresses formed from 32-bit registers.
pub const ADDRESS_MASK: u32 = 0x00FF_FFFF;

/// Flat, owned backing store for the guest address space.
///
/// Every access is bounds-checked against the configured size; an address
/// at or beyond the end is reported as `CpuError::OutOfRange` instead of
/// wrapping around.
#[derive(Clone)]
pub struct MemoryImage {
    bytes: Vec<u8>,
}

impl MemoryImage {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        (addr as usize) < self.bytes.len()
    }

    /// Copy a raw firmware image into memory starting at `offset`.
    pub fn load(&mut self, offset: u32, data: &[u8]) -> std::result::Result<(), ConfigError> {
        let start = offset as usize;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ConfigError::ImageTooLarge {
                offset,
                len: data.len(),
                size: self.bytes.len(),
            })?;
        self.bytes[start..end].copy_from_slice(data);
        log::debug!(
            "Loaded {} bytes at 0x{:06X}..0x{:06X}",
            data.len(),
            start,
            end
        );
        Ok(())
    }

    pub fn read8(&self, addr: u32) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(CpuError::OutOfRange {
                addr,
                access: Access::read(8),
            })
    }

    pub fn write8(&mut self, addr: u32, value: u8) -> Result<()> {
        match self.bytes.get_mut(addr as usize) {
            Some(byte) => {
                *byte = value;
                Ok(())
            }
            None => Err(CpuError::OutOfRange {
                addr,
                access: Access::write(8),
            }),
        }
    }

    /// Borrow a window of memory, e.g. for dumping RAM from a host.
    pub fn slice(&self, addr: u32, len: usize) -> Option<&[u8]> {
        let start = addr as usize;
        self.bytes.get(start..start.checked_add(len)?)
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new(ADDRESS_SPACE)
    }
}

impl std::fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}
