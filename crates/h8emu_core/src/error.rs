use std::fmt;

use thiserror::Error;

/// Direction of a bus access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// Direction and width of the access that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    pub kind: AccessKind,
    /// Width in bits (8, 16 or 32).
    pub width: u8,
}

impl Access {
    pub const fn read(width: u8) -> Self {
        Self {
            kind: AccessKind::Read,
            width,
        }
    }

    pub const fn write(width: u8) -> Self {
        Self {
            kind: AccessKind::Write,
            width,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.kind {
            AccessKind::Read => "read",
            AccessKind::Write => "write",
        };
        write!(f, "{}{}", dir, self.width)
    }
}

/// Errors raised while the interpreter is running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("illegal instruction at 0x{pc:06X} [{}]", hex_bytes(.bytes))]
    IllegalInstruction { pc: u32, bytes: Vec<u8> },

    #[error("out-of-range {access} at 0x{addr:08X}")]
    OutOfRange { addr: u32, access: Access },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Misconfiguration detected when devices or images are installed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "device range 0x{base:06X}..0x{end:06X} overlaps 0x{other_base:06X}..0x{other_end:06X}"
    )]
    OverlappingDevice {
        base: u32,
        end: u32,
        other_base: u32,
        other_end: u32,
    },

    #[error("device range at 0x{base:06X} is empty")]
    EmptyRange { base: u32 },

    #[error("device range 0x{base:06X}+0x{len:X} lies outside the 0x{size:X}-byte address space")]
    RangeOutOfBounds { base: u32, len: u32, size: usize },

    #[error("image of {len} bytes at 0x{offset:06X} does not fit in 0x{size:X} bytes of memory")]
    ImageTooLarge {
        offset: u32,
        len: usize,
        size: usize,
    },
}

impl CpuError {
    /// Report an out-of-range byte access as part of a wider access.
    pub(crate) fn widened(self, width: u8) -> Self {
        match self {
            CpuError::OutOfRange { addr, access } => CpuError::OutOfRange {
                addr,
                access: Access {
                    width: width.max(access.width),
                    ..access
                },
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CpuError>;

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
