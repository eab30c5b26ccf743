//! Interpreter for the Hitachi H8S/2000 CPU core.
//!
//! The crate is layered leaf-first: a bounds-checked [`MemoryImage`], a
//! [`DeviceBus`] routing accesses to memory-mapped devices, the per-access
//! [`timing`] model, a pure [`decode`] step producing [`Instruction`]
//! values, the [`Cpu`] that executes them, a [`Disassembler`] rendering
//! them, and the [`Machine`] facade tying it all together.

pub mod bus;
pub mod config;
pub mod cpu;
pub mod decode;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod machine;
pub mod memory;
pub mod timing;

pub use bus::{shared, Bus, Device, DeviceBus, SharedDevice, TickContext};
pub use config::{CpuConfig, DisasmConfig};
pub use cpu::{Ccr, Cpu, Exr, Registers};
pub use decode::{decode, Fetch, PeekFetch};
pub use disasm::Disassembler;
pub use error::{Access, AccessKind, ConfigError, CpuError, Result};
pub use instruction::{Instruction, Op, Size};
pub use machine::{HaltHandle, Machine, RegisterDump, RunOutcome};
pub use memory::{MemoryImage, ADDRESS_MASK, ADDRESS_SPACE};
