use typed_builder::TypedBuilder;

use crate::memory::ADDRESS_SPACE;

/// Interpreter configuration.
///
/// ```
/// use h8emu_core::CpuConfig;
///
/// let config = CpuConfig::builder().clock_hz(20_000_000).build();
/// assert_eq!(config.vector_base, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct CpuConfig {
    /// Size of the backing memory image in bytes.
    #[builder(default = ADDRESS_SPACE)]
    pub memory_size: usize,
    /// Base of the exception vector table.
    #[builder(default = 0)]
    pub vector_base: u32,
    /// Enable register for interrupts 12–17 (`None` disables the check).
    #[builder(default = Some(0xFF_FFF5))]
    pub ier_address: Option<u32>,
    /// Status register mirroring pending interrupts 12–17.
    #[builder(default = Some(0xFF_FFF6))]
    pub isr_address: Option<u32>,
    /// System control register; bit 3 is UE.
    #[builder(default = 0xFF_FFF2)]
    pub syscr_address: u32,
    #[builder(default = 16_000_000)]
    pub clock_hz: u64,
    /// Per-instruction trace at `trace` log level.
    #[builder(default, setter(strip_option))]
    pub trace: Option<DisasmConfig>,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Rendering options of the disassembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct DisasmConfig {
    /// Prefix each line with the raw instruction bytes.
    #[builder(default = false)]
    pub show_bytes: bool,
    /// Render addresses in the on-chip register page by name.
    #[builder(default = true)]
    pub symbolic_names: bool,
    /// Indent traced lines by call depth.
    #[builder(default = true)]
    pub indent_calls: bool,
}

impl Default for DisasmConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
