//! Standard on-chip register layout of an H8S/2350-class part.

use typed_builder::TypedBuilder;

use h8emu_core::{shared, ConfigError, Device, Machine, SharedDevice};

use crate::dma::Dma;
use crate::refresh::RefreshController;
use crate::regs::{Adc, CatchAll, HwRegs, Ier};
use crate::serial::Serial;
use crate::timers::{Timers, TIMER_BASE, TIMER_LEN};

pub const DMA_BASE: u32 = 0xFF_FF20;
pub const REFRESH_BASE: u32 = 0xFF_FFAC;
pub const SERIAL_BASES: [u32; 2] = [0xFF_FFB0, 0xFF_FFB8];
pub const ADC_BASE: u32 = 0xFF_FFE0;
pub const IER_ADDRESS: u32 = 0xFF_FFF5;

/// Start of the on-chip register area; everything from here to the end of
/// the address space that no other device claims is plain storage.
pub const REGISTER_AREA: u32 = 0xFF_FF1C;
const ADDRESS_END: u64 = 1 << 24;

/// Which optional devices to map and how to wire their interrupts.
///
/// ```
/// use h8emu_devices::BoardConfig;
///
/// let config = BoardConfig::builder().adc_value(0x8000).dma(false).build();
/// assert_eq!(config.serial_irq_offsets, [0, 4]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct BoardConfig {
    /// Interrupt offset of each serial channel relative to channel 0.
    #[builder(default = [0, 4])]
    pub serial_irq_offsets: [u8; 2],
    #[builder(default = 0)]
    pub dma_irq_offset: u8,
    /// Conversion result every ADC read returns.
    #[builder(default = 0)]
    pub adc_value: u16,
    #[builder(default = true)]
    pub dma: bool,
    #[builder(default = true)]
    pub refresh: bool,
    /// Extra `(base, len)` ranges whose accesses are only logged.
    #[builder(default)]
    pub catch_all: Vec<(u32, u32)>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Host-side handles to the devices a board exposes.
pub struct Board {
    pub serial: [SharedDevice<Serial>; 2],
    pub timers: SharedDevice<Timers>,
    pub adc: SharedDevice<Adc>,
}

impl Board {
    /// Map the on-chip peripherals into `machine`.
    pub fn install(machine: &mut Machine, config: &BoardConfig) -> Result<Self, ConfigError> {
        let serial = config.serial_irq_offsets.map(|offset| shared(Serial::new(offset)));
        let timers = shared(Timers::default());
        let adc = shared(Adc::new(config.adc_value));

        // (base, len) of everything except the HwRegs filler.
        let mut claimed = Vec::new();
        let mut map = |machine: &mut Machine,
                       name: &'static str,
                       base: u32,
                       len: u32,
                       device: Box<dyn Device>|
         -> Result<(), ConfigError> {
            machine.bus_mut().register_boxed(base, len, name, device)?;
            claimed.push((base, len));
            Ok(())
        };

        if config.dma {
            map(machine, "DMA", DMA_BASE, 16, Box::new(Dma::new(config.dma_irq_offset)))?;
        }
        map(machine, "timers", TIMER_BASE, TIMER_LEN, Box::new(timers.clone()))?;
        if config.refresh {
            map(machine, "refresh", REFRESH_BASE, 4, Box::new(RefreshController::default()))?;
        }
        for (base, channel) in SERIAL_BASES.into_iter().zip(&serial) {
            map(machine, "serial", base, 8, Box::new(channel.clone()))?;
        }
        map(machine, "ADC", ADC_BASE, 8, Box::new(adc.clone()))?;
        map(machine, "IER", IER_ADDRESS, 1, Box::new(Ier::default()))?;
        for &(base, len) in &config.catch_all {
            map(machine, "catch-all", base, len, Box::new(CatchAll))?;
        }

        let regs = shared(HwRegs::default());
        for (base, len) in gaps(&claimed, REGISTER_AREA, ADDRESS_END) {
            machine.register_device(base, len, regs.clone())?;
        }

        Ok(Self {
            serial,
            timers,
            adc,
        })
    }
}

/// Sub-ranges of `[start, end)` not covered by `claimed`.
fn gaps(claimed: &[(u32, u32)], start: u32, end: u64) -> Vec<(u32, u32)> {
    let mut ranges: Vec<(u64, u64)> = claimed
        .iter()
        .map(|&(base, len)| (base as u64, base as u64 + len as u64))
        .filter(|&(_, e)| e > start as u64)
        .collect();
    ranges.sort_unstable();

    let mut gaps = Vec::new();
    let mut cursor = start as u64;
    for (base, e) in ranges {
        if base > cursor {
            gaps.push((cursor as u32, (base - cursor) as u32));
        }
        cursor = cursor.max(e);
    }
    if cursor < end {
        gaps.push((cursor as u32, (end - cursor) as u32));
    }
    gaps
}
