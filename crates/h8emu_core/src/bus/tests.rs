use super::*;
use crate::error::CpuError;

/// Remembers every access and answers reads with the low address byte.
#[derive(Default)]
struct Recorder {
    reads: Vec<u32>,
    writes: Vec<(u32, u8)>,
    word_reads: usize,
}

impl Device for Recorder {
    fn read8(&mut self, addr: u32) -> u8 {
        self.reads.push(addr);
        addr as u8
    }

    fn write8(&mut self, addr: u32, value: u8) {
        self.writes.push((addr, value));
    }

    fn read16(&mut self, addr: u32) -> u16 {
        self.word_reads += 1;
        0xBEEF ^ addr as u16
    }
}

/// Raises its interrupt once the counter passes a threshold, copying a
/// byte from memory into a second location on the way.
struct Alarm {
    at: u64,
    irq: u8,
}

impl Device for Alarm {
    fn read8(&mut self, _addr: u32) -> u8 {
        0
    }

    fn write8(&mut self, _addr: u32, _value: u8) {}

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if ctx.cycles() >= self.at {
            let value = ctx.read8(0x10)?;
            ctx.write8(0x11, value)?;
            ctx.raise(self.irq);
        }
        Ok(())
    }
}

fn bus() -> DeviceBus {
    DeviceBus::new(MemoryImage::new(0x1_0000))
}

#[test]
fn unmapped_addresses_reach_memory() {
    let mut bus = bus();
    bus.write8(0x20, 0x5A).unwrap();
    assert_eq!(bus.read8(0x20).unwrap(), 0x5A);
    bus.write16(0x30, 0x1234).unwrap();
    assert_eq!(bus.read16(0x30).unwrap(), 0x1234);
    assert_eq!(bus.memory().read8(0x31).unwrap(), 0x34);
    assert!(!bus.is_mapped(0x20));
}

#[test]
fn devices_see_absolute_addresses_and_hide_memory() {
    let mut bus = bus();
    let recorder = shared(Recorder::default());
    bus.register(0x100, 0x10, recorder.clone()).unwrap();

    assert!(bus.is_mapped(0x100));
    assert!(bus.is_mapped(0x10F));
    assert!(!bus.is_mapped(0x110));

    assert_eq!(bus.read8(0x105).unwrap(), 0x05);
    bus.write8(0x10A, 0x77).unwrap();
    assert_eq!(bus.memory().read8(0x10A).unwrap(), 0);

    let recorder = recorder.lock();
    assert_eq!(recorder.reads, vec![0x105]);
    assert_eq!(recorder.writes, vec![(0x10A, 0x77)]);
}

#[test]
fn registration_errors_leave_bus_unchanged() {
    let mut bus = bus();
    bus.register(0x100, 0x10, Recorder::default()).unwrap();

    assert_eq!(
        bus.register(0x108, 0x10, Recorder::default()),
        Err(ConfigError::OverlappingDevice {
            base: 0x108,
            end: 0x118,
            other_base: 0x100,
            other_end: 0x110,
        })
    );
    assert!(matches!(
        bus.register(0xF0, 0x11, Recorder::default()),
        Err(ConfigError::OverlappingDevice { .. })
    ));
    assert_eq!(
        bus.register(0x200, 0, Recorder::default()),
        Err(ConfigError::EmptyRange { base: 0x200 })
    );
    assert!(matches!(
        bus.register(0xFF_FFF0, 0x20, Recorder::default()),
        Err(ConfigError::RangeOutOfBounds { .. })
    ));
    assert_eq!(bus.device_count(), 1);

    // Adjacent ranges are fine.
    bus.register(0xF0, 0x10, Recorder::default()).unwrap();
    bus.register(0x110, 0x10, Recorder::default()).unwrap();
    assert_eq!(bus.device_count(), 3);
}

#[test]
fn word_access_inside_one_device_is_a_single_call() {
    let mut bus = bus();
    let recorder = shared(Recorder::default());
    bus.register(0x100, 0x10, recorder.clone()).unwrap();

    assert_eq!(bus.read16(0x102).unwrap(), 0xBEEF ^ 0x102);
    assert_eq!(recorder.lock().word_reads, 1);

    // Straddling the end of the mapping splits into two byte accesses.
    bus.memory_mut().write8(0x110, 0xAA).unwrap();
    assert_eq!(bus.read16(0x10F).unwrap(), 0x0FAA);
    let recorder = recorder.lock();
    assert_eq!(recorder.word_reads, 1);
    assert_eq!(recorder.reads, vec![0x10F]);
}

#[test]
fn peek_reads_the_backing_image() {
    let mut bus = bus();
    let recorder = shared(Recorder::default());
    bus.memory_mut().write8(0x104, 0x42).unwrap();
    bus.register(0x100, 0x10, recorder.clone()).unwrap();

    assert_eq!(bus.peek8(0x104).unwrap(), 0x42);
    assert!(recorder.lock().reads.is_empty());
    assert!(bus.peek8(0x1_0000).is_err());
}

#[test]
fn tick_collects_interrupts_and_allows_bus_mastering() {
    let mut bus = bus();
    bus.memory_mut().write8(0x10, 0x99).unwrap();
    bus.register(0x200, 4, Alarm { at: 100, irq: 14 }).unwrap();
    bus.register(0x204, 4, Alarm { at: 50, irq: 3 }).unwrap();

    assert_eq!(bus.tick(10).unwrap(), 0);
    assert_eq!(bus.memory().read8(0x11).unwrap(), 0);

    assert_eq!(bus.tick(60).unwrap(), 1 << 3);
    assert_eq!(bus.tick(100).unwrap(), 1 << 3 | 1 << 14);
    assert_eq!(bus.memory().read8(0x11).unwrap(), 0x99);
}

#[test]
fn out_of_range_memory_access_is_an_error() {
    let mut bus = bus();
    assert!(matches!(
        bus.read8(0x1_0000),
        Err(CpuError::OutOfRange { addr: 0x1_0000, .. })
    ));
    assert!(bus.write8(0x2_0000, 1).is_err());
}
